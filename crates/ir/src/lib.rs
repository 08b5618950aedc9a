//! Syntax tree types shared by the PHP front end and the analysis engine.
//!
//! Module [`ast`] holds the owned, arena-backed tree built from the
//! tree-sitter parse of one file; module [`names`] holds the namespace and
//! import model used to turn written class names into fully-qualified ones.

pub mod ast;
pub mod names;

pub use ast::{Ancestors, AstNode, Descendants, FileAst, Meta, NodeKind, Span};
pub use names::{resolve_class_name, Import, NamespaceScope};

#[cfg(test)]
mod tests;
