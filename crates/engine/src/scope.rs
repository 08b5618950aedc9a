//! Cursor over one node of a syntax tree.
//!
//! A [`Scope`] pairs a node with the file it belongs to and the project
//! index. It is `Copy`, so rules pivot freely with [`Scope::with_node`] and
//! the tree navigation helpers, and hand scopes to the analyzers.

use ir::{AstNode, FileAst, NodeKind};
use thiserror::Error;

use crate::analyzers::{
    AttributeAnalyzer, CallAnalyzer, InputAnalyzer, NameResolver, ParameterAnalyzer,
    RequestAnalyzer, VariableAnalyzer,
};
use crate::index::ProjectIndex;

/// Structurally invalid use of a scope, i.e. a defect in the calling rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("expected {expected} node, found {found:?} at line {line}")]
    UnexpectedKind {
        expected: &'static str,
        found: NodeKind,
        line: usize,
    },
    #[error("node {0} does not exist in this file")]
    MissingNode(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    file: &'a FileAst,
    index: &'a ProjectIndex,
    node: &'a AstNode,
}

impl<'a> Scope<'a> {
    pub fn new(file: &'a FileAst, index: &'a ProjectIndex, id: usize) -> Result<Self, ScopeError> {
        let node = file.get(id).ok_or(ScopeError::MissingNode(id))?;
        Ok(Self { file, index, node })
    }

    /// Scope at the root of `file`.
    pub fn root(file: &'a FileAst, index: &'a ProjectIndex) -> Result<Self, ScopeError> {
        Self::new(file, index, 0)
    }

    /// Same file and index, different node.
    pub fn with_node(&self, id: usize) -> Result<Self, ScopeError> {
        Self::new(self.file, self.index, id)
    }

    fn derive(&self, node: &'a AstNode) -> Self {
        Self {
            file: self.file,
            index: self.index,
            node,
        }
    }

    pub fn file(&self) -> &'a FileAst {
        self.file
    }

    pub fn index(&self) -> &'a ProjectIndex {
        self.index
    }

    pub fn node(&self) -> &'a AstNode {
        self.node
    }

    pub fn id(&self) -> usize {
        self.node.id
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.node.kind == kind
    }

    pub fn line(&self) -> usize {
        self.node.meta.line
    }

    pub fn column(&self) -> usize {
        self.node.meta.column
    }

    /// Source text of the node.
    pub fn text(&self) -> &'a str {
        self.file.text(self.node.id)
    }

    pub fn value(&self) -> Option<&'a str> {
        self.node.value.as_deref()
    }

    pub fn parent(&self) -> Option<Scope<'a>> {
        self.file.parent(self.node.id).map(|n| self.derive(n))
    }

    pub fn children(&self) -> Vec<Scope<'a>> {
        self.file
            .children(self.node.id)
            .into_iter()
            .map(|n| self.derive(n))
            .collect()
    }

    pub fn child_by_field(&self, field: &str) -> Option<Scope<'a>> {
        self.file
            .child_by_field(self.node.id, field)
            .map(|n| self.derive(n))
    }

    pub fn first_child_of(&self, kind: NodeKind) -> Option<Scope<'a>> {
        self.children().into_iter().find(|c| c.is(kind))
    }

    /// Preorder walk starting at this node.
    pub fn descendants(&self) -> impl Iterator<Item = Scope<'a>> + 'a {
        let this = *self;
        self.file
            .descendants(self.node.id)
            .map(move |n| this.derive(n))
    }

    /// Walk from the parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Scope<'a>> + 'a {
        let this = *self;
        self.file
            .ancestors(self.node.id)
            .map(move |n| this.derive(n))
    }

    /// Nearest method, function, closure or arrow function around the node.
    pub fn enclosing_function(&self) -> Option<Scope<'a>> {
        self.ancestors().find(|s| s.kind().is_function_like())
    }

    /// Nearest class, interface, trait or enum around the node.
    pub fn enclosing_class(&self) -> Option<Scope<'a>> {
        self.ancestors().find(|s| s.kind().is_class_like())
    }

    /// Fails with [`ScopeError::UnexpectedKind`] unless the node is `kind`.
    pub fn expect(&self, kind: NodeKind, expected: &'static str) -> Result<(), ScopeError> {
        if self.is(kind) {
            Ok(())
        } else {
            Err(ScopeError::UnexpectedKind {
                expected,
                found: self.kind(),
                line: self.line(),
            })
        }
    }

    pub fn call(&self) -> CallAnalyzer<'a> {
        CallAnalyzer::new(*self)
    }

    pub fn parameter(&self) -> ParameterAnalyzer<'a> {
        ParameterAnalyzer::new(*self)
    }

    pub fn attribute(&self) -> AttributeAnalyzer<'a> {
        AttributeAnalyzer::new(*self)
    }

    pub fn variable(&self) -> VariableAnalyzer<'a> {
        VariableAnalyzer::new(*self)
    }

    pub fn input(&self) -> InputAnalyzer<'a> {
        InputAnalyzer::new(*self)
    }

    pub fn request(&self) -> RequestAnalyzer<'a> {
        RequestAnalyzer::new(*self)
    }

    pub fn names(&self) -> NameResolver<'a> {
        NameResolver::new(*self)
    }
}
