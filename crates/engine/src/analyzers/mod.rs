//! Semantic queries over a [`Scope`](crate::Scope).
//!
//! Analyzers are cheap views created from a scope (`scope.call()`,
//! `scope.input()`, ...). They never mutate anything and answer "not
//! applicable" with `false`, `None` or an empty list. Only queries that make
//! no sense for the node at hand, such as the name of a parameter asked on
//! a call, return a [`ScopeError`](crate::ScopeError).

mod attribute;
mod call;
mod input;
mod names;
mod parameter;
mod request;
mod variable;

pub use attribute::AttributeAnalyzer;
pub use call::CallAnalyzer;
pub use input::{InputAnalyzer, SUPERGLOBALS};
pub use names::NameResolver;
pub use parameter::ParameterAnalyzer;
pub use request::{RequestAnalyzer, REQUEST_CLASSES};
pub use variable::{Facts, VariableAnalyzer, VariableFact};

#[cfg(test)]
mod tests;
