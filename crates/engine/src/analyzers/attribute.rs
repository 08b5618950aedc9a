use ir::names::short_name;
use ir::NodeKind;

use crate::scope::{Scope, ScopeError};

/// Queries about `#[...]` attributes.
#[derive(Debug, Clone, Copy)]
pub struct AttributeAnalyzer<'a> {
    scope: Scope<'a>,
}

impl<'a> AttributeAnalyzer<'a> {
    pub fn new(scope: Scope<'a>) -> Self {
        Self { scope }
    }

    pub fn is_attribute(&self) -> bool {
        self.scope.is(NodeKind::Attribute)
    }

    /// Attribute class as written, e.g. `\SensitiveParameter`.
    pub fn name(&self) -> Result<&'a str, ScopeError> {
        self.scope.expect(NodeKind::Attribute, "attribute")?;
        Ok(self.scope.value().unwrap_or_default())
    }

    /// Compares the last name segment, ignoring case.
    pub fn is_named(&self, short: &str) -> Result<bool, ScopeError> {
        let name = self.name()?;
        Ok(!name.is_empty() && short_name(name).eq_ignore_ascii_case(short_name(short)))
    }
}
