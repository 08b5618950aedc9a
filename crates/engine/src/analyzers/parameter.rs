use ir::NodeKind;

use crate::scope::{Scope, ScopeError};

/// Queries about function and method parameters.
#[derive(Debug, Clone, Copy)]
pub struct ParameterAnalyzer<'a> {
    scope: Scope<'a>,
}

impl<'a> ParameterAnalyzer<'a> {
    pub fn new(scope: Scope<'a>) -> Self {
        Self { scope }
    }

    pub fn is_parameter(&self) -> bool {
        self.scope.is(NodeKind::Parameter)
    }

    fn require(&self) -> Result<(), ScopeError> {
        self.scope.expect(NodeKind::Parameter, "parameter")
    }

    /// Parameter name without the `$` sigil.
    pub fn name(&self) -> Result<&'a str, ScopeError> {
        self.require()?;
        Ok(self.scope.value().unwrap_or_default())
    }

    /// Fully-qualified class of the declared type, if it names a class.
    ///
    /// For union types the first class member is returned.
    pub fn type_name(&self) -> Result<Option<String>, ScopeError> {
        self.require()?;
        let Some(ty) = self.scope.child_by_field("type") else {
            return Ok(None);
        };
        Ok(ty
            .descendants()
            .find_map(|s| s.node().resolved.clone()))
    }

    /// Attributes attached to the parameter.
    pub fn attributes(&self) -> Result<Vec<Scope<'a>>, ScopeError> {
        self.require()?;
        Ok(self
            .scope
            .children()
            .into_iter()
            .filter(|c| c.is(NodeKind::AttributeList))
            .flat_map(|list| list.descendants())
            .filter(|s| s.is(NodeKind::Attribute))
            .collect())
    }

    /// Whether one of the attributes has the short name `short`.
    pub fn has_attribute(&self, short: &str) -> Result<bool, ScopeError> {
        for attr in self.attributes()? {
            if attr.attribute().is_named(short)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
