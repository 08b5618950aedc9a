use ir::names::{normalize, resolve_class_name};
use ir::NodeKind;

use super::variable::VariableFact;
use crate::scope::Scope;

/// Assignment hops followed when typing a variable.
const MAX_TYPE_DEPTH: usize = 8;

/// Resolution of class names and of the class of simple expressions.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    scope: Scope<'a>,
}

impl<'a> NameResolver<'a> {
    pub fn new(scope: Scope<'a>) -> Self {
        Self { scope }
    }

    /// Fully-qualifies `written` with the namespace and imports in effect at
    /// this node. `self`, `static` and `parent` resolve against the
    /// enclosing class.
    pub fn resolve(&self, written: &str) -> Option<String> {
        let written = written.trim();
        if written.eq_ignore_ascii_case("self") || written.eq_ignore_ascii_case("static") {
            return self.enclosing_class();
        }
        if written.eq_ignore_ascii_case("parent") {
            return self.parent_class();
        }
        if written.is_empty() || written.starts_with('$') {
            return None;
        }
        let ns = self.scope.file().namespace_at(self.scope.node().span.start);
        Some(resolve_class_name(written, ns))
    }

    /// Class of the value this node evaluates to, when statically evident.
    ///
    /// Handles class names, `new` expressions, static calls (assumed to be
    /// factories of their own class), `$this`, typed parameters and
    /// variables assigned from any of these.
    pub fn class_of(&self) -> Option<String> {
        class_of(self.scope, 0)
    }

    fn enclosing_class(&self) -> Option<String> {
        let class = self.scope.enclosing_class()?;
        class
            .node()
            .resolved
            .clone()
            .or_else(|| class.value().map(str::to_string))
    }

    fn parent_class(&self) -> Option<String> {
        let class = self.scope.enclosing_class()?;
        let name = self.enclosing_class()?;
        if let Some(parent) = self.scope.index().get(&name).and_then(|d| d.parent.clone()) {
            return Some(parent);
        }
        let base = class.first_child_of(NodeKind::BaseClause)?;
        base.children()
            .into_iter()
            .find(|c| c.kind().is_name())
            .map(|c| {
                c.node()
                    .resolved
                    .clone()
                    .unwrap_or_else(|| normalize(c.text()).to_string())
            })
    }
}

fn class_of(scope: Scope<'_>, depth: usize) -> Option<String> {
    match scope.kind() {
        NodeKind::Name | NodeKind::QualifiedName => scope
            .node()
            .resolved
            .clone()
            .or_else(|| scope.names().resolve(scope.text())),
        NodeKind::RelativeScope => scope.names().resolve(scope.text()),
        NodeKind::New => {
            let class = scope
                .children()
                .into_iter()
                .find(|c| c.kind().is_name() || c.is(NodeKind::RelativeScope))?;
            class_of(class, depth)
        }
        NodeKind::StaticCall => class_of(scope.child_by_field("scope")?, depth),
        NodeKind::Parameter => scope.parameter().type_name().ok().flatten(),
        NodeKind::Variable => {
            let name = scope.value()?;
            if name == "this" {
                return scope.names().enclosing_class();
            }
            if depth >= MAX_TYPE_DEPTH {
                return None;
            }
            scope.variable().facts(name).find_map(|fact| match fact {
                VariableFact::Parameter { site } => class_of(site, depth + 1),
                VariableFact::Assignment {
                    value: Some(value), ..
                } => class_of(value, depth + 1),
                _ => None,
            })
        }
        NodeKind::Assignment => class_of(scope.child_by_field("right")?, depth),
        NodeKind::Other if scope.node().syntax == "parenthesized_expression" => {
            class_of(scope.children().into_iter().next()?, depth)
        }
        _ => None,
    }
}
