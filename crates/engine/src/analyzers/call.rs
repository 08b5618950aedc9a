use ir::names::normalize;
use ir::NodeKind;

use crate::scope::Scope;

/// Queries about function, method and static calls.
#[derive(Debug, Clone, Copy)]
pub struct CallAnalyzer<'a> {
    scope: Scope<'a>,
}

impl<'a> CallAnalyzer<'a> {
    pub fn new(scope: Scope<'a>) -> Self {
        Self { scope }
    }

    pub fn is_function_call(&self) -> bool {
        self.scope.is(NodeKind::FunctionCall)
    }

    pub fn is_method_call(&self) -> bool {
        self.scope.is(NodeKind::MethodCall)
    }

    pub fn is_static_call(&self) -> bool {
        self.scope.is(NodeKind::StaticCall)
    }

    pub fn is_call(&self) -> bool {
        self.scope.kind().is_call()
    }

    /// Callee name as written, without a leading `\`.
    ///
    /// Dynamic callees (`$fn()`, `$obj->$method()`) have no name.
    pub fn name(&self) -> Option<&'a str> {
        let field = match self.scope.kind() {
            NodeKind::FunctionCall => "function",
            NodeKind::MethodCall | NodeKind::StaticCall => "name",
            _ => return None,
        };
        let callee = self.scope.child_by_field(field)?;
        callee
            .kind()
            .is_name()
            .then(|| normalize(callee.text()))
    }

    /// Case-insensitive comparison of the callee name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name()
            .is_some_and(|n| n.eq_ignore_ascii_case(normalize(name)))
    }

    pub fn is_named_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.is_named(n))
    }

    /// Argument expressions in call order.
    pub fn arguments(&self) -> Vec<Scope<'a>> {
        if !self.is_call() {
            return Vec::new();
        }
        let Some(list) = self
            .scope
            .child_by_field("arguments")
            .or_else(|| self.scope.first_child_of(NodeKind::Arguments))
        else {
            return Vec::new();
        };
        list.children()
            .into_iter()
            .filter(|c| c.is(NodeKind::Argument))
            .map(|arg| {
                arg.children()
                    .into_iter()
                    .find(|c| c.node().field.as_deref() != Some("name"))
                    .unwrap_or(arg)
            })
            .collect()
    }

    pub fn argument(&self, position: usize) -> Option<Scope<'a>> {
        self.arguments().into_iter().nth(position)
    }

    pub fn first_argument(&self) -> Option<Scope<'a>> {
        self.argument(0)
    }

    /// Object of a method call or class of a static call.
    pub fn receiver(&self) -> Option<Scope<'a>> {
        match self.scope.kind() {
            NodeKind::MethodCall => self.scope.child_by_field("object"),
            NodeKind::StaticCall => self.scope.child_by_field("scope"),
            _ => None,
        }
    }

    /// Innermost target at the head of a fluent chain.
    ///
    /// For `QueryBuilder::for($q)->allowedSorts($s)->get()` this is the
    /// `QueryBuilder` name, for `$this->query->where($a)->get()` it is the
    /// `$this` variable.
    pub fn leftmost_receiver(&self) -> Option<Scope<'a>> {
        let mut current = self.receiver()?;
        loop {
            let next = match current.kind() {
                NodeKind::MethodCall | NodeKind::PropertyAccess => current.child_by_field("object"),
                NodeKind::StaticCall => current.child_by_field("scope"),
                NodeKind::StaticPropertyAccess => current.children().into_iter().next(),
                _ if current.node().syntax == "parenthesized_expression" => {
                    current.children().into_iter().next()
                }
                _ => return Some(current),
            };
            current = next?;
        }
    }

    /// Resolved class a static call is made on.
    pub fn static_class(&self) -> Option<String> {
        if !self.is_static_call() {
            return None;
        }
        self.receiver()?.names().class_of()
    }
}
