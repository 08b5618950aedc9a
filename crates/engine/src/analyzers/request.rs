use ir::names::same_class;
use ir::NodeKind;

use crate::scope::Scope;

/// Request classes whose instances carry user input. Indexed subclasses
/// (form requests declared in the project) count as well.
pub const REQUEST_CLASSES: &[&str] = &[
    "Illuminate\\Http\\Request",
    "Illuminate\\Foundation\\Http\\FormRequest",
];

/// Facades and aliases giving static access to the current request.
const REQUEST_FACADES: &[&str] = &[
    "Illuminate\\Support\\Facades\\Request",
    "Illuminate\\Http\\Request",
    "Request",
];

/// Laravel-specific detection of reads from the current HTTP request.
#[derive(Debug, Clone, Copy)]
pub struct RequestAnalyzer<'a> {
    scope: Scope<'a>,
}

impl<'a> RequestAnalyzer<'a> {
    pub fn new(scope: Scope<'a>) -> Self {
        Self { scope }
    }

    /// Whether the node reads the current request through `request()`,
    /// the `Request` facade, a method or property of a request-typed
    /// variable or `$this->request`.
    pub fn is_request_access(&self) -> bool {
        let scope = self.scope;
        match scope.kind() {
            NodeKind::FunctionCall => scope.call().is_named("request"),
            NodeKind::StaticCall => scope
                .call()
                .static_class()
                .is_some_and(|class| is_request_facade(&class) || self.is_request_class(&class)),
            NodeKind::MethodCall => {
                if through_this_request(scope) {
                    return true;
                }
                scope
                    .call()
                    .leftmost_receiver()
                    .is_some_and(|head| self.is_request_value(head))
            }
            NodeKind::PropertyAccess => {
                if is_this_request(scope) {
                    return true;
                }
                scope.child_by_field("object").is_some_and(|object| {
                    object.is(NodeKind::Variable) && self.is_request_value(object)
                })
            }
            _ => false,
        }
    }

    /// Whether `class` is a request class or an indexed subclass of one.
    pub fn is_request_class(&self, class: &str) -> bool {
        let index = self.scope.index();
        REQUEST_CLASSES.iter().any(|r| index.is_a(class, r))
    }

    /// Head of a call chain that evaluates to the request.
    fn is_request_value(&self, head: Scope<'a>) -> bool {
        match head.kind() {
            NodeKind::FunctionCall => head.call().is_named("request"),
            NodeKind::Variable => head
                .names()
                .class_of()
                .is_some_and(|class| self.is_request_class(&class)),
            kind if kind.is_name() => head
                .names()
                .class_of()
                .is_some_and(|class| is_request_facade(&class) || self.is_request_class(&class)),
            _ => false,
        }
    }
}

fn is_request_facade(class: &str) -> bool {
    REQUEST_FACADES.iter().any(|f| same_class(f, class))
}

/// `$this->request`
fn is_this_request(scope: Scope<'_>) -> bool {
    if !scope.is(NodeKind::PropertyAccess) {
        return false;
    }
    let object_is_this = scope
        .child_by_field("object")
        .is_some_and(|o| o.is(NodeKind::Variable) && o.value() == Some("this"));
    object_is_this && scope.value() == Some("request")
}

/// Method chain passing through `$this->request`, e.g.
/// `$this->request->query('sort')`.
fn through_this_request(call: Scope<'_>) -> bool {
    let mut current = call.child_by_field("object");
    while let Some(node) = current {
        if is_this_request(node) {
            return true;
        }
        current = match node.kind() {
            NodeKind::MethodCall | NodeKind::PropertyAccess => node.child_by_field("object"),
            _ => None,
        };
    }
    false
}
