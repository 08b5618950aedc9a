use ir::NodeKind;
use std::collections::HashSet;

use super::variable::VariableFact;
use crate::scope::Scope;

/// Superglobals filled from the request or the process environment.
pub const SUPERGLOBALS: &[&str] = &[
    "_GET", "_POST", "_REQUEST", "_COOKIE", "_SERVER", "_ENV", "_FILES",
];

/// Functions returning externally controlled data.
const INPUT_FUNCTIONS: &[&str] = &[
    "getenv",
    "filter_input",
    "filter_input_array",
    "getallheaders",
    "apache_request_headers",
];

/// Functions whose result carries the taint of their arguments.
const PASSTHROUGH_FUNCTIONS: &[&str] = &[
    "base64_decode",
    "gzinflate",
    "gzuncompress",
    "hex2bin",
    "implode",
    "join",
    "ltrim",
    "rawurldecode",
    "rtrim",
    "sprintf",
    "str_replace",
    "stripslashes",
    "strrev",
    "strtolower",
    "strtoupper",
    "substr",
    "trim",
    "urldecode",
    "vsprintf",
];

/// Casts that leave nothing attacker controlled.
const SCALAR_CASTS: &[&str] = &["int", "integer", "float", "double", "bool", "boolean"];

/// Variable hops followed before giving up on a provenance chain.
const MAX_PROVENANCE_DEPTH: usize = 8;

/// Framework-agnostic detection of externally controlled values.
#[derive(Debug, Clone, Copy)]
pub struct InputAnalyzer<'a> {
    scope: Scope<'a>,
}

impl<'a> InputAnalyzer<'a> {
    pub fn new(scope: Scope<'a>) -> Self {
        Self { scope }
    }

    /// Whether the node itself reads process-wide external input:
    /// a superglobal (or an element of one), `getenv()`, `filter_input()`,
    /// `getallheaders()` or `file_get_contents('php://input')`.
    pub fn reads_external_input(&self) -> bool {
        let scope = self.scope;
        match scope.kind() {
            NodeKind::Variable => scope
                .value()
                .is_some_and(|v| SUPERGLOBALS.contains(&v)),
            NodeKind::Subscript => scope
                .children()
                .into_iter()
                .next()
                .is_some_and(|base| base.input().reads_external_input()),
            NodeKind::FunctionCall => {
                let call = scope.call();
                if call.is_named_any(INPUT_FUNCTIONS) {
                    return true;
                }
                call.is_named("file_get_contents")
                    && call.first_argument().is_some_and(|arg| {
                        arg.is(NodeKind::StringLiteral) && arg.text().contains("php://input")
                    })
            }
            _ => false,
        }
    }

    /// Whether the value of this expression may originate from external
    /// input or the framework request, directly or through the variables
    /// it was assigned from.
    ///
    /// Calls to unknown functions stop the propagation, so an ambiguous
    /// value is reported as not tainted.
    pub fn is_tainted(&self) -> bool {
        let mut visited = HashSet::new();
        tainted(self.scope, &mut visited, 0)
    }
}

fn tainted(scope: Scope<'_>, visited: &mut HashSet<usize>, depth: usize) -> bool {
    if !visited.insert(scope.id()) {
        return false;
    }
    if scope.input().reads_external_input() || scope.request().is_request_access() {
        return true;
    }
    let any_child = |visited: &mut HashSet<usize>| {
        scope
            .children()
            .into_iter()
            .filter(|c| !c.is(NodeKind::Comment))
            .any(|c| tainted(c, visited, depth))
    };
    match scope.kind() {
        NodeKind::Variable => {
            if depth >= MAX_PROVENANCE_DEPTH || scope.value() == Some("this") {
                return false;
            }
            let Ok(facts) = scope.variable().own_facts() else {
                return false;
            };
            let origins: Vec<Scope<'_>> = facts
                .filter_map(|fact| match fact {
                    VariableFact::Assignment { value, .. } => value,
                    VariableFact::Foreach { source, .. } => source,
                    VariableFact::Parameter { .. } => None,
                })
                .collect();
            origins
                .into_iter()
                .any(|origin| tainted(origin, visited, depth + 1))
        }
        NodeKind::Subscript => scope
            .children()
            .into_iter()
            .next()
            .is_some_and(|base| tainted(base, visited, depth)),
        NodeKind::Assignment => scope
            .child_by_field("right")
            .is_some_and(|right| tainted(right, visited, depth)),
        NodeKind::StringLiteral | NodeKind::Argument => any_child(visited),
        NodeKind::FunctionCall if scope.call().is_named_any(PASSTHROUGH_FUNCTIONS) => scope
            .call()
            .arguments()
            .into_iter()
            .any(|arg| tainted(arg, visited, depth)),
        NodeKind::Other => match scope.node().syntax.as_str() {
            "cast_expression" => {
                let ty = scope
                    .text()
                    .trim_start_matches('(')
                    .split(')')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase();
                !SCALAR_CASTS.contains(&ty.as_str()) && any_child(visited)
            }
            "binary_expression" => {
                matches!(binary_operator(scope), Some(".") | Some("??")) && any_child(visited)
            }
            // the condition of a ternary does not flow into its value
            "conditional_expression" => scope
                .children()
                .into_iter()
                .filter(|c| c.node().field.as_deref() != Some("condition"))
                .any(|c| tainted(c, visited, depth)),
            "parenthesized_expression"
            | "array_creation_expression"
            | "array_element_initializer"
            | "string_value"
            | "heredoc_body"
            | "expression_statement"
            | "reference_modifier"
            | "by_ref" => any_child(visited),
            _ => false,
        },
        _ => false,
    }
}

/// Operator token between the operands of a binary expression.
fn binary_operator<'a>(scope: Scope<'a>) -> Option<&'a str> {
    let left = scope.child_by_field("left")?;
    let right = scope.child_by_field("right")?;
    scope
        .file()
        .source
        .get(left.node().span.end..right.node().span.start)
        .map(str::trim)
}
