use ir::NodeKind;

use super::{any_argument_tainted, Rule, RuleContext};
use crate::scope::ScopeError;
use crate::{Finding, Severity, WeaknessTag};

const WEAKNESSES: &[WeaknessTag] = &[WeaknessTag::new(
    "CWE-89",
    "Improper Neutralization of Special Elements used in an SQL Command",
)];

pub const QUERY_BUILDER: &str = "Spatie\\QueryBuilder\\QueryBuilder";

/// Methods whose arguments whitelist what the client may sort, filter,
/// select or include.
const ALLOW_LIST_METHODS: &[&str] = &[
    "allowedSorts",
    "allowedFilters",
    "allowedFields",
    "allowedIncludes",
    "defaultSort",
    "defaultSorts",
];

/// Spatie QueryBuilder allow lists built from request data let the client
/// pick arbitrary columns.
pub struct QueryBuilderUserSort;

impl Rule for QueryBuilderUserSort {
    fn id(&self) -> &'static str {
        "php.query-builder-user-sort"
    }

    fn name(&self) -> &'static str {
        "User-controlled query builder allow list"
    }

    fn description(&self) -> &'static str {
        "allowedSorts/allowedFilters and friends must list columns explicitly, not take them from the request"
    }

    fn weaknesses(&self) -> &'static [WeaknessTag] {
        WEAKNESSES
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn node_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, ScopeError> {
        let scope = ctx.scope();
        let call = scope.call();
        if !call.is_named_any(ALLOW_LIST_METHODS) {
            return Ok(Vec::new());
        }
        // an unresolved receiver is not evidence of a query builder
        let Some(class) = call
            .leftmost_receiver()
            .and_then(|head| head.names().class_of())
        else {
            return Ok(Vec::new());
        };
        if !scope.index().is_a(&class, QUERY_BUILDER) || !any_argument_tainted(scope) {
            return Ok(Vec::new());
        }
        let method = call.name().unwrap_or_default();
        Ok(vec![ctx.report(
            scope,
            format!("{method}() on {class} is built from request data; list the allowed columns explicitly"),
        )])
    }
}
