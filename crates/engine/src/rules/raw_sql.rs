use ir::names::same_class;
use ir::NodeKind;

use super::{Rule, RuleContext};
use crate::scope::{Scope, ScopeError};
use crate::{Finding, Severity, WeaknessTag};

const WEAKNESSES: &[WeaknessTag] = &[WeaknessTag::new(
    "CWE-89",
    "Improper Neutralization of Special Elements used in an SQL Command",
)];

/// Eloquent and query builder methods taking a raw SQL fragment.
const RAW_METHODS: &[&str] = &[
    "whereRaw",
    "orWhereRaw",
    "havingRaw",
    "orHavingRaw",
    "orderByRaw",
    "selectRaw",
    "groupByRaw",
];

const DB_FACADES: &[&str] = &["Illuminate\\Support\\Facades\\DB", "DB"];

/// `DB::` methods executing or embedding raw SQL.
const DB_RAW_METHODS: &[&str] = &["raw", "select", "statement", "unprepared"];

/// Raw SQL assembled from user input.
pub struct RawSql;

impl RawSql {
    fn is_raw_query(scope: Scope<'_>) -> bool {
        let call = scope.call();
        match scope.kind() {
            NodeKind::MethodCall => call.is_named_any(RAW_METHODS),
            NodeKind::StaticCall => {
                call.is_named_any(RAW_METHODS)
                    || (call.is_named_any(DB_RAW_METHODS)
                        && call
                            .static_class()
                            .is_some_and(|class| DB_FACADES.iter().any(|f| same_class(f, &class))))
            }
            _ => false,
        }
    }
}

impl Rule for RawSql {
    fn id(&self) -> &'static str {
        "php.raw-sql"
    }

    fn name(&self) -> &'static str {
        "Raw SQL with user input"
    }

    fn description(&self) -> &'static str {
        "raw query fragments must use bindings instead of interpolating user input"
    }

    fn weaknesses(&self) -> &'static [WeaknessTag] {
        WEAKNESSES
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn node_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall, NodeKind::StaticCall]
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, ScopeError> {
        let scope = ctx.scope();
        if !Self::is_raw_query(scope) {
            return Ok(Vec::new());
        }
        let call = scope.call();
        let Some(sql) = call.first_argument() else {
            return Ok(Vec::new());
        };
        if !sql.input().is_tainted() {
            return Ok(Vec::new());
        }
        let method = call.name().unwrap_or_default();
        Ok(vec![ctx.report(
            scope,
            format!("{method}() embeds user input in raw SQL; pass it as a binding"),
        )])
    }
}
