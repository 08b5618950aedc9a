//! Rule trait, evaluation context and the built-in catalog.

use ir::NodeKind;
use std::path::Path;
use std::sync::Arc;

use crate::scope::{Scope, ScopeError};
use crate::{Finding, Severity, WeaknessTag};

mod command_injection;
mod deserialization;
mod query_builder;
mod raw_sql;
mod sensitive_parameter;

pub use command_injection::CommandInjection;
pub use deserialization::UnsafeDeserialization;
pub use query_builder::QueryBuilderUserSort;
pub use raw_sql::RawSql;
pub use sensitive_parameter::MissingSensitiveParameter;

/// A detector evaluated on every node of the kinds it declares.
///
/// `check` must only read the tree and the index, and must not depend on
/// other rules having run. Returning an empty vector means no finding.
pub trait Rule: Send + Sync {
    /// Stable identifier, e.g. `php.unsafe-deserialization`.
    fn id(&self) -> &'static str;
    /// Label used as the finding type.
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn weaknesses(&self) -> &'static [WeaknessTag];
    fn severity(&self) -> Severity;
    /// Node kinds `check` is called for.
    fn node_kinds(&self) -> &'static [NodeKind];
    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, ScopeError>;
}

/// Rule bound to one file and positioned at one node.
pub struct RuleContext<'a> {
    scope: Scope<'a>,
    rule: &'a dyn Rule,
    path: &'a Path,
}

impl<'a> RuleContext<'a> {
    pub fn new(scope: Scope<'a>, rule: &'a dyn Rule, path: &'a Path) -> Self {
        Self { scope, rule, path }
    }

    pub fn scope(&self) -> Scope<'a> {
        self.scope
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// Builds a finding of the bound rule located at `at`.
    pub fn report(&self, at: Scope<'_>, message: impl Into<String>) -> Finding {
        let line = at.line();
        let excerpt = at
            .file()
            .source
            .lines()
            .nth(line.saturating_sub(1))
            .unwrap_or_default()
            .trim()
            .to_string();
        Finding {
            rule_id: self.rule.id().to_string(),
            kind: self.rule.name().to_string(),
            severity: self.rule.severity(),
            file: self.path.to_path_buf(),
            line,
            column: at.column(),
            excerpt,
            message: message.into(),
            weaknesses: self
                .rule
                .weaknesses()
                .iter()
                .map(|w| w.id.to_string())
                .collect(),
        }
    }
}

/// Ordered set of rules run by a scan.
#[derive(Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleCatalog {
    pub fn new(rules: Vec<Arc<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Every built-in rule, in evaluation order.
    pub fn builtin() -> Self {
        Self::new(vec![
            Arc::new(UnsafeDeserialization),
            Arc::new(MissingSensitiveParameter),
            Arc::new(QueryBuilderUserSort),
            Arc::new(CommandInjection),
            Arc::new(RawSql),
        ])
    }

    pub fn push(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Catalog without the rules whose id is listed.
    pub fn without(self, ids: &[String]) -> Self {
        Self {
            rules: self
                .rules
                .into_iter()
                .filter(|r| !ids.iter().any(|id| id == r.id()))
                .collect(),
        }
    }

    /// Catalog restricted to the listed rule ids.
    pub fn only(self, ids: &[String]) -> Self {
        Self {
            rules: self
                .rules
                .into_iter()
                .filter(|r| ids.iter().any(|id| id == r.id()))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

/// Whether any argument of the call at `scope` is tainted.
fn any_argument_tainted(scope: Scope<'_>) -> bool {
    scope
        .call()
        .arguments()
        .into_iter()
        .any(|arg| arg.input().is_tainted())
}
