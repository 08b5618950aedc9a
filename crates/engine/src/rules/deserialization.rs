use ir::NodeKind;

use super::{Rule, RuleContext};
use crate::scope::ScopeError;
use crate::{Finding, Severity, WeaknessTag};

const WEAKNESSES: &[WeaknessTag] = &[WeaknessTag::new(
    "CWE-502",
    "Deserialization of Untrusted Data",
)];

/// `unserialize()` applied to data the client controls.
pub struct UnsafeDeserialization;

impl Rule for UnsafeDeserialization {
    fn id(&self) -> &'static str {
        "php.unsafe-deserialization"
    }

    fn name(&self) -> &'static str {
        "Unsafe deserialization"
    }

    fn description(&self) -> &'static str {
        "unserialize() on user input can instantiate arbitrary classes and trigger gadget chains"
    }

    fn weaknesses(&self) -> &'static [WeaknessTag] {
        WEAKNESSES
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn node_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::FunctionCall]
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, ScopeError> {
        let scope = ctx.scope();
        let call = scope.call();
        if !call.is_named("unserialize") {
            return Ok(Vec::new());
        }
        let Some(arg) = call.first_argument() else {
            return Ok(Vec::new());
        };
        if !arg.input().is_tainted() {
            return Ok(Vec::new());
        }
        Ok(vec![ctx.report(
            scope,
            format!("unserialize() receives user-controlled data from `{}`", arg.text()),
        )])
    }
}
