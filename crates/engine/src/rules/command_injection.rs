use ir::NodeKind;

use super::{Rule, RuleContext};
use crate::scope::ScopeError;
use crate::{Finding, Severity, WeaknessTag};

const WEAKNESSES: &[WeaknessTag] = &[WeaknessTag::new(
    "CWE-78",
    "Improper Neutralization of Special Elements used in an OS Command",
)];

const SHELL_FUNCTIONS: &[&str] = &[
    "exec",
    "system",
    "shell_exec",
    "passthru",
    "popen",
    "proc_open",
    "pcntl_exec",
];

/// Process execution with a command line built from user input.
pub struct CommandInjection;

impl Rule for CommandInjection {
    fn id(&self) -> &'static str {
        "php.command-injection"
    }

    fn name(&self) -> &'static str {
        "Command injection"
    }

    fn description(&self) -> &'static str {
        "shell execution functions must not receive user input without escapeshellarg()"
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
        if !call.is_named_any(SHELL_FUNCTIONS) {
            return Ok(Vec::new());
        }
        let Some(command) = call.first_argument() else {
            return Ok(Vec::new());
        };
        if !command.input().is_tainted() {
            return Ok(Vec::new());
        }
        let function = call.name().unwrap_or_default();
        Ok(vec![ctx.report(
            scope,
            format!("{function}() runs a command built from user input `{}`", command.text()),
        )])
    }
}
