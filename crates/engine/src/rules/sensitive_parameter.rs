use ir::NodeKind;

use super::{Rule, RuleContext};
use crate::scope::ScopeError;
use crate::{Finding, Severity, WeaknessTag};

const WEAKNESSES: &[WeaknessTag] = &[WeaknessTag::new(
    "CWE-532",
    "Insertion of Sensitive Information into Log File",
)];

/// Terms matched anywhere in the parameter name.
const SENSITIVE_TERMS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "credential",
    "apikey",
    "privatekey",
    "passphrase",
];

/// Short terms that must form a whole word of the name.
const SENSITIVE_WORDS: &[&str] = &["ssn", "cvv"];

const MARKER: &str = "SensitiveParameter";

/// Sensitive parameters not marked `#[\SensitiveParameter]` end up in stack
/// traces and logs.
pub struct MissingSensitiveParameter;

impl Rule for MissingSensitiveParameter {
    fn id(&self) -> &'static str {
        "php.missing-sensitive-parameter"
    }

    fn name(&self) -> &'static str {
        "Missing SensitiveParameter attribute"
    }

    fn description(&self) -> &'static str {
        "parameters holding secrets should carry #[\\SensitiveParameter] so PHP redacts them from stack traces"
    }

    fn weaknesses(&self) -> &'static [WeaknessTag] {
        WEAKNESSES
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn node_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Parameter]
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, ScopeError> {
        let scope = ctx.scope();
        let param = scope.parameter();
        let name = param.name()?;
        if !is_sensitive_name(name) || param.has_attribute(MARKER)? {
            return Ok(Vec::new());
        }
        Ok(vec![ctx.report(
            scope,
            format!("parameter `${name}` looks sensitive but is not marked #[\\SensitiveParameter]"),
        )])
    }
}

/// Lowercase words of a camelCase or snake_case identifier.
fn words(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

pub(crate) fn is_sensitive_name(name: &str) -> bool {
    let words = words(name.trim_start_matches('$'));
    let joined = words.concat();
    SENSITIVE_TERMS.iter().any(|t| joined.contains(t))
        || words.iter().any(|w| SENSITIVE_WORDS.contains(&w.as_str()))
}
