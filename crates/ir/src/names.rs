//! Namespace regions, `use` imports and class-name resolution.
//!
//! PHP resolves a written class name against the namespace it appears in
//! and the `use` imports declared there. The parser applies these rules
//! while building the tree and the engine re-applies them for names it
//! reconstructs itself, so both live here.

use serde::{Deserialize, Serialize};

use crate::ast::Span;

/// Names that refer to the enclosing class rather than to a declared one.
const RELATIVE_NAMES: &[&str] = &["self", "static", "parent"];

/// Type keywords that never name a class.
const BUILTIN_TYPES: &[&str] = &[
    "array", "bool", "callable", "false", "float", "int", "iterable", "mixed", "never", "null",
    "object", "string", "true", "void",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Local alias (`Foo` in `use Vendor\Foo;`).
    pub alias: String,
    /// Fully-qualified target without leading separator.
    pub target: String,
}

/// A namespace body together with the imports declared inside it.
///
/// Code outside any `namespace` statement belongs to a scope with an empty
/// name covering the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceScope {
    pub name: String,
    pub span: Span,
    pub imports: Vec<Import>,
}

impl NamespaceScope {
    pub fn new(name: &str, span: Span) -> Self {
        Self {
            name: normalize(name).to_string(),
            span,
            imports: Vec::new(),
        }
    }

    /// Looks up an import by alias. PHP aliases are case-insensitive.
    pub fn import(&self, alias: &str) -> Option<&Import> {
        self.imports
            .iter()
            .find(|i| i.alias.eq_ignore_ascii_case(alias))
    }
}

/// Strips the leading namespace separator of a fully-qualified name.
pub fn normalize(name: &str) -> &str {
    name.trim().trim_start_matches('\\')
}

/// Last segment of a (possibly qualified) name.
///
/// ```
/// assert_eq!(ir::names::short_name("\\Illuminate\\Http\\Request"), "Request");
/// assert_eq!(ir::names::short_name("Request"), "Request");
/// ```
pub fn short_name(name: &str) -> &str {
    let name = normalize(name);
    name.rsplit('\\').next().unwrap_or(name)
}

pub fn is_relative(name: &str) -> bool {
    RELATIVE_NAMES.iter().any(|r| r.eq_ignore_ascii_case(name.trim()))
}

pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(normalize(name)))
}

/// Case-insensitive comparison of two class names, ignoring leading `\`.
pub fn same_class(a: &str, b: &str) -> bool {
    normalize(a).eq_ignore_ascii_case(normalize(b))
}

/// Resolves a class name as written in source to its fully-qualified form.
///
/// `self`, `static`, `parent` and builtin type keywords are returned as
/// written since they do not name a declared class.
///
/// ```
/// use ir::names::{resolve_class_name, Import, NamespaceScope};
/// use ir::Span;
/// let mut ns = NamespaceScope::new("App\\Http", Span { start: 0, end: 100 });
/// ns.imports.push(Import { alias: "Req".into(), target: "Illuminate\\Http\\Request".into() });
/// assert_eq!(resolve_class_name("Req", Some(&ns)), "Illuminate\\Http\\Request");
/// assert_eq!(resolve_class_name("Kernel", Some(&ns)), "App\\Http\\Kernel");
/// assert_eq!(resolve_class_name("\\Exception", Some(&ns)), "Exception");
/// ```
pub fn resolve_class_name(written: &str, scope: Option<&NamespaceScope>) -> String {
    let written = written.trim();
    if let Some(fq) = written.strip_prefix('\\') {
        return fq.to_string();
    }
    if is_relative(written) || is_builtin_type(written) {
        return written.to_string();
    }
    let Some(scope) = scope else {
        return written.to_string();
    };
    let (first, rest) = match written.split_once('\\') {
        Some((first, rest)) => (first, Some(rest)),
        None => (written, None),
    };
    if first.eq_ignore_ascii_case("namespace") {
        if let Some(rest) = rest {
            return qualify(&scope.name, rest);
        }
    }
    if let Some(import) = scope.import(first) {
        return match rest {
            Some(rest) => format!("{}\\{}", import.target, rest),
            None => import.target.clone(),
        };
    }
    qualify(&scope.name, written)
}

fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}\\{name}")
    }
}

/// Parses the text of one `use` clause (`Vendor\Foo as Bar`).
///
/// `prefix` is the group prefix for `use Vendor\{Foo, Bar}` declarations.
pub fn parse_use_clause(text: &str, prefix: Option<&str>) -> Option<Import> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let (name, alias) = match parts.as_slice() {
        [name] => (*name, None),
        [name, kw, alias] if kw.eq_ignore_ascii_case("as") => (*name, Some(*alias)),
        _ => return None,
    };
    let name = normalize(name.trim_end_matches(','));
    if name.is_empty() {
        return None;
    }
    let target = match prefix.map(|p| normalize(p).trim_end_matches('\\')) {
        Some(p) if !p.is_empty() => format!("{p}\\{name}"),
        _ => name.to_string(),
    };
    let alias = alias
        .map(str::to_string)
        .unwrap_or_else(|| short_name(&target).to_string());
    Some(Import { alias, target })
}
