//! Analyzer queries against small PHP snippets.

use crate::index::ProjectIndex;
use crate::scope::{Scope, ScopeError};
use ir::{FileAst, NodeKind};

mod inputs;
mod names;
mod variables;

struct Fixture {
    file: FileAst,
    index: ProjectIndex,
}

impl Fixture {
    fn new(code: &str) -> Self {
        let file = parsers::parse_php(code, "fixture.php").expect("valid php");
        let index = ProjectIndex::build(std::slice::from_ref(&file));
        Self { file, index }
    }

    fn root(&self) -> Scope<'_> {
        Scope::root(&self.file, &self.index).unwrap()
    }

    /// Every node of `kind` in preorder.
    fn all(&self, kind: NodeKind) -> Vec<Scope<'_>> {
        self.root().descendants().filter(|s| s.is(kind)).collect()
    }

    fn first(&self, kind: NodeKind) -> Scope<'_> {
        self.all(kind)
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("no {kind:?} node"))
    }

    /// Call whose callee is named `name`.
    fn call(&self, name: &str) -> Scope<'_> {
        self.root()
            .descendants()
            .find(|s| s.call().is_named(name))
            .unwrap_or_else(|| panic!("no call to {name}"))
    }

    /// First argument of the first call to `name`.
    fn arg_of(&self, name: &str) -> Scope<'_> {
        self.call(name).call().first_argument().expect("argument")
    }
}

#[test]
fn misuse_is_reported_as_scope_error() {
    let fx = Fixture::new("<?php\nfoo($a);\n");
    let call = fx.call("foo");
    assert!(matches!(
        call.parameter().name(),
        Err(ScopeError::UnexpectedKind {
            expected: "parameter",
            found: NodeKind::FunctionCall,
            line: 2,
        })
    ));
    assert!(call.parameter().attributes().is_err());
    assert!(call.attribute().is_named("SensitiveParameter").is_err());
    assert!(call.variable().name().is_err());
}
