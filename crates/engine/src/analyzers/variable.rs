use ir::{AstNode, NodeKind};

use crate::scope::{Scope, ScopeError};

/// One place a variable could have received its value.
#[derive(Debug, Clone, Copy)]
pub enum VariableFact<'a> {
    /// `$x = value` or a destructuring assignment containing `$x`.
    Assignment {
        site: Scope<'a>,
        value: Option<Scope<'a>>,
    },
    /// `$x` is a parameter of the enclosing function.
    Parameter { site: Scope<'a> },
    /// `foreach (source as $x)` or `foreach (source as $k => $x)`.
    Foreach {
        site: Scope<'a>,
        source: Option<Scope<'a>>,
    },
}

impl<'a> VariableFact<'a> {
    pub fn site(&self) -> Scope<'a> {
        match self {
            VariableFact::Assignment { site, .. }
            | VariableFact::Parameter { site }
            | VariableFact::Foreach { site, .. } => *site,
        }
    }
}

/// Queries about `$variables`.
#[derive(Debug, Clone, Copy)]
pub struct VariableAnalyzer<'a> {
    scope: Scope<'a>,
}

impl<'a> VariableAnalyzer<'a> {
    pub fn new(scope: Scope<'a>) -> Self {
        Self { scope }
    }

    pub fn is_variable(&self) -> bool {
        self.scope.is(NodeKind::Variable)
    }

    /// Variable name without the `$` sigil.
    pub fn name(&self) -> Result<&'a str, ScopeError> {
        self.scope.expect(NodeKind::Variable, "variable")?;
        Ok(self.scope.value().unwrap_or_default())
    }

    /// Origins of `name` that precede this node, nearest first.
    ///
    /// Only the enclosing function body is searched (the whole file for
    /// top-level code) and nested closures are skipped: their variables
    /// live in a different scope. Once the body is exhausted, arrow
    /// functions continue in the outer function unless a parameter shadows
    /// `name`, and closures do the same for variables in their `use` list.
    pub fn facts(&self, name: &str) -> Facts<'a> {
        let name = name.trim_start_matches('$');
        let function = self.scope.enclosing_function();
        let boundary = function
            .map(|f| f.node())
            .or_else(|| self.scope.file().root());
        let sites = boundary
            .map(|b| preceding_sites(self.scope, b))
            .unwrap_or_default();
        Facts {
            scope: self.scope,
            name: name.to_string(),
            sites,
            capture: function.filter(|f| captures(*f, name)),
        }
    }

    /// Facts of the variable this scope points at.
    pub fn own_facts(&self) -> Result<Facts<'a>, ScopeError> {
        let name = self.name()?;
        Ok(self.facts(name))
    }
}

/// Whether `function` reads `name` from the scope it is declared in.
fn captures(function: Scope<'_>, name: &str) -> bool {
    let named = |s: &Scope<'_>| s.value() == Some(name);
    match function.kind() {
        NodeKind::ArrowFunction => !function
            .children()
            .into_iter()
            .filter(|c| c.is(NodeKind::Parameters))
            .flat_map(|p| p.children())
            .any(|p| p.is(NodeKind::Parameter) && named(&p)),
        NodeKind::Closure => function
            .children()
            .into_iter()
            .filter(|c| c.node().syntax == "anonymous_function_use_clause")
            .any(|clause| clause.descendants().any(|v| v.is(NodeKind::Variable) && named(&v))),
        _ => false,
    }
}

/// Candidate nodes before `scope` inside `boundary`, in source order.
fn preceding_sites<'a>(scope: Scope<'a>, boundary: &'a AstNode) -> Vec<&'a AstNode> {
    let file = scope.file();
    let position = scope.node().span.start;
    let mut out = Vec::new();
    let mut stack = vec![boundary.id];
    while let Some(id) = stack.pop() {
        let Some(node) = file.get(id) else {
            continue;
        };
        if node.span.start >= position {
            continue;
        }
        if node.id != boundary.id && node.kind.is_function_like() {
            continue;
        }
        if matches!(
            node.kind,
            NodeKind::Assignment | NodeKind::Parameter | NodeKind::Foreach
        ) {
            out.push(node);
        }
        stack.extend(node.children.iter().rev());
    }
    out
}

/// Iterator over [`VariableFact`]s, see [`VariableAnalyzer::facts`].
pub struct Facts<'a> {
    scope: Scope<'a>,
    name: String,
    sites: Vec<&'a AstNode>,
    /// Closure or arrow function to resume from in the outer scope.
    capture: Option<Scope<'a>>,
}

impl<'a> Facts<'a> {
    fn assignment(&self, site: Scope<'a>) -> Option<VariableFact<'a>> {
        // reading `$x` inside `$x = f($x)` refers to the previous value
        if site.node().span.contains(self.scope.node().span.start) {
            return None;
        }
        let left = site.child_by_field("left")?;
        let binds = match left.kind() {
            NodeKind::Variable => left.value() == Some(self.name.as_str()),
            _ if matches!(
                left.node().syntax.as_str(),
                "list_literal" | "array_creation_expression"
            ) =>
            {
                left.descendants()
                    .any(|s| s.is(NodeKind::Variable) && s.value() == Some(self.name.as_str()))
            }
            _ => false,
        };
        binds.then(|| VariableFact::Assignment {
            site,
            value: site.child_by_field("right"),
        })
    }

    fn parameter(&self, site: Scope<'a>) -> Option<VariableFact<'a>> {
        (site.value() == Some(self.name.as_str())).then_some(VariableFact::Parameter { site })
    }

    fn foreach(&self, site: Scope<'a>) -> Option<VariableFact<'a>> {
        let children = site.children();
        let (source, rest) = children.split_first()?;
        // the last child is the loop body
        let bindings = rest.split_last().map(|(_, b)| b).unwrap_or_default();
        let binds = bindings.iter().any(|b| {
            b.descendants()
                .any(|s| s.is(NodeKind::Variable) && s.value() == Some(self.name.as_str()))
        });
        binds.then_some(VariableFact::Foreach {
            site,
            source: Some(*source),
        })
    }
}

impl<'a> Iterator for Facts<'a> {
    type Item = VariableFact<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.sites.pop() {
            let site = Scope::new(self.scope.file(), self.scope.index(), node.id).ok()?;
            let fact = match node.kind {
                NodeKind::Assignment => self.assignment(site),
                NodeKind::Parameter => self.parameter(site),
                NodeKind::Foreach => self.foreach(site),
                _ => None,
            };
            if fact.is_some() {
                return fact;
            }
        }
        let outer = self.capture.take()?;
        *self = VariableAnalyzer::new(outer).facts(&self.name);
        self.next()
    }
}
