use anyhow::{anyhow, bail, Context, Result};
use ir::names::{self, parse_use_clause, NamespaceScope};
use ir::{AstNode, FileAst, Meta, NodeKind, Span};
use std::sync::Mutex;
use tracing::debug;

#[cfg(test)]
mod tests;

// Parser pool to avoid concurrency issues with tree-sitter
static PARSER_POOL: Mutex<Vec<tree_sitter::Parser>> = Mutex::new(Vec::new());

fn get_parser() -> tree_sitter::Parser {
    let mut pool = PARSER_POOL.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(mut parser) = pool.pop() {
        parser.reset();
        parser
    } else {
        tree_sitter::Parser::new()
    }
}

fn return_parser(mut parser: tree_sitter::Parser) {
    let mut pool = PARSER_POOL.lock().unwrap_or_else(|e| e.into_inner());
    if pool.len() < 10 {
        parser.reset();
        pool.push(parser);
    }
}

/// Parses PHP source into a [`FileAst`].
///
/// Class declarations and class references carry their fully-qualified
/// name in [`AstNode::resolved`]. A source the grammar cannot parse
/// cleanly is an error; an empty file is a valid, almost empty tree.
///
/// # Example
/// ```
/// use parsers::parse_php;
/// let ast = parse_php("<?php namespace App; class User {}", "User.php").unwrap();
/// let class = ast.index.iter().find(|n| n.kind == ir::NodeKind::Class).unwrap();
/// assert_eq!(class.resolved.as_deref(), Some("App\\User"));
/// ```
pub fn parse_php(content: &str, file_path: &str) -> Result<FileAst> {
    debug!("Getting PHP parser from pool for file: {}", file_path);
    let mut parser = get_parser();
    parser
        .set_language(tree_sitter_php::language())
        .context("load php grammar")?;
    let tree = parser.parse(content, None);
    return_parser(parser);
    let tree = tree.ok_or_else(|| anyhow!("failed to parse php source: {file_path}"))?;
    if tree.root_node().has_error() {
        bail!("syntax errors in php source: {file_path}");
    }
    debug!("PHP parsing completed for file: {}", file_path);
    let mut ast = build_tree(&tree, content, file_path);
    collect_namespaces(&mut ast);
    resolve_names(&mut ast);
    Ok(ast)
}

/// Copies the named nodes of `tree` into an arena, keeping grammar fields.
fn build_tree(tree: &tree_sitter::Tree, src: &str, file_path: &str) -> FileAst {
    let mut ast = FileAst::new(file_path.to_string(), "php".into(), src.to_string());
    let mut cursor = tree.walk();
    let mut parents: Vec<Option<usize>> = Vec::new();
    let mut current: Option<usize> = None;
    'walk: loop {
        let node = cursor.node();
        let mut id = None;
        if node.is_named() {
            id = Some(ast.push(convert(node, cursor.field_name(), current, src)));
        }
        if cursor.goto_first_child() {
            parents.push(current);
            if id.is_some() {
                current = id;
            }
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
            current = parents.pop().flatten();
        }
    }
    ast
}

fn convert(
    node: tree_sitter::Node,
    field: Option<&str>,
    parent: Option<usize>,
    src: &str,
) -> AstNode {
    let kind = NodeKind::from_syntax(node.kind());
    let pos = node.start_position();
    let mut out = AstNode::new(
        kind,
        node.kind(),
        Span {
            start: node.start_byte(),
            end: node.end_byte(),
        },
        Meta {
            line: pos.row + 1,
            column: pos.column + 1,
        },
    );
    out.parent = parent;
    out.field = field.map(str::to_string);
    out.value = node_value(node, kind, src);
    out
}

fn text_of(node: tree_sitter::Node, src: &str) -> Option<String> {
    node.utf8_text(src.as_bytes()).ok().map(str::to_string)
}

fn field_text(node: tree_sitter::Node, field: &str, src: &str) -> Option<String> {
    node.child_by_field_name(field).and_then(|n| text_of(n, src))
}

fn first_named_text(node: tree_sitter::Node, kinds: &[&str], src: &str) -> Option<String> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|c| kinds.contains(&c.kind()));
    found.and_then(|c| text_of(c, src))
}

fn node_value(node: tree_sitter::Node, kind: NodeKind, src: &str) -> Option<String> {
    let strip = |s: String| s.trim_start_matches('$').to_string();
    match kind {
        NodeKind::Class
        | NodeKind::Interface
        | NodeKind::Trait
        | NodeKind::Enum
        | NodeKind::Method
        | NodeKind::Function => field_text(node, "name", src),
        NodeKind::Namespace => field_text(node, "name", src)
            .or_else(|| first_named_text(node, &["namespace_name"], src)),
        NodeKind::Parameter => field_text(node, "name", src).map(strip),
        NodeKind::Variable => text_of(node, src).map(strip),
        NodeKind::FunctionCall => field_text(node, "function", src)
            .or_else(|| field_text(node, "name", src)),
        NodeKind::MethodCall | NodeKind::StaticCall => field_text(node, "name", src),
        NodeKind::PropertyAccess | NodeKind::StaticPropertyAccess => {
            field_text(node, "name", src).map(strip)
        }
        NodeKind::Assignment => field_text(node, "left", src).map(strip),
        NodeKind::Attribute | NodeKind::New => {
            first_named_text(node, &["name", "qualified_name"], src)
        }
        NodeKind::Argument => field_text(node, "name", src),
        NodeKind::Name
        | NodeKind::QualifiedName
        | NodeKind::RelativeScope
        | NodeKind::UseClause
        | NodeKind::StringLiteral
        | NodeKind::NumberLiteral
        | NodeKind::BooleanLiteral
        | NodeKind::NullLiteral => text_of(node, src),
        _ => None,
    }
}

/// Builds namespace regions and attaches `use` imports to them.
fn collect_namespaces(ast: &mut FileAst) {
    let file_end = ast.source.len();
    let mut scopes = vec![NamespaceScope::new("", Span { start: 0, end: file_end })];
    let decls: Vec<&AstNode> = ast
        .index
        .iter()
        .filter(|n| n.is(NodeKind::Namespace))
        .collect();
    for (pos, ns) in decls.iter().enumerate() {
        let braced = ast
            .child_by_field(ns.id, "body")
            .is_some_and(|b| b.is(NodeKind::Block));
        let end = if braced {
            ns.span.end
        } else {
            decls
                .get(pos + 1)
                .map(|next| next.span.start)
                .unwrap_or(file_end)
        };
        scopes.push(NamespaceScope::new(
            ns.value.as_deref().unwrap_or(""),
            Span {
                start: ns.span.start,
                end,
            },
        ));
    }

    let mut imports = Vec::new();
    for decl in ast.index.iter().filter(|n| n.is(NodeKind::UseDeclaration)) {
        let head = ast.text(decl.id).trim_start().to_ascii_lowercase();
        if head.starts_with("use function") || head.starts_with("use const") {
            continue;
        }
        let prefix = ast
            .children(decl.id)
            .into_iter()
            .find(|c| c.syntax == "namespace_name")
            .map(|c| ast.text(c.id).to_string());
        for clause in ast
            .descendants(decl.id)
            .filter(|n| n.is(NodeKind::UseClause))
        {
            if let Some(import) = parse_use_clause(ast.text(clause.id), prefix.as_deref()) {
                imports.push((decl.span.start, import));
            }
        }
    }
    for (offset, import) in imports {
        let target = scopes
            .iter_mut()
            .filter(|s| s.span.contains(offset))
            .min_by_key(|s| s.span.end - s.span.start);
        if let Some(scope) = target {
            scope.imports.push(import);
        }
    }
    ast.namespaces = scopes;
}

/// Whether a name node sits where PHP expects a class reference.
fn is_class_reference(ast: &FileAst, node: &AstNode) -> bool {
    let Some(parent) = node.parent.and_then(|p| ast.get(p)) else {
        return false;
    };
    let first_child = parent.children.first() == Some(&node.id);
    match parent.kind {
        NodeKind::BaseClause | NodeKind::InterfaceClause | NodeKind::NamedType => true,
        NodeKind::New => true,
        NodeKind::Attribute | NodeKind::ClassConstantAccess | NodeKind::StaticPropertyAccess => {
            first_child
        }
        NodeKind::StaticCall => node.field.as_deref() == Some("scope"),
        NodeKind::Parameter | NodeKind::Method | NodeKind::Function => {
            matches!(node.field.as_deref(), Some("type") | Some("return_type"))
        }
        _ => matches!(
            parent.syntax.as_str(),
            "optional_type" | "union_type" | "intersection_type" | "type_list"
        ),
    }
}

fn resolve_names(ast: &mut FileAst) {
    let mut resolved = Vec::new();
    for node in &ast.index {
        let ns = ast.namespace_at(node.span.start);
        if node.kind.is_class_like() {
            if let Some(name) = &node.value {
                let fq = match ns.map(|s| s.name.as_str()) {
                    Some(prefix) if !prefix.is_empty() => format!("{prefix}\\{name}"),
                    _ => name.clone(),
                };
                resolved.push((node.id, fq));
            }
        } else if node.kind.is_name() && is_class_reference(ast, node) {
            let written = ast.text(node.id);
            if !names::is_relative(written) && !names::is_builtin_type(written) {
                resolved.push((node.id, names::resolve_class_name(written, ns)));
            }
        }
    }
    for (id, name) in resolved {
        if let Some(node) = ast.index.get_mut(id) {
            node.resolved = Some(name);
        }
    }
}
