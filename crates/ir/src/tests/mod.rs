use super::*;
use crate::names::{parse_use_clause, same_class, short_name};
use serde_json::Value as JsonValue;

fn node(kind: NodeKind, parent: Option<usize>, start: usize, end: usize) -> AstNode {
    let mut n = AstNode::new(
        kind,
        "test",
        Span { start, end },
        Meta { line: 1, column: start + 1 },
    );
    n.parent = parent;
    n
}

/// `$a = foo($b);`
fn sample_ast() -> FileAst {
    let mut ast = FileAst::new("a.php".into(), "php".into(), "$a = foo($b);".into());
    let root = ast.push(node(NodeKind::Program, None, 0, 13));
    let assign = ast.push(node(NodeKind::Assignment, Some(root), 0, 12));
    let mut left = node(NodeKind::Variable, Some(assign), 0, 2);
    left.field = Some("left".into());
    left.value = Some("a".into());
    ast.push(left);
    let mut call = node(NodeKind::FunctionCall, Some(assign), 5, 12);
    call.field = Some("right".into());
    call.value = Some("foo".into());
    let call = ast.push(call);
    let args = ast.push(node(NodeKind::Arguments, Some(call), 8, 12));
    let arg = ast.push(node(NodeKind::Argument, Some(args), 9, 11));
    ast.push(node(NodeKind::Variable, Some(arg), 9, 11));
    ast
}

#[test]
fn push_links_children_and_ids() {
    let ast = sample_ast();
    assert_eq!(ast.len(), 7);
    assert_eq!(ast.index[1].children, vec![2, 3]);
    assert_eq!(ast.parent(3).map(|n| n.id), Some(1));
    assert_eq!(ast.children(0).len(), 1);
    assert!(ast.root().is_some_and(|r| r.is(NodeKind::Program)));
}

#[test]
fn child_by_field_and_text() {
    let ast = sample_ast();
    let right = ast.child_by_field(1, "right").expect("right side");
    assert_eq!(right.kind, NodeKind::FunctionCall);
    assert_eq!(ast.text(right.id), "foo($b)");
    assert_eq!(ast.text(99), "");
}

#[test]
fn descendants_are_preorder() {
    let ast = sample_ast();
    let ids: Vec<usize> = ast.descendants(0).map(|n| n.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6]);
    let sub: Vec<usize> = ast.descendants(3).map(|n| n.id).collect();
    assert_eq!(sub, vec![3, 4, 5, 6]);
}

#[test]
fn ancestors_walk_to_root() {
    let ast = sample_ast();
    let kinds: Vec<NodeKind> = ast.ancestors(6).map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Argument,
            NodeKind::Arguments,
            NodeKind::FunctionCall,
            NodeKind::Assignment,
            NodeKind::Program
        ]
    );
}

#[test]
fn namespace_at_prefers_innermost() {
    let mut ast = sample_ast();
    ast.namespaces
        .push(NamespaceScope::new("", Span { start: 0, end: 13 }));
    ast.namespaces
        .push(NamespaceScope::new("\\App", Span { start: 4, end: 13 }));
    assert_eq!(ast.namespace_at(1).map(|n| n.name.as_str()), Some(""));
    assert_eq!(ast.namespace_at(6).map(|n| n.name.as_str()), Some("App"));
    assert!(ast.namespace_at(40).is_none());
}

#[test]
fn dot_and_json_exports() {
    let ast = sample_ast();
    let dot = ast.to_dot();
    assert!(dot.starts_with("digraph AST {"));
    assert!(dot.contains("1 -> 3;"));
    assert!(dot.contains("test:foo"));
    let json: JsonValue = serde_json::from_str(&ast.to_json().unwrap()).unwrap();
    assert_eq!(json["index"][3]["kind"], "FunctionCall");
    assert_eq!(json["index"][3]["meta"]["column"], 6);
}

#[test]
fn node_kind_mapping() {
    assert_eq!(
        NodeKind::from_syntax("member_call_expression"),
        NodeKind::MethodCall
    );
    assert_eq!(
        NodeKind::from_syntax("nullsafe_member_call_expression"),
        NodeKind::MethodCall
    );
    assert_eq!(
        NodeKind::from_syntax("property_promotion_parameter"),
        NodeKind::Parameter
    );
    assert_eq!(NodeKind::from_syntax("while_statement"), NodeKind::Other);
    assert!(NodeKind::Closure.is_function_like());
    assert!(NodeKind::StaticCall.is_call());
    assert!(!NodeKind::New.is_call());
    assert!(NodeKind::NullLiteral.is_literal());
}

#[test]
fn use_clauses_are_parsed() {
    let plain = parse_use_clause("Illuminate\\Http\\Request", None).unwrap();
    assert_eq!(plain.alias, "Request");
    assert_eq!(plain.target, "Illuminate\\Http\\Request");

    let aliased = parse_use_clause("\\Spatie\\QueryBuilder\\QueryBuilder as QB", None).unwrap();
    assert_eq!(aliased.alias, "QB");
    assert_eq!(aliased.target, "Spatie\\QueryBuilder\\QueryBuilder");

    let grouped = parse_use_clause("Request", Some("Illuminate\\Http\\")).unwrap();
    assert_eq!(grouped.target, "Illuminate\\Http\\Request");

    assert!(parse_use_clause("a b c d", None).is_none());
}

#[test]
fn class_names_resolve_against_scope() {
    let mut ns = NamespaceScope::new("App\\Models", Span { start: 0, end: 10 });
    ns.imports.push(Import {
        alias: "Support".into(),
        target: "Illuminate\\Support".into(),
    });
    assert_eq!(
        resolve_class_name("Support\\Str", Some(&ns)),
        "Illuminate\\Support\\Str"
    );
    assert_eq!(
        resolve_class_name("support", Some(&ns)),
        "Illuminate\\Support"
    );
    assert_eq!(resolve_class_name("User", Some(&ns)), "App\\Models\\User");
    assert_eq!(
        resolve_class_name("namespace\\User", Some(&ns)),
        "App\\Models\\User"
    );
    assert_eq!(resolve_class_name("self", Some(&ns)), "self");
    assert_eq!(resolve_class_name("string", Some(&ns)), "string");
    assert_eq!(resolve_class_name("User", None), "User");
    assert!(same_class("\\App\\Models\\User", "app\\models\\user"));
    assert_eq!(short_name("App\\Models\\User"), "User");
}
