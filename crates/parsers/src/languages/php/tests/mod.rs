//! Tests for the PHP front end, grouped by capability:
//! - L1: tree shape, kinds, values and locations
//! - L2: namespace, import and class-name resolution
//! - L3: syntax error handling

use crate::parse_php;
use ir::{AstNode, FileAst, NodeKind};


fn parse_snippet(code: &str) -> FileAst {
    parse_php(code, "<mem>").expect("parse php snippet")
}

fn nodes_of(ast: &FileAst, kind: NodeKind) -> Vec<&AstNode> {
    ast.index.iter().filter(|n| n.kind == kind).collect()
}

fn first_of(ast: &FileAst, kind: NodeKind) -> &AstNode {
    ast.index
        .iter()
        .find(|n| n.kind == kind)
        .unwrap_or_else(|| panic!("no {kind:?} node"))
}
