//! Syntax tree representation for PHP sources.
//!
//! Unlike the tree-sitter tree it is built from, the tree is owned and
//! stored as an arena: every node lives in [`FileAst::index`] and refers to
//! its parent and children by id. Only named grammar nodes are kept, each
//! one tagged with a [`NodeKind`] so analyzers never match on grammar
//! strings directly.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::names::NamespaceScope;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// 1-based line of the first character of the node.
    pub line: usize,
    /// 1-based column of the first character of the node.
    pub column: usize,
}

/// Byte range of a node within [`FileAst::source`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Closed set of node categories the engine reasons about.
///
/// Grammar nodes without a dedicated category map to [`NodeKind::Other`];
/// the original grammar name is still available in [`AstNode::syntax`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    Namespace,
    UseDeclaration,
    UseClause,
    Class,
    Interface,
    Trait,
    Enum,
    BaseClause,
    InterfaceClause,
    Method,
    Function,
    Closure,
    ArrowFunction,
    Parameters,
    Parameter,
    AttributeList,
    Attribute,
    NamedType,
    Variable,
    Assignment,
    FunctionCall,
    MethodCall,
    StaticCall,
    New,
    PropertyAccess,
    StaticPropertyAccess,
    ClassConstantAccess,
    Subscript,
    Arguments,
    Argument,
    Name,
    QualifiedName,
    RelativeScope,
    StringLiteral,
    NumberLiteral,
    BooleanLiteral,
    NullLiteral,
    Block,
    Foreach,
    Return,
    Comment,
    Other,
}

impl NodeKind {
    /// Maps a tree-sitter-php node type to its category.
    pub fn from_syntax(kind: &str) -> Self {
        match kind {
            "program" => NodeKind::Program,
            "namespace_definition" => NodeKind::Namespace,
            "namespace_use_declaration" => NodeKind::UseDeclaration,
            "namespace_use_clause" | "namespace_use_group_clause" => NodeKind::UseClause,
            "class_declaration" => NodeKind::Class,
            "interface_declaration" => NodeKind::Interface,
            "trait_declaration" => NodeKind::Trait,
            "enum_declaration" => NodeKind::Enum,
            "base_clause" => NodeKind::BaseClause,
            "class_interface_clause" => NodeKind::InterfaceClause,
            "method_declaration" => NodeKind::Method,
            "function_definition" => NodeKind::Function,
            "anonymous_function_creation_expression" | "anonymous_function" => NodeKind::Closure,
            "arrow_function" => NodeKind::ArrowFunction,
            "formal_parameters" => NodeKind::Parameters,
            "simple_parameter" | "variadic_parameter" | "property_promotion_parameter" => {
                NodeKind::Parameter
            }
            "attribute_list" | "attribute_group" => NodeKind::AttributeList,
            "attribute" => NodeKind::Attribute,
            "named_type" => NodeKind::NamedType,
            "variable_name" => NodeKind::Variable,
            "assignment_expression"
            | "reference_assignment_expression"
            | "by_ref_assignment_expression"
            | "augmented_assignment_expression" => NodeKind::Assignment,
            "function_call_expression" => NodeKind::FunctionCall,
            "member_call_expression" | "nullsafe_member_call_expression" => NodeKind::MethodCall,
            "scoped_call_expression" => NodeKind::StaticCall,
            "object_creation_expression" => NodeKind::New,
            "member_access_expression" | "nullsafe_member_access_expression" => {
                NodeKind::PropertyAccess
            }
            "scoped_property_access_expression" => NodeKind::StaticPropertyAccess,
            "class_constant_access_expression" => NodeKind::ClassConstantAccess,
            "subscript_expression" => NodeKind::Subscript,
            "arguments" => NodeKind::Arguments,
            "argument" => NodeKind::Argument,
            "name" => NodeKind::Name,
            "qualified_name" => NodeKind::QualifiedName,
            "relative_scope" => NodeKind::RelativeScope,
            "string" | "encapsed_string" | "heredoc" | "nowdoc" => NodeKind::StringLiteral,
            "integer" | "float" => NodeKind::NumberLiteral,
            "boolean" => NodeKind::BooleanLiteral,
            "null" => NodeKind::NullLiteral,
            "compound_statement" | "declaration_list" => NodeKind::Block,
            "foreach_statement" => NodeKind::Foreach,
            "return_statement" => NodeKind::Return,
            "comment" => NodeKind::Comment,
            _ => NodeKind::Other,
        }
    }

    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            NodeKind::Class | NodeKind::Interface | NodeKind::Trait | NodeKind::Enum
        )
    }

    /// Nodes that open a new variable scope.
    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            NodeKind::Method | NodeKind::Function | NodeKind::Closure | NodeKind::ArrowFunction
        )
    }

    pub fn is_call(self) -> bool {
        matches!(
            self,
            NodeKind::FunctionCall | NodeKind::MethodCall | NodeKind::StaticCall
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            NodeKind::StringLiteral
                | NodeKind::NumberLiteral
                | NodeKind::BooleanLiteral
                | NodeKind::NullLiteral
        )
    }

    pub fn is_name(self) -> bool {
        matches!(self, NodeKind::Name | NodeKind::QualifiedName)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstNode {
    /// Position of the node in [`FileAst::index`].
    pub id: usize,
    /// Reference to the parent node, if any.
    pub parent: Option<usize>,
    pub kind: NodeKind,
    /// Grammar node type as reported by tree-sitter: "member_call_expression", ...
    pub syntax: String,
    /// Grammar field under which the node hangs from its parent.
    pub field: Option<String>,
    /// Identifier carried by the node (declared name, callee, variable name).
    pub value: Option<String>,
    /// Fully-qualified class name for class references and declarations.
    pub resolved: Option<String>,
    /// Child ids in source order.
    pub children: Vec<usize>,
    pub span: Span,
    pub meta: Meta,
}

impl AstNode {
    pub fn new(kind: NodeKind, syntax: &str, span: Span, meta: Meta) -> Self {
        Self {
            id: 0,
            parent: None,
            kind,
            syntax: syntax.to_string(),
            field: None,
            value: None,
            resolved: None,
            children: Vec::new(),
            span,
            meta,
        }
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// The resolved name when known, otherwise the written one.
    pub fn name(&self) -> Option<&str> {
        self.resolved.as_deref().or(self.value.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAst {
    pub file_path: String,
    pub file_type: String, // php
    /// Full file content; node spans index into it.
    pub source: String,
    /// Flat node arena ordered by `id`; the root is node `0`.
    pub index: Vec<AstNode>,
    /// Namespace regions with their `use` imports.
    #[serde(default)]
    pub namespaces: Vec<NamespaceScope>,
    /// Lines with suppression comments.
    #[serde(default)]
    pub suppressed: HashSet<usize>,
}

impl FileAst {
    pub fn new(file_path: String, file_type: String, source: String) -> Self {
        Self {
            file_path,
            file_type,
            source,
            index: Vec::new(),
            namespaces: Vec::new(),
            suppressed: HashSet::new(),
        }
    }

    /// Appends `node` to the arena, links it to its parent and returns its id.
    pub fn push(&mut self, mut node: AstNode) -> usize {
        let id = self.index.len();
        node.id = id;
        if let Some(parent) = node.parent.and_then(|p| self.index.get_mut(p)) {
            parent.children.push(id);
        }
        self.index.push(node);
        id
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn root(&self) -> Option<&AstNode> {
        self.index.first()
    }

    pub fn get(&self, id: usize) -> Option<&AstNode> {
        self.index.get(id)
    }

    /// Gets the parent node of `id`, if any.
    pub fn parent(&self, id: usize) -> Option<&AstNode> {
        self.index
            .get(id)
            .and_then(|n| n.parent.and_then(|p| self.index.get(p)))
    }

    /// Returns the direct children of node `id`.
    pub fn children(&self, id: usize) -> Vec<&AstNode> {
        self.index
            .get(id)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|c| self.index.get(*c))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First child of `id` attached under the grammar field `field`.
    pub fn child_by_field(&self, id: usize, field: &str) -> Option<&AstNode> {
        self.children(id)
            .into_iter()
            .find(|c| c.field.as_deref() == Some(field))
    }

    /// Source text covered by node `id`.
    pub fn text(&self, id: usize) -> &str {
        self.index
            .get(id)
            .and_then(|n| self.source.get(n.span.start..n.span.end))
            .unwrap_or("")
    }

    /// Preorder walk over `id` and all of its descendants.
    pub fn descendants(&self, id: usize) -> Descendants<'_> {
        let stack = if id < self.index.len() {
            vec![id]
        } else {
            Vec::new()
        };
        Descendants { ast: self, stack }
    }

    /// Walks from the parent of `id` up to the root.
    pub fn ancestors(&self, id: usize) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            next: self.index.get(id).and_then(|n| n.parent),
        }
    }

    /// Innermost namespace region containing byte `offset`.
    pub fn namespace_at(&self, offset: usize) -> Option<&NamespaceScope> {
        self.namespaces
            .iter()
            .filter(|ns| ns.span.contains(offset))
            .min_by_key(|ns| ns.span.end - ns.span.start)
    }

    /// Exports the tree to DOT format.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph AST {\n");
        for node in &self.index {
            let label = match &node.value {
                Some(v) => format!("{}:{}", node.syntax, v.replace('"', "\\\"")),
                None => node.syntax.clone(),
            };
            out.push_str(&format!("    {} [label=\"{}\"];\n", node.id, label));
            for child in &node.children {
                out.push_str(&format!("    {} -> {};\n", node.id, child));
            }
        }
        out.push('}');
        out
    }

    /// Exports the tree to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Iterator returned by [`FileAst::descendants`].
pub struct Descendants<'a> {
    ast: &'a FileAst,
    stack: Vec<usize>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.ast.index.get(id)?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Iterator returned by [`FileAst::ancestors`].
pub struct Ancestors<'a> {
    ast: &'a FileAst,
    next: Option<usize>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.ast.index.get(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}
