//! Whole-project class hierarchy.
//!
//! The index is built once per scan from every parsed file and is never
//! modified afterwards, so it can be shared across worker threads behind an
//! `Arc` without locking.

use ir::names::{normalize, same_class};
use ir::{AstNode, FileAst, NodeKind};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet, VecDeque};
use tracing::debug;

/// What the index knows about one declared class, interface, trait or enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDescriptor {
    /// Fully-qualified name without leading separator.
    pub name: String,
    pub parent: Option<String>,
    pub interfaces: Vec<String>,
    /// Methods declared in the class body, in declaration order.
    pub own_methods: Vec<String>,
    /// Methods inherited from ancestors with the nearest declaring class.
    pub inherited_methods: Vec<(String, String)>,
}

impl ClassDescriptor {
    pub fn declares(&self, method: &str) -> bool {
        self.own_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }

    /// Class an inherited `method` comes from.
    pub fn inherited_from(&self, method: &str) -> Option<&str> {
        self.inherited_methods
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(method))
            .map(|(_, origin)| origin.as_str())
    }
}

/// Class name to descriptor map. PHP class names are case-insensitive, so
/// lookups are too.
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    classes: BTreeMap<String, ClassDescriptor>,
}

fn key_of(name: &str) -> String {
    normalize(name).to_ascii_lowercase()
}

impl ProjectIndex {
    /// Builds the index from parsed files.
    ///
    /// Never fails: unresolvable parents only shorten inheritance chains.
    /// When two files declare the same class the first declaration wins.
    pub fn build(files: &[FileAst]) -> Self {
        let mut classes: BTreeMap<String, ClassDescriptor> = BTreeMap::new();
        for file in files {
            for desc in collect_classes(file) {
                let key = key_of(&desc.name);
                if classes.contains_key(&key) {
                    debug!(class = %desc.name, file = %file.file_path, "Duplicate class declaration ignored");
                    continue;
                }
                classes.insert(key, desc);
            }
        }
        let inherited: Vec<(String, Vec<(String, String)>)> = classes
            .keys()
            .map(|key| (key.clone(), inherited_methods(&classes, key)))
            .collect();
        for (key, methods) in inherited {
            if let Some(desc) = classes.get_mut(&key) {
                desc.inherited_methods = methods;
            }
        }
        debug!(classes = classes.len(), "Class index built");
        Self { classes }
    }

    pub fn get(&self, class: &str) -> Option<&ClassDescriptor> {
        self.classes.get(&key_of(class))
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(&key_of(class))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Descriptors sorted by class name.
    pub fn iter(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.values()
    }

    /// Class that provides `method` to `class`, either itself or an ancestor.
    pub fn find_method(&self, class: &str, method: &str) -> Option<&str> {
        let desc = self.get(class)?;
        if desc.declares(method) {
            return Some(desc.name.as_str());
        }
        desc.inherited_from(method)
    }

    /// Parent chain of `class`, nearest first.
    ///
    /// The first parent missing from the index is included by name and ends
    /// the chain, as does a cycle.
    pub fn ancestors(&self, class: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([key_of(class)]);
        let mut next = self.get(class).and_then(|d| d.parent.clone());
        while let Some(parent) = next {
            if !seen.insert(key_of(&parent)) {
                break;
            }
            next = self.get(&parent).and_then(|d| d.parent.clone());
            out.push(parent);
        }
        out
    }

    /// Whether `class` extends or implements `ancestor`, directly or through
    /// indexed classes. A class is not its own subclass.
    pub fn is_subclass_of(&self, class: &str, ancestor: &str) -> bool {
        let mut seen = HashSet::from([key_of(class)]);
        let mut queue = VecDeque::from([class.to_string()]);
        while let Some(current) = queue.pop_front() {
            let Some(desc) = self.get(&current) else {
                continue;
            };
            for next in desc.parent.iter().chain(desc.interfaces.iter()) {
                if same_class(next, ancestor) {
                    return true;
                }
                if seen.insert(key_of(next)) {
                    queue.push_back(next.clone());
                }
            }
        }
        false
    }

    /// `class` is `target` or one of its subclasses.
    pub fn is_a(&self, class: &str, target: &str) -> bool {
        same_class(class, target) || self.is_subclass_of(class, target)
    }
}

fn inherited_methods(
    classes: &BTreeMap<String, ClassDescriptor>,
    key: &str,
) -> Vec<(String, String)> {
    let Some(desc) = classes.get(key) else {
        return Vec::new();
    };
    let mut taken: HashSet<String> = desc
        .own_methods
        .iter()
        .map(|m| m.to_ascii_lowercase())
        .collect();
    let mut visited = HashSet::from([key.to_string()]);
    let mut out = Vec::new();
    let mut next = desc.parent.as_deref();
    while let Some(parent_name) = next {
        let parent_key = key_of(parent_name);
        if !visited.insert(parent_key.clone()) {
            break;
        }
        let Some(parent) = classes.get(&parent_key) else {
            break;
        };
        for method in &parent.own_methods {
            if taken.insert(method.to_ascii_lowercase()) {
                out.push((method.clone(), parent.name.clone()));
            }
        }
        next = parent.parent.as_deref();
    }
    out
}

/// Collects every class-like declaration of `file`, nested ones included.
fn collect_classes(file: &FileAst) -> Vec<ClassDescriptor> {
    let Some(root) = file.root() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut stack = vec![root.id];
    while let Some(id) = stack.pop() {
        let Some(node) = file.get(id) else {
            continue;
        };
        if node.kind.is_class_like() {
            if let Some(desc) = describe(file, node) {
                out.push(desc);
            }
        }
        stack.extend(node.children.iter().rev());
    }
    out
}

fn describe(file: &FileAst, class: &AstNode) -> Option<ClassDescriptor> {
    let name = class.resolved.clone().or_else(|| class.value.clone())?;
    let mut parents = Vec::new();
    let mut interfaces = Vec::new();
    for child in file.children(class.id) {
        match child.kind {
            NodeKind::BaseClause => parents.extend(clause_names(file, child)),
            NodeKind::InterfaceClause => interfaces.extend(clause_names(file, child)),
            _ => {}
        }
    }
    // interfaces list their `extends` targets in a base clause
    let (parent, interfaces) = if class.kind == NodeKind::Interface {
        parents.extend(interfaces);
        (None, parents)
    } else {
        (parents.into_iter().next(), interfaces)
    };
    Some(ClassDescriptor {
        name: normalize(&name).to_string(),
        parent,
        interfaces,
        own_methods: own_methods(file, class),
        inherited_methods: Vec::new(),
    })
}

fn clause_names(file: &FileAst, clause: &AstNode) -> Vec<String> {
    file.children(clause.id)
        .into_iter()
        .filter(|c| c.kind.is_name())
        .map(|c| {
            let name = c.resolved.as_deref().unwrap_or_else(|| file.text(c.id));
            normalize(name).to_string()
        })
        .collect()
}

fn own_methods(file: &FileAst, class: &AstNode) -> Vec<String> {
    let body = file
        .child_by_field(class.id, "body")
        .or_else(|| file.children(class.id).into_iter().find(|c| c.is(NodeKind::Block)));
    let Some(body) = body else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    file.children(body.id)
        .into_iter()
        .filter(|c| c.is(NodeKind::Method))
        .filter_map(|m| m.value.clone())
        .filter(|m| seen.insert(m.to_ascii_lowercase()))
        .collect()
}
