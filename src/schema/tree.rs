//! The field tree discovered from a sample record

use crate::path::FieldPath;
use crate::schema::info::FieldInfo;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Structural kind of a field, taken from its sample value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    /// String, number, boolean or null
    Scalar,
    Object,
    /// Array whose first element is an object
    ArrayOfObjects,
    /// Empty array, or first element is not an object (arrays of arrays included)
    ArrayOfScalars,
}

impl FieldKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => FieldKind::Object,
            Value::Array(items) => match items.first() {
                Some(Value::Object(_)) => FieldKind::ArrayOfObjects,
                _ => FieldKind::ArrayOfScalars,
            },
            _ => FieldKind::Scalar,
        }
    }
}

/// One addressable field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldNode {
    pub path: FieldPath,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<FieldPath>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldPath>,

    pub kind: FieldKind,

    #[serde(flatten)]
    pub info: FieldInfo,
}

impl FieldNode {
    fn new(path: FieldPath, parent: Option<FieldPath>, value: &Value) -> Self {
        let info = FieldInfo::describe(&path, value);
        FieldNode {
            path,
            parent,
            children: Vec::new(),
            kind: FieldKind::of(value),
            info,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Every discovered field, keyed by path, with root fields in record order.
///
/// Built once per sample record and never modified afterwards; a new sample
/// means a new tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTree {
    roots: Vec<FieldPath>,
    nodes: HashMap<FieldPath, FieldNode>,
}

impl FieldTree {
    pub(crate) fn insert_root(&mut self, path: FieldPath, value: &Value) {
        self.roots.push(path.clone());
        self.nodes.insert(path.clone(), FieldNode::new(path, None, value));
    }

    /// Add a node and link it under `parent`, which must already exist
    pub(crate) fn insert_child(&mut self, parent: &FieldPath, path: FieldPath, value: &Value) {
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(path.clone());
        }
        self.nodes
            .insert(path.clone(), FieldNode::new(path, Some(parent.clone()), value));
    }

    pub fn get(&self, path: &FieldPath) -> Option<&FieldNode> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.nodes.contains_key(path)
    }

    /// Direct fields of the record, in record order
    pub fn roots(&self) -> &[FieldPath] {
        &self.roots
    }

    /// Direct children of `path`; empty for leaves and unknown paths
    pub fn children(&self, path: &FieldPath) -> &[FieldPath] {
        self.nodes
            .get(path)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, path: &FieldPath) -> Option<&FieldPath> {
        self.nodes.get(path).and_then(|node| node.parent.as_ref())
    }

    /// All nodes below `path`, depth-first
    pub fn descendants(&self, path: &FieldPath) -> Vec<&FieldPath> {
        let mut found = Vec::new();
        let mut stack: Vec<&FieldPath> = self.children(path).iter().rev().collect();
        while let Some(next) = stack.pop() {
            found.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        found
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in depth-first pre-order, following record key order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            stack: self.roots.iter().rev().collect(),
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.iter().map(|node| &node.path)
    }
}

/// Pre-order walk over a `FieldTree`
pub struct Iter<'a> {
    tree: &'a FieldTree,
    stack: Vec<&'a FieldPath>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a FieldNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(path) = self.stack.pop() {
            if let Some(node) = self.tree.nodes.get(path) {
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a FieldTree {
    type Item = &'a FieldNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for FieldTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn small_tree() -> FieldTree {
        let metadata = FieldPath::root("metadata");
        let dimensions = metadata.child("dimensions");

        let mut tree = FieldTree::default();
        tree.insert_root(FieldPath::root("id"), &json!("p1"));
        tree.insert_root(metadata.clone(), &json!({}));
        tree.insert_child(&metadata, dimensions.clone(), &json!({}));
        tree.insert_child(&dimensions, dimensions.child("width"), &json!(3));
        tree.insert_child(&metadata, metadata.child("weight"), &json!(1.5));
        tree
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(FieldKind::of(&json!(null)), FieldKind::Scalar);
        assert_eq!(FieldKind::of(&json!({"a": 1})), FieldKind::Object);
        assert_eq!(FieldKind::of(&json!([{"a": 1}])), FieldKind::ArrayOfObjects);
        assert_eq!(FieldKind::of(&json!([])), FieldKind::ArrayOfScalars);
        assert_eq!(FieldKind::of(&json!([[1, 2]])), FieldKind::ArrayOfScalars);
        assert_eq!(FieldKind::of(&json!(["a.png"])), FieldKind::ArrayOfScalars);
    }

    #[test]
    fn test_preorder_iteration() {
        let tree = small_tree();
        let order: Vec<String> = tree.paths().map(|p| p.to_string()).collect();
        assert_eq!(
            order,
            vec!["id", "metadata", "metadata.dimensions", "metadata.dimensions.width", "metadata.weight"]
        );
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_links_both_ways() {
        let tree = small_tree();
        let metadata = FieldPath::root("metadata");
        let dimensions = metadata.child("dimensions");

        assert_eq!(tree.children(&metadata), &[dimensions.clone(), metadata.child("weight")]);
        assert_eq!(tree.parent(&dimensions), Some(&metadata));
        assert_eq!(tree.parent(&metadata), None);
        assert!(tree.children(&FieldPath::root("missing")).is_empty());

        let below: Vec<String> = tree.descendants(&metadata).iter().map(|p| p.to_string()).collect();
        assert_eq!(below, vec!["metadata.dimensions", "metadata.dimensions.width", "metadata.weight"]);
    }

    #[test]
    fn test_serialize_as_node_list() {
        let tree = small_tree();
        let value = serde_json::to_value(&tree).unwrap();
        let nodes = value.as_array().unwrap();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0]["path"], "id");
        assert_eq!(nodes[0]["type"], "string");
        assert_eq!(nodes[1]["kind"], "object");
        assert_eq!(nodes[2]["parent"], "metadata");
    }
}
