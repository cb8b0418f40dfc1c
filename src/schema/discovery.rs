//! Field discovery from a single sample record
//!
//! Walks one product record and records every addressable path. Objects are
//! expanded into dotted sub-fields; arrays are judged by their first element
//! only. An array of objects gets an `[all]` marker plus one `[0].key` child per
//! key of its first element, standing in for that field across every element.

use crate::error::SchemaDiscoveryError;
use crate::path::FieldPath;
use crate::schema::info::type_label;
use crate::schema::tree::FieldTree;
use serde_json::{Map, Value};

/// Configuration for field discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Deepest nesting level that still gets nodes (record fields are level 0).
    /// Nodes at this level are leaves even when their value is an object.
    pub max_depth: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig { max_depth: 2 }
    }
}

/// Discover the field tree of `sample` with the default two-level depth cap
pub fn discover_schema(sample: &Value) -> Result<FieldTree, SchemaDiscoveryError> {
    discover_schema_with(sample, &DiscoveryConfig::default())
}

pub fn discover_schema_with(
    sample: &Value,
    config: &DiscoveryConfig,
) -> Result<FieldTree, SchemaDiscoveryError> {
    let Value::Object(record) = sample else {
        return Err(SchemaDiscoveryError::NotAnObject {
            found: type_label(sample),
        });
    };

    let mut tree = FieldTree::default();

    // First pass: every record field is a root
    for (key, value) in record {
        tree.insert_root(FieldPath::root(key), value);
    }

    // Second pass: nested structure
    for (key, value) in record {
        let path = FieldPath::root(key);
        match value {
            Value::Object(fields) => discover_object(&mut tree, &path, fields, 1, config),
            Value::Array(items) => {
                if let Some(Value::Object(first)) = items.first() {
                    discover_array(&mut tree, &path, value, first, config);
                }
            }
            _ => {}
        }
    }

    log::debug!(
        "Discovered {} fields ({} top-level) from sample record",
        tree.len(),
        tree.roots().len()
    );

    Ok(tree)
}

/// Add `fields` as children of `parent`, placing them at `level`
fn discover_object(
    tree: &mut FieldTree,
    parent: &FieldPath,
    fields: &Map<String, Value>,
    level: usize,
    config: &DiscoveryConfig,
) {
    if level > config.max_depth {
        return;
    }

    for (key, value) in fields {
        let path = parent.child(key);
        tree.insert_child(parent, path.clone(), value);

        if let Value::Object(nested) = value {
            discover_object(tree, &path, nested, level + 1, config);
        }
    }
}

/// Add the `[all]` marker and the representative element fields of an array of objects
fn discover_array(
    tree: &mut FieldTree,
    array: &FieldPath,
    value: &Value,
    first: &Map<String, Value>,
    config: &DiscoveryConfig,
) {
    if config.max_depth == 0 {
        return;
    }

    tree.insert_child(array, array.all_items(), value);

    for (key, item_value) in first {
        let path = array.element(key);
        tree.insert_child(array, path.clone(), item_value);

        if let Value::Object(nested) = item_value {
            discover_object(tree, &path, nested, 2, config);
        }
    }
}
