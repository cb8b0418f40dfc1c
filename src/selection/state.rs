//! Tri-state field selection
//!
//! Only booleans are stored. The indeterminate state of a parent is derived on
//! every read from its direct children, never written back.

use crate::error::SelectionError;
use crate::path::FieldPath;
use crate::schema::FieldTree;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How far a toggle re-evaluates ancestors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Propagation {
    /// Only the immediate parent is recomputed
    #[default]
    SingleLevel,
    /// Every ancestor up to the record field is recomputed
    FullDepth,
}

/// Checkbox read-out of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckboxState {
    pub checked: bool,
    pub indeterminate: bool,
}

impl CheckboxState {
    pub const CHECKED: CheckboxState = CheckboxState { checked: true, indeterminate: false };
    pub const UNCHECKED: CheckboxState = CheckboxState { checked: false, indeterminate: false };
    pub const INDETERMINATE: CheckboxState = CheckboxState { checked: false, indeterminate: true };
}

/// Inclusion flag for every path of a field tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    included: HashMap<FieldPath, bool>,
    propagation: Propagation,
}

impl SelectionState {
    /// Every discovered field starts included
    pub fn new(tree: &FieldTree) -> Self {
        Self::with_propagation(tree, Propagation::default())
    }

    pub fn with_propagation(tree: &FieldTree, propagation: Propagation) -> Self {
        SelectionState {
            included: tree.paths().map(|path| (path.clone(), true)).collect(),
            propagation,
        }
    }

    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    pub fn is_selected(&self, path: &FieldPath) -> bool {
        self.included.get(path).copied().unwrap_or(false)
    }

    /// Include or exclude `path`, returning the resulting state.
    ///
    /// Every descendant follows `path`. The parent then becomes true if all of
    /// its children are true, false if all are false, and keeps its value when
    /// they are mixed.
    pub fn set_field(&self, tree: &FieldTree, path: &FieldPath, included: bool) -> Result<Self, SelectionError> {
        let mut next = self.clone();
        next.apply(tree, path, included)?;
        Ok(next)
    }

    pub(crate) fn apply(&mut self, tree: &FieldTree, path: &FieldPath, included: bool) -> Result<(), SelectionError> {
        let node = tree
            .get(path)
            .ok_or_else(|| SelectionError::UnknownField(path.clone()))?;

        self.included.insert(path.clone(), included);
        for descendant in tree.descendants(path) {
            self.included.insert(descendant.clone(), included);
        }

        let mut ancestor = node.parent.as_ref();
        while let Some(parent) = ancestor {
            let children = tree.children(parent);
            let selected = children.iter().filter(|child| self.is_selected(child)).count();

            if selected == children.len() {
                self.included.insert(parent.clone(), true);
            } else if selected == 0 {
                self.included.insert(parent.clone(), false);
            }

            if self.propagation == Propagation::SingleLevel {
                break;
            }
            ancestor = tree.parent(parent);
        }

        log::trace!("Set field {} included={}", path, included);
        Ok(())
    }

    /// Checkbox read-out for `path`, `None` when the tree has no such field
    pub fn checkbox_state(&self, tree: &FieldTree, path: &FieldPath) -> Option<CheckboxState> {
        let node = tree.get(path)?;

        if !node.has_children() {
            return Some(CheckboxState {
                checked: self.is_selected(path),
                indeterminate: false,
            });
        }

        let selected = node.children.iter().filter(|child| self.is_selected(child)).count();
        let state = if selected == 0 {
            CheckboxState::UNCHECKED
        } else if selected == node.children.len() {
            CheckboxState::CHECKED
        } else {
            CheckboxState::INDETERMINATE
        };
        Some(state)
    }

    pub fn selected_count(&self) -> usize {
        self.included.values().filter(|included| **included).count()
    }

    pub fn total_count(&self) -> usize {
        self.included.len()
    }

    /// Included paths in tree order
    pub fn selected_paths<'a>(&self, tree: &'a FieldTree) -> Vec<&'a FieldPath> {
        tree.paths().filter(|path| self.is_selected(path)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::discover_schema;
    use serde_json::json;

    fn shoe_tree() -> FieldTree {
        discover_schema(&json!({
            "id": "p1",
            "name": "Shoe",
            "images": ["a.png", "b.png"],
            "variants": [
                {"sku": "S1", "size": "M"},
                {"sku": "S2", "size": "L"}
            ]
        }))
        .unwrap()
    }

    fn nested_tree() -> FieldTree {
        discover_schema(&json!({
            "id": "p1",
            "metadata": {"dimensions": {"width": 3, "height": 4}}
        }))
        .unwrap()
    }

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_everything_starts_selected() {
        let tree = shoe_tree();
        let state = SelectionState::new(&tree);

        assert_eq!(state.total_count(), tree.len());
        assert_eq!(state.selected_count(), tree.len());
        for p in tree.paths() {
            assert!(state.is_selected(p), "{} should start selected", p);
        }
    }

    #[test]
    fn test_toggle_array_off() {
        let tree = shoe_tree();
        let state = SelectionState::new(&tree)
            .set_field(&tree, &path("variants"), false)
            .unwrap();

        for p in ["variants", "variants[all]", "variants[0].sku", "variants[0].size"] {
            assert!(!state.is_selected(&path(p)), "{} should be excluded", p);
        }
        assert_eq!(state.checkbox_state(&tree, &path("variants")), Some(CheckboxState::UNCHECKED));
        assert!(state.is_selected(&path("id")));
    }

    #[test]
    fn test_partial_children_are_indeterminate() {
        let tree = shoe_tree();
        let state = SelectionState::new(&tree)
            .set_field(&tree, &path("variants"), false)
            .unwrap()
            .set_field(&tree, &path("variants[0].sku"), true)
            .unwrap();

        assert_eq!(
            state.checkbox_state(&tree, &path("variants")),
            Some(CheckboxState::INDETERMINATE)
        );
        // Mixed children leave the stored parent value alone
        assert!(!state.is_selected(&path("variants")));
    }

    #[test]
    fn test_all_siblings_lift_parent() {
        let tree = shoe_tree();
        let mut state = SelectionState::new(&tree)
            .set_field(&tree, &path("variants"), false)
            .unwrap();

        for p in ["variants[all]", "variants[0].sku", "variants[0].size"] {
            state = state.set_field(&tree, &path(p), true).unwrap();
        }
        assert!(state.is_selected(&path("variants")));
        assert_eq!(state.checkbox_state(&tree, &path("variants")), Some(CheckboxState::CHECKED));
    }

    #[test]
    fn test_excluding_one_child_keeps_parent_value() {
        let tree = shoe_tree();
        let state = SelectionState::new(&tree)
            .set_field(&tree, &path("variants[0].size"), false)
            .unwrap();

        assert!(state.is_selected(&path("variants")));
        assert_eq!(
            state.checkbox_state(&tree, &path("variants")),
            Some(CheckboxState::INDETERMINATE)
        );
    }

    #[test]
    fn test_set_field_is_idempotent_and_pure() {
        let tree = shoe_tree();
        let initial = SelectionState::new(&tree);
        let once = initial.set_field(&tree, &path("variants"), false).unwrap();
        let twice = once.set_field(&tree, &path("variants"), false).unwrap();

        assert_eq!(once, twice);
        assert_eq!(initial, SelectionState::new(&tree));
    }

    #[test]
    fn test_leaf_checkbox() {
        let tree = shoe_tree();
        let state = SelectionState::new(&tree).set_field(&tree, &path("name"), false).unwrap();

        assert_eq!(state.checkbox_state(&tree, &path("name")), Some(CheckboxState::UNCHECKED));
        assert_eq!(state.checkbox_state(&tree, &path("id")), Some(CheckboxState::CHECKED));
        assert_eq!(state.checkbox_state(&tree, &path("missing")), None);
    }

    #[test]
    fn test_unknown_field() {
        let tree = shoe_tree();
        let result = SelectionState::new(&tree).set_field(&tree, &path("price"), false);
        assert_eq!(result, Err(SelectionError::UnknownField(path("price"))));
    }

    #[test]
    fn test_downward_reaches_grandchildren() {
        let tree = nested_tree();
        let state = SelectionState::new(&tree)
            .set_field(&tree, &path("metadata"), false)
            .unwrap();

        assert!(!state.is_selected(&path("metadata.dimensions")));
        assert!(!state.is_selected(&path("metadata.dimensions.width")));
        assert!(!state.is_selected(&path("metadata.dimensions.height")));
    }

    #[test]
    fn test_single_level_leaves_grandparent_stale() {
        let tree = nested_tree();
        let state = SelectionState::new(&tree)
            .set_field(&tree, &path("metadata.dimensions.width"), false)
            .unwrap()
            .set_field(&tree, &path("metadata.dimensions.height"), false)
            .unwrap();

        assert!(!state.is_selected(&path("metadata.dimensions")));
        assert!(state.is_selected(&path("metadata")));
        assert_eq!(state.checkbox_state(&tree, &path("metadata")), Some(CheckboxState::UNCHECKED));
    }

    #[test]
    fn test_full_depth_updates_every_ancestor() {
        let tree = nested_tree();
        let state = SelectionState::with_propagation(&tree, Propagation::FullDepth)
            .set_field(&tree, &path("metadata.dimensions.width"), false)
            .unwrap()
            .set_field(&tree, &path("metadata.dimensions.height"), false)
            .unwrap();

        assert!(!state.is_selected(&path("metadata.dimensions")));
        assert!(!state.is_selected(&path("metadata")));

        let state = state
            .set_field(&tree, &path("metadata.dimensions.width"), true)
            .unwrap()
            .set_field(&tree, &path("metadata.dimensions.height"), true)
            .unwrap();
        assert!(state.is_selected(&path("metadata")));
    }

    #[test]
    fn test_selected_paths_in_tree_order() {
        let tree = shoe_tree();
        let state = SelectionState::new(&tree)
            .set_field(&tree, &path("images"), false)
            .unwrap()
            .set_field(&tree, &path("variants[all]"), false)
            .unwrap();

        let selected: Vec<String> = state.selected_paths(&tree).iter().map(|p| p.to_string()).collect();
        assert_eq!(selected, vec!["id", "name", "variants", "variants[0].sku", "variants[0].size"]);
        assert_eq!(state.selected_count(), 5);
    }
}
