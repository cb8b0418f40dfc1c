//! Product and array identifier designations
//!
//! Identifiers are advisory metadata on top of the field tree. They never touch
//! the selection state: an identifier may point at an excluded field.

use crate::error::InvalidIdentifierPathError;
use crate::path::FieldPath;
use crate::schema::{FieldKind, FieldTree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The product identifier plus one identifier per array-of-objects field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierAssignment {
    product_identifier: Option<FieldPath>,
    array_identifiers: BTreeMap<FieldPath, FieldPath>,
}

impl IdentifierAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_identifier(&self) -> Option<&FieldPath> {
        self.product_identifier.as_ref()
    }

    pub fn array_identifiers(&self) -> &BTreeMap<FieldPath, FieldPath> {
        &self.array_identifiers
    }

    pub fn array_identifier(&self, array: &FieldPath) -> Option<&FieldPath> {
        self.array_identifiers.get(array)
    }

    /// Designate `path` as the product identifier, replacing any previous one
    pub fn set_product_identifier(
        &self,
        tree: &FieldTree,
        path: &FieldPath,
    ) -> Result<Self, InvalidIdentifierPathError> {
        if !path.is_top_level() {
            return Err(InvalidIdentifierPathError::NotTopLevel(path.clone()));
        }
        if !tree.contains(path) {
            return Err(InvalidIdentifierPathError::UnknownField(path.clone()));
        }

        log::debug!("Product identifier set to {}", path);
        Ok(IdentifierAssignment {
            product_identifier: Some(path.clone()),
            ..self.clone()
        })
    }

    /// Designate `field` as the identifier of items in `array`.
    ///
    /// `array` must be an expanded array of objects and `field` a field of its
    /// representative element (`array[0].key` or deeper). Other arrays keep
    /// their identifiers.
    pub fn set_array_identifier(
        &self,
        tree: &FieldTree,
        array: &FieldPath,
        field: &FieldPath,
    ) -> Result<Self, InvalidIdentifierPathError> {
        check_array(tree, array)?;
        if !tree.contains(field) {
            return Err(InvalidIdentifierPathError::UnknownField(field.clone()));
        }
        if !field.is_element_of(array) {
            return Err(InvalidIdentifierPathError::NotUnderArray {
                array: array.clone(),
                field: field.clone(),
            });
        }

        log::debug!("Array identifier for {} set to {}", array, field);
        let mut next = self.clone();
        next.array_identifiers.insert(array.clone(), field.clone());
        Ok(next)
    }

    pub fn clear_product_identifier(&self) -> Self {
        IdentifierAssignment {
            product_identifier: None,
            ..self.clone()
        }
    }

    pub fn clear_array_identifier(&self, array: &FieldPath) -> Self {
        let mut next = self.clone();
        next.array_identifiers.remove(array);
        next
    }

    pub fn is_product_identifier(&self, path: &FieldPath) -> bool {
        self.product_identifier.as_ref() == Some(path)
    }

    pub fn is_array_identifier(&self, array: &FieldPath, path: &FieldPath) -> bool {
        self.array_identifiers.get(array) == Some(path)
    }

    /// Whether `path` holds any identifier role
    pub fn is_identifier(&self, path: &FieldPath) -> bool {
        self.is_product_identifier(path) || self.array_identifiers.values().any(|field| field == path)
    }
}

fn check_array(tree: &FieldTree, array: &FieldPath) -> Result<(), InvalidIdentifierPathError> {
    let node = tree
        .get(array)
        .ok_or_else(|| InvalidIdentifierPathError::UnknownField(array.clone()))?;

    if node.kind != FieldKind::ArrayOfObjects || array.is_all_items() || !node.has_children() {
        return Err(InvalidIdentifierPathError::NotAnArray(array.clone()));
    }
    Ok(())
}

/// Fields that may be offered as the product identifier
pub fn product_identifier_candidates(tree: &FieldTree) -> Vec<&FieldPath> {
    tree.roots().iter().collect()
}

/// Fields that may be offered as the identifier of `array`'s items
pub fn array_identifier_candidates<'a>(tree: &'a FieldTree, array: &FieldPath) -> Vec<&'a FieldPath> {
    tree.descendants(array)
        .into_iter()
        .filter(|path| path.is_element_of(array))
        .collect()
}
