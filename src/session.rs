//! A field mapping session
//!
//! Owns the field tree of one sample record together with its selection state
//! and identifier assignment, and produces the payload the wizard submits.

use crate::error::{Result, SessionError};
use crate::extraction::Extraction;
use crate::path::FieldPath;
use crate::schema::{discover_schema_with, DiscoveryConfig, FieldTree};
use crate::selection::{CheckboxState, IdentifierAssignment, Propagation, SelectionState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Configuration for a field mapping session
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub discovery: DiscoveryConfig,

    /// How far toggles re-evaluate ancestors
    pub propagation: Propagation,

    /// Add identifier fields to `selected_fields` even when they were excluded
    pub force_include_identifiers: bool,
}

/// What the wizard attaches to the integration update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelection {
    pub selected_fields: Vec<FieldPath>,
    pub product_identifier: Option<FieldPath>,
    pub array_identifiers: BTreeMap<FieldPath, FieldPath>,
}

#[derive(Debug, Clone)]
pub struct FieldMappingSession {
    config: SessionConfig,
    tree: FieldTree,
    selection: SelectionState,
    identifiers: IdentifierAssignment,
}

impl FieldMappingSession {
    pub fn new(sample: &Value) -> Result<Self> {
        Self::with_config(sample, SessionConfig::default())
    }

    pub fn with_config(sample: &Value, config: SessionConfig) -> Result<Self> {
        let tree = discover_schema_with(sample, &config.discovery)?;
        let selection = SelectionState::with_propagation(&tree, config.propagation);

        Ok(FieldMappingSession {
            config,
            tree,
            selection,
            identifiers: IdentifierAssignment::new(),
        })
    }

    /// Start from the first record of an extraction run
    pub fn from_extraction(extraction: &Extraction, config: SessionConfig) -> Result<Self> {
        let sample = extraction.sample()?;
        Self::with_config(sample, config)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn tree(&self) -> &FieldTree {
        &self.tree
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn identifiers(&self) -> &IdentifierAssignment {
        &self.identifiers
    }

    pub fn set_field(&mut self, path: &FieldPath, included: bool) -> Result<()> {
        self.selection = self.selection.set_field(&self.tree, path, included)?;
        Ok(())
    }

    pub fn checkbox_state(&self, path: &FieldPath) -> Option<CheckboxState> {
        self.selection.checkbox_state(&self.tree, path)
    }

    pub fn set_product_identifier(&mut self, path: &FieldPath) -> Result<()> {
        self.identifiers = self.identifiers.set_product_identifier(&self.tree, path)?;
        Ok(())
    }

    pub fn set_array_identifier(&mut self, array: &FieldPath, field: &FieldPath) -> Result<()> {
        self.identifiers = self.identifiers.set_array_identifier(&self.tree, array, field)?;
        Ok(())
    }

    pub fn is_product_identifier(&self, path: &FieldPath) -> bool {
        self.identifiers.is_product_identifier(path)
    }

    pub fn is_array_identifier(&self, array: &FieldPath, path: &FieldPath) -> bool {
        self.identifiers.is_array_identifier(array, path)
    }

    /// Current payload, without the non-empty check of `finish`
    pub fn field_selection(&self) -> FieldSelection {
        let force = self.config.force_include_identifiers;
        let selected_fields = self
            .tree
            .paths()
            .filter(|path| self.selection.is_selected(path) || (force && self.identifiers.is_identifier(path)))
            .cloned()
            .collect();

        FieldSelection {
            selected_fields,
            product_identifier: self.identifiers.product_identifier().cloned(),
            array_identifiers: self.identifiers.array_identifiers().clone(),
        }
    }

    /// Final payload; at least one field must be selected
    pub fn finish(&self) -> Result<FieldSelection> {
        let selection = self.field_selection();
        if selection.selected_fields.is_empty() {
            return Err(SessionError::NoFieldsSelected.into());
        }

        if selection.product_identifier.is_none() {
            log::warn!("No product identifier set");
        }
        log::info!(
            "Selected {} of {} fields",
            selection.selected_fields.len(),
            self.tree.len()
        );
        Ok(selection)
    }
}
