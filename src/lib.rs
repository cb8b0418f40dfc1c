//! # fieldmap - Product Field Discovery & Selection
//!
//! Infers the field structure of an extracted e-commerce product record and
//! tracks which fields a store owner wants to keep, with tri-state parent/child
//! selection and product/array identifier designations.
//!
//! ## Modules
//!
//! - **schema**: Discover a field tree from one sample record
//! - **selection**: Tri-state inclusion state and identifier assignment
//! - **extraction**: Read platform extraction payloads
//! - **session**: One wizard session, producing the submitted field selection
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldmap::{FieldMappingSession, FieldPath};
//! use serde_json::json;
//!
//! # fn main() -> fieldmap::Result<()> {
//! let sample = json!({
//!     "id": "p1",
//!     "name": "Shoe",
//!     "variants": [
//!         {"sku": "S1", "size": "M"},
//!         {"sku": "S2", "size": "L"}
//!     ]
//! });
//!
//! let mut session = FieldMappingSession::new(&sample)?;
//!
//! let id: FieldPath = "id".parse()?;
//! let variants: FieldPath = "variants".parse()?;
//! let sku: FieldPath = "variants[0].sku".parse()?;
//! let size: FieldPath = "variants[0].size".parse()?;
//!
//! session.set_field(&size, false)?;
//! session.set_product_identifier(&id)?;
//! session.set_array_identifier(&variants, &sku)?;
//!
//! let checkbox = session.checkbox_state(&variants).unwrap();
//! assert!(checkbox.indeterminate);
//!
//! let selection = session.finish()?;
//! assert!(selection.selected_fields.contains(&sku));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extraction;
pub mod path;
pub mod schema;
pub mod selection;
pub mod session;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use extraction::{missing_recommended_fields, Extraction, ExtractionStats};
pub use path::{FieldPath, Segment};
pub use schema::{discover_schema, discover_schema_with, DiscoveryConfig, FieldKind, FieldNode, FieldTree};
pub use selection::{CheckboxState, IdentifierAssignment, Propagation, SelectionState};
pub use session::{FieldMappingSession, FieldSelection, SessionConfig};
