//! Schema discovery
//!
//! Builds the field tree of a sample record and carries the per-field
//! presentation helpers (type labels, descriptions, groups).

pub mod discovery;
pub mod groups;
pub mod info;
pub mod tree;

pub use discovery::{discover_schema, discover_schema_with, DiscoveryConfig};
pub use groups::{filter_fields, FieldGroup};
pub use info::{FieldInfo, StringFormat};
pub use tree::{FieldKind, FieldNode, FieldTree};
