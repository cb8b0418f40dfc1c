//! Field selection
//!
//! Two independent layers over the same field tree: the tri-state inclusion
//! state and the identifier designations.

pub mod identifiers;
pub mod state;

pub use identifiers::{array_identifier_candidates, product_identifier_candidates, IdentifierAssignment};
pub use state::{CheckboxState, Propagation, SelectionState};
