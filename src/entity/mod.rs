//! Entity Snapshot Adapter
//!
//! Captures host entities as (type id, tag tree) pairs and restores them.

pub mod entity_data;
pub mod entity_operations;

pub use entity_data::BaseEntity;
pub use entity_operations::{capture, restore, strip_no_copy_fields};
