//! Property Cache and Block/Item State Adapter
//!
//! Translates between neutral block states and host block states, with the
//! process-wide property cache and the numeric id table behind it.

pub mod block_state_data;
pub mod block_state_operations;
pub mod property_cache;
pub mod property_data;
pub mod state_id_table;

pub use block_state_data::{BaseItemStack, BiomeType, BlockState};
pub use block_state_operations::{
    adapt_direction, apply_properties, internal_block_state_id, internal_state_id, properties_of,
    to_host_item, to_host_state, to_neutral_item, to_neutral_state,
};
pub use property_cache::PropertyCache;
pub use property_data::{PropertyDescriptor, PropertyKind, PropertyValue};
pub use state_id_table::BlockStateIdTable;
