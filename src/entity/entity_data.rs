//! Entity snapshot data - Pure Data

use crate::tag::CompoundTag;

/// Type id plus tag tree; enough to recreate an entity elsewhere
#[derive(Debug, Clone, PartialEq)]
pub struct BaseEntity {
    pub type_id: String,
    pub nbt: Option<CompoundTag>,
}

impl BaseEntity {
    pub fn new(type_id: impl Into<String>, nbt: Option<CompoundTag>) -> Self {
        Self {
            type_id: type_id.into(),
            nbt,
        }
    }
}
