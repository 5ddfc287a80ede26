//! Neutral block, biome and item data - Pure Data

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::property_data::{PropertyDescriptor, PropertyValue};
use crate::tag::CompoundTag;

/// Block type plus values for some of its properties
///
/// Properties are keyed by name so equality does not depend on the order
/// they were applied in. `nbt` is block-entity data; `None` means there is
/// none, which is different from an empty compound.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockState {
    block_type: String,
    properties: BTreeMap<String, (Arc<PropertyDescriptor>, PropertyValue)>,
    nbt: Option<CompoundTag>,
}

impl BlockState {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            properties: BTreeMap::new(),
            nbt: None,
        }
    }

    pub fn block_type(&self) -> &str {
        &self.block_type
    }

    pub fn with_property(
        mut self,
        descriptor: Arc<PropertyDescriptor>,
        value: PropertyValue,
    ) -> Self {
        self.set_property(descriptor, value);
        self
    }

    pub fn set_property(&mut self, descriptor: Arc<PropertyDescriptor>, value: PropertyValue) {
        self.properties
            .insert(descriptor.name().to_string(), (descriptor, value));
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name).map(|(_, value)| value)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&Arc<PropertyDescriptor>, &PropertyValue)> {
        self.properties.values().map(|(descriptor, value)| (descriptor, value))
    }

    pub fn nbt(&self) -> Option<&CompoundTag> {
        self.nbt.as_ref()
    }

    pub fn with_nbt(mut self, nbt: Option<CompoundTag>) -> Self {
        self.nbt = nbt;
        self
    }

    /// Same state without block-entity data
    pub fn to_immutable_state(&self) -> BlockState {
        Self {
            block_type: self.block_type.clone(),
            properties: self.properties.clone(),
            nbt: None,
        }
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.block_type)?;
        if !self.properties.is_empty() {
            let values: Vec<String> = self
                .properties
                .iter()
                .map(|(name, (_, value))| format!("{}={}", name, value))
                .collect();
            write!(f, "[{}]", values.join(","))?;
        }
        Ok(())
    }
}

/// Neutral biome id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeType(String);

impl BiomeType {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Neutral item stack
#[derive(Debug, Clone, PartialEq)]
pub struct BaseItemStack {
    pub item_type: String,
    pub amount: i32,
    pub nbt: Option<CompoundTag>,
}

impl BaseItemStack {
    pub fn new(item_type: impl Into<String>, amount: i32) -> Self {
        Self {
            item_type: item_type.into(),
            amount,
            nbt: None,
        }
    }
}
