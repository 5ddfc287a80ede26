//! Block/Item State Adapter Operations - Pure Functions
//!
//! Neutral states are applied onto the host's default state one property at
//! a time, looked up by name. Host states are read back through the property
//! cache. Any failure aborts the whole conversion; nothing half-applied is
//! ever returned.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::block_state_data::{BaseItemStack, BlockState};
use super::property_cache::PropertyCache;
use super::property_data::{PropertyDescriptor, PropertyValue};
use crate::error::{BridgeError, BridgeResult};
use crate::host::{
    BlockRegistry, HostBlock, HostBlockState, HostDirection, HostItemStack, HostProperty,
    HostPropertyKind, HostServer, HostValue,
};
use crate::tag::{compound_to_host, compound_to_neutral};
use crate::world::core::Direction;

// ============================================================================
// NEUTRAL -> HOST
// ============================================================================

/// Host state for a neutral state; None if the block type is unknown
pub fn to_host_state(
    registry: &dyn BlockRegistry,
    state: &BlockState,
) -> BridgeResult<Option<HostBlockState>> {
    let Some(block) = registry.block(state.block_type()) else {
        return Ok(None);
    };
    apply_properties(&block, state).map(Some)
}

/// Applies every property of `state` onto the block's default state
pub fn apply_properties(
    block: &Arc<HostBlock>,
    state: &BlockState,
) -> BridgeResult<HostBlockState> {
    let mut host_state = block.default_state();
    for (descriptor, value) in state.properties() {
        let property = block
            .property(descriptor.name())
            .ok_or_else(|| BridgeError::UnknownProperty {
                block: block.key().to_string(),
                property: descriptor.name().to_string(),
            })?;
        let host_value = to_host_value(property, value)?;
        host_state = host_state
            .set_value(property, host_value)
            .ok_or_else(|| BridgeError::InvalidPropertyValue {
                property: property.name().to_string(),
                value: value.to_string(),
            })?;
    }
    Ok(host_state)
}

fn to_host_value(property: &HostProperty, value: &PropertyValue) -> BridgeResult<HostValue> {
    let mismatch = |expected: &str| BridgeError::PropertyValueMismatch {
        property: property.name().to_string(),
        expected: expected.to_string(),
        found: value.kind_label().to_string(),
    };
    let unresolved = || BridgeError::InvalidPropertyValue {
        property: property.name().to_string(),
        value: value.to_string(),
    };

    match property.kind() {
        HostPropertyKind::Boolean(_) => match value {
            PropertyValue::Bool(b) => Ok(HostValue::Bool(*b)),
            _ => Err(mismatch("boolean")),
        },
        HostPropertyKind::Integer(_) => match value {
            PropertyValue::Int(i) => Ok(HostValue::Int(*i)),
            _ => Err(mismatch("integer")),
        },
        HostPropertyKind::Direction(_) => match value {
            PropertyValue::Direction(direction) => adapt_direction(*direction)
                .map(HostValue::Direction)
                .ok_or_else(unresolved),
            _ => Err(mismatch("direction")),
        },
        HostPropertyKind::Enum(_) => match value {
            PropertyValue::Enum(name) => property.enum_value(name).ok_or_else(unresolved),
            _ => Err(mismatch("enum")),
        },
        HostPropertyKind::Other(type_name) => Err(BridgeError::UnsupportedPropertyKind {
            property: property.name().to_string(),
            kind: type_name.clone(),
        }),
    }
}

/// Host direction for a neutral one; ordinal directions have none
pub fn adapt_direction(direction: Direction) -> Option<HostDirection> {
    match direction {
        Direction::North => Some(HostDirection::North),
        Direction::East => Some(HostDirection::East),
        Direction::South => Some(HostDirection::South),
        Direction::West => Some(HostDirection::West),
        Direction::Up => Some(HostDirection::Up),
        Direction::Down => Some(HostDirection::Down),
        _ => None,
    }
}

// ============================================================================
// HOST -> NEUTRAL
// ============================================================================

pub fn to_neutral_state(
    cache: &PropertyCache,
    host_state: &HostBlockState,
) -> BridgeResult<BlockState> {
    let mut state = BlockState::new(host_state.block().key());
    for (property, value) in host_state.values() {
        let descriptor = cache.get(property)?;
        let neutral = to_neutral_value(property, value)?;
        state.set_property(descriptor, neutral);
    }
    Ok(state)
}

fn to_neutral_value(property: &HostProperty, value: &HostValue) -> BridgeResult<PropertyValue> {
    let unresolved = || BridgeError::InvalidPropertyValue {
        property: property.name().to_string(),
        value: format!("{:?}", value),
    };
    Ok(match value {
        HostValue::Bool(b) => PropertyValue::Bool(*b),
        HostValue::Int(i) => PropertyValue::Int(*i),
        HostValue::Direction(d) => PropertyValue::Direction(
            Direction::from_name(&d.serialized_name().to_uppercase()).ok_or_else(unresolved)?,
        ),
        HostValue::Enum(_) => {
            PropertyValue::Enum(property.value_name(value).ok_or_else(unresolved)?)
        }
    })
}

// ============================================================================
// NUMERIC IDS
// ============================================================================

/// Host numeric id of a live state
///
/// Id 0 doubles as the registry's "not found" answer, so it only counts when
/// the state really belongs to the default block.
pub fn internal_state_id(registry: &dyn BlockRegistry, host_state: &HostBlockState) -> Option<u32> {
    let id = registry.state_id(host_state);
    if id == 0 && host_state.block().key() != registry.default_block().key() {
        return None;
    }
    Some(id)
}

/// Host numeric id of a neutral state
pub fn internal_block_state_id(
    registry: &dyn BlockRegistry,
    state: &BlockState,
) -> BridgeResult<Option<u32>> {
    Ok(to_host_state(registry, state)?.and_then(|host| internal_state_id(registry, &host)))
}

/// Name-ordered property descriptors of a block type; empty if unknown
pub fn properties_of(
    registry: &dyn BlockRegistry,
    cache: &PropertyCache,
    block_type: &str,
) -> BridgeResult<BTreeMap<String, Arc<PropertyDescriptor>>> {
    let mut properties = BTreeMap::new();
    if let Some(block) = registry.block(block_type) {
        for property in block.properties() {
            properties.insert(property.name().to_string(), cache.get(property)?);
        }
    }
    Ok(properties)
}

// ============================================================================
// ITEMS
// ============================================================================

/// Host stack for a neutral stack; None if the item is unknown
pub fn to_host_item(
    server: &dyn HostServer,
    stack: &BaseItemStack,
) -> BridgeResult<Option<HostItemStack>> {
    let Some(item) = server.item(&stack.item_type) else {
        return Ok(None);
    };
    let tag = stack.nbt.as_ref().map(compound_to_host).transpose()?;
    Ok(Some(HostItemStack {
        item,
        count: stack.amount,
        tag,
    }))
}

pub fn to_neutral_item(stack: &HostItemStack) -> BridgeResult<BaseItemStack> {
    Ok(BaseItemStack {
        item_type: stack.item.key.clone(),
        amount: stack.count,
        nbt: stack.tag.as_ref().map(compound_to_neutral).transpose()?,
    })
}
