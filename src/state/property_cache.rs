//! Property Cache
//!
//! Process-wide memo from host property objects to neutral descriptors. Each
//! host property gets a small integer handle the first time it is seen; the
//! cache is an arena keyed by that handle. Two properties that share a name
//! on different blocks have different handles and never collide.
//!
//! Builders are pure, so a lost race on first insert just discards an
//! equivalent descriptor; the first one stored wins and is returned forever.

use dashmap::DashMap;
use lazy_static::lazy_static;
use std::sync::Arc;

use super::property_data::{PropertyDescriptor, PropertyKind};
use crate::error::{BridgeError, BridgeResult};
use crate::host::{HostDirection, HostProperty, HostPropertyKind, PropertyHandle};
use crate::world::core::Direction;

lazy_static! {
    static ref PROPERTY_CACHE: PropertyCache = PropertyCache::new();
}

pub struct PropertyCache {
    descriptors: DashMap<PropertyHandle, Arc<PropertyDescriptor>>,
}

impl PropertyCache {
    pub fn new() -> Self {
        Self {
            descriptors: DashMap::new(),
        }
    }

    /// The cache shared by every adapter in the process
    pub fn global() -> &'static PropertyCache {
        &PROPERTY_CACHE
    }

    /// Descriptor for a host property; the same `Arc` on every call
    pub fn get(&self, property: &HostProperty) -> BridgeResult<Arc<PropertyDescriptor>> {
        let handle = property.handle();
        if let Some(cached) = self.descriptors.get(&handle) {
            return Ok(Arc::clone(cached.value()));
        }

        let built = Arc::new(build_descriptor(property)?);
        let stored = self.descriptors.entry(handle).or_insert(built);
        log::debug!(
            "[PropertyCache::get] Cached '{}' as handle {}",
            property.name(),
            handle.0
        );
        Ok(Arc::clone(stored.value()))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for PropertyCache {
    fn default() -> Self {
        Self::new()
    }
}

fn build_descriptor(property: &HostProperty) -> BridgeResult<PropertyDescriptor> {
    let kind = match property.kind() {
        HostPropertyKind::Boolean(values) => PropertyKind::Boolean(values.clone()),
        HostPropertyKind::Direction(values) => PropertyKind::Directional(
            values
                .iter()
                .map(|value| adapt_host_direction(property, *value))
                .collect::<BridgeResult<_>>()?,
        ),
        HostPropertyKind::Enum(values) => PropertyKind::Enum(values.clone()),
        HostPropertyKind::Integer(values) => PropertyKind::Integer(values.clone()),
        HostPropertyKind::Other(type_name) => {
            return Err(BridgeError::UnsupportedPropertyKind {
                property: property.name().to_string(),
                kind: type_name.clone(),
            })
        }
    };
    Ok(PropertyDescriptor::new(property.name(), kind))
}

fn adapt_host_direction(property: &HostProperty, value: HostDirection) -> BridgeResult<Direction> {
    Direction::from_name(&value.serialized_name().to_uppercase()).ok_or_else(|| {
        BridgeError::InvalidPropertyValue {
            property: property.name().to_string(),
            value: value.serialized_name().to_string(),
        }
    })
}
