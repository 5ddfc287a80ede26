//! Entity Snapshot Operations - Pure Functions
//!
//! Passengers are never captured on their own; their state is already part
//! of the vehicle's tag tree. Restoring strips identity fields at every level
//! of the passenger hierarchy so the copies never clash with the originals.

use super::entity_data::BaseEntity;
use crate::constants::{NO_COPY_ENTITY_NBT_FIELDS, PASSENGERS_KEY};
use crate::error::BridgeResult;
use crate::host::{EntityId, HostEntity, HostServer, HostWorld};
use crate::tag::{compound_to_host, compound_to_neutral, CompoundTag, Tag};
use crate::world::core::Location;

/// Snapshot of a host entity; None for passengers
pub fn capture(entity: &HostEntity) -> BridgeResult<Option<BaseEntity>> {
    if entity.is_passenger() {
        return Ok(None);
    }
    let nbt = compound_to_neutral(&entity.save())?;
    Ok(Some(BaseEntity::new(entity.type_key.clone(), Some(nbt))))
}

/// Spawns a copy of `entity` at `location`; None if the type is unknown
pub fn restore(
    server: &dyn HostServer,
    world: &dyn HostWorld,
    location: Location,
    entity: &BaseEntity,
) -> BridgeResult<Option<EntityId>> {
    let Some(mut created) = server.create_entity(&entity.type_id) else {
        log::debug!("[EntityAdapter::restore] Unknown entity type '{}'", entity.type_id);
        return Ok(None);
    };

    if let Some(nbt) = &entity.nbt {
        let mut tag = nbt.clone();
        strip_no_copy_fields(&mut tag);
        created.load(&compound_to_host(&tag)?);
    }
    created.move_to(location);

    Ok(Some(world.add_fresh_entity(created)))
}

/// Removes identity fields, descending into nested passengers
pub fn strip_no_copy_fields(tag: &mut CompoundTag) {
    for field in NO_COPY_ENTITY_NBT_FIELDS {
        tag.remove(field);
    }
    if let Some(Tag::List(passengers)) = tag.get_mut(PASSENGERS_KEY) {
        for passenger in passengers.iter_mut() {
            if let Tag::Compound(inner) = passenger {
                strip_no_copy_fields(inner);
            }
        }
    }
}
