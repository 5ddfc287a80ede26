//! Host entities, items and the fake actor used for simulated interactions

use super::host_block::HostDirection;
use super::host_tag::{HostCompound, HostList, HostTag};
use crate::world::core::{BlockPos, Location};

/// Id of an entity inside one host world
pub type EntityId = u64;

/// Live host entity
#[derive(Debug, Clone, PartialEq)]
pub struct HostEntity {
    pub type_key: String,
    pub data: HostCompound,
    /// Entity this one is riding, if any
    pub vehicle: Option<EntityId>,
    pub location: Location,
}

impl HostEntity {
    pub fn new(type_key: impl Into<String>) -> Self {
        Self {
            type_key: type_key.into(),
            data: HostCompound::new(),
            vehicle: None,
            location: Location::default(),
        }
    }

    pub fn is_passenger(&self) -> bool {
        self.vehicle.is_some()
    }

    /// Full tag snapshot, position and rotation included
    pub fn save(&self) -> HostCompound {
        let mut tag = self.data.clone();
        let mut pos = HostList::new();
        pos.push(HostTag::Double(self.location.x));
        pos.push(HostTag::Double(self.location.y));
        pos.push(HostTag::Double(self.location.z));
        tag.put("Pos", HostTag::List(pos));
        let mut rotation = HostList::new();
        rotation.push(HostTag::Float(self.location.yaw));
        rotation.push(HostTag::Float(self.location.pitch));
        tag.put("Rotation", HostTag::List(rotation));
        tag
    }

    /// Applies a tag snapshot on top of the current data
    pub fn load(&mut self, tag: &HostCompound) {
        let mut tag = tag.clone();
        if let Some(HostTag::List(pos)) = tag.remove("Pos") {
            if let (Some(HostTag::Double(x)), Some(HostTag::Double(y)), Some(HostTag::Double(z))) =
                (pos.get(0), pos.get(1), pos.get(2))
            {
                self.location.x = *x;
                self.location.y = *y;
                self.location.z = *z;
            }
        }
        if let Some(HostTag::List(rotation)) = tag.remove("Rotation") {
            if let (Some(HostTag::Float(yaw)), Some(HostTag::Float(pitch))) =
                (rotation.get(0), rotation.get(1))
            {
                self.location.yaw = *yaw;
                self.location.pitch = *pitch;
            }
        }
        self.data.merge(&tag);
    }

    pub fn move_to(&mut self, location: Location) {
        self.location = location;
    }
}

/// Outcome of an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionResult {
    Success,
    Consume,
    Pass,
    Fail,
}

impl InteractionResult {
    pub fn consumes_action(&self) -> bool {
        matches!(self, InteractionResult::Success | InteractionResult::Consume)
    }
}

/// Host item type
#[derive(Debug, Clone, PartialEq)]
pub struct HostItem {
    pub key: String,
    /// Result of using the item on a block
    pub use_on_block: InteractionResult,
    /// Result of using the item in the air
    pub use_in_air: InteractionResult,
}

impl HostItem {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            use_on_block: InteractionResult::Pass,
            use_in_air: InteractionResult::Pass,
        }
    }
}

/// Host item stack
#[derive(Debug, Clone, PartialEq)]
pub struct HostItemStack {
    pub item: HostItem,
    pub count: i32,
    pub tag: Option<HostCompound>,
}

/// Where an item use lands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockHit {
    pub pos: BlockPos,
    pub face: HostDirection,
}

/// Stand-in player that performs simulated item uses
#[derive(Debug, Clone, PartialEq)]
pub struct FakeActor {
    pub name: String,
    pub world: String,
    pub location: Location,
    pub main_hand: Option<HostItemStack>,
}

impl FakeActor {
    pub fn new(world: impl Into<String>) -> Self {
        Self {
            name: "[HearthBridge]".to_string(),
            world: world.into(),
            location: Location::default(),
            main_hand: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load_keeps_location() {
        let mut pig = HostEntity::new("minecraft:pig");
        pig.data.put("Health", HostTag::Float(10.0));
        pig.move_to(Location::new(1.5, 70.0, -3.25).with_rotation(90.0, 10.0));
        let snapshot = pig.save();

        let mut copy = HostEntity::new("minecraft:pig");
        copy.load(&snapshot);
        assert_eq!(copy.location, pig.location);
        assert_eq!(copy.data.get("Health"), Some(&HostTag::Float(10.0)));
        assert!(!copy.data.contains("Pos"));
    }
}
