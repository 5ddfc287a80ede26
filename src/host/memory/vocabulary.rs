//! Default registry contents of the in-memory host

use std::sync::Arc;

use crate::constants::DEFAULT_BLOCK_KEY;
use crate::host::host_block::{BlockFlags, HostBlock, HostDirection, HostProperty, HostValue};
use crate::host::host_entity::{HostItem, InteractionResult};

/// Blocks registered by default, air first
pub fn default_blocks() -> Vec<Arc<HostBlock>> {
    let facing = HostProperty::direction("facing", &HostDirection::HORIZONTAL);
    let north = HostValue::Direction(HostDirection::North);

    vec![
        HostBlock::new(DEFAULT_BLOCK_KEY).build(),
        HostBlock::new("minecraft:stone").build(),
        HostBlock::new("minecraft:dirt").build(),
        HostBlock::new("minecraft:bedrock").build(),
        HostBlock::new("minecraft:sand").build(),
        HostBlock::new("minecraft:grass_block")
            .with_property(HostProperty::boolean("snowy"), HostValue::Bool(false))
            .build(),
        HostBlock::new("minecraft:oak_log")
            .with_property(HostProperty::enumeration("axis", &["x", "y", "z"]), HostValue::Enum(1))
            .build(),
        HostBlock::new("minecraft:water")
            .with_property(HostProperty::integer("level", 0, 15), HostValue::Int(0))
            .build(),
        HostBlock::new("minecraft:wheat")
            .with_property(HostProperty::integer("age", 0, 7), HostValue::Int(0))
            .with_flags(BlockFlags {
                needs_support: true,
                ..BlockFlags::default()
            })
            .build(),
        HostBlock::new("minecraft:furnace")
            .with_property(Arc::clone(&facing), north)
            .with_property(HostProperty::boolean("lit"), HostValue::Bool(false))
            .with_flags(BlockFlags {
                container: true,
                interactive: true,
                ..BlockFlags::default()
            })
            .build(),
        HostBlock::new("minecraft:chest")
            .with_property(Arc::clone(&facing), north)
            .with_property(
                HostProperty::enumeration("type", &["single", "left", "right"]),
                HostValue::Enum(0),
            )
            .with_property(HostProperty::boolean("waterlogged"), HostValue::Bool(false))
            .with_flags(BlockFlags {
                container: true,
                interactive: true,
                ..BlockFlags::default()
            })
            .build(),
        HostBlock::new("minecraft:lever")
            .with_property(
                HostProperty::enumeration("face", &["floor", "wall", "ceiling"]),
                HostValue::Enum(1),
            )
            .with_property(facing, north)
            .with_property(HostProperty::boolean("powered"), HostValue::Bool(false))
            .with_flags(BlockFlags {
                needs_support: true,
                interactive: true,
                ..BlockFlags::default()
            })
            .build(),
    ]
}

pub fn default_items() -> Vec<HostItem> {
    vec![
        HostItem::new("minecraft:stone"),
        HostItem::new("minecraft:stick"),
        HostItem {
            key: "minecraft:bone_meal".to_string(),
            use_on_block: InteractionResult::Success,
            use_in_air: InteractionResult::Pass,
        },
        HostItem {
            key: "minecraft:ender_pearl".to_string(),
            use_on_block: InteractionResult::Pass,
            use_in_air: InteractionResult::Success,
        },
    ]
}

pub fn default_entity_types() -> Vec<&'static str> {
    vec![
        "minecraft:pig",
        "minecraft:zombie",
        "minecraft:boat",
        "minecraft:item_frame",
    ]
}

pub fn default_biomes() -> Vec<&'static str> {
    vec![
        "minecraft:plains",
        "minecraft:desert",
        "minecraft:forest",
        "minecraft:nether_wastes",
        "minecraft:the_end",
    ]
}
