//! Bridge adapter
//!
//! The one object the editing engine holds. It checks the host version once
//! at construction and then exposes every conversion, query and regeneration
//! the bridge offers.

pub mod item_use;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::entity::{self, BaseEntity};
use crate::error::{BridgeError, BridgeResult};
use crate::host::{EntityId, HostBlockState, HostItemStack, HostServer, HostTag, HostWorld};
use crate::regen::{self, RegenContext, RegenOptions, RegenReport};
use crate::state::{
    self, BaseItemStack, BlockState, BlockStateIdTable, PropertyCache, PropertyDescriptor,
};
use crate::tag::{self, compound_to_neutral, Tag};
use crate::world::core::{BlockPos, Direction, Location, SideEffect, SUPPORTED_SIDE_EFFECTS};
use crate::world::{Extent, Region};
use crate::BridgeConfig;

pub use item_use::simulate_item_use;

pub struct BridgeAdapter {
    server: Arc<dyn HostServer>,
    config: BridgeConfig,
    cache: &'static PropertyCache,
    state_ids: BlockStateIdTable,
}

impl BridgeAdapter {
    /// Fails if the config is invalid or the host version is not supported
    pub fn new(server: Arc<dyn HostServer>, config: BridgeConfig) -> BridgeResult<Self> {
        if let Err(e) = config.validate() {
            log::error!("[BridgeAdapter::new] Configuration validation failed: {}", e);
            return Err(BridgeError::InvalidConfig {
                field: "BridgeConfig".to_string(),
                value: format!("{:?}", config),
                reason: e.to_string(),
            });
        }

        let found = server.data_version();
        if !config.supported_data_versions.contains(&found) {
            log::error!(
                "[BridgeAdapter::new] Host data version {} is not supported",
                found
            );
            return Err(BridgeError::HostVersionMismatch {
                expected: config.supported_data_versions.clone(),
                found,
            });
        }

        log::info!("[BridgeAdapter::new] Bridge ready for host data version {}", found);
        Ok(Self {
            server,
            config,
            cache: PropertyCache::global(),
            state_ids: BlockStateIdTable::new(),
        })
    }

    pub fn server(&self) -> &dyn HostServer {
        self.server.as_ref()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------------

    /// Host tag -> neutral tag
    pub fn to_native_binary(&self, foreign: &HostTag) -> BridgeResult<Tag> {
        tag::to_neutral(foreign)
    }

    /// Neutral tag -> host tag
    pub fn from_native_binary(&self, tag: &Tag) -> BridgeResult<HostTag> {
        tag::to_host(tag)
    }

    // ------------------------------------------------------------------------
    // Block states
    // ------------------------------------------------------------------------

    pub fn adapt_block_state(&self, state: &BlockState) -> BridgeResult<Option<HostBlockState>> {
        state::to_host_state(self.server.blocks(), state)
    }

    pub fn adapt_host_state(&self, host_state: &HostBlockState) -> BridgeResult<BlockState> {
        state::to_neutral_state(self.cache, host_state)
    }

    pub fn internal_block_state_id(&self, state: &BlockState) -> BridgeResult<Option<u32>> {
        state::internal_block_state_id(self.server.blocks(), state)
    }

    pub fn internal_block_state_id_of_host(&self, host_state: &HostBlockState) -> Option<u32> {
        state::internal_state_id(self.server.blocks(), host_state)
    }

    /// Maps every registered host state up front
    pub fn populate_state_ids(&self) -> BridgeResult<usize> {
        self.state_ids.populate(self.server.blocks(), self.cache)
    }

    pub fn get_properties(
        &self,
        block_type: &str,
    ) -> BridgeResult<BTreeMap<String, Arc<PropertyDescriptor>>> {
        state::properties_of(self.server.blocks(), self.cache, block_type)
    }

    pub fn get_block(&self, world: &dyn HostWorld, pos: BlockPos) -> BridgeResult<BlockState> {
        let host_state = world.block_state(pos);
        self.state_ids
            .resolve(self.server.blocks(), self.cache, &host_state)
    }

    /// Block plus its block-entity data, if any
    pub fn get_full_block(&self, world: &dyn HostWorld, pos: BlockPos) -> BridgeResult<BlockState> {
        let state = self.get_block(world, pos)?;
        match world.block_entity(pos) {
            Some(tag) => Ok(state.with_nbt(Some(compound_to_neutral(&tag)?))),
            None => Ok(state),
        }
    }

    pub fn can_place_at(
        &self,
        world: &dyn HostWorld,
        pos: BlockPos,
        state: &BlockState,
    ) -> BridgeResult<bool> {
        Ok(match self.adapt_block_state(state)? {
            Some(host_state) => world.can_survive(&host_state, pos),
            None => false,
        })
    }

    pub fn clear_container_block_contents(&self, world: &dyn HostWorld, pos: BlockPos) -> bool {
        world.clear_container(pos)
    }

    // ------------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------------

    pub fn adapt_item(&self, stack: &BaseItemStack) -> BridgeResult<Option<HostItemStack>> {
        state::to_host_item(self.server.as_ref(), stack)
    }

    pub fn adapt_host_item(&self, stack: &HostItemStack) -> BridgeResult<BaseItemStack> {
        state::to_neutral_item(stack)
    }

    pub fn simulate_item_use(
        &self,
        world: &dyn HostWorld,
        pos: BlockPos,
        item: &BaseItemStack,
        face: Direction,
    ) -> BridgeResult<bool> {
        item_use::simulate_item_use(self.server.as_ref(), world, pos, item, face)
    }

    // ------------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------------

    /// Snapshot of a live entity; None for passengers and unknown ids
    pub fn get_entity(
        &self,
        world: &dyn HostWorld,
        id: EntityId,
    ) -> BridgeResult<Option<BaseEntity>> {
        match world.entity(id) {
            Some(host) => entity::capture(&host),
            None => Ok(None),
        }
    }

    pub fn create_entity(
        &self,
        world: &dyn HostWorld,
        location: Location,
        entity: &BaseEntity,
    ) -> BridgeResult<Option<EntityId>> {
        entity::restore(self.server.as_ref(), world, location, entity)
    }

    // ------------------------------------------------------------------------
    // Regeneration
    // ------------------------------------------------------------------------

    pub fn regenerate(
        &self,
        world: &dyn HostWorld,
        region: &dyn Region,
        extent: &mut dyn Extent,
        options: RegenOptions,
    ) -> BridgeResult<RegenReport> {
        let context = RegenContext {
            server: self.server.as_ref(),
            cache: self.cache,
            state_ids: &self.state_ids,
            config: &self.config,
        };
        regen::regenerate(&context, world, region, extent, &options)
    }

    // ------------------------------------------------------------------------
    // Capabilities
    // ------------------------------------------------------------------------

    /// Always the same six effects, whatever the host
    pub fn supported_side_effects(&self) -> BTreeSet<SideEffect> {
        SUPPORTED_SIDE_EFFECTS.iter().copied().collect()
    }

    pub fn supports_watchdog(&self) -> bool {
        self.server.watchdog().is_some()
    }

    pub fn tick_watchdog(&self) {
        if let Some(watchdog) = self.server.watchdog() {
            watchdog.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::chunk::MIN_BUILD_HEIGHT;
    use crate::host::memory::{
        FlatGenerator, MemoryServer, MemoryServerConfig, MemoryWorld, NoiseGenerator, NoisePalette,
    };
    use crate::host::{BlockRegistry, ChunkGenerator, HostCompound, HostEntity, HostList, HostValue};
    use crate::state::{PropertyValue, BiomeType};
    use crate::world::core::ChunkPos;
    use crate::world::{BufferedExtent, CuboidRegion, PointRegion};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    struct Fixture {
        server: Arc<MemoryServer>,
        adapter: BridgeAdapter,
        world: Arc<MemoryWorld>,
        flat: Arc<FlatGenerator>,
    }

    fn fixture() -> Fixture {
        init_logging();
        let server = Arc::new(MemoryServer::new(MemoryServerConfig::default()).unwrap());
        let flat = Arc::new(FlatGenerator::classic(server.memory_blocks()).unwrap());
        let world = server.create_live_world("overworld", flat.clone(), 12345).unwrap();
        let adapter = BridgeAdapter::new(server.clone(), BridgeConfig::default()).unwrap();
        Fixture {
            server,
            adapter,
            world,
            flat,
        }
    }

    fn host_state(server: &MemoryServer, key: &str) -> HostBlockState {
        server.blocks().block(key).unwrap().default_state()
    }

    #[test]
    fn test_version_precondition() {
        let server = Arc::new(
            MemoryServer::new(MemoryServerConfig {
                data_version: 2975,
                ..MemoryServerConfig::default()
            })
            .unwrap(),
        );
        match BridgeAdapter::new(server, BridgeConfig::default()) {
            Err(BridgeError::HostVersionMismatch { expected, found }) => {
                assert_eq!(found, 2975);
                assert_eq!(expected, vec![3463, 3465]);
            }
            Err(other) => panic!("unexpected {:?}", other),
            Ok(_) => panic!("old host accepted"),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let server = Arc::new(MemoryServer::new(MemoryServerConfig::default()).unwrap());
        let config = BridgeConfig {
            delete_retries: 0,
            ..BridgeConfig::default()
        };
        assert!(matches!(
            BridgeAdapter::new(server, config),
            Err(BridgeError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_native_binary_round_trip() {
        let f = fixture();
        let mut items = HostList::new();
        items.push(HostTag::Compound(
            HostCompound::new().with("id", HostTag::String("minecraft:stick".into())),
        ));
        let host = HostTag::Compound(HostCompound::new().with("Items", HostTag::List(items)));
        let neutral = f.adapter.to_native_binary(&host).unwrap();
        assert_eq!(f.adapter.from_native_binary(&neutral).unwrap(), host);
    }

    #[test]
    fn test_get_block_and_full_block() {
        let f = fixture();
        let pos = BlockPos::new(2, 0, 2);
        let chest = f.server.blocks().block("minecraft:chest").unwrap();
        let facing = chest.property("facing").unwrap();
        let placed = chest
            .default_state()
            .set_value(facing, HostValue::Direction(crate::host::HostDirection::East))
            .unwrap();
        f.world.set_block(pos, placed);
        f.world.set_block_entity(
            pos,
            HostCompound::new()
                .with("id", HostTag::String("minecraft:chest".into()))
                .with("Lock", HostTag::String("key".into())),
        );

        let block = f.adapter.get_block(f.world.as_ref(), pos).unwrap();
        assert_eq!(block.block_type(), "minecraft:chest");
        assert_eq!(block.property("facing"), Some(&PropertyValue::Direction(Direction::East)));
        assert!(block.nbt().is_none());

        let full = f.adapter.get_full_block(f.world.as_ref(), pos).unwrap();
        assert_eq!(full.nbt().unwrap().get_string("Lock"), Some("key"));

        // Generated terrain resolves the same way
        let surface = BlockPos::new(0, f.flat.surface_y(), 0);
        let grass = f.adapter.get_block(f.world.as_ref(), surface).unwrap();
        assert_eq!(grass.block_type(), "minecraft:grass_block");
    }

    #[test]
    fn test_property_identity_through_adapter() {
        let f = fixture();
        let furnace = f.adapter.get_properties("minecraft:furnace").unwrap();
        let chest = f.adapter.get_properties("minecraft:chest").unwrap();
        // One shared host property object, one cached descriptor
        assert!(Arc::ptr_eq(&furnace["facing"], &chest["facing"]));
        let again = f.adapter.get_properties("minecraft:furnace").unwrap();
        assert!(Arc::ptr_eq(&furnace["lit"], &again["lit"]));
    }

    #[test]
    fn test_internal_ids() {
        let f = fixture();
        let air = BlockState::new("minecraft:air");
        assert_eq!(f.adapter.internal_block_state_id(&air).unwrap(), Some(0));
        let stone = BlockState::new("minecraft:stone");
        assert!(f.adapter.internal_block_state_id(&stone).unwrap().unwrap() > 0);
        let added = f.adapter.populate_state_ids().unwrap();
        assert_eq!(added, f.server.blocks().all_states().len());
    }

    #[test]
    fn test_can_place_at() {
        let f = fixture();
        let wheat = BlockState::new("minecraft:wheat");
        let on_grass = BlockPos::new(0, f.flat.surface_y() + 1, 0);
        let floating = BlockPos::new(0, f.flat.surface_y() + 5, 0);
        assert!(f.adapter.can_place_at(f.world.as_ref(), on_grass, &wheat).unwrap());
        assert!(!f.adapter.can_place_at(f.world.as_ref(), floating, &wheat).unwrap());
        let unknown = BlockState::new("minecraft:nonexistent");
        assert!(!f.adapter.can_place_at(f.world.as_ref(), on_grass, &unknown).unwrap());
    }

    #[test]
    fn test_clear_container() {
        let f = fixture();
        let pos = BlockPos::new(4, 0, 4);
        f.world.set_block(pos, host_state(&f.server, "minecraft:furnace"));
        let mut items = HostList::new();
        items.push(HostTag::Compound(HostCompound::new().with("Count", HostTag::Byte(3))));
        f.world
            .set_block_entity(pos, HostCompound::new().with("Items", HostTag::List(items)));

        assert!(f.adapter.clear_container_block_contents(f.world.as_ref(), pos));
        let cleared = f.world.block_entity(pos).unwrap();
        assert_eq!(cleared.get("Items"), Some(&HostTag::List(HostList::new())));
        assert!(!f
            .adapter
            .clear_container_block_contents(f.world.as_ref(), BlockPos::new(9, 0, 9)));
    }

    #[test]
    fn test_item_adaptation() {
        let f = fixture();
        let mut stack = BaseItemStack::new("minecraft:stone", 16);
        stack.nbt = Some(crate::tag::CompoundTag::new().with("Damage", Tag::Int(0)));
        let host = f.adapter.adapt_item(&stack).unwrap().unwrap();
        assert_eq!(host.count, 16);
        assert_eq!(f.adapter.adapt_host_item(&host).unwrap(), stack);
        assert!(f
            .adapter
            .adapt_item(&BaseItemStack::new("minecraft:nope", 1))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_simulate_item_use() {
        let f = fixture();
        let ground = BlockPos::new(1, f.flat.surface_y(), 1);
        let lever_pos = BlockPos::new(3, f.flat.surface_y() + 1, 3);
        f.world.set_block(lever_pos, host_state(&f.server, "minecraft:lever"));
        let world = f.world.as_ref();

        let bone_meal = BaseItemStack::new("minecraft:bone_meal", 1);
        assert!(f.adapter.simulate_item_use(world, ground, &bone_meal, Direction::Up).unwrap());

        let stick = BaseItemStack::new("minecraft:stick", 1);
        assert!(!f.adapter.simulate_item_use(world, ground, &stick, Direction::Up).unwrap());
        // The lever consumes the interaction
        assert!(f.adapter.simulate_item_use(world, lever_pos, &stick, Direction::North).unwrap());

        let pearl = BaseItemStack::new("minecraft:ender_pearl", 1);
        assert!(f.adapter.simulate_item_use(world, ground, &pearl, Direction::Up).unwrap());

        let unknown = BaseItemStack::new("minecraft:nope", 1);
        assert!(!f
            .adapter
            .simulate_item_use(world, ground, &unknown, Direction::Up)
            .unwrap());
        assert!(f
            .adapter
            .simulate_item_use(world, ground, &stick, Direction::NorthEast)
            .is_err());
    }

    #[test]
    fn test_entity_snapshot_and_restore() {
        let f = fixture();
        let world = f.world.as_ref();
        let mut boat = HostEntity::new("minecraft:boat");
        boat.move_to(Location::new(8.0, -60.0, 8.0));
        let boat_id = world.add_fresh_entity(boat);
        let mut rider = HostEntity::new("minecraft:zombie");
        rider.vehicle = Some(boat_id);
        let rider_id = world.add_fresh_entity(rider);

        assert!(f.adapter.get_entity(world, rider_id).unwrap().is_none());
        assert!(f.adapter.get_entity(world, 999).unwrap().is_none());

        let snapshot = f.adapter.get_entity(world, boat_id).unwrap().unwrap();
        let at = Location::new(8.0, -60.0, 8.0);
        let copy_id = f.adapter.create_entity(world, at, &snapshot).unwrap().unwrap();
        let copy = world.entity(copy_id).unwrap();
        assert_eq!(copy.type_key, "minecraft:boat");
        assert_eq!(copy.location, at);

        let ghost = BaseEntity::new("minecraft:ghast_but_wrong", None);
        assert!(f.adapter.create_entity(world, at, &ghost).unwrap().is_none());
    }

    #[test]
    fn test_side_effects_and_watchdog() {
        let f = fixture();
        let effects = f.adapter.supported_side_effects();
        assert_eq!(effects.len(), 6);
        assert!(effects.contains(&SideEffect::Lighting));
        assert!(!effects.contains(&SideEffect::History));

        assert!(f.adapter.supports_watchdog());
        let before = f.server.watchdog_ticks();
        f.adapter.tick_watchdog();
        assert_eq!(f.server.watchdog_ticks(), before + 1);
    }

    #[test]
    fn test_regen_single_layer_copies_source_blocks() {
        let f = fixture();
        let y = f.flat.surface_y();
        // Live edits must not leak into the regenerated copy
        f.world.set_block(BlockPos::new(5, y, 5), host_state(&f.server, "minecraft:stone"));

        let region = CuboidRegion::new(BlockPos::new(0, y, 0), BlockPos::new(15, y, 15));
        let mut extent = BufferedExtent::new();
        let report = f
            .adapter
            .regenerate(f.world.as_ref(), &region, &mut extent, RegenOptions::new())
            .unwrap();

        assert_eq!(report.chunks, 1);
        assert_eq!(report.blocks_written, 256);
        assert_eq!(extent.blocks.len(), 256);
        assert!(extent.biomes.is_empty());
        let expected = f
            .adapter
            .adapt_host_state(&f.flat.block_at(0, BlockPos::new(5, y, 5)))
            .unwrap();
        for pos in region.positions() {
            assert_eq!(extent.block(pos), Some(&expected));
        }

        let dir = f.server.last_storage_dir().unwrap();
        assert!(!dir.exists());
        assert!(!dir.parent().unwrap().exists());
        assert!(!f.server.is_world_registered("hearthregentempworld"));
    }

    #[test]
    fn test_regen_biomes_when_requested() {
        let f = fixture();
        let region = PointRegion::from_iter([BlockPos::new(0, 0, 0), BlockPos::new(40, 0, -3)]);
        let mut extent = BufferedExtent::new();
        let report = f
            .adapter
            .regenerate(
                f.world.as_ref(),
                &region,
                &mut extent,
                RegenOptions::new().with_biomes(true),
            )
            .unwrap();
        assert_eq!(report.chunks, 2);
        assert_eq!(report.biomes_written, 2);
        assert_eq!(
            extent.biome(BlockPos::new(40, 0, -3)),
            Some(&BiomeType::new("minecraft:plains"))
        );
    }

    #[test]
    fn test_regen_seed_override() {
        init_logging();
        let server = Arc::new(MemoryServer::new(MemoryServerConfig::default()).unwrap());
        let palette = NoisePalette::from_registry(server.memory_blocks()).unwrap();
        let noise = Arc::new(NoiseGenerator::new(palette));
        let world = server.create_live_world("overworld", noise.clone(), 1).unwrap();
        let adapter = BridgeAdapter::new(server.clone(), BridgeConfig::default()).unwrap();

        let column: Vec<BlockPos> = (MIN_BUILD_HEIGHT..MIN_BUILD_HEIGHT + 200)
            .map(|y| BlockPos::new(7, y, 7))
            .collect();
        let region = PointRegion::from_iter(column.clone());
        let mut extent = BufferedExtent::new();
        adapter
            .regenerate(world.as_ref(), &region, &mut extent, RegenOptions::new().with_seed(99))
            .unwrap();

        for pos in column {
            let expected = adapter.adapt_host_state(&noise.block_at(99, pos)).unwrap();
            assert_eq!(extent.block(pos), Some(&expected));
        }
    }

    #[test]
    fn test_regen_chunk_failure_aborts_and_cleans_up() {
        let f = fixture();
        f.server.inject_chunk_failure(ChunkPos::new(1, 0));
        let region = CuboidRegion::new(BlockPos::new(0, 0, 0), BlockPos::new(31, 0, 15));
        let mut extent = BufferedExtent::new();

        let err = f
            .adapter
            .regenerate(f.world.as_ref(), &region, &mut extent, RegenOptions::new())
            .unwrap_err();
        match err {
            BridgeError::ChunkGenerationFailed { pos, .. } => assert_eq!(pos, ChunkPos::new(1, 0)),
            other => panic!("unexpected {:?}", other),
        }
        assert!(extent.blocks.is_empty());
        let dir = f.server.last_storage_dir().unwrap();
        assert!(!dir.parent().unwrap().exists());
        assert!(!f.server.is_world_registered("hearthregentempworld"));

        // The singleton name is free again
        f.server.clear_chunk_failures();
        assert!(f
            .adapter
            .regenerate(f.world.as_ref(), &region, &mut extent, RegenOptions::new())
            .is_ok());
        assert_eq!(extent.blocks.len(), 32 * 16);
    }

    #[test]
    fn test_regen_refuses_while_temp_world_registered() {
        let f = fixture();
        f.server
            .create_live_world("hearthregentempworld", f.flat.clone(), 0)
            .unwrap();
        let region = CuboidRegion::new(BlockPos::new(0, 0, 0), BlockPos::new(1, 0, 1));
        let mut extent = BufferedExtent::new();
        let result = f
            .adapter
            .regenerate(f.world.as_ref(), &region, &mut extent, RegenOptions::new());
        assert!(matches!(result, Err(BridgeError::RegenInProgress { .. })));
        // The foreign registration is left alone
        assert!(f.server.is_world_registered("hearthregentempworld"));
    }
}
