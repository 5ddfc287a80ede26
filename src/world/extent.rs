//! Destination extents
//!
//! An extent is a caller-owned mutable accumulator. Writes are not
//! transactional: a failed regeneration leaves earlier writes in place.

use std::collections::BTreeMap;

use super::core::BlockPos;
use crate::error::BridgeResult;
use crate::state::{BiomeType, BlockState};

/// Something blocks and biomes can be written into
pub trait Extent {
    /// Returns true if the block was changed
    fn set_block(&mut self, pos: BlockPos, block: BlockState) -> BridgeResult<bool>;

    /// Returns true if the biome was changed
    fn set_biome(&mut self, pos: BlockPos, biome: BiomeType) -> bool;
}

/// In-memory extent that records every write
#[derive(Debug, Clone, Default)]
pub struct BufferedExtent {
    pub blocks: BTreeMap<BlockPos, BlockState>,
    pub biomes: BTreeMap<BlockPos, BiomeType>,
}

impl BufferedExtent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&self, pos: BlockPos) -> Option<&BlockState> {
        self.blocks.get(&pos)
    }

    pub fn biome(&self, pos: BlockPos) -> Option<&BiomeType> {
        self.biomes.get(&pos)
    }
}

impl Extent for BufferedExtent {
    fn set_block(&mut self, pos: BlockPos, block: BlockState) -> BridgeResult<bool> {
        let changed = self.blocks.get(&pos) != Some(&block);
        self.blocks.insert(pos, block);
        Ok(changed)
    }

    fn set_biome(&mut self, pos: BlockPos, biome: BiomeType) -> bool {
        self.biomes.insert(pos, biome.clone()) != Some(biome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_extent_reports_changes() {
        let mut extent = BufferedExtent::new();
        let pos = BlockPos::new(1, 2, 3);
        let stone = BlockState::new("minecraft:stone");
        assert!(extent.set_block(pos, stone.clone()).unwrap());
        assert!(!extent.set_block(pos, stone.clone()).unwrap());
        assert_eq!(extent.block(pos), Some(&stone));

        assert!(extent.set_biome(pos, BiomeType::new("minecraft:plains")));
        assert!(!extent.set_biome(pos, BiomeType::new("minecraft:plains")));
    }
}
