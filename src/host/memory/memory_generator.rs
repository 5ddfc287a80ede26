//! Terrain generators for the in-memory host

use dashmap::DashMap;
use noise::{NoiseFn, Perlin};

use crate::constants::chunk::MIN_BUILD_HEIGHT;
use crate::host::host_block::HostBlockState;
use crate::host::host_world::{BlockRegistry, ChunkGenerator};
use crate::world::core::BlockPos;

/// Horizontal layers stacked up from the bottom of the world; seed is ignored
pub struct FlatGenerator {
    layers: Vec<HostBlockState>,
    air: HostBlockState,
    biome: String,
}

impl FlatGenerator {
    pub fn new(layers: Vec<HostBlockState>, air: HostBlockState, biome: impl Into<String>) -> Self {
        Self {
            layers,
            air,
            biome: biome.into(),
        }
    }

    /// Bedrock, two dirt, grass; the classic superflat preset
    pub fn classic(registry: &dyn BlockRegistry) -> Option<Self> {
        let state = |key: &str| registry.block(key).map(|b| b.default_state());
        Some(Self::new(
            vec![
                state("minecraft:bedrock")?,
                state("minecraft:dirt")?,
                state("minecraft:dirt")?,
                state("minecraft:grass_block")?,
            ],
            registry.default_block().default_state(),
            "minecraft:plains",
        ))
    }

    /// Highest y occupied by a layer
    pub fn surface_y(&self) -> i32 {
        MIN_BUILD_HEIGHT + self.layers.len() as i32 - 1
    }
}

impl ChunkGenerator for FlatGenerator {
    fn name(&self) -> &str {
        "flat"
    }

    fn block_at(&self, _seed: i64, pos: BlockPos) -> HostBlockState {
        let index = pos.y - MIN_BUILD_HEIGHT;
        if index < 0 {
            return self.air.clone();
        }
        self.layers
            .get(index as usize)
            .cloned()
            .unwrap_or_else(|| self.air.clone())
    }

    fn biome_at(&self, _seed: i64, _pos: BlockPos) -> String {
        self.biome.clone()
    }
}

/// Materials the noise generator paints with
#[derive(Clone)]
pub struct NoisePalette {
    pub air: HostBlockState,
    pub bedrock: HostBlockState,
    pub stone: HostBlockState,
    pub dirt: HostBlockState,
    pub grass: HostBlockState,
    pub sand: HostBlockState,
}

impl NoisePalette {
    pub fn from_registry(registry: &dyn BlockRegistry) -> Option<Self> {
        let state = |key: &str| registry.block(key).map(|b| b.default_state());
        Some(Self {
            air: registry.default_block().default_state(),
            bedrock: state("minecraft:bedrock")?,
            stone: state("minecraft:stone")?,
            dirt: state("minecraft:dirt")?,
            grass: state("minecraft:grass_block")?,
            sand: state("minecraft:sand")?,
        })
    }
}

/// Seeded Perlin heightmap terrain with a desert/plains biome split
pub struct NoiseGenerator {
    palette: NoisePalette,
    sea_level: i32,
    amplitude: f64,
    scale: f64,
    perlins: DashMap<i64, Perlin>,
}

impl NoiseGenerator {
    pub fn new(palette: NoisePalette) -> Self {
        Self {
            palette,
            sea_level: 64,
            amplitude: 24.0,
            scale: 96.0,
            perlins: DashMap::new(),
        }
    }

    fn perlin(&self, seed: i64) -> Perlin {
        self.perlins
            .entry(seed)
            .or_insert_with(|| Perlin::new((seed ^ (seed >> 32)) as u32))
            .clone()
    }

    pub fn surface_height(&self, seed: i64, x: i32, z: i32) -> i32 {
        let sample = self
            .perlin(seed)
            .get([x as f64 / self.scale, z as f64 / self.scale]);
        self.sea_level + (sample * self.amplitude).round() as i32
    }

    fn is_desert(&self, seed: i64, x: i32, z: i32) -> bool {
        let sample = self
            .perlin(seed)
            .get([x as f64 / 512.0 + 1000.5, z as f64 / 512.0 - 1000.5]);
        sample > 0.25
    }
}

impl ChunkGenerator for NoiseGenerator {
    fn name(&self) -> &str {
        "noise"
    }

    fn block_at(&self, seed: i64, pos: BlockPos) -> HostBlockState {
        if pos.y == MIN_BUILD_HEIGHT {
            return self.palette.bedrock.clone();
        }
        let height = self.surface_height(seed, pos.x, pos.z);
        let desert = self.is_desert(seed, pos.x, pos.z);
        let state = if pos.y > height || pos.y < MIN_BUILD_HEIGHT {
            &self.palette.air
        } else if pos.y == height {
            if desert {
                &self.palette.sand
            } else {
                &self.palette.grass
            }
        } else if pos.y > height - 4 {
            if desert {
                &self.palette.sand
            } else {
                &self.palette.dirt
            }
        } else {
            &self.palette.stone
        };
        state.clone()
    }

    fn biome_at(&self, seed: i64, pos: BlockPos) -> String {
        if self.is_desert(seed, pos.x, pos.z) {
            "minecraft:desert".to_string()
        } else {
            "minecraft:plains".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryBlockRegistry;
    use crate::host::memory::vocabulary::default_blocks;

    #[test]
    fn test_flat_layers() {
        let registry = MemoryBlockRegistry::new(default_blocks());
        let flat = FlatGenerator::classic(&registry).unwrap();
        let bottom = flat.block_at(0, BlockPos::new(0, MIN_BUILD_HEIGHT, 0));
        assert_eq!(bottom.block().key(), "minecraft:bedrock");
        let top = flat.block_at(0, BlockPos::new(5, flat.surface_y(), 9));
        assert_eq!(top.block().key(), "minecraft:grass_block");
        assert!(flat.block_at(0, BlockPos::new(0, 100, 0)).is_air());
    }

    #[test]
    fn test_noise_is_deterministic_per_seed() {
        let registry = MemoryBlockRegistry::new(default_blocks());
        let noise = NoiseGenerator::new(NoisePalette::from_registry(&registry).unwrap());
        let a = noise.surface_height(42, 100, -37);
        let b = noise.surface_height(42, 100, -37);
        assert_eq!(a, b);
        let pos = BlockPos::new(100, a, -37);
        assert!(!noise.block_at(42, pos).is_air());
        assert!(noise.block_at(42, pos.above()).is_air());
    }
}
