//! Seeded terrain generation.
//!
//! Draws each field from a weighted terrain table, then runs one smoothing
//! pass so that lakes and forests clump together instead of looking like
//! noise. The same seed always produces the same map.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::map::{GridMap, Terrain, TerrainMap};

/// Neighbours (out of eight) that must agree before smoothing flips a field.
const SMOOTHING_MAJORITY: usize = 5;

/// Relative frequency of each terrain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainWeights {
    /// Weight of plains.
    pub plains: u32,
    /// Weight of forest.
    pub forest: u32,
    /// Weight of hills.
    pub hills: u32,
    /// Weight of water.
    pub water: u32,
    /// Weight of desert.
    pub desert: u32,
    /// Weight of mountains.
    pub mountains: u32,
}

impl Default for TerrainWeights {
    fn default() -> Self {
        Self {
            plains: 50,
            forest: 20,
            hills: 12,
            water: 10,
            desert: 5,
            mountains: 3,
        }
    }
}

impl TerrainWeights {
    /// Weight for a single terrain.
    #[must_use]
    pub const fn weight(&self, terrain: Terrain) -> u32 {
        match terrain {
            Terrain::Plains => self.plains,
            Terrain::Forest => self.forest,
            Terrain::Hills => self.hills,
            Terrain::Water => self.water,
            Terrain::Desert => self.desert,
            Terrain::Mountains => self.mountains,
        }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> u32 {
        Terrain::ALL.iter().map(|&t| self.weight(t)).sum()
    }
}

/// Map configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Map width in fields.
    pub width: u32,
    /// Map height in fields.
    pub height: u32,
    /// Terrain frequencies.
    pub weights: TerrainWeights,
    /// Whether to run the clumping pass.
    pub smooth: bool,
    /// Random seed for deterministic generation.
    pub seed: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            weights: TerrainWeights::default(),
            smooth: true,
            seed: 42,
        }
    }
}

impl MapConfig {
    /// Create a small 16x16 map, handy for tests and demos.
    #[must_use]
    pub fn small() -> Self {
        Self {
            width: 16,
            height: 16,
            ..Default::default()
        }
    }

    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the map dimensions.
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Generate a map with the given configuration.
///
/// A configuration whose weights are all zero yields plains everywhere.
///
/// # Panics
///
/// Panics if `width` or `height` is zero.
#[must_use]
pub fn generate_map(config: &MapConfig) -> GridMap {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let total = config.weights.total();

    let mut map = GridMap::from_fn(config.width, config.height, |_, _| {
        if total == 0 {
            Terrain::Plains
        } else {
            pick_terrain(&config.weights, rng.gen_range(0..total))
        }
    });

    if config.smooth {
        smooth(&mut map);
    }

    tracing::debug!(
        width = config.width,
        height = config.height,
        seed = config.seed,
        water = map.count_terrain(Terrain::Water),
        "Generated terrain"
    );
    map
}

fn pick_terrain(weights: &TerrainWeights, mut roll: u32) -> Terrain {
    for terrain in Terrain::ALL {
        let weight = weights.weight(terrain);
        if roll < weight {
            return terrain;
        }
        roll -= weight;
    }
    Terrain::Plains
}

/// Flip every field whose neighbourhood is dominated by another terrain.
///
/// Reads from a snapshot so the pass does not feed on its own output.
fn smooth(map: &mut GridMap) {
    let snapshot = map.clone();
    for field in snapshot.fields() {
        let neighbors = snapshot.neighbors(field.x, field.y);
        let dominant = Terrain::ALL
            .into_iter()
            .filter(|&t| t != field.terrain)
            .find(|&t| neighbors.iter().filter(|n| n.terrain == t).count() >= SMOOTHING_MAJORITY);
        if let Some(terrain) = dominant {
            map.set_terrain(field.x, field.y, terrain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MapConfig::default();
        assert_eq!(config.width, 100);
        assert_eq!(config.height, 100);
        assert!(config.smooth);
    }

    #[test]
    fn test_generate_small_map() {
        let map = generate_map(&MapConfig::small().with_seed(12345));

        assert_eq!(map.width(), 16);
        assert_eq!(map.height(), 16);
        assert_eq!(map.fields().count(), 256);
        assert!(map.fields().all(|f| f.is_empty()));
    }

    #[test]
    fn test_determinism() {
        let map1 = generate_map(&MapConfig::small().with_seed(42));
        let map2 = generate_map(&MapConfig::small().with_seed(42));

        assert_eq!(map1, map2);
    }

    #[test]
    fn test_different_seeds() {
        let map1 = generate_map(&MapConfig::default().with_seed(1));
        let map2 = generate_map(&MapConfig::default().with_seed(2));

        assert_ne!(map1, map2);
    }

    #[test]
    fn test_single_weight_gives_uniform_terrain() {
        let config = MapConfig {
            weights: TerrainWeights {
                plains: 0,
                forest: 0,
                hills: 0,
                water: 1,
                desert: 0,
                mountains: 0,
            },
            ..MapConfig::small()
        };
        let map = generate_map(&config);
        assert_eq!(map.count_terrain(Terrain::Water), 256);
    }

    #[test]
    fn test_zero_weights_fall_back_to_plains() {
        let config = MapConfig {
            weights: TerrainWeights {
                plains: 0,
                forest: 0,
                hills: 0,
                water: 0,
                desert: 0,
                mountains: 0,
            },
            ..MapConfig::small().with_size(4, 4)
        };
        let map = generate_map(&config);
        assert_eq!(map.count_terrain(Terrain::Plains), 16);
    }

    #[test]
    fn test_smoothing_absorbs_isolated_field() {
        let mut map = GridMap::filled(3, 3, Terrain::Forest);
        map.set_terrain(1, 1, Terrain::Desert);

        smooth(&mut map);

        assert_eq!(map.field(1, 1).map(|f| f.terrain), Some(Terrain::Forest));
    }

    #[test]
    fn test_pick_terrain_walks_weight_table() {
        let weights = TerrainWeights::default();
        assert_eq!(pick_terrain(&weights, 0), Terrain::Plains);
        assert_eq!(pick_terrain(&weights, 50), Terrain::Forest);
        assert_eq!(pick_terrain(&weights, 82), Terrain::Water);
        assert_eq!(pick_terrain(&weights, 99), Terrain::Mountains);
    }
}
