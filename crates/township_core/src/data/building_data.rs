//! Data-driven building definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::buildings::Building;
use crate::game_state::GameState;
use crate::map::{Field, Terrain};
use crate::resources::Resources;

/// Data-driven building definition.
///
/// # Example RON
///
/// ```ron
/// BuildingData(
///     id: "farm",
///     name: "Farm",
///     description: "Feeds the city.",
///     base_price: 120,
///     allowed_terrain: [Plains],
///     requires_adjacent: Some(Water),
///     terrain_price_percent: {Plains: 100},
///     per_turn: (food: 5),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingData {
    /// Unique string identifier for this building type.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Flavour text.
    #[serde(default)]
    pub description: String,

    /// Catalog price, before terrain modifiers.
    pub base_price: i64,

    /// Terrain the building may stand on. Empty means any land that is not
    /// water or mountains.
    #[serde(default)]
    pub allowed_terrain: Vec<Terrain>,

    /// Terrain that must appear among the eight neighbours.
    #[serde(default)]
    pub requires_adjacent: Option<Terrain>,

    /// Price multiplier per terrain, in percent. Missing terrain is 100.
    #[serde(default)]
    pub terrain_price_percent: BTreeMap<Terrain, i64>,

    /// One-off effect once built and paid for.
    #[serde(default)]
    pub on_build: Resources,

    /// Effect applied at every turn change.
    #[serde(default)]
    pub per_turn: Resources,

    /// Effect applied when demolished.
    #[serde(default)]
    pub on_destroy: Resources,
}

impl BuildingData {
    /// Create a definition with no effects that fits on any open land.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_price: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            base_price,
            allowed_terrain: Vec::new(),
            requires_adjacent: None,
            terrain_price_percent: BTreeMap::new(),
            on_build: Resources::ZERO,
            per_turn: Resources::ZERO,
            on_destroy: Resources::ZERO,
        }
    }

    /// Check if the building may stand on `terrain`.
    #[must_use]
    pub fn allows_terrain(&self, terrain: Terrain) -> bool {
        if self.allowed_terrain.is_empty() {
            !matches!(terrain, Terrain::Water | Terrain::Mountains)
        } else {
            self.allowed_terrain.contains(&terrain)
        }
    }

    /// Price multiplier for `terrain`, in percent.
    #[must_use]
    pub fn price_percent(&self, terrain: Terrain) -> i64 {
        self.terrain_price_percent
            .get(&terrain)
            .copied()
            .unwrap_or(100)
    }

    /// Effective price on `terrain`.
    ///
    /// Saturates at the `i64` range instead of overflowing.
    #[must_use]
    pub fn price_on(&self, terrain: Terrain) -> i64 {
        let wide = i128::from(self.base_price) * i128::from(self.price_percent(terrain)) / 100;
        i64::try_from(wide).unwrap_or(if wide < 0 { i64::MIN } else { i64::MAX })
    }
}

/// A [`Building`] backed by a [`BuildingData`] definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogBuilding {
    data: BuildingData,
    price: i64,
}

impl CatalogBuilding {
    /// Create a template from a definition. The price starts at the base price.
    #[must_use]
    pub fn new(data: BuildingData) -> Self {
        let price = data.base_price;
        Self { data, price }
    }

    /// The underlying definition.
    #[must_use]
    pub const fn data(&self) -> &BuildingData {
        &self.data
    }
}

impl Building for CatalogBuilding {
    fn name(&self) -> &str {
        &self.data.id
    }

    fn base_price(&self) -> i64 {
        self.data.base_price
    }

    fn price(&self) -> i64 {
        self.price
    }

    fn can_be_built(&self, field: &Field, neighbors: &[Field]) -> bool {
        field.is_empty()
            && self.data.allows_terrain(field.terrain)
            && self
                .data
                .requires_adjacent
                .map_or(true, |needed| neighbors.iter().any(|n| n.terrain == needed))
    }

    fn on_placed(&mut self, field: &Field, _neighbors: &[Field]) {
        self.price = self.data.price_on(field.terrain);
    }

    fn on_build(&mut self, game: &mut GameState) {
        *game.resources_mut() += self.data.on_build;
    }

    fn on_destroy(&mut self, game: &mut GameState) {
        *game.resources_mut() += self.data.on_destroy;
    }

    fn on_next_turn(&mut self, game: &mut GameState) {
        *game.resources_mut() += self.data.per_turn;
    }

    fn clone_box(&self) -> Box<dyn Building> {
        Box::new(self.clone())
    }
}
