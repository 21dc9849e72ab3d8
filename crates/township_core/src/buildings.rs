//! Building capability and the registry of placed buildings.
//!
//! Buildings are trait objects. The catalog holds templates; placement
//! always deep-copies a template through [`Building::clone_box`], so a
//! placed building never aliases the template it came from.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game_state::GameState;
use crate::map::Field;

/// Handle of a placed building.
///
/// Allocated monotonically per game, so ordering by id is placement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Behaviour of a building type.
///
/// Hooks receive the whole game state and may change resources, the map or
/// the event decks. They must not call back into `build`, `demolish` or
/// `end_turn`. While a hook runs, the building stays registered and on the
/// map, so the registry and the map agree in every state a hook observes.
pub trait Building: fmt::Debug {
    /// Stable identifier of the building type.
    fn name(&self) -> &str;

    /// Catalog price, checked before placement.
    fn base_price(&self) -> i64;

    /// Effective price once bound to a field.
    fn price(&self) -> i64;

    /// Placement predicate for the target field and its neighbours.
    fn can_be_built(&self, field: &Field, neighbors: &[Field]) -> bool;

    /// Called on the fresh copy right after it is put on the map.
    ///
    /// Recompute `price` here for terrain-dependent pricing.
    fn on_placed(&mut self, _field: &Field, _neighbors: &[Field]) {}

    /// Called once after the building is paid for.
    fn on_build(&mut self, _game: &mut GameState) {}

    /// Called after the building is removed from the map.
    fn on_destroy(&mut self, _game: &mut GameState) {}

    /// Called at every turn change while the building stands.
    fn on_next_turn(&mut self, _game: &mut GameState) {}

    /// Deep copy sharing no mutable state with `self`.
    fn clone_box(&self) -> Box<dyn Building>;
}

impl Clone for Box<dyn Building> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A building standing on the map.
#[derive(Debug, Clone)]
pub struct PlacedBuilding {
    /// Registry handle, also stored in the map field.
    pub id: BuildingId,
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// The instance itself.
    pub building: Box<dyn Building>,
}

/// Every building on the map, keyed by id.
///
/// Kept in sync with the map so per-turn effects need not scan the grid.
#[derive(Debug, Clone, Default)]
pub struct BuildingRegistry {
    placed: BTreeMap<BuildingId, PlacedBuilding>,
    next_id: u32,
}

impl BuildingRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next newly placed building will get.
    #[must_use]
    pub const fn next_id(&self) -> BuildingId {
        BuildingId(self.next_id)
    }

    /// Register a placed building.
    ///
    /// Inserting `next_id()` consumes it; reinserting a removed building
    /// keeps its old id.
    pub fn insert(&mut self, placed: PlacedBuilding) {
        self.next_id = self.next_id.max(placed.id.0 + 1);
        self.placed.insert(placed.id, placed);
    }

    /// Remove a building from the registry.
    pub fn remove(&mut self, id: BuildingId) -> Option<PlacedBuilding> {
        self.placed.remove(&id)
    }

    /// Look up a building.
    #[must_use]
    pub fn get(&self, id: BuildingId) -> Option<&PlacedBuilding> {
        self.placed.get(&id)
    }

    /// Look up a building for modification.
    pub fn get_mut(&mut self, id: BuildingId) -> Option<&mut PlacedBuilding> {
        self.placed.get_mut(&id)
    }

    /// Check if a building is registered.
    #[must_use]
    pub fn contains(&self, id: BuildingId) -> bool {
        self.placed.contains_key(&id)
    }

    /// All ids in placement order.
    #[must_use]
    pub fn ids(&self) -> Vec<BuildingId> {
        self.placed.keys().copied().collect()
    }

    /// Iterate in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedBuilding> {
        self.placed.values()
    }

    /// Number of buildings of a given type.
    #[must_use]
    pub fn count_named(&self, name: &str) -> usize {
        self.placed
            .values()
            .filter(|p| p.building.name() == name)
            .count()
    }

    /// Number of placed buildings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    /// Check if nothing is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
}
