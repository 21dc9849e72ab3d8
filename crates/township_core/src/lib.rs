//! # Township Core
//!
//! Turn, action and event state machine for a turn-based city builder.
//!
//! This crate contains **only** game rules:
//! - No rendering
//! - No persistence of game state
//! - No global randomness (the event die is injected)
//!
//! ## Crate Structure
//!
//! - [`game_state`] - The state machine: `build`, `demolish`,
//!   `get_next_event`, `end_turn`
//! - [`buildings`] - Building capability and the placed-building registry
//! - [`events`] - Event capability and the pending/active/inactive decks
//! - [`map`] - Map capability and the reference grid
//! - [`map_generation`] - Seeded terrain generation
//! - [`data`] - RON content: building catalog and narrative events
//! - [`config`] - Session configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod actions;
pub mod buildings;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod game_state;
pub mod map;
pub mod map_generation;
pub mod report;
pub mod resources;
pub mod rng;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::actions::{ActionOutcome, PlayerAction};
    pub use crate::buildings::{Building, BuildingId, BuildingRegistry, PlacedBuilding};
    pub use crate::config::GameConfig;
    pub use crate::data::{BuildingData, CatalogBuilding, Condition, ContentPack, EventData, NarrativeEvent};
    pub use crate::error::{DataLoadError, GameplayError, Result};
    pub use crate::events::{Event, EventDecks};
    pub use crate::game_state::GameState;
    pub use crate::map::{Field, GridMap, Terrain, TerrainMap};
    pub use crate::map_generation::{generate_map, MapConfig};
    pub use crate::report::{GameSummary, RejectedAction, ScriptReport, TurnReport};
    pub use crate::resources::{ResourceKind, Resources};
    pub use crate::rng::{RandomSource, SimRng};
}
