//! Player actions as data.
//!
//! Scripts, replays and property tests drive the game through
//! [`PlayerAction`] values instead of calling the mutators directly.

use serde::{Deserialize, Serialize};

use crate::buildings::{Building, BuildingId};
use crate::events::Event;
use crate::report::TurnReport;

/// A single player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Place catalog entry `index` at (x, y).
    Build {
        /// Catalog index.
        index: usize,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// Remove the building at (x, y).
    Demolish {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// Acknowledge the oldest pending event.
    NextEvent,
    /// Finish the turn.
    EndTurn,
}

impl PlayerAction {
    /// Check if the action spends from the per-turn budget.
    #[must_use]
    pub const fn costs_action(&self) -> bool {
        matches!(self, Self::Build { .. } | Self::Demolish { .. })
    }
}

/// Result of a successfully applied [`PlayerAction`].
#[derive(Debug)]
pub enum ActionOutcome {
    /// A building was placed.
    Built(BuildingId),
    /// A building was removed.
    Demolished(Box<dyn Building>),
    /// The oldest pending event, if there was one.
    Event(Option<Box<dyn Event>>),
    /// The turn ended.
    TurnEnded(TurnReport),
}
