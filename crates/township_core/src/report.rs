//! Read-only reports produced by the game state.
//!
//! These are snapshots for logging and tooling, not a save format.

use serde::{Deserialize, Serialize};

use crate::actions::PlayerAction;
use crate::buildings::BuildingId;
use crate::resources::Resources;

/// What happened during one `end_turn`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Turn number after the change.
    pub turn: u32,
    /// Events that joined the active deck, in move order.
    pub activated: Vec<String>,
    /// Events that dropped to the inactive deck, in move order.
    pub deactivated: Vec<String>,
    /// Event die result, if the die was rolled.
    pub roll: Option<u32>,
    /// Event that fired and now awaits acknowledgement.
    pub triggered: Option<String>,
}

/// An action the game refused while running a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedAction {
    /// Zero-based position in the script.
    pub step: usize,
    /// The action itself.
    pub action: PlayerAction,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of [`crate::game_state::GameState::run_script`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptReport {
    /// Actions the game accepted.
    pub applied: usize,
    /// Actions the game refused, in script order.
    pub rejected: Vec<RejectedAction>,
    /// Events acknowledged, by the script or automatically.
    pub events_seen: Vec<String>,
}

/// One placed building in a [`GameSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSummary {
    /// Registry handle.
    pub id: BuildingId,
    /// Building type.
    pub name: String,
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Price paid.
    pub price: i64,
}

/// Snapshot of a game for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Current turn.
    pub turn: u32,
    /// Resource pool.
    pub resources: Resources,
    /// Actions left this turn.
    pub actions_remaining: u32,
    /// Action budget per turn.
    pub actions_max: u32,
    /// Placed buildings in placement order.
    pub buildings: Vec<BuildingSummary>,
    /// Pending event names, oldest first.
    pub pending_events: Vec<String>,
    /// Active event names, next to fire first.
    pub active_events: Vec<String>,
    /// Inactive event names.
    pub inactive_events: Vec<String>,
    /// [`crate::game_state::GameState::state_hash`] at snapshot time.
    pub state_hash: u64,
}
