//! Game configuration.
//!
//! Every numeric knob of a session lives here so balancing never touches
//! the state machine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{parse_ron, read_ron, INLINE_SOURCE};
use crate::error::DataLoadError;
use crate::map_generation::MapConfig;
use crate::resources::Resources;
use crate::rng::DEFAULT_SEED;

/// Default action budget per turn.
pub const DEFAULT_ACTIONS_PER_TURN: u32 = 3;

/// Default event die. An event fires when the roll equals the number of sides.
pub const DEFAULT_EVENT_DIE_SIDES: u32 = 10;

/// Settings for one game session.
///
/// # Example RON
///
/// ```ron
/// GameConfig(
///     actions_per_turn: 3,
///     starting_resources: (money: 1000, population: 100),
///     map: (width: 32, height: 32),
///     event_die_sides: 10,
///     seed: 7,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Actions available at the start of every turn.
    pub actions_per_turn: u32,
    /// Resources at turn 1.
    pub starting_resources: Resources,
    /// Terrain generation settings. Its seed is replaced by [`GameConfig::seed`].
    pub map: MapConfig,
    /// Faces of the event die.
    pub event_die_sides: u32,
    /// Seeds both terrain generation and the event die.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            actions_per_turn: DEFAULT_ACTIONS_PER_TURN,
            starting_resources: Resources::new(1000, 100),
            map: MapConfig::default(),
            event_die_sides: DEFAULT_EVENT_DIE_SIDES,
            seed: DEFAULT_SEED,
        }
    }
}

impl GameConfig {
    /// Set the session seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the map dimensions.
    #[must_use]
    pub const fn with_map_size(mut self, width: u32, height: u32) -> Self {
        self.map.width = width;
        self.map.height = height;
        self
    }

    /// Map settings with the session seed applied.
    #[must_use]
    pub fn seeded_map(&self) -> MapConfig {
        self.map.clone().with_seed(self.seed)
    }

    /// Parse a configuration from a RON string without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError::Parse`] if the string is not a valid config.
    pub fn from_ron_str(source: &str) -> Result<Self, DataLoadError> {
        parse_ron(source, Path::new(INLINE_SOURCE))
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or fails
    /// [`GameConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let config: Self = read_ron(path)?;
        config.check()?;
        tracing::debug!("Loaded game config from '{}'", path.display());
        Ok(config)
    }

    /// Check the configuration for values the game cannot run with.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.map.width == 0 || self.map.height == 0 {
            errors.push(format!(
                "Map must be at least 1x1, got {}x{}",
                self.map.width, self.map.height
            ));
        }
        if self.event_die_sides == 0 {
            errors.push("Event die needs at least one side".to_string());
        }
        if self.map.weights.total() == 0 {
            tracing::warn!("All terrain weights are zero, the map will be plains only");
        }
        errors
    }

    /// [`GameConfig::validate`] as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError::Validation`] listing every problem.
    pub fn check(&self) -> Result<(), DataLoadError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DataLoadError::Validation { errors })
        }
    }
}
