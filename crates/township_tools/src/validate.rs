//! Data validation utilities.

use std::path::Path;

use serde::Serialize;
use township_core::config::GameConfig;
use township_core::data::ContentPack;
use township_core::game_state::GameState;

use crate::error::{Result, ToolError};

/// Configuration file name inside a data directory.
pub const CONFIG_FILE: &str = "game.ron";

/// Content file name inside a data directory.
pub const CONTENT_FILE: &str = "content.ron";

/// What a valid data directory contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSummary {
    /// Catalog size.
    pub buildings: usize,
    /// Events starting in the active deck.
    pub active_events: usize,
    /// Events starting in the inactive deck.
    pub inactive_events: usize,
    /// Map dimensions.
    pub map_size: (u32, u32),
}

/// Load and validate the configuration and content of a data directory.
///
/// # Errors
///
/// Returns an error if the directory is missing or either file fails to
/// load or validate.
pub fn load_data_directory(path: &Path) -> Result<(GameConfig, ContentPack)> {
    if !path.is_dir() {
        return Err(ToolError::MissingDirectory(path.display().to_string()));
    }

    let config = GameConfig::load(&path.join(CONFIG_FILE))?;
    let pack = ContentPack::load(&path.join(CONTENT_FILE))?;
    Ok((config, pack))
}

/// Validate all RON data files in a directory.
///
/// Also builds a game from them, so a directory that passes is playable.
///
/// # Errors
///
/// Returns an error if any data file fails validation.
pub fn validate_data_directory(path: &Path) -> Result<DataSummary> {
    let (config, pack) = load_data_directory(path)?;
    let game = GameState::from_content(&config, &pack)?;

    let summary = DataSummary {
        buildings: game.catalog().len(),
        active_events: game.events().active_len(),
        inactive_events: game.events().inactive_len(),
        map_size: (game.map().width(), game.map().height()),
    };

    tracing::debug!(?summary, "Data directory is valid");
    Ok(summary)
}
