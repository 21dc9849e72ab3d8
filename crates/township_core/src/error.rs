//! Error types for the game state machine and content loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`GameplayError`].
pub type Result<T> = std::result::Result<T, GameplayError>;

/// A rejected player operation.
///
/// Every variant is a recoverable rule violation. The game state is left
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameplayError {
    /// Pending events must be acknowledged first.
    #[error("You still have unhandled events.")]
    EventsPending,

    /// The action budget for this turn is spent.
    #[error("You don't have enough actions left.")]
    NoActionsLeft,

    /// Not enough money for the building.
    #[error("You don't have enough money to build this: need {required}, have {available}")]
    InsufficientFunds {
        /// Price of the building.
        required: i64,
        /// Money in the treasury.
        available: i64,
    },

    /// The building cannot stand on the requested field.
    #[error("This building cannot be created at ({x}, {y}): {reason}")]
    InvalidPlacement {
        /// Target column.
        x: u32,
        /// Target row.
        y: u32,
        /// Why the field was rejected.
        reason: String,
    },

    /// Demolish targeted an empty field.
    #[error("Nothing to destroy at ({x}, {y})!")]
    NothingToDemolish {
        /// Target column.
        x: u32,
        /// Target row.
        y: u32,
    },

    /// Catalog index does not exist.
    #[error("No building with catalog index {0}")]
    UnknownBuilding(usize),

    /// Coordinates fall outside the map.
    #[error("Position ({x}, {y}) is outside the map")]
    OutOfBounds {
        /// Target column.
        x: u32,
        /// Target row.
        y: u32,
    },
}

/// Errors raised while loading configuration or content files.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// Failed to read file.
    #[error("Failed to read file '{path}': {source}")]
    Io {
        /// Path to the file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse RON.
    #[error("Failed to parse RON file '{path}': {source}")]
    Parse {
        /// Path to the file (or `<inline>` for string input).
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: ron::error::SpannedError,
    },

    /// Content parsed but is not coherent.
    #[error("Content validation failed: {errors:?}")]
    Validation {
        /// Every problem found.
        errors: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        let err = GameplayError::InsufficientFunds {
            required: 100,
            available: 50,
        };
        assert_eq!(
            err.to_string(),
            "You don't have enough money to build this: need 100, have 50"
        );
        assert_eq!(
            GameplayError::NothingToDemolish { x: 1, y: 2 }.to_string(),
            "Nothing to destroy at (1, 2)!"
        );
    }

    #[test]
    fn test_validation_error_lists_problems() {
        let err = DataLoadError::Validation {
            errors: vec!["duplicate building id 'farm'".to_string()],
        };
        assert!(err.to_string().contains("duplicate building id 'farm'"));
    }
}
