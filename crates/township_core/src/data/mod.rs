//! Data structures for content files.
//!
//! Building catalogs and narrative events are plain structs deserialized
//! from RON. Loading takes either a string or a path; nothing here touches
//! the filesystem beyond reading the one file it is given.

mod building_data;
mod content;
mod event_data;

use std::path::Path;

use serde::de::DeserializeOwned;

pub use building_data::{BuildingData, CatalogBuilding};
pub use content::ContentPack;
pub use event_data::{Condition, EventData, NarrativeEvent};

use crate::error::DataLoadError;

/// Placeholder path reported for string input.
pub(crate) const INLINE_SOURCE: &str = "<inline>";

/// Parse a RON document, attributing errors to `path`.
pub(crate) fn parse_ron<T: DeserializeOwned>(source: &str, path: &Path) -> Result<T, DataLoadError> {
    ron::from_str(source).map_err(|e| DataLoadError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read and parse a RON file.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|e| DataLoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_ron(&contents, path)
}
