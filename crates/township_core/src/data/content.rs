//! A building catalog and event set loaded together.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{parse_ron, read_ron, BuildingData, CatalogBuilding, EventData, NarrativeEvent, INLINE_SOURCE};
use crate::buildings::Building;
use crate::error::DataLoadError;
use crate::events::Event;

/// Largest base price a content pack may declare.
pub const MAX_BASE_PRICE: i64 = 1_000_000_000_000;

/// Largest terrain price multiplier, in percent.
pub const MAX_PRICE_PERCENT: i64 = 100_000;

/// Everything a game needs besides its configuration.
///
/// # Example RON
///
/// ```ron
/// ContentPack(
///     buildings: [
///         (id: "house", name: "House", base_price: 100, per_turn: (money: 10)),
///     ],
///     events: [
///         (id: "fire", title: "Fire!", starts_active: true),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPack {
    /// Building catalog, in catalog index order.
    #[serde(default)]
    pub buildings: Vec<BuildingData>,

    /// Every narrative event.
    #[serde(default)]
    pub events: Vec<EventData>,
}

impl ContentPack {
    /// Parse a content pack from a RON string without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError::Parse`] if the string is not a valid pack.
    pub fn from_ron_str(source: &str) -> Result<Self, DataLoadError> {
        parse_ron(source, Path::new(INLINE_SOURCE))
    }

    /// Load and validate a content pack from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or fails
    /// [`ContentPack::validate`].
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let pack: Self = read_ron(path)?;

        let errors = pack.validate();
        if !errors.is_empty() {
            return Err(DataLoadError::Validation { errors });
        }

        tracing::info!(
            "Loaded content from '{}' with {} buildings, {} events",
            path.display(),
            pack.buildings.len(),
            pack.events.len()
        );

        Ok(pack)
    }

    /// Look up a building definition by id.
    #[must_use]
    pub fn get_building(&self, id: &str) -> Option<&BuildingData> {
        self.buildings.iter().find(|b| b.id == id)
    }

    /// Look up an event definition by id.
    #[must_use]
    pub fn get_event(&self, id: &str) -> Option<&EventData> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Check the pack for internal consistency.
    ///
    /// Returns a list of problems; empty means the pack is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        for building in &self.buildings {
            if !seen.insert(building.id.as_str()) {
                errors.push(format!("Duplicate building id '{}'", building.id));
            }
            if building.name.trim().is_empty() {
                errors.push(format!("Building '{}' has an empty name", building.id));
            }
            if building.base_price < 0 {
                errors.push(format!(
                    "Building '{}' has negative base price {}",
                    building.id, building.base_price
                ));
            }
            if building.base_price > MAX_BASE_PRICE {
                errors.push(format!(
                    "Building '{}' has base price {} above the limit of {MAX_BASE_PRICE}",
                    building.id, building.base_price
                ));
            }
            for (terrain, percent) in &building.terrain_price_percent {
                if *percent <= 0 {
                    errors.push(format!(
                        "Building '{}' has non-positive price multiplier {}% on {:?}",
                        building.id, percent, terrain
                    ));
                } else if *percent > MAX_PRICE_PERCENT {
                    errors.push(format!(
                        "Building '{}' has price multiplier {}% on {:?} above the limit of {MAX_PRICE_PERCENT}%",
                        building.id, percent, terrain
                    ));
                }
            }
        }

        let mut seen = HashSet::new();
        for event in &self.events {
            if !seen.insert(event.id.as_str()) {
                errors.push(format!("Duplicate event id '{}'", event.id));
            }
            if event.title.trim().is_empty() {
                errors.push(format!("Event '{}' has an empty title", event.id));
            }

            let referenced = event
                .activate_when
                .referenced_buildings()
                .into_iter()
                .chain(event.deactivate_when.referenced_buildings());
            for building_id in referenced {
                if self.get_building(building_id).is_none() {
                    errors.push(format!(
                        "Event '{}' references unknown building '{}'",
                        event.id, building_id
                    ));
                }
            }
        }

        errors
    }

    /// Fresh building templates in catalog order.
    #[must_use]
    pub fn building_templates(&self) -> Vec<Box<dyn Building>> {
        self.buildings
            .iter()
            .map(|data| Box::new(CatalogBuilding::new(data.clone())) as Box<dyn Building>)
            .collect()
    }

    /// Fresh events split into `(active, inactive)` decks by `starts_active`,
    /// keeping file order within each deck.
    #[must_use]
    pub fn event_decks(&self) -> (Vec<Box<dyn Event>>, Vec<Box<dyn Event>>) {
        let mut active: Vec<Box<dyn Event>> = Vec::new();
        let mut inactive: Vec<Box<dyn Event>> = Vec::new();
        for data in &self.events {
            let event = Box::new(NarrativeEvent::new(data.clone()));
            if data.starts_active {
                active.push(event);
            } else {
                inactive.push(event);
            }
        }
        (active, inactive)
    }
}
