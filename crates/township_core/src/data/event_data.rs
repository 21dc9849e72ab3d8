//! Data-driven narrative events.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::game_state::GameState;
use crate::resources::ResourceKind;

/// A predicate over the game state, written in content files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// Always holds.
    Always,
    /// Never holds.
    Never,
    /// Current turn is at least `n`.
    TurnAtLeast(u32),
    /// Resource counter is at least the value.
    ResourceAtLeast(ResourceKind, i64),
    /// Resource counter is strictly below the value.
    ResourceBelow(ResourceKind, i64),
    /// At least `n` buildings with the given id stand on the map.
    BuildingCountAtLeast(String, usize),
    /// Every inner condition holds.
    All(Vec<Condition>),
    /// At least one inner condition holds.
    Any(Vec<Condition>),
}

impl Condition {
    /// Evaluate against the current state.
    #[must_use]
    pub fn evaluate(&self, game: &GameState) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::TurnAtLeast(turn) => game.turn() >= *turn,
            Self::ResourceAtLeast(kind, value) => game.resources().get(*kind) >= *value,
            Self::ResourceBelow(kind, value) => game.resources().get(*kind) < *value,
            Self::BuildingCountAtLeast(id, count) => game.buildings().count_named(id) >= *count,
            Self::All(inner) => inner.iter().all(|c| c.evaluate(game)),
            Self::Any(inner) => inner.iter().any(|c| c.evaluate(game)),
        }
    }

    /// Building ids mentioned anywhere in the condition.
    #[must_use]
    pub fn referenced_buildings(&self) -> Vec<&str> {
        match self {
            Self::BuildingCountAtLeast(id, _) => vec![id.as_str()],
            Self::All(inner) | Self::Any(inner) => inner
                .iter()
                .flat_map(Condition::referenced_buildings)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Data-driven event definition.
///
/// # Example RON
///
/// ```ron
/// EventData(
///     id: "harvest_festival",
///     title: "Harvest Festival",
///     text: "The farmers celebrate a bountiful year.",
///     activate_when: BuildingCountAtLeast("farm", 2),
///     deactivate_when: ResourceBelow(Food, 0),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    /// Unique string identifier.
    pub id: String,

    /// Headline.
    pub title: String,

    /// Body text.
    #[serde(default)]
    pub text: String,

    /// Whether the event starts in the active deck.
    #[serde(default)]
    pub starts_active: bool,

    /// When a locked event unlocks.
    #[serde(default = "default_activate")]
    pub activate_when: Condition,

    /// When an unlocked event locks again.
    #[serde(default = "default_deactivate")]
    pub deactivate_when: Condition,
}

/// Locked events unlock immediately unless told otherwise.
const fn default_activate() -> Condition {
    Condition::Always
}

/// Unlocked events stay unlocked unless told otherwise.
const fn default_deactivate() -> Condition {
    Condition::Never
}

/// An [`Event`] backed by an [`EventData`] definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeEvent {
    data: EventData,
}

impl NarrativeEvent {
    /// Wrap a definition.
    #[must_use]
    pub const fn new(data: EventData) -> Self {
        Self { data }
    }

    /// The underlying definition.
    #[must_use]
    pub const fn data(&self) -> &EventData {
        &self.data
    }
}

impl Event for NarrativeEvent {
    fn name(&self) -> &str {
        &self.data.id
    }

    fn title(&self) -> &str {
        &self.data.title
    }

    fn text(&self) -> &str {
        &self.data.text
    }

    fn should_be_activated(&self, game: &GameState) -> bool {
        self.data.activate_when.evaluate(game)
    }

    fn should_be_deactivated(&self, game: &GameState) -> bool {
        self.data.deactivate_when.evaluate(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{GridMap, Terrain};
    use crate::resources::Resources;

    fn game() -> GameState {
        GameState::default()
            .with_map(GridMap::filled(4, 4, Terrain::Plains))
            .with_resources(Resources::new(300, 50))
    }

    #[test]
    fn test_simple_conditions() {
        let game = game();
        assert!(Condition::Always.evaluate(&game));
        assert!(!Condition::Never.evaluate(&game));
        assert!(Condition::TurnAtLeast(1).evaluate(&game));
        assert!(!Condition::TurnAtLeast(2).evaluate(&game));
        assert!(Condition::ResourceAtLeast(ResourceKind::Money, 300).evaluate(&game));
        assert!(!Condition::ResourceBelow(ResourceKind::Population, 50).evaluate(&game));
        assert!(!Condition::BuildingCountAtLeast("farm".into(), 1).evaluate(&game));
        assert!(Condition::BuildingCountAtLeast("farm".into(), 0).evaluate(&game));
    }

    #[test]
    fn test_combinators() {
        let game = game();
        let all = Condition::All(vec![Condition::Always, Condition::TurnAtLeast(5)]);
        let any = Condition::Any(vec![Condition::Never, Condition::TurnAtLeast(1)]);
        assert!(!all.evaluate(&game));
        assert!(any.evaluate(&game));
        assert!(Condition::All(Vec::new()).evaluate(&game));
        assert!(!Condition::Any(Vec::new()).evaluate(&game));
    }

    #[test]
    fn test_referenced_buildings() {
        let condition = Condition::Any(vec![
            Condition::BuildingCountAtLeast("farm".into(), 2),
            Condition::All(vec![
                Condition::TurnAtLeast(3),
                Condition::BuildingCountAtLeast("market".into(), 1),
            ]),
        ]);
        assert_eq!(condition.referenced_buildings(), vec!["farm", "market"]);
    }

    #[test]
    fn test_parse_event_defaults() {
        let data: EventData = ron::from_str(
            r#"(
                id: "drought",
                title: "Drought",
                activate_when: All([TurnAtLeast(3), ResourceBelow(Food, 10)]),
            )"#,
        )
        .unwrap();

        assert!(!data.starts_active);
        assert_eq!(data.deactivate_when, Condition::Never);
        assert_eq!(
            data.activate_when,
            Condition::All(vec![
                Condition::TurnAtLeast(3),
                Condition::ResourceBelow(ResourceKind::Food, 10),
            ])
        );
    }

    #[test]
    fn test_narrative_event_uses_conditions() {
        let mut data = EventData {
            id: "tax_revolt".into(),
            title: "Tax Revolt".into(),
            text: "Citizens protest.".into(),
            starts_active: false,
            activate_when: Condition::ResourceAtLeast(ResourceKind::Money, 1000),
            deactivate_when: Condition::ResourceBelow(ResourceKind::Money, 500),
        };
        let event = NarrativeEvent::new(data.clone());
        let game = game();

        assert_eq!(event.name(), "tax_revolt");
        assert_eq!(event.title(), "Tax Revolt");
        assert!(!event.should_be_activated(&game));
        assert!(event.should_be_deactivated(&game));

        data.activate_when = Condition::Always;
        assert!(NarrativeEvent::new(data).should_be_activated(&game));
    }
}
