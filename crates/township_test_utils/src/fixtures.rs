//! Test fixtures and helpers.
//!
//! Scriptable buildings and events, fixed dice and pre-built games for
//! consistent testing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use township_core::prelude::*;

// ============================================================================
// Dice
// ============================================================================

/// A die that always shows the same face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRoll(pub u32);

impl RandomSource for FixedRoll {
    fn roll(&mut self, _sides: u32) -> u32 {
        self.0
    }
}

/// A die that replays a fixed sequence of faces, cycling when exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRoll {
    rolls: Vec<u32>,
    next: usize,
}

impl SequenceRoll {
    /// Create a die replaying `rolls`. An empty sequence always rolls 1.
    #[must_use]
    pub fn new(rolls: Vec<u32>) -> Self {
        Self { rolls, next: 0 }
    }
}

impl RandomSource for SequenceRoll {
    fn roll(&mut self, _sides: u32) -> u32 {
        if self.rolls.is_empty() {
            return 1;
        }
        let roll = self.rolls[self.next % self.rolls.len()];
        self.next += 1;
        roll
    }
}

// ============================================================================
// Buildings
// ============================================================================

/// A hook invocation recorded by [`TestBuilding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCall {
    /// `on_placed` at (x, y).
    Placed(u32, u32),
    /// `on_build` on the given turn.
    Built(u32),
    /// `on_destroy` on the given turn.
    Destroyed(u32),
    /// `on_next_turn` on the given turn.
    NextTurn(u32),
}

/// Shared record of hook calls, cloned into every copy of a building.
#[derive(Debug, Clone, Default)]
pub struct HookLog(Rc<RefCell<Vec<(String, HookCall)>>>);

impl HookLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, name: &str, call: HookCall) {
        self.0.borrow_mut().push((name.to_string(), call));
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, HookCall)> {
        self.0.borrow().clone()
    }

    /// Recorded calls without building names.
    #[must_use]
    pub fn hooks(&self) -> Vec<HookCall> {
        self.0.borrow().iter().map(|(_, call)| *call).collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// A building whose price, placement rule and effects are set by the test.
#[derive(Debug, Clone)]
pub struct TestBuilding {
    name: String,
    base_price: i64,
    realized_price: Option<i64>,
    price: i64,
    placeable: bool,
    build_effect: Resources,
    turn_effect: Resources,
    destroy_effect: Resources,
    log: Option<HookLog>,
}

impl TestBuilding {
    /// Create a building placeable on any empty field, costing `base_price`.
    #[must_use]
    pub fn new(name: impl Into<String>, base_price: i64) -> Self {
        Self {
            name: name.into(),
            base_price,
            realized_price: None,
            price: base_price,
            placeable: true,
            build_effect: Resources::ZERO,
            turn_effect: Resources::ZERO,
            destroy_effect: Resources::ZERO,
            log: None,
        }
    }

    /// Price the copy settles on once placed, overriding the base price.
    #[must_use]
    pub const fn with_realized_price(mut self, price: i64) -> Self {
        self.realized_price = Some(price);
        self
    }

    /// Make the placement predicate always fail.
    #[must_use]
    pub const fn unplaceable(mut self) -> Self {
        self.placeable = false;
        self
    }

    /// Resource delta applied by `on_build`.
    #[must_use]
    pub const fn with_build_effect(mut self, delta: Resources) -> Self {
        self.build_effect = delta;
        self
    }

    /// Resource delta applied by `on_next_turn`.
    #[must_use]
    pub const fn with_turn_effect(mut self, delta: Resources) -> Self {
        self.turn_effect = delta;
        self
    }

    /// Resource delta applied by `on_destroy`.
    #[must_use]
    pub const fn with_destroy_effect(mut self, delta: Resources) -> Self {
        self.destroy_effect = delta;
        self
    }

    /// Record hook calls into `log`.
    #[must_use]
    pub fn with_log(mut self, log: &HookLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Box as a catalog template.
    #[must_use]
    pub fn boxed(self) -> Box<dyn Building> {
        Box::new(self)
    }

    fn record(&self, call: HookCall) {
        if let Some(log) = &self.log {
            log.record(&self.name, call);
        }
    }
}

impl Building for TestBuilding {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_price(&self) -> i64 {
        self.base_price
    }

    fn price(&self) -> i64 {
        self.price
    }

    fn can_be_built(&self, field: &Field, _neighbors: &[Field]) -> bool {
        self.placeable && field.is_empty()
    }

    fn on_placed(&mut self, field: &Field, _neighbors: &[Field]) {
        if let Some(price) = self.realized_price {
            self.price = price;
        }
        self.record(HookCall::Placed(field.x, field.y));
    }

    fn on_build(&mut self, game: &mut GameState) {
        *game.resources_mut() += self.build_effect;
        self.record(HookCall::Built(game.turn()));
    }

    fn on_destroy(&mut self, game: &mut GameState) {
        *game.resources_mut() += self.destroy_effect;
        self.record(HookCall::Destroyed(game.turn()));
    }

    fn on_next_turn(&mut self, game: &mut GameState) {
        *game.resources_mut() += self.turn_effect;
        self.record(HookCall::NextTurn(game.turn()));
    }

    fn clone_box(&self) -> Box<dyn Building> {
        Box::new(self.clone())
    }
}

// ============================================================================
// Events
// ============================================================================

type Predicate = Rc<dyn Fn(&GameState) -> bool>;

/// An event with closure predicates.
#[derive(Clone)]
pub struct TestEvent {
    name: String,
    activate: Predicate,
    deactivate: Predicate,
}

impl fmt::Debug for TestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestEvent").field("name", &self.name).finish_non_exhaustive()
    }
}

impl TestEvent {
    /// Create an event with the given predicates.
    pub fn new(
        name: impl Into<String>,
        activate: impl Fn(&GameState) -> bool + 'static,
        deactivate: impl Fn(&GameState) -> bool + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            activate: Rc::new(activate),
            deactivate: Rc::new(deactivate),
        }
    }

    /// Activates at the first turn change and never deactivates.
    #[must_use]
    pub fn always(name: impl Into<String>) -> Self {
        Self::new(name, |_| true, |_| false)
    }

    /// Never moves between decks.
    #[must_use]
    pub fn inert(name: impl Into<String>) -> Self {
        Self::new(name, |_| false, |_| false)
    }

    /// Box for a deck.
    #[must_use]
    pub fn boxed(self) -> Box<dyn Event> {
        Box::new(self)
    }
}

impl Event for TestEvent {
    fn name(&self) -> &str {
        &self.name
    }

    fn should_be_activated(&self, game: &GameState) -> bool {
        (self.activate)(game)
    }

    fn should_be_deactivated(&self, game: &GameState) -> bool {
        (self.deactivate)(game)
    }
}

/// Box a list of inert events.
#[must_use]
pub fn inert_events(names: &[&str]) -> Vec<Box<dyn Event>> {
    names.iter().map(|&n| TestEvent::inert(n).boxed()).collect()
}

/// Names of the events in a deck.
pub fn deck_names<'a>(deck: impl Iterator<Item = &'a Box<dyn Event>>) -> Vec<String> {
    deck.map(|e| e.name().to_string()).collect()
}

// ============================================================================
// Games
// ============================================================================

/// A plains map of the given size.
#[must_use]
pub fn flat_map(width: u32, height: u32) -> GridMap {
    GridMap::filled(width, height, Terrain::Plains)
}

/// A game on a 10x10 plains map with default rules, a die that never
/// fires, and a single `house` costing 100 in the catalog.
#[must_use]
pub fn test_game() -> GameState {
    GameState::new(&GameConfig::default().with_map_size(1, 1))
        .with_map(flat_map(10, 10))
        .with_random_source(FixedRoll(1))
        .with_catalog(vec![TestBuilding::new("house", 100).boxed()])
}

/// Parse a RON list of player actions.
///
/// # Panics
///
/// Panics if the script does not parse.
#[must_use]
pub fn script(source: &str) -> Vec<PlayerAction> {
    match ron::from_str(source) {
        Ok(actions) => actions,
        Err(e) => panic!("invalid action script: {e}"),
    }
}
