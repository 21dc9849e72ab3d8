//! The turn, action and event state machine.
//!
//! [`GameState`] is the single root of a session. Only four operations move
//! the state machine forward:
//!
//! - [`GameState::build`] and [`GameState::demolish`] spend one action each.
//! - [`GameState::get_next_event`] acknowledges the oldest pending event.
//! - [`GameState::end_turn`] runs per-turn effects, migrates the event decks
//!   and may fire one event.
//!
//! While any event is pending, actions and turn changes are refused.
//! Every rejected operation leaves the state exactly as it was.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tracing::{debug, info, warn};

use crate::actions::{ActionOutcome, PlayerAction};
use crate::buildings::{Building, BuildingId, BuildingRegistry, PlacedBuilding};
use crate::config::GameConfig;
use crate::data::ContentPack;
use crate::error::{DataLoadError, GameplayError, Result};
use crate::events::{Event, EventDecks};
use crate::map::{Field, PlacementError, TerrainMap};
use crate::map_generation::generate_map;
use crate::report::{BuildingSummary, GameSummary, RejectedAction, ScriptReport, TurnReport};
use crate::resources::Resources;
use crate::rng::{RandomSource, SimRng};

/// State of one game session.
#[derive(Debug)]
pub struct GameState {
    turn: u32,
    resources: Resources,
    actions_remaining: u32,
    actions_max: u32,
    event_die_sides: u32,
    map: Box<dyn TerrainMap>,
    buildings: BuildingRegistry,
    catalog: Vec<Box<dyn Building>>,
    events: EventDecks,
    rng: Box<dyn RandomSource>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

impl GameState {
    /// Create a game at turn 1 with a generated map, an empty catalog and
    /// empty event decks.
    ///
    /// # Panics
    ///
    /// Panics if the configured map has a zero dimension. Use
    /// [`GameState::from_content`] for configurations read from disk.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            turn: 1,
            resources: config.starting_resources,
            actions_remaining: config.actions_per_turn,
            actions_max: config.actions_per_turn,
            event_die_sides: config.event_die_sides,
            map: Box::new(generate_map(&config.seeded_map())),
            buildings: BuildingRegistry::new(),
            catalog: Vec::new(),
            events: EventDecks::default(),
            rng: Box::new(SimRng::from_seed_u64(config.seed)),
        }
    }

    /// Create a ready-to-play game from validated configuration and content.
    ///
    /// The catalog follows the pack's building order. Events flagged
    /// `starts_active` form the active deck, the rest the inactive deck.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError::Validation`] if the configuration or the
    /// content pack is inconsistent.
    pub fn from_content(config: &GameConfig, pack: &ContentPack) -> std::result::Result<Self, DataLoadError> {
        let mut errors = config.validate();
        errors.extend(pack.validate());
        if !errors.is_empty() {
            return Err(DataLoadError::Validation { errors });
        }

        let (active, inactive) = pack.event_decks();
        let game = Self::new(config)
            .with_catalog(pack.building_templates())
            .with_events(active, inactive);

        info!(
            seed = config.seed,
            catalog = game.catalog.len(),
            events = game.events.total_len(),
            "New game created"
        );

        Ok(game)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Replace the map. Any placed buildings are dropped.
    #[must_use]
    pub fn with_map(mut self, map: impl TerrainMap + 'static) -> Self {
        self.map = Box::new(map);
        self.buildings = BuildingRegistry::new();
        self
    }

    /// Replace the building catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Vec<Box<dyn Building>>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the event decks. Nothing is pending afterwards.
    #[must_use]
    pub fn with_events(mut self, active: Vec<Box<dyn Event>>, inactive: Vec<Box<dyn Event>>) -> Self {
        self.events = EventDecks::new(active, inactive);
        self
    }

    /// Replace the event die.
    #[must_use]
    pub fn with_random_source(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Replace the resource pool.
    #[must_use]
    pub const fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    /// Set the per-turn action budget and refill the current turn.
    #[must_use]
    pub const fn with_actions_per_turn(mut self, actions: u32) -> Self {
        self.actions_max = actions;
        self.actions_remaining = actions;
        self
    }

    /// Set the number of faces on the event die.
    #[must_use]
    pub const fn with_event_die_sides(mut self, sides: u32) -> Self {
        self.event_die_sides = sides;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current turn, starting at 1.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Resource pool.
    #[must_use]
    pub const fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Mutable resource pool, for hooks and events.
    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    /// Actions left this turn.
    #[must_use]
    pub const fn actions_remaining(&self) -> u32 {
        self.actions_remaining
    }

    /// Action budget per turn.
    #[must_use]
    pub const fn actions_max(&self) -> u32 {
        self.actions_max
    }

    /// Faces on the event die.
    #[must_use]
    pub const fn event_die_sides(&self) -> u32 {
        self.event_die_sides
    }

    /// The map.
    #[must_use]
    pub fn map(&self) -> &dyn TerrainMap {
        self.map.as_ref()
    }

    /// Mutable map, for hooks that reshape terrain.
    pub fn map_mut(&mut self) -> &mut dyn TerrainMap {
        self.map.as_mut()
    }

    /// Placed buildings.
    #[must_use]
    pub const fn buildings(&self) -> &BuildingRegistry {
        &self.buildings
    }

    /// Building standing on (x, y), if any.
    #[must_use]
    pub fn building_at(&self, x: u32, y: u32) -> Option<&PlacedBuilding> {
        let id = self.map.field(x, y)?.building?;
        self.buildings.get(id)
    }

    /// Building templates, indexed by catalog position.
    #[must_use]
    pub fn catalog(&self) -> &[Box<dyn Building>] {
        &self.catalog
    }

    /// Event decks.
    #[must_use]
    pub const fn events(&self) -> &EventDecks {
        &self.events
    }

    /// Mutable event decks, for hooks that unlock or queue events.
    pub fn events_mut(&mut self) -> &mut EventDecks {
        &mut self.events
    }

    // ========================================================================
    // Action gating
    // ========================================================================

    /// Provisionally spend one action.
    fn request_action(&mut self) -> Result<()> {
        if self.events.has_pending() {
            return Err(GameplayError::EventsPending);
        }
        if self.actions_remaining == 0 {
            return Err(GameplayError::NoActionsLeft);
        }
        self.actions_remaining -= 1;
        Ok(())
    }

    /// Give back a provisionally spent action.
    fn refund_action(&mut self) {
        self.actions_remaining = (self.actions_remaining + 1).min(self.actions_max);
    }

    // ========================================================================
    // Player operations
    // ========================================================================

    /// Place a copy of catalog entry `index` at (x, y).
    ///
    /// On success money drops by the copy's realized price, one action is
    /// spent and the copy's `on_build` hook has run.
    ///
    /// # Errors
    ///
    /// - [`GameplayError::EventsPending`] / [`GameplayError::NoActionsLeft`]
    ///   from action gating.
    /// - [`GameplayError::UnknownBuilding`], [`GameplayError::OutOfBounds`],
    ///   [`GameplayError::InvalidPlacement`] or
    ///   [`GameplayError::InsufficientFunds`] with the action refunded and the
    ///   map untouched.
    pub fn build(&mut self, index: usize, x: u32, y: u32) -> Result<BuildingId> {
        self.request_action()?;

        match self.place_building(index, x, y) {
            Ok(id) => {
                if let Some(placed) = self.buildings.get(id) {
                    debug!(
                        turn = self.turn,
                        building = placed.building.name(),
                        %id,
                        x,
                        y,
                        price = placed.building.price(),
                        "Building placed"
                    );
                }
                self.run_building_hook(id, |building, game| building.on_build(game));
                Ok(id)
            }
            Err(err) => {
                self.refund_action();
                debug!(turn = self.turn, index, x, y, %err, "Build rejected");
                Err(err)
            }
        }
    }

    /// Validate, place, price and pay for a building. Does not run hooks.
    fn place_building(&mut self, index: usize, x: u32, y: u32) -> Result<BuildingId> {
        let template = self
            .catalog
            .get(index)
            .ok_or(GameplayError::UnknownBuilding(index))?;
        let field = *self
            .map
            .field(x, y)
            .ok_or(GameplayError::OutOfBounds { x, y })?;

        if let Some(occupant) = field.building {
            return Err(GameplayError::InvalidPlacement {
                x,
                y,
                reason: format!("field is occupied by building {occupant}"),
            });
        }

        let available = self.resources.money;
        if !self.resources.can_afford(template.base_price()) {
            return Err(GameplayError::InsufficientFunds {
                required: template.base_price(),
                available,
            });
        }

        let neighbors = self.map.neighbors(x, y);
        if !template.can_be_built(&field, &neighbors) {
            return Err(GameplayError::InvalidPlacement {
                x,
                y,
                reason: format!("'{}' cannot stand on {:?}", template.name(), field.terrain),
            });
        }

        let mut building = template.clone_box();
        let id = self.buildings.next_id();
        self.map
            .add_building(x, y, id)
            .map_err(|err| placement_error(x, y, err))?;

        let placed_field = Field {
            building: Some(id),
            ..field
        };
        building.on_placed(&placed_field, &neighbors);

        let price = building.price();
        if !self.resources.can_afford(price) {
            self.map.remove_building(x, y);
            return Err(GameplayError::InsufficientFunds {
                required: price,
                available,
            });
        }

        self.buildings.insert(PlacedBuilding { id, x, y, building });
        self.resources.money = self.resources.money.saturating_sub(price);
        Ok(id)
    }

    /// Remove the building at (x, y) and run its `on_destroy` hook.
    ///
    /// Returns the removed building. Nothing is refunded unless the hook
    /// does so.
    ///
    /// # Errors
    ///
    /// - [`GameplayError::EventsPending`] / [`GameplayError::NoActionsLeft`]
    ///   from action gating.
    /// - [`GameplayError::OutOfBounds`] or [`GameplayError::NothingToDemolish`]
    ///   with the action refunded.
    pub fn demolish(&mut self, x: u32, y: u32) -> Result<Box<dyn Building>> {
        self.request_action()?;

        match self.remove_building(x, y) {
            Ok(mut placed) => {
                debug!(
                    turn = self.turn,
                    building = placed.building.name(),
                    id = %placed.id,
                    x,
                    y,
                    "Building demolished"
                );
                placed.building.on_destroy(self);
                Ok(placed.building)
            }
            Err(err) => {
                self.refund_action();
                debug!(turn = self.turn, x, y, %err, "Demolish rejected");
                Err(err)
            }
        }
    }

    /// Take the building at (x, y) off the map and out of the registry.
    fn remove_building(&mut self, x: u32, y: u32) -> Result<PlacedBuilding> {
        let field = self
            .map
            .field(x, y)
            .ok_or(GameplayError::OutOfBounds { x, y })?;
        let id = field
            .building
            .ok_or(GameplayError::NothingToDemolish { x, y })?;
        if !self.buildings.contains(id) {
            warn!(%id, x, y, "Map references a building missing from the registry");
            return Err(GameplayError::NothingToDemolish { x, y });
        }

        self.map.remove_building(x, y);
        self.buildings
            .remove(id)
            .ok_or(GameplayError::NothingToDemolish { x, y })
    }

    /// Remove and return the oldest pending event.
    pub fn get_next_event(&mut self) -> Option<Box<dyn Event>> {
        let event = self.events.pop_pending()?;
        debug!(turn = self.turn, event = event.name(), "Event acknowledged");
        Some(event)
    }

    /// Finish the turn.
    ///
    /// Refills the action budget, advances the turn counter, runs every
    /// building's `on_next_turn` hook in placement order, migrates the event
    /// decks and rolls the event die.
    ///
    /// # Errors
    ///
    /// Returns [`GameplayError::EventsPending`] if events await
    /// acknowledgement. Nothing changes in that case.
    pub fn end_turn(&mut self) -> Result<TurnReport> {
        if self.events.has_pending() {
            debug!(turn = self.turn, pending = self.events.pending_len(), "End turn rejected");
            return Err(GameplayError::EventsPending);
        }

        self.actions_remaining = self.actions_max;
        self.turn += 1;

        for id in self.buildings.ids() {
            self.run_building_hook(id, |building, game| building.on_next_turn(game));
        }

        let activated = self.activate_events();
        let deactivated = self.deactivate_events();

        let roll = self.roll_event_die();
        let triggered = match roll {
            Some(roll) if roll == self.event_die_sides => self.events.fire_next_active(),
            _ => None,
        };

        if let Some(name) = &triggered {
            info!(turn = self.turn, event = %name, "Event triggered");
        }
        info!(
            turn = self.turn,
            activated = activated.len(),
            deactivated = deactivated.len(),
            money = self.resources.money,
            "Turn started"
        );

        Ok(TurnReport {
            turn: self.turn,
            activated,
            deactivated,
            roll,
            triggered,
        })
    }

    /// Apply a player action.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation.
    pub fn apply(&mut self, action: PlayerAction) -> Result<ActionOutcome> {
        match action {
            PlayerAction::Build { index, x, y } => self.build(index, x, y).map(ActionOutcome::Built),
            PlayerAction::Demolish { x, y } => self.demolish(x, y).map(ActionOutcome::Demolished),
            PlayerAction::NextEvent => Ok(ActionOutcome::Event(self.get_next_event())),
            PlayerAction::EndTurn => self.end_turn().map(ActionOutcome::TurnEnded),
        }
    }

    /// Apply every action of `script`, recording rejections instead of
    /// stopping.
    ///
    /// With `drain_events` set, pending events are acknowledged before each
    /// `EndTurn` so scripted turns are never blocked.
    pub fn run_script(&mut self, script: &[PlayerAction], drain_events: bool) -> ScriptReport {
        let mut report = ScriptReport::default();

        for (step, &action) in script.iter().enumerate() {
            if drain_events && action == PlayerAction::EndTurn {
                while let Some(event) = self.get_next_event() {
                    info!(turn = self.turn, event = event.title(), "{}", event.text());
                    report.events_seen.push(event.name().to_string());
                }
            }

            match self.apply(action) {
                Ok(ActionOutcome::Event(Some(event))) => {
                    report.applied += 1;
                    report.events_seen.push(event.name().to_string());
                }
                Ok(_) => report.applied += 1,
                Err(err) => {
                    warn!(step, ?action, "Rejected: {err}");
                    report.rejected.push(RejectedAction {
                        step,
                        action,
                        reason: err.to_string(),
                    });
                }
            }
        }

        report
    }

    // ========================================================================
    // Turn internals
    // ========================================================================

    /// Run a hook on a working copy of a placed building, then write the
    /// copy back under the same id.
    ///
    /// The original stays registered while the hook runs.
    fn run_building_hook(&mut self, id: BuildingId, hook: impl FnOnce(&mut dyn Building, &mut Self)) {
        let Some(mut building) = self.buildings.get(id).map(|p| p.building.clone_box()) else {
            return;
        };
        hook(building.as_mut(), self);
        match self.buildings.get_mut(id) {
            Some(placed) => placed.building = building,
            None => warn!(%id, "Building vanished from the registry during its hook"),
        }
    }

    /// Move inactive events whose activation predicate holds to the active deck.
    fn activate_events(&mut self) -> Vec<String> {
        let marks: Vec<bool> = self
            .events
            .inactive()
            .map(|event| event.should_be_activated(self))
            .collect();
        self.events.activate_marked(&marks)
    }

    /// Move active events whose deactivation predicate holds to the inactive deck.
    fn deactivate_events(&mut self) -> Vec<String> {
        let marks: Vec<bool> = self
            .events
            .active()
            .map(|event| event.should_be_deactivated(self))
            .collect();
        self.events.deactivate_marked(&marks)
    }

    /// Roll the event die if anything could fire.
    fn roll_event_die(&mut self) -> Option<u32> {
        if self.event_die_sides == 0 || self.events.active_len() == 0 {
            return None;
        }
        Some(self.rng.roll(self.event_die_sides))
    }

    // ========================================================================
    // Observability
    // ========================================================================

    /// Deterministic hash of the observable game state.
    ///
    /// Covers the turn, resources, action budget, placed buildings and deck
    /// membership in order. Two games fed the same seed and the same actions
    /// hash identically.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.turn.hash(&mut hasher);
        self.resources.hash(&mut hasher);
        self.actions_remaining.hash(&mut hasher);
        self.actions_max.hash(&mut hasher);

        self.buildings.len().hash(&mut hasher);
        for placed in self.buildings.iter() {
            placed.id.hash(&mut hasher);
            placed.x.hash(&mut hasher);
            placed.y.hash(&mut hasher);
            placed.building.name().hash(&mut hasher);
            placed.building.price().hash(&mut hasher);
        }

        hash_deck(self.events.pending(), &mut hasher);
        hash_deck(self.events.active(), &mut hasher);
        hash_deck(self.events.inactive(), &mut hasher);

        hasher.finish()
    }

    /// Snapshot for reporting.
    #[must_use]
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            turn: self.turn,
            resources: self.resources,
            actions_remaining: self.actions_remaining,
            actions_max: self.actions_max,
            buildings: self
                .buildings
                .iter()
                .map(|placed| BuildingSummary {
                    id: placed.id,
                    name: placed.building.name().to_string(),
                    x: placed.x,
                    y: placed.y,
                    price: placed.building.price(),
                })
                .collect(),
            pending_events: event_names(self.events.pending()),
            active_events: event_names(self.events.active()),
            inactive_events: event_names(self.events.inactive()),
            state_hash: self.state_hash(),
        }
    }
}

/// Map a map-level placement failure onto a gameplay error.
fn placement_error(x: u32, y: u32, err: PlacementError) -> GameplayError {
    match err {
        PlacementError::OutOfBounds => GameplayError::OutOfBounds { x, y },
        PlacementError::Occupied(occupant) => GameplayError::InvalidPlacement {
            x,
            y,
            reason: format!("field is occupied by building {occupant}"),
        },
    }
}

fn hash_deck<'a>(deck: impl Iterator<Item = &'a Box<dyn Event>>, hasher: &mut impl Hasher) {
    let mut count = 0usize;
    for event in deck {
        event.name().hash(hasher);
        count += 1;
    }
    count.hash(hasher);
}

fn event_names<'a>(deck: impl Iterator<Item = &'a Box<dyn Event>>) -> Vec<String> {
    deck.map(|event| event.name().to_string()).collect()
}
