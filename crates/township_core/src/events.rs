//! Random events and the three decks they move between.
//!
//! Every event lives in exactly one deck:
//!
//! - **pending**: fired, waiting for the player to acknowledge it. While
//!   anything is pending no action or turn change is accepted.
//! - **active**: eligible to fire. FIFO, the oldest activated event fires
//!   first.
//! - **inactive**: locked until its activation predicate holds.

use std::collections::VecDeque;
use std::fmt;

use crate::game_state::GameState;

/// Behaviour of a random event.
pub trait Event: fmt::Debug {
    /// Stable identifier.
    fn name(&self) -> &str;

    /// Headline shown to the player.
    fn title(&self) -> &str {
        self.name()
    }

    /// Body text shown to the player.
    fn text(&self) -> &str {
        ""
    }

    /// Whether an inactive event should join the active deck.
    fn should_be_activated(&self, game: &GameState) -> bool;

    /// Whether an active event should drop back to the inactive deck.
    fn should_be_deactivated(&self, game: &GameState) -> bool;
}

/// Pending queue plus active and inactive decks.
#[derive(Debug, Default)]
pub struct EventDecks {
    pending: VecDeque<Box<dyn Event>>,
    active: VecDeque<Box<dyn Event>>,
    inactive: Vec<Box<dyn Event>>,
}

impl EventDecks {
    /// Create decks with the given active and inactive events and nothing pending.
    #[must_use]
    pub fn new(active: Vec<Box<dyn Event>>, inactive: Vec<Box<dyn Event>>) -> Self {
        Self {
            pending: VecDeque::new(),
            active: active.into(),
            inactive,
        }
    }

    /// Fired events, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &Box<dyn Event>> {
        self.pending.iter()
    }

    /// Eligible events, next to fire first.
    pub fn active(&self) -> impl Iterator<Item = &Box<dyn Event>> {
        self.active.iter()
    }

    /// Locked events.
    pub fn inactive(&self) -> impl Iterator<Item = &Box<dyn Event>> {
        self.inactive.iter()
    }

    /// Check if anything awaits acknowledgement.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of active events.
    #[must_use]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Number of inactive events.
    #[must_use]
    pub fn inactive_len(&self) -> usize {
        self.inactive.len()
    }

    /// Events across all three decks.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.pending.len() + self.active.len() + self.inactive.len()
    }

    /// Queue an event for acknowledgement (e.g. from a building hook).
    pub fn push_pending(&mut self, event: Box<dyn Event>) {
        self.pending.push_back(event);
    }

    /// Add an event to the tail of the active deck.
    pub fn push_active(&mut self, event: Box<dyn Event>) {
        self.active.push_back(event);
    }

    /// Add an event to the inactive deck.
    pub fn push_inactive(&mut self, event: Box<dyn Event>) {
        self.inactive.push(event);
    }

    /// Remove the oldest pending event.
    pub fn pop_pending(&mut self) -> Option<Box<dyn Event>> {
        self.pending.pop_front()
    }

    /// Move the head of the active deck to the tail of the pending queue.
    ///
    /// Returns the name of the fired event.
    pub(crate) fn fire_next_active(&mut self) -> Option<String> {
        let event = self.active.pop_front()?;
        let name = event.name().to_owned();
        self.pending.push_back(event);
        Some(name)
    }

    /// Move every inactive event whose mark is set to the active deck.
    ///
    /// `marks` is indexed like [`EventDecks::inactive`]. Returns moved names.
    pub(crate) fn activate_marked(&mut self, marks: &[bool]) -> Vec<String> {
        let moved = take_marked(&mut self.inactive, marks);
        let names = moved.iter().map(|e| e.name().to_owned()).collect();
        self.active.extend(moved);
        names
    }

    /// Move every active event whose mark is set to the inactive deck.
    ///
    /// `marks` is indexed like [`EventDecks::active`]. Returns moved names.
    pub(crate) fn deactivate_marked(&mut self, marks: &[bool]) -> Vec<String> {
        let moved = take_marked(&mut self.active, marks);
        let names = moved.iter().map(|e| e.name().to_owned()).collect();
        self.inactive.extend(moved);
        names
    }
}

/// Split the marked events out of `source`, keeping relative order on both
/// sides. Missing marks count as unmarked.
fn take_marked<C>(source: &mut C, marks: &[bool]) -> Vec<Box<dyn Event>>
where
    C: Default + IntoIterator<Item = Box<dyn Event>> + Extend<Box<dyn Event>>,
{
    let mut kept = C::default();
    let mut taken = Vec::new();
    let marks = marks.iter().copied().chain(std::iter::repeat(false));
    for (event, marked) in std::mem::take(source).into_iter().zip(marks) {
        if marked {
            taken.push(event);
        } else {
            kept.extend(Some(event));
        }
    }
    *source = kept;
    taken
}
