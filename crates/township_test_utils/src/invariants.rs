//! Whole-state consistency checks.
//!
//! Run these after every operation in property tests. They only read the
//! public API, so any state reachable from outside the crate can be checked.

use std::collections::HashSet;

use township_core::prelude::*;

/// Collect every broken invariant of `game`.
///
/// Checks that:
/// - the action budget is within `[0, actions_max]`
/// - the turn counter is positive
/// - every registered building sits on the field its record names
/// - every occupied field points at a registered building
#[must_use]
pub fn check_invariants(game: &GameState) -> Vec<String> {
    let mut problems = Vec::new();

    if game.actions_remaining() > game.actions_max() {
        problems.push(format!(
            "actions_remaining {} exceeds actions_max {}",
            game.actions_remaining(),
            game.actions_max()
        ));
    }

    if game.turn() == 0 {
        problems.push("turn counter is zero".to_string());
    }

    for placed in game.buildings().iter() {
        let on_map = game.map().field(placed.x, placed.y).and_then(|f| f.building);
        if on_map != Some(placed.id) {
            problems.push(format!(
                "building {} records ({}, {}) but the field holds {:?}",
                placed.id, placed.x, placed.y, on_map
            ));
        }
    }

    let mut seen = HashSet::new();
    for y in 0..game.map().height() {
        for x in 0..game.map().width() {
            let Some(id) = game.map().field(x, y).and_then(|f| f.building) else {
                continue;
            };
            if !game.buildings().contains(id) {
                problems.push(format!("field ({x}, {y}) holds unregistered building {id}"));
            }
            if !seen.insert(id) {
                problems.push(format!("building {id} occupies more than one field"));
            }
        }
    }

    if seen.len() != game.buildings().len() {
        problems.push(format!(
            "{} occupied fields but {} registered buildings",
            seen.len(),
            game.buildings().len()
        ));
    }

    problems
}

/// Assert that `game` is internally consistent.
///
/// # Panics
///
/// Panics with every broken invariant listed.
pub fn assert_invariants(game: &GameState) {
    let problems = check_invariants(game);
    assert!(problems.is_empty(), "Game state invariants broken:\n{}", problems.join("\n"));
}

/// Number of events across all three decks.
#[must_use]
pub fn event_count(game: &GameState) -> usize {
    game.events().total_len()
}
