//! Determinism testing utilities.
//!
//! Provides a harness for verifying that a game produces identical results
//! given identical inputs.
//!
//! # Testing Strategy
//!
//! A seeded game fed the same action script must end in the same state.
//! Sources of non-determinism include:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Buildings are kept in a `BTreeMap` keyed by placement id and events in
//!   ordered decks.
//!
//! - **System randomness**: the event die is an injected
//!   [`RandomSource`](township_core::rng::RandomSource) seeded from config.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: individual operations (build, demolish, end turn)
//! 2. **Property tests**: random action scripts replay identically
//! 3. **Integration tests**: full content packs are reproducible

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use township_core::prelude::*;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps applied per run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic game).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the game was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Game is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a stateful process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `steps` - Number of steps per run
/// * `setup` - Function to create initial state
/// * `step` - Function to advance state by one step
/// * `hash` - Function to compute state hash
///
/// # Example
///
/// ```ignore
/// use township_test_utils::determinism::verify_determinism;
///
/// let result = verify_determinism(
///     5,   // Run 5 times
///     100, // 100 turns each
///     || seeded_game(),
///     |game| { let _ = game.end_turn(); },
///     |game| game.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Apply every action of `script`, ignoring rejections.
///
/// Pending events are acknowledged before each `EndTurn` when
/// `drain_events` is set. Returns the number of rejected actions.
pub fn run_script(game: &mut GameState, script: &[PlayerAction], drain_events: bool) -> usize {
    game.run_script(script, drain_events).rejected.len()
}

/// Run the same script on two fresh games and compare final hashes.
pub fn verify_script_determinism<F>(setup_fn: F, script: &[PlayerAction]) -> bool
where
    F: Fn() -> GameState,
{
    let result = verify_determinism(
        2,
        1,
        &setup_fn,
        |game| {
            run_script(game, script, true);
        },
        GameState::state_hash,
    );
    result.is_deterministic
}

/// Compare two games action-by-action, finding the first divergence.
///
/// # Returns
///
/// `None` if the games stay identical, `Some(0)` if they differ before any
/// action, `Some(n)` if they diverge after the `n`-th action.
pub fn find_first_divergence<F>(setup_fn: F, script: &[PlayerAction]) -> Option<usize>
where
    F: Fn() -> GameState,
{
    let mut game1 = setup_fn();
    let mut game2 = setup_fn();

    if game1.state_hash() != game2.state_hash() {
        return Some(0);
    }

    for (i, &action) in script.iter().enumerate() {
        let _ = game1.apply(action);
        let _ = game2.apply(action);

        if game1.state_hash() != game2.state_hash() {
            return Some(i + 1);
        }
    }

    None
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for action scripts.
pub mod strategies {
    use proptest::prelude::*;
    use township_core::actions::PlayerAction;

    /// Generate a build action for a catalog of `catalog_len` entries.
    ///
    /// Indices and coordinates overshoot by one so that rejections are
    /// exercised too.
    pub fn arb_build(catalog_len: usize, width: u32, height: u32) -> impl Strategy<Value = PlayerAction> {
        (0..=catalog_len, 0..=width, 0..=height).prop_map(|(index, x, y)| PlayerAction::Build { index, x, y })
    }

    /// Generate a demolish action, overshooting the map by one.
    pub fn arb_demolish(width: u32, height: u32) -> impl Strategy<Value = PlayerAction> {
        (0..=width, 0..=height).prop_map(|(x, y)| PlayerAction::Demolish { x, y })
    }

    /// Generate any action.
    pub fn arb_action(catalog_len: usize, width: u32, height: u32) -> impl Strategy<Value = PlayerAction> {
        prop_oneof![
            4 => arb_build(catalog_len, width, height),
            2 => arb_demolish(width, height),
            1 => Just(PlayerAction::NextEvent),
            2 => Just(PlayerAction::EndTurn),
        ]
    }

    /// Generate a sequence of actions.
    pub fn arb_script(
        catalog_len: usize,
        width: u32,
        height: u32,
        max_len: usize,
    ) -> impl Strategy<Value = Vec<PlayerAction>> {
        proptest::collection::vec(arb_action(catalog_len, width, height), 0..max_len)
    }

    /// Generate a game seed.
    pub fn arb_seed() -> impl Strategy<Value = u64> {
        any::<u64>()
    }
}

#[cfg(test)]
mod tests {
    use super::strategies::arb_script;
    use super::*;
    use crate::fixtures::{inert_events, test_game, SequenceRoll};
    use proptest::prelude::*;

    fn seeded_game(seed: u64) -> GameState {
        let config = GameConfig::default().with_map_size(12, 12).with_seed(seed);
        GameState::new(&config)
            .with_catalog(test_game().catalog().to_vec())
            .with_events(inert_events(&["fire", "flood", "plague"]), Vec::new())
    }

    // =========================================================================
    // Harness tests
    // =========================================================================

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n| *n += 1, |n| *n);

        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![100, 100, 100]);
    }

    #[test]
    fn test_detects_divergent_runs() {
        let counter = std::cell::Cell::new(0u64);
        let result = verify_determinism(
            2,
            1,
            || {
                counter.set(counter.get() + 1);
                counter.get()
            },
            |_| {},
            |n| *n,
        );

        assert!(!result.is_deterministic);
        assert_eq!(result.unique_hashes().len(), 2);
    }

    #[test]
    #[should_panic(expected = "non-deterministic")]
    fn test_assert_deterministic_panics() {
        DeterminismResult {
            is_deterministic: false,
            hashes: vec![1, 2],
            steps: 1,
        }
        .assert_deterministic();
    }

    #[test]
    fn test_compute_hash_is_stable() {
        assert_eq!(compute_hash(&(1, "house")), compute_hash(&(1, "house")));
        assert_ne!(compute_hash(&1u32), compute_hash(&2u32));
    }

    // =========================================================================
    // Game determinism
    // =========================================================================

    #[test]
    fn test_seeded_turns_are_deterministic() {
        let result = verify_determinism(
            3,
            50,
            || seeded_game(7),
            |game| {
                while game.get_next_event().is_some() {}
                let _ = game.end_turn();
            },
            GameState::state_hash,
        );
        result.assert_deterministic();
    }

    #[test]
    fn test_run_script_counts_rejections() {
        let mut game = test_game();
        let script = crate::fixtures::script(
            "[Build(index: 0, x: 1, y: 1), Build(index: 0, x: 1, y: 1), Demolish(x: 9, y: 9), EndTurn]",
        );

        let rejected = run_script(&mut game, &script, true);

        assert_eq!(rejected, 2);
        assert_eq!(game.turn(), 2);
        assert_eq!(game.buildings().len(), 1);
    }

    #[test]
    fn test_run_script_drains_events_before_end_turn() {
        let mut game = test_game()
            .with_events(inert_events(&["fire", "flood"]), Vec::new())
            .with_random_source(SequenceRoll::new(vec![10]));
        let script = vec![PlayerAction::EndTurn, PlayerAction::EndTurn, PlayerAction::EndTurn];

        assert_eq!(run_script(&mut game, &script, true), 0);
        assert_eq!(game.turn(), 4);

        let mut undrained = test_game()
            .with_events(inert_events(&["fire", "flood"]), Vec::new())
            .with_random_source(SequenceRoll::new(vec![10]));
        assert_eq!(run_script(&mut undrained, &script, false), 2);
        assert_eq!(undrained.turn(), 2);
    }

    #[test]
    fn test_find_divergence_on_identical_games() {
        let script = vec![
            PlayerAction::Build { index: 0, x: 2, y: 2 },
            PlayerAction::EndTurn,
            PlayerAction::Demolish { x: 2, y: 2 },
        ];
        assert!(find_first_divergence(|| seeded_game(3), &script).is_none());
    }

    proptest! {
        /// Any seed and any script replay to the same final state.
        #[test]
        fn prop_scripts_replay_identically(
            seed in strategies::arb_seed(),
            script in arb_script(1, 12, 12, 40),
        ) {
            prop_assert!(verify_script_determinism(|| seeded_game(seed), &script));
        }
    }
}
