//! Property tests for action gating and deck bookkeeping.

use proptest::prelude::*;
use township_core::prelude::*;
use township_test_utils::determinism::strategies::{arb_action, arb_script};
use township_test_utils::fixtures::{inert_events, test_game, SequenceRoll, TestBuilding, TestEvent};
use township_test_utils::invariants::{assert_invariants, event_count};

fn game_with_events(rolls: Vec<u32>) -> GameState {
    test_game()
        .with_catalog(vec![
            TestBuilding::new("house", 100).boxed(),
            TestBuilding::new("tower", 50).with_realized_price(400).boxed(),
        ])
        .with_events(
            inert_events(&["fire", "flood"]),
            vec![
                TestEvent::always("fair").boxed(),
                TestEvent::new("riot", |g| g.turn() % 3 == 0, |g| g.turn() % 3 == 1).boxed(),
            ],
        )
        .with_random_source(SequenceRoll::new(rolls))
}

proptest! {
    /// Successful actions cost exactly one action; failed ones cost nothing.
    #[test]
    fn prop_action_budget_is_exact(
        rolls in proptest::collection::vec(1u32..=10, 1..8),
        script in arb_script(2, 10, 10, 60),
    ) {
        let mut game = game_with_events(rolls);

        for action in script {
            let before = game.actions_remaining();
            let turn = game.turn();
            let result = game.apply(action);

            match (action, &result) {
                (PlayerAction::Build { .. } | PlayerAction::Demolish { .. }, Ok(_)) => {
                    prop_assert_eq!(game.actions_remaining(), before - 1);
                }
                (PlayerAction::EndTurn, Ok(_)) => {
                    prop_assert_eq!(game.actions_remaining(), game.actions_max());
                    prop_assert_eq!(game.turn(), turn + 1);
                }
                (PlayerAction::NextEvent, _) => {
                    prop_assert_eq!(game.actions_remaining(), before);
                }
                (_, Err(_)) => {
                    prop_assert_eq!(game.actions_remaining(), before);
                    prop_assert_eq!(game.turn(), turn);
                }
            }
            prop_assert!(game.actions_remaining() <= game.actions_max());
        }
    }

    /// Rejected actions never change the observable state.
    #[test]
    fn prop_rejections_are_side_effect_free(
        script in arb_script(2, 10, 10, 60),
    ) {
        let mut game = game_with_events(vec![10, 4]);

        for action in script {
            let before = game.state_hash();
            if game.apply(action).is_err() {
                prop_assert_eq!(game.state_hash(), before);
            }
        }
    }

    /// Pending events block every action and the turn change.
    #[test]
    fn prop_pending_events_block_progress(action in arb_action(2, 10, 10)) {
        let mut game = game_with_events(vec![1]);
        game.events_mut().push_pending(TestEvent::inert("omen").boxed());

        let result = game.apply(action);

        if action == PlayerAction::NextEvent {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(matches!(result, Err(GameplayError::EventsPending)));
        }
    }

    /// Every event stays in exactly one deck and the map stays consistent.
    #[test]
    fn prop_decks_and_map_stay_consistent(
        rolls in proptest::collection::vec(1u32..=10, 1..8),
        script in arb_script(2, 10, 10, 80),
    ) {
        let mut game = game_with_events(rolls);
        let total = event_count(&game);

        for action in script {
            let _ = game.apply(action);
            prop_assert_eq!(event_count(&game), total);
            assert_invariants(&game);
        }
    }
}
