//! Scripted session runner.
//!
//! Builds a game from a data directory and feeds it a RON list of
//! [`PlayerAction`]s, recording every rejection instead of stopping.

use std::path::{Path, PathBuf};

use serde::Serialize;
use township_core::actions::PlayerAction;
use township_core::error::DataLoadError;
use township_core::game_state::GameState;
use township_core::report::{GameSummary, RejectedAction, ScriptReport};

use crate::error::Result;
use crate::validate::load_data_directory;

/// Options for a scripted run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulateOptions {
    /// Directory holding `game.ron` and `content.ron`.
    pub data: PathBuf,
    /// RON file with a list of actions.
    pub script: PathBuf,
    /// Seed overriding the configured one.
    pub seed: Option<u64>,
    /// Acknowledge pending events before every `EndTurn`.
    pub auto_events: bool,
}

/// Outcome of a scripted run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    /// Actions the game accepted.
    pub applied: usize,
    /// Actions the game refused.
    pub rejected: Vec<RejectedAction>,
    /// Events acknowledged, by the script or automatically.
    pub events_seen: Vec<String>,
    /// Final state.
    pub summary: GameSummary,
}

/// Read a RON action script.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_script(path: &Path) -> Result<Vec<PlayerAction>> {
    let contents = std::fs::read_to_string(path).map_err(|e| DataLoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let script = ron::from_str(&contents).map_err(|e| DataLoadError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(script)
}

/// Feed `script` to `game` and attach the final summary.
pub fn run_script(game: &mut GameState, script: &[PlayerAction], auto_events: bool) -> SimulationReport {
    let ScriptReport {
        applied,
        rejected,
        events_seen,
    } = game.run_script(script, auto_events);

    SimulationReport {
        applied,
        rejected,
        events_seen,
        summary: game.summary(),
    }
}

/// Load data and script, then run the script on a fresh game.
///
/// # Errors
///
/// Returns an error if the data directory or the script fails to load.
pub fn simulate(options: &SimulateOptions) -> Result<SimulationReport> {
    let (mut config, pack) = load_data_directory(&options.data)?;
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    let script = load_script(&options.script)?;

    let mut game = GameState::from_content(&config, &pack)?;
    tracing::info!(
        seed = config.seed,
        actions = script.len(),
        "Running script '{}'",
        options.script.display()
    );

    Ok(run_script(&mut game, &script, options.auto_events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use township_core::error::GameplayError;
    use township_test_utils::fixtures::{inert_events, script, test_game, FixedRoll};
    use township_test_utils::invariants::assert_invariants;

    #[test]
    fn test_run_script_records_rejections() {
        let mut game = test_game();
        let actions = script("[Build(index: 0, x: 1, y: 1), Build(index: 0, x: 1, y: 1), Demolish(x: 4, y: 4), EndTurn]");

        let report = run_script(&mut game, &actions, false);

        assert_eq!(report.applied, 2);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].step, 1);
        assert_eq!(report.rejected[1].reason, GameplayError::NothingToDemolish { x: 4, y: 4 }.to_string());
        assert_eq!(report.summary.turn, 2);
        assert_invariants(&game);
    }

    #[test]
    fn test_auto_events_drains_before_end_turn() {
        let mut game = test_game()
            .with_events(inert_events(&["fire", "flood"]), Vec::new())
            .with_random_source(FixedRoll(10));
        let actions = script("[EndTurn, EndTurn, EndTurn]");

        let drained = run_script(&mut game, &actions, true);

        assert!(drained.rejected.is_empty());
        assert_eq!(drained.events_seen, vec!["fire", "flood"]);
        assert_eq!(drained.summary.turn, 4);
    }

    #[test]
    fn test_without_auto_events_end_turn_blocks() {
        let mut game = test_game()
            .with_events(inert_events(&["fire"]), Vec::new())
            .with_random_source(FixedRoll(10));
        let actions = script("[EndTurn, EndTurn, NextEvent, EndTurn]");

        let report = run_script(&mut game, &actions, false);

        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].reason, "You still have unhandled events.");
        assert_eq!(report.events_seen, vec!["fire"]);
        assert_eq!(report.summary.turn, 3);
    }

    #[test]
    fn test_simulate_from_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("game.ron"), "(map: (width: 6, height: 6), seed: 5)").unwrap();
        std::fs::write(
            dir.path().join("content.ron"),
            r#"(buildings: [(id: "hut", name: "Hut", base_price: 10, allowed_terrain: [Plains, Forest, Hills, Desert, Water, Mountains])])"#,
        )
        .unwrap();
        let script_path = dir.path().join("script.ron");
        std::fs::write(&script_path, "[Build(index: 0, x: 0, y: 0), EndTurn]").unwrap();

        let options = SimulateOptions {
            data: dir.path().to_path_buf(),
            script: script_path,
            seed: Some(9),
            auto_events: true,
        };
        let report = simulate(&options).unwrap();

        assert_eq!(report.applied, 2);
        assert_eq!(report.summary.resources.money, 990);
        assert_eq!(report.summary.buildings.len(), 1);

        let again = simulate(&options).unwrap();
        assert_eq!(again.summary.state_hash, report.summary.state_hash);
    }

    #[test]
    fn test_bad_script_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.ron");
        std::fs::write(&path, "[Fly(x: 1)]").unwrap();

        let err = load_script(&path).unwrap_err();

        assert!(err.to_string().contains("script.ron"), "{err}");
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let mut game = test_game();
        game.build(0, 2, 3).unwrap();

        let report = run_script(&mut game, &[], false);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["summary"]["buildings"][0]["name"], "house");
        assert_eq!(json["summary"]["actions_remaining"], 2);
    }
}
