//! Driver loop tests.
//!
//! These run whole games through `run_episode` with scripted and random
//! agents, the way a host would.

use rust_parley::agents::{random_seats, run_episode, Agent, RandomAgent, ScriptedAgent, Seats};
use rust_parley::core::{GameRng, PhaseTag, PlayerId};
use rust_parley::engine::Observation;
use rust_parley::games::{negotiation, win_as_much};
use rust_parley::{BoardState, GameConfig, GameResult};

/// Random agents always finish a Win as Much game.
#[test]
fn test_random_agents_finish_win_as_much() {
    for seed in 0..5 {
        let mut game = win_as_much::new_game(3).unwrap();
        let mut seats = random_seats(win_as_much::PLAYERS, seed);
        let report = run_episode(&mut game, &mut seats, 10_000).unwrap();

        assert!(report.finished, "seed {seed} did not finish");
        assert_eq!(report.rejected, 0);
        assert_eq!(report.steps, report.accepted);
        assert_eq!(report.outcome.as_ref(), game.outcome());
        assert_eq!(game.state().rounds.len(), 10);
    }
}

/// Same seed, same transcript.
#[test]
fn test_episodes_are_reproducible() {
    let run = |seed| {
        let mut game = win_as_much::new_game(3).unwrap();
        let mut seats = random_seats(win_as_much::PLAYERS, seed);
        run_episode(&mut game, &mut seats, 10_000).unwrap();
        game.state().transcript.clone()
    };
    assert_eq!(run(42), run(42));
}

/// The step cap stops an unfinished game.
#[test]
fn test_step_cap() {
    let mut game = win_as_much::new_game(3).unwrap();
    let mut seats = random_seats(win_as_much::PLAYERS, 1);
    let report = run_episode(&mut game, &mut seats, 3).unwrap();

    assert_eq!(report.steps, 3);
    assert!(!report.finished);
    assert!(report.outcome.is_none());
}

/// Cooperators always choose Y; a lone defector always chooses X.
#[test]
fn test_lone_defector_wins() {
    let defector = |obs: &Observation| match obs.board.phase_kind {
        PhaseTag::Communication => "[Pass]".to_string(),
        _ => "[Choose X]".to_string(),
    };
    let cooperator = |obs: &Observation| match obs.board.phase_kind {
        PhaseTag::Communication => "[Broadcast] everyone pick Y please".to_string(),
        _ => "[Choose Y]".to_string(),
    };

    let mut seats: Seats = vec![Box::new(defector) as Box<dyn Agent>];
    seats.extend((1..4).map(|_| Box::new(cooperator) as Box<dyn Agent>));

    let mut game = win_as_much::new_game(3).unwrap();
    let report = run_episode(&mut game, &mut seats, 10_000).unwrap();

    assert!(report.finished);
    let outcome = report.outcome.unwrap();
    assert_eq!(outcome.result, GameResult::Winner(PlayerId::new(0)));
    // 3 points per round times the multipliers 1+1+1+1+3+1+1+5+1+10.
    assert_eq!(game.state().scores[PlayerId::new(0)], 75);
}

/// Scripted agents running out of lines fall back, which can exhaust
/// their allowance without ending the game.
#[test]
fn test_scripted_agents_with_bad_fallback() {
    let mut seats: Seats = (0..4)
        .map(|_| Box::new(ScriptedAgent::new(["[Choose Y]"]).with_fallback("[Broadcast] a [Pass]")) as Box<dyn Agent>)
        .collect();

    let mut game = win_as_much::new_game(1).unwrap();
    let report = run_episode(&mut game, &mut seats, 10_000).unwrap();

    // Round 1 scores; later choices are rejected until everyone is out.
    assert!(report.finished);
    assert_eq!(report.accepted, 4);
    assert_eq!(report.rejected, 8);
    assert!(PlayerId::all(4).all(|p| !game.state().ledger.is_eligible(p)));
    assert_eq!(game.state().scores.values().copied().collect::<Vec<_>>(), vec![1, 1, 1, 1]);
}

/// Random talkers with canned lines settle or time out a negotiation.
#[test]
fn test_random_negotiation_terminates() {
    let lines = [
        "[Propose] 10%, 10%, 10%, 10%, 10%",
        "[Propose] 20%, 20%, 20%, 20%, 20%",
        "[Accept]",
        "[Reject]",
        "Can we meet in the middle?",
    ];
    let mut rng = GameRng::new(5);
    let mut seats: Seats = (0..2)
        .map(|_| Box::new(RandomAgent::from_rng(&mut rng).with_lines(lines)) as Box<dyn Agent>)
        .collect();

    let mut game = negotiation::new_game(negotiation::NegotiationSettings::default().with_seed(5)).unwrap();
    let report = run_episode(&mut game, &mut seats, 1_000).unwrap();

    assert!(report.finished);
    assert!(report.accepted <= 20);
    assert!(game.outcome().is_some());
}

/// A JSON configuration drives the engine like a built one.
#[test]
fn test_json_config_game() {
    let json = r#"{
        "player_count": 2,
        "error_allowance": 1,
        "plan": {
            "rounds": [
                {
                    "phases": [
                        { "name": "talk", "kind": { "Communication": { "max_exchanges": 2, "whispers": false } } },
                        { "name": "act", "kind": { "SimultaneousChoice": { "options": ["X", "Y"] } } }
                    ],
                    "multiplier": 2
                }
            ]
        }
    }"#;
    let config = GameConfig::from_json(json).unwrap();
    let mut game = rust_parley::Game::create(
        config,
        rust_parley::CommandSet::standard(2).unwrap(),
        win_as_much::WinAsMuchRules,
    )
    .unwrap();

    let board: BoardState = game.board();
    assert_eq!(board.max_exchanges, Some(2));
    assert_eq!(board.multiplier, 2);

    let mut seats = random_seats(2, 8);
    let report = run_episode(&mut game, &mut seats, 100).unwrap();
    assert!(report.finished);
    assert_eq!(game.state().rounds[0].multiplier, 2);
}
