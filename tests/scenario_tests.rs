//! End-to-end scenario tests.
//!
//! These drive Win as Much as You Can and small hand-built plans through
//! the public `create` / `observe` / `submit` / `outcome` surface.

use rust_parley::core::{GameConfig, PhaseSpec, PlayerId, RoundPlan, RoundSpec, Sender};
use rust_parley::games::win_as_much::{self, WinAsMuchRules};
use rust_parley::parser::CommandSet;
use rust_parley::turns::{next_actor, NextActor, PhasePayload};
use rust_parley::{Game, IneligibleReason, Verdict};

fn p(i: u8) -> PlayerId {
    PlayerId::new(i)
}

/// Every seat in order submits the same choice.
fn everyone_chooses(game: &mut Game<WinAsMuchRules>, label: &str) {
    for i in 0..4 {
        let step = game.submit(p(i), &format!("[Choose {label}]")).unwrap();
        assert!(step.is_accepted(), "{:?}", step.verdict);
    }
}

/// The current actor passes until the talk phase closes.
fn everyone_passes(game: &mut Game<WinAsMuchRules>) {
    while let PhasePayload::Communication(_) = game.state().payload {
        let actor = game.actor().unwrap();
        assert!(game.submit(actor, "[Pass]").unwrap().is_accepted());
    }
}

/// Play choice-only rounds and talk phases until `round` starts.
fn play_until(game: &mut Game<WinAsMuchRules>, round: u32) {
    while game.state().round < round {
        match game.state().payload {
            PhasePayload::Communication(_) => everyone_passes(game),
            PhasePayload::SimultaneousChoice(_) => everyone_chooses(game, "Y"),
            PhasePayload::GameOver => panic!("game ended before round {round}"),
        }
    }
}

/// One 4-player communication phase followed by a choice.
fn talk_game(allowance: u32) -> Game<WinAsMuchRules> {
    let plan = RoundPlan::new().with_round(RoundSpec::new(vec![
        PhaseSpec::communication("talk").with_max_exchanges(12),
        PhaseSpec::choice("act", ["X", "Y"]),
    ]));
    let config = GameConfig::new(4).with_error_allowance(allowance).with_plan(plan);
    Game::create(config, CommandSet::standard(4).unwrap(), WinAsMuchRules).unwrap()
}

// =============================================================================
// Scoring
// =============================================================================

/// All four players choose Y in round 8 (multiplier 5): +5 each.
#[test]
fn test_all_agree_with_multiplier_five() {
    let mut game = win_as_much::new_game(3).unwrap();
    play_until(&mut game, 8);
    let before: Vec<i64> = game.state().scores.values().copied().collect();

    everyone_passes(&mut game);
    everyone_chooses(&mut game, "Y");

    let record = game.state().rounds.back().unwrap().clone();
    assert_eq!(record.round, 8);
    assert_eq!(record.multiplier, 5);
    assert_eq!(record.choices.len(), 4);
    assert!(record.choices.iter().all(|(_, c)| c == "Y"));
    assert_eq!(record.deltas.values().copied().collect::<Vec<_>>(), vec![5, 5, 5, 5]);

    for (player, score) in game.state().scores.iter() {
        assert_eq!(*score, before[player.index()] + 5);
    }
}

/// One defector against three cooperators, unmultiplied.
#[test]
fn test_single_defector_round() {
    let mut game = win_as_much::new_game(3).unwrap();
    game.submit(p(0), "[Choose X]").unwrap();
    for i in 1..4 {
        game.submit(p(i), "[Choose y]").unwrap();
    }
    assert_eq!(game.state().scores.values().copied().collect::<Vec<_>>(), vec![3, -1, -1, -1]);

    let announcement = game.state().transcript.back().unwrap();
    assert_eq!(announcement.sender, Sender::Referee);
    assert!(announcement.content.starts_with("Round 1 Results: Player 0: X, Player 1: Y"));
    assert!(announcement.content.contains("Player 0 +3 (Total: 3)"));
    assert!(announcement.content.ends_with("Round 2 - act phase begins"));
}

// =============================================================================
// Strikes
// =============================================================================

/// Whispering to yourself is a parse error: strike, no transcript entry.
#[test]
fn test_whisper_to_self_rejected() {
    let mut game = talk_game(3);
    let step = game.submit(p(0), "[Whisper to 0] note to self").unwrap();

    assert_eq!(step.reason(), Some("Cannot whisper to yourself"));
    assert!(matches!(step.verdict, Verdict::Invalid { strikes: 1, remaining: 2, eliminated: false, .. }));
    assert!(game.state().transcript.is_empty());
    assert_eq!(game.state().ledger.log().count(), 1);
    // Still their turn to try again.
    assert_eq!(game.actor(), Some(p(0)));
}

/// Allowance 2: the third unparseable action removes the player for good.
#[test]
fn test_allowance_exhausted_after_three_bad_actions() {
    let mut game = win_as_much::new_game(2).unwrap();

    for attempt in 1..=3 {
        let step = game.submit(p(0), "[Broadcast] hi [Pass]").unwrap();
        assert!(step.reason().unwrap().starts_with("Multiple actions detected"));
        if let Verdict::Invalid { strikes, eliminated, .. } = step.verdict {
            assert_eq!(strikes, attempt);
            assert_eq!(eliminated, attempt == 3);
        }
    }

    assert!(!game.state().ledger.is_eligible(p(0)));
    assert_eq!(
        game.submit(p(0), "[Choose X]").unwrap_err().ineligible_reason(),
        Some(IneligibleReason::Eliminated)
    );
    assert_eq!(game.pending_players(), vec![p(1), p(2), p(3)]);

    // Player 0 is never selected again, through talk and choice phases alike.
    while !game.is_game_over() {
        let actor = game.actor().unwrap();
        assert_ne!(actor, p(0));
        assert_ne!(next_actor(&game.state().payload, &game.state().ledger), NextActor::Player(p(0)));
        let action = match game.state().payload {
            PhasePayload::Communication(_) => "[Pass]",
            _ => "[Choose Y]",
        };
        game.submit(actor, action).unwrap();
    }

    assert!(game.state().rounds.iter().all(|r| r.choice_of(p(0)).is_none()));
    assert_eq!(game.state().scores[p(0)], 0);
}

/// Strikes do not touch the transcript or the turn order.
#[test]
fn test_invalid_choice_label() {
    let mut game = win_as_much::new_game(3).unwrap();
    let step = game.submit(p(1), "[Choose Z]").unwrap();
    assert_eq!(step.reason(), Some("Unknown option 'Z'. Use [Choose <option>] with one of: X, Y"));
    assert!(game.state().transcript.is_empty());
    assert!(game.is_pending(p(1)));
}

/// Free text during a choice phase is recorded but does not count as a choice.
#[test]
fn test_remark_in_choice_phase_keeps_player_pending() {
    let mut game = win_as_much::new_game(3).unwrap();
    assert!(game.submit(p(2), "hmm, tough call").unwrap().is_accepted());
    assert_eq!(game.state().transcript.len(), 1);
    assert!(game.is_pending(p(2)));
}

// =============================================================================
// Phases
// =============================================================================

/// Payloads never carry state across a transition.
#[test]
fn test_payload_fresh_after_each_transition() {
    let mut game = win_as_much::new_game(3).unwrap();
    play_until(&mut game, 5);

    let actor = game.actor().unwrap();
    game.submit(actor, "[Broadcast] let's all pick Y").unwrap();
    let actor = game.actor().unwrap();
    game.submit(actor, "[Pass]").unwrap();
    everyone_passes(&mut game);

    match &game.state().payload {
        PhasePayload::SimultaneousChoice(choice) => {
            assert_eq!(choice.chosen_players().count(), 0);
            assert_eq!(choice.options, vec!["X".to_string(), "Y".to_string()]);
        }
        other => panic!("expected act phase, got {}", other.tag()),
    }

    everyone_chooses(&mut game, "X");
    play_until(&mut game, 8);
    match &game.state().payload {
        PhasePayload::Communication(talk) => {
            assert_eq!(talk.exchanges, 0);
            assert_eq!(talk.last_actor, None);
            assert_eq!(talk.withdrawn_players().count(), 0);
            assert!(!talk.closed);
        }
        other => panic!("expected talk phase, got {}", other.tag()),
    }
    assert_eq!(game.actor(), Some(p(0)));
}

/// Choices may arrive in any order; the phase ends with the last one.
#[test]
fn test_simultaneous_choices_in_any_order() {
    let mut game = win_as_much::new_game(3).unwrap();
    assert_eq!(game.actor(), Some(p(0)));

    game.submit(p(3), "[Choose X]").unwrap();
    game.submit(p(1), "[Choose Y]").unwrap();
    assert_eq!(game.actor(), Some(p(0)));
    assert_eq!(game.pending_players(), vec![p(0), p(2)]);

    game.submit(p(0), "[Choose Y]").unwrap();
    assert_eq!(game.actor(), Some(p(2)));
    assert_eq!(game.state().round, 1);

    game.submit(p(2), "[Choose Y]").unwrap();
    assert_eq!(game.state().round, 2);

    let record = &game.state().rounds[0];
    assert_eq!(record.choice_of(p(3)), Some("X"));
    assert_eq!(record.deltas.values().copied().collect::<Vec<_>>(), vec![-1, -1, -1, 3]);
}

/// Sealed choices are hidden from the rest of the table until scoring.
#[test]
fn test_sealed_choice_rendering() {
    let mut game = win_as_much::new_game(3).unwrap();
    game.submit(p(1), "[Choose X]").unwrap();

    let own = game.observe_for(p(1)).unwrap();
    assert_eq!(own.feed, vec!["You chose X".to_string()]);

    let other = game.observe_for(p(0)).unwrap();
    assert_eq!(other.feed.len(), 1);
    assert!(!other.feed[0].contains('X'));
}

/// A talk phase closes at its exchange cap even if nobody passes.
#[test]
fn test_exchange_cap_closes_talk() {
    let mut game = talk_game(3);
    for i in 0..12 {
        let actor = game.actor().unwrap();
        assert_eq!(actor, p(i % 4));
        game.submit(actor, &format!("[Broadcast] message {i}")).unwrap();
    }
    assert_eq!(game.board().phase.as_deref(), Some("act"));
    assert_eq!(
        game.state().transcript.back().unwrap().content,
        "Round 1 - act phase begins"
    );
}

/// Whispers can be switched off per phase.
#[test]
fn test_whispers_disabled() {
    let plan = RoundPlan::new().with_round(RoundSpec::new(vec![
        PhaseSpec::communication("talk").without_whispers(),
        PhaseSpec::choice("act", ["X", "Y"]),
    ]));
    let config = GameConfig::new(4).with_plan(plan);
    let mut game = Game::create(config, CommandSet::standard(4).unwrap(), WinAsMuchRules).unwrap();

    let step = game.submit(p(0), "[Whisper to 1] psst").unwrap();
    assert!(step.reason().unwrap().starts_with("Private messages are not allowed in this phase"));
    assert!(game.submit(p(0), "[Broadcast] fine, out loud").unwrap().is_accepted());
}

// =============================================================================
// Outcome
// =============================================================================

/// `outcome` is `None` until game over, then stable across calls.
#[test]
fn test_outcome_idempotent() {
    let mut game = win_as_much::new_game(3).unwrap();
    assert!(game.outcome().is_none());

    play_until(&mut game, 10);
    everyone_passes(&mut game);
    game.submit(p(0), "[Choose X]").unwrap();
    for i in 1..4 {
        game.submit(p(i), "[Choose Y]").unwrap();
    }
    assert!(game.is_game_over());

    let first = game.outcome().cloned().unwrap();
    let second = game.outcome().cloned().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.reward(p(0)), 1.0);
    assert_eq!(first.reward(p(1)), -1.0);
    assert!(first.summary.starts_with("Player 0 wins"));

    let err = game.submit(p(1), "[Choose Y]").unwrap_err();
    assert_eq!(err.ineligible_reason(), Some(IneligibleReason::GameOver));
    assert_eq!(game.outcome(), Some(&first));

    let last = game.state().transcript.back().unwrap();
    assert!(last.content.contains("GAME OVER - Final scores:"));
}

/// Nobody is rewarded when the best total is not positive.
#[test]
fn test_no_reward_without_positive_score() {
    let mut game = win_as_much::new_game(3).unwrap();
    while !game.is_game_over() {
        match game.state().payload {
            PhasePayload::Communication(_) => everyone_passes(&mut game),
            _ => everyone_chooses(&mut game, "X"),
        }
    }
    let outcome = game.outcome().unwrap();
    assert!(game.state().scores.values().all(|s| *s < 0));
    assert!(outcome.players.values().all(|r| r.reward == 0.0));
}
