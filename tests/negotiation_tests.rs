//! Vendor negotiation tests.
//!
//! These verify proposal handling, game-ending signals and Monte Carlo
//! settlement through the engine.

use rust_parley::core::{MessageKind, Sender};
use rust_parley::games::negotiation::{self, NegotiationRules, NegotiationSettings, BRAND, VENDOR};
use rust_parley::{Game, GameResult, IneligibleReason, Verdict};

fn game() -> Game<NegotiationRules> {
    negotiation::new_game(NegotiationSettings::default().with_seed(11)).unwrap()
}

/// Brand opens, vendor accepts a uniform deep discount.
#[test]
fn test_accepting_deep_discounts_favours_brand() {
    let mut game = game();
    assert_eq!(game.actor(), Some(BRAND));

    let step = game.submit(BRAND, "[Propose] 30%, 30%, 30%, 30%, 30%").unwrap();
    assert!(step.is_accepted());
    assert_eq!(step.actor, Some(VENDOR));
    assert_eq!(game.rules().proposal().unwrap().discounts, vec![30; 5]);

    let step = game.submit(VENDOR, "Fine. [Accept]").unwrap();
    assert!(step.done);
    assert_eq!(step.actor, None);

    let outcome = game.outcome().unwrap();
    assert_eq!(outcome.result, GameResult::Winner(BRAND));
    assert_eq!(outcome.reward(BRAND), 1.0);
    assert_eq!(outcome.reward(VENDOR), -1.0);
    assert!(outcome.summary.starts_with("Brand Specialist achieved sales target"));

    let settlement = game.rules().settlement().unwrap();
    assert!(settlement.brand_won);
    assert!(!settlement.vendor_won);

    let last = game.state().transcript.back().unwrap();
    assert_eq!(last.sender, Sender::Referee);
    assert!(last.content.starts_with("NEGOTIATION OVER - Brand Specialist"));
}

/// No discount at all satisfies neither side.
#[test]
fn test_no_discount_is_a_draw() {
    let mut game = game();
    game.submit(BRAND, "How about this?").unwrap();
    game.submit(VENDOR, "[Propose] 0%, 0%, 0%, 0%, 0%").unwrap();
    game.submit(BRAND, "[Accept]").unwrap();

    let outcome = game.outcome().unwrap();
    assert_eq!(outcome.result, GameResult::Draw);
    assert!(outcome.players.values().all(|r| r.reward == 0.0));
    assert!(outcome.summary.starts_with("Neither player achieved their objective"));
}

/// Responding to nothing, or to yourself, costs a strike.
#[test]
fn test_invalid_responses_are_strikes() {
    let mut game = game();

    let step = game.submit(BRAND, "[Accept]").unwrap();
    assert_eq!(step.reason(), Some("No current proposal to accept"));

    game.submit(BRAND, "[Propose] 10%, 10%, 10%, 10%, 10%").unwrap();
    game.submit(VENDOR, "Let me think.").unwrap();

    let step = game.submit(BRAND, "[Reject]").unwrap();
    assert_eq!(step.reason(), Some("You cannot reject your own proposal"));
    assert!(matches!(step.verdict, Verdict::Invalid { strikes: 2, remaining: 1, .. }));
    assert_eq!(game.actor(), Some(BRAND));
    assert!(game.rules().proposal().is_some());
}

/// Malformed proposals are rejected with the expected order or rates.
#[test]
fn test_malformed_proposals() {
    let mut game = game();

    let step = game.submit(BRAND, "[Propose] 10%, 20%").unwrap();
    assert!(step
        .reason()
        .unwrap()
        .ends_with("following order: Wireless Earbuds, Smart Watch, Bluetooth Speaker, Phone Case, Fitness Tracker"));

    let step = game.submit(BRAND, "[Propose] 10%, 25%, 10%, 10%, 10%").unwrap();
    assert_eq!(step.reason(), Some("Invalid discount 25% for Smart Watch. Allowed: 0%, 10%, 20%, 30%"));
    assert!(game.rules().proposal().is_none());
    assert!(game.state().transcript.is_empty());
}

/// Rejecting clears the table and play continues.
#[test]
fn test_reject_clears_proposal() {
    let mut game = game();
    game.submit(BRAND, "[Propose] 30%, 30%, 30%, 30%, 30%").unwrap();
    game.submit(VENDOR, "Too deep. [Reject]").unwrap();

    assert!(game.rules().proposal().is_none());
    assert!(!game.is_game_over());
    assert_eq!(game.actor(), Some(BRAND));

    let last = game.state().transcript.back().unwrap();
    assert_eq!(last.kind, MessageKind::Command("Reject".to_string()));
    assert_eq!(last.preamble.as_deref(), Some("Too deep."));

    let feed = game.observe_for(BRAND).unwrap().feed;
    assert!(feed.iter().any(|line| line == "Player 1 rejected the proposal"));
}

/// Running out of exchanges ends the game without a deal.
#[test]
fn test_exchange_cap_means_no_deal() {
    let settings = NegotiationSettings::default().with_seed(3).with_max_exchanges(4);
    let mut game = negotiation::new_game(settings).unwrap();

    for i in 0..4 {
        let actor = game.actor().unwrap();
        game.submit(actor, &format!("offer talk {i}")).unwrap();
    }

    assert!(game.is_game_over());
    let outcome = game.outcome().unwrap();
    assert_eq!(outcome.result, GameResult::Draw);
    assert!(outcome.summary.starts_with("No deal reached"));
    assert!(game.rules().settlement().is_none());
    assert_eq!(
        game.submit(BRAND, "[Accept]").unwrap_err().ineligible_reason(),
        Some(IneligibleReason::GameOver)
    );
}

/// Prompts are role-specific and the brand never sees costs.
#[test]
fn test_role_prompts() {
    let mut game = game();
    let brand = game.observe_for(BRAND).unwrap();
    let vendor = game.observe_for(VENDOR).unwrap();

    assert!(brand.prompt.starts_with("ROLE: Brand Specialist"));
    assert!(!brand.prompt.contains("cost $"));
    assert!(vendor.prompt.starts_with("ROLE: Vendor"));
    assert!(vendor.prompt.contains("Smart Watch (price $200, cost $110)"));
    assert!(brand.is_turn);
    assert!(!vendor.is_turn);
    assert!(!brand.board.whispers);
}

/// Same seed, same settlement.
#[test]
fn test_settlement_reproducible() {
    let settle = || {
        let mut game = game();
        game.submit(BRAND, "[Propose] 20%, 10%, 20%, 10%, 20%").unwrap();
        game.submit(VENDOR, "[Accept]").unwrap();
        game.rules().settlement().cloned().unwrap()
    };
    assert_eq!(settle(), settle());
}
