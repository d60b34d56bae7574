//! Vendor negotiation.
//!
//! A 2-player bargaining game over per-product discount rates:
//! - Player 0 is the Brand Specialist and needs expected sales to reach a
//!   share of the best achievable total
//! - Player 1 is the Vendor and needs expected profit to beat a multiple
//!   of the no-discount profit
//! - Offers are positional `[Propose] X%, Y%, ...` lists; `[Accept]` ends
//!   the game and the deal is settled by Monte Carlo simulation

mod catalog;
mod game;

pub use catalog::{allowed_discounts, catalog, DemandPoint, Product};
pub use game::{
    commands, new_game, NegotiationRules, NegotiationSettings, ProductResult, Proposal, Settlement, BRAND, VENDOR,
};
