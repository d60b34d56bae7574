//! Per-player strike accounting.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap};

/// One player's standing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Invalid actions so far.
    pub strikes: u32,

    /// Whether the player may still act.
    pub eligible: bool,
}

/// A recorded invalid action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strike {
    /// Who was charged.
    pub player: PlayerId,

    /// Round in which the strike happened.
    pub round: u32,

    /// Actionable reason shown to the player.
    pub reason: String,
}

/// Result of charging a strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeVerdict {
    /// Strike count after this one.
    pub strikes: u32,

    /// Strikes still tolerated before elimination.
    pub remaining: u32,

    /// True exactly when this strike removed the player's eligibility.
    pub eliminated: bool,
}

/// Validity ledger: one entry per seat plus an append-only strike log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    allowance: u32,
    entries: PlayerMap<LedgerEntry>,
    log: Vector<Strike>,
}

impl Ledger {
    /// Create a ledger where every player starts eligible with no strikes.
    #[must_use]
    pub fn new(player_count: usize, allowance: u32) -> Self {
        Self {
            allowance,
            entries: PlayerMap::with_value(
                player_count,
                LedgerEntry {
                    strikes: 0,
                    eligible: true,
                },
            ),
            log: Vector::new(),
        }
    }

    /// Charge one strike. Once strikes exceed the allowance the player
    /// becomes permanently ineligible.
    pub fn record_invalid(&mut self, player: PlayerId, round: u32, reason: impl Into<String>) -> StrikeVerdict {
        let reason = reason.into();
        let allowance = self.allowance;
        let entry = &mut self.entries[player];

        let was_eligible = entry.eligible;
        entry.strikes += 1;
        entry.eligible = entry.strikes <= allowance;
        let eliminated = was_eligible && !entry.eligible;

        if eliminated {
            tracing::warn!(%player, strikes = entry.strikes, %reason, "player eliminated");
        } else {
            tracing::warn!(%player, strikes = entry.strikes, %reason, "strike recorded");
        }

        let verdict = StrikeVerdict {
            strikes: entry.strikes,
            remaining: allowance.saturating_sub(entry.strikes),
            eliminated,
        };

        self.log.push_back(Strike {
            player,
            round,
            reason,
        });

        verdict
    }

    /// Whether the player may still act.
    #[must_use]
    pub fn is_eligible(&self, player: PlayerId) -> bool {
        self.entries[player].eligible
    }

    /// Strikes charged to a player.
    #[must_use]
    pub fn strikes(&self, player: PlayerId) -> u32 {
        self.entries[player].strikes
    }

    /// The configured allowance.
    #[must_use]
    pub fn allowance(&self) -> u32 {
        self.allowance
    }

    /// Per-player entries.
    #[must_use]
    pub fn entries(&self) -> &PlayerMap<LedgerEntry> {
        &self.entries
    }

    /// Every strike in the order it was charged.
    pub fn log(&self) -> impl Iterator<Item = &Strike> {
        self.log.iter()
    }

    /// Eligible players in seat order.
    pub fn eligible_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.entries.iter().filter(|(_, e)| e.eligible).map(|(p, _)| p)
    }
}
