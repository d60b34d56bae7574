//! Vendor negotiation implementation.

use rand_distr::Normal;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, GameConfig, GameRng, PhaseSpec, PlayerId, RoundPlan, RoundSpec};
use crate::engine::{EngineError, Game};
use crate::parser::CommandSet;
use crate::phases::Transition;
use crate::rules::{default_announcement, CommandEffect, GameResult, GameRules, GameView, Outcome, Signal};
use crate::turns::PhasePayload;

use super::catalog::{allowed_discounts, catalog, Product};

/// Seat 0: wants sales volume.
pub const BRAND: PlayerId = PlayerId::new(0);

/// Seat 1: wants profit.
pub const VENDOR: PlayerId = PlayerId::new(1);

const PROPOSE: &str = r"\[\s*propose\s*\](?P<body>.*)";
const ACCEPT: &str = r"\[\s*accept\s*\]";
const REJECT: &str = r"\[\s*reject\s*\]";
const PERCENT: &str = r"(\d+)\s*%";

/// Tunable parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NegotiationSettings {
    /// Products in negotiation order.
    pub products: Vec<Product>,

    /// Exchange cap for the whole negotiation.
    pub max_exchanges: u32,

    pub error_allowance: u32,

    /// Brand target as a share of expected sales at the deepest discount.
    pub brand_target_percentage: f64,

    /// Vendor must beat this multiple of expected profit at 0%.
    pub vendor_baseline_multiplier: f64,

    /// Monte Carlo draws per product when settling a deal.
    pub num_simulations: u32,

    pub seed: u64,
}

impl Default for NegotiationSettings {
    fn default() -> Self {
        Self {
            products: catalog(),
            max_exchanges: 20,
            error_allowance: 3,
            brand_target_percentage: 0.95,
            vendor_baseline_multiplier: 1.5,
            num_simulations: 1000,
            seed: 0,
        }
    }
}

impl NegotiationSettings {
    #[must_use]
    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_max_exchanges(mut self, max: u32) -> Self {
        self.max_exchanges = max;
        self
    }

    #[must_use]
    pub fn with_simulations(mut self, count: u32) -> Self {
        self.num_simulations = count;
        self
    }

    #[must_use]
    pub fn with_targets(mut self, brand_percentage: f64, vendor_multiplier: f64) -> Self {
        self.brand_target_percentage = brand_percentage;
        self.vendor_baseline_multiplier = vendor_multiplier;
        self
    }

    /// A single communication phase, whispers off.
    #[must_use]
    pub fn config(&self) -> GameConfig {
        let negotiate = PhaseSpec::communication("negotiate")
            .with_max_exchanges(self.max_exchanges)
            .without_whispers();
        GameConfig::new(2)
            .with_error_allowance(self.error_allowance)
            .with_plan(RoundPlan::new().with_round(RoundSpec::new(vec![negotiate])))
    }
}

/// `[Propose]`, `[Accept]` and `[Reject]`.
pub fn commands() -> Result<CommandSet, ConfigError> {
    CommandSet::new(2)
        .with_custom("Propose", PROPOSE)?
        .with_custom("Accept", ACCEPT)?
        .with_custom("Reject", REJECT)
}

/// Start a negotiation.
pub fn new_game(settings: NegotiationSettings) -> Result<Game<NegotiationRules>, EngineError> {
    let config = settings.config();
    let rules = NegotiationRules::new(settings)?;
    Game::create(config, commands()?, rules)
}

/// A standing offer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub proposer: PlayerId,
    /// One discount per product, in product order.
    pub discounts: Vec<u32>,
}

/// Simulated result for one product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductResult {
    pub name: String,
    pub discount: u32,
    pub avg_units: f64,
    pub avg_sales: f64,
    pub avg_profit: f64,
}

/// Monte Carlo settlement of an accepted deal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub products: Vec<ProductResult>,
    pub total_sales: f64,
    pub total_profit: f64,
    pub brand_won: bool,
    pub vendor_won: bool,
}

/// Rules for the vendor negotiation.
#[derive(Clone, Debug)]
pub struct NegotiationRules {
    settings: NegotiationSettings,
    allowed: Vec<u32>,
    brand_target: f64,
    vendor_baseline: f64,
    percent: Regex,
    proposal: Option<Proposal>,
    agreed: Option<Proposal>,
    settlement: Option<Settlement>,
    rng: GameRng,
}

impl NegotiationRules {
    pub fn new(settings: NegotiationSettings) -> Result<Self, ConfigError> {
        if settings.products.is_empty() {
            return Err(ConfigError::Settings("no products to negotiate".into()));
        }
        let allowed = allowed_discounts(&settings.products);
        let Some(&max_discount) = allowed.last() else {
            return Err(ConfigError::Settings("products share no discount rate".into()));
        };

        for product in &settings.products {
            for point in &product.demand {
                Normal::new(point.mean_units, point.std_units).map_err(|err| {
                    ConfigError::Settings(format!(
                        "{} at {}% has an invalid demand spread: {err}",
                        product.name, point.discount
                    ))
                })?;
            }
        }

        let brand_target = settings.brand_target_percentage
            * settings.products.iter().map(|p| p.mean_sales(max_discount)).sum::<f64>();
        let vendor_baseline = settings.vendor_baseline_multiplier
            * settings.products.iter().map(|p| p.mean_profit(0)).sum::<f64>();

        let percent = Regex::new(PERCENT).map_err(|source| ConfigError::Pattern {
            command: "Propose".into(),
            source,
        })?;

        Ok(Self {
            rng: GameRng::new(settings.seed),
            settings,
            allowed,
            brand_target,
            vendor_baseline,
            percent,
            proposal: None,
            agreed: None,
            settlement: None,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &NegotiationSettings {
        &self.settings
    }

    #[must_use]
    pub fn allowed_discounts(&self) -> &[u32] {
        &self.allowed
    }

    #[must_use]
    pub fn brand_target(&self) -> f64 {
        self.brand_target
    }

    #[must_use]
    pub fn vendor_baseline(&self) -> f64 {
        self.vendor_baseline
    }

    /// The offer currently on the table.
    #[must_use]
    pub fn proposal(&self) -> Option<&Proposal> {
        self.proposal.as_ref()
    }

    /// The accepted deal, if any.
    #[must_use]
    pub fn agreed(&self) -> Option<&Proposal> {
        self.agreed.as_ref()
    }

    #[must_use]
    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    fn product_order(&self) -> String {
        self.settings
            .products
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn allowed_list(&self) -> String {
        self.allowed
            .iter()
            .map(|d| format!("{d}%"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parse the positional discount list of a proposal.
    pub fn parse_discounts(&self, body: &str) -> Result<Vec<u32>, String> {
        let format_hint = || {
            format!(
                "Invalid proposal format. Use: [Propose] X%, Y%, ... following order: {}",
                self.product_order()
            )
        };

        let discounts: Vec<u32> = self
            .percent
            .captures_iter(body)
            .map(|caps| caps[1].parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| format_hint())?;

        if discounts.len() != self.settings.products.len() {
            return Err(format_hint());
        }

        for (product, discount) in self.settings.products.iter().zip(&discounts) {
            if !self.allowed.contains(discount) {
                return Err(format!(
                    "Invalid discount {discount}% for {}. Allowed: {}",
                    product.name,
                    self.allowed_list()
                ));
            }
        }
        Ok(discounts)
    }

    fn describe(&self, discounts: &[u32]) -> String {
        self.settings
            .products
            .iter()
            .zip(discounts)
            .map(|(p, d)| format!("{}:{d}%", p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Standing proposal that `player` may respond to.
    fn respondable(&self, player: PlayerId, verb: &str) -> Result<&Proposal, String> {
        match &self.proposal {
            None => Err(format!("No current proposal to {verb}")),
            Some(p) if p.proposer == player => Err(format!("You cannot {verb} your own proposal")),
            Some(p) => Ok(p),
        }
    }

    /// Monte Carlo estimate of sales and profit for a set of discounts.
    pub fn simulate(&mut self, discounts: &[u32]) -> Settlement {
        let draws = self.settings.num_simulations.max(1);
        let mut products = Vec::with_capacity(discounts.len());

        for (product, &discount) in self.settings.products.iter().zip(discounts) {
            let demand = product
                .demand_at(discount)
                .and_then(|d| Normal::new(d.mean_units, d.std_units).ok());
            let unit_price = product.discounted_price(discount);

            let total_units: f64 = match &demand {
                Some(normal) => (0..draws).map(|_| self.rng.sample(normal).max(0.0)).sum(),
                None => 0.0,
            };
            let avg_units = total_units / f64::from(draws);

            products.push(ProductResult {
                name: product.name.clone(),
                discount,
                avg_units,
                avg_sales: avg_units * unit_price,
                avg_profit: avg_units * (unit_price - product.cost),
            });
        }

        let total_sales: f64 = products.iter().map(|p| p.avg_sales).sum();
        let total_profit: f64 = products.iter().map(|p| p.avg_profit).sum();
        Settlement {
            products,
            total_sales,
            total_profit,
            brand_won: total_sales >= self.brand_target,
            vendor_won: total_profit > self.vendor_baseline,
        }
    }

    fn product_table(&self, player: PlayerId) -> String {
        let mut table = String::new();
        for product in &self.settings.products {
            if player == VENDOR {
                table.push_str(&format!(
                    "- {} (price ${:.0}, cost ${:.0}):",
                    product.name, product.price, product.cost
                ));
            } else {
                table.push_str(&format!("- {} (price ${:.0}):", product.name, product.price));
            }
            for &discount in &self.allowed {
                let units = product.demand_at(discount).map_or(0.0, |d| d.mean_units);
                if player == VENDOR {
                    table.push_str(&format!(
                        " {discount}%: {units:.0} units, profit ${:.0};",
                        product.mean_profit(discount)
                    ));
                } else {
                    table.push_str(&format!(
                        " {discount}%: {units:.0} units, sales ${:.0};",
                        product.mean_sales(discount)
                    ));
                }
            }
            table.push('\n');
        }
        table
    }
}

impl GameRules for NegotiationRules {
    fn prompt(&self, player: PlayerId, view: &GameView<'_>) -> String {
        let mut prompt = if player == BRAND {
            format!(
                "ROLE: Brand Specialist\n\
                 OBJECTIVE: Achieve total sales >= ${:.0} ({:.0}% of maximum possible)\n",
                self.brand_target,
                self.settings.brand_target_percentage * 100.0
            )
        } else {
            format!(
                "ROLE: Vendor\n\
                 OBJECTIVE: Achieve total profit > ${:.0} ({} times profit at 0% discount)\n\
                 Never reveal your costs or profit figures.\n",
                self.vendor_baseline, self.settings.vendor_baseline_multiplier
            )
        };

        prompt.push_str(&format!(
            "\nNEGOTIATION: agree on discount rates for {} products.\n\n{}\n\
             PRODUCT ORDER: {}\nALLOWED DISCOUNTS: {}\n\n\
             ACTIONS:\n[Propose] X%, Y%, Z%, ... (follow product order)\n[Accept]\n[Reject]\n\
             Free text is sent to the other player.\n",
            self.settings.products.len(),
            self.product_table(player),
            self.product_order(),
            self.allowed_list(),
        ));

        if let PhasePayload::Communication(talk) = view.payload() {
            prompt.push_str(&format!(
                "\nEXCHANGES: {}/{}\n",
                talk.exchanges,
                talk.max_exchanges.unwrap_or(self.settings.max_exchanges)
            ));
        }
        match &self.proposal {
            Some(p) => prompt.push_str(&format!(
                "CURRENT PROPOSAL by {}: {}\n",
                p.proposer,
                self.describe(&p.discounts)
            )),
            None => prompt.push_str("CURRENT PROPOSAL: none\n"),
        }
        prompt
    }

    fn on_command(
        &mut self,
        player: PlayerId,
        name: &str,
        body: &str,
        _view: &GameView<'_>,
    ) -> Result<CommandEffect, String> {
        match name.to_ascii_lowercase().as_str() {
            "propose" => {
                let discounts = self.parse_discounts(body)?;
                let content = format!("proposed: {}", self.describe(&discounts));
                self.proposal = Some(Proposal {
                    proposer: player,
                    discounts,
                });
                Ok(CommandEffect::new(content))
            }
            "accept" => {
                let deal = self.respondable(player, "accept")?.clone();
                self.agreed = Some(deal);
                Ok(CommandEffect::new("accepted the proposal").with_signal(Signal::FinishGame))
            }
            "reject" => {
                self.respondable(player, "reject")?;
                self.proposal = None;
                Ok(CommandEffect::new("rejected the proposal"))
            }
            _ => Err(format!("[{name}] is not available in this game")),
        }
    }

    fn evaluate(&mut self, view: &GameView<'_>) -> Outcome {
        let players = view.player_count();

        let Some(deal) = self.agreed.clone() else {
            return Outcome::win_loss(
                players,
                GameResult::Draw,
                format!(
                    "No deal reached. Neither player achieved their objective (target ${:.0}, baseline ${:.0})",
                    self.brand_target, self.vendor_baseline
                ),
            );
        };

        let settlement = self.simulate(&deal.discounts);
        let totals = format!(
            "Deal {}: expected sales ${:.0} vs target ${:.0}, expected profit ${:.0} vs baseline ${:.0}",
            self.describe(&deal.discounts),
            settlement.total_sales,
            self.brand_target,
            settlement.total_profit,
            self.vendor_baseline
        );
        let (result, verdict) = match (settlement.brand_won, settlement.vendor_won) {
            (true, true) => (GameResult::Draw, "Both players achieved their objectives"),
            (true, false) => (GameResult::Winner(BRAND), "Brand Specialist achieved sales target"),
            (false, true) => (GameResult::Winner(VENDOR), "Vendor achieved profit target"),
            (false, false) => (GameResult::Draw, "Neither player achieved their objective"),
        };
        self.settlement = Some(settlement);

        Outcome::win_loss(players, result, format!("{verdict}. {totals}"))
    }

    fn announce(&self, transition: &Transition, view: &GameView<'_>) -> String {
        match (transition, view.outcome()) {
            (Transition::GameOver { .. }, Some(outcome)) => format!("NEGOTIATION OVER - {}", outcome.summary),
            _ => default_announcement(transition, view),
        }
    }
}
