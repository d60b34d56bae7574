//! The game instance: request/response driver API over one `GameState`.
//!
//! ## Control flow
//!
//! A host repeatedly calls `observe` to learn who must act and what they
//! see, obtains a raw action string from that player, then calls `submit`.
//! `submit` parses the action, validates it against the current phase,
//! appends one transcript message on success and then settles the game:
//! the turn selector either names the next actor or reports the phase
//! complete, in which case the phase machine transitions (possibly several
//! times) until someone can act or the game is over.
//!
//! The current actor is written in exactly one place, `settle`.

use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, GameConfig, GameState, Message, PhaseKind, MessageKind, PlayerId, RoundRecord, Visibility};
use crate::parser::{Command, CommandKind, CommandSet, ParsedAction};
use crate::phases::{self, Advance, Transition};
use crate::routing::{render_for, route};
use crate::rules::{GameRules, GameView, Outcome, Signal};
use crate::turns::{next_actor, NextActor, PhasePayload};

use super::board::{BoardState, Observation};
use super::error::{EngineError, IneligibleReason};

/// How a submission was judged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The action was applied and entered the transcript.
    Accepted,
    /// The action was rejected and charged as a strike.
    Invalid {
        /// Actionable reason for the player.
        reason: String,
        strikes: u32,
        remaining: u32,
        /// True when this strike removed the player from play.
        eliminated: bool,
    },
}

/// Result of one `submit` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Whether the game is over.
    pub done: bool,

    /// Who the engine waits on next.
    pub actor: Option<PlayerId>,

    pub verdict: Verdict,
}

impl Step {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self.verdict, Verdict::Accepted)
    }

    /// The rejection reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match &self.verdict {
            Verdict::Accepted => None,
            Verdict::Invalid { reason, .. } => Some(reason),
        }
    }
}

/// What an accepted action does to the phase payload.
enum Effect {
    /// One communication exchange.
    Exchange { withdraw: bool, signal: Signal },
    /// A sealed choice.
    Choice(String),
    /// Free text during a choice phase; the player still owes a choice.
    Remark,
}

struct Accepted {
    message: Message,
    effect: Effect,
}

/// One running game.
#[derive(Clone, Debug)]
pub struct Game<R> {
    config: GameConfig,
    commands: CommandSet,
    rules: R,
    state: GameState,
}

impl<R: GameRules> Game<R> {
    /// Validate the configuration and start round 1.
    pub fn create(config: GameConfig, commands: CommandSet, rules: R) -> Result<Self, EngineError> {
        config.validate()?;
        if commands.player_count() != config.player_count {
            return Err(ConfigError::CommandSeats {
                expected: config.player_count,
                found: commands.player_count(),
            }
            .into());
        }
        check_vocabulary(&config, &commands)?;

        let first = config.plan.phase(1, 0).ok_or(ConfigError::EmptyPlan)?;
        let payload = PhasePayload::fresh(first, config.player_count);
        let state = GameState::new(config.player_count, config.error_allowance, payload);

        tracing::info!(
            players = config.player_count,
            rounds = config.plan.final_round(),
            allowance = config.error_allowance,
            "game created"
        );

        let mut game = Self {
            config,
            commands,
            rules,
            state,
        };
        game.settle()?;
        Ok(game)
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Read-only view, as handed to rules hooks.
    #[must_use]
    pub fn view(&self) -> GameView<'_> {
        GameView::new(&self.config, &self.state)
    }

    /// The player the engine is waiting on; `None` once the game is over.
    #[must_use]
    pub fn actor(&self) -> Option<PlayerId> {
        self.state.actor()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// The final result; `None` until the game is over.
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.state.outcome()
    }

    #[must_use]
    pub fn board(&self) -> BoardState {
        BoardState::capture(&self.view())
    }

    /// Whether a submission from `player` would be considered right now.
    ///
    /// In communication phases only the current actor is pending; in
    /// choice phases every eligible player without a choice is.
    #[must_use]
    pub fn is_pending(&self, player: PlayerId) -> bool {
        if player.index() >= self.state.player_count() || !self.state.ledger.is_eligible(player) {
            return false;
        }
        match &self.state.payload {
            PhasePayload::Communication(_) => self.state.actor() == Some(player),
            PhasePayload::SimultaneousChoice(choice) => !choice.has_chosen(player),
            PhasePayload::GameOver => false,
        }
    }

    /// All pending players in seat order.
    #[must_use]
    pub fn pending_players(&self) -> Vec<PlayerId> {
        self.state.player_ids().filter(|p| self.is_pending(*p)).collect()
    }

    // === Observation ===

    /// Observation for the current actor; `None` once the game is over.
    pub fn observe(&mut self) -> Option<Observation> {
        let actor = self.state.actor()?;
        self.observe_for(actor).ok()
    }

    /// Observation for any seated player. Advances that player's feed.
    pub fn observe_for(&mut self, player: PlayerId) -> Result<Observation, EngineError> {
        if player.index() >= self.state.player_count() {
            return Err(EngineError::ineligible(player, IneligibleReason::NotSeated));
        }
        let unread = self.state.take_unread(player);
        let feed = unread.iter().flat_map(|m| render_for(m, player)).collect();

        let view = GameView::new(&self.config, &self.state);
        Ok(Observation {
            player,
            is_turn: self.is_pending(player),
            prompt: self.rules.prompt(player, &view),
            board: BoardState::capture(&view),
            feed,
        })
    }

    // === Submission ===

    /// Submit a raw action for `actor`.
    ///
    /// Player mistakes come back as `Ok` with an invalid verdict and cost a
    /// strike. Driver protocol violations are `Err(Ineligible)` and cost
    /// nothing.
    pub fn submit(&mut self, actor: PlayerId, raw: &str) -> Result<Step, EngineError> {
        self.check_turn(actor)?;

        let parsed = match self.commands.parse(actor, raw) {
            Ok(parsed) => parsed,
            Err(err) => return self.reject(actor, err.to_string()),
        };

        match self.interpret(actor, parsed) {
            Ok(accepted) => self.commit(actor, accepted),
            Err(reason) => self.reject(actor, reason),
        }
    }

    fn check_turn(&self, actor: PlayerId) -> Result<(), EngineError> {
        if actor.index() >= self.state.player_count() {
            return Err(EngineError::ineligible(actor, IneligibleReason::NotSeated));
        }
        if self.state.is_game_over() {
            return Err(EngineError::ineligible(actor, IneligibleReason::GameOver));
        }
        if !self.state.ledger.is_eligible(actor) {
            return Err(EngineError::ineligible(actor, IneligibleReason::Eliminated));
        }

        match &self.state.payload {
            PhasePayload::Communication(_) => match self.state.actor() {
                Some(expected) if expected != actor => {
                    Err(EngineError::ineligible(actor, IneligibleReason::NotYourTurn { expected }))
                }
                Some(_) => Ok(()),
                None => Err(EngineError::invariant("communication phase has no actor")),
            },
            PhasePayload::SimultaneousChoice(choice) if choice.has_chosen(actor) => {
                Err(EngineError::ineligible(actor, IneligibleReason::AlreadyChosen))
            }
            PhasePayload::SimultaneousChoice(_) => Ok(()),
            PhasePayload::GameOver => Err(EngineError::ineligible(actor, IneligibleReason::GameOver)),
        }
    }

    /// Validate a parsed action against the current phase.
    fn interpret(&mut self, actor: PlayerId, parsed: ParsedAction) -> Result<Accepted, String> {
        let ParsedAction { remark, command } = parsed;

        let Some(command) = command else {
            let effect = match self.state.payload {
                PhasePayload::Communication(_) => Effect::Exchange {
                    withdraw: false,
                    signal: Signal::Continue,
                },
                _ => Effect::Remark,
            };
            let text = remark.unwrap_or_default();
            return Ok(Accepted {
                message: Message::from_player(actor, MessageKind::Remark, Visibility::Public, text),
                effect,
            });
        };

        let exchange = Effect::Exchange {
            withdraw: false,
            signal: Signal::Continue,
        };

        let (message, effect) = match (&self.state.payload, command) {
            (PhasePayload::Communication(_), Command::Broadcast { body }) => (
                Message::from_player(actor, MessageKind::Broadcast, Visibility::Public, body),
                exchange,
            ),
            (PhasePayload::Communication(talk), Command::Whisper { target, body }) => {
                if !talk.whispers {
                    return Err(format!(
                        "Private messages are not allowed in this phase. {}",
                        self.usage_hint()
                    ));
                }
                (
                    Message::from_player(actor, MessageKind::Whisper, Visibility::PrivateTo(target), body),
                    exchange,
                )
            }
            (PhasePayload::Communication(_), Command::Pass) => (
                Message::from_player(actor, MessageKind::Pass, Visibility::Public, ""),
                Effect::Exchange {
                    withdraw: true,
                    signal: Signal::Continue,
                },
            ),
            (PhasePayload::Communication(_), Command::Custom { name, body }) => {
                let view = GameView::new(&self.config, &self.state);
                let result = self.rules.on_command(actor, &name, &body, &view)?;
                (
                    Message::from_player(actor, MessageKind::Command(name), Visibility::Public, result.content),
                    Effect::Exchange {
                        withdraw: false,
                        signal: result.signal,
                    },
                )
            }
            (PhasePayload::Communication(_), Command::Choose { .. }) => {
                return Err(format!(
                    "{} is only available during a choice phase. {}",
                    CommandKind::Choose,
                    self.usage_hint()
                ));
            }
            (PhasePayload::SimultaneousChoice(_), Command::Choose { label }) => {
                let canonical = self
                    .current_phase()
                    .and_then(|spec| spec.canonical_option(&label))
                    .ok_or_else(|| format!("Unknown option '{label}'. {}", self.usage_hint()))?
                    .to_string();
                (
                    Message::from_player(actor, MessageKind::Choice, Visibility::Sealed, canonical.clone()),
                    Effect::Choice(canonical),
                )
            }
            (PhasePayload::SimultaneousChoice(_), other) => {
                return Err(format!(
                    "{} is not available during a choice phase. {}",
                    other.kind(),
                    self.usage_hint()
                ));
            }
            (PhasePayload::GameOver, _) => return Err("The game is over".to_string()),
        };

        Ok(Accepted {
            message: message.with_preamble(remark),
            effect,
        })
    }

    /// What the player may do in the current phase.
    fn usage_hint(&self) -> String {
        match &self.state.payload {
            PhasePayload::Communication(talk) => {
                let kinds: Vec<_> = self
                    .commands
                    .kinds()
                    .filter(|k| match k {
                        CommandKind::Choose => false,
                        CommandKind::Whisper => talk.whispers,
                        _ => true,
                    })
                    .map(ToString::to_string)
                    .collect();
                if kinds.is_empty() {
                    "Use free text".to_string()
                } else {
                    format!("Use {} or free text", kinds.join(", "))
                }
            }
            PhasePayload::SimultaneousChoice(choice) => {
                format!("Use [Choose <option>] with one of: {}", choice.options.join(", "))
            }
            PhasePayload::GameOver => "The game is over".to_string(),
        }
    }

    fn current_phase(&self) -> Option<&crate::core::PhaseSpec> {
        self.config.plan.phase(self.state.round, self.state.phase_index)
    }

    fn commit(&mut self, actor: PlayerId, accepted: Accepted) -> Result<Step, EngineError> {
        let Accepted { message, effect } = accepted;
        let deliveries = route(&message, self.state.player_count()).len();
        tracing::debug!(
            %actor,
            round = self.state.round,
            kind = ?message.kind,
            deliveries,
            "action accepted"
        );
        self.state.push_message(message);

        match effect {
            Effect::Exchange { withdraw, signal } => {
                let PhasePayload::Communication(talk) = &mut self.state.payload else {
                    return Err(EngineError::invariant("exchange outside a communication phase"));
                };
                if withdraw {
                    talk.withdraw(actor);
                }
                talk.record_exchange(actor);
                match signal {
                    Signal::Continue => {}
                    Signal::EndPhase => talk.closed = true,
                    Signal::FinishGame => {
                        talk.closed = true;
                        self.state.finish_requested = true;
                    }
                }
            }
            Effect::Choice(label) => {
                let PhasePayload::SimultaneousChoice(choice) = &mut self.state.payload else {
                    return Err(EngineError::invariant("choice outside a choice phase"));
                };
                if !choice.record(actor, label) {
                    return Err(EngineError::invariant(format!("{actor} chose twice")));
                }
            }
            Effect::Remark => {}
        }

        self.settle()?;
        Ok(self.step(Verdict::Accepted))
    }

    fn reject(&mut self, actor: PlayerId, reason: String) -> Result<Step, EngineError> {
        let verdict = self.state.ledger.record_invalid(actor, self.state.round, reason.clone());
        self.settle()?;
        Ok(self.step(Verdict::Invalid {
            reason,
            strikes: verdict.strikes,
            remaining: verdict.remaining,
            eliminated: verdict.eliminated,
        }))
    }

    fn step(&self, verdict: Verdict) -> Step {
        Step {
            done: self.state.is_game_over(),
            actor: self.state.actor(),
            verdict,
        }
    }

    // === Phase machine ===

    /// Recompute the actor, transitioning through completed phases.
    fn settle(&mut self) -> Result<(), EngineError> {
        loop {
            match next_actor(&self.state.payload, &self.state.ledger) {
                NextActor::Player(player) => {
                    self.state.actor = Some(player);
                    return Ok(());
                }
                NextActor::PhaseComplete if self.state.is_game_over() => {
                    self.state.actor = None;
                    return Ok(());
                }
                NextActor::PhaseComplete => self.transition()?,
            }
        }
    }

    /// Leave the current phase and announce where play went.
    fn transition(&mut self) -> Result<(), EngineError> {
        phases::bank_choices(&mut self.state);

        let advance = phases::advance(
            &self.config.plan,
            self.state.round,
            self.state.phase_index,
            self.state.finish_requested,
        );

        let transition = match advance {
            Advance::NextPhase(index) => {
                let round = self.state.round;
                let spec = phases::enter_phase(&mut self.state, &self.config.plan, round, index)?;
                Transition::NextPhase {
                    round,
                    phase: spec.name.clone(),
                }
            }
            Advance::NextRound(round) => {
                let record = self.close_round()?;
                let spec = phases::enter_phase(&mut self.state, &self.config.plan, round, 0)?;
                Transition::NextRound {
                    record,
                    round,
                    phase: spec.name.clone(),
                }
            }
            Advance::GameOver => {
                let record = self.close_round()?;
                phases::enter_game_over(&mut self.state);
                self.evaluate()?;
                Transition::GameOver { record }
            }
        };

        let view = GameView::new(&self.config, &self.state);
        let text = self.rules.announce(&transition, &view);
        self.state.push_message(Message::announcement(text));
        Ok(())
    }

    /// Run the scoring hook and record the round.
    fn close_round(&mut self) -> Result<RoundRecord, EngineError> {
        let round = self.state.round;
        let multiplier = self.config.plan.round(round).map_or(1, |r| r.multiplier);
        let choices = self.state.round_choices.clone();

        let view = GameView::new(&self.config, &self.state);
        let deltas = self.rules.score_round(round, multiplier, &choices, &view);

        phases::record_round(&mut self.state, &self.config.plan, choices, deltas)
    }

    /// Run the outcome evaluator. Must happen exactly once.
    fn evaluate(&mut self) -> Result<(), EngineError> {
        if self.state.outcome.is_some() {
            return Err(EngineError::invariant("outcome evaluator invoked twice"));
        }

        let view = GameView::new(&self.config, &self.state);
        let outcome = self.rules.evaluate(&view);
        if outcome.players.player_count() != self.state.player_count() {
            return Err(EngineError::invariant(format!(
                "outcome covers {} players, game seats {}",
                outcome.players.player_count(),
                self.state.player_count()
            )));
        }

        tracing::info!(summary = %outcome.summary, "outcome evaluated");
        self.state.outcome = Some(outcome);
        Ok(())
    }
}

/// Every phase in the plan must be finishable with the recognized commands:
/// choice phases close on `[Choose]` and uncapped talk closes on `[Pass]`.
fn check_vocabulary(config: &GameConfig, commands: &CommandSet) -> Result<(), ConfigError> {
    for (round, spec) in config.plan.iter() {
        for phase in &spec.phases {
            let needed = match &phase.kind {
                PhaseKind::SimultaneousChoice { .. } => Some(CommandKind::Choose),
                PhaseKind::Communication { max_exchanges: None, .. } => Some(CommandKind::Pass),
                PhaseKind::Communication { .. } => None,
            };
            if let Some(command) = needed.filter(|c| !commands.recognizes(c)) {
                return Err(ConfigError::MissingCommand {
                    round,
                    phase: phase.name.clone(),
                    command: command.to_string(),
                });
            }
        }
    }
    Ok(())
}
