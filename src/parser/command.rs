//! Parsed command types and parse errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::PlayerId;

/// Recognized bracketed command kinds.
///
/// The four built-in kinds are orchestrated by the engine itself; games
/// add their own vocabulary through `Custom`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// `[Broadcast] message`
    Broadcast,
    /// `[Whisper to N] message`
    Whisper,
    /// `[Pass]`
    Pass,
    /// `[Choose label]`
    Choose,
    /// Game-defined command, identified by name.
    Custom(String),
}

impl CommandKind {
    /// Stable lookup key.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            CommandKind::Broadcast => "broadcast".to_string(),
            CommandKind::Whisper => "whisper".to_string(),
            CommandKind::Pass => "pass".to_string(),
            CommandKind::Choose => "choose".to_string(),
            CommandKind::Custom(name) => format!("custom:{}", name.to_ascii_lowercase()),
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::Broadcast => write!(f, "[Broadcast]"),
            CommandKind::Whisper => write!(f, "[Whisper to N]"),
            CommandKind::Pass => write!(f, "[Pass]"),
            CommandKind::Choose => write!(f, "[Choose <label>]"),
            CommandKind::Custom(name) => write!(f, "[{name}]"),
        }
    }
}

/// A recognized command with its parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Broadcast { body: String },
    Whisper { target: PlayerId, body: String },
    Pass,
    Choose { label: String },
    Custom { name: String, body: String },
}

impl Command {
    /// The kind of this command.
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Broadcast { .. } => CommandKind::Broadcast,
            Command::Whisper { .. } => CommandKind::Whisper,
            Command::Pass => CommandKind::Pass,
            Command::Choose { .. } => CommandKind::Choose,
            Command::Custom { name, .. } => CommandKind::Custom(name.clone()),
        }
    }
}

/// Output of the parser.
///
/// With no command, `remark` holds the whole (trimmed) text. With a
/// command, `remark` holds the preamble written before the marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAction {
    /// Free-text commentary.
    pub remark: Option<String>,

    /// The single recognized command, if any.
    pub command: Option<Command>,
}

impl ParsedAction {
    /// Free text with no command.
    #[must_use]
    pub fn remark(text: &str) -> Self {
        Self {
            remark: Some(text.trim().to_string()),
            command: None,
        }
    }

    /// Whether this action carries no command.
    #[must_use]
    pub fn is_remark(&self) -> bool {
        self.command.is_none()
    }
}

/// Why a whisper target was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("Invalid target player: '{0}' is not a player number")]
    NotANumber(String),

    #[error("Target player {index} does not exist; choose a player from 0 to {max}")]
    OutOfRange { index: usize, max: usize },

    #[error("Cannot whisper to yourself")]
    SelfTarget,
}

/// A malformed action. Always recoverable: charged as one strike.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Multiple actions detected ({}). Use only one action per turn", kinds.join(", "))]
    MultipleCommands { kinds: Vec<String> },

    #[error("{command} message cannot be empty")]
    EmptyBody { command: String },

    #[error(transparent)]
    InvalidTarget(#[from] TargetError),
}
