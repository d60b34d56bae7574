//! Transcript messages.
//!
//! Every accepted action and every phase/round transition produces exactly
//! one `Message`. Messages are immutable once created and are kept in the
//! game transcript for history rendering and audit.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Who a message is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    /// A seated player.
    Player(PlayerId),
    /// The referee: system announcements and scoring summaries.
    Referee,
}

impl Sender {
    /// The sending player, if this is not a referee message.
    #[must_use]
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Sender::Player(p) => Some(p),
            Sender::Referee => None,
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::Player(p) => write!(f, "{p}"),
            Sender::Referee => write!(f, "Referee"),
        }
    }
}

/// Recipients entitled to see a message's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Everyone sees the content, attributed to the sender.
    Public,
    /// Only the sender and the target see the content; everyone else is
    /// told that a private exchange happened.
    PrivateTo(PlayerId),
    /// Only the sender sees the content; everyone else is told the sender
    /// acted. Used for simultaneous-choice commits.
    Sealed,
    /// Referee channel, identical for every player.
    AdminChannel,
}

/// What kind of action produced a message. Drives rendering only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Free text with no command.
    Remark,
    /// `[Broadcast]` public message.
    Broadcast,
    /// `[Whisper to N]` private message.
    Whisper,
    /// `[Pass]` withdrawal from the current communication phase.
    Pass,
    /// Simultaneous-choice commit; content is the chosen label.
    Choice,
    /// Game-specific command, content rendered by the game.
    Command(String),
    /// Referee announcement.
    Announcement,
}

/// One unit of communicated text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Attribution.
    pub sender: Sender,

    /// Visibility scope.
    pub visibility: Visibility,

    /// Rendering category.
    pub kind: MessageKind,

    /// Literal content.
    pub content: String,

    /// Free text written before the command marker, delivered publicly.
    pub preamble: Option<String>,

    /// Round the message was sent in.
    pub round: u32,

    /// Sequence number within the current phase.
    pub sequence: u32,
}

impl Message {
    /// A message from a player.
    pub fn from_player(
        player: PlayerId,
        kind: MessageKind,
        visibility: Visibility,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender: Sender::Player(player),
            visibility,
            kind,
            content: content.into(),
            preamble: None,
            round: 0,
            sequence: 0,
        }
    }

    /// A referee announcement on the admin channel.
    pub fn announcement(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Referee,
            visibility: Visibility::AdminChannel,
            kind: MessageKind::Announcement,
            content: content.into(),
            preamble: None,
            round: 0,
            sequence: 0,
        }
    }

    /// Attach public preamble text. Blank text is dropped.
    #[must_use]
    pub fn with_preamble(mut self, preamble: Option<String>) -> Self {
        self.preamble = preamble.filter(|p| !p.trim().is_empty());
        self
    }

    /// Stamp round and phase-local sequence number.
    #[must_use]
    pub fn stamped(mut self, round: u32, sequence: u32) -> Self {
        self.round = round;
        self.sequence = sequence;
        self
    }

    /// Whether a player is entitled to read the literal content.
    #[must_use]
    pub fn is_involved(&self, player: PlayerId) -> bool {
        match self.visibility {
            Visibility::Public | Visibility::AdminChannel => true,
            Visibility::PrivateTo(target) => {
                target == player || self.sender == Sender::Player(player)
            }
            Visibility::Sealed => self.sender == Sender::Player(player),
        }
    }
}
