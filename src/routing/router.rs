//! Deterministic message rendering per recipient.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Message, MessageKind, PlayerId, Sender, Visibility};

/// Notice given to players outside a private exchange.
pub const PRIVATE_NOTICE: &str = "A private message was sent between two players";

/// One rendered line for one recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub recipient: PlayerId,
    pub text: String,
}

/// Deliveries for a whole table. Inline capacity covers a four-seat game
/// without heap allocation.
pub type Deliveries = SmallVec<[Delivery; 8]>;

/// Compute every (recipient, text) pair for a message.
///
/// Recipients are visited in seat order; a recipient may receive two lines
/// when the message carries a public preamble.
#[must_use]
pub fn route(message: &Message, player_count: usize) -> Deliveries {
    PlayerId::all(player_count)
        .flat_map(|recipient| {
            render_for(message, recipient)
                .into_iter()
                .map(move |text| Delivery { recipient, text })
        })
        .collect()
}

/// The lines a single player sees for a message.
#[must_use]
pub fn render_for(message: &Message, recipient: PlayerId) -> SmallVec<[String; 2]> {
    let mut lines = SmallVec::new();
    let sender = message.sender;

    if let Some(preamble) = &message.preamble {
        lines.push(format!("{sender}: {preamble}"));
    }

    let content = &message.content;
    let line = match message.visibility {
        Visibility::AdminChannel => format!("[Referee] {content}"),
        Visibility::Public => match (&message.kind, sender) {
            (_, Sender::Referee) | (MessageKind::Announcement, _) => format!("[Referee] {content}"),
            (MessageKind::Remark, _) => format!("{sender}: {content}"),
            (MessageKind::Broadcast, _) => format!("{sender} (Broadcast): {content}"),
            (MessageKind::Whisper, _) => format!("{sender} (Private): {content}"),
            (MessageKind::Pass, _) => format!("{sender} passed"),
            (MessageKind::Choice, _) => format!("{sender} chose {content}"),
            (MessageKind::Command(_), _) => format!("{sender} {content}"),
        },
        Visibility::PrivateTo(target) => {
            if sender == Sender::Player(recipient) {
                format!("You sent private message to {target}: {content}")
            } else if target == recipient {
                format!("{sender} (Private): {content}")
            } else {
                PRIVATE_NOTICE.to_string()
            }
        }
        Visibility::Sealed => {
            if sender == Sender::Player(recipient) {
                match message.kind {
                    MessageKind::Choice => format!("You chose {content}"),
                    _ => format!("You (sealed): {content}"),
                }
            } else {
                format!("{sender} made their choice")
            }
        }
    };
    lines.push(line);

    lines
}
