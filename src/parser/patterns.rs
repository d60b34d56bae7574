//! Command pattern sets and the stateless action parser.

use regex::{Captures, Regex, RegexBuilder};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{ConfigError, PlayerId};

use super::command::{Command, CommandKind, ParseError, ParsedAction, TargetError};

const BROADCAST: &str = r"\[\s*broadcast\s*\](?P<body>.*)";
const WHISPER: &str = r"\[\s*whisper\s+to\s*(?P<target>[^\]]*?)\s*\](?P<body>.*)";
const PASS: &str = r"\[\s*pass\s*\]";
const CHOOSE: &str = r"\[\s*choose\s+(?P<label>[^\]]*?)\s*\]";

/// One named pattern.
///
/// Patterns may use the named groups `body`, `target` and `label`.
/// They are compiled case-insensitive with `.` matching newlines.
#[derive(Clone, Debug)]
pub struct CommandPattern {
    pub kind: CommandKind,
    regex: Regex,
}

impl CommandPattern {
    fn compile(kind: CommandKind, pattern: &str) -> Result<Self, ConfigError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| ConfigError::Pattern {
                command: kind.to_string(),
                source,
            })?;
        Ok(Self { kind, regex })
    }
}

/// The per-game command vocabulary.
///
/// `parse` has no side effects and sees nothing of the game beyond the seat
/// count fixed at construction.
///
/// ```
/// use rust_parley::core::PlayerId;
/// use rust_parley::parser::{Command, CommandSet};
///
/// let commands = CommandSet::standard(4).unwrap();
/// let parsed = commands.parse(PlayerId::new(0), "Hello all. [Whisper to 2] meet me").unwrap();
///
/// assert_eq!(parsed.remark.as_deref(), Some("Hello all."));
/// assert_eq!(
///     parsed.command,
///     Some(Command::Whisper { target: PlayerId::new(2), body: "meet me".into() })
/// );
/// ```
#[derive(Clone, Debug)]
pub struct CommandSet {
    player_count: usize,
    patterns: Vec<CommandPattern>,
    by_key: FxHashMap<String, usize>,
}

impl CommandSet {
    /// An empty vocabulary: every action is free text.
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            patterns: Vec::new(),
            by_key: FxHashMap::default(),
        }
    }

    /// Broadcast, whisper, pass and choose.
    pub fn standard(player_count: usize) -> Result<Self, ConfigError> {
        Self::new(player_count)
            .with_pattern(CommandKind::Broadcast, BROADCAST)?
            .with_pattern(CommandKind::Whisper, WHISPER)?
            .with_pattern(CommandKind::Pass, PASS)?
            .with_pattern(CommandKind::Choose, CHOOSE)
    }

    /// Register (or replace) the pattern for a kind.
    pub fn with_pattern(mut self, kind: CommandKind, pattern: &str) -> Result<Self, ConfigError> {
        let compiled = CommandPattern::compile(kind, pattern)?;
        let key = compiled.kind.key();
        match self.by_key.get(&key) {
            Some(&i) => self.patterns[i] = compiled,
            None => {
                self.by_key.insert(key, self.patterns.len());
                self.patterns.push(compiled);
            }
        }
        Ok(self)
    }

    /// Register a game-specific command. The body is whatever the `body`
    /// group captures, or empty when the pattern has no such group.
    pub fn with_custom(self, name: &str, pattern: &str) -> Result<Self, ConfigError> {
        self.with_pattern(CommandKind::Custom(name.to_string()), pattern)
    }

    /// Whether a kind is part of this vocabulary.
    #[must_use]
    pub fn recognizes(&self, kind: &CommandKind) -> bool {
        self.by_key.contains_key(&kind.key())
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &CommandKind> {
        self.patterns.iter().map(|p| &p.kind)
    }

    /// Seat count used to validate whisper targets.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Parse a raw action sent by `sender`.
    pub fn parse(&self, sender: PlayerId, raw: &str) -> Result<ParsedAction, ParseError> {
        let found: SmallVec<[(&CommandPattern, Captures<'_>); 2]> = self
            .patterns
            .iter()
            .filter_map(|p| p.regex.captures(raw).map(|caps| (p, caps)))
            .collect();

        match found.len() {
            0 => Ok(ParsedAction::remark(raw)),
            1 => {
                let (pattern, caps) = &found[0];
                self.build(sender, raw, pattern, caps)
            }
            _ => {
                let mut ordered: SmallVec<[(usize, String); 2]> = found
                    .iter()
                    .filter_map(|(p, caps)| caps.get(0).map(|m| (m.start(), p.kind.to_string())))
                    .collect();
                ordered.sort();
                Err(ParseError::MultipleCommands {
                    kinds: ordered.into_iter().map(|(_, k)| k).collect(),
                })
            }
        }
    }

    fn build(
        &self,
        sender: PlayerId,
        raw: &str,
        pattern: &CommandPattern,
        caps: &Captures<'_>,
    ) -> Result<ParsedAction, ParseError> {
        let start = caps.get(0).map_or(0, |m| m.start());
        let preamble = raw[..start].trim();
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str().trim());

        let command = match &pattern.kind {
            CommandKind::Broadcast => Command::Broadcast {
                body: non_empty(group("body"), &pattern.kind)?,
            },
            CommandKind::Whisper => {
                let target = self.parse_target(sender, group("target"))?;
                Command::Whisper {
                    target,
                    body: non_empty(group("body"), &pattern.kind)?,
                }
            }
            CommandKind::Pass => Command::Pass,
            CommandKind::Choose => Command::Choose {
                label: non_empty(group("label"), &pattern.kind)?,
            },
            CommandKind::Custom(name) => Command::Custom {
                name: name.clone(),
                body: group("body").to_string(),
            },
        };

        Ok(ParsedAction {
            remark: (!preamble.is_empty()).then(|| preamble.to_string()),
            command: Some(command),
        })
    }

    fn parse_target(&self, sender: PlayerId, raw: &str) -> Result<PlayerId, TargetError> {
        let lowered = raw.to_ascii_lowercase();
        let digits = lowered.strip_prefix("player").unwrap_or(&lowered).trim();

        let index: usize = digits
            .parse()
            .map_err(|_| TargetError::NotANumber(raw.to_string()))?;
        let target = PlayerId::from_index(index, self.player_count).ok_or(TargetError::OutOfRange {
            index,
            max: self.player_count.saturating_sub(1),
        })?;

        if target == sender {
            return Err(TargetError::SelfTarget);
        }
        Ok(target)
    }
}

fn non_empty(text: &str, kind: &CommandKind) -> Result<String, ParseError> {
    if text.is_empty() {
        Err(ParseError::EmptyBody {
            command: kind.to_string(),
        })
    } else {
        Ok(text.to_string())
    }
}
