//! Action Parser.
//!
//! Converts a raw action string into at most one recognized bracketed
//! command plus free-text commentary. Each game supplies its vocabulary as a
//! [`CommandSet`] of named patterns; matching is case-insensitive and
//! tolerant of whitespace inside the brackets.
//!
//! - zero markers: the whole text is a remark
//! - one marker: command, parameters and the preamble before the marker
//! - markers of two or more kinds: [`ParseError::MultipleCommands`]

mod command;
mod patterns;

pub use command::{Command, CommandKind, ParseError, ParsedAction, TargetError};
pub use patterns::{CommandPattern, CommandSet};
