//! # Parsing Utils
//!
//! Splits incoming text into a command name and argument tokens, and validates the
//! targets accepted by `/report`.

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::error::BotError;
use crate::domain::types::TargetType;
use crate::strings::messages;

/// A prefixed command as typed by a user, e.g. `/play never gonna`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl ParsedCommand {
    /// Arguments from `index` on, joined back with single spaces.
    pub fn rest(&self, index: usize) -> String {
        self.args.get(index..).map(|a| a.join(" ")).unwrap_or_default()
    }
}

/// Parses `message` when it starts with `prefix`. Returns `None` for ordinary chat text.
/// A `@botname` suffix on the command is dropped when it names `bot_name`.
pub fn parse_command(message: &str, prefix: &str, bot_name: Option<&str>) -> Option<ParsedCommand> {
    let body = message.trim().strip_prefix(prefix)?;
    let mut tokens = body.split_whitespace();
    let head = tokens.next()?;

    let name = match head.split_once('@') {
        Some((name, target)) => match bot_name {
            Some(bot) if !target.eq_ignore_ascii_case(bot) => return None,
            _ => name,
        },
        None => head,
    };
    if name.is_empty() {
        return None;
    }

    Some(ParsedCommand {
        name: name.to_lowercase(),
        args: tokens.map(str::to_string).collect(),
    })
}

fn message_target_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(-?\d+):(\d+)$").expect("static regex"))
}

fn matrix_user_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@[^:\s]+:\S+$").expect("static regex"))
}

/// Validates and normalizes a report target id for the given type.
pub fn normalize_target(target_type: TargetType, raw: &str) -> Result<String, BotError> {
    let raw = raw.trim();
    match target_type {
        TargetType::User => {
            if raw.parse::<i64>().is_ok() || matrix_user_regex().is_match(raw) {
                Ok(raw.to_string())
            } else {
                Err(BotError::input(messages::INVALID_USER_TARGET))
            }
        }
        TargetType::Message => {
            let caps = message_target_regex()
                .captures(raw)
                .ok_or_else(|| BotError::input(messages::INVALID_MESSAGE_TARGET))?;
            let chat_id: i64 = caps[1]
                .parse()
                .map_err(|_| BotError::input(messages::CHAT_ID_OUT_OF_RANGE))?;
            let message_id: u64 = caps[2]
                .parse()
                .map_err(|_| BotError::input(messages::MESSAGE_ID_OUT_OF_RANGE))?;
            Ok(format!("{chat_id}:{message_id}"))
        }
        TargetType::Channel => {
            if raw.is_empty() {
                return Err(BotError::input(messages::MISSING_CHANNEL_ID));
            }
            let digits = raw.trim_start_matches('-');
            let numeric = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());
            if numeric && !raw.starts_with("-100") {
                Ok(format!("-100{digits}"))
            } else {
                Ok(raw.to_string())
            }
        }
    }
}
