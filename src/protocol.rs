//! Pipe-delimited line protocol spoken with the game server.
//!
//! Every line is `K|field|field...` where `K` is a one-letter message kind.
//! Inbound lines become [`Event`]s, outbound decisions become [`Command`]s.

mod command;
mod event;

pub use command::Command;
pub use event::{CustomSetting, Event, GameConfig};

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::str::FromStr;

use crate::engine::BotError;

/// Characters trimmed from lines and fields.
const TRIM: &[char] = &[' ', '\t', '\x0b', '\x0c', '\r', '\n'];

/// Split a raw line into trimmed fields. The kind field must be one letter.
pub fn split_fields(line: &str) -> Result<Vec<&str>, BotError> {
    let trimmed = line.trim_matches(TRIM);
    if trimmed.is_empty() {
        return Err(BotError::ProtocolViolation("empty message".into()));
    }
    let fields: Vec<&str> = trimmed.split('|').map(|f| f.trim_matches(TRIM)).collect();
    if fields[0].chars().count() != 1 {
        return Err(BotError::ProtocolViolation(format!(
            "invalid message kind: {:?}",
            trimmed
        )));
    }
    Ok(fields)
}

/// Parse `fields[idx]` as a number no smaller than `min`.
pub(crate) fn number<T>(fields: &[&str], idx: usize, what: &str, min: T) -> Result<T, BotError>
where
    T: FromStr + PartialOrd + Copy,
{
    fields
        .get(idx)
        .and_then(|f| f.parse::<T>().ok())
        .filter(|v| *v >= min)
        .ok_or_else(|| malformed(what, fields))
}

/// Parse `fields[idx]` as a non-empty string.
pub(crate) fn text(fields: &[&str], idx: usize, what: &str) -> Result<String, BotError> {
    match fields.get(idx) {
        Some(f) if !f.is_empty() => Ok(String::from(*f)),
        _ => Err(malformed(what, fields)),
    }
}

pub(crate) fn malformed(what: &str, fields: &[&str]) -> BotError {
    BotError::ProtocolViolation(format!("invalid {}: {:?}", what, fields))
}

/// Require exactly `n` fields (or at least `n` when `at_least`).
pub(crate) fn expect_len(
    fields: &[&str],
    n: usize,
    at_least: bool,
    what: &str,
) -> Result<(), BotError> {
    let ok = if at_least {
        fields.len() >= n
    } else {
        fields.len() == n
    };
    if ok {
        Ok(())
    } else {
        Err(BotError::ProtocolViolation(format!(
            "invalid {} message: {:?}",
            what, fields
        )))
    }
}
