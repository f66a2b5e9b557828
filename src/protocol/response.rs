//! Pure parsers for controller replies.
//!
//! The reply grammar is ad hoc: human-readable labels mixed with values,
//! no consistent field separator. Parsers therefore match on shape only
//! (first number, parenthesized pair, boolean word) and never on the
//! label text, so a wording change on the controller side does not break
//! the client.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::axis::{AxisStatus, LimitSwitches, MotionState};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no number found in reply `{0}`")]
    MissingNumber(String),
    #[error("no integer found in reply `{0}`")]
    MissingInteger(String),
    #[error("no boolean found in reply `{0}`")]
    MissingBoolean(String),
    #[error("no `(STATE, LIMIT)` pair found in reply `{0}`")]
    MissingStatePair(String),
    #[error("value `{value}` out of range in reply `{reply}`")]
    OutOfRange { value: String, reply: String },
}

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?").expect("valid regex"));
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").expect("valid regex"));
static STATE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*(\w+)\s*,\s*(\w+)\s*\)").expect("valid regex"));
static BOOLEAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(true|false)\b").expect("valid regex"));

/// Extracts the first signed decimal number anywhere in the reply.
pub fn parse_position(text: &str) -> Result<f64, ParseError> {
    let m = NUMBER
        .find(text)
        .ok_or_else(|| ParseError::MissingNumber(text.to_string()))?;
    m.as_str()
        .parse()
        .map_err(|_| ParseError::MissingNumber(text.to_string()))
}

/// Extracts the first integer anywhere in the reply.
pub fn parse_integer(text: &str) -> Result<i64, ParseError> {
    let m = INTEGER
        .find(text)
        .ok_or_else(|| ParseError::MissingInteger(text.to_string()))?;
    m.as_str().parse().map_err(|_| ParseError::OutOfRange {
        value: m.as_str().to_string(),
        reply: text.to_string(),
    })
}

/// Extracts the first literal `true`/`false`, case-insensitively.
pub fn parse_boolean(text: &str) -> Result<bool, ParseError> {
    let caps = BOOLEAN
        .captures(text)
        .ok_or_else(|| ParseError::MissingBoolean(text.to_string()))?;
    Ok(caps[1].eq_ignore_ascii_case("true"))
}

/// Like `parse_position`, but a reply containing no number at all means
/// the value is unset (e.g. no time limit configured) rather than an error.
pub fn parse_optional_float(text: &str) -> Result<Option<f64>, ParseError> {
    match NUMBER.find(text) {
        None => Ok(None),
        Some(m) => m
            .as_str()
            .parse()
            .map(Some)
            .map_err(|_| ParseError::MissingNumber(text.to_string())),
    }
}

/// Matches the `(<STATE>, <LIMIT>)` pair. Unrecognized words degrade to
/// `MotionState::Unknown` / `LimitSwitches::None` with the raw pair kept
/// in `AxisStatus::message`; a missing pair is a hard parse failure.
pub fn parse_state(text: &str) -> Result<AxisStatus, ParseError> {
    let caps = STATE_PAIR
        .captures(text)
        .ok_or_else(|| ParseError::MissingStatePair(text.to_string()))?;

    let state_word = &caps[1];
    let limit_word = &caps[2];

    let state = match state_word {
        "On" => Some(MotionState::On),
        "Moving" => Some(MotionState::Moving),
        "Fault" => Some(MotionState::Fault),
        _ => None,
    };
    let limit = match limit_word {
        "None" => Some(LimitSwitches::None),
        "Upper" => Some(LimitSwitches::Upper),
        "Lower" => Some(LimitSwitches::Lower),
        "Both" => Some(LimitSwitches::Both),
        _ => None,
    };

    let status = AxisStatus::new(
        state.unwrap_or(MotionState::Unknown),
        limit.unwrap_or(LimitSwitches::None),
    );
    if state.is_none() || limit.is_none() {
        Ok(status.with_message(caps[0].to_string()))
    } else {
        Ok(status)
    }
}
