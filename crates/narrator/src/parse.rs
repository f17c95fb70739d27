//! Response parsing.
//!
//! Oracle replies are free text. These functions pull out the structured
//! part each call asked for, or report a malformed response.

use serde::Deserialize;

use crate::oracle::OracleError;

/// Largest mood shift accepted from a single reply
pub const MOOD_SHIFT_LIMIT: i64 = 10;

/// Action and optional reasoning read from a decision reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDecision {
    pub action: String,
    pub reasoning: Option<String>,
}

/// Goal update and journal line read from a reflection reply
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedReflection {
    /// `None` when the reply had no usable goal list
    pub goals: Option<Vec<String>>,
    pub reflection: Option<String>,
}

fn malformed(message: impl Into<String>) -> OracleError {
    OracleError::MalformedResponse(message.into())
}

fn find_action<'a>(text: &str, available: &[&'a str]) -> Option<&'a str> {
    available.iter().copied().find(|action| text.contains(action))
}

/// Reads a `REASONING: ... ACTION: ...` reply.
///
/// The text after `ACTION:` is searched first; failing that, the first
/// available action named anywhere in the reply is taken.
pub fn parse_decision(response: &str, available: &[&str]) -> Result<ParsedDecision, OracleError> {
    let reasoning = response.split_once("REASONING:").and_then(|(_, rest)| {
        let text = rest.split("ACTION:").next().unwrap_or_default().trim();
        (!text.is_empty()).then(|| text.to_string())
    });

    let action = response
        .split_once("ACTION:")
        .and_then(|(_, rest)| find_action(rest, available))
        .or_else(|| find_action(response, available))
        .ok_or_else(|| malformed("reply names no available action"))?;

    Ok(ParsedDecision {
        action: action.to_string(),
        reasoning,
    })
}

/// Reads the first integer in a reply, bounded to `±MOOD_SHIFT_LIMIT`
pub fn parse_mood_shift(response: &str) -> Result<i64, OracleError> {
    let bytes = response.as_bytes();
    let start = bytes
        .iter()
        .position(u8::is_ascii_digit)
        .ok_or_else(|| malformed("reply contains no integer"))?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |len| start + len);
    let negative = start > 0 && bytes[start - 1] == b'-';

    let magnitude: i64 = response[start..end]
        .parse()
        .map_err(|_| malformed("integer out of range"))?;
    let shift = if negative { -magnitude } else { magnitude };
    Ok(shift.clamp(-MOOD_SHIFT_LIMIT, MOOD_SHIFT_LIMIT))
}

#[derive(Deserialize)]
struct RawReflection {
    #[serde(default)]
    goals: Option<serde_json::Value>,
    #[serde(default)]
    reflection: Option<serde_json::Value>,
}

/// Reads the JSON object between the first `{` and the last `}` of a reply.
///
/// A goal list that is not an array of strings is dropped, leaving the
/// reflection text usable.
pub fn parse_reflection(response: &str) -> Result<ParsedReflection, OracleError> {
    let start = response
        .find('{')
        .ok_or_else(|| malformed("reply contains no JSON object"))?;
    let end = response
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| malformed("reply contains no JSON object"))?;

    let raw: RawReflection = serde_json::from_str(&response[start..=end])
        .map_err(|e| malformed(format!("invalid reflection JSON: {}", e)))?;

    let goals = raw.goals.and_then(|value| match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(goal) => Some(goal),
                _ => None,
            })
            .collect::<Option<Vec<_>>>(),
        _ => None,
    });

    let reflection = raw.reflection.map(|value| match value {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    });

    Ok(ParsedReflection { goals, reflection })
}
