//! Decode the model's reply.
//!
//! The reply is parsed as-is. No fence stripping, no repair, no schema
//! check: whatever JSON the model produced is relayed to the caller, and
//! anything else becomes [`RelayError::InvalidReply`].

use crate::error::RelayError;
use serde_json::Value;

/// Parse the reply text as JSON.
pub fn decode_reply(reply: &str) -> Result<Value, RelayError> {
    Ok(serde_json::from_str(reply)?)
}

/// Number of records in a decoded reply, if it is an array.
pub fn transaction_count(value: &Value) -> Option<usize> {
    value.as_array().map(Vec::len)
}

/// The first `max_chars` characters of `text`, for log lines.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
