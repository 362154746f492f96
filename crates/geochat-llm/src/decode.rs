//! Strict decoding of model replies
//!
//! Models are asked for bare JSON or a single literal, but replies often
//! arrive wrapped in prose or code fences. Decoding either produces the
//! expected value or a [`DecodeError`]; callers decide the fallback.

use geochat_core::GeochatError;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("reply contains no JSON object")]
    NoJsonObject,

    #[error("reply JSON is invalid: {0}")]
    InvalidJson(String),

    #[error("reply JSON lacks field `{0}`")]
    MissingField(String),

    #[error("expected `true` or `false`, got `{0}`")]
    UnexpectedLiteral(String),
}

impl DecodeError {
    /// Attach the raw reply for reporting
    pub fn into_error(self, raw: &str) -> GeochatError {
        GeochatError::MalformedResponse { reason: self.to_string(), raw: raw.to_string() }
    }
}

/// Slice the first balanced top-level `{...}` out of `raw`.
///
/// Braces inside JSON strings do not count toward nesting. Text after the
/// object, including further objects, is ignored.
pub fn extract_json_object(raw: &str) -> Result<&str, DecodeError> {
    let start = raw.find('{').ok_or(DecodeError::NoJsonObject)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in raw[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&raw[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    Err(DecodeError::NoJsonObject)
}

/// Decode the JSON object embedded in `raw` into `T`
pub fn decode_json<T: DeserializeOwned>(raw: &str) -> Result<T, DecodeError> {
    let object = extract_json_object(raw)?;
    serde_json::from_str(object).map_err(|e| DecodeError::InvalidJson(e.to_string()))
}

/// Decode a `true`/`false` literal, ignoring surrounding whitespace and case
pub fn decode_bool(raw: &str) -> Result<bool, DecodeError> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(DecodeError::UnexpectedLiteral(raw.trim().to_string())),
    }
}
