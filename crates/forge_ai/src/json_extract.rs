//! Decoding JSON objects out of free-form model replies.
//!
//! Models asked to "return ONLY valid JSON" still wrap it in markdown fences
//! or chatter around it. These helpers strip fences, cut the outermost
//! `{ ... }` span, and deserialize it, with an optional caller-supplied
//! fallback when anything goes wrong.

use serde::de::DeserializeOwned;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("No JSON object found in response")]
    NoJson,

    #[error("Malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unexpected shape: {0}")]
    Shape(String),
}

/// Return the slice spanning the first `{` to the last `}` of `text`, after
/// dropping markdown code fences.
pub fn extract_json_object(text: &str) -> Result<&str, ExtractError> {
    let trimmed = strip_fences(text.trim());
    let start = trimmed.find('{').ok_or(ExtractError::NoJson)?;
    let end = trimmed.rfind('}').ok_or(ExtractError::NoJson)?;
    if end < start {
        return Err(ExtractError::NoJson);
    }
    Ok(&trimmed[start..=end])
}

fn strip_fences(text: &str) -> &str {
    let mut s = text;
    if let Some(rest) = s.strip_prefix("```") {
        // Skip the info string (`json`, `JSON`, ...) up to the first newline.
        s = rest.split_once('\n').map_or(rest, |(_, body)| body);
    }
    s.trim_end().strip_suffix("```").unwrap_or(s).trim()
}

/// Extract and deserialize a JSON object from model text.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let json = extract_json_object(text)?;
    Ok(serde_json::from_str(json)?)
}

/// Like [`decode`] but runs `validate` on the parsed value; a validation
/// failure is reported as [`ExtractError::Shape`].
pub fn decode_with<T, F>(text: &str, validate: F) -> Result<T, ExtractError>
where
    T: DeserializeOwned,
    F: FnOnce(&T) -> Result<(), String>,
{
    let value: T = decode(text)?;
    validate(&value).map_err(ExtractError::Shape)?;
    Ok(value)
}

/// Decode `text`, falling back to `fallback()` on any failure.
///
/// `what` names the payload in the warning that is logged on fallback.
pub fn decode_or<T, F>(text: &str, what: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match decode(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(payload = what, error = %e, raw_len = text.len(), "Falling back to default");
            fallback()
        }
    }
}
