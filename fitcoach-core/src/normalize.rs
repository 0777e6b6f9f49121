//! Response normalization: fence stripping and syntactic parsing.
//!
//! Models asked for bare JSON still frequently wrap it in markdown code
//! fences. Normalization removes that wrapping before parsing, and keeps
//! "the model answered with prose" distinguishable from provider-level
//! failures.

use crate::error::PlanError;

/// Strip leading/trailing markdown code-fence markers and whitespace.
///
/// Handles both the generic ``` fence and the ```json flavored fence. Text
/// without fences passes through untouched (minus outer whitespace), so a
/// fenced and an unfenced copy of the same JSON normalize identically.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string ("json", "JSON", ...) before the payload.
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text
}

/// Parse normalized text as JSON.
///
/// Fails with `MalformedResponse` when the text is not syntactically valid
/// JSON; this is the model misbehaving, not the network.
pub fn parse(text: &str) -> Result<serde_json::Value, PlanError> {
    serde_json::from_str(text).map_err(|e| PlanError::malformed_response(e.to_string()))
}
