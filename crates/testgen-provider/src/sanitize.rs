//! Output cleanup and secret redaction

use once_cell::sync::Lazy;
use regex::Regex;

const FENCE: &str = "```";
const REDACTED: &str = "[REDACTED]";

static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[a-zA-Z0-9_-]*\s*").expect("opening fence pattern"));
static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```$").expect("closing fence pattern"));

/// Remove one wrapping markdown code fence
///
/// Only applies when the trimmed text opens with a fence. A stray fence
/// elsewhere is left for the validator to reject.
#[must_use]
pub fn strip_markdown_fences(text: &str) -> String {
    let cleaned = text.trim();
    if !cleaned.starts_with(FENCE) {
        return cleaned.to_string();
    }
    let without_open = OPENING_FENCE.replace(cleaned, "");
    let without_close = CLOSING_FENCE.replace(&without_open, "");
    without_close.trim().to_string()
}

/// Replace every occurrence of each non-empty secret
#[must_use]
pub fn redact(message: &str, secrets: &[&str]) -> String {
    secrets
        .iter()
        .filter(|secret| !secret.is_empty())
        .fold(message.to_string(), |acc, secret| acc.replace(secret, REDACTED))
}

/// Cap an error body at `max_chars` characters
#[must_use]
pub fn truncate(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
