//! Translation of remote diagnostic phrases into user-facing messages.

use serde_json::Value;
use vouch_core::ErrorEntry;

/// Shown for phrases the dictionary does not know.
pub const UNKNOWN_ERROR_MESSAGE: &str =
    "An unknown error occurred while verifying the credential.";

/// Known technical phrases, matched case-insensitively after trimming.
const DICTIONARY: &[(&str, &str)] = &[
    (
        "credential expired",
        "This credential has expired.",
    ),
    (
        "credential revoked",
        "This credential has been revoked by its issuer.",
    ),
    (
        "credential suspended",
        "This credential is currently suspended by its issuer.",
    ),
    (
        "invalid signature",
        "The credential's signature could not be verified.",
    ),
    (
        "signature verification failed",
        "The credential's signature could not be verified.",
    ),
    (
        "issuer not found",
        "The issuer of this credential is not recognised.",
    ),
    (
        "issuer not trusted",
        "The issuer of this credential is not trusted.",
    ),
    (
        "credential not found",
        "This credential could not be found in the issuer's registry.",
    ),
    (
        "schema mismatch",
        "The credential does not match its declared schema.",
    ),
    (
        "invalid credential format",
        "The credential is not in a recognised format.",
    ),
    (
        "holder mismatch",
        "This credential was not issued to the presenting holder.",
    ),
    (
        "digest mismatch",
        "The credential content has been altered since it was issued.",
    ),
];

/// Look up the user-facing text for a phrase.
pub fn user_message(phrase: &str) -> &'static str {
    let needle = phrase.trim();
    DICTIONARY
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(needle))
        .map(|(_, friendly)| *friendly)
        .unwrap_or(UNKNOWN_ERROR_MESSAGE)
}

/// Translate one phrase, preserving the original as `raw`.
pub fn translate(phrase: &str) -> ErrorEntry {
    ErrorEntry::new(user_message(phrase), phrase)
}

/// Collect error phrases from a remote response body.
///
/// Reads `error` and then `errors`. Each may hold a string, an array of
/// strings, or objects carrying a `message` or `error` string. Empty values
/// (`null`, `false`, `0`, `""`, `{}`, `[]`) mean no error; any other scalar
/// is kept as its JSON text.
pub fn remote_error_phrases(body: &Value) -> Vec<String> {
    let mut phrases = Vec::new();
    for field in ["error", "errors"] {
        if let Some(value) = body.get(field) {
            collect_phrases(value, &mut phrases);
        }
    }
    phrases
}

fn collect_phrases(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null | Value::Bool(false) => {}
        Value::Number(n) if n.as_f64() == Some(0.0) => {}
        Value::Object(map) if map.is_empty() => {}
        Value::String(s) => {
            if !s.trim().is_empty() {
                out.push(s.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_phrases(item, out);
            }
        }
        Value::Object(map) => {
            let phrase = ["message", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str));
            match phrase {
                Some(p) => out.push(p.to_string()),
                None => out.push(value.to_string()),
            }
        }
        other => out.push(other.to_string()),
    }
}

/// Translate every error phrase in a remote response body.
pub fn translate_remote_errors(body: &Value) -> Vec<ErrorEntry> {
    remote_error_phrases(body)
        .iter()
        .map(|p| translate(p))
        .collect()
}
