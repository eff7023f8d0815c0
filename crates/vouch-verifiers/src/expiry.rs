//! Local expiry pre-check on a credential field.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use vouch_core::{Credential, ErrorEntry};

/// Default name of the expiry field.
pub const DEFAULT_EXPIRY_FIELD: &str = "validUntil";

pub const EXPIRED_MESSAGE: &str = "This credential has expired.";
pub const INVALID_DATE_MESSAGE: &str = "The credential's expiry date has an invalid format.";

/// Reasons the expiry pre-check rejects a credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpiryError {
    #[error("credential expired: {field} {expired_at} is in the past")]
    Expired {
        field: String,
        expired_at: DateTime<Utc>,
    },

    #[error("invalid date format in {field}: {value}")]
    InvalidFormat { field: String, value: String },
}

impl ExpiryError {
    /// User-facing message.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Expired { .. } => EXPIRED_MESSAGE,
            Self::InvalidFormat { .. } => INVALID_DATE_MESSAGE,
        }
    }

    pub fn to_error_entry(&self) -> ErrorEntry {
        ErrorEntry::new(self.user_message(), self.to_string())
    }
}

/// Check `field` against `now`. An absent (or null) field passes.
pub fn check_expiry(
    credential: &Credential,
    field: &str,
    now: DateTime<Utc>,
) -> Result<(), ExpiryError> {
    let value = match credential.get(field) {
        None | Some(Value::Null) => return Ok(()),
        Some(v) => v,
    };

    let expires_at = parse_timestamp(value).ok_or_else(|| ExpiryError::InvalidFormat {
        field: field.to_string(),
        value: match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    })?;

    if expires_at < now {
        return Err(ExpiryError::Expired {
            field: field.to_string(),
            expired_at: expires_at,
        });
    }
    Ok(())
}

/// Accepts RFC 3339 datetimes, naive ISO-8601 datetimes (taken as UTC),
/// plain `YYYY-MM-DD` dates (midnight UTC), and epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
