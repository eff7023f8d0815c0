//! Key/value settings consumed by verifier variants at construction time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

use crate::error::CoreError;

/// Environment-style settings (e.g. `DHIWAY_API_TOKEN=...`).
///
/// Empty values are treated as absent. `Debug` redacts anything that looks
/// like a secret.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Create an empty settings set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the process environment. Variables that are not valid
    /// UTF-8 are skipped.
    pub fn from_env() -> Self {
        let settings = Self::from_os_vars(std::env::vars_os());
        tracing::debug!(count = settings.len(), "loaded settings from environment");
        settings
    }

    fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    tracing::warn!(
                        key = %key.unwrap_or_else(|k| k.to_string_lossy().into_owned()),
                        "skipping environment variable that is not valid UTF-8"
                    );
                    None
                }
            })
            .collect()
    }

    /// Layer `overrides` on top of `self`; keys present in both take the
    /// override's value.
    pub fn merged(mut self, overrides: Settings) -> Self {
        self.values.extend(overrides.values);
        self
    }

    /// Set a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a value; empty strings count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Get a value or fall back to `default`.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Get a value that must be present.
    pub fn require(&self, key: &str) -> Result<&str, CoreError> {
        self.get(key)
            .ok_or_else(|| CoreError::MissingSetting(key.to_string()))
    }

    /// Get a required secret, wrapped so it is wiped on drop.
    pub fn require_secret(&self, key: &str) -> Result<Zeroizing<String>, CoreError> {
        self.require(key).map(|v| Zeroizing::new(v.to_string()))
    }

    /// Parse a value, using `default` when it is unset.
    pub fn parse_or<T>(&self, key: &str, default: T) -> Result<T, CoreError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| CoreError::InvalidSetting {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn is_secret_key(key: &str) -> bool {
    let upper = key.to_ascii_uppercase();
    ["TOKEN", "SECRET", "PASSWORD", "KEY"]
        .iter()
        .any(|marker| upper.contains(marker))
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            if is_secret_key(key) {
                map.entry(key, &"[REDACTED]");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}
