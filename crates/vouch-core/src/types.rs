use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A credential document. Its schema is opaque to the dispatcher.
pub type Credential = serde_json::Map<String, serde_json::Value>;

/// The two families of verifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifierKind {
    /// Verifies by calling out to an issuer-operated service.
    Online,
    /// Verifies locally, without network access.
    Offline,
}

impl VerifierKind {
    /// All kinds, in catalog order.
    pub const ALL: [VerifierKind; 2] = [VerifierKind::Online, VerifierKind::Offline];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for VerifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerifierKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

/// Catalog entry describing one registered verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerDescriptor {
    /// Lowercase identifier derived from the registration name.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Title reported by the verifier (or its fallback).
    pub title: String,
    /// Verifier family.
    #[serde(rename = "type")]
    pub kind: VerifierKind,
    pub description: String,
}

/// Names the verification method and, for online verification, the issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationConfig {
    /// `"online"` or `"offline"`. Kept as a raw string so unknown methods can
    /// be reported back verbatim.
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,
}

impl VerificationConfig {
    pub fn online(issuer_name: impl Into<String>) -> Self {
        Self {
            method: VerifierKind::Online.to_string(),
            issuer_name: Some(issuer_name.into()),
        }
    }

    pub fn offline() -> Self {
        Self {
            method: VerifierKind::Offline.to_string(),
            issuer_name: None,
        }
    }
}

/// A single translated error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// User-facing message.
    pub error: String,
    /// Original diagnostic, untouched.
    pub raw: String,
}

impl ErrorEntry {
    pub fn new(error: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            raw: raw.into(),
        }
    }
}

/// Normalized outcome of a verification.
///
/// `errors` is only present on failures that went through an error-producing
/// path; a plain success never carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorEntry>>,
}

impl VerificationResult {
    /// Successful verification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
        }
    }

    /// Failure without error details.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }

    /// Failure carrying translated errors. An empty list is stored as absent.
    pub fn failure_with_errors(message: impl Into<String>, errors: Vec<ErrorEntry>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: if errors.is_empty() { None } else { Some(errors) },
        }
    }

    /// Number of attached errors.
    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map_or(0, Vec::len)
    }
}
