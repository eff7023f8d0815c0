use vouch_core::CoreError;

/// Errors raised by a verifier itself (construction or an unimplemented
/// `verify`). Negative verification outcomes are not errors; they are
/// `VerificationResult { success: false, .. }`.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("configuration error: {0}")]
    Configuration(#[from] CoreError),

    #[error("invalid endpoint URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("verify is not implemented for {0}")]
    NotImplemented(String),
}

/// Errors from a discovery source.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("discovery source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Errors from verifier selection.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("issuerName is required for online verification")]
    MissingIssuerName,

    #[error("issuerName must contain only letters: {0}")]
    InvalidIssuerName(String),

    #[error("Unknown verification method: {0}")]
    UnknownMethod(String),

    /// `detail` holds the underlying cause for non-production diagnostics.
    #[error("Unknown online verifier: {issuer}")]
    UnknownVerifier {
        issuer: String,
        detail: Option<String>,
    },

    #[error("verifier {verifier} is not configured")]
    Configuration {
        verifier: String,
        #[source]
        source: VerifierError,
    },
}

impl SelectorError {
    /// True for malformed requests, as opposed to unsupported issuers or
    /// server-side configuration problems.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingIssuerName | Self::InvalidIssuerName(_) | Self::UnknownMethod(_)
        )
    }

    /// Diagnostic detail that must not be shown in production.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::UnknownVerifier { detail, .. } => detail.clone(),
            Self::Configuration { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }
}

/// Errors from the dispatch service.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Selection(#[from] SelectorError),

    #[error(transparent)]
    Verifier(#[from] VerifierError),
}
