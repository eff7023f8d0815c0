//! Vouch Core: Shared types, result envelopes, errors, and settings for the
//! Vouch credential-verification dispatcher.

pub mod error;
pub mod settings;
pub mod types;

pub use error::CoreError;
pub use settings::Settings;
pub use types::{
    Credential, ErrorEntry, IssuerDescriptor, VerificationConfig, VerificationResult,
    VerifierKind,
};
