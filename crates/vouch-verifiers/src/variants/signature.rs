use async_trait::async_trait;

use vouch_core::{Credential, Settings, VerificationConfig, VerificationResult, VerifierKind};

use crate::capability::Verifier;
use crate::error::VerifierError;
use crate::registry::Registration;

pub const REGISTRATION_NAME: &str = "SignatureVerifier";

pub const NOT_IMPLEMENTED_MESSAGE: &str = "Signature verification is not yet implemented.";

/// Offline signature verifier.
///
/// Placeholder: every credential is reported as not verified until real
/// signature checking lands.
#[derive(Debug, Default, Clone)]
pub struct SignatureVerifier;

impl SignatureVerifier {
    pub fn new() -> Self {
        Self
    }

    pub fn registration() -> Registration {
        Registration {
            name: REGISTRATION_NAME,
            kind: VerifierKind::Offline,
            description: "Verifies credential signatures locally, without contacting the issuer.",
            static_title: None,
            construct: Self::construct,
        }
    }

    fn construct(
        _config: &VerificationConfig,
        _settings: &Settings,
    ) -> Result<Box<dyn Verifier>, VerifierError> {
        Ok(Box::new(Self::new()))
    }
}

#[async_trait]
impl Verifier for SignatureVerifier {
    fn registration_name(&self) -> &'static str {
        REGISTRATION_NAME
    }

    async fn verify(&self, credential: &Credential) -> Result<VerificationResult, VerifierError> {
        tracing::debug!(fields = credential.len(), "offline signature check requested");
        Ok(VerificationResult::failure(NOT_IMPLEMENTED_MESSAGE))
    }
}
