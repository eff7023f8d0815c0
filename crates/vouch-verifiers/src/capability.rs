use async_trait::async_trait;

use vouch_core::{Credential, VerificationResult};

use crate::error::VerifierError;
use crate::registry::base_name;

/// The contract every verifier variant satisfies.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Name the variant is registered under, e.g. `DhiwayVerifier`.
    fn registration_name(&self) -> &'static str;

    /// Title configured at construction, if any.
    fn custom_title(&self) -> Option<&str> {
        None
    }

    /// Human-readable title: the custom title, or the registration name with
    /// the `Verifier` suffix stripped.
    fn title(&self) -> String {
        match self.custom_title() {
            Some(title) => title.to_string(),
            None => base_name(self.registration_name()).to_string(),
        }
    }

    /// Verify a credential.
    ///
    /// Variants must override this; the default reports `NotImplemented`.
    async fn verify(&self, _credential: &Credential) -> Result<VerificationResult, VerifierError> {
        Err(VerifierError::NotImplemented(
            self.registration_name().to_string(),
        ))
    }
}
