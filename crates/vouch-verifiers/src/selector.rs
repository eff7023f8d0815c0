use std::sync::Arc;

use vouch_core::{Settings, VerificationConfig, VerifierKind};

use crate::capability::Verifier;
use crate::error::SelectorError;
use crate::registry::VerifierRegistry;
use crate::variants::SignatureVerifier;

/// Issuer names are plain ASCII letters.
pub fn is_valid_issuer_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic())
}

/// Resolves a [`VerificationConfig`] to a fresh verifier instance.
#[derive(Clone)]
pub struct VerifierSelector {
    registry: VerifierRegistry,
    settings: Arc<Settings>,
}

impl VerifierSelector {
    pub fn new(registry: VerifierRegistry, settings: Arc<Settings>) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &VerifierRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Pick and construct the verifier for `config`.
    pub fn get_verifier(
        &self,
        config: &VerificationConfig,
    ) -> Result<Box<dyn Verifier>, SelectorError> {
        let kind: VerifierKind = config
            .method
            .parse()
            .map_err(|_| SelectorError::UnknownMethod(config.method.clone()))?;

        match kind {
            VerifierKind::Online => self.online_verifier(config),
            VerifierKind::Offline => Ok(Box::new(SignatureVerifier::new())),
        }
    }

    fn online_verifier(
        &self,
        config: &VerificationConfig,
    ) -> Result<Box<dyn Verifier>, SelectorError> {
        let issuer = config
            .issuer_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(SelectorError::MissingIssuerName)?;

        if !is_valid_issuer_name(issuer) {
            return Err(SelectorError::InvalidIssuerName(issuer.to_string()));
        }

        let registration = match self.registry.find_online(issuer) {
            Ok(Some(registration)) => registration,
            Ok(None) => {
                tracing::warn!(issuer, "no online verifier registered for issuer");
                return Err(SelectorError::UnknownVerifier {
                    issuer: issuer.to_string(),
                    detail: Some(format!(
                        "no registration matches id {}",
                        issuer.to_lowercase()
                    )),
                });
            }
            Err(e) => {
                tracing::error!(issuer, error = %e, "online verifier lookup failed");
                return Err(SelectorError::UnknownVerifier {
                    issuer: issuer.to_string(),
                    detail: Some(e.to_string()),
                });
            }
        };

        registration
            .instantiate(config, &self.settings)
            .map_err(|source| {
                tracing::error!(
                    verifier = registration.name,
                    error = %source,
                    "failed to construct online verifier"
                );
                SelectorError::Configuration {
                    verifier: registration.base_name().to_string(),
                    source,
                }
            })
    }
}
