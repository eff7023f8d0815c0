use serde::{Deserialize, Serialize};
use tracing::Instrument;

use vouch_core::{Credential, VerificationConfig, VerificationResult};

use crate::error::DispatchError;
use crate::selector::VerifierSelector;

/// Body of a verification request. Both fields are optional at the wire
/// level so missing ones are reported as validation errors, not parse errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationRequest {
    #[serde(default)]
    pub credential: Option<serde_json::Value>,
    #[serde(default)]
    pub config: Option<VerificationConfig>,
}

impl VerificationRequest {
    pub fn new(credential: serde_json::Value, config: VerificationConfig) -> Self {
        Self {
            credential: Some(credential),
            config: Some(config),
        }
    }

    /// Check the request shape and split it into its parts.
    pub fn validate(self) -> Result<(Credential, VerificationConfig), DispatchError> {
        let credential = match self.credential {
            None | Some(serde_json::Value::Null) => {
                return Err(DispatchError::Validation("credential is required".into()))
            }
            Some(serde_json::Value::Object(map)) if map.is_empty() => {
                return Err(DispatchError::Validation(
                    "credential must not be empty".into(),
                ))
            }
            Some(serde_json::Value::Object(map)) => map,
            Some(_) => {
                return Err(DispatchError::Validation(
                    "credential must be a JSON object".into(),
                ))
            }
        };

        let config = self
            .config
            .ok_or_else(|| DispatchError::Validation("config is required".into()))?;

        Ok((credential, config))
    }
}

/// Entry point for verification: validate, select, verify.
#[derive(Clone)]
pub struct DispatchService {
    selector: VerifierSelector,
}

impl DispatchService {
    pub fn new(selector: VerifierSelector) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> &VerifierSelector {
        &self.selector
    }

    /// Run a verification request. The verifier's result is returned
    /// unchanged.
    pub async fn verify(
        &self,
        request: VerificationRequest,
    ) -> Result<VerificationResult, DispatchError> {
        let (credential, config) = request.validate()?;

        let span = tracing::info_span!(
            "dispatch",
            request_id = %uuid::Uuid::new_v4(),
            method = %config.method,
            issuer = config.issuer_name.as_deref().unwrap_or("-"),
        );

        async {
            let verifier = self.selector.get_verifier(&config)?;
            tracing::debug!(verifier = verifier.registration_name(), "verifier selected");
            let result = verifier.verify(&credential).await?;
            tracing::info!(success = result.success, "verification finished");
            Ok::<_, DispatchError>(result)
        }
        .instrument(span)
        .await
    }
}
