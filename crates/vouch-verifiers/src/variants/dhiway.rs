//! Online verifier backed by the Dhiway verification API.
//!
//! The credential is first checked locally for expiry; if that passes it is
//! posted to the configured endpoint with a bearer token and the response's
//! error field is translated into [`ErrorEntry`] values. Transport failures
//! never escape as errors; they become a failed [`VerificationResult`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use url::Url;
use zeroize::Zeroizing;

use vouch_core::{
    CoreError, Credential, ErrorEntry, Settings, VerificationConfig, VerificationResult,
    VerifierKind,
};

use crate::capability::Verifier;
use crate::error::VerifierError;
use crate::expiry::{check_expiry, DEFAULT_EXPIRY_FIELD};
use crate::registry::Registration;
use crate::translate::translate_remote_errors;

pub const REGISTRATION_NAME: &str = "DhiwayVerifier";
pub const TITLE: &str = "Dhiway CORD";

pub const VERIFICATION_URL_KEY: &str = "DHIWAY_VERIFICATION_URL";
pub const API_TOKEN_KEY: &str = "DHIWAY_API_TOKEN";
pub const EXPIRY_FIELD_KEY: &str = "DHIWAY_EXPIRY_FIELD";
pub const TIMEOUT_SECS_KEY: &str = "DHIWAY_TIMEOUT_SECS";
pub const TITLE_KEY: &str = "DHIWAY_TITLE";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const SUCCESS_MESSAGE: &str = "Credential verified successfully.";
pub const FAILURE_MESSAGE: &str = "Credential verification failed.";

/// Failures talking to the remote service.
#[derive(Debug, thiserror::Error)]
enum TransportError {
    #[error("request to verification service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("verification service returned a malformed body: {0}")]
    Body(#[from] serde_json::Error),
}

pub struct DhiwayVerifier {
    client: reqwest::Client,
    endpoint: Url,
    expiry_field: String,
    title: String,
    issuer_name: Option<String>,
}

impl DhiwayVerifier {
    /// Build from settings. Fails if the endpoint or token is missing.
    pub fn new(config: &VerificationConfig, settings: &Settings) -> Result<Self, VerifierError> {
        let raw_url = settings.require(VERIFICATION_URL_KEY)?;
        let token = settings.require_secret(API_TOKEN_KEY)?;
        let timeout_secs = settings.parse_or(TIMEOUT_SECS_KEY, DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(CoreError::InvalidSetting {
                key: TIMEOUT_SECS_KEY.to_string(),
                reason: "timeout must be at least one second".into(),
            }
            .into());
        }

        let endpoint = Url::parse(raw_url).map_err(|e| VerifierError::InvalidEndpoint {
            url: raw_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(auth_headers(&token)?)
            .build()
            .map_err(|e| VerifierError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            expiry_field: settings
                .get_or(EXPIRY_FIELD_KEY, DEFAULT_EXPIRY_FIELD)
                .to_string(),
            title: settings.get_or(TITLE_KEY, TITLE).to_string(),
            issuer_name: config.issuer_name.clone(),
        })
    }

    pub fn registration() -> Registration {
        Registration {
            name: REGISTRATION_NAME,
            kind: VerifierKind::Online,
            description: "Verifies credentials against the Dhiway CORD verification service.",
            static_title: Some(TITLE),
            construct: Self::construct,
        }
    }

    fn construct(
        config: &VerificationConfig,
        settings: &Settings,
    ) -> Result<Box<dyn Verifier>, VerifierError> {
        Ok(Box::new(Self::new(config, settings)?))
    }

    /// Name of the credential field inspected by the expiry pre-check.
    pub fn expiry_field(&self) -> &str {
        &self.expiry_field
    }

    async fn call_remote(&self, credential: &Credential) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(credential)
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn auth_headers(token: &Zeroizing<String>) -> Result<HeaderMap, VerifierError> {
    let bearer = Zeroizing::new(format!("Bearer {}", token.as_str()));
    let mut value = HeaderValue::from_str(&bearer).map_err(|_| {
        VerifierError::Client(format!("{API_TOKEN_KEY} contains invalid header characters"))
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Map a remote response body to a result.
fn interpret_response(body: &Value) -> VerificationResult {
    let errors = translate_remote_errors(body);
    if errors.is_empty() {
        VerificationResult::success(SUCCESS_MESSAGE)
    } else {
        VerificationResult::failure_with_errors(FAILURE_MESSAGE, errors)
    }
}

/// Render an error with its `source()` chain, skipping causes whose text is
/// already part of the message.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        let part = e.to_string();
        if !text.contains(&part) {
            text.push_str(": ");
            text.push_str(&part);
        }
        cause = e.source();
    }
    text
}

fn transport_failure(err: &TransportError) -> VerificationResult {
    let text = error_chain(err);
    VerificationResult::failure_with_errors(
        FAILURE_MESSAGE,
        vec![ErrorEntry::new(text.clone(), text)],
    )
}

#[async_trait]
impl Verifier for DhiwayVerifier {
    fn registration_name(&self) -> &'static str {
        REGISTRATION_NAME
    }

    fn custom_title(&self) -> Option<&str> {
        Some(&self.title)
    }

    async fn verify(&self, credential: &Credential) -> Result<VerificationResult, VerifierError> {
        if let Err(e) = check_expiry(credential, &self.expiry_field, Utc::now()) {
            tracing::info!(error = %e, "credential rejected by expiry pre-check");
            return Ok(VerificationResult::failure_with_errors(
                FAILURE_MESSAGE,
                vec![e.to_error_entry()],
            ));
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            issuer = self.issuer_name.as_deref().unwrap_or_default(),
            "sending credential for remote verification"
        );

        match self.call_remote(credential).await {
            Ok(body) => {
                let result = interpret_response(&body);
                tracing::info!(
                    success = result.success,
                    errors = result.error_count(),
                    "remote verification completed"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote verification transport failure");
                Ok(transport_failure(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(url: &str) -> Settings {
        [
            (VERIFICATION_URL_KEY, url),
            (API_TOKEN_KEY, "test-token"),
            (TIMEOUT_SECS_KEY, "5"),
        ]
        .into_iter()
        .collect()
    }

    fn verifier(server: &MockServer) -> DhiwayVerifier {
        let url = format!("{}/verify", server.uri());
        DhiwayVerifier::new(&VerificationConfig::online("dhiway"), &settings_for(&url)).unwrap()
    }

    fn credential(value: Value) -> Credential {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_url_is_configuration_error() {
        let settings: Settings = [(API_TOKEN_KEY, "t")].into_iter().collect();
        let err = DhiwayVerifier::new(&VerificationConfig::online("dhiway"), &settings)
            .err()
            .unwrap();
        assert!(
            matches!(err, VerifierError::Configuration(ref e) if e.to_string().contains(VERIFICATION_URL_KEY))
        );
    }

    #[test]
    fn test_missing_token_is_configuration_error() {
        let settings: Settings = [(VERIFICATION_URL_KEY, "http://localhost/verify")]
            .into_iter()
            .collect();
        let err = DhiwayVerifier::new(&VerificationConfig::online("dhiway"), &settings)
            .err()
            .unwrap();
        assert!(
            matches!(err, VerifierError::Configuration(ref e) if e.to_string().contains(API_TOKEN_KEY))
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = DhiwayVerifier::new(
            &VerificationConfig::online("dhiway"),
            &settings_for("not a url"),
        )
        .err()
        .unwrap();
        assert!(matches!(err, VerifierError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_expiry_field_override() {
        let mut settings = settings_for("http://localhost/verify");
        settings.set(EXPIRY_FIELD_KEY, "expirationDate");
        let v = DhiwayVerifier::new(&VerificationConfig::online("dhiway"), &settings).unwrap();
        assert_eq!(v.expiry_field(), "expirationDate");
        assert_eq!(v.title(), TITLE);
    }

    #[test]
    fn test_title_override() {
        let mut settings = settings_for("http://localhost/verify");
        settings.set(TITLE_KEY, "Dhiway Staging");
        let v = DhiwayVerifier::new(&VerificationConfig::online("dhiway"), &settings).unwrap();
        assert_eq!(v.title(), "Dhiway Staging");
    }

    #[tokio::test]
    async fn test_success_without_error_field() {
        let server = MockServer::start().await;
        let cred = json!({"id": "urn:cred:1", "validUntil": "2099-01-01T00:00:00Z"});

        Mock::given(method("POST"))
            .and(path("/verify"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(&cred))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"verified": true})))
            .expect(1)
            .mount(&server)
            .await;

        let result = verifier(&server).verify(&credential(cred)).await.unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": true, "message": "Credential verified successfully."})
        );
    }

    #[tokio::test]
    async fn test_two_remote_errors_are_translated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": ["credential revoked", "ledger hiccup 0x1f"]
            })))
            .mount(&server)
            .await;

        let result = verifier(&server)
            .verify(&credential(json!({"id": "urn:cred:2"})))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.message, FAILURE_MESSAGE);
        let errors = result.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].raw, "credential revoked");
        assert_eq!(errors[0].error, "This credential has been revoked by its issuer.");
        assert_eq!(errors[1].raw, "ledger hiccup 0x1f");
        assert_eq!(errors[1].error, crate::translate::UNKNOWN_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_expired_credential_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let result = verifier(&server)
            .verify(&credential(json!({"validUntil": "2001-01-01T00:00:00Z"})))
            .await
            .unwrap();
        assert!(!result.success);
        let errors = result.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, crate::expiry::EXPIRED_MESSAGE);
    }

    #[tokio::test]
    async fn test_invalid_expiry_date_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = verifier(&server)
            .verify(&credential(json!({"validUntil": "someday"})))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(
            result.errors.unwrap()[0].error,
            crate::expiry::INVALID_DATE_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_missing_expiry_proceeds_to_remote() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": null})))
            .expect(1)
            .mount(&server)
            .await;

        let result = verifier(&server)
            .verify(&credential(json!({"id": "urn:cred:3"})))
            .await
            .unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_non_2xx_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(502).set_body_json(json!({"error": "credential revoked"})),
            )
            .mount(&server)
            .await;

        let result = verifier(&server)
            .verify(&credential(json!({"id": "urn:cred:4"})))
            .await
            .unwrap();
        assert!(!result.success);
        let errors = result.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, errors[0].raw);
        assert!(errors[0].raw.contains("502"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let v = DhiwayVerifier::new(
            &VerificationConfig::online("dhiway"),
            &settings_for("http://127.0.0.1:1/verify"),
        )
        .unwrap();
        let result = v.verify(&credential(json!({"id": "x"}))).await.unwrap();
        assert!(!result.success);
        let errors = result.errors.unwrap();
        assert_eq!(errors[0].error, errors[0].raw);
    }

    #[tokio::test]
    async fn test_empty_body_counts_as_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let result = verifier(&server)
            .verify(&credential(json!({"id": "x"})))
            .await
            .unwrap();
        assert!(result.success);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut settings = settings_for("http://localhost/verify");
        settings.set(TIMEOUT_SECS_KEY, "0");
        let err = DhiwayVerifier::new(&VerificationConfig::online("dhiway"), &settings)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            VerifierError::Configuration(CoreError::InvalidSetting { ref key, .. })
                if key == TIMEOUT_SECS_KEY
        ));
    }

    #[tokio::test]
    async fn test_slow_remote_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut settings = settings_for(&format!("{}/verify", server.uri()));
        settings.set(TIMEOUT_SECS_KEY, "1");
        let v = DhiwayVerifier::new(&VerificationConfig::online("dhiway"), &settings).unwrap();

        let result = v.verify(&credential(json!({"id": "slow"}))).await.unwrap();
        assert!(!result.success);
        let errors = result.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, errors[0].raw);
        assert!(errors[0].raw.to_lowercase().contains("timed out"));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("connect failed")]
    struct Inner;

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct Outer(#[source] Inner);

    #[test]
    fn test_error_chain_keeps_causes() {
        assert_eq!(
            error_chain(&Outer(Inner)),
            "error sending request: connect failed"
        );
        assert_eq!(error_chain(&Inner), "connect failed");
    }
}
