//! Integration test: request → selector → verifier → result, against a
//! mocked issuer service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use vouch_core::{Settings, VerificationConfig};
use vouch_verifiers::variants::dhiway::{FAILURE_MESSAGE, SUCCESS_MESSAGE};
use vouch_verifiers::{
    DispatchError, DispatchService, SelectorError, VerificationRequest, VerifierRegistry,
    VerifierSelector,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> DispatchService {
    let settings: Settings = [
        ("DHIWAY_VERIFICATION_URL", format!("{}/verify", server.uri())),
        ("DHIWAY_API_TOKEN", "integration-token".to_string()),
    ]
    .into_iter()
    .collect();
    DispatchService::new(VerifierSelector::new(
        VerifierRegistry::builtin(),
        Arc::new(settings),
    ))
}

fn online(issuer: &str, credential: serde_json::Value) -> VerificationRequest {
    VerificationRequest::new(credential, VerificationConfig::online(issuer))
}

// =========================================================================
// Online verification
// =========================================================================

#[tokio::test]
async fn test_valid_credential_any_issuer_case() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .and(header("authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(3)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let valid_until = (Utc::now() + Duration::days(30)).to_rfc3339();

    for issuer in ["dhiway", "Dhiway", "DHIWAY"] {
        let result = service
            .verify(online(
                issuer,
                json!({"id": "urn:uuid:1", "validUntil": valid_until}),
            ))
            .await
            .expect("dispatch should succeed");
        assert!(result.success, "issuer spelled {issuer} should verify");
        assert_eq!(result.message, SUCCESS_MESSAGE);
        assert!(result.errors.is_none());
    }
}

#[tokio::test]
async fn test_expired_credential_never_reaches_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let expired = (Utc::now() - Duration::days(1)).to_rfc3339();
    let result = service_for(&server)
        .verify(online("Dhiway", json!({"validUntil": expired})))
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.error_count(), 1);
    let entry = &result.errors.as_ref().unwrap()[0];
    assert_eq!(entry.error, "This credential has expired.");
    assert!(entry.raw.contains("validUntil"));
}

#[tokio::test]
async fn test_remote_errors_are_translated_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": ["Credential Revoked", "issuer exploded"]
        })))
        .mount(&server)
        .await;

    let result = service_for(&server)
        .verify(online("dhiway", json!({"id": "urn:uuid:2"})))
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.message, FAILURE_MESSAGE);
    let errors = result.errors.unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].error, "This credential has been revoked by its issuer.");
    assert_eq!(errors[0].raw, "Credential Revoked");
    assert_eq!(errors[1].error, vouch_verifiers::translate::UNKNOWN_ERROR_MESSAGE);
    assert_eq!(errors[1].raw, "issuer exploded");
}

#[tokio::test]
async fn test_service_outage_is_a_failed_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = service_for(&server)
        .verify(online("Dhiway", json!({"id": "urn:uuid:3"})))
        .await
        .unwrap();

    assert!(!result.success);
    let errors = result.errors.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error, errors[0].raw);
}

// =========================================================================
// Selection failures
// =========================================================================

#[tokio::test]
async fn test_unknown_and_malformed_issuers() {
    let server = MockServer::start().await;
    let service = service_for(&server);

    let err = service
        .verify(online("Atlantis", json!({"id": "x"})))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Selection(SelectorError::UnknownVerifier { ref issuer, .. })
            if issuer == "Atlantis"
    ));

    let err = service
        .verify(online("../etc", json!({"id": "x"})))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Selection(SelectorError::InvalidIssuerName(_))
    ));
}

#[tokio::test]
async fn test_offline_is_the_signature_stub() {
    let server = MockServer::start().await;
    let result = service_for(&server)
        .verify(VerificationRequest::new(
            json!({"id": "urn:uuid:4"}),
            VerificationConfig::offline(),
        ))
        .await
        .unwrap();

    assert!(!result.success);
    assert!(result.errors.is_none());
}
