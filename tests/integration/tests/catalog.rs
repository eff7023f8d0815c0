//! Integration test: catalog discovery and custom discovery sources.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use vouch_core::{Credential, Settings, VerificationConfig, VerificationResult, VerifierKind};
use vouch_verifiers::{
    DispatchService, Registration, StaticTable, Verifier, VerifierError, VerifierRegistry,
    VerifierSelector,
};

/// An online variant that accepts everything, registered only in tests.
struct EchoVerifier;

#[async_trait]
impl Verifier for EchoVerifier {
    fn registration_name(&self) -> &'static str {
        "EchoVerifier"
    }

    async fn verify(&self, credential: &Credential) -> Result<VerificationResult, VerifierError> {
        Ok(VerificationResult::success(format!(
            "echoed {} fields",
            credential.len()
        )))
    }
}

fn echo_registration() -> Registration {
    Registration {
        name: "EchoVerifier",
        kind: VerifierKind::Online,
        description: "Accepts every credential.",
        static_title: None,
        construct: construct_echo,
    }
}

fn construct_echo(
    _: &VerificationConfig,
    _: &Settings,
) -> Result<Box<dyn Verifier>, VerifierError> {
    Ok(Box::new(EchoVerifier))
}

/// An online variant that never overrides `verify`.
struct DraftVerifier;

#[async_trait]
impl Verifier for DraftVerifier {
    fn registration_name(&self) -> &'static str {
        "DraftVerifier"
    }
}

fn construct_draft(
    _: &VerificationConfig,
    _: &Settings,
) -> Result<Box<dyn Verifier>, VerifierError> {
    Ok(Box::new(DraftVerifier))
}

fn registry_with_extras() -> VerifierRegistry {
    let mut entries = vouch_verifiers::registry::builtin_registrations();
    entries.push(echo_registration());
    entries.push(Registration {
        name: "DraftVerifier",
        kind: VerifierKind::Online,
        description: "",
        static_title: None,
        construct: construct_draft,
    });
    VerifierRegistry::new(Arc::new(StaticTable::new(entries)))
}

#[test]
fn test_builtin_catalog_without_configuration() {
    let catalog = VerifierRegistry::builtin().catalog(&Settings::new());
    let all = catalog.list(None);

    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "dhiway");
    assert_eq!(all[0].title, "Dhiway CORD");
    assert_eq!(all[0].name, "Dhiway CORD");
    assert_eq!(all[1].id, "signature");
    assert_eq!(all[1].name, "Signature");
    assert_eq!(all[1].kind, VerifierKind::Offline);
}

#[test]
fn test_extra_registrations_are_discovered() {
    let catalog = registry_with_extras().catalog(&Settings::new());
    let online = catalog.list(Some(VerifierKind::Online));

    let ids: Vec<&str> = online.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["dhiway", "echo", "draft"]);
    assert!(online.iter().all(|d| d.kind == VerifierKind::Online));

    let echo = &online[1];
    assert_eq!(echo.name, "Echo");
    assert_eq!(echo.title, "Echo");
}

#[tokio::test]
async fn test_dispatch_through_custom_table() {
    let service = DispatchService::new(VerifierSelector::new(
        registry_with_extras(),
        Arc::new(Settings::new()),
    ));

    let result = service
        .verify(vouch_verifiers::VerificationRequest::new(
            json!({"a": 1, "b": 2}),
            VerificationConfig::online("ECHO"),
        ))
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.message, "echoed 2 fields");
}

#[tokio::test]
async fn test_variant_without_verify_reports_not_implemented() {
    let service = DispatchService::new(VerifierSelector::new(
        registry_with_extras(),
        Arc::new(Settings::new()),
    ));

    let err = service
        .verify(vouch_verifiers::VerificationRequest::new(
            json!({"a": 1}),
            VerificationConfig::online("draft"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        vouch_verifiers::DispatchError::Verifier(VerifierError::NotImplemented(_))
    ));
}
