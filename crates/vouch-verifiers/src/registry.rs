//! Verifier registration table and catalog discovery.
//!
//! Every variant registers explicitly in [`builtin_registrations`]. Names
//! follow the `<Base>Verifier` convention; the catalog id and display name
//! are derived from the registration name by the pure functions below.

use std::fmt;
use std::sync::Arc;

use vouch_core::{IssuerDescriptor, Settings, VerificationConfig, VerifierKind};

use crate::capability::Verifier;
use crate::error::{RegistryError, VerifierError};
use crate::variants::{DhiwayVerifier, SignatureVerifier};

/// Suffix every registration name must carry.
pub const VERIFIER_SUFFIX: &str = "Verifier";

/// Builds a verifier instance from a request config and settings.
pub type Constructor =
    fn(&VerificationConfig, &Settings) -> Result<Box<dyn Verifier>, VerifierError>;

/// Strip extension markers (from the first `.`) and the `Verifier` suffix,
/// preserving case. `DhiwayVerifier.ts` becomes `Dhiway`.
pub fn base_name(registration_name: &str) -> &str {
    let stem = registration_name
        .split('.')
        .next()
        .unwrap_or(registration_name);
    stem.strip_suffix(VERIFIER_SUFFIX).unwrap_or(stem)
}

/// Lowercase id derived from the registration name.
pub fn derive_id(registration_name: &str) -> String {
    base_name(registration_name).to_lowercase()
}

/// Whether a name follows the `<Base>Verifier` convention.
pub fn is_verifier_name(registration_name: &str) -> bool {
    let stem = registration_name
        .split('.')
        .next()
        .unwrap_or(registration_name);
    stem.len() > VERIFIER_SUFFIX.len() && stem.ends_with(VERIFIER_SUFFIX)
}

/// One entry of the registration table.
#[derive(Clone)]
pub struct Registration {
    /// Registration name, e.g. `DhiwayVerifier`.
    pub name: &'static str,
    pub kind: VerifierKind,
    pub description: &'static str,
    /// Title used when the variant cannot be constructed during discovery.
    pub static_title: Option<&'static str>,
    pub construct: Constructor,
}

impl Registration {
    pub fn base_name(&self) -> &'static str {
        base_name(self.name)
    }

    pub fn id(&self) -> String {
        derive_id(self.name)
    }

    /// Construct the variant.
    pub fn instantiate(
        &self,
        config: &VerificationConfig,
        settings: &Settings,
    ) -> Result<Box<dyn Verifier>, VerifierError> {
        (self.construct)(config, settings)
    }

    /// Build the catalog entry, constructing the variant to ask for its title.
    /// Construction failures fall back to the static title.
    fn describe(&self, settings: &Settings) -> IssuerDescriptor {
        let base = self.base_name();
        let probe_config = VerificationConfig {
            method: self.kind.to_string(),
            issuer_name: match self.kind {
                VerifierKind::Online => Some(base.to_string()),
                VerifierKind::Offline => None,
            },
        };

        let title = match self.instantiate(&probe_config, settings) {
            Ok(verifier) => verifier.title(),
            Err(e) => {
                let fallback = self.static_title.unwrap_or(base);
                tracing::warn!(
                    verifier = self.name,
                    error = %e,
                    fallback,
                    "could not construct verifier during discovery, using static title"
                );
                fallback.to_string()
            }
        };

        let name = if title != base {
            title.clone()
        } else {
            base.to_string()
        };

        // Offline ids follow the resolved display name, online ids the
        // registration name.
        let id = match self.kind {
            VerifierKind::Online => self.id(),
            VerifierKind::Offline => name.to_lowercase(),
        };

        IssuerDescriptor {
            id,
            name,
            title,
            kind: self.kind,
            description: self.description.to_string(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("static_title", &self.static_title)
            .finish()
    }
}

/// The built-in registration table, in discovery order.
pub fn builtin_registrations() -> Vec<Registration> {
    vec![DhiwayVerifier::registration(), SignatureVerifier::registration()]
}

/// Lists registered variants by kind.
pub trait DiscoverySource: Send + Sync {
    fn registrations(&self, kind: VerifierKind) -> Result<Vec<Registration>, RegistryError>;
}

/// A fixed, in-memory registration table.
#[derive(Debug, Clone)]
pub struct StaticTable {
    entries: Vec<Registration>,
}

impl StaticTable {
    pub fn new(entries: Vec<Registration>) -> Self {
        Self { entries }
    }

    /// Table holding the built-in variants.
    pub fn builtin() -> Self {
        Self::new(builtin_registrations())
    }
}

impl DiscoverySource for StaticTable {
    fn registrations(&self, kind: VerifierKind) -> Result<Vec<Registration>, RegistryError> {
        Ok(self
            .entries
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect())
    }
}

/// Discovered issuer descriptors, online entries first.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<IssuerDescriptor>,
}

impl Catalog {
    /// Entries, optionally restricted to one kind. Order is preserved.
    pub fn list(&self, kind: Option<VerifierKind>) -> Vec<IssuerDescriptor> {
        self.entries
            .iter()
            .filter(|d| kind.map_or(true, |k| d.kind == k))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves registrations and builds the issuer catalog.
#[derive(Clone)]
pub struct VerifierRegistry {
    source: Arc<dyn DiscoverySource>,
}

impl VerifierRegistry {
    pub fn new(source: Arc<dyn DiscoverySource>) -> Self {
        Self { source }
    }

    /// Registry over the built-in table.
    pub fn builtin() -> Self {
        Self::new(Arc::new(StaticTable::builtin()))
    }

    /// Registrations of `kind` that follow the naming convention.
    pub fn registrations(&self, kind: VerifierKind) -> Result<Vec<Registration>, RegistryError> {
        let all = self.source.registrations(kind)?;
        Ok(all
            .into_iter()
            .filter(|r| {
                let keep = is_verifier_name(r.name);
                if !keep {
                    tracing::debug!(name = r.name, "skipping registration without verifier suffix");
                }
                keep
            })
            .collect())
    }

    /// Find the online registration whose base name matches `issuer`,
    /// ignoring case.
    pub fn find_online(&self, issuer: &str) -> Result<Option<Registration>, RegistryError> {
        let wanted = issuer.to_lowercase();
        Ok(self
            .registrations(VerifierKind::Online)?
            .into_iter()
            .find(|r| r.id() == wanted))
    }

    /// Descriptors for one kind. Source failures are logged and yield an
    /// empty list.
    pub fn discover(&self, kind: VerifierKind, settings: &Settings) -> Vec<IssuerDescriptor> {
        match self.registrations(kind) {
            Ok(registrations) => registrations.iter().map(|r| r.describe(settings)).collect(),
            Err(e) => {
                tracing::error!(%kind, error = %e, "verifier discovery failed");
                Vec::new()
            }
        }
    }

    /// Discover every kind, online first.
    pub fn catalog(&self, settings: &Settings) -> Catalog {
        let entries: Vec<IssuerDescriptor> = VerifierKind::ALL
            .iter()
            .flat_map(|kind| self.discover(*kind, settings))
            .collect();
        tracing::info!(count = entries.len(), "verifier catalog discovered");
        Catalog { entries }
    }
}

impl Default for VerifierRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
