//! Vouch Verifiers: Verifier capability, registration table, selector,
//! dispatch service, and the built-in verifier variants.

pub mod capability;
pub mod dispatch;
pub mod error;
pub mod expiry;
pub mod registry;
pub mod selector;
pub mod translate;
pub mod variants;

pub use capability::Verifier;
pub use dispatch::{DispatchService, VerificationRequest};
pub use error::{DispatchError, RegistryError, SelectorError, VerifierError};
pub use registry::{Catalog, DiscoverySource, Registration, StaticTable, VerifierRegistry};
pub use selector::VerifierSelector;
pub use variants::{DhiwayVerifier, SignatureVerifier};
