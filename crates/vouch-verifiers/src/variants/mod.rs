//! Built-in verifier variants.

pub mod dhiway;
pub mod signature;

pub use dhiway::DhiwayVerifier;
pub use signature::SignatureVerifier;
