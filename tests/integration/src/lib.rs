//! Cross-crate integration tests for the Vouch dispatcher live in `tests/`.
