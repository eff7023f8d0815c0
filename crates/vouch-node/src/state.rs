//! Shared state handed to every HTTP handler.

use std::sync::Arc;

use vouch_core::Settings;
use vouch_verifiers::{Catalog, DispatchService, VerifierRegistry, VerifierSelector};

use crate::config::Environment;

/// Read-only state shared across requests. The catalog is discovered once
/// at startup.
pub struct AppState {
    pub dispatch: DispatchService,
    pub catalog: Catalog,
    pub environment: Environment,
}

impl AppState {
    /// Discover the catalog and wire the dispatcher.
    pub fn new(registry: VerifierRegistry, settings: Settings, environment: Environment) -> Self {
        let settings = Arc::new(settings);
        let catalog = registry.catalog(&settings);
        let selector = VerifierSelector::new(registry, settings);
        Self {
            dispatch: DispatchService::new(selector),
            catalog,
            environment,
        }
    }

    /// Whether diagnostic details may be returned to clients.
    pub fn expose_diagnostics(&self) -> bool {
        !self.environment.is_production()
    }
}
