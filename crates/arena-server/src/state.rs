//! Shared application state.

use std::sync::Arc;

use arena_core::Store;

use crate::upstream::{MetricsSource, TokenVerifier};

/// Handles every request handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub metrics: Arc<dyn MetricsSource>,
    /// Age after which cached metrics are refetched.
    pub metrics_ttl: chrono::Duration,
}

impl AppState {
    pub fn new(
        store: Arc<Store>,
        verifier: Arc<dyn TokenVerifier>,
        metrics: Arc<dyn MetricsSource>,
        metrics_ttl: chrono::Duration,
    ) -> Self {
        Self {
            store,
            verifier,
            metrics,
            metrics_ttl,
        }
    }
}
