use std::sync::Arc;

use crate::backend::metered::MeteredBackend;
use crate::backend::ParcelBackend;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub backend: Arc<dyn ParcelBackend>,
    pub metrics: Metrics,
    pub static_dir: String,
}

impl AppState {
    /// Wraps `backend` so every call is counted and timed.
    pub fn new(backend: Arc<dyn ParcelBackend>) -> Self {
        let metrics = Metrics::new();
        let backend = Arc::new(MeteredBackend::new(backend, metrics.clone()));

        Self {
            backend,
            metrics,
            static_dir: "static".to_string(),
        }
    }

    pub fn with_static_dir(mut self, static_dir: impl Into<String>) -> Self {
        self.static_dir = static_dir.into();
        self
    }
}
