use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::warn;

use crate::backend::{BackendError, ParcelBackend};
use crate::models::parcel::{AdminUpdate, Parcel};
use crate::observability::metrics::Metrics;
use crate::session::Session;

/// Wraps a backend and records count, outcome and latency for every call.
pub struct MeteredBackend {
    inner: Arc<dyn ParcelBackend>,
    metrics: Metrics,
}

impl MeteredBackend {
    pub fn new(inner: Arc<dyn ParcelBackend>, metrics: Metrics) -> Self {
        Self { inner, metrics }
    }

    async fn observe<T, F>(&self, operation: &'static str, call: F) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        let start = Instant::now();
        let result = call.await;
        let elapsed = start.elapsed().as_secs_f64();

        let outcome = match &result {
            Ok(_) => "success",
            Err(BackendError::Unauthorized | BackendError::Forbidden) => "denied",
            Err(BackendError::NotFound | BackendError::Rejected { .. }) => "rejected",
            Err(BackendError::Transport(_) | BackendError::Decode(_)) => "error",
        };
        if let Err(err) = &result {
            warn!(operation, error = %err, "backend call failed");
        }

        self.metrics.record_backend_call(operation, outcome, elapsed);
        result
    }
}

#[async_trait]
impl ParcelBackend for MeteredBackend {
    async fn list_own(&self, session: &Session) -> Result<Vec<Parcel>, BackendError> {
        self.observe("list_own", self.inner.list_own(session)).await
    }

    async fn list_all(&self, session: &Session) -> Result<Vec<Parcel>, BackendError> {
        self.observe("list_all", self.inner.list_all(session)).await
    }

    async fn get(&self, session: &Session, id: u64) -> Result<Parcel, BackendError> {
        self.observe("get", self.inner.get(session, id)).await
    }

    async fn update_destination(
        &self,
        session: &Session,
        id: u64,
        destination_address: &str,
    ) -> Result<Parcel, BackendError> {
        self.observe(
            "update_destination",
            self.inner.update_destination(session, id, destination_address),
        )
        .await
    }

    async fn cancel(&self, session: &Session, id: u64) -> Result<Parcel, BackendError> {
        self.observe("cancel", self.inner.cancel(session, id)).await
    }

    async fn admin_update(
        &self,
        session: &Session,
        id: u64,
        update: &AdminUpdate,
    ) -> Result<Parcel, BackendError> {
        self.observe("admin_update", self.inner.admin_update(session, id, update))
            .await
    }
}
