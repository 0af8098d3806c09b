pub mod http;
pub mod memory;
pub mod metered;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::parcel::{AdminUpdate, Parcel};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("authentication required")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("parcel not found")]
    NotFound,

    #[error("rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("backend unavailable: {0}")]
    Transport(String),

    #[error("invalid backend response: {0}")]
    Decode(String),
}

/// The parcel REST backend as seen by the views.
#[async_trait]
pub trait ParcelBackend: Send + Sync {
    async fn list_own(&self, session: &Session) -> Result<Vec<Parcel>, BackendError>;

    /// Every parcel in the system. Admin only.
    async fn list_all(&self, session: &Session) -> Result<Vec<Parcel>, BackendError>;

    async fn get(&self, session: &Session, id: u64) -> Result<Parcel, BackendError>;

    async fn update_destination(
        &self,
        session: &Session,
        id: u64,
        destination_address: &str,
    ) -> Result<Parcel, BackendError>;

    async fn cancel(&self, session: &Session, id: u64) -> Result<Parcel, BackendError>;

    /// Sets status and location without transition checks. Admin only.
    async fn admin_update(
        &self,
        session: &Session,
        id: u64,
        update: &AdminUpdate,
    ) -> Result<Parcel, BackendError>;
}
