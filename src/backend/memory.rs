use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::backend::{BackendError, ParcelBackend};
use crate::lifecycle::{self, ParcelStatus};
use crate::models::parcel::{AdminUpdate, Parcel};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: u64,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct NewParcel {
    pub user_id: u64,
    pub pickup_address: String,
    pub destination_address: String,
    pub weight_category: String,
    pub quote_amount: f64,
    pub distance_km: Option<f64>,
    pub duration_mins: Option<f64>,
}

/// In-process parcel store that applies the same rules as the REST backend.
pub struct MemoryBackend {
    parcels: DashMap<u64, Parcel>,
    principals: DashMap<String, Principal>,
    next_id: AtomicU64,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            parcels: DashMap::new(),
            principals: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn register(&self, token: impl Into<String>, principal: Principal) {
        self.principals.insert(token.into(), principal);
    }

    pub fn create(&self, new: NewParcel) -> Parcel {
        self.create_at(new, Utc::now())
    }

    pub fn create_at(&self, new: NewParcel, created_at: DateTime<Utc>) -> Parcel {
        let parcel = Parcel {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            user_id: new.user_id,
            status: ParcelStatus::Pending,
            pickup_address: new.pickup_address,
            destination_address: new.destination_address,
            present_location: None,
            weight_category: new.weight_category,
            quote_amount: new.quote_amount.max(0.0),
            distance_km: new.distance_km,
            duration_mins: new.duration_mins,
            created_at,
        };

        self.parcels.insert(parcel.id, parcel.clone());
        parcel
    }

    /// Overwrites a stored parcel's status, bypassing every rule.
    pub fn force_status(&self, id: u64, status: ParcelStatus) -> Option<Parcel> {
        let mut parcel = self.parcels.get_mut(&id)?;
        parcel.status = status;
        Some(parcel.clone())
    }

    pub fn snapshot(&self, id: u64) -> Option<Parcel> {
        self.parcels.get(&id).map(|entry| entry.value().clone())
    }

    fn authenticate(&self, session: &Session) -> Result<Principal, BackendError> {
        self.principals
            .get(session.token())
            .map(|entry| *entry.value())
            .ok_or(BackendError::Unauthorized)
    }

    fn require_admin(&self, session: &Session) -> Result<Principal, BackendError> {
        let principal = self.authenticate(session)?;
        if !principal.is_admin {
            return Err(BackendError::Forbidden);
        }
        Ok(principal)
    }

    /// Runs `apply` against a parcel the caller owns. Other users' parcels
    /// are reported as missing.
    fn mutate_owned<F>(&self, session: &Session, id: u64, apply: F) -> Result<Parcel, BackendError>
    where
        F: FnOnce(&mut Parcel) -> Result<(), BackendError>,
    {
        let principal = self.authenticate(session)?;
        let mut parcel = self.parcels.get_mut(&id).ok_or(BackendError::NotFound)?;
        if parcel.user_id != principal.user_id {
            return Err(BackendError::NotFound);
        }

        apply(parcel.value_mut())?;
        Ok(parcel.clone())
    }

    fn sorted(&self, filter: impl Fn(&Parcel) -> bool) -> Vec<Parcel> {
        let mut parcels: Vec<Parcel> = self
            .parcels
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        parcels.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        parcels
    }
}

fn rejected(status: u16, detail: impl Into<String>) -> BackendError {
    BackendError::Rejected {
        status,
        detail: detail.into(),
    }
}

#[async_trait]
impl ParcelBackend for MemoryBackend {
    async fn list_own(&self, session: &Session) -> Result<Vec<Parcel>, BackendError> {
        let principal = self.authenticate(session)?;
        Ok(self.sorted(|parcel| parcel.user_id == principal.user_id))
    }

    async fn list_all(&self, session: &Session) -> Result<Vec<Parcel>, BackendError> {
        self.require_admin(session)?;
        Ok(self.sorted(|_| true))
    }

    async fn get(&self, session: &Session, id: u64) -> Result<Parcel, BackendError> {
        let principal = self.authenticate(session)?;
        let parcel = self.parcels.get(&id).ok_or(BackendError::NotFound)?;
        if parcel.user_id != principal.user_id && !principal.is_admin {
            return Err(BackendError::NotFound);
        }
        Ok(parcel.clone())
    }

    async fn update_destination(
        &self,
        session: &Session,
        id: u64,
        destination_address: &str,
    ) -> Result<Parcel, BackendError> {
        let destination = destination_address.trim();
        if destination.is_empty() {
            return Err(rejected(422, "Destination address cannot be empty"));
        }

        self.mutate_owned(session, id, |parcel| {
            if !lifecycle::can_user_modify(&parcel.status) {
                return Err(rejected(
                    400,
                    format!("Cannot change destination of a {} parcel", parcel.status),
                ));
            }
            parcel.destination_address = destination.to_string();
            Ok(())
        })
    }

    async fn cancel(&self, session: &Session, id: u64) -> Result<Parcel, BackendError> {
        self.mutate_owned(session, id, |parcel| {
            if !lifecycle::can_user_cancel(&parcel.status) {
                return Err(rejected(400, "Only pending parcels can be cancelled"));
            }
            parcel.status = ParcelStatus::Cancelled;
            Ok(())
        })
    }

    async fn admin_update(
        &self,
        session: &Session,
        id: u64,
        update: &AdminUpdate,
    ) -> Result<Parcel, BackendError> {
        self.require_admin(session)?;
        let mut parcel = self.parcels.get_mut(&id).ok_or(BackendError::NotFound)?;
        if !lifecycle::can_admin_override(&parcel.status) {
            return Err(rejected(400, "Parcel cannot be updated"));
        }

        let location = update.present_location.trim();
        parcel.status = update.status.clone();
        parcel.present_location = (!location.is_empty()).then(|| location.to_string());
        Ok(parcel.clone())
    }
}
