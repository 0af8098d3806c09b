use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::backend::{BackendError, ParcelBackend};
use crate::models::parcel::{AdminUpdate, DestinationUpdate, Parcel};
use crate::session::Session;

/// `ParcelBackend` over the REST API at `base_url`.
#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        session: &Session,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        let response = check_status(response).await?;
        response.json::<T>().await.map_err(|err| {
            if err.is_decode() {
                BackendError::Decode(err.to_string())
            } else {
                BackendError::Transport(err.to_string())
            }
        })
    }
}

async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    debug!(status = status.as_u16(), url = %response.url(), "backend returned error status");

    match status {
        StatusCode::UNAUTHORIZED => Err(BackendError::Unauthorized),
        StatusCode::FORBIDDEN => Err(BackendError::Forbidden),
        StatusCode::NOT_FOUND => Err(BackendError::NotFound),
        status if status.is_client_error() => {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::Rejected {
                status: status.as_u16(),
                detail: error_detail(&body),
            })
        }
        status => Err(BackendError::Transport(format!(
            "backend returned {status}"
        ))),
    }
}

/// Pulls the human-readable message out of a `{"detail": ...}` error body.
/// Structured details are flattened to their `msg` fields.
fn error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    match value.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl ParcelBackend for HttpBackend {
    async fn list_own(&self, session: &Session) -> Result<Vec<Parcel>, BackendError> {
        self.send(session, self.http.get(self.url("/parcels/"))).await
    }

    async fn list_all(&self, session: &Session) -> Result<Vec<Parcel>, BackendError> {
        self.send(session, self.http.get(self.url("/parcels/all"))).await
    }

    async fn get(&self, session: &Session, id: u64) -> Result<Parcel, BackendError> {
        self.send(session, self.http.get(self.url(&format!("/parcels/{id}"))))
            .await
    }

    async fn update_destination(
        &self,
        session: &Session,
        id: u64,
        destination_address: &str,
    ) -> Result<Parcel, BackendError> {
        let body = DestinationUpdate {
            destination_address: destination_address.to_string(),
        };
        let request = self
            .http
            .put(self.url(&format!("/parcels/{id}/destination")))
            .json(&body);
        self.send(session, request).await
    }

    async fn cancel(&self, session: &Session, id: u64) -> Result<Parcel, BackendError> {
        self.send(session, self.http.put(self.url(&format!("/parcels/{id}/cancel"))))
            .await
    }

    async fn admin_update(
        &self,
        session: &Session,
        id: u64,
        update: &AdminUpdate,
    ) -> Result<Parcel, BackendError> {
        let request = self
            .http
            .put(self.url(&format!("/parcels/{id}/admin")))
            .json(update);
        self.send(session, request).await
    }
}
