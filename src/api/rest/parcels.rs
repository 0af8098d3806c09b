use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::Json;
use axum::Router;
use tracing::{debug, info};

use crate::error::{AppError, ErrorKind};
use crate::models::parcel::DestinationUpdate;
use crate::session::Session;
use crate::state::AppState;
use crate::views::detail::ParcelDetailView;
use crate::views::list::ParcelListView;
use crate::views::Refreshed;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/views/my-parcels", get(list_view))
        .route("/views/my-parcels/:id/destination", put(update_destination))
        .route("/views/my-parcels/:id/cancel", put(cancel_from_list))
        .route("/views/parcels/:id", get(detail_view))
        .route("/views/parcels/:id/cancel", put(cancel_from_detail))
}

async fn load_list(state: &AppState, session: &Session) -> Result<ParcelListView, AppError> {
    let parcels = state
        .backend
        .list_own(session)
        .await
        .map_err(|err| AppError::from_backend(err, "Failed to fetch parcels"))?;

    state.metrics.record_render("parcel_list");
    Ok(ParcelListView::build(&parcels))
}

/// Anything but a missing session sends the browser back to the parcel list.
async fn load_detail(
    state: &AppState,
    session: &Session,
    id: u64,
) -> Result<ParcelDetailView, AppError> {
    let parcel = state.backend.get(session, id).await.map_err(|err| {
        match AppError::from_backend(err, "Failed to fetch parcel details") {
            unauthorized @ AppError::Unauthorized(_) => unauthorized,
            _ => AppError::Redirect {
                location: "/",
                kind: ErrorKind::Failure,
                message: "Failed to fetch parcel details".to_string(),
            },
        }
    })?;

    state.metrics.record_render("parcel_detail");
    Ok(ParcelDetailView::build(&parcel))
}

async fn list_view(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ParcelListView>, AppError> {
    Ok(Json(load_list(&state, &session).await?))
}

async fn update_destination(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    session: Session,
    payload: Result<Json<DestinationUpdate>, JsonRejection>,
) -> Result<Json<Refreshed<ParcelListView>>, AppError> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            debug!(
                parcel_id = id,
                error = %rejection.body_text(),
                "malformed destination update"
            );
            return Err(invalid_destination());
        }
    };

    let destination = payload.destination_address.trim();
    if destination.is_empty() {
        return Err(invalid_destination());
    }

    state
        .backend
        .update_destination(&session, id, destination)
        .await
        .map_err(|err| AppError::from_backend(err, "Failed to update destination"))?;
    info!(parcel_id = id, "destination updated");

    let view = load_list(&state, &session).await?;
    Ok(Json(Refreshed::new("Destination updated successfully", view)))
}

fn invalid_destination() -> AppError {
    AppError::Validation("Please enter a valid destination".to_string())
}

async fn cancel_from_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    session: Session,
) -> Result<Json<Refreshed<ParcelListView>>, AppError> {
    cancel(&state, &session, id).await?;

    let view = load_list(&state, &session).await?;
    Ok(Json(Refreshed::new("Parcel cancelled successfully", view)))
}

async fn detail_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    session: Session,
) -> Result<Json<ParcelDetailView>, AppError> {
    Ok(Json(load_detail(&state, &session, id).await?))
}

async fn cancel_from_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    session: Session,
) -> Result<Json<Refreshed<ParcelDetailView>>, AppError> {
    cancel(&state, &session, id).await?;

    let view = load_detail(&state, &session, id).await?;
    Ok(Json(Refreshed::new("Parcel cancelled successfully", view)))
}

async fn cancel(state: &AppState, session: &Session, id: u64) -> Result<(), AppError> {
    state
        .backend
        .cancel(session, id)
        .await
        .map_err(|err| AppError::from_backend(err, "Failed to cancel parcel"))?;

    info!(parcel_id = id, "parcel cancelled");
    Ok(())
}
