use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::Json;
use axum::Router;
use tracing::{info, warn};

use crate::backend::BackendError;
use crate::error::{AppError, ErrorKind};
use crate::models::parcel::AdminUpdate;
use crate::session::Session;
use crate::state::AppState;
use crate::views::admin::AdminDashboardView;
use crate::views::Refreshed;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/views/admin", get(dashboard))
        .route("/views/admin/parcels/:id", put(update_parcel))
}

async fn load_dashboard(
    state: &AppState,
    session: &Session,
) -> Result<AdminDashboardView, AppError> {
    let parcels = match state.backend.list_all(session).await {
        Ok(parcels) => parcels,
        Err(BackendError::Forbidden) => {
            warn!("admin dashboard requested without admin role");
            return Err(AppError::Redirect {
                location: "/",
                kind: ErrorKind::Authorization,
                message: "Admin access required".to_string(),
            });
        }
        Err(err) => return Err(AppError::from_backend(err, "Failed to fetch parcels")),
    };

    state.metrics.record_render("admin_dashboard");
    Ok(AdminDashboardView::build(&parcels))
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<Refreshed<AdminDashboardView>>, AppError> {
    let view = load_dashboard(&state, &session).await?;
    Ok(Json(Refreshed::new("Parcels loaded successfully", view)))
}

async fn update_parcel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    session: Session,
    payload: Result<Json<AdminUpdate>, JsonRejection>,
) -> Result<Json<Refreshed<AdminDashboardView>>, AppError> {
    let Json(payload) =
        payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    if !payload.status.is_known() {
        return Err(AppError::Validation(format!(
            "Unknown status: {}",
            payload.status
        )));
    }

    let update = AdminUpdate {
        status: payload.status,
        present_location: payload.present_location.trim().to_string(),
    };
    let parcel = state
        .backend
        .admin_update(&session, id, &update)
        .await
        .map_err(|err| AppError::from_backend(err, "Failed to update parcel"))?;
    info!(parcel_id = id, status = %parcel.status, "parcel updated by admin");

    let view = load_dashboard(&state, &session).await?;
    Ok(Json(Refreshed::new("Parcel updated successfully", view)))
}
