use std::sync::Arc;

use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use tracing::info;

use crate::session::expired_token_cookie;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/session/logout", post(logout))
}

async fn logout() -> impl IntoResponse {
    info!("session logged out");
    (
        StatusCode::SEE_OTHER,
        [
            (LOCATION, "/login".to_string()),
            (SET_COOKIE, expired_token_cookie()),
        ],
    )
}
