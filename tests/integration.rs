use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use parcel_tracker::api::rest::router;
use parcel_tracker::backend::memory::{MemoryBackend, NewParcel, Principal};
use parcel_tracker::lifecycle::ParcelStatus;
use parcel_tracker::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

const OWNER: &str = "owner-token";
const ADMIN: &str = "admin-token";

fn setup() -> (axum::Router, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    backend.register(
        OWNER,
        Principal {
            user_id: 1,
            is_admin: false,
        },
    );
    backend.register(
        ADMIN,
        Principal {
            user_id: 99,
            is_admin: true,
        },
    );

    let state = AppState::new(backend.clone());
    (router(Arc::new(state)), backend)
}

fn new_parcel(user_id: u64) -> NewParcel {
    NewParcel {
        user_id,
        pickup_address: "Moi Avenue, Nairobi".to_string(),
        destination_address: "Nyali Road, Mombasa".to_string(),
        weight_category: "medium".to_string(),
        quote_amount: 1250.0,
        distance_km: Some(480.0),
        duration_mins: Some(390.0),
    }
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn put_request(uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"));

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _backend) = setup();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn metrics_count_backend_calls() {
    let (app, _backend) = setup();
    let response = app
        .clone()
        .oneshot(get_request("/views/my-parcels", OWNER))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.contains("text/plain"));

    let body = body_string(response).await;
    assert!(body.contains("backend_requests_total"));
    assert!(body.contains("operation=\"list_own\""));
    assert!(body.contains("view_renders_total"));
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (app, _backend) = setup();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/views/my-parcels")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "authorization");
}

#[tokio::test]
async fn token_cookie_is_accepted() {
    let (app, backend) = setup();
    backend.create(new_parcel(1));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/views/my-parcels")
                .header("cookie", format!("token={OWNER}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rows"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_parcel_list_is_flagged() {
    let (app, _backend) = setup();
    let response = app
        .oneshot(get_request("/views/my-parcels", OWNER))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "My Parcels");
    assert_eq!(body["empty"], true);
}

#[tokio::test]
async fn list_view_offers_actions_per_status() {
    let (app, backend) = setup();
    let pending = backend.create(new_parcel(1));
    let in_transit = backend.create(new_parcel(1));
    let delivered = backend.create(new_parcel(1));
    backend.create(new_parcel(2));
    backend.force_status(in_transit.id, ParcelStatus::InTransit);
    backend.force_status(delivered.id, ParcelStatus::Delivered);

    let response = app
        .oneshot(get_request("/views/my-parcels", OWNER))
        .await
        .unwrap();
    let body = body_json(response).await;
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);

    let row = |id: u64| {
        rows.iter()
            .find(|row| row["id"] == id)
            .unwrap()
            .clone()
    };

    let pending_row = row(pending.id);
    assert_eq!(pending_row["status"]["color"], "warning");
    assert_eq!(pending_row["actions"]["cancel"], true);
    assert_eq!(pending_row["actions"]["edit_destination"], true);

    let transit_row = row(in_transit.id);
    assert_eq!(transit_row["status"]["label"], "In Transit");
    assert_eq!(transit_row["actions"]["cancel"], false);
    assert_eq!(transit_row["actions"]["edit_destination"], true);

    let delivered_row = row(delivered.id);
    assert_eq!(delivered_row["status"]["color"], "success");
    assert_eq!(delivered_row["actions"]["cancel"], false);
    assert_eq!(delivered_row["actions"]["edit_destination"], false);
}

#[tokio::test]
async fn update_destination_refreshes_list() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));

    let response = app
        .oneshot(put_request(
            &format!("/views/my-parcels/{}/destination", parcel.id),
            OWNER,
            Some(json!({ "destination_address": "Oginga Odinga St, Kisumu" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["notice"]["level"], "success");
    assert_eq!(body["notice"]["message"], "Destination updated successfully");
    assert_eq!(body["view"]["rows"][0]["route_to"], "Oginga Odinga St");
}

#[tokio::test]
async fn blank_destination_is_rejected_before_backend() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));

    let response = app
        .oneshot(put_request(
            &format!("/views/my-parcels/{}/destination", parcel.id),
            OWNER,
            Some(json!({ "destination_address": "   " })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["error"], "Please enter a valid destination");

    let stored = backend.snapshot(parcel.id).unwrap();
    assert_eq!(stored.destination_address, "Nyali Road, Mombasa");
}

#[tokio::test]
async fn destination_body_without_address_is_a_validation_error() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));

    let response = app
        .oneshot(put_request(
            &format!("/views/my-parcels/{}/destination", parcel.id),
            OWNER,
            Some(json!({})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()["content-type"], "application/json");
    let body = body_json(response).await;
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["error"], "Please enter a valid destination");

    let stored = backend.snapshot(parcel.id).unwrap();
    assert_eq!(stored.destination_address, "Nyali Road, Mombasa");
}

#[tokio::test]
async fn destination_update_without_json_body_is_a_validation_error() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));

    let response = app
        .oneshot(put_request(
            &format!("/views/my-parcels/{}/destination", parcel.id),
            OWNER,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["error"], "Please enter a valid destination");
}

#[tokio::test]
async fn cancel_pending_parcel_from_list() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));

    let response = app
        .oneshot(put_request(
            &format!("/views/my-parcels/{}/cancel", parcel.id),
            OWNER,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["notice"]["message"], "Parcel cancelled successfully");
    let row = &body["view"]["rows"][0];
    assert_eq!(row["status"]["value"], "cancelled");
    assert_eq!(row["status"]["color"], "error");
    assert_eq!(row["actions"]["cancel"], false);
}

#[tokio::test]
async fn cancel_delivered_parcel_surfaces_backend_message() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));
    backend.force_status(parcel.id, ParcelStatus::Delivered);

    let response = app
        .oneshot(put_request(
            &format!("/views/parcels/{}/cancel", parcel.id),
            OWNER,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["error"], "Only pending parcels can be cancelled");

    let stored = backend.snapshot(parcel.id).unwrap();
    assert_eq!(stored.status, ParcelStatus::Delivered);
}

#[tokio::test]
async fn detail_view_shows_progress_and_tracking() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));
    backend.force_status(parcel.id, ParcelStatus::InTransit);

    let response = app
        .oneshot(get_request(&format!("/views/parcels/{}", parcel.id), OWNER))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], format!("Delivery #{:04}", parcel.id));
    assert_eq!(body["status"]["label"], "In Transit");
    assert_eq!(body["status"]["color"], "info");
    assert_eq!(body["progress"]["index"], 1);
    let percent = body["progress"]["percent"].as_f64().unwrap();
    assert!((percent - 66.666).abs() < 0.01);
    assert_eq!(body["payment"]["state"], "Paid");
    assert_eq!(body["tracking"]["number"], format!("{:010}", parcel.id));
    assert_eq!(body["actions"]["cancel"], false);
}

#[tokio::test]
async fn detail_view_for_cancelled_parcel_has_no_progress() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));

    let response = app
        .oneshot(put_request(
            &format!("/views/parcels/{}/cancel", parcel.id),
            OWNER,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["view"]["progress"].is_null());
    assert_eq!(body["view"]["status"]["value"], "cancelled");
}

#[tokio::test]
async fn unknown_status_renders_with_warning() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));
    backend.force_status(parcel.id, ParcelStatus::from("returned"));

    let response = app
        .oneshot(get_request(&format!("/views/parcels/{}", parcel.id), OWNER))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"]["label"], "returned");
    assert_eq!(body["status"]["color"], "warning");
    assert_eq!(body["progress"]["index"], -1);
    assert_eq!(body["progress"]["percent"], 0.0);
}

#[tokio::test]
async fn missing_parcel_redirects_home() {
    let (app, _backend) = setup();
    let response = app
        .oneshot(get_request("/views/parcels/999", OWNER))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to fetch parcel details");
}

#[tokio::test]
async fn admin_dashboard_redirects_non_admin() {
    let (app, _backend) = setup();
    let response = app
        .oneshot(get_request("/views/admin", OWNER))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");
    let body = body_json(response).await;
    assert_eq!(body["kind"], "authorization");
    assert_eq!(body["error"], "Admin access required");
}

#[tokio::test]
async fn admin_dashboard_lists_everything_with_stats() {
    let (app, backend) = setup();
    backend.create(new_parcel(1));
    let other = backend.create(new_parcel(2));
    backend.force_status(other.id, ParcelStatus::Delivered);

    let response = app
        .oneshot(get_request("/views/admin", ADMIN))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["notice"]["message"], "Parcels loaded successfully");

    let view = &body["view"];
    assert_eq!(view["rows"].as_array().unwrap().len(), 2);
    assert_eq!(view["stats"][0]["value"], 2);
    assert_eq!(view["stats"][1]["label"], "Pending");
    assert_eq!(view["stats"][1]["value"], 1);
    assert_eq!(view["stats"][3]["value"], 1);
    assert_eq!(view["status_options"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn admin_override_skips_transition_rules() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));

    let response = app
        .oneshot(put_request(
            &format!("/views/admin/parcels/{}", parcel.id),
            ADMIN,
            Some(json!({ "status": "delivered", "present_location": "Warehouse B" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["notice"]["message"], "Parcel updated successfully");

    let row = &body["view"]["rows"][0];
    assert_eq!(row["status"]["value"], "delivered");
    assert_eq!(row["status"]["label"], "Delivered");
    assert_eq!(row["location"], "Warehouse B");
    assert_eq!(row["editable"], true);
}

#[tokio::test]
async fn admin_update_rejects_unknown_status() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));

    let response = app
        .oneshot(put_request(
            &format!("/views/admin/parcels/{}", parcel.id),
            ADMIN,
            Some(json!({ "status": "returned", "present_location": "" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let stored = backend.snapshot(parcel.id).unwrap();
    assert_eq!(stored.present_location, None);
}

#[tokio::test]
async fn admin_update_with_malformed_body_is_a_validation_error() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));

    let response = app
        .oneshot(put_request(
            &format!("/views/admin/parcels/{}", parcel.id),
            ADMIN,
            Some(json!({ "present_location": "Warehouse B" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "validation");
    assert!(body["error"].as_str().unwrap().contains("status"));

    let stored = backend.snapshot(parcel.id).unwrap();
    assert_eq!(stored.status, ParcelStatus::Pending);
    assert_eq!(stored.present_location, None);
}

#[tokio::test]
async fn admin_update_by_user_is_forbidden() {
    let (app, backend) = setup();
    let parcel = backend.create(new_parcel(1));

    let response = app
        .oneshot(put_request(
            &format!("/views/admin/parcels/{}", parcel.id),
            OWNER,
            Some(json!({ "status": "delivered", "present_location": "" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_expires_cookie_and_redirects() {
    let (app, _backend) = setup();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");
    let cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}
