//! Integration tests driving the real router end to end: register, book,
//! conflict, cancel, rebook.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::{routing::get, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use eventbook::config::{AppConfig, AuthConfig, BookingConfig, Config};
use eventbook::{controllers, AppState};

const ADMIN_EMAIL: &str = "admin@example.com";
const PASSWORD: &str = "correct-horse";

fn test_config() -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "error".to_string(),
        },
        booking: BookingConfig {
            seat_price: 2500,
            currency: "KZT".to_string(),
        },
        // Cost 4 is the bcrypt minimum; keeps the suite fast.
        auth: AuthConfig {
            bcrypt_cost: 4,
            admin_email: Some(ADMIN_EMAIL.to_string()),
        },
    }
}

/// Mirror the router construction in `main.rs`.
fn build_app() -> Router {
    let state = AppState::new(test_config());
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and return their token.
async fn register(app: &Router, email: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

/// Create a venue and an event as admin; returns (admin token, event id).
async fn seed_event(app: &Router, house_held: &[&str]) -> (String, String) {
    let admin = register(app, ADMIN_EMAIL).await;

    let response = send(
        app,
        Method::POST,
        "/api/venues",
        Some(&admin),
        Some(json!({ "name": "North Cinema", "address": "1 Main St" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let venue_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = send(
        app,
        Method::POST,
        "/api/events",
        Some(&admin),
        Some(json!({
            "title": "Evening Premiere",
            "description": "Opening night",
            "startAt": "2026-09-01T19:00:00Z",
            "endAt": "2026-09-01T21:00:00Z",
            "venueId": venue_id,
            "published": true,
            "houseHeldSeats": house_held,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let event_id = body_json(response).await["id"].as_str().unwrap().to_string();
    (admin, event_id)
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = build_app();
    let response = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn booking_endpoints_require_a_token() {
    let app = build_app();

    let response = send(&app, Method::GET, "/api/bookings", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, Method::GET, "/api/bookings", Some("bogus"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "unauthenticated");
}

#[tokio::test]
async fn booking_round_trip() {
    let app = build_app();
    let (_, event_id) = seed_event(&app, &[]).await;
    let guest = register(&app, "guest@example.com").await;

    let response = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&guest),
        Some(json!({ "eventId": event_id, "seats": ["A-3", "A-4"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let booking = body_json(response).await;
    assert_eq!(booking["status"], "active");
    assert_eq!(booking["totalPrice"], 5000);
    assert_eq!(booking["currency"], "KZT");
    assert_eq!(booking["seats"], json!(["A-3", "A-4"]));

    let response = send(&app, Method::GET, "/api/bookings", Some(&guest), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed["items"][0]["seats"], json!(["A-3", "A-4"]));

    let uri = format!("/api/events/{event_id}/occupied-seats");
    let response = send(&app, Method::GET, &uri, Some(&guest), None).await;
    assert_eq!(body_json(response).await["items"], json!(["A-3", "A-4"]));

    // The occupancy read is gated like every other booking operation.
    let response = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn overlapping_booking_conflicts_and_reselect_succeeds() {
    let app = build_app();
    let (_, event_id) = seed_event(&app, &[]).await;
    let u1 = register(&app, "u1@example.com").await;
    let u2 = register(&app, "u2@example.com").await;

    let response = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&u1),
        Some(json!({ "eventId": event_id, "seats": ["B-5", "B-6"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&u2),
        Some(json!({ "eventId": event_id, "seats": ["B-6", "B-7"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let err = body_json(response).await;
    assert_eq!(err["error"], "seat_conflict");
    assert_eq!(err["seats"], json!(["B-6"]));

    // Nothing partial was granted; B-7 is still free.
    let response = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&u2),
        Some(json!({ "eventId": event_id, "seats": ["B-7"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn cancel_releases_seats_for_rebooking() {
    let app = build_app();
    let (_, event_id) = seed_event(&app, &[]).await;
    let u1 = register(&app, "u1@example.com").await;
    let u3 = register(&app, "u3@example.com").await;

    let response = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&u1),
        Some(json!({ "eventId": event_id, "seats": ["B-5", "B-6"] })),
    )
    .await;
    let booking_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let uri = format!("/api/bookings/{booking_id}");
    let response = send(&app, Method::DELETE, &uri, Some(&u1), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Cancellation is one-shot, not idempotent.
    let response = send(&app, Method::DELETE, &uri, Some(&u1), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "already_cancelled");

    let uri = format!("/api/events/{event_id}/occupied-seats");
    let response = send(&app, Method::GET, &uri, Some(&u1), None).await;
    assert_eq!(body_json(response).await["items"], json!([]));

    let response = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&u3),
        Some(json!({ "eventId": event_id, "seats": ["B-5"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn strangers_cannot_cancel_but_admins_can() {
    let app = build_app();
    let (admin, event_id) = seed_event(&app, &[]).await;
    let owner = register(&app, "owner@example.com").await;
    let stranger = register(&app, "stranger@example.com").await;

    let response = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&owner),
        Some(json!({ "eventId": event_id, "seats": ["C-3"] })),
    )
    .await;
    let booking_id = body_json(response).await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/bookings/{booking_id}");

    let response = send(&app, Method::DELETE, &uri, Some(&stranger), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn seat_validation_failures() {
    let app = build_app();
    let (_, event_id) = seed_event(&app, &["A-1"]).await;
    let guest = register(&app, "guest@example.com").await;

    // House-held seat.
    let response = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&guest),
        Some(json!({ "eventId": event_id, "seats": ["A-1"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "house_held");

    // Seat outside the 6x10 default grid.
    let response = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&guest),
        Some(json!({ "eventId": event_id, "seats": ["Z-1"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"], "invalid_seat");

    // Malformed seat id and empty list are validation errors.
    for seats in [json!(["not a seat"]), json!([])] {
        let response = send(
            &app,
            Method::POST,
            "/api/bookings",
            Some(&guest),
            Some(json!({ "eventId": event_id, "seats": seats })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // The house-held seat still shows as occupied, nothing else.
    let uri = format!("/api/events/{event_id}/occupied-seats");
    let response = send(&app, Method::GET, &uri, Some(&guest), None).await;
    assert_eq!(body_json(response).await["items"], json!(["A-1"]));
}

#[tokio::test]
async fn catalog_writes_are_admin_only() {
    let app = build_app();
    let (admin, event_id) = seed_event(&app, &[]).await;
    let guest = register(&app, "guest@example.com").await;

    let response = send(
        &app,
        Method::POST,
        "/api/venues",
        Some(&guest),
        Some(json!({ "name": "South Hall", "address": "2 Side St" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Deleting the venue while the event references it is a conflict.
    let response = send(&app, Method::GET, "/api/venues", None, None).await;
    let venue_id = body_json(response).await["items"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/venues/{venue_id}");
    let response = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let uri = format!("/api/events/{event_id}");
    let response = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let uri = format!("/api/venues/{venue_id}");
    let response = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let app = build_app();
    let guest = register(&app, "guest@example.com").await;

    let response = send(&app, Method::GET, "/api/profile", Some(&guest), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], "guest@example.com");

    let response = send(&app, Method::POST, "/api/auth/logout", Some(&guest), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, "/api/profile", Some(&guest), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A fresh login works and issues a new token.
    let response = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "guest@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
