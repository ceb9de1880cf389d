//! End-to-end booking flows over the HTTP API.

mod helpers;

use helpers::{day_window, TestApp};
use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_hold_lifecycle() {
    let mut app = TestApp::new();
    let asset = Uuid::new_v4();
    let holder = Uuid::new_v4();
    let (start, end) = day_window(10, 13);

    // Place a hold with a rate so the response carries a quote.
    let (status, body) = app
        .post(
            "/api/bookings/hold",
            json!({
                "asset_id": asset,
                "holder_id": holder,
                "start_at": start,
                "end_at": end,
                "rate_per_day_minor": 150000,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let booking = &body["data"]["booking"];
    assert_eq!(booking["state"], "pending");
    assert!(booking["correlation_id"].is_string());
    assert!(booking["expires_at"].is_string());
    assert_eq!(body["data"]["quote"]["days"], 3);
    assert_eq!(body["data"]["quote"]["amount_minor"], 450000);

    // The held window is now blocked.
    let (status, body) = app
        .get(&format!(
            "/api/assets/{asset}/availability?start_at={}&end_at={}",
            start.to_rfc3339().replace('+', "%2B"),
            end.to_rfc3339().replace('+', "%2B"),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["conflicts"].as_array().unwrap().len(), 1);

    // Cancel it; the window frees up.
    let id = booking["id"].as_str().unwrap().to_string();
    let (status, body) = app
        .post(
            &format!("/api/bookings/{id}/cancel"),
            json!({ "holder_id": holder }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "cancelled");

    let (status, _) = app
        .post(
            "/api/bookings/hold",
            json!({
                "asset_id": asset,
                "holder_id": Uuid::new_v4(),
                "start_at": start,
                "end_at": end,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let events = app.drain_events();
    assert_eq!(events.len(), 1); // only the cancellation
}

#[tokio::test]
async fn test_overlapping_hold_conflicts() {
    let app = TestApp::new();
    let asset = Uuid::new_v4();
    let (start, end) = day_window(10, 13);

    let (status, _) = app
        .post(
            "/api/bookings/hold",
            json!({
                "asset_id": asset,
                "holder_id": Uuid::new_v4(),
                "start_at": start,
                "end_at": end,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (overlap_start, overlap_end) = day_window(12, 15);
    let (status, body) = app
        .post(
            "/api/bookings/hold",
            json!({
                "asset_id": asset,
                "holder_id": Uuid::new_v4(),
                "start_at": overlap_start,
                "end_at": overlap_end,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "SLOT_UNAVAILABLE");

    // Back-to-back is not an overlap: [10,13) then [13,15).
    let (adjacent_start, adjacent_end) = day_window(13, 15);
    let (status, _) = app
        .post(
            "/api/bookings/hold",
            json!({
                "asset_id": asset,
                "holder_id": Uuid::new_v4(),
                "start_at": adjacent_start,
                "end_at": adjacent_end,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_staff_booking_and_holder_listing() {
    let app = TestApp::new();
    let asset = Uuid::new_v4();
    let holder = Uuid::new_v4();
    let (start, end) = day_window(20, 22);

    let (status, body) = app
        .post(
            "/api/bookings",
            json!({
                "asset_id": asset,
                "holder_id": holder,
                "start_at": start,
                "end_at": end,
                "payment_ref": "cash-0042",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["state"], "confirmed");
    assert_eq!(body["data"]["payment_ref"], "cash-0042");
    assert!(body["data"]["expires_at"].is_null());

    let (status, body) = app.get(&format!("/api/bookings?holder_id={holder}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .get(&format!("/api/bookings?holder_id={}", Uuid::new_v4()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_window_validation() {
    let app = TestApp::new();
    let (start, end) = day_window(13, 10);

    let (status, body) = app
        .post(
            "/api/bookings/hold",
            json!({
                "asset_id": Uuid::new_v4(),
                "holder_id": Uuid::new_v4(),
                "start_at": start,
                "end_at": end,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_cancel_authorization() {
    let app = TestApp::new();
    let holder = Uuid::new_v4();
    let (start, end) = day_window(10, 12);

    let (_, body) = app
        .post(
            "/api/bookings/hold",
            json!({
                "asset_id": Uuid::new_v4(),
                "holder_id": holder,
                "start_at": start,
                "end_at": end,
            }),
        )
        .await;
    let id = body["data"]["booking"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            &format!("/api/bookings/{id}/cancel"),
            json!({ "holder_id": Uuid::new_v4() }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, _) = app
        .post(
            &format!("/api/bookings/{}/cancel", Uuid::new_v4()),
            json!({ "holder_id": holder }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_holds_single_winner() {
    let app = TestApp::new();
    let asset = fleetbook_core::types::AssetId::new();
    let (start, end) = day_window(10, 12);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let reservations = app.reservations.clone();
        handles.push(tokio::spawn(async move {
            reservations
                .create_hold(
                    asset,
                    fleetbook_core::types::HolderId::new(),
                    start,
                    end,
                    chrono::Duration::minutes(30),
                )
                .await
        }));
    }

    let mut winners = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => {
                assert_eq!(e.kind, fleetbook_core::error::ErrorKind::SlotUnavailable);
                conflicts += 1;
            }
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(conflicts, 7);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}
