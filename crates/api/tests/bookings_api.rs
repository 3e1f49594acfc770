//! HTTP-level integration tests for the booking lifecycle: creation
//! with conflict detection, the approve/agree/deliver/return chain,
//! cancellation and party authorization.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_booking, create_test_item, days_from_today, get_auth, make_superadmin,
    mint_token, post_auth, post_json_auth,
};
use sqlx::PgPool;

/// Kinds of the caller's notifications, newest first.
async fn notification_kinds(app: &axum::Router, token: &str) -> Vec<String> {
    let response = get_auth(app, "/api/v1/notifications", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["kind"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// A new booking snapshots the item's pricing so later listing edits
/// cannot change what was agreed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn create_booking_snapshots_item_price(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Cordless drill").await;

    let body = serde_json::json!({
        "item_id": item,
        "start_date": days_from_today(1),
        "end_date": days_from_today(3),
        "delivery_method": "pickup",
    });
    let response = post_json_auth(&app, "/api/v1/bookings", &renter, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let booking = &json["data"];
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["renter_id"], "renter-1");
    assert_eq!(booking["owner_id"], "owner-1");
    assert_eq!(booking["price_per_day_cents"], 500);
    assert_eq!(booking["deposit_cents"], 2000);
    // Both endpoints count, so 3 days.
    assert_eq!(booking["total_days"], 3);
    assert_eq!(booking["total_price_cents"], 1500);
    assert_eq!(booking["renter_agreed"], false);
    assert_eq!(booking["owner_agreed"], false);
    assert!(booking["agreed_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_booking_rejects_own_item(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");

    let item = create_test_item(&app, &owner, "Tile cutter").await;

    let body = serde_json::json!({
        "item_id": item,
        "start_date": days_from_today(1),
        "end_date": days_from_today(2),
        "delivery_method": "pickup",
    });
    let response = post_json_auth(&app, "/api/v1/bookings", &owner, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_booking_rejects_unoffered_delivery_method(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Camping stove").await;

    let body = serde_json::json!({
        "item_id": item,
        "start_date": days_from_today(1),
        "end_date": days_from_today(2),
        "delivery_method": "courier",
    });
    let response = post_json_auth(&app, "/api/v1/bookings", &renter, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_booking_rejects_reversed_dates(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Snowboard").await;

    let body = serde_json::json!({
        "item_id": item,
        "start_date": days_from_today(5),
        "end_date": days_from_today(2),
        "delivery_method": "pickup",
    });
    let response = post_json_auth(&app, "/api/v1/bookings", &renter, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_booking_for_unknown_item_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let renter = mint_token("renter-1");

    let body = serde_json::json!({
        "item_id": uuid::Uuid::new_v4(),
        "start_date": days_from_today(1),
        "end_date": days_from_today(2),
        "delivery_method": "pickup",
    });
    let response = post_json_auth(&app, "/api/v1/bookings", &renter, body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Date conflicts
// ---------------------------------------------------------------------------

/// Overlap is inclusive on both ends: sharing a single day is already a
/// conflict.
#[sqlx::test(migrations = "../../db/migrations")]
async fn overlapping_booking_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let first = mint_token("renter-1");
    let second = mint_token("renter-2");

    let item = create_test_item(&app, &owner, "Party tent").await;
    create_test_booking(&app, &first, &item, 1, 5).await;

    let body = serde_json::json!({
        "item_id": item,
        "start_date": days_from_today(5),
        "end_date": days_from_today(8),
        "delivery_method": "pickup",
    });
    let response = post_json_auth(&app, "/api/v1/bookings", &second, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");

    // The day after the existing booking ends is free.
    create_test_booking(&app, &second, &item, 6, 8).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelled_booking_frees_the_window(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let first = mint_token("renter-1");
    let second = mint_token("renter-2");

    let item = create_test_item(&app, &owner, "Sound system").await;
    let booking = create_test_booking(&app, &first, &item, 1, 4).await;

    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/cancel"), &first).await;
    assert_eq!(response.status(), StatusCode::OK);

    create_test_booking(&app, &second, &item, 1, 4).await;
}

// ---------------------------------------------------------------------------
// Approval
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_approves_and_renter_is_notified(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Rowing machine").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;

    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/approve"), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "confirmed");

    let kinds = notification_kinds(&app, &renter).await;
    assert!(kinds.contains(&"booking_approved".to_string()), "{kinds:?}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn renter_cannot_approve(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Mountain bike").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;

    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/approve"), &renter).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approve_is_not_repeatable(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Chainsaw").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;

    let url = format!("/api/v1/bookings/{booking}/approve");
    let response = post_auth(&app, &url, &owner).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_auth(&app, &url, &owner).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reject_cancels_the_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Electric scooter").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;

    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/reject"), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "cancelled");

    let kinds = notification_kinds(&app, &renter).await;
    assert!(kinds.contains(&"booking_rejected".to_string()), "{kinds:?}");
}

// ---------------------------------------------------------------------------
// Handover handshake
// ---------------------------------------------------------------------------

/// Each side records agreement independently; the status advances only
/// when the second one lands, in either order.
#[sqlx::test(migrations = "../../db/migrations")]
async fn handshake_completes_in_either_order(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Trailer").await;

    for (first, second) in [(&renter, &owner), (&owner, &renter)] {
        let window = if first == &renter { (1, 2) } else { (4, 5) };
        let booking = create_test_booking(&app, &renter, &item, window.0, window.1).await;
        let approve = format!("/api/v1/bookings/{booking}/approve");
        let agree = format!("/api/v1/bookings/{booking}/agree");

        let response = post_auth(&app, &approve, &owner).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = post_auth(&app, &agree, first).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "confirmed");
        assert!(json["data"]["agreed_at"].is_null());

        let response = post_auth(&app, &agree, second).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "nije_isporucen");
        assert_eq!(json["data"]["renter_agreed"], true);
        assert_eq!(json["data"]["owner_agreed"], true);
        assert!(!json["data"]["agreed_at"].is_null());
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_agree_by_same_party_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Ski set").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;

    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/approve"), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);

    let agree = format!("/api/v1/bookings/{booking}/agree");
    post_auth(&app, &agree, &renter).await;
    let response = post_auth(&app, &agree, &renter).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "confirmed");
    assert_eq!(json["data"]["renter_agreed"], true);
    assert_eq!(json["data"]["owner_agreed"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn agree_requires_an_approved_booking(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Lawn mower").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;

    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/agree"), &renter).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

// ---------------------------------------------------------------------------
// Delivery and return
// ---------------------------------------------------------------------------

/// The physical handover can outpace the in-app handshake, so deliver
/// works straight from confirmed as well as after both agreed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_delivers_with_or_without_handshake(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Pressure washer").await;

    // Straight from confirmed.
    let booking = create_test_booking(&app, &renter, &item, 1, 2).await;
    post_auth(&app, &format!("/api/v1/bookings/{booking}/approve"), &owner).await;
    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/deliver"), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "isporucen");
    assert!(!json["data"]["delivered_at"].is_null());

    // After the full handshake.
    let booking = create_test_booking(&app, &renter, &item, 4, 5).await;
    post_auth(&app, &format!("/api/v1/bookings/{booking}/approve"), &owner).await;
    post_auth(&app, &format!("/api/v1/bookings/{booking}/agree"), &renter).await;
    post_auth(&app, &format!("/api/v1/bookings/{booking}/agree"), &owner).await;
    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/deliver"), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "isporucen");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn renter_cannot_deliver_or_return(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Projector").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;
    post_auth(&app, &format!("/api/v1/bookings/{booking}/approve"), &owner).await;

    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/deliver"), &renter).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    post_auth(&app, &format!("/api/v1/bookings/{booking}/deliver"), &owner).await;
    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/return"), &renter).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_marks_return_and_booking_completes(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Gazebo").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;
    post_auth(&app, &format!("/api/v1/bookings/{booking}/approve"), &owner).await;
    post_auth(&app, &format!("/api/v1/bookings/{booking}/deliver"), &owner).await;

    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/return"), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "vracen");
    assert!(!json["data"]["returned_at"].is_null());

    let kinds = notification_kinds(&app, &renter).await;
    assert!(kinds.contains(&"booking_returned".to_string()), "{kinds:?}");
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_is_rejected_once_delivered(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Generator").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;
    post_auth(&app, &format!("/api/v1/bookings/{booking}/approve"), &owner).await;
    post_auth(&app, &format!("/api/v1/bookings/{booking}/deliver"), &owner).await;

    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/cancel"), &renter).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn terminal_booking_rejects_every_action(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Hedge trimmer").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;
    post_auth(&app, &format!("/api/v1/bookings/{booking}/cancel"), &renter).await;

    for action in ["approve", "reject", "deliver", "return", "cancel"] {
        let response =
            post_auth(&app, &format!("/api/v1/bookings/{booking}/{action}"), &owner).await;
        assert_eq!(response.status(), StatusCode::CONFLICT, "action {action}");
    }
    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/agree"), &renter).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// An admin cancelling on behalf of support notifies both sides, since
/// neither of them acted.
#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_cancel_notifies_both_parties(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");
    make_superadmin(&pool, "admin-1").await;
    let admin = mint_token("admin-1");

    let item = create_test_item(&app, &owner, "Inflatable castle").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;

    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/cancel"), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);

    let renter_kinds = notification_kinds(&app, &renter).await;
    assert!(renter_kinds.contains(&"booking_cancelled".to_string()));
    let owner_kinds = notification_kinds(&app, &owner).await;
    assert!(owner_kinds.contains(&"booking_cancelled".to_string()));
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn stranger_cannot_view_or_act_on_booking(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");
    let stranger = mint_token("stranger-1");

    let item = create_test_item(&app, &owner, "Stand mixer").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;

    let url = format!("/api/v1/bookings/{booking}");
    let response = get_auth(&app, &url, &stranger).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_auth(&app, &format!("{url}/cancel"), &stranger).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The parties themselves can read it.
    let response = get_auth(&app, &url, &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_auth(&app, &url, &renter).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_action_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Table saw").await;
    let booking = create_test_booking(&app, &renter, &item, 1, 3).await;

    let response = post_auth(&app, &format!("/api/v1/bookings/{booking}/snooze"), &renter).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn my_bookings_filters_by_role(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = mint_token("owner-1");
    let renter = mint_token("renter-1");

    let item = create_test_item(&app, &owner, "Carpet cleaner").await;
    create_test_booking(&app, &renter, &item, 1, 3).await;

    let response = get_auth(&app, "/api/v1/bookings", &renter).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // The owner has no outgoing requests, only an incoming one.
    let response = get_auth(&app, "/api/v1/bookings", &owner).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    let response = get_auth(&app, "/api/v1/bookings?role=owner", &owner).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get_auth(&app, "/api/v1/bookings?role=czar", &owner).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
