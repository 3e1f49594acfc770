pub mod admin;
pub mod bookings;
pub mod health;
pub mod items;
pub mod me;
pub mod media;
pub mod notifications;
pub mod plans;
pub mod promo;
pub mod reviews;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /items                                   list, create
/// /items/mine                              caller's listings
/// /items/by-short-id/{short_id}            shareable-link lookup
/// /items/{id}                              get, update, soft delete
/// /items/{id}/booked-ranges                merged availability view
/// /items/{id}/reviews                      reviews left on the item
///
/// /bookings                                list (?role), create
/// /bookings/{id}                           get (parties + admin)
/// /bookings/{id}/{action}                  approve|reject|agree|deliver|return|cancel
/// /bookings/{id}/reviews                   list, create (after return)
/// /bookings/{id}/messages                  thread list, send
/// /bookings/{id}/block                     block (POST), unblock (DELETE)
///
/// /users/{user_id}/reviews                 reviews a user has received
///
/// /notifications                           list, delete-all
/// /notifications/unread-count              badge counter
/// /notifications/read-all                  mark all read (POST)
/// /notifications/{id}/read                 mark one read (POST)
///
/// /plans                                   public catalog
/// /me/plan                                 effective plan + quota headroom
/// /me/profile                              get, update (lazy creation)
///
/// /promo-codes/redeem                      burn a code (POST)
///
/// /media/upload-url                        issue an upload ticket (POST)
/// /media/{media_id}                        upload bytes (PUT)
///
/// /admin/promo-codes                       list, mint (superadmin)
/// /admin/profiles/{user_id}/plan           direct plan grant (superadmin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Listings, availability and item-scoped reviews.
        .nest("/items", items::router())
        // Booking lifecycle plus its nested reviews, chat and blocks.
        .nest("/bookings", bookings::router())
        // Public reputation feed.
        .nest("/users", reviews::user_router())
        // In-app notification inbox.
        .nest("/notifications", notifications::router())
        // Public plan catalog.
        .nest("/plans", plans::router())
        // The caller's own profile and plan standing.
        .nest("/me", me::router())
        // Promo code redemption.
        .nest("/promo-codes", promo::router())
        // Listing photo uploads.
        .nest("/media", media::router())
        // Superadmin surface.
        .nest("/admin", admin::router())
}
