//! Repository-level tests for booking creation: the transactional
//! overlap check and the exclusion constraint behind it.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use unajmi_core::booking::{BookingAction, Party};
use unajmi_core::dates::DateRange;
use unajmi_db::models::booking::NewBooking;
use unajmi_db::models::item::{CreateItem, Item};
use unajmi_db::repositories::booking_repo::{BookingRepo, CreateOutcome, TransitionResult};
use unajmi_db::repositories::item_repo::ItemRepo;
use unajmi_db::repositories::profile_repo::ProfileRepo;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 7, d).unwrap()
}

async fn seed_user(pool: &PgPool, user_id: &str) {
    ProfileRepo::ensure(pool, user_id, None, None).await.unwrap();
}

async fn seed_item(pool: &PgPool, owner: &str) -> Item {
    seed_user(pool, owner).await;
    let input = CreateItem {
        title: "Scaffolding tower".to_string(),
        description: String::new(),
        category: "tools".to_string(),
        price_per_day_cents: 700,
        deposit_cents: 10_000,
        delivery_methods: vec!["pickup".to_string()],
        image_ids: vec![],
        slots: vec![],
    };
    ItemRepo::create(pool, owner, &input).await.unwrap()
}

fn booking(item: &Item, renter: &str, start: u32, end: u32) -> NewBooking {
    NewBooking {
        item_id: item.id,
        renter_id: renter.to_string(),
        owner_id: item.owner_id.clone(),
        range: DateRange::new(day(start), day(end)).unwrap(),
        delivery_method: "pickup".to_string(),
        price_per_day_cents: item.price_per_day_cents,
        deposit_cents: item.deposit_cents,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_detects_overlap_inside_the_transaction(pool: PgPool) {
    let item = seed_item(&pool, "owner-1").await;
    seed_user(&pool, "renter-1").await;
    seed_user(&pool, "renter-2").await;

    let first = BookingRepo::create(&pool, &booking(&item, "renter-1", 10, 14))
        .await
        .unwrap();
    let first = assert_matches!(first, CreateOutcome::Created(b) => b);
    assert_eq!(first.total_days, 5);
    assert_eq!(first.total_price_cents, 3500);

    // Sharing even one day collides.
    let outcome = BookingRepo::create(&pool, &booking(&item, "renter-2", 14, 18))
        .await
        .unwrap();
    assert_matches!(outcome, CreateOutcome::Overlap);

    let outcome = BookingRepo::create(&pool, &booking(&item, "renter-2", 15, 18))
        .await
        .unwrap();
    assert_matches!(outcome, CreateOutcome::Created(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelled_rows_release_their_dates(pool: PgPool) {
    let item = seed_item(&pool, "owner-1").await;
    seed_user(&pool, "renter-1").await;
    seed_user(&pool, "renter-2").await;

    let outcome = BookingRepo::create(&pool, &booking(&item, "renter-1", 1, 5))
        .await
        .unwrap();
    let created = assert_matches!(outcome, CreateOutcome::Created(b) => b);

    let result = BookingRepo::transition(
        &pool,
        created.id,
        BookingAction::Cancel,
        Party::Renter,
        chrono::Utc::now(),
    )
    .await
    .unwrap();
    assert_matches!(result, TransitionResult::Applied(_));

    let outcome = BookingRepo::create(&pool, &booking(&item, "renter-2", 1, 5))
        .await
        .unwrap();
    assert_matches!(outcome, CreateOutcome::Created(_));
}

/// Writers that bypass the repository still cannot double-book: the
/// exclusion constraint is the last line of defence.
#[sqlx::test(migrations = "../../db/migrations")]
async fn exclusion_constraint_backstops_raw_inserts(pool: PgPool) {
    let item = seed_item(&pool, "owner-1").await;
    seed_user(&pool, "renter-1").await;
    seed_user(&pool, "renter-2").await;

    let outcome = BookingRepo::create(&pool, &booking(&item, "renter-1", 10, 14))
        .await
        .unwrap();
    assert_matches!(outcome, CreateOutcome::Created(_));

    let result = sqlx::query(
        "INSERT INTO bookings (id, item_id, renter_id, owner_id, status, \
             start_date, end_date, delivery_method, price_per_day_cents, \
             deposit_cents, total_days, total_price_cents) \
         VALUES ($1, $2, 'renter-2', $3, 'pending', $4, $5, 'pickup', 700, 10000, 3, 2100)",
    )
    .bind(Uuid::new_v4())
    .bind(item.id)
    .bind(&item.owner_id)
    .bind(day(12))
    .bind(day(14))
    .execute(&pool)
    .await;

    let err = result.unwrap_err();
    let db_err = assert_matches!(&err, sqlx::Error::Database(e) => e);
    assert_eq!(db_err.code().as_deref(), Some("23P01"));
    assert_eq!(db_err.constraint(), Some("bookings_no_overlap"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_reports_a_vanished_item(pool: PgPool) {
    let item = seed_item(&pool, "owner-1").await;
    seed_user(&pool, "renter-1").await;
    ItemRepo::soft_delete(&pool, item.id).await.unwrap();

    let outcome = BookingRepo::create(&pool, &booking(&item, "renter-1", 1, 3))
        .await
        .unwrap();
    assert_matches!(outcome, CreateOutcome::ItemGone);
}
