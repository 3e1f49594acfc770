//! Schema bootstrap tests: migrations, seed data and lazy profile
//! provisioning.

use sqlx::PgPool;

use unajmi_db::repositories::plan_repo::PlanRepo;
use unajmi_db::repositories::profile_repo::ProfileRepo;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_succeeds_on_migrated_database(pool: PgPool) {
    unajmi_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn migrations_seed_the_plan_catalog(pool: PgPool) {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plans")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total, 5);

    // Hidden tiers stay out of the public catalog.
    let public = PlanRepo::list_public(&pool).await.unwrap();
    let slugs: Vec<&str> = public.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["free", "starter", "ultimate"]);

    let free = PlanRepo::free_plan(&pool).await.unwrap();
    assert_eq!(free.max_listings, 3);
    assert_eq!(free.price_cents, 0);
    assert!(!free.has_badge);
    assert_eq!(free.allowed_delivery_methods, ["pickup"]);

    // Paid tiers unlock shipping and the profile badge.
    let ultimate = PlanRepo::find_by_slug(&pool, "ultimate").await.unwrap().unwrap();
    assert_eq!(ultimate.max_listings, -1);
    assert_eq!(
        ultimate.allowed_delivery_methods,
        ["pickup", "courier", "post"]
    );
    assert!(ultimate.has_badge);
    assert_eq!(ultimate.badge_label.as_deref(), Some("PRO"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ensure_provisions_once_and_keeps_details(pool: PgPool) {
    let first = ProfileRepo::ensure(&pool, "user-1", Some("ana@example.com"), Some("Ana"))
        .await
        .unwrap();
    assert_eq!(first.email.as_deref(), Some("ana@example.com"));
    assert!(!first.is_superadmin);

    // A later login without claims must not wipe what we know.
    let second = ProfileRepo::ensure(&pool, "user-1", None, None).await.unwrap();
    assert_eq!(second.email.as_deref(), Some("ana@example.com"));
    assert_eq!(second.display_name.as_deref(), Some("Ana"));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // New profiles start on the free tier.
    let free = PlanRepo::free_plan(&pool).await.unwrap();
    assert_eq!(first.plan_id, free.id);
    assert!(first.plan_expires_at.is_none());
}
