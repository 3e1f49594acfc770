use crate::models::plan::Plan;
use crate::models::profile::{Profile, UpdateProfile};
use crate::DbPool;
use unajmi_core::plans;
use unajmi_core::types::Timestamp;

pub(crate) const COLUMNS: &str = "user_id, email, display_name, plan_id, plan_activated_at, \
     plan_expires_at, has_badge, badge_label, default_dashboard_mode, is_superadmin, \
     created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    /// Upserts the profile for a subject on every authenticated request.
    /// New users land on the free plan; email and display name refresh
    /// from the token when present so stale claims never blank them.
    pub async fn ensure(
        pool: &DbPool,
        user_id: &str,
        email: Option<&str>,
        display_name: Option<&str>,
    ) -> Result<Profile, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (user_id, email, display_name, plan_id) \
             VALUES ($1, $2, $3, (SELECT id FROM plans WHERE slug = $4)) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 email = COALESCE(EXCLUDED.email, profiles.email), \
                 display_name = COALESCE(EXCLUDED.display_name, profiles.display_name), \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(email)
        .bind(display_name)
        .bind(plans::FREE)
        .fetch_one(pool)
        .await
    }

    pub async fn find(pool: &DbPool, user_id: &str) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn update_settings(
        pool: &DbPool,
        user_id: &str,
        update: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET \
                 display_name = COALESCE($2, display_name), \
                 default_dashboard_mode = COALESCE($3, default_dashboard_mode), \
                 updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(update.display_name.as_deref())
        .bind(update.default_dashboard_mode.as_deref())
        .fetch_optional(pool)
        .await
    }

    /// Puts a user on `plan`, snapshotting the badge flag. Used by admin
    /// grants; promo redemption does the same inside its own transaction.
    pub async fn set_plan(
        pool: &DbPool,
        user_id: &str,
        plan: &Plan,
        expires_at: Option<Timestamp>,
    ) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET \
                 plan_id = $2, plan_activated_at = NOW(), plan_expires_at = $3, \
                 has_badge = $4, badge_label = $5, updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(plan.id)
        .bind(expires_at)
        .bind(plan.has_badge)
        .bind(plan.badge_label.as_deref())
        .fetch_optional(pool)
        .await
    }

    pub async fn is_superadmin(pool: &DbPool, user_id: &str) -> Result<bool, sqlx::Error> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT is_superadmin FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(flag,)| flag).unwrap_or(false))
    }
}
