use chrono::Days;

use crate::models::plan::Plan;
use crate::models::profile::Profile;
use crate::models::promo_code::PromoCode;
use crate::repositories::{plan_repo, profile_repo};
use crate::DbPool;
use unajmi_core::types::{DbId, Timestamp};

pub(crate) const COLUMNS: &str = "id, code, plan_id, duration_months, valid_until, \
     used_by, used_at, created_by, created_at";

#[derive(Debug)]
pub enum RedeemOutcome {
    Redeemed {
        plan: Plan,
        profile: Profile,
    },
    NotFound,
    /// Checked before expiry, so a used-up code always reads as used.
    AlreadyUsed,
    Expired,
}

pub struct PromoCodeRepo;

impl PromoCodeRepo {
    /// Inserts a code. A duplicate code surfaces as the unique-violation
    /// database error; the caller decides whether to retry or report.
    pub async fn create(
        pool: &DbPool,
        code: &str,
        plan_id: DbId,
        duration_months: Option<i32>,
        valid_until: Timestamp,
        created_by: &str,
    ) -> Result<PromoCode, sqlx::Error> {
        sqlx::query_as::<_, PromoCode>(&format!(
            "INSERT INTO promo_codes (code, plan_id, duration_months, valid_until, created_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(code)
        .bind(plan_id)
        .bind(duration_months)
        .bind(valid_until)
        .bind(created_by)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &DbPool) -> Result<Vec<PromoCode>, sqlx::Error> {
        sqlx::query_as::<_, PromoCode>(&format!(
            "SELECT {COLUMNS} FROM promo_codes ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    /// Burns a code and applies its plan to the redeeming user, all
    /// under a row lock so a code can never be spent twice. The checks
    /// run in a fixed order: existence, then used, then expired.
    pub async fn redeem(
        pool: &DbPool,
        code: &str,
        user_id: &str,
        now: Timestamp,
    ) -> Result<RedeemOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let promo: Option<PromoCode> = sqlx::query_as::<_, PromoCode>(&format!(
            "SELECT {COLUMNS} FROM promo_codes WHERE code = $1 FOR UPDATE"
        ))
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(promo) = promo else {
            return Ok(RedeemOutcome::NotFound);
        };

        if promo.used_by.is_some() {
            return Ok(RedeemOutcome::AlreadyUsed);
        }
        if promo.valid_until <= now {
            return Ok(RedeemOutcome::Expired);
        }

        let plan: Plan = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {columns} FROM plans WHERE id = $1",
            columns = plan_repo::COLUMNS
        ))
        .bind(promo.plan_id)
        .fetch_one(&mut *tx)
        .await?;

        // duration_months > 0 is a table constraint; months are billed
        // as 30-day blocks.
        let expires_at = match promo.duration_months {
            None => None,
            Some(months) => now.checked_add_days(Days::new(30 * months.max(1) as u64)),
        };

        sqlx::query("UPDATE promo_codes SET used_by = $2, used_at = $3 WHERE id = $1")
            .bind(promo.id)
            .bind(user_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        let profile: Profile = sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET \
                 plan_id = $2, plan_activated_at = $3, plan_expires_at = $4, \
                 has_badge = $5, badge_label = $6, updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {columns}",
            columns = profile_repo::COLUMNS
        ))
        .bind(user_id)
        .bind(plan.id)
        .bind(now)
        .bind(expires_at)
        .bind(plan.has_badge)
        .bind(plan.badge_label.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(RedeemOutcome::Redeemed { plan, profile })
    }
}
