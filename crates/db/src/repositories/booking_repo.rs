use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::booking::{Booking, NewBooking};
use crate::DbPool;
use unajmi_core::booking::{self, BookingAction, BookingStatus, Party};
use unajmi_core::dates::DateRange;
use unajmi_core::error::CoreError;
use unajmi_core::types::Timestamp;

pub(crate) const COLUMNS: &str = "id, item_id, renter_id, owner_id, status, \
     start_date, end_date, delivery_method, price_per_day_cents, deposit_cents, \
     total_days, total_price_cents, renter_agreed, owner_agreed, \
     agreed_at, delivered_at, returned_at, return_reminder_sent, \
     created_at, updated_at";

/// Postgres error code raised by the `bookings_no_overlap` exclusion
/// constraint.
const EXCLUSION_VIOLATION: &str = "23P01";

#[derive(Debug)]
pub enum CreateOutcome {
    Created(Booking),
    /// The requested dates collide with a non-cancelled booking.
    Overlap,
    /// The item vanished between the caller's read and our lock.
    ItemGone,
}

#[derive(Debug)]
pub enum TransitionResult {
    Applied(AppliedTransition),
    NotFound,
    /// The state machine refused the action for the row as it existed
    /// under the lock.
    Rejected(CoreError),
}

#[derive(Debug)]
pub struct AppliedTransition {
    pub booking: Booking,
    pub previous_status: BookingStatus,
    /// True when this call completed the two-party handshake.
    pub agreement_completed: bool,
}

pub struct BookingRepo;

impl BookingRepo {
    /// Creates a booking if and only if the dates are free.
    ///
    /// The item row is locked first, which serializes concurrent
    /// attempts on the same item; the overlap check then sees every
    /// committed booking. The exclusion constraint on the table catches
    /// anything that still slips through and is reported as a plain
    /// overlap, not an internal error.
    pub async fn create(pool: &DbPool, input: &NewBooking) -> Result<CreateOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let item_lock: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM items WHERE id = $1 AND deleted_at IS NULL FOR UPDATE")
                .bind(input.item_id)
                .fetch_optional(&mut *tx)
                .await?;
        if item_lock.is_none() {
            return Ok(CreateOutcome::ItemGone);
        }

        let (conflict,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (\
                 SELECT 1 FROM bookings \
                 WHERE item_id = $1 AND status <> 'cancelled' \
                   AND start_date <= $3 AND end_date >= $2)",
        )
        .bind(input.item_id)
        .bind(input.range.start_date)
        .bind(input.range.end_date)
        .fetch_one(&mut *tx)
        .await?;
        if conflict {
            return Ok(CreateOutcome::Overlap);
        }

        let total_days = input.range.total_days();
        let total_price_cents = total_days * input.price_per_day_cents;

        let inserted = sqlx::query_as::<_, Booking>(&format!(
            "INSERT INTO bookings (id, item_id, renter_id, owner_id, status, \
                 start_date, end_date, delivery_method, price_per_day_cents, \
                 deposit_cents, total_days, total_price_cents) \
             VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(input.item_id)
        .bind(&input.renter_id)
        .bind(&input.owner_id)
        .bind(input.range.start_date)
        .bind(input.range.end_date)
        .bind(&input.delivery_method)
        .bind(input.price_per_day_cents)
        .bind(input.deposit_cents)
        .bind(total_days)
        .bind(total_price_cents)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(booking) => {
                tx.commit().await?;
                Ok(CreateOutcome::Created(booking))
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) =>
            {
                Ok(CreateOutcome::Overlap)
            }
            Err(err) => Err(err),
        }
    }

    /// Applies a lifecycle action under a row lock.
    ///
    /// The state machine runs against the locked row, not the caller's
    /// earlier read, so two racing actions serialize and the loser is
    /// judged against the winner's result.
    pub async fn transition(
        pool: &DbPool,
        booking_id: Uuid,
        action: BookingAction,
        party: Party,
        now: Timestamp,
    ) -> Result<TransitionResult, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<Booking> = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(current) = current else {
            return Ok(TransitionResult::NotFound);
        };

        let status = match current.lifecycle_status() {
            Ok(status) => status,
            Err(err) => return Ok(TransitionResult::Rejected(err)),
        };
        let outcome = match booking::apply(status, current.agreement_flags(), action, party) {
            Ok(outcome) => outcome,
            Err(err) => return Ok(TransitionResult::Rejected(err)),
        };

        let agreed_at = if outcome.agreement_completed {
            Some(now)
        } else {
            current.agreed_at
        };
        let delivered_at = if outcome.status == BookingStatus::Delivered {
            current.delivered_at.or(Some(now))
        } else {
            current.delivered_at
        };
        let returned_at = if outcome.status == BookingStatus::Returned {
            current.returned_at.or(Some(now))
        } else {
            current.returned_at
        };

        let booking = sqlx::query_as::<_, Booking>(&format!(
            "UPDATE bookings SET \
                 status = $2, renter_agreed = $3, owner_agreed = $4, \
                 agreed_at = $5, delivered_at = $6, returned_at = $7, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(booking_id)
        .bind(outcome.status.as_str())
        .bind(outcome.flags.renter_agreed)
        .bind(outcome.flags.owner_agreed)
        .bind(agreed_at)
        .bind(delivered_at)
        .bind(returned_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(TransitionResult::Applied(AppliedTransition {
            booking,
            previous_status: status,
            agreement_completed: outcome.agreement_completed,
        }))
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!("SELECT {COLUMNS} FROM bookings WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_renter(pool: &DbPool, user_id: &str) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {COLUMNS} FROM bookings WHERE renter_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_for_owner(pool: &DbPool, user_id: &str) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {COLUMNS} FROM bookings WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Date ranges occupied by non-cancelled bookings of an item,
    /// oldest first. The caller merges them for the public calendar.
    pub async fn booked_ranges(
        pool: &DbPool,
        item_id: Uuid,
    ) -> Result<Vec<DateRange>, sqlx::Error> {
        let rows: Vec<(NaiveDate, NaiveDate)> = sqlx::query_as(
            "SELECT start_date, end_date FROM bookings \
             WHERE item_id = $1 AND status <> 'cancelled' \
             ORDER BY start_date",
        )
        .bind(item_id)
        .fetch_all(pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(start_date, end_date)| DateRange {
                start_date,
                end_date,
            })
            .collect())
    }

    /// Delivered bookings not yet reminded whose rental window ends on
    /// or before `cutoff`. Passing tomorrow's date catches everything
    /// ending within the next day plus anything a missed sweep left
    /// behind.
    pub async fn due_return_reminders(
        pool: &DbPool,
        cutoff: NaiveDate,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {COLUMNS} FROM bookings \
             WHERE status = 'isporucen' AND NOT return_reminder_sent AND end_date <= $1 \
             ORDER BY end_date"
        ))
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }

    /// Marks the reminder as sent. Returns false when another sweep got
    /// there first; the caller must then skip the notification.
    pub async fn claim_return_reminder(pool: &DbPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bookings SET return_reminder_sent = TRUE, updated_at = NOW() \
             WHERE id = $1 AND NOT return_reminder_sent",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
