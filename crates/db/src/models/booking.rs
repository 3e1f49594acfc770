use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use unajmi_core::booking::{AgreementFlags, BookingStatus, Party};
use unajmi_core::dates::DateRange;
use unajmi_core::error::CoreError;
use unajmi_core::types::Timestamp;

/// A booking row. Price fields are a snapshot of the item at creation
/// time; both-end-inclusive dates; the Croatian status strings are the
/// wire format (see `unajmi_core::booking`).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub item_id: Uuid,
    pub renter_id: String,
    pub owner_id: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub delivery_method: String,
    pub price_per_day_cents: i64,
    pub deposit_cents: i64,
    pub total_days: i64,
    pub total_price_cents: i64,
    pub renter_agreed: bool,
    pub owner_agreed: bool,
    pub agreed_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub returned_at: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub return_reminder_sent: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    /// Typed view of the stored status. The column has a CHECK
    /// constraint, so a parse failure means corrupted data.
    pub fn lifecycle_status(&self) -> Result<BookingStatus, CoreError> {
        BookingStatus::parse(&self.status).ok_or_else(|| {
            CoreError::Internal(format!(
                "booking {} has unknown status {:?}",
                self.id, self.status
            ))
        })
    }

    pub fn agreement_flags(&self) -> AgreementFlags {
        AgreementFlags {
            renter_agreed: self.renter_agreed,
            owner_agreed: self.owner_agreed,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// Role of `user_id` relative to this booking. Admins who are not a
    /// party act as [`Party::Admin`]; strangers get `None`.
    pub fn party_of(&self, user_id: &str, is_admin: bool) -> Option<Party> {
        if self.renter_id == user_id {
            Some(Party::Renter)
        } else if self.owner_id == user_id {
            Some(Party::Owner)
        } else if is_admin {
            Some(Party::Admin)
        } else {
            None
        }
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.renter_id == user_id || self.owner_id == user_id
    }

    /// The party across the table from `user_id`, for notifications.
    pub fn counterparty_of(&self, user_id: &str) -> Option<&str> {
        if self.renter_id == user_id {
            Some(&self.owner_id)
        } else if self.owner_id == user_id {
            Some(&self.renter_id)
        } else {
            None
        }
    }
}

/// Request body for creating a booking.
#[derive(Debug, Deserialize)]
pub struct CreateBooking {
    pub item_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub delivery_method: String,
}

/// Fully validated insert input, assembled by the API layer after the
/// item and delivery method checks have passed.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub item_id: Uuid,
    pub renter_id: String,
    pub owner_id: String,
    pub range: DateRange,
    pub delivery_method: String,
    pub price_per_day_cents: i64,
    pub deposit_cents: i64,
}
