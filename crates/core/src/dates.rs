//! Inclusive date-range arithmetic for bookings and availability.
//!
//! A booking for `2025-07-10 .. 2025-07-12` occupies three days and the
//! item cannot be handed over to anyone else on the 12th. Every range in
//! the system is inclusive on both ends; there are no half-open ranges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting `end < start`. A single-day rental
    /// (`start == end`) is valid.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, CoreError> {
        if end_date < start_date {
            return Err(CoreError::Validation(format!(
                "end date {end_date} is before start date {start_date}"
            )));
        }
        Ok(DateRange {
            start_date,
            end_date,
        })
    }

    /// Number of calendar days covered, counting both endpoints.
    pub fn total_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// True when the two ranges share at least one day.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start_date <= other.end_date && self.end_date >= other.start_date
    }

    /// True when `other` lies entirely within this range.
    pub fn contains(&self, other: &DateRange) -> bool {
        self.start_date <= other.start_date && other.end_date <= self.end_date
    }
}

/// Collapses ranges into a minimal sorted set covering the same days.
/// Overlapping and back-to-back ranges (`..=12` followed by `13..`)
/// merge, since the covered day set is contiguous either way.
pub fn merge_ranges(mut ranges: Vec<DateRange>) -> Vec<DateRange> {
    if ranges.is_empty() {
        return ranges;
    }
    ranges.sort_by_key(|r| (r.start_date, r.end_date));

    let mut merged: Vec<DateRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start_date <= last.end_date + chrono::Days::new(1) => {
                if range.end_date > last.end_date {
                    last.end_date = range.end_date;
                }
            }
            _ => merged.push(range),
        }
    }
    merged
}
