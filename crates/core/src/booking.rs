//! Booking lifecycle state machine.
//!
//! A booking moves through:
//!
//! ```text
//! pending -> confirmed -> nije_isporucen -> isporucen -> vracen
//!    |           |              |               |
//!    +-----------+--------------+            (no cancel)
//!                cancel / reject
//! ```
//!
//! The `confirmed -> nije_isporucen` edge is a two-party handshake:
//! each side records agreement independently and the status advances
//! only once both flags are set. All decisions here are pure; callers
//! re-run them inside a transaction on the row they locked.
//!
//! The delivery-phase statuses go over the wire in Croatian; renaming
//! them would break deployed clients.

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    /// Created by the renter, awaiting the owner's decision.
    Pending,
    /// Approved by the owner, handshake not yet complete.
    Confirmed,
    /// Both parties agreed; item not yet handed over.
    AwaitingDelivery,
    /// Item is with the renter.
    Delivered,
    /// Item is back with the owner. Terminal.
    Returned,
    /// Rejected, withdrawn or cancelled. Terminal.
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::AwaitingDelivery,
        BookingStatus::Delivered,
        BookingStatus::Returned,
        BookingStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::AwaitingDelivery => "nije_isporucen",
            BookingStatus::Delivered => "isporucen",
            BookingStatus::Returned => "vracen",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == value)
    }

    /// Terminal statuses accept no further actions.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Returned | BookingStatus::Cancelled)
    }

    /// Statuses from which a booking can still be called off without
    /// physical consequences (the item has not changed hands yet).
    pub const fn is_pre_delivery(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::AwaitingDelivery
        )
    }

    /// Statuses that keep the booked dates occupied.
    pub const fn blocks_availability(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle actions, named after the URL segments that trigger them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Approve,
    Reject,
    Agree,
    Deliver,
    Return,
    Cancel,
}

impl BookingAction {
    pub const ALL: [BookingAction; 6] = [
        BookingAction::Approve,
        BookingAction::Reject,
        BookingAction::Agree,
        BookingAction::Deliver,
        BookingAction::Return,
        BookingAction::Cancel,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingAction::Approve => "approve",
            BookingAction::Reject => "reject",
            BookingAction::Agree => "agree",
            BookingAction::Deliver => "deliver",
            BookingAction::Return => "return",
            BookingAction::Cancel => "cancel",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == value)
    }
}

impl std::fmt::Display for BookingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is performing an action, relative to the booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Renter,
    Owner,
    Admin,
}

impl Party {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Party::Renter => "renter",
            Party::Owner => "owner",
            Party::Admin => "admin",
        }
    }
}

/// Checks that `party` is allowed to perform `action` at all,
/// independent of the booking's current status.
///
/// Owners decide on requests and confirm physical handovers; agreement
/// belongs to the two parties only; cancellation is open to everyone
/// including admins.
pub fn authorize(action: BookingAction, party: Party) -> Result<(), CoreError> {
    let allowed = match action {
        BookingAction::Approve
        | BookingAction::Reject
        | BookingAction::Deliver
        | BookingAction::Return => matches!(party, Party::Owner),
        BookingAction::Agree => matches!(party, Party::Renter | Party::Owner),
        BookingAction::Cancel => true,
    };
    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "{} may not {} this booking",
            party.as_str(),
            action
        )))
    }
}

/// Per-party agreement flags for the confirmed -> nije_isporucen handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgreementFlags {
    pub renter_agreed: bool,
    pub owner_agreed: bool,
}

impl AgreementFlags {
    pub const fn both(&self) -> bool {
        self.renter_agreed && self.owner_agreed
    }
}

/// Result of applying an action to a booking's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub status: BookingStatus,
    pub flags: AgreementFlags,
    /// True on the call where the second party agreed; tells the caller
    /// to stamp `agreed_at`.
    pub agreement_completed: bool,
}

/// Applies `action` to a booking in `status` with the given agreement
/// flags. Authorization is checked first so a forbidden caller learns
/// nothing about the booking's state.
pub fn apply(
    status: BookingStatus,
    flags: AgreementFlags,
    action: BookingAction,
    party: Party,
) -> Result<TransitionOutcome, CoreError> {
    authorize(action, party)?;

    let invalid = || {
        Err(CoreError::InvalidTransition {
            from: status.as_str(),
            action: action.as_str(),
        })
    };

    if status.is_terminal() {
        return invalid();
    }

    match action {
        BookingAction::Approve => {
            if status != BookingStatus::Pending {
                return invalid();
            }
            Ok(TransitionOutcome {
                status: BookingStatus::Confirmed,
                flags,
                agreement_completed: false,
            })
        }
        BookingAction::Reject => {
            if status != BookingStatus::Pending {
                return invalid();
            }
            Ok(TransitionOutcome {
                status: BookingStatus::Cancelled,
                flags,
                agreement_completed: false,
            })
        }
        BookingAction::Agree => {
            if status != BookingStatus::Confirmed {
                return invalid();
            }
            let flags = match party {
                Party::Renter => AgreementFlags {
                    renter_agreed: true,
                    ..flags
                },
                Party::Owner => AgreementFlags {
                    owner_agreed: true,
                    ..flags
                },
                // authorize() already rejected admins.
                Party::Admin => flags,
            };
            if flags.both() {
                Ok(TransitionOutcome {
                    status: BookingStatus::AwaitingDelivery,
                    flags,
                    agreement_completed: true,
                })
            } else {
                Ok(TransitionOutcome {
                    status,
                    flags,
                    agreement_completed: false,
                })
            }
        }
        BookingAction::Deliver => {
            // Physical handover can happen before the in-app handshake
            // finishes; both confirmed and nije_isporucen accept it.
            if !matches!(
                status,
                BookingStatus::Confirmed | BookingStatus::AwaitingDelivery
            ) {
                return invalid();
            }
            Ok(TransitionOutcome {
                status: BookingStatus::Delivered,
                flags,
                agreement_completed: false,
            })
        }
        BookingAction::Return => {
            if status != BookingStatus::Delivered {
                return invalid();
            }
            Ok(TransitionOutcome {
                status: BookingStatus::Returned,
                flags,
                agreement_completed: false,
            })
        }
        BookingAction::Cancel => {
            // Once the item is with the renter the booking must run to
            // completion; disputes are settled off-platform.
            if !status.is_pre_delivery() {
                return invalid();
            }
            Ok(TransitionOutcome {
                status: BookingStatus::Cancelled,
                flags,
                agreement_completed: false,
            })
        }
    }
}
