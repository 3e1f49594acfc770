/// Domain errors shared across the workspace.
///
/// Each variant maps to exactly one HTTP status in the API layer; the
/// mapping lives next to the response types, not here.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid transition: cannot {action} a {from} booking")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    #[error("listing limit reached ({max_listings} active listings on current plan)")]
    QuotaExceeded { max_listings: i32 },

    #[error("promo code already used")]
    CodeAlreadyUsed,

    #[error("promo code expired")]
    CodeExpired,

    #[error("booking already reviewed by this party")]
    AlreadyReviewed,

    #[error("conversation is already blocked")]
    AlreadyBlocked,

    #[error("not eligible: {0}")]
    NotEligible(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Convenience constructor for the common not-found case.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
