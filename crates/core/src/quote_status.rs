//! Quote lifecycle state machine.
//!
//! Statuses move strictly forward (`draft → sent → viewed → accepted |
//! declined`); expiry is derived lazily from the validity deadline at read
//! time and is never written back to the row. The transition table lives in
//! [`QuoteStatus::can_transition_to`] so an illegal move (e.g. `accepted →
//! sent`) is unrepresentable in the handlers.

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// QuoteStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Viewed,
    Accepted,
    Declined,
    Expired,
}

impl QuoteStatus {
    /// String representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Viewed => "viewed",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Declined => "declined",
            QuoteStatus::Expired => "expired",
        }
    }

    /// Parse a stored status string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(QuoteStatus::Draft),
            "sent" => Ok(QuoteStatus::Sent),
            "viewed" => Ok(QuoteStatus::Viewed),
            "accepted" => Ok(QuoteStatus::Accepted),
            "declined" => Ok(QuoteStatus::Declined),
            "expired" => Ok(QuoteStatus::Expired),
            other => Err(CoreError::Internal(format!(
                "unknown quote status in storage: {other}"
            ))),
        }
    }

    /// A terminal status accepts no further customer transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuoteStatus::Accepted | QuoteStatus::Declined | QuoteStatus::Expired
        )
    }

    /// Allowed-transition table.
    ///
    /// Expiry is not listed: it is a derived status, not a stored move.
    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        matches!(
            (self, next),
            (QuoteStatus::Draft, QuoteStatus::Sent)
                | (QuoteStatus::Sent, QuoteStatus::Viewed)
                | (QuoteStatus::Viewed, QuoteStatus::Accepted)
                | (QuoteStatus::Viewed, QuoteStatus::Declined)
        )
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Lazy expiry
// ---------------------------------------------------------------------------

/// Derive the status a reader should see for a quote.
///
/// A non-terminal quote past its validity deadline reads as `Expired`; a
/// terminal status already reached is never overwritten. `valid_until = None`
/// means the quote never expires.
pub fn effective_status(
    stored: QuoteStatus,
    valid_until: Option<Timestamp>,
    now: Timestamp,
) -> QuoteStatus {
    if stored.is_terminal() {
        return stored;
    }
    match valid_until {
        Some(deadline) if now > deadline => QuoteStatus::Expired,
        _ => stored,
    }
}

// ---------------------------------------------------------------------------
// CustomerResponse
// ---------------------------------------------------------------------------

/// The two values a customer may submit when responding to a quote.
///
/// Anything else is an input-validation failure, not a state-machine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerResponse {
    Accepted,
    Declined,
}

impl CustomerResponse {
    /// String representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerResponse::Accepted => "accepted",
            CustomerResponse::Declined => "declined",
        }
    }

    /// Parse a submitted response value.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "accepted" => Ok(CustomerResponse::Accepted),
            "declined" => Ok(CustomerResponse::Declined),
            other => Err(CoreError::Validation(format!(
                "response must be 'accepted' or 'declined', got '{other}'"
            ))),
        }
    }

    /// The terminal status this response moves the quote into.
    pub fn target_status(&self) -> QuoteStatus {
        match self {
            CustomerResponse::Accepted => QuoteStatus::Accepted,
            CustomerResponse::Declined => QuoteStatus::Declined,
        }
    }
}
