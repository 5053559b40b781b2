//! Behavioral analytics: event taxonomy, session identifiers, and the
//! session-scoped tracker.
//!
//! Everything here is observational. Analytics records never gate a quote
//! state transition and are safe to lose.

mod tracker;

pub use tracker::{DurationReport, EventSink, SessionTracker, TrackedEvent};
pub use tracker::{EVENT_COOLDOWN_SECS, HEARTBEAT_INTERVAL_SECS};

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// AnalyticsEventType
// ---------------------------------------------------------------------------

/// The discrete interaction events a session may record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsEventType {
    PageView,
    ButtonClick,
    FormSubmit,
    Download,
    ImageInteraction,
}

impl AnalyticsEventType {
    /// String representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsEventType::PageView => "page_view",
            AnalyticsEventType::ButtonClick => "button_click",
            AnalyticsEventType::FormSubmit => "form_submit",
            AnalyticsEventType::Download => "download",
            AnalyticsEventType::ImageInteraction => "image_interaction",
        }
    }

    /// Parse a submitted event type.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "page_view" => Ok(AnalyticsEventType::PageView),
            "button_click" => Ok(AnalyticsEventType::ButtonClick),
            "form_submit" => Ok(AnalyticsEventType::FormSubmit),
            "download" => Ok(AnalyticsEventType::Download),
            "image_interaction" => Ok(AnalyticsEventType::ImageInteraction),
            other => Err(CoreError::Validation(format!(
                "unknown analytics event type '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Session identity
// ---------------------------------------------------------------------------

/// Alphabet for the session-id suffix.
const SESSION_SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the random session-id suffix.
const SESSION_SUFFIX_LEN: usize = 8;

/// Generate a per-page-load session id: millisecond timestamp plus a random
/// suffix, e.g. `1756080000000-k3v9x2qa`.
///
/// Collision avoidance only. This is not a credential and grants nothing.
pub fn session_id(now: Timestamp) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SESSION_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..SESSION_SUFFIX_ALPHABET.len());
            SESSION_SUFFIX_ALPHABET[idx] as char
        })
        .collect();
    format!("{}-{}", now.timestamp_millis(), suffix)
}

/// Hash client hints (user agent, language, viewport, ...) into a stable
/// device fingerprint. SHA-256 hex; no raw hint is stored.
pub fn device_fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update(b"\x1f");
    }
    format!("{:x}", hasher.finalize())
}
