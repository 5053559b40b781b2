//! Session-scoped behavioral tracker.
//!
//! One [`SessionTracker`] is constructed per quote-page load by whatever
//! owns the page lifecycle, and passed by reference to anything that emits
//! events. It is not a global singleton and dies with the page.
//!
//! Delivery is best-effort: sink failures are logged and swallowed, never
//! surfaced to the customer flow. Timestamps are passed in by the caller so
//! cooldown and duration logic is testable without sleeping.

use serde_json::Value;

use super::AnalyticsEventType;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Minimum gap between two emitted interaction events, in seconds.
pub const EVENT_COOLDOWN_SECS: i64 = 3;

/// Cadence of the periodic time-on-page report, in seconds.
pub const HEARTBEAT_INTERVAL_SECS: i64 = 30;

/// A single event handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEvent {
    pub session_id: String,
    pub event_type: AnalyticsEventType,
    pub payload: Value,
    pub occurred_at: Timestamp,
}

/// Cumulative figures reported on the heartbeat cadence and at unload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationReport {
    pub duration_secs: i64,
    pub scroll_depth_percent: i32,
}

/// Destination for tracked events (an HTTP client in production, a buffer
/// in tests).
pub trait EventSink {
    fn submit(&mut self, event: TrackedEvent) -> Result<(), CoreError>;
}

/// Per-page-load analytics state.
#[derive(Debug)]
pub struct SessionTracker {
    session_id: String,
    started_at: Timestamp,
    last_emitted_at: Option<Timestamp>,
    last_reported_at: Timestamp,
    viewed_sections: Vec<String>,
    scroll_depth_percent: i32,
}

impl SessionTracker {
    pub fn new(session_id: String, started_at: Timestamp) -> Self {
        Self {
            session_id,
            started_at,
            last_emitted_at: None,
            last_reported_at: started_at,
            viewed_sections: Vec::new(),
            scroll_depth_percent: 0,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Sections seen so far, in first-view order.
    pub fn viewed_sections(&self) -> &[String] {
        &self.viewed_sections
    }

    pub fn scroll_depth_percent(&self) -> i32 {
        self.scroll_depth_percent
    }

    /// Record a discrete interaction event.
    ///
    /// Returns `true` if the event was handed to the sink, `false` if it was
    /// suppressed by the cooldown window. Sink errors count as emitted: the
    /// cooldown still advances so a failing endpoint is not hammered.
    pub fn track_event(
        &mut self,
        sink: &mut dyn EventSink,
        event_type: AnalyticsEventType,
        payload: Value,
        now: Timestamp,
    ) -> bool {
        if let Some(last) = self.last_emitted_at {
            if (now - last) < chrono::Duration::seconds(EVENT_COOLDOWN_SECS) {
                return false;
            }
        }
        self.last_emitted_at = Some(now);
        self.emit(sink, event_type, payload, now);
        true
    }

    /// Record first-time visibility of a page section.
    ///
    /// Emits a `page_view` event exactly once per section per session.
    /// Section views bypass the interaction cooldown: the once-per-section
    /// gate is already stricter.
    pub fn section_viewed(
        &mut self,
        sink: &mut dyn EventSink,
        section: &str,
        now: Timestamp,
    ) -> bool {
        if self.viewed_sections.iter().any(|s| s == section) {
            return false;
        }
        self.viewed_sections.push(section.to_string());
        self.emit(
            sink,
            AnalyticsEventType::PageView,
            serde_json::json!({ "section": section }),
            now,
        );
        true
    }

    /// Record a scroll-depth observation; the stored value is a monotonic
    /// maximum clamped to `[0, 100]`.
    pub fn update_scroll_depth(&mut self, percent: i32) {
        let clamped = percent.clamp(0, 100);
        if clamped > self.scroll_depth_percent {
            self.scroll_depth_percent = clamped;
        }
    }

    /// Whether the periodic duration report is due.
    pub fn heartbeat_due(&self, now: Timestamp) -> bool {
        (now - self.last_reported_at) >= chrono::Duration::seconds(HEARTBEAT_INTERVAL_SECS)
    }

    /// Produce the periodic duration report and reset the cadence clock.
    pub fn heartbeat(&mut self, now: Timestamp) -> DurationReport {
        self.last_reported_at = now;
        DurationReport {
            duration_secs: (now - self.started_at).num_seconds().max(0),
            scroll_depth_percent: self.scroll_depth_percent,
        }
    }

    /// Final best-effort report for unload-time delivery.
    ///
    /// The caller ships this through a non-blocking channel (the browser
    /// beacon equivalent); it must never hold up navigation.
    pub fn final_report(&self, now: Timestamp) -> DurationReport {
        DurationReport {
            duration_secs: (now - self.started_at).num_seconds().max(0),
            scroll_depth_percent: self.scroll_depth_percent,
        }
    }

    fn emit(
        &self,
        sink: &mut dyn EventSink,
        event_type: AnalyticsEventType,
        payload: Value,
        now: Timestamp,
    ) {
        let event = TrackedEvent {
            session_id: self.session_id.clone(),
            event_type,
            payload,
            occurred_at: now,
        };
        if let Err(err) = sink.submit(event) {
            // Analytics loss must never affect the customer-facing flow.
            tracing::warn!(
                session_id = %self.session_id,
                event_type = event_type.as_str(),
                error = %err,
                "Dropping analytics event after sink failure"
            );
        }
    }
}
