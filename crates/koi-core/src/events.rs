use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionState;
use crate::theme::ThemeId;

/// Every observable transition in a break session produces an Event.
/// The UI layer polls for events; the CLI prints them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        duration_secs: u32,
        theme: ThemeId,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero naturally. Emitted exactly once per
    /// session; the caller records the break on this event.
    BreakCompleted {
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// The post-completion linger elapsed and the session is gone.
    SessionClosed {
        at: DateTime<Utc>,
    },
    /// User closed the session before the countdown finished.
    /// Does not count as a completed break.
    SessionCancelled {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    RippleSpawned {
        id: u64,
        x: f32,
        y: f32,
    },
    RippleFaded {
        id: u64,
    },
    /// Oldest ripple evicted to make room under the concurrency cap.
    RippleEvicted {
        id: u64,
    },
    BubblePopped {
        id: u64,
    },
    BubbleRespawned {
        old_id: u64,
        id: u64,
    },
    MoodOverlayShown,
    MoodOverlayHidden,
    SessionSnapshot {
        state: SessionState,
        remaining_secs: u32,
        remaining_ms: u64,
        total_ms: u64,
        progress: f64,
        active_ripples: usize,
        active_bubbles: usize,
        at: DateTime<Utc>,
    },
}
