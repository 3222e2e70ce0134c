//! Break session state machine.
//!
//! The session is a logical-clock state machine. It does not use internal
//! threads or timers - the caller drives it by calling `tick(elapsed_ms)`
//! at whatever cadence it schedules (one second in the app). Every pending
//! delay (bubble respawns, the post-completion linger) rides the same clock,
//! so dropping the session cancels all of them.
//!
//! ## State Transitions
//!
//! ```text
//! Running -> Completing -> Closed
//! Running -> Cancelled            (explicit close, no break recorded)
//! ```
//!
//! Recording the completed break is the caller's job: consume the
//! `BreakCompleted` event and call `PreferenceStore::record_break`.

mod scene;

pub use scene::{
    Bubble, Ripple, Scene, SceneBounds, BUBBLE_COUNT, BUBBLE_RESPAWN_MS, MAX_RIPPLES,
    RIPPLE_LIFETIME_MS,
};

use chrono::Utc;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::prefs::BreakLength;
use crate::theme::ThemeId;

/// Pause between the countdown reaching zero and the session closing,
/// long enough for a final visual frame.
pub const CLOSE_LINGER_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Counting down; all interactions available.
    Running,
    /// Countdown finished, lingering before close.
    Completing,
    /// Terminal: closed after natural completion.
    Closed,
    /// Terminal: user closed the session early.
    Cancelled,
}

/// One timed break with its transient scene state.
#[derive(Debug)]
pub struct BreakSession {
    state: SessionState,
    theme: ThemeId,
    total_ms: u64,
    remaining_ms: u64,
    linger_ms: u64,
    mood_overlay_visible: bool,
    scene: Scene,
}

impl BreakSession {
    /// Create a session counting down from the requested duration.
    ///
    /// The session starts running immediately; there is no idle state.
    pub fn new(duration: BreakLength, theme: ThemeId) -> Self {
        Self::build(duration, theme, Pcg64::from_entropy(), SceneBounds::default())
    }

    /// Deterministic variant for tests and replay.
    pub fn new_seeded(duration: BreakLength, theme: ThemeId, seed: u64) -> Self {
        Self::build(
            duration,
            theme,
            Pcg64::seed_from_u64(seed),
            SceneBounds::default(),
        )
    }

    fn build(duration: BreakLength, theme: ThemeId, rng: Pcg64, bounds: SceneBounds) -> Self {
        let total_ms = u64::from(duration.as_secs()) * 1000;
        Self {
            state: SessionState::Running,
            theme,
            total_ms,
            remaining_ms: total_ms,
            linger_ms: 0,
            mood_overlay_visible: false,
            scene: Scene::new(bounds, rng),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn theme(&self) -> ThemeId {
        self.theme
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Remaining whole seconds for display, rounded up.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_ms.div_ceil(1000) as u32
    }

    /// 0.0 .. 1.0 progress through the countdown.
    pub fn progress(&self) -> f64 {
        if self.total_ms == 0 {
            return 1.0;
        }
        1.0 - (self.remaining_ms as f64 / self.total_ms as f64)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn mood_overlay_visible(&self) -> bool {
        self.mood_overlay_visible
    }

    /// Both terminal states.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Closed | SessionState::Cancelled)
    }

    /// Event describing the session start, for callers that log it.
    pub fn started(&self) -> Event {
        Event::SessionStarted {
            duration_secs: (self.total_ms / 1000) as u32,
            theme: self.theme,
            at: Utc::now(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::SessionSnapshot {
            state: self.state,
            remaining_secs: self.remaining_secs(),
            remaining_ms: self.remaining_ms,
            total_ms: self.total_ms,
            progress: self.progress(),
            active_ripples: self.scene.ripples().len(),
            active_bubbles: self.scene.active_bubbles(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance the logical clock. Call periodically with the elapsed time
    /// since the previous call.
    ///
    /// Emits `BreakCompleted` exactly once when the countdown reaches zero,
    /// then `SessionClosed` once the linger elapses. Ticking a finished
    /// session is a no-op.
    pub fn tick(&mut self, elapsed_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        match self.state {
            SessionState::Running => {
                self.scene.advance(elapsed_ms, &mut events);
                self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
                if self.remaining_ms == 0 {
                    self.state = SessionState::Completing;
                    self.linger_ms = CLOSE_LINGER_MS;
                    events.push(Event::BreakCompleted {
                        duration_secs: (self.total_ms / 1000) as u32,
                        at: Utc::now(),
                    });
                }
            }
            SessionState::Completing => {
                self.scene.advance(elapsed_ms, &mut events);
                self.linger_ms = self.linger_ms.saturating_sub(elapsed_ms);
                if self.linger_ms == 0 {
                    self.state = SessionState::Closed;
                    events.push(Event::SessionClosed { at: Utc::now() });
                }
            }
            SessionState::Closed | SessionState::Cancelled => {}
        }
        events
    }

    /// Explicit user close. From `Running` this cancels the session without
    /// recording a break; during the linger it just closes immediately.
    pub fn cancel(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Running => {
                self.state = SessionState::Cancelled;
                Some(Event::SessionCancelled {
                    remaining_ms: self.remaining_ms,
                    at: Utc::now(),
                })
            }
            SessionState::Completing => {
                self.state = SessionState::Closed;
                Some(Event::SessionClosed { at: Utc::now() })
            }
            SessionState::Closed | SessionState::Cancelled => None,
        }
    }

    /// Tap interaction: spawn a ripple marker.
    pub fn spawn_ripple(&mut self, x: f32, y: f32) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.is_finished() {
            self.scene.spawn_ripple(x, y, &mut events);
        }
        events
    }

    /// Pop interaction on a bubble.
    pub fn pop_bubble(&mut self, id: u64) -> Option<Event> {
        if self.is_finished() {
            return None;
        }
        self.scene.pop_bubble(id)
    }

    /// Long-press interaction: show the mood overlay.
    pub fn show_mood_overlay(&mut self) -> Option<Event> {
        if self.is_finished() || self.mood_overlay_visible {
            return None;
        }
        self.mood_overlay_visible = true;
        Some(Event::MoodOverlayShown)
    }

    /// Dismiss the mood overlay.
    pub fn hide_mood_overlay(&mut self) -> Option<Event> {
        if !self.mood_overlay_visible {
            return None;
        }
        self.mood_overlay_visible = false;
        Some(Event::MoodOverlayHidden)
    }
}
