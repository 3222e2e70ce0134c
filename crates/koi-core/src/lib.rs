//! # Koi Core Library
//!
//! Core logic for Koi, a themed break timer. The GUI is a thin layer over
//! this library; every operation here is also reachable from the `koi` CLI.
//!
//! ## Key Components
//!
//! - [`PreferenceStore`]: persisted theme/preference/streak state over a
//!   SQLite key-value medium, with per-field default fallback on read and
//!   write-through setters
//! - [`OnboardingGate`]: monotonic first-run flag
//! - [`BreakSession`]: logical-clock state machine for one timed break,
//!   including the ripple/bubble scene entities
//! - [`Event`]: typed transitions a front end can poll

pub mod error;
pub mod events;
pub mod prefs;
pub mod session;
pub mod store;
pub mod theme;

pub use error::{CoreError, StoreError, ValidationError};
pub use events::Event;
pub use prefs::{Avatar, BreakLength, Preferences, StreakData, AVATARS, DEFAULT_MOOD, MOOD_STOPS};
pub use session::{BreakSession, SessionState};
pub use store::{data_dir, OnboardingGate, PreferenceStore};
pub use theme::{preset, CustomTheme, HexColor, ThemeColors, ThemeId, ThemePreset};
