//! User preferences, the avatar catalog, and the daily streak model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Allowed break durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BreakLength {
    Short,
    Medium,
    Long,
}

impl BreakLength {
    pub fn as_secs(&self) -> u32 {
        match self {
            BreakLength::Short => 30,
            BreakLength::Medium => 60,
            BreakLength::Long => 180,
        }
    }

    /// Map a duration in seconds onto the allowed set.
    ///
    /// # Errors
    /// Returns an error for any value other than 30, 60 or 180.
    pub fn from_secs(seconds: u32) -> Result<Self, ValidationError> {
        match seconds {
            30 => Ok(BreakLength::Short),
            60 => Ok(BreakLength::Medium),
            180 => Ok(BreakLength::Long),
            other => Err(ValidationError::InvalidBreakLength { seconds: other }),
        }
    }
}

impl TryFrom<u32> for BreakLength {
    type Error = ValidationError;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        Self::from_secs(seconds)
    }
}

impl From<BreakLength> for u32 {
    fn from(len: BreakLength) -> u32 {
        len.as_secs()
    }
}

impl Default for BreakLength {
    fn default() -> Self {
        BreakLength::Medium
    }
}

/// One entry of the fixed avatar catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Avatar {
    pub id: u8,
    pub icon: &'static str,
    pub color: &'static str,
}

/// The avatar catalog. `Preferences::avatar_id` must index into this.
pub const AVATARS: [Avatar; 6] = [
    Avatar { id: 0, icon: "droplet", color: "#2DD4BF" },
    Avatar { id: 1, icon: "activity", color: "#6EE7B7" },
    Avatar { id: 2, icon: "wind", color: "#67E8F9" },
    Avatar { id: 3, icon: "sun", color: "#F97316" },
    Avatar { id: 4, icon: "moon", color: "#1E3A8A" },
    Avatar { id: 5, icon: "star", color: "#FB7185" },
];

/// User preferences, persisted as one JSON value under a single key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub default_break_length: BreakLength,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub haptics_enabled: bool,
    #[serde(default)]
    pub low_motion_mode: bool,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_id: u8,
}

fn default_true() -> bool {
    true
}

impl Preferences {
    /// Check cross-field invariants that serde cannot express.
    ///
    /// # Errors
    /// Returns an error if the avatar id does not map to a catalog entry.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if usize::from(self.avatar_id) >= AVATARS.len() {
            return Err(ValidationError::UnknownAvatar {
                id: self.avatar_id,
                count: AVATARS.len(),
            });
        }
        Ok(())
    }

    pub fn avatar(&self) -> Avatar {
        AVATARS
            .get(usize::from(self.avatar_id))
            .copied()
            .unwrap_or(AVATARS[0])
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_break_length: BreakLength::Medium,
            sound_enabled: true,
            haptics_enabled: true,
            low_motion_mode: false,
            display_name: String::new(),
            avatar_id: 0,
        }
    }
}

/// Consecutive-day streak counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    pub current_streak: u32,
    pub last_break_date: Option<NaiveDate>,
    pub total_breaks: u64,
}

impl StreakData {
    /// Apply the record-break transition for a break taken on `today`.
    ///
    /// Same day as the last break: streak unchanged. Day immediately after:
    /// streak + 1. Anything else (including the first break ever): streak
    /// resets to 1. `total_breaks` increments on every call.
    pub fn advanced(&self, today: NaiveDate) -> StreakData {
        let current_streak = match self.last_break_date {
            Some(last) if last == today => self.current_streak,
            Some(last) if last.succ_opt() == Some(today) => self.current_streak + 1,
            _ => 1,
        };
        StreakData {
            current_streak,
            last_break_date: Some(today),
            total_breaks: self.total_breaks + 1,
        }
    }
}

/// The five quantised stops of the mood slider.
pub const MOOD_STOPS: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Default mood value for a fresh install.
pub const DEFAULT_MOOD: f32 = 0.5;
