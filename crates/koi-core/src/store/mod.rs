//! Persisted preference state over a SQLite key-value medium.
//!
//! Every logical field lives under its own key as one opaque string: plain
//! text for scalars, JSON for composite records. One key per field means a
//! reader observes the previous or the fully-updated value, never a partial
//! update.
//!
//! Read failures (missing medium, malformed value) fall back to the field
//! default and are logged; they never surface to the caller. Write failures
//! leave the in-memory value unchanged and are returned so the caller can
//! warn that a setting did not persist.

use std::path::{Path, PathBuf};

use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::error::{CoreError, StoreError};
use crate::prefs::{Preferences, StreakData, DEFAULT_MOOD};
use crate::theme::{clamp_unit, CustomTheme, ThemeColors, ThemeId};

mod keys {
    pub const SELECTED_THEME: &str = "selected_theme";
    pub const CUSTOM_THEME: &str = "custom_theme";
    pub const PREFERENCES: &str = "preferences";
    pub const STREAK_DATA: &str = "streak_data";
    pub const MOOD_VALUE: &str = "mood_value";
    pub const ONBOARDING: &str = "onboarding_completed";

    /// The keys removed by a full data reset. The onboarding flag is not
    /// among them; it resets only through `OnboardingGate::reset`.
    pub const DATA: [&str; 5] = [
        SELECTED_THEME,
        CUSTOM_THEME,
        PREFERENCES,
        STREAK_DATA,
        MOOD_VALUE,
    ];
}

/// Returns `~/.config/koi[-dev]/` based on KOI_ENV.
///
/// Set KOI_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("KOI_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("koi-dev")
    } else {
        base_dir.join("koi")
    };

    std::fs::create_dir_all(&dir).map_err(StoreError::DataDir)?;
    Ok(dir)
}

fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })?;
    // The store and the onboarding gate may hold connections to the same
    // file; wait out short-lived write locks instead of failing.
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
    migrate(&conn)?;
    Ok(conn)
}

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )
    .map_err(|source| StoreError::WriteFailed {
        key: "schema",
        source,
    })
}

fn kv_get(conn: &Connection, key: &str) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
        row.get(0)
    })
    .optional()
}

fn kv_set(conn: &Connection, key: &'static str, value: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .map_err(|source| StoreError::WriteFailed { key, source })?;
    debug!(key, "persisted");
    Ok(())
}

/// Read one field, substituting the default on any failure.
fn load_field<T, F>(conn: &Connection, key: &str, default: T, parse: F) -> T
where
    F: FnOnce(&str) -> Result<T, String>,
{
    match kv_get(conn, key) {
        Ok(Some(raw)) => match parse(&raw) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "malformed stored value, using default");
                default
            }
        },
        Ok(None) => default,
        Err(error) => {
            warn!(key, %error, "failed to read stored value, using default");
            default
        }
    }
}

/// Single source of truth for all persisted user state.
///
/// Owns the underlying medium exclusively; the UI layer goes through the
/// typed getters and setters. Fully loaded ("ready") once the constructor
/// returns.
pub struct PreferenceStore {
    conn: Connection,
    selected_theme: ThemeId,
    custom_theme: CustomTheme,
    preferences: Preferences,
    streak: StreakData,
    mood: f32,
}

impl PreferenceStore {
    /// Open the store at `~/.config/koi/koi.db` and load all fields.
    ///
    /// # Errors
    /// Returns an error only if the medium itself cannot be opened;
    /// unreadable values fall back to defaults.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self::from_connection(open_connection(
            &data_dir()?.join("koi.db"),
        )?))
    }

    /// Open the store at an explicit path (tests, diagnostics).
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::from_connection(open_connection(path)?))
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        migrate(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        let mut store = Self {
            conn,
            selected_theme: ThemeId::default(),
            custom_theme: CustomTheme::default(),
            preferences: Preferences::default(),
            streak: StreakData::default(),
            mood: DEFAULT_MOOD,
        };
        store.load();
        store
    }

    /// Read all known keys, substituting defaults per field on failure.
    fn load(&mut self) {
        self.selected_theme = load_field(
            &self.conn,
            keys::SELECTED_THEME,
            ThemeId::default(),
            |raw| raw.parse().map_err(|e: crate::error::ValidationError| e.to_string()),
        );
        self.custom_theme = load_field(
            &self.conn,
            keys::CUSTOM_THEME,
            CustomTheme::default(),
            |raw| {
                serde_json::from_str::<CustomTheme>(raw)
                    .map(CustomTheme::sanitized)
                    .map_err(|e| e.to_string())
            },
        );
        self.preferences = load_field(
            &self.conn,
            keys::PREFERENCES,
            Preferences::default(),
            |raw| {
                let prefs: Preferences =
                    serde_json::from_str(raw).map_err(|e| e.to_string())?;
                prefs.validate().map_err(|e| e.to_string())?;
                Ok(prefs)
            },
        );
        self.streak = load_field(&self.conn, keys::STREAK_DATA, StreakData::default(), |raw| {
            serde_json::from_str(raw).map_err(|e| e.to_string())
        });
        self.mood = load_field(&self.conn, keys::MOOD_VALUE, DEFAULT_MOOD, |raw| {
            raw.parse::<f32>().map(clamp_unit).map_err(|e| e.to_string())
        });
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn selected_theme(&self) -> ThemeId {
        self.selected_theme
    }

    pub fn custom_theme(&self) -> &CustomTheme {
        &self.custom_theme
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn streak(&self) -> StreakData {
        self.streak
    }

    pub fn mood_value(&self) -> f32 {
        self.mood
    }

    /// Resolve the active theme to concrete scene colors.
    pub fn theme_colors(&self) -> ThemeColors {
        ThemeColors::resolve(self.selected_theme, &self.custom_theme)
    }

    // ── Mutators (write-through) ─────────────────────────────────────

    /// # Errors
    /// Returns an error if the write fails; in-memory state is unchanged.
    pub fn set_selected_theme(&mut self, id: ThemeId) -> Result<(), StoreError> {
        kv_set(&self.conn, keys::SELECTED_THEME, id.as_str())?;
        self.selected_theme = id;
        Ok(())
    }

    /// Persist the custom theme. This is the explicit save action; edits in
    /// flight stay with the caller.
    ///
    /// # Errors
    /// Returns an error if the write fails; in-memory state is unchanged.
    pub fn set_custom_theme(&mut self, theme: CustomTheme) -> Result<(), StoreError> {
        let theme = theme.sanitized();
        let json = serde_json::to_string(&theme).map_err(|source| StoreError::EncodeFailed {
            key: keys::CUSTOM_THEME,
            source,
        })?;
        kv_set(&self.conn, keys::CUSTOM_THEME, &json)?;
        self.custom_theme = theme;
        Ok(())
    }

    /// # Errors
    /// Returns a validation error for an unknown avatar id, or a store error
    /// if the write fails; in-memory state is unchanged either way.
    pub fn set_preferences(&mut self, prefs: Preferences) -> Result<(), CoreError> {
        prefs.validate()?;
        let json = serde_json::to_string(&prefs).map_err(|source| StoreError::EncodeFailed {
            key: keys::PREFERENCES,
            source,
        })?;
        kv_set(&self.conn, keys::PREFERENCES, &json)?;
        self.preferences = prefs;
        Ok(())
    }

    /// Persist the mood value, clamped to `[0,1]`.
    ///
    /// # Errors
    /// Returns an error if the write fails; in-memory state is unchanged.
    pub fn set_mood_value(&mut self, value: f32) -> Result<(), StoreError> {
        let value = clamp_unit(value);
        kv_set(&self.conn, keys::MOOD_VALUE, &value.to_string())?;
        self.mood = value;
        Ok(())
    }

    /// Record a completed break for today's calendar date.
    ///
    /// # Errors
    /// Returns an error if the write fails; in-memory state is unchanged.
    pub fn record_break(&mut self) -> Result<StreakData, StoreError> {
        self.record_break_on(Local::now().date_naive())
    }

    /// Record a completed break on an explicit date (tests, replays).
    ///
    /// The only mutator with conditional logic: applies the daily streak
    /// transition before the write-through.
    pub fn record_break_on(
        &mut self,
        today: chrono::NaiveDate,
    ) -> Result<StreakData, StoreError> {
        let next = self.streak.advanced(today);
        let json = serde_json::to_string(&next).map_err(|source| StoreError::EncodeFailed {
            key: keys::STREAK_DATA,
            source,
        })?;
        kv_set(&self.conn, keys::STREAK_DATA, &json)?;
        self.streak = next;
        Ok(next)
    }

    /// Delete all data keys as one best-effort batch, then reset every
    /// in-memory field to its default regardless of the delete outcome.
    /// Leaves the onboarding flag alone.
    ///
    /// # Errors
    /// Returns the delete error, after the in-memory reset.
    pub fn clear_all_data(&mut self) -> Result<(), StoreError> {
        let result = self
            .conn
            .execute(
                "DELETE FROM kv WHERE key IN (?1, ?2, ?3, ?4, ?5)",
                params![
                    keys::DATA[0],
                    keys::DATA[1],
                    keys::DATA[2],
                    keys::DATA[3],
                    keys::DATA[4]
                ],
            )
            .map(|_| ())
            .map_err(StoreError::ClearFailed);

        self.selected_theme = ThemeId::default();
        self.custom_theme = CustomTheme::default();
        self.preferences = Preferences::default();
        self.streak = StreakData::default();
        self.mood = DEFAULT_MOOD;

        result
    }
}

/// Boolean flag gating the first-run flow.
///
/// Monotonic: once completed it stays set until an explicit reset.
pub struct OnboardingGate {
    conn: Connection,
}

impl OnboardingGate {
    /// Open the gate over `~/.config/koi/koi.db`.
    ///
    /// # Errors
    /// Returns an error if the medium cannot be opened.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_connection(&data_dir()?.join("koi.db"))?,
        })
    }

    /// Open the gate at an explicit path (tests).
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_connection(path)?,
        })
    }

    /// Whether onboarding has been completed. Read failures count as
    /// not-completed and are logged.
    pub fn check(&self) -> bool {
        load_field(&self.conn, keys::ONBOARDING, false, |raw| {
            Ok(raw == "true")
        })
    }

    /// Mark onboarding complete. Idempotent.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn complete(&mut self) -> Result<(), StoreError> {
        kv_set(&self.conn, keys::ONBOARDING, "true")
    }

    /// Clear the flag so the first-run flow shows again.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![keys::ONBOARDING])
            .map(|_| ())
            .map_err(|source| StoreError::WriteFailed {
                key: keys::ONBOARDING,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::BreakLength;
    use crate::theme::HexColor;

    fn day(s: &str) -> chrono::NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn fresh_store_has_documented_defaults() {
        let store = PreferenceStore::open_memory().unwrap();
        assert_eq!(store.selected_theme(), ThemeId::KoiPond);
        assert_eq!(store.custom_theme(), &CustomTheme::default());
        assert_eq!(store.preferences(), &Preferences::default());
        assert_eq!(store.streak(), StreakData::default());
        assert_eq!(store.mood_value(), DEFAULT_MOOD);
    }

    #[test]
    fn setters_write_through_and_update_memory() {
        let mut store = PreferenceStore::open_memory().unwrap();
        store.set_selected_theme(ThemeId::DeepSea).unwrap();
        assert_eq!(store.selected_theme(), ThemeId::DeepSea);
        assert_eq!(
            kv_get(&store.conn, keys::SELECTED_THEME).unwrap().as_deref(),
            Some("deepSea")
        );

        let prefs = Preferences {
            default_break_length: BreakLength::Long,
            display_name: "Mika".into(),
            avatar_id: 3,
            ..Preferences::default()
        };
        store.set_preferences(prefs.clone()).unwrap();
        assert_eq!(store.preferences(), &prefs);
    }

    #[test]
    fn invalid_avatar_is_rejected_without_mutation() {
        let mut store = PreferenceStore::open_memory().unwrap();
        let prefs = Preferences {
            avatar_id: 42,
            ..Preferences::default()
        };
        assert!(store.set_preferences(prefs).is_err());
        assert_eq!(store.preferences(), &Preferences::default());
        assert!(kv_get(&store.conn, keys::PREFERENCES).unwrap().is_none());
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let mut store = PreferenceStore::open_memory().unwrap();
        store.conn.execute_batch("PRAGMA query_only = ON").unwrap();

        let err = store.set_selected_theme(ThemeId::DeepSea).unwrap_err();
        assert!(matches!(
            err,
            StoreError::WriteFailed {
                key: "selected_theme",
                ..
            }
        ));
        assert_eq!(store.selected_theme(), ThemeId::KoiPond);

        assert!(store.set_mood_value(0.9).is_err());
        assert_eq!(store.mood_value(), DEFAULT_MOOD);

        assert!(store.record_break_on(day("2026-08-10")).is_err());
        assert_eq!(store.streak(), StreakData::default());

        // Writes go through again once the medium accepts them.
        store.conn.execute_batch("PRAGMA query_only = OFF").unwrap();
        store.set_selected_theme(ThemeId::DeepSea).unwrap();
        assert_eq!(store.selected_theme(), ThemeId::DeepSea);
    }

    #[test]
    fn custom_theme_floats_are_clamped_on_save() {
        let mut store = PreferenceStore::open_memory().unwrap();
        let theme = CustomTheme {
            ripple_intensity: 4.2,
            sound_volume: -1.0,
            ..CustomTheme::default()
        };
        store.set_custom_theme(theme).unwrap();
        assert_eq!(store.custom_theme().ripple_intensity, 1.0);
        assert_eq!(store.custom_theme().sound_volume, 0.0);
    }

    #[test]
    fn mood_is_clamped_to_unit_interval() {
        let mut store = PreferenceStore::open_memory().unwrap();
        store.set_mood_value(2.5).unwrap();
        assert_eq!(store.mood_value(), 1.0);
        store.set_mood_value(-0.1).unwrap();
        assert_eq!(store.mood_value(), 0.0);
        store.set_mood_value(0.75).unwrap();
        assert_eq!(store.mood_value(), 0.75);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults_on_load() {
        let mut store = PreferenceStore::open_memory().unwrap();
        kv_set(&store.conn, keys::SELECTED_THEME, "lavaLamp").unwrap();
        kv_set(&store.conn, keys::CUSTOM_THEME, "{not json").unwrap();
        kv_set(&store.conn, keys::PREFERENCES, r#"{"avatarId":99}"#).unwrap();
        kv_set(&store.conn, keys::MOOD_VALUE, "eighty").unwrap();
        store.load();
        assert_eq!(store.selected_theme(), ThemeId::KoiPond);
        assert_eq!(store.custom_theme(), &CustomTheme::default());
        assert_eq!(store.preferences(), &Preferences::default());
        assert_eq!(store.mood_value(), DEFAULT_MOOD);
    }

    #[test]
    fn out_of_range_stored_floats_are_clamped_on_load() {
        let mut store = PreferenceStore::open_memory().unwrap();
        kv_set(&store.conn, keys::MOOD_VALUE, "3.5").unwrap();
        store.load();
        assert_eq!(store.mood_value(), 1.0);
    }

    #[test]
    fn streak_scenario_from_fresh_install() {
        let mut store = PreferenceStore::open_memory().unwrap();
        let d = day("2026-08-10");

        let s = store.record_break_on(d).unwrap();
        assert_eq!((s.current_streak, s.total_breaks), (1, 1));
        assert_eq!(s.last_break_date, Some(d));

        let s = store.record_break_on(d).unwrap();
        assert_eq!((s.current_streak, s.total_breaks), (1, 2));

        let s = store.record_break_on(day("2026-08-11")).unwrap();
        assert_eq!((s.current_streak, s.total_breaks), (2, 3));

        let s = store.record_break_on(day("2026-08-13")).unwrap();
        assert_eq!((s.current_streak, s.total_breaks), (1, 4));
    }

    #[test]
    fn clear_all_data_restores_defaults() {
        let mut store = PreferenceStore::open_memory().unwrap();
        store.set_selected_theme(ThemeId::ZenRiver).unwrap();
        store.set_mood_value(1.0).unwrap();
        store.record_break_on(day("2026-08-10")).unwrap();

        store.clear_all_data().unwrap();
        assert_eq!(store.selected_theme(), ThemeId::KoiPond);
        assert_eq!(store.streak(), StreakData::default());
        assert_eq!(store.mood_value(), DEFAULT_MOOD);

        // The medium is empty again too.
        store.load();
        assert_eq!(store.selected_theme(), ThemeId::KoiPond);
    }

    #[test]
    fn custom_theme_round_trips_through_the_medium() {
        let mut store = PreferenceStore::open_memory().unwrap();
        let theme = CustomTheme {
            water_color: HexColor::new("#1E3A8A").unwrap(),
            ripple_intensity: 0.9,
            particle_enabled: false,
            koi_color: HexColor::new("#FAFAFA").unwrap(),
            sound_volume: 0.2,
        };
        store.set_custom_theme(theme.clone()).unwrap();
        store.load();
        assert_eq!(store.custom_theme(), &theme);
    }

    #[test]
    fn theme_colors_follow_selection() {
        let mut store = PreferenceStore::open_memory().unwrap();
        store.set_selected_theme(ThemeId::Custom).unwrap();
        let colors = store.theme_colors();
        assert_eq!(colors.water_color, store.custom_theme().water_color);
    }
}
