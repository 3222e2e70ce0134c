//! Theme presets and user-authored custom themes.
//!
//! Six fixed presets plus a `custom` slot. A preset carries four colors
//! (water, secondary, koi, particle); the custom theme only stores water and
//! koi colors and derives the other two by brightness adjustment when
//! resolved for rendering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Clamp a float to the unit interval. NaN collapses to 0.
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// A validated `#RRGGBB` color string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Validate and wrap a `#RRGGBB` string.
    ///
    /// # Errors
    /// Returns an error unless the value is `#` followed by exactly six hex
    /// digits.
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let digits = value.strip_prefix('#').unwrap_or("");
        if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(ValidationError::InvalidColor {
                value: value.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn channels(&self) -> (u8, u8, u8) {
        let hex = &self.0[1..];
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
        (r, g, b)
    }

    /// Return a copy with every channel shifted by `amount`, clamped to 0-255.
    pub fn adjusted(&self, amount: i16) -> HexColor {
        let (r, g, b) = self.channels();
        let shift = |c: u8| (i16::from(c) + amount).clamp(0, 255) as u8;
        HexColor(format!("#{:02x}{:02x}{:02x}", shift(r), shift(g), shift(b)))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> String {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for the active theme: a preset name or the custom slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeId {
    KoiPond,
    DeepSea,
    RainyWindow,
    TidePool,
    GlacierLake,
    ZenRiver,
    Custom,
}

impl ThemeId {
    pub const PRESETS: [ThemeId; 6] = [
        ThemeId::KoiPond,
        ThemeId::DeepSea,
        ThemeId::RainyWindow,
        ThemeId::TidePool,
        ThemeId::GlacierLake,
        ThemeId::ZenRiver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::KoiPond => "koiPond",
            ThemeId::DeepSea => "deepSea",
            ThemeId::RainyWindow => "rainyWindow",
            ThemeId::TidePool => "tidePool",
            ThemeId::GlacierLake => "glacierLake",
            ThemeId::ZenRiver => "zenRiver",
            ThemeId::Custom => "custom",
        }
    }
}

impl FromStr for ThemeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "koiPond" => Ok(ThemeId::KoiPond),
            "deepSea" => Ok(ThemeId::DeepSea),
            "rainyWindow" => Ok(ThemeId::RainyWindow),
            "tidePool" => Ok(ThemeId::TidePool),
            "glacierLake" => Ok(ThemeId::GlacierLake),
            "zenRiver" => Ok(ThemeId::ZenRiver),
            "custom" => Ok(ThemeId::Custom),
            other => Err(ValidationError::UnknownTheme(other.to_string())),
        }
    }
}

impl Default for ThemeId {
    fn default() -> Self {
        ThemeId::KoiPond
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, fixed combination of scene colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreset {
    pub name: &'static str,
    pub water_color: &'static str,
    pub secondary_color: &'static str,
    pub koi_color: &'static str,
    pub particle_color: &'static str,
}

/// Look up the preset for a theme id. `Custom` has no preset.
pub fn preset(id: ThemeId) -> Option<&'static ThemePreset> {
    let preset = match id {
        ThemeId::KoiPond => &ThemePreset {
            name: "Koi Pond",
            water_color: "#2DD4BF",
            secondary_color: "#0D9488",
            koi_color: "#F97316",
            particle_color: "#6EE7B7",
        },
        ThemeId::DeepSea => &ThemePreset {
            name: "Deep Sea",
            water_color: "#1E3A8A",
            secondary_color: "#1E40AF",
            koi_color: "#67E8F9",
            particle_color: "#A5F3FC",
        },
        ThemeId::RainyWindow => &ThemePreset {
            name: "Rainy Window",
            water_color: "#475569",
            secondary_color: "#64748B",
            koi_color: "#94A3B8",
            particle_color: "#CBD5E1",
        },
        ThemeId::TidePool => &ThemePreset {
            name: "Tide Pool",
            water_color: "#6EE7B7",
            secondary_color: "#34D399",
            koi_color: "#F97316",
            particle_color: "#A7F3D0",
        },
        ThemeId::GlacierLake => &ThemePreset {
            name: "Glacier Lake",
            water_color: "#67E8F9",
            secondary_color: "#22D3EE",
            koi_color: "#FAFAFA",
            particle_color: "#CFFAFE",
        },
        ThemeId::ZenRiver => &ThemePreset {
            name: "Zen River",
            water_color: "#4ADE80",
            secondary_color: "#22C55E",
            koi_color: "#F97316",
            particle_color: "#86EFAC",
        },
        ThemeId::Custom => return None,
    };
    Some(preset)
}

/// A user-authored theme variant.
///
/// Floats are clamped to `[0,1]` on construction and when loaded from the
/// persistent medium. Colors validate at the serde boundary via [`HexColor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTheme {
    pub water_color: HexColor,
    pub ripple_intensity: f32,
    pub particle_enabled: bool,
    pub koi_color: HexColor,
    pub sound_volume: f32,
}

impl CustomTheme {
    /// Return a copy with all numeric fields clamped to the unit interval.
    pub fn sanitized(mut self) -> Self {
        self.ripple_intensity = clamp_unit(self.ripple_intensity);
        self.sound_volume = clamp_unit(self.sound_volume);
        self
    }
}

impl Default for CustomTheme {
    fn default() -> Self {
        Self {
            water_color: HexColor("#2DD4BF".into()),
            ripple_intensity: 0.5,
            particle_enabled: true,
            koi_color: HexColor("#F97316".into()),
            sound_volume: 0.5,
        }
    }
}

/// Fully-resolved colors for rendering one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub water_color: HexColor,
    pub secondary_color: HexColor,
    pub koi_color: HexColor,
    pub particle_color: HexColor,
}

impl ThemeColors {
    /// Resolve a theme id against the preset catalog or the custom theme.
    ///
    /// The custom theme derives its secondary color by darkening the water
    /// color and its particle color by lightening it.
    pub fn resolve(id: ThemeId, custom: &CustomTheme) -> Self {
        match preset(id) {
            Some(p) => Self {
                water_color: HexColor(p.water_color.into()),
                secondary_color: HexColor(p.secondary_color.into()),
                koi_color: HexColor(p.koi_color.into()),
                particle_color: HexColor(p.particle_color.into()),
            },
            None => Self {
                water_color: custom.water_color.clone(),
                secondary_color: custom.water_color.adjusted(-30),
                koi_color: custom.koi_color.clone(),
                particle_color: custom.water_color.adjusted(30),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hex_color_accepts_six_digit_codes() {
        assert!(HexColor::new("#2DD4BF").is_ok());
        assert!(HexColor::new("#abcdef").is_ok());
    }

    #[test]
    fn hex_color_rejects_malformed_codes() {
        for bad in ["2DD4BF", "#2DD4B", "#2DD4BF0", "#GGGGGG", "", "#"] {
            assert!(HexColor::new(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn adjusted_clamps_channels() {
        let white = HexColor::new("#FFFFFF").unwrap();
        assert_eq!(white.adjusted(30).as_str(), "#ffffff");
        let black = HexColor::new("#000000").unwrap();
        assert_eq!(black.adjusted(-30).as_str(), "#000000");
    }

    #[test]
    fn adjusted_shifts_channels() {
        let teal = HexColor::new("#2DD4BF").unwrap();
        // 0x2D+30=0x4B, 0xD4+30=0xF2, 0xBF+30=0xDD
        assert_eq!(teal.adjusted(30).as_str(), "#4bf2dd");
        assert_eq!(teal.adjusted(-30).as_str(), "#0fb6a1");
    }

    #[test]
    fn theme_id_round_trips_through_str() {
        for id in ThemeId::PRESETS.iter().chain([ThemeId::Custom].iter()) {
            assert_eq!(id.as_str().parse::<ThemeId>().unwrap(), *id);
        }
        assert!("lavaLamp".parse::<ThemeId>().is_err());
    }

    #[test]
    fn every_preset_resolves() {
        let custom = CustomTheme::default();
        for id in ThemeId::PRESETS {
            let p = preset(id).unwrap();
            let colors = ThemeColors::resolve(id, &custom);
            assert_eq!(colors.water_color.as_str(), p.water_color);
            assert_eq!(colors.koi_color.as_str(), p.koi_color);
        }
    }

    #[test]
    fn custom_resolution_derives_secondary_and_particle() {
        let custom = CustomTheme::default();
        let colors = ThemeColors::resolve(ThemeId::Custom, &custom);
        assert_eq!(colors.water_color, custom.water_color);
        assert_eq!(colors.secondary_color, custom.water_color.adjusted(-30));
        assert_eq!(colors.particle_color, custom.water_color.adjusted(30));
    }

    #[test]
    fn custom_theme_json_uses_camel_case() {
        let json = serde_json::to_string(&CustomTheme::default()).unwrap();
        assert!(json.contains("\"waterColor\""));
        assert!(json.contains("\"rippleIntensity\""));
    }

    #[test]
    fn deserializing_bad_color_fails() {
        let json = r##"{"waterColor":"teal","rippleIntensity":0.5,
                       "particleEnabled":true,"koiColor":"#F97316","soundVolume":0.5}"##;
        assert!(serde_json::from_str::<CustomTheme>(json).is_err());
    }

    proptest! {
        #[test]
        fn sanitized_floats_stay_in_unit_interval(ripple in -10.0f32..10.0, volume in -10.0f32..10.0) {
            let theme = CustomTheme {
                ripple_intensity: ripple,
                sound_volume: volume,
                ..CustomTheme::default()
            }
            .sanitized();
            prop_assert!((0.0..=1.0).contains(&theme.ripple_intensity));
            prop_assert!((0.0..=1.0).contains(&theme.sound_volume));
        }
    }
}
