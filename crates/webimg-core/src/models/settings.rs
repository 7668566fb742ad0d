//! Per-request conversion settings.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_QUALITY;

/// JPEG quality, always within `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Clamp any integer into range.
    pub fn clamped(value: i64) -> Self {
        Quality(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Parse user input: numbers are clamped, anything unparsable gives `default`.
    pub fn parse_or(raw: Option<&str>, default: Quality) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return default;
        };
        match raw.parse::<i64>() {
            Ok(v) => Self::clamped(v),
            Err(_) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Self::clamped(v.round() as i64),
                _ => default,
            },
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality(DEFAULT_QUALITY)
    }
}

/// Truthy form/JSON values: `1`, `true`, `yes`, `on` (any case).
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOptions {
    pub quality: Quality,
    /// Leave PNG files as PNG instead of re-encoding to JPEG
    pub keep_png: bool,
    /// Append SKU and `-web` to output names
    pub enhance_filenames: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_defaults_on_missing_or_invalid() {
        let d = Quality::default();
        assert_eq!(Quality::parse_or(None, d).value(), 95);
        assert_eq!(Quality::parse_or(Some("   "), d).value(), 95);
        assert_eq!(Quality::parse_or(Some("high"), d).value(), 95);
    }

    #[test]
    fn quality_is_clamped() {
        let d = Quality::default();
        assert_eq!(Quality::parse_or(Some("0"), d).value(), 1);
        assert_eq!(Quality::parse_or(Some("-20"), d).value(), 1);
        assert_eq!(Quality::parse_or(Some("250"), d).value(), 100);
        assert_eq!(Quality::parse_or(Some(" 80 "), d).value(), 80);
        assert_eq!(Quality::parse_or(Some("72.6"), d).value(), 73);
    }

    #[test]
    fn flags_accept_common_truthy_values() {
        for raw in ["1", "true", "TRUE", "yes", "On"] {
            assert!(parse_flag(Some(raw)), "{raw} should be true");
        }
        for raw in ["0", "false", "no", "off", "", "maybe"] {
            assert!(!parse_flag(Some(raw)), "{raw} should be false");
        }
        assert!(!parse_flag(None));
    }
}
