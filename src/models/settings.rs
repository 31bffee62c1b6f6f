use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::enums::Language;

/// Smallest field size the dashboard accepts (acres).
pub const MIN_FIELD_SIZE_ACRES: f64 = 0.1;

/// Field size used when the caller does not supply one (acres).
pub const DEFAULT_FIELD_SIZE_ACRES: f64 = 1.0;

#[derive(Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("Invalid {field} value: '{value}'")]
    InvalidEnum { field: String, value: String },

    #[error("Field size must be a number of acres, got '{0}'")]
    FieldSizeNotNumeric(String),

    #[error("Field size must be a finite number of acres >= {min}, got {value}")]
    InvalidFieldSize { value: f64, min: f64 },
}

/// Per-interaction settings. Affects display text and metric scaling only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub field_size_acres: f64,
    pub language: Language,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            field_size_acres: DEFAULT_FIELD_SIZE_ACRES,
            language: Language::English,
        }
    }
}

impl UserSettings {
    /// Build validated settings.
    pub fn new(field_size_acres: f64, language: Language) -> Result<Self, SettingsError> {
        validate_field_size(field_size_acres)?;
        Ok(Self {
            field_size_acres,
            language,
        })
    }

    /// Build settings from optional raw form values, falling back to defaults.
    pub fn from_raw(
        field_size: Option<&str>,
        language: Option<&str>,
    ) -> Result<Self, SettingsError> {
        let field_size_acres = match field_size.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| SettingsError::FieldSizeNotNumeric(raw.into()))?,
            None => DEFAULT_FIELD_SIZE_ACRES,
        };
        let language = match language.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<Language>()?,
            None => Language::default(),
        };
        Self::new(field_size_acres, language)
    }
}

fn validate_field_size(value: f64) -> Result<(), SettingsError> {
    if !value.is_finite() || value < MIN_FIELD_SIZE_ACRES {
        return Err(SettingsError::InvalidFieldSize {
            value,
            min: MIN_FIELD_SIZE_ACRES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_inputs() {
        let settings = UserSettings::default();
        assert_eq!(settings.field_size_acres, 1.0);
        assert_eq!(settings.language, Language::English);
    }

    #[test]
    fn rejects_zero_and_negative_field_size() {
        assert!(UserSettings::new(0.0, Language::English).is_err());
        assert!(UserSettings::new(-3.0, Language::English).is_err());
        assert!(UserSettings::new(0.05, Language::English).is_err());
    }

    #[test]
    fn rejects_non_finite_field_size() {
        assert!(UserSettings::new(f64::NAN, Language::Hindi).is_err());
        assert!(UserSettings::new(f64::INFINITY, Language::Hindi).is_err());
    }

    #[test]
    fn accepts_minimum_field_size() {
        let settings = UserSettings::new(MIN_FIELD_SIZE_ACRES, Language::Hindi).unwrap();
        assert_eq!(settings.field_size_acres, 0.1);
    }

    #[test]
    fn from_raw_uses_defaults_for_blank_values() {
        let settings = UserSettings::from_raw(Some("  "), None).unwrap();
        assert_eq!(settings, UserSettings::default());
    }

    #[test]
    fn from_raw_parses_values() {
        let settings = UserSettings::from_raw(Some("5.0"), Some("Hindi")).unwrap();
        assert_eq!(settings.field_size_acres, 5.0);
        assert_eq!(settings.language, Language::Hindi);
    }

    #[test]
    fn from_raw_rejects_garbage_field_size() {
        let err = UserSettings::from_raw(Some("five"), None).unwrap_err();
        assert_eq!(err, SettingsError::FieldSizeNotNumeric("five".into()));
        assert_eq!(err.to_string(), "Field size must be a number of acres, got 'five'");
    }

    #[test]
    fn from_raw_rejects_unknown_language() {
        let err = UserSettings::from_raw(None, Some("Klingon")).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidEnum { .. }));
    }
}
