//! Configuration management
//!
//! Settings live in `settings.json` inside the cartola directory:
//! ```json
//! {
//!   "fallbackYear": 2025,
//!   "defaultFormat": "xlsx",
//!   "sheetName": "Movimientos",
//!   "dateFormat": "dd/mm/yyyy"
//! }
//! ```
//! Keys this crate does not know about are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::result::{Error, Result};
use crate::domain::FALLBACK_YEAR;
use crate::ports::ExportFormat;

/// Environment variable overriding the fallback year
pub const FALLBACK_YEAR_ENV: &str = "CARTOLA_FALLBACK_YEAR";

const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_SHEET_NAME: &str = "Movimientos";
const DEFAULT_DATE_FORMAT: &str = "dd/mm/yyyy";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fallback_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_format: Option<ExportFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sheet_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_format: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Cartola configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Year used when the statement text names none
    pub fallback_year: i32,
    pub default_format: ExportFormat,
    /// Worksheet name for XLSX output
    pub sheet_name: String,
    /// Excel number format for the date column
    pub date_format: String,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_year: FALLBACK_YEAR,
            default_format: ExportFormat::default(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the cartola directory
    ///
    /// A missing file gives defaults. `CARTOLA_FALLBACK_YEAR` overrides the
    /// fallback year from the file.
    pub fn load(cartola_dir: &Path) -> Result<Self> {
        let settings_path = cartola_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(
                    path = %settings_path.display(),
                    error = %e,
                    "ignoring unreadable settings file"
                );
                SettingsFile::default()
            })
        } else {
            SettingsFile::default()
        };

        let env_year = std::env::var(FALLBACK_YEAR_ENV).ok();
        Self::from_settings(raw, env_year.as_deref())
    }

    fn from_settings(raw: SettingsFile, fallback_override: Option<&str>) -> Result<Self> {
        let fallback_year = match fallback_override.map(str::trim) {
            Some(value) if !value.is_empty() => parse_year(value)?,
            _ => raw.fallback_year.unwrap_or(FALLBACK_YEAR),
        };

        Ok(Self {
            fallback_year,
            default_format: raw.default_format.unwrap_or_default(),
            sheet_name: raw
                .sheet_name
                .clone()
                .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
            date_format: raw
                .date_format
                .clone()
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            _raw_settings: raw,
        })
    }

    /// Save config to the cartola directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, cartola_dir: &Path) -> Result<()> {
        let settings_path = cartola_dir.join(SETTINGS_FILE);

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content)
                .unwrap_or_else(|_| self._raw_settings.clone())
        } else {
            self._raw_settings.clone()
        };

        settings.fallback_year = Some(self.fallback_year);
        settings.default_format = Some(self.default_format);
        settings.sheet_name = Some(self.sheet_name.clone());
        settings.date_format = Some(self.date_format.clone());

        std::fs::create_dir_all(cartola_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}

fn parse_year(value: &str) -> Result<i32> {
    match value.parse::<i32>() {
        Ok(year) if (1000..=9999).contains(&year) => Ok(year),
        _ => Err(Error::config(format!(
            "{} must be a 4-digit year, got '{}'",
            FALLBACK_YEAR_ENV, value
        ))),
    }
}
