use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SettingsError;
use crate::locale::{CountryCode, LanguageCode, TriggerPage};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Display configuration for status summaries.
///
/// Every section is optional. Name overrides take precedence over the
/// built-in English names; codes without a name fall back to the raw code.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    pub summary: SummaryConfig,
    pub country_names: HashMap<String, String>,
    pub language_names: HashMap<String, String>,
    pub page_names: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Summary when no locale is enabled
    pub none_enabled: String,
    /// Prefix in front of the comma-joined locale list
    pub enabled_prefix: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            none_enabled: "No countries enabled".to_string(),
            enabled_prefix: "Enabled for: ".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Name lookup
// ---------------------------------------------------------------------------

impl ReconcilerConfig {
    pub fn country_name<'a>(&'a self, code: &'a CountryCode) -> &'a str {
        self.country_names
            .get(code.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| code.display_name())
    }

    pub fn language_name<'a>(&'a self, code: &'a LanguageCode) -> &'a str {
        self.language_names
            .get(code.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| code.display_name())
    }

    pub fn page_name<'a>(&'a self, page: &'a TriggerPage) -> &'a str {
        self.page_names
            .get(page.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| page.display_name())
    }

    /// Label for one enabled locale. Countries configured with a single
    /// language are shown by country name alone.
    pub fn locale_name(&self, country: &CountryCode, language: &LanguageCode, multi_language: bool) -> String {
        if multi_language {
            format!("{} ({})", self.country_name(country), self.language_name(language))
        } else {
            self.country_name(country).to_string()
        }
    }

    /// `"Enabled for: a, b"` or the configured "none" text
    pub fn enabled_summary(&self, names: &[String]) -> String {
        if names.is_empty() {
            self.summary.none_enabled.clone()
        } else {
            format!("{}{}", self.summary.enabled_prefix, names.join(", "))
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconcilerConfig {
    pub fn from_toml(input: &str) -> Result<Self, SettingsError> {
        let config: ReconcilerConfig =
            toml::from_str(input).map_err(|e| SettingsError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SettingsError::ConfigParse(format!("{}: {e}", path.display())))?;
        Self::from_toml(&contents)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.summary.none_enabled.trim().is_empty() {
            return Err(SettingsError::ConfigValidation(
                "summary.none_enabled must not be empty".into(),
            ));
        }
        if self.summary.enabled_prefix.trim().is_empty() {
            return Err(SettingsError::ConfigValidation(
                "summary.enabled_prefix must not be empty".into(),
            ));
        }

        let tables = [
            ("country_names", &self.country_names),
            ("language_names", &self.language_names),
            ("page_names", &self.page_names),
        ];
        for (table, names) in tables {
            for (code, name) in names {
                if name.trim().is_empty() {
                    return Err(SettingsError::ConfigValidation(format!(
                        "{table}.{code}: name must not be empty"
                    )));
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
