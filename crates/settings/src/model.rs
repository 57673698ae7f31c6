// Settings data model
// Serialized with the camelCase field names the host integration expects.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::locale::{CountryCode, LanguageCode, TriggerPage};

// ---------------------------------------------------------------------------
// Version + shared enums
// ---------------------------------------------------------------------------

/// Settings schema version, increasing with each release
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum SettingsVersion {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[default]
    #[serde(rename = "3")]
    Three,
}

impl SettingsVersion {
    pub const CURRENT: Self = Self::Three;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
        }
    }
}

/// Whether a feature is configured once for all countries or per country
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsType {
    Simple,
    Country,
}

/// Identifier field value. Stored as a string; older releases wrote numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Text(String),
    Number(serde_json::Number),
}

impl IdValue {
    /// The string form, or `None` for legacy numeric values
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Text for display and emptiness checks; numbers are rendered in decimal
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl Default for IdValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for IdValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for IdValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ---------------------------------------------------------------------------
// Locale entries (Voucher Network + Rewards)
// ---------------------------------------------------------------------------

/// Where the integration iframe is embedded on the page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSelector {
    pub selector: String,
    #[serde(rename = "where")]
    pub position: String,
}

/// One language of one country
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocaleEntry {
    pub is_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_source_number: Option<IdValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_medium_number: Option<IdValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iframe_container_query_selector: Option<ContainerSelector>,
}

impl LocaleEntry {
    /// Convenience constructor for a fully configured entry
    pub fn configured(source: &str, medium: &str) -> Self {
        Self {
            is_enabled: true,
            traffic_source_number: Some(source.into()),
            traffic_medium_number: Some(medium.into()),
            iframe_container_query_selector: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryEntry {
    pub languages: BTreeMap<LanguageCode, LocaleEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryMap {
    pub ids: BTreeMap<CountryCode, CountryEntry>,
}

impl CountryMap {
    /// Get or create the entry for `country`/`language`
    pub fn entry_mut(&mut self, country: &CountryCode, language: &LanguageCode) -> &mut LocaleEntry {
        self.ids
            .entry(country.clone())
            .or_default()
            .languages
            .entry(language.clone())
            .or_default()
    }

    pub fn entry(&self, country: &CountryCode, language: &LanguageCode) -> Option<&LocaleEntry> {
        self.ids.get(country)?.languages.get(language)
    }
}

// ---------------------------------------------------------------------------
// Feature sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoucherNetworkSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setting_type: Option<SettingsType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_tracking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple: Option<LocaleEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<CountryMap>,
}

impl VoucherNetworkSettings {
    /// True when none of the section's fields is set
    pub fn is_empty(&self) -> bool {
        self.setting_type.is_none()
            && self.cookie_tracking.is_none()
            && self.simple.is_none()
            && self.countries.is_none()
    }
}

/// Optimize entry: one Optimize ID with its enable switch
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizeEntry {
    pub is_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize_id: Option<IdValue>,
}

impl OptimizeEntry {
    pub fn new(is_enabled: bool, optimize_id: &str) -> Self {
        Self {
            is_enabled,
            optimize_id: Some(optimize_id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizeCountries {
    pub ids: BTreeMap<CountryCode, OptimizeEntry>,
    pub fall_back_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fall_back_id: Option<IdValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizeSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_type: Option<SettingsType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple: Option<OptimizeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<OptimizeCountries>,
}

impl OptimizeSettings {
    pub fn is_empty(&self) -> bool {
        self.settings_type.is_none() && self.simple.is_none() && self.countries.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeBenefitsSettings {
    pub is_enabled: bool,
    pub add_to_sidebar: bool,
    pub show_widget_on_dashboard: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<CountryMap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsSettings {
    pub pages: BTreeMap<TriggerPage, RewardsPage>,
}

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

/// Normalized settings. Absent sections are `None`, never empty objects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub version: SettingsVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_network: Option<VoucherNetworkSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimize: Option<OptimizeSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_products: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_benefits: Option<EmployeeBenefitsSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards: Option<RewardsSettings>,
}

impl AppSettings {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Structural comparison on the serialized form
    pub fn json_eq(&self, other: &AppSettings) -> bool {
        match (serde_json::to_value(self), serde_json::to_value(other)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// Loosely shaped input as read from storage or an external API.
/// `version` may hold anything; it is replaced during normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher_network: Option<VoucherNetworkSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize: Option<OptimizeSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_products: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_benefits: Option<EmployeeBenefitsSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards: Option<RewardsSettings>,
}

impl From<AppSettings> for RawSettings {
    fn from(settings: AppSettings) -> Self {
        Self {
            version: Some(serde_json::Value::String(settings.version.as_str().to_string())),
            voucher_network: settings.voucher_network,
            optimize: settings.optimize,
            checkout_products: settings.checkout_products,
            employee_benefits: settings.employee_benefits,
            rewards: settings.rewards,
        }
    }
}
