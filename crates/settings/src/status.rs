//! Derived feature status.
//!
//! Status is recomputed from the settings on every call. Missing sections or
//! entries read as "not active"; the only error is a wrongly typed Optimize ID.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ReconcilerConfig;
use crate::entry::{is_entry_complete, ConfigEntry, IdRule, RequiredField};
use crate::error::SettingsError;
use crate::locale::{CountryCode, LanguageCode, TriggerPage};
use crate::model::{AppSettings, CountryMap, OptimizeSettings, SettingsType};

const ALL_COUNTRIES: &str = "Enabled for all countries";
const FALLBACK_SUFFIX: &str = "; fallback ID for other countries";

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    VoucherNetwork,
    CheckoutBenefits,
    Optimize,
    CheckoutProducts,
    EmployeeBenefits,
    Rewards,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::VoucherNetwork,
        Feature::CheckoutBenefits,
        Feature::Optimize,
        Feature::CheckoutProducts,
        Feature::EmployeeBenefits,
        Feature::Rewards,
    ];

    /// Settings-style key (`"voucherNetwork"`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            Self::VoucherNetwork => "voucherNetwork",
            Self::CheckoutBenefits => "checkoutBenefits",
            Self::Optimize => "optimize",
            Self::CheckoutProducts => "checkoutProducts",
            Self::EmployeeBenefits => "employeeBenefits",
            Self::Rewards => "rewards",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::VoucherNetwork => "Voucher Network",
            Self::CheckoutBenefits => "Checkout Benefits",
            Self::Optimize => "Optimize",
            Self::CheckoutProducts => "Checkout Products",
            Self::EmployeeBenefits => "Employee Benefits",
            Self::Rewards => "Rewards",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Feature {
    type Err = String;

    /// Accepts the settings key or its kebab-case form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| *c != '-' && *c != '_').collect();
        Feature::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown feature: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatusSummary {
    Text(String),
    /// Enabled locale names grouped by trigger page (Rewards)
    ByPage(BTreeMap<TriggerPage, Vec<String>>),
}

impl StatusSummary {
    /// Human-readable text, with page names from `config`
    pub fn render(&self, config: &ReconcilerConfig) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::ByPage(pages) if pages.is_empty() => config.summary.none_enabled.clone(),
            Self::ByPage(pages) => pages
                .iter()
                .map(|(page, names)| format!("{}: {}", config.page_name(page), names.join(", ")))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&ReconcilerConfig::default()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureStatus {
    pub feature: Feature,
    pub active: bool,
    pub summary: StatusSummary,
}

// ---------------------------------------------------------------------------
// Mid-edit override
// ---------------------------------------------------------------------------

/// Identifies a single toggleable entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPath {
    VoucherNetwork { country: CountryCode, language: LanguageCode },
    OptimizeSimple,
    OptimizeCountry { country: CountryCode },
    Rewards { page: TriggerPage, country: CountryCode, language: LanguageCode },
}

/// Switch value about to be written to `target`, not yet merged into the settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnableOverride {
    pub target: EntryPath,
    pub enabled: bool,
}

impl EnableOverride {
    pub fn new(target: EntryPath, enabled: bool) -> Self {
        Self { target, enabled }
    }

    fn for_path(ov: Option<&Self>, path: &EntryPath) -> Option<bool> {
        ov.filter(|o| &o.target == path).map(|o| o.enabled)
    }
}

// ---------------------------------------------------------------------------
// Per-feature computation
// ---------------------------------------------------------------------------

pub fn compute_status(
    feature: Feature,
    settings: &AppSettings,
    config: &ReconcilerConfig,
    ov: Option<&EnableOverride>,
) -> Result<FeatureStatus, SettingsError> {
    let (active, summary) = match feature {
        Feature::VoucherNetwork | Feature::CheckoutBenefits => voucher_network_status(settings, config, ov)?,
        Feature::Optimize => optimize_status(settings, config, ov)?,
        Feature::CheckoutProducts => checkout_products_status(settings),
        Feature::EmployeeBenefits => employee_benefits_status(settings),
        Feature::Rewards => rewards_status(settings, config, ov)?,
    };
    Ok(FeatureStatus { feature, active, summary })
}

/// Names of all effectively enabled country/language entries
fn enabled_locales(
    countries: Option<&CountryMap>,
    path: &str,
    config: &ReconcilerConfig,
    override_for: impl Fn(&CountryCode, &LanguageCode) -> Option<bool>,
) -> Result<Vec<String>, SettingsError> {
    let mut names = Vec::new();
    let Some(countries) = countries else {
        return Ok(names);
    };

    for (country, entry) in &countries.ids {
        let multi_language = entry.languages.len() > 1;
        for (language, locale) in &entry.languages {
            let entry_path = format!("{path}.ids.{country}.languages.{language}");
            if locale.is_effectively_enabled(&entry_path, override_for(country, language))? {
                names.push(config.locale_name(country, language, multi_language));
            }
        }
    }
    Ok(names)
}

fn voucher_network_status(
    settings: &AppSettings,
    config: &ReconcilerConfig,
    ov: Option<&EnableOverride>,
) -> Result<(bool, StatusSummary), SettingsError> {
    let countries = settings.voucher_network.as_ref().and_then(|vn| vn.countries.as_ref());
    let names = enabled_locales(countries, "voucherNetwork.countries", config, |country, language| {
        EnableOverride::for_path(
            ov,
            &EntryPath::VoucherNetwork {
                country: country.clone(),
                language: language.clone(),
            },
        )
    })?;
    Ok((!names.is_empty(), StatusSummary::Text(config.enabled_summary(&names))))
}

fn optimize_status(
    settings: &AppSettings,
    config: &ReconcilerConfig,
    ov: Option<&EnableOverride>,
) -> Result<(bool, StatusSummary), SettingsError> {
    let none = || (false, StatusSummary::Text(config.summary.none_enabled.clone()));
    let Some(optimize) = settings.optimize.as_ref() else {
        return Ok(none());
    };

    // Only the entries of the selected mode count; the other mode's data is stale
    match optimize.settings_type {
        Some(SettingsType::Simple) => {
            let enabled = match optimize.simple.as_ref() {
                Some(entry) => entry.is_effectively_enabled(
                    "optimize.simple",
                    EnableOverride::for_path(ov, &EntryPath::OptimizeSimple),
                )?,
                None => false,
            };
            if enabled {
                Ok((true, StatusSummary::Text(ALL_COUNTRIES.to_string())))
            } else {
                Ok(none())
            }
        }
        Some(SettingsType::Country) => optimize_country_status(optimize, config, ov),
        None => Ok(none()),
    }
}

fn optimize_country_status(
    optimize: &OptimizeSettings,
    config: &ReconcilerConfig,
    ov: Option<&EnableOverride>,
) -> Result<(bool, StatusSummary), SettingsError> {
    let Some(countries) = optimize.countries.as_ref() else {
        return Ok((false, StatusSummary::Text(config.summary.none_enabled.clone())));
    };

    let mut names = Vec::new();
    for (country, entry) in &countries.ids {
        let path = format!("optimize.countries.ids.{country}");
        let target = EntryPath::OptimizeCountry { country: country.clone() };
        if entry.is_effectively_enabled(&path, EnableOverride::for_path(ov, &target))? {
            names.push(config.country_name(country).to_string());
        }
    }

    let active = !names.is_empty();
    let mut summary = config.enabled_summary(&names);
    if active {
        let fallback = [RequiredField::new(
            "fallBackId",
            countries.fall_back_id.as_ref(),
            IdRule::NonNumericString,
        )];
        if is_entry_complete(countries.fall_back_enabled, &fallback, "optimize.countries", None)? {
            summary.push_str(FALLBACK_SUFFIX);
        }
    }
    Ok((active, StatusSummary::Text(summary)))
}

fn checkout_products_status(settings: &AppSettings) -> (bool, StatusSummary) {
    let active = settings.checkout_products.unwrap_or(false);
    let summary = if active {
        "Checkout Products is enabled"
    } else {
        "Checkout Products is disabled"
    };
    (active, StatusSummary::Text(summary.to_string()))
}

fn employee_benefits_status(settings: &AppSettings) -> (bool, StatusSummary) {
    let Some(eb) = settings.employee_benefits.as_ref().filter(|eb| eb.is_enabled) else {
        return (false, StatusSummary::Text("Disabled".to_string()));
    };

    // Placement flags are informational only
    let mut placements = Vec::new();
    if eb.add_to_sidebar {
        placements.push("sidebar");
    }
    if eb.show_widget_on_dashboard {
        placements.push("dashboard widget");
    }
    let summary = if placements.is_empty() {
        "Enabled".to_string()
    } else {
        format!("Enabled ({})", placements.join(", "))
    };
    (true, StatusSummary::Text(summary))
}

fn rewards_status(
    settings: &AppSettings,
    config: &ReconcilerConfig,
    ov: Option<&EnableOverride>,
) -> Result<(bool, StatusSummary), SettingsError> {
    let mut by_page = BTreeMap::new();
    if let Some(rewards) = settings.rewards.as_ref() {
        for (page, page_settings) in &rewards.pages {
            let path = format!("rewards.pages.{page}.countries");
            let names = enabled_locales(page_settings.countries.as_ref(), &path, config, |country, language| {
                EnableOverride::for_path(
                    ov,
                    &EntryPath::Rewards {
                        page: page.clone(),
                        country: country.clone(),
                        language: language.clone(),
                    },
                )
            })?;
            if !names.is_empty() {
                by_page.insert(page.clone(), names);
            }
        }
    }
    Ok((!by_page.is_empty(), StatusSummary::ByPage(by_page)))
}
