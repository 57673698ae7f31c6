//! Settings normalization.
//!
//! Turns raw, possibly legacy settings into a sparse [`AppSettings`] stamped
//! with the current schema version. Sections are kept only when at least one
//! of their fields is present.

use crate::error::SettingsError;
use crate::model::{AppSettings, OptimizeSettings, RawSettings, SettingsVersion, VoucherNetworkSettings};

/// Settings as handed over by the host: an object or its JSON string
#[derive(Debug, Clone)]
pub enum SettingsInput {
    Object(RawSettings),
    Serialized(String),
}

impl From<RawSettings> for SettingsInput {
    fn from(raw: RawSettings) -> Self {
        Self::Object(raw)
    }
}

impl From<AppSettings> for SettingsInput {
    fn from(settings: AppSettings) -> Self {
        Self::Object(settings.into())
    }
}

impl From<String> for SettingsInput {
    fn from(json: String) -> Self {
        Self::Serialized(json)
    }
}

impl From<&str> for SettingsInput {
    fn from(json: &str) -> Self {
        Self::Serialized(json.to_string())
    }
}

/// Parse the serialized form without normalizing it
pub fn parse_raw(json: &str) -> Result<RawSettings, SettingsError> {
    serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))
}

/// Normalize an object or JSON string. Fails only on unreadable JSON.
pub fn normalize(input: impl Into<SettingsInput>) -> Result<AppSettings, SettingsError> {
    let raw = match input.into() {
        SettingsInput::Object(raw) => raw,
        SettingsInput::Serialized(json) => parse_raw(&json)?,
    };
    Ok(normalize_raw(raw))
}

pub fn normalize_raw(raw: RawSettings) -> AppSettings {
    let RawSettings {
        version,
        voucher_network,
        optimize,
        checkout_products,
        employee_benefits,
        rewards,
    } = raw;

    let current = SettingsVersion::CURRENT.as_str();
    match version.as_ref().and_then(|v| v.as_str()) {
        Some(v) if v == current => {}
        _ => log::debug!("upgrading settings version {version:?} to {current}"),
    }

    AppSettings {
        version: SettingsVersion::CURRENT,
        voucher_network: voucher_network.and_then(non_empty_voucher_network),
        optimize: optimize.and_then(non_empty_optimize),
        checkout_products,
        employee_benefits,
        rewards,
    }
}

fn non_empty_voucher_network(section: VoucherNetworkSettings) -> Option<VoucherNetworkSettings> {
    if section.is_empty() {
        log::debug!("dropping empty voucherNetwork section");
        return None;
    }
    Some(section)
}

fn non_empty_optimize(section: OptimizeSettings) -> Option<OptimizeSettings> {
    if section.is_empty() {
        log::debug!("dropping empty optimize section");
        return None;
    }
    Some(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EmployeeBenefitsSettings, SettingsType};
    use serde_json::json;

    fn normalized_json(input: &str) -> serde_json::Value {
        serde_json::to_value(normalize(input).unwrap()).unwrap()
    }

    #[test]
    fn empty_input_only_gets_version() {
        assert_eq!(normalized_json("{}"), json!({ "version": "3" }));
    }

    #[test]
    fn legacy_version_is_upgraded() {
        let settings = normalize(r#"{"version": 1, "checkoutProducts": true}"#).unwrap();
        assert_eq!(settings.version, SettingsVersion::CURRENT);
        assert_eq!(settings.checkout_products, Some(true));

        let settings = normalize(r#"{"version": "2"}"#).unwrap();
        assert_eq!(settings.version, SettingsVersion::CURRENT);
    }

    #[test]
    fn empty_sections_are_dropped() {
        let value = normalized_json(r#"{"voucherNetwork": {}, "optimize": {"unknownKey": 1}}"#);
        assert_eq!(value, json!({ "version": "3" }));
    }

    #[test]
    fn present_fields_are_kept() {
        let settings = normalize(
            r#"{
                "optimize": {"settingsType": "simple"},
                "voucherNetwork": {"cookieTracking": false},
                "employeeBenefits": {"isEnabled": true}
            }"#,
        )
        .unwrap();

        let optimize = settings.optimize.unwrap();
        assert_eq!(optimize.settings_type, Some(SettingsType::Simple));
        assert!(optimize.simple.is_none());
        assert!(optimize.countries.is_none());

        let vn = settings.voucher_network.unwrap();
        assert_eq!(vn.cookie_tracking, Some(false));
        assert!(vn.setting_type.is_none());

        assert_eq!(
            settings.employee_benefits,
            Some(EmployeeBenefitsSettings {
                is_enabled: true,
                add_to_sidebar: false,
                show_widget_on_dashboard: false,
            })
        );
    }

    #[test]
    fn rewards_are_carried_through() {
        let value = normalized_json(r#"{"rewards": {"pages": {"myOrders": {}}}}"#);
        assert_eq!(value["rewards"], json!({ "pages": { "myOrders": {} } }));
    }

    #[test]
    fn country_without_languages_is_passed_through() {
        let settings = normalize(r#"{"voucherNetwork": {"countries": {"ids": {"DE": {}}}}}"#).unwrap();
        let countries = settings.voucher_network.unwrap().countries.unwrap();
        assert!(countries.ids[&"DE".into()].languages.is_empty());
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(normalize("{not json"), Err(SettingsError::Parse(_))));
        assert!(matches!(
            normalize(r#"{"checkoutProducts": "yes"}"#),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn object_input_needs_no_parsing() {
        let settings = AppSettings {
            checkout_products: Some(false),
            ..AppSettings::default()
        };
        assert_eq!(normalize(settings.clone()).unwrap(), settings);
    }
}
