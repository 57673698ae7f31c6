//! "Effectively enabled" check shared by every feature.
//!
//! An entry counts as enabled only when its switch is on and every required
//! identifier is filled in. Which identifiers are required, and how strictly
//! they are checked, is declared per entry type through [`ConfigEntry`].

use std::sync::OnceLock;

use regex::Regex;

use crate::error::SettingsError;
use crate::model::{IdValue, LocaleEntry, OptimizeEntry};

/// How a required identifier is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRule {
    /// Any non-empty value. Legacy numeric values are accepted.
    NonEmpty,
    /// Non-empty string that is not all digits. Numbers are a type error.
    NonNumericString,
}

#[derive(Debug, Clone, Copy)]
pub struct RequiredField<'a> {
    pub name: &'static str,
    pub value: Option<&'a IdValue>,
    pub rule: IdRule,
}

impl<'a> RequiredField<'a> {
    pub fn new(name: &'static str, value: Option<&'a IdValue>, rule: IdRule) -> Self {
        Self { name, value, rule }
    }
}

/// Pure-digit IDs are placeholders, not real Optimize IDs
fn digits_only() -> &'static Regex {
    static DIGITS_ONLY: OnceLock<Regex> = OnceLock::new();
    DIGITS_ONLY.get_or_init(|| Regex::new(r"^[0-9]+$").unwrap())
}

fn field_is_filled(path: &str, field: &RequiredField<'_>) -> Result<bool, SettingsError> {
    let Some(value) = field.value else {
        return Ok(false);
    };
    match field.rule {
        IdRule::NonEmpty => Ok(!value.to_text().trim().is_empty()),
        IdRule::NonNumericString => match value {
            IdValue::Text(id) => Ok(!id.is_empty() && !digits_only().is_match(id)),
            IdValue::Number(n) => Err(SettingsError::Validation {
                field: format!("{path}.{}", field.name),
                reason: format!("expected a string ID, found number {n}"),
            }),
        },
    }
}

/// Generic completeness check.
///
/// `enable_override` replaces the stored switch value; it carries the value
/// about to be written while a toggle is in flight. Required fields are only
/// inspected when the entry is switched on.
pub fn is_entry_complete(
    is_enabled: bool,
    required: &[RequiredField<'_>],
    path: &str,
    enable_override: Option<bool>,
) -> Result<bool, SettingsError> {
    if !enable_override.unwrap_or(is_enabled) {
        return Ok(false);
    }
    for field in required {
        if !field_is_filled(path, field)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// An entry with an enable switch and required identifiers
pub trait ConfigEntry {
    fn is_enabled(&self) -> bool;

    fn required_fields(&self) -> Vec<RequiredField<'_>>;

    fn is_effectively_enabled(&self, path: &str, enable_override: Option<bool>) -> Result<bool, SettingsError> {
        is_entry_complete(self.is_enabled(), &self.required_fields(), path, enable_override)
    }
}

impl ConfigEntry for LocaleEntry {
    fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    fn required_fields(&self) -> Vec<RequiredField<'_>> {
        vec![
            RequiredField::new("trafficSourceNumber", self.traffic_source_number.as_ref(), IdRule::NonEmpty),
            RequiredField::new("trafficMediumNumber", self.traffic_medium_number.as_ref(), IdRule::NonEmpty),
        ]
    }
}

impl ConfigEntry for OptimizeEntry {
    fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    fn required_fields(&self) -> Vec<RequiredField<'_>> {
        vec![RequiredField::new("optimizeId", self.optimize_id.as_ref(), IdRule::NonNumericString)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(enabled: bool, source: &str, medium: &str) -> LocaleEntry {
        LocaleEntry {
            is_enabled: enabled,
            traffic_source_number: Some(source.into()),
            traffic_medium_number: Some(medium.into()),
            iframe_container_query_selector: None,
        }
    }

    #[test]
    fn locale_requires_both_numbers() {
        assert!(locale(true, "1", "2").is_effectively_enabled("vn", None).unwrap());
        assert!(!locale(true, "", "2").is_effectively_enabled("vn", None).unwrap());
        assert!(!locale(true, "1", " ").is_effectively_enabled("vn", None).unwrap());
        assert!(!locale(false, "1", "2").is_effectively_enabled("vn", None).unwrap());

        let missing = LocaleEntry {
            is_enabled: true,
            ..LocaleEntry::default()
        };
        assert!(!missing.is_effectively_enabled("vn", None).unwrap());
    }

    #[test]
    fn locale_accepts_legacy_numbers() {
        let entry: LocaleEntry = serde_json::from_str(
            r#"{"isEnabled": true, "trafficSourceNumber": 11, "trafficMediumNumber": 2}"#,
        )
        .unwrap();
        assert!(entry.is_effectively_enabled("vn", None).unwrap());
    }

    #[test]
    fn optimize_rejects_digit_only_ids() {
        assert!(!OptimizeEntry::new(true, "12345").is_effectively_enabled("o", None).unwrap());
        assert!(OptimizeEntry::new(true, "abc123").is_effectively_enabled("o", None).unwrap());
        assert!(!OptimizeEntry::new(true, "").is_effectively_enabled("o", None).unwrap());
    }

    #[test]
    fn optimize_numeric_id_is_validation_error() {
        let entry: OptimizeEntry = serde_json::from_str(r#"{"isEnabled": true, "optimizeId": 42}"#).unwrap();
        let err = entry.is_effectively_enabled("optimize.simple", None).unwrap_err();
        assert_eq!(
            err,
            SettingsError::Validation {
                field: "optimize.simple.optimizeId".into(),
                reason: "expected a string ID, found number 42".into(),
            }
        );
    }

    #[test]
    fn disabled_entries_skip_field_checks() {
        let entry: OptimizeEntry = serde_json::from_str(r#"{"isEnabled": false, "optimizeId": 42}"#).unwrap();
        assert!(!entry.is_effectively_enabled("o", None).unwrap());
    }

    #[test]
    fn override_wins_over_stored_switch() {
        let off = locale(false, "1", "2");
        assert!(off.is_effectively_enabled("vn", Some(true)).unwrap());

        let on = OptimizeEntry::new(true, "abc");
        assert!(!on.is_effectively_enabled("o", Some(false)).unwrap());
    }
}
