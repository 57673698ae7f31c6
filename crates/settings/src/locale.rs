// Country, language and trigger-page vocabulary
//
// Codes come from the host's integration-types contract. Unknown codes are
// carried through unchanged and displayed by their raw value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-letter country code as used in settings maps (`"DE"`, `"CH"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Built-in English name, or the raw code for unknown countries
    pub fn display_name(&self) -> &str {
        country_name(&self.0).unwrap_or(&self.0)
    }
}

impl From<&str> for CountryCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Two-letter language code (`"de"`, `"fr"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn display_name(&self) -> &str {
        language_name(&self.0).unwrap_or(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Page on which a Rewards integration is triggered
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerPage(String);

impl TriggerPage {
    pub const MY_ACCOUNT_DASHBOARD: &'static str = "myAccountDashboard";
    pub const MY_ORDERS: &'static str = "myOrders";
    pub const MY_ORDERS_DETAIL: &'static str = "myOrdersDetail";

    pub fn new(page: impl Into<String>) -> Self {
        Self(page.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn display_name(&self) -> &str {
        match self.0.as_str() {
            Self::MY_ACCOUNT_DASHBOARD => "My Account Dashboard",
            Self::MY_ORDERS => "My Orders",
            Self::MY_ORDERS_DETAIL => "Order Details",
            other => other,
        }
    }
}

impl From<&str> for TriggerPage {
    fn from(page: &str) -> Self {
        Self::new(page)
    }
}

impl fmt::Display for TriggerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn country_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "AT" => "Austria",
        "BE" => "Belgium",
        "CH" => "Switzerland",
        "CZ" => "Czechia",
        "DE" => "Germany",
        "DK" => "Denmark",
        "ES" => "Spain",
        "FI" => "Finland",
        "FR" => "France",
        "GB" => "United Kingdom",
        "IE" => "Ireland",
        "IT" => "Italy",
        "LU" => "Luxembourg",
        "NL" => "Netherlands",
        "NO" => "Norway",
        "PL" => "Poland",
        "PT" => "Portugal",
        "SE" => "Sweden",
        "US" => "United States",
        _ => return None,
    };
    Some(name)
}

fn language_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "cs" => "Czech",
        "da" => "Danish",
        "de" => "German",
        "en" => "English",
        "es" => "Spanish",
        "fi" => "Finnish",
        "fr" => "French",
        "it" => "Italian",
        "nl" => "Dutch",
        "no" => "Norwegian",
        "pl" => "Polish",
        "pt" => "Portuguese",
        "sv" => "Swedish",
        _ => return None,
    };
    Some(name)
}
