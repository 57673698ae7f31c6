use crate::config::ReconcilerConfig;
use crate::error::SettingsError;
use crate::model::AppSettings;
use crate::normalize::{self, SettingsInput};
use crate::status::{self, EnableOverride, Feature, FeatureStatus};

/// Entry point for hosts: normalization plus per-feature status.
///
/// Holds only display configuration; every operation is a pure function of
/// its arguments and safe to call on each render.
#[derive(Debug, Clone, Default)]
pub struct SettingsReconciler {
    config: ReconcilerConfig,
}

impl SettingsReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn normalize(&self, input: impl Into<SettingsInput>) -> Result<AppSettings, SettingsError> {
        normalize::normalize(input)
    }

    pub fn feature_status(&self, feature: Feature, settings: &AppSettings) -> Result<FeatureStatus, SettingsError> {
        status::compute_status(feature, settings, &self.config, None)
    }

    /// Status while a switch is being toggled: `ov` wins over the stored flag
    pub fn feature_status_with_override(
        &self,
        feature: Feature,
        settings: &AppSettings,
        ov: Option<&EnableOverride>,
    ) -> Result<FeatureStatus, SettingsError> {
        status::compute_status(feature, settings, &self.config, ov)
    }

    /// Status of every feature, in [`Feature::ALL`] order
    pub fn all_statuses(&self, settings: &AppSettings) -> Result<Vec<FeatureStatus>, SettingsError> {
        Feature::ALL
            .into_iter()
            .map(|feature| self.feature_status(feature, settings))
            .collect()
    }
}
