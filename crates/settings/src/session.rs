// Save-cycle coordination
//
// The host keeps the last saved settings and an editable draft. Closing a
// configuration panel saves the draft through the host's async callback when
// it differs from the stored copy.

use std::future::Future;

use crate::error::SaveFailure;
use crate::model::AppSettings;
use crate::status::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Message for the host to show after a save attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Draft matched the stored settings; nothing was saved
    Unchanged,
    /// Draft was saved and both copies replaced by the callback's result
    Saved,
}

#[derive(Debug, Clone)]
pub struct SettingsSession {
    stored: AppSettings,
    draft: AppSettings,
    open_panel: Option<Feature>,
    notification: Option<Notification>,
}

impl SettingsSession {
    /// Start with `settings` as both the saved baseline and the draft
    pub fn new(settings: AppSettings) -> Self {
        Self {
            draft: settings.clone(),
            stored: settings,
            open_panel: None,
            notification: None,
        }
    }

    pub fn stored(&self) -> &AppSettings {
        &self.stored
    }

    pub fn draft(&self) -> &AppSettings {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut AppSettings {
        &mut self.draft
    }

    pub fn open_panel(&self) -> Option<Feature> {
        self.open_panel
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    pub fn open_configuration(&mut self, feature: Feature) {
        self.open_panel = Some(feature);
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.draft.json_eq(&self.stored)
    }

    /// Throw away edits and go back to the stored settings
    pub fn discard_changes(&mut self) {
        self.draft = self.stored.clone();
    }

    /// Close the open panel, saving the draft if it changed.
    ///
    /// On failure the panel is re-opened, an error notification is recorded
    /// and the draft is left untouched so the user can retry.
    pub async fn close_configuration<F, Fut>(&mut self, save: F) -> Result<CloseOutcome, SaveFailure>
    where
        F: FnOnce(AppSettings) -> Fut,
        Fut: Future<Output = Result<AppSettings, SaveFailure>>,
    {
        let panel = self.open_panel.take();
        if !self.has_unsaved_changes() {
            return Ok(CloseOutcome::Unchanged);
        }

        log::info!("saving settings (panel: {:?})", panel.map(|f| f.key()));
        match save(self.draft.clone()).await {
            Ok(canonical) => {
                self.stored = canonical.clone();
                self.draft = canonical;
                self.notification = Some(Notification::success("Settings saved"));
                Ok(CloseOutcome::Saved)
            }
            Err(failure) => {
                log::warn!("{failure}");
                self.open_panel = panel;
                self.notification = Some(Notification::error(failure.to_string()));
                Err(failure)
            }
        }
    }
}
