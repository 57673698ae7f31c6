// Onboarding tour progress, kept in an injected key-value store

use crate::error::SettingsError;
use crate::status::Feature;
use crate::store::KeyValueStore;

const KEY_PREFIX: &str = "sovendus.tour.";
const COMPLETED: &str = "completed";

pub struct TourProgress<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TourProgress<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key(feature: Feature) -> String {
        format!("{KEY_PREFIX}{}", feature.key())
    }

    pub fn is_completed(&self, feature: Feature) -> Result<bool, SettingsError> {
        Ok(self.store.get(&Self::key(feature))?.as_deref() == Some(COMPLETED))
    }

    pub fn mark_completed(&mut self, feature: Feature) -> Result<(), SettingsError> {
        self.store.set(&Self::key(feature), COMPLETED)
    }

    /// Forget progress so the tour is shown again
    pub fn reset(&mut self, feature: Feature) -> Result<(), SettingsError> {
        self.store.remove(&Self::key(feature))
    }

    /// Features from `features` whose tour has not been completed yet
    pub fn pending(&self, features: &[Feature]) -> Result<Vec<Feature>, SettingsError> {
        let mut pending = Vec::new();
        for &feature in features {
            if !self.is_completed(feature)? {
                pending.push(feature);
            }
        }
        Ok(pending)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
