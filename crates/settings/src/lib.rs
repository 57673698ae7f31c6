//! `sovendus-settings`: settings reconciliation for the Sovendus App.
//!
//! Normalizes raw or legacy settings, derives per-feature status, and
//! coordinates the stored/draft save cycle. No UI or transport code.

pub mod config;
pub mod entry;
pub mod error;
pub mod locale;
pub mod model;
pub mod normalize;
pub mod reconciler;
pub mod session;
pub mod status;
pub mod store;
pub mod tour;

pub use config::ReconcilerConfig;
pub use error::{SaveFailure, SettingsError};
pub use model::{AppSettings, RawSettings, SettingsVersion};
pub use normalize::{normalize, SettingsInput};
pub use reconciler::SettingsReconciler;
pub use session::{CloseOutcome, SettingsSession};
pub use status::{EnableOverride, EntryPath, Feature, FeatureStatus, StatusSummary};
pub use store::{FileStore, KeyValueStore, MemoryStore};
