use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Serialized settings are not valid JSON or have the wrong shape.
    Parse(String),
    /// A field holds a value of the wrong type (programming error upstream).
    Validation { field: String, reason: String },
    /// TOML parse / deserialization error in the reconciler config.
    ConfigParse(String),
    /// Reconciler config validation error (empty names, etc.).
    ConfigValidation(String),
    /// Key-value store IO error.
    Store(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
            Self::Validation { field, reason } => {
                write!(f, "invalid value for '{field}': {reason}")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Store(msg) => write!(f, "store error: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Rejection reported by the host's save callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFailure {
    pub message: String,
}

impl SaveFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for SaveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to save settings: {}", self.message)
    }
}

impl std::error::Error for SaveFailure {}
