//! CLI Exit Code Registry
//!
//! Single source of truth for `sovendus` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | `diff`: settings differ                         |
//! | 2    | Usage error (bad args, unreadable input file)   |
//! | 3    | Settings or config could not be parsed          |
//! | 4    | Settings or config failed validation            |
//! | 5    | Key-value store error                           |
//! | 6    | Save callback rejected the settings             |

use sovendus_settings::SettingsError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Settings differ. Like `diff(1)`, exit 1 means "files differ."
pub const EXIT_DIFF_DIFFS: u8 = 1;

/// Usage error - bad arguments, missing input file.
pub const EXIT_USAGE: u8 = 2;

/// Malformed settings JSON or reconciler config.
pub const EXIT_PARSE: u8 = 3;

/// Type invariant violated (e.g. numeric Optimize ID) or invalid config.
pub const EXIT_VALIDATION: u8 = 4;

/// Key-value store could not be read or written.
pub const EXIT_STORE: u8 = 5;

/// Save failed.
pub const EXIT_SAVE_FAILED: u8 = 6;

/// Map a SettingsError to its exit code.
pub fn settings_exit_code(err: &SettingsError) -> u8 {
    match err {
        SettingsError::Parse(_) | SettingsError::ConfigParse(_) => EXIT_PARSE,
        SettingsError::ConfigValidation(_) | SettingsError::Validation { .. } => EXIT_VALIDATION,
        SettingsError::Store(_) => EXIT_STORE,
    }
}
