use std::path::Path;
use std::time::Duration;

use crate::Result;
use crate::error::Error as ToastflowError;
use crate::toast::{Dismissal, ToastMessage};

mod defaults;
mod env;
mod raw;
mod serde;

use self::serde::HumantimeDuration;

const MAX_DURATION: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub toasts: ToastSettings,
    pub export: ExportSettings,
    pub error: ErrorSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastSettings {
    pub default_dismiss: Dismissal,
}

/// Knobs of the flow that ends in a `success` toast with a download action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub duration: Duration,
    pub dismiss: Dismissal,
    pub loading: ToastMessage,
    pub done: ToastMessage,
    pub action_label: String,
}

/// Knobs of the flow that ends in an `error` toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSettings {
    pub duration: Duration,
    pub dismiss: Dismissal,
    pub loading: ToastMessage,
    pub failed: ToastMessage,
    pub reason: String,
}

impl Config {
    /// Load configuration from a file and the environment.
    ///
    /// The file is optional; a missing file yields the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be parsed, when
    /// environment overrides are invalid, or when the resulting values fail
    /// validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(ToastflowError::from)?;
        raw.apply_env_overrides().map_err(ToastflowError::from)?;
        raw.validate_and_build()
    }
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            default_dismiss: Dismissal::from_duration(defaults::default_toast_dismiss()),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            duration: defaults::default_export_duration(),
            dismiss: Dismissal::from_duration(defaults::default_export_dismiss()),
            loading: message(
                defaults::default_export_loading_title(),
                defaults::default_export_loading_description(),
            ),
            done: message(
                defaults::default_export_done_title(),
                defaults::default_export_done_description(),
            ),
            action_label: defaults::default_action_label(),
        }
    }
}

impl Default for ErrorSettings {
    fn default() -> Self {
        Self {
            duration: defaults::default_error_duration(),
            dismiss: Dismissal::from_duration(defaults::default_error_dismiss()),
            loading: message(defaults::default_error_loading_title(), None),
            failed: message(
                defaults::default_error_failed_title(),
                defaults::default_error_failed_description(),
            ),
            reason: defaults::default_error_reason(),
        }
    }
}

fn message(title: String, description: Option<String>) -> ToastMessage {
    let message = ToastMessage::new(title);
    match description.filter(|text| !text.trim().is_empty()) {
        Some(text) => message.with_description(text),
        None => message,
    }
}
