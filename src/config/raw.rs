use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;
use crate::toast::Dismissal;

use super::defaults::{
    default_action_label, default_error_dismiss, default_error_duration,
    default_error_failed_description, default_error_failed_title, default_error_loading_title,
    default_error_reason, default_export_dismiss, default_export_done_description,
    default_export_done_title, default_export_duration, default_export_loading_description,
    default_export_loading_title, default_toast_dismiss,
};
use super::env::{Lookup, env_duration, env_string};
use super::{
    Config, ErrorSettings, ExportSettings, HumantimeDuration, MAX_DURATION, ToastSettings, message,
};

const ENV_PREFIX: &str = "TOASTFLOW";

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let builder = ::config::Config::builder()
        .add_source(::config::File::from(path.as_ref()).required(false))
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) toasts: RawToasts,
    #[serde(default)]
    pub(super) export: RawExport,
    #[serde(default)]
    pub(super) error: RawError,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawToasts {
    #[serde(default = "default_toast_dismiss")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) default_dismiss: Duration,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawExport {
    #[serde(default = "default_export_duration")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) duration: Duration,
    #[serde(default = "default_export_dismiss")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) dismiss: Duration,
    #[serde(default = "default_export_loading_title")]
    pub(super) loading_title: String,
    #[serde(default = "default_export_loading_description")]
    pub(super) loading_description: Option<String>,
    #[serde(default = "default_export_done_title")]
    pub(super) done_title: String,
    #[serde(default = "default_export_done_description")]
    pub(super) done_description: Option<String>,
    #[serde(default = "default_action_label")]
    pub(super) action_label: String,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawError {
    #[serde(default = "default_error_duration")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) duration: Duration,
    #[serde(default = "default_error_dismiss")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) dismiss: Duration,
    #[serde(default = "default_error_loading_title")]
    pub(super) loading_title: String,
    #[serde(default)]
    pub(super) loading_description: Option<String>,
    #[serde(default = "default_error_failed_title")]
    pub(super) failed_title: String,
    #[serde(default = "default_error_failed_description")]
    pub(super) failed_description: Option<String>,
    #[serde(default = "default_error_reason")]
    pub(super) reason: String,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        self.apply_overrides(&|key| std::env::var(key))
    }

    /// Explicit variables win over both the file and the `TOASTFLOW__` source.
    fn apply_overrides(&mut self, lookup: Lookup<'_>) -> std::result::Result<(), ConfigError> {
        if let Some(dismiss) = env_duration(lookup, "TOAST_DEFAULT_DISMISS")? {
            self.toasts.default_dismiss = dismiss;
        }
        if let Some(duration) = env_duration(lookup, "EXPORT_DURATION")? {
            self.export.duration = duration;
        }
        if let Some(dismiss) = env_duration(lookup, "EXPORT_DISMISS")? {
            self.export.dismiss = dismiss;
        }
        if let Some(label) = env_string(lookup, "EXPORT_ACTION_LABEL")? {
            self.export.action_label = label;
        }
        if let Some(duration) = env_duration(lookup, "ERROR_DURATION")? {
            self.error.duration = duration;
        }
        if let Some(dismiss) = env_duration(lookup, "ERROR_DISMISS")? {
            self.error.dismiss = dismiss;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        let Self {
            toasts,
            export,
            error,
        } = self;

        check_dismiss("toasts.default_dismiss", toasts.default_dismiss)?;

        check_operation("export.duration", export.duration)?;
        check_dismiss("export.dismiss", export.dismiss)?;
        check_text("export.loading_title", &export.loading_title)?;
        check_text("export.done_title", &export.done_title)?;
        check_text("export.action_label", &export.action_label)?;

        check_operation("error.duration", error.duration)?;
        check_dismiss("error.dismiss", error.dismiss)?;
        check_text("error.loading_title", &error.loading_title)?;
        check_text("error.failed_title", &error.failed_title)?;

        Ok(Config {
            toasts: ToastSettings {
                default_dismiss: Dismissal::from_duration(toasts.default_dismiss),
            },
            export: ExportSettings {
                duration: export.duration,
                dismiss: Dismissal::from_duration(export.dismiss),
                loading: message(export.loading_title, export.loading_description),
                done: message(export.done_title, export.done_description),
                action_label: export.action_label.trim().to_string(),
            },
            error: ErrorSettings {
                duration: error.duration,
                dismiss: Dismissal::from_duration(error.dismiss),
                loading: message(error.loading_title, error.loading_description),
                failed: message(error.failed_title, error.failed_description),
                reason: error.reason,
            },
        })
    }
}

fn check_operation(field: &'static str, value: Duration) -> std::result::Result<(), ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::InvalidField {
            field,
            message: "simulated duration must be greater than zero".to_string(),
        });
    }
    check_dismiss(field, value)
}

/// Zero is allowed here and means "never dismiss".
fn check_dismiss(field: &'static str, value: Duration) -> std::result::Result<(), ConfigError> {
    if value > MAX_DURATION {
        return Err(ConfigError::InvalidField {
            field,
            message: format!(
                "expected at most {}, got {}",
                humantime::format_duration(MAX_DURATION),
                humantime::format_duration(value)
            ),
        });
    }
    Ok(())
}

fn check_text(field: &'static str, value: &str) -> std::result::Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field,
            message: "text cannot be empty".to_string(),
        });
    }
    Ok(())
}

impl Default for RawToasts {
    fn default() -> Self {
        Self {
            default_dismiss: default_toast_dismiss(),
        }
    }
}

impl Default for RawExport {
    fn default() -> Self {
        Self {
            duration: default_export_duration(),
            dismiss: default_export_dismiss(),
            loading_title: default_export_loading_title(),
            loading_description: default_export_loading_description(),
            done_title: default_export_done_title(),
            done_description: default_export_done_description(),
            action_label: default_action_label(),
        }
    }
}

impl Default for RawError {
    fn default() -> Self {
        Self {
            duration: default_error_duration(),
            dismiss: default_error_dismiss(),
            loading_title: default_error_loading_title(),
            loading_description: None,
            failed_title: default_error_failed_title(),
            failed_description: default_error_failed_description(),
            reason: default_error_reason(),
        }
    }
}
