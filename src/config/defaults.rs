use std::time::Duration;

pub(super) const fn default_toast_dismiss() -> Duration {
    Duration::from_secs(5)
}

pub(super) const fn default_export_duration() -> Duration {
    Duration::from_secs(3)
}

pub(super) const fn default_export_dismiss() -> Duration {
    Duration::from_secs(5)
}

pub(super) fn default_export_loading_title() -> String {
    "Export started".to_string()
}

pub(super) fn default_export_loading_description() -> Option<String> {
    Some("Please wait while processing completes...".to_string())
}

pub(super) fn default_export_done_title() -> String {
    "Export complete".to_string()
}

pub(super) fn default_export_done_description() -> Option<String> {
    Some("Your download is ready".to_string())
}

pub(super) fn default_action_label() -> String {
    "Download".to_string()
}

pub(super) const fn default_error_duration() -> Duration {
    Duration::from_secs(2)
}

pub(super) const fn default_error_dismiss() -> Duration {
    Duration::from_secs(5)
}

pub(super) fn default_error_loading_title() -> String {
    "Sending data...".to_string()
}

pub(super) fn default_error_failed_title() -> String {
    "Sending failed".to_string()
}

pub(super) fn default_error_failed_description() -> Option<String> {
    Some("A network error occurred. Please try again.".to_string())
}

pub(super) fn default_error_reason() -> String {
    "network error".to_string()
}
