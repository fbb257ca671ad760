use std::fmt::{self, Display};
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::types::ToastStatus;

/// Identifier of a toast. UUIDv7, so ids never repeat and sort by creation time.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ToastId(Uuid);

impl ToastId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ToastMessage {
    pub title: String,
    pub description: Option<String>,
}

impl ToastMessage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Side effect run when the user presses a toast's action control.
pub type FollowUp = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct ToastAction {
    label: String,
    on_activate: FollowUp,
}

impl ToastAction {
    pub fn new<F>(label: impl Into<String>, on_activate: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::from_follow_up(label, Arc::new(on_activate))
    }

    pub fn from_follow_up(label: impl Into<String>, on_activate: FollowUp) -> Self {
        Self {
            label: label.into(),
            on_activate,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn activate(&self) {
        (self.on_activate)();
    }
}

impl fmt::Debug for ToastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// When a toast leaves the screen on its own.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Dismissal {
    #[default]
    Never,
    After(Duration),
}

impl Dismissal {
    /// `0` means never, matching the millisecond convention of the UI layer.
    pub const fn from_millis(ms: u64) -> Self {
        Self::from_duration(Duration::from_millis(ms))
    }

    pub const fn from_duration(delay: Duration) -> Self {
        if delay.is_zero() {
            Self::Never
        } else {
            Self::After(delay)
        }
    }

    /// Collapses `After(ZERO)` to `Never`.
    #[must_use]
    pub const fn normalized(self) -> Self {
        match self {
            Self::Never => Self::Never,
            Self::After(delay) => Self::from_duration(delay),
        }
    }

    pub const fn delay(self) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::After(delay) => Some(delay),
        }
    }
}

impl From<Duration> for Dismissal {
    fn from(delay: Duration) -> Self {
        Self::from_duration(delay)
    }
}

/// One visible notification. Snapshots handed out by the manager are copies;
/// editing them has no effect on the active set.
#[derive(Clone, Debug)]
pub struct ToastEntry {
    pub id: ToastId,
    pub message: ToastMessage,
    pub status: ToastStatus,
    pub action: Option<ToastAction>,
    pub auto_dismiss: Dismissal,
}

impl ToastEntry {
    pub const fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Whether the manager holds an expiry timer for this entry.
    pub const fn expires(&self) -> bool {
        self.status.is_terminal() && self.auto_dismiss.delay().is_some()
    }
}
