use std::time::Duration;

use tokio::time::sleep;

use crate::config::{ErrorSettings, ExportSettings};
use crate::error::OperationFailed;
use crate::toast::{Dismissal, FollowUp, ToastAction, ToastMessage};
use crate::types::{FlowKind, ToastStatus};

/// How the simulated operation ends and which toast announces it.
#[derive(Clone, Debug)]
pub enum PlannedOutcome {
    Succeed {
        message: ToastMessage,
        action: Option<ToastAction>,
    },
    Fail {
        message: ToastMessage,
        reason: String,
    },
}

/// Everything one run of a flow needs: the in-flight toast, the simulated
/// delay and the terminal toast.
#[derive(Clone, Debug)]
pub struct FlowPlan {
    pub kind: FlowKind,
    pub duration: Duration,
    pub loading: ToastMessage,
    pub outcome: PlannedOutcome,
    pub dismiss: Dismissal,
}

impl FlowPlan {
    /// Export ends in a `success` toast whose action runs `follow_up`.
    pub fn export(settings: &ExportSettings, follow_up: FollowUp) -> Self {
        Self {
            kind: FlowKind::Export,
            duration: settings.duration,
            loading: settings.loading.clone(),
            outcome: PlannedOutcome::Succeed {
                message: settings.done.clone(),
                action: Some(ToastAction::from_follow_up(
                    settings.action_label.clone(),
                    follow_up,
                )),
            },
            dismiss: settings.dismiss,
        }
    }

    pub fn error(settings: &ErrorSettings) -> Self {
        Self {
            kind: FlowKind::Error,
            duration: settings.duration,
            loading: settings.loading.clone(),
            outcome: PlannedOutcome::Fail {
                message: settings.failed.clone(),
                reason: settings.reason.clone(),
            },
            dismiss: settings.dismiss,
        }
    }

    /// Stand-in for the real work: wait, then report the planned result.
    pub(super) async fn simulate(&self) -> Result<(), OperationFailed> {
        sleep(self.duration).await;
        match &self.outcome {
            PlannedOutcome::Succeed { .. } => Ok(()),
            PlannedOutcome::Fail { reason, .. } => Err(OperationFailed {
                flow: self.kind,
                reason: reason.clone(),
            }),
        }
    }
}

impl PlannedOutcome {
    pub(super) const fn status(&self) -> ToastStatus {
        match self {
            Self::Succeed { .. } => ToastStatus::Success,
            Self::Fail { .. } => ToastStatus::Error,
        }
    }

    pub(super) const fn message(&self) -> &ToastMessage {
        match self {
            Self::Succeed { message, .. } | Self::Fail { message, .. } => message,
        }
    }

    pub(super) fn action(&self) -> Option<ToastAction> {
        match self {
            Self::Succeed { action, .. } => action.clone(),
            Self::Fail { .. } => None,
        }
    }
}
