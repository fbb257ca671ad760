use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::toast::{Dismissal, FollowUp, ToastId, ToastManager};
use crate::types::{FlowKind, ToastStatus};

use super::plan::FlowPlan;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FlowState {
    #[default]
    Idle,
    Running(FlowKind),
    Completed(FlowKind),
}

/// What a caller learns from one invocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlowOutcome {
    /// Another flow was running; nothing happened.
    Rejected,
    Succeeded(ToastId),
    Failed(ToastId),
}

impl FlowOutcome {
    pub const fn toast(self) -> Option<ToastId> {
        match self {
            Self::Rejected => None,
            Self::Succeeded(id) | Self::Failed(id) => Some(id),
        }
    }
}

/// Runs flows against a [`ToastManager`], one at a time.
///
/// Clones share the busy flag, so the export and error flows of one
/// orchestrator exclude each other.
#[derive(Clone, Debug)]
pub struct TaskOrchestrator {
    manager: ToastManager,
    export: Arc<FlowPlan>,
    error: Arc<FlowPlan>,
    state: Arc<Mutex<FlowState>>,
}

impl TaskOrchestrator {
    pub fn new(manager: ToastManager, export: FlowPlan, error: FlowPlan) -> Self {
        Self {
            manager,
            export: Arc::new(export),
            error: Arc::new(error),
            state: Arc::new(Mutex::new(FlowState::Idle)),
        }
    }

    pub fn from_config(manager: ToastManager, config: &Config, follow_up: FollowUp) -> Self {
        Self::new(
            manager,
            FlowPlan::export(&config.export, follow_up),
            FlowPlan::error(&config.error),
        )
    }

    pub const fn manager(&self) -> &ToastManager {
        &self.manager
    }

    pub fn state(&self) -> FlowState {
        *lock(&self.state)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state(), FlowState::Running(_))
    }

    pub async fn run_export_flow(&self) -> FlowOutcome {
        self.run(&self.export).await
    }

    pub async fn run_error_flow(&self) -> FlowOutcome {
        self.run(&self.error).await
    }

    pub async fn run_flow(&self, kind: FlowKind) -> FlowOutcome {
        match kind {
            FlowKind::Export => self.run_export_flow().await,
            FlowKind::Error => self.run_error_flow().await,
        }
    }

    /// Drive `plan` through loading, the simulated wait and its terminal toast.
    ///
    /// Returns [`FlowOutcome::Rejected`] immediately, touching nothing, when a
    /// flow is already running on this orchestrator.
    pub async fn run(&self, plan: &FlowPlan) -> FlowOutcome {
        let Some(_running) = RunningGuard::acquire(&self.state, plan.kind) else {
            debug!(flow = %plan.kind, "flow already running, invocation dropped");
            return FlowOutcome::Rejected;
        };

        let loading = self.manager.create(
            plan.loading.clone(),
            ToastStatus::Loading,
            Dismissal::Never,
            None,
        );
        info!(flow = %plan.kind, toast_id = %loading, "flow started");

        let result = plan.simulate().await;
        self.manager.remove(loading);

        let terminal = self.manager.create(
            plan.outcome.message().clone(),
            plan.outcome.status(),
            plan.dismiss,
            plan.outcome.action(),
        );

        match result {
            Ok(()) => {
                info!(flow = %plan.kind, toast_id = %terminal, "flow completed");
                FlowOutcome::Succeeded(terminal)
            }
            Err(err) => {
                warn!(flow = %plan.kind, toast_id = %terminal, error = %err, "flow failed");
                FlowOutcome::Failed(terminal)
            }
        }
    }
}

/// Holds the busy flag for one run; releasing it marks the run completed even
/// if the run future is dropped mid-flight.
struct RunningGuard<'a> {
    state: &'a Mutex<FlowState>,
    kind: FlowKind,
}

impl<'a> RunningGuard<'a> {
    fn acquire(state: &'a Mutex<FlowState>, kind: FlowKind) -> Option<Self> {
        let mut current = lock(state);
        if matches!(*current, FlowState::Running(_)) {
            return None;
        }
        *current = FlowState::Running(kind);
        Some(Self { state, kind })
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *lock(self.state) = FlowState::Completed(self.kind);
    }
}

fn lock(state: &Mutex<FlowState>) -> MutexGuard<'_, FlowState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::{FlowOutcome, FlowState, RunningGuard, TaskOrchestrator};
    use crate::config::Config;
    use crate::toast::ToastManager;
    use crate::types::FlowKind;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn guard_rejects_reentry_and_releases_on_drop() {
        let state = Mutex::new(FlowState::Idle);
        let guard = RunningGuard::acquire(&state, FlowKind::Export);
        assert!(guard.is_some());
        assert!(RunningGuard::acquire(&state, FlowKind::Error).is_none());

        drop(guard);
        assert_eq!(
            *state.lock().unwrap_or_else(std::sync::PoisonError::into_inner),
            FlowState::Completed(FlowKind::Export)
        );
        assert!(RunningGuard::acquire(&state, FlowKind::Error).is_some());
    }

    #[test]
    fn outcome_exposes_terminal_toast() {
        assert_eq!(FlowOutcome::Rejected.toast(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_run_does_not_leave_orchestrator_busy() {
        let orchestrator =
            TaskOrchestrator::from_config(ToastManager::new(), &Config::default(), Arc::new(|| {}));

        let run = orchestrator.run_export_flow();
        let timed_out = tokio::time::timeout(Duration::from_millis(10), run).await;

        assert!(timed_out.is_err());
        assert!(!orchestrator.is_busy());
        assert_eq!(orchestrator.state(), FlowState::Completed(FlowKind::Export));
    }
}
