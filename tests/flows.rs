#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::join_all;
use tokio::time::{advance, timeout};
use toastflow::config::Config;
use toastflow::flow::{FlowOutcome, FlowState, TaskOrchestrator};
use toastflow::presenter::{ToastControls, ToastRenderer, run_presenter};
use toastflow::toast::{Dismissal, ToastEntry, ToastManager};
use toastflow::types::{FlowKind, ToastStatus};

async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn statuses(manager: &ToastManager) -> Vec<ToastStatus> {
    manager
        .active_entries()
        .iter()
        .map(|entry| entry.status)
        .collect()
}

fn orchestrator() -> (TaskOrchestrator, Arc<AtomicUsize>) {
    let downloads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&downloads);
    let orchestrator = TaskOrchestrator::from_config(
        ToastManager::new(),
        &Config::default(),
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );
    (orchestrator, downloads)
}

fn spawn_flow(
    orchestrator: &TaskOrchestrator,
    kind: FlowKind,
) -> tokio::task::JoinHandle<FlowOutcome> {
    let runner = orchestrator.clone();
    tokio::spawn(async move { runner.run_flow(kind).await })
}

#[tokio::test(start_paused = true)]
async fn export_flow_end_to_end() {
    let (orchestrator, downloads) = orchestrator();
    let manager = orchestrator.manager().clone();
    assert_eq!(orchestrator.state(), FlowState::Idle);

    let run = spawn_flow(&orchestrator, FlowKind::Export);
    settle().await;
    assert_eq!(statuses(&manager), vec![ToastStatus::Loading]);
    assert!(orchestrator.is_busy());

    advance(Duration::from_millis(2_999)).await;
    settle().await;
    assert_eq!(statuses(&manager), vec![ToastStatus::Loading]);

    advance(Duration::from_millis(1)).await;
    settle().await;
    let entries = manager.active_entries();
    assert_eq!(statuses(&manager), vec![ToastStatus::Success]);
    assert_eq!(entries[0].message.title, "Export complete");
    assert_eq!(
        entries[0].action.as_ref().map(|action| action.label()),
        Some("Download")
    );

    let outcome = run.await.unwrap();
    assert_eq!(outcome, FlowOutcome::Succeeded(entries[0].id));
    assert_eq!(orchestrator.state(), FlowState::Completed(FlowKind::Export));
    assert!(!orchestrator.is_busy());

    assert!(manager.activate(entries[0].id));
    assert_eq!(downloads.load(Ordering::SeqCst), 1);

    advance(Duration::from_millis(4_999)).await;
    settle().await;
    assert_eq!(manager.len(), 1);

    advance(Duration::from_millis(1)).await;
    settle().await;
    assert!(manager.is_empty());
}

#[tokio::test(start_paused = true)]
async fn error_flow_end_to_end() {
    let (orchestrator, downloads) = orchestrator();
    let manager = orchestrator.manager().clone();

    let run = spawn_flow(&orchestrator, FlowKind::Error);
    settle().await;
    let loading = manager.active_entries();
    assert_eq!(statuses(&manager), vec![ToastStatus::Loading]);
    assert_eq!(loading[0].message.title, "Sending data...");

    advance(Duration::from_millis(2_000)).await;
    settle().await;
    let entries = manager.active_entries();
    assert_eq!(statuses(&manager), vec![ToastStatus::Error]);
    assert!(!entries[0].has_action());
    assert_eq!(
        entries[0].message.description.as_deref(),
        Some("A network error occurred. Please try again.")
    );
    assert_eq!(run.await.unwrap(), FlowOutcome::Failed(entries[0].id));
    assert!(!manager.activate(entries[0].id));

    advance(Duration::from_millis(5_000)).await;
    settle().await;
    assert!(manager.is_empty());
    assert_eq!(downloads.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn reentry_while_running_is_dropped() {
    let (orchestrator, _) = orchestrator();
    let manager = orchestrator.manager().clone();

    let run = spawn_flow(&orchestrator, FlowKind::Export);
    settle().await;
    let before: Vec<_> = manager.active_entries().iter().map(|e| e.id).collect();

    assert_eq!(orchestrator.run_export_flow().await, FlowOutcome::Rejected);
    assert_eq!(orchestrator.run_error_flow().await, FlowOutcome::Rejected);

    let after: Vec<_> = manager.active_entries().iter().map(|e| e.id).collect();
    assert_eq!(before, after);
    assert_eq!(orchestrator.state(), FlowState::Running(FlowKind::Export));

    advance(Duration::from_secs(3)).await;
    settle().await;
    assert!(matches!(run.await.unwrap(), FlowOutcome::Succeeded(_)));
    assert_eq!(statuses(&manager), vec![ToastStatus::Success]);
}

#[tokio::test(start_paused = true)]
async fn flow_can_run_again_after_completion() {
    let (orchestrator, _) = orchestrator();
    let manager = orchestrator.manager().clone();

    let first = spawn_flow(&orchestrator, FlowKind::Error);
    settle().await;
    advance(Duration::from_secs(2)).await;
    settle().await;
    assert!(matches!(first.await.unwrap(), FlowOutcome::Failed(_)));

    let second = spawn_flow(&orchestrator, FlowKind::Export);
    settle().await;
    assert_eq!(
        statuses(&manager),
        vec![ToastStatus::Error, ToastStatus::Loading]
    );

    advance(Duration::from_secs(3)).await;
    settle().await;
    assert!(matches!(second.await.unwrap(), FlowOutcome::Succeeded(_)));
    assert_eq!(
        statuses(&manager),
        vec![ToastStatus::Error, ToastStatus::Success]
    );

    // error toast was created at 2s, so it goes at 7s
    advance(Duration::from_secs(2)).await;
    settle().await;
    assert_eq!(statuses(&manager), vec![ToastStatus::Success]);
}

#[tokio::test(start_paused = true)]
async fn flows_started_together_keep_only_the_first() {
    let (orchestrator, _) = orchestrator();
    let manager = orchestrator.manager().clone();

    let outcomes = join_all(
        [FlowKind::Error, FlowKind::Export, FlowKind::Error]
            .map(|kind| orchestrator.run_flow(kind)),
    )
    .await;

    assert!(matches!(outcomes[0], FlowOutcome::Failed(_)));
    assert_eq!(outcomes[1], FlowOutcome::Rejected);
    assert_eq!(outcomes[2], FlowOutcome::Rejected);
    assert_eq!(statuses(&manager), vec![ToastStatus::Error]);
}

#[tokio::test(start_paused = true)]
async fn never_dismissed_toast_does_not_block_settling() {
    let mut config = Config::default();
    config.export.dismiss = Dismissal::Never;
    let orchestrator = TaskOrchestrator::from_config(ToastManager::new(), &config, Arc::new(|| {}));
    let manager = orchestrator.manager().clone();

    assert!(matches!(
        orchestrator.run_export_flow().await,
        FlowOutcome::Succeeded(_)
    ));
    let settled = timeout(Duration::from_secs(3_600), manager.wait_until_settled()).await;

    assert!(settled.is_ok());
    assert_eq!(statuses(&manager), vec![ToastStatus::Success]);
}

#[derive(Clone, Default)]
struct Recorder {
    frames: Arc<Mutex<Vec<Vec<ToastStatus>>>>,
    dismiss_errors: bool,
}

impl ToastRenderer for Recorder {
    fn render(&mut self, entries: &[ToastEntry], controls: &ToastControls) -> io::Result<()> {
        self.frames
            .lock()
            .unwrap()
            .push(entries.iter().map(|entry| entry.status).collect());
        if self.dismiss_errors {
            for entry in entries.iter().filter(|e| e.status == ToastStatus::Error) {
                controls.dismiss(entry.id);
            }
        }
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn presenter_follows_the_flow_and_stops_with_the_manager() {
    let (orchestrator, _) = orchestrator();
    let recorder = Recorder::default();
    let frames = Arc::clone(&recorder.frames);
    let manager = orchestrator.manager().clone();
    let presenter = tokio::spawn(run_presenter(
        manager.subscribe(),
        manager.controls(),
        recorder,
    ));
    settle().await;

    let run = spawn_flow(&orchestrator, FlowKind::Export);
    settle().await;
    advance(Duration::from_secs(3)).await;
    settle().await;
    run.await.unwrap();
    advance(Duration::from_secs(5)).await;
    settle().await;

    drop(orchestrator);
    drop(manager);
    presenter.await.unwrap();

    let frames = frames.lock().unwrap().clone();
    assert_eq!(frames.first(), Some(&Vec::new()));
    assert!(frames.contains(&vec![ToastStatus::Loading]));
    assert!(frames.contains(&vec![ToastStatus::Success]));
    assert_eq!(frames.last(), Some(&Vec::new()));
}

#[tokio::test(start_paused = true)]
async fn presenter_dismiss_control_removes_toast() {
    let (orchestrator, _) = orchestrator();
    let manager = orchestrator.manager().clone();
    let recorder = Recorder {
        dismiss_errors: true,
        ..Recorder::default()
    };
    let presenter = tokio::spawn(run_presenter(
        manager.subscribe(),
        manager.controls(),
        recorder,
    ));
    settle().await;

    let run = spawn_flow(&orchestrator, FlowKind::Error);
    settle().await;
    advance(Duration::from_secs(2)).await;
    settle().await;

    assert!(matches!(run.await.unwrap(), FlowOutcome::Failed(_)));
    assert!(manager.is_empty());

    drop(orchestrator);
    drop(manager);
    presenter.await.unwrap();
}
