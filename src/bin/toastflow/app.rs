use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use tokio::signal;
use toastflow::Result;
use toastflow::config::Config;
use toastflow::flow::{FlowOutcome, TaskOrchestrator};
use toastflow::presenter::{ConsoleRenderer, ToastControls, run_presenter};
use toastflow::telemetry::init_tracing;
use toastflow::toast::{FollowUp, ToastManager};
use toastflow::types::FlowKind;
use tracing::{info, warn};

use super::cli::Cli;

const DEFAULT_CONFIG: &str = "toastflow.toml";

/// What the simulated user does with each terminal toast.
#[derive(Clone, Copy, Debug)]
struct UserInput {
    activate: bool,
    dismiss: bool,
}

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = Config::from_env_and_file(&config_path)?;

    let manager = ToastManager::with_default_dismiss(config.toasts.default_dismiss);
    let presenter = tokio::spawn(run_presenter(
        manager.subscribe(),
        manager.controls(),
        ConsoleRenderer::stdout(),
    ));
    let orchestrator = TaskOrchestrator::from_config(manager.clone(), &config, download_follow_up());
    let input = UserInput {
        activate: cli.activate,
        dismiss: cli.dismiss,
    };

    tokio::select! {
        biased;
        _ = signal::ctrl_c() => {
            info!("shutdown signal received, stopping");
        }
        () = drive(&orchestrator, &cli.flows, cli.concurrent, input) => {}
    }

    drop(orchestrator);
    drop(manager);
    if let Err(err) = presenter.await {
        warn!(error = %err, "presenter task terminated unexpectedly");
    }

    Ok(())
}

async fn drive(orchestrator: &TaskOrchestrator, flows: &[FlowKind], concurrent: bool, input: UserInput) {
    let controls = orchestrator.manager().controls();

    if concurrent {
        // Polled in order on this task: the first flow takes the busy flag.
        let runs = flows
            .iter()
            .map(|&kind| async move { (kind, orchestrator.run_flow(kind).await) });
        for (kind, outcome) in join_all(runs).await {
            respond(&controls, kind, outcome, input);
        }
    } else {
        for &kind in flows {
            let outcome = orchestrator.run_flow(kind).await;
            respond(&controls, kind, outcome, input);
        }
    }

    let manager = orchestrator.manager();
    info!("waiting for remaining toasts to expire");
    manager.wait_until_settled().await;
    let remaining = manager.len();
    if remaining > 0 {
        info!(remaining, "leaving toasts that never auto-dismiss");
    }
}

fn respond(controls: &ToastControls, kind: FlowKind, outcome: FlowOutcome, input: UserInput) {
    let Some(toast) = outcome.toast() else {
        info!(flow = %kind, "flow rejected while another flow was running");
        return;
    };
    if input.activate && !controls.activate(toast) {
        info!(flow = %kind, toast_id = %toast, "terminal toast has no action");
    }
    if input.dismiss {
        controls.dismiss(toast);
    }
}

fn download_follow_up() -> FollowUp {
    Arc::new(|| info!("download requested from export toast"))
}
