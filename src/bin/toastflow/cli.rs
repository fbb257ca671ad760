use std::path::PathBuf;

use clap::{ArgAction, Parser};
use toastflow::types::FlowKind;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(author, version, about = "Toast notifications for simulated background flows", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Flow to run: "export" or "error". Repeat to run several in order.
    #[arg(long = "flow", value_name = "FLOW", default_value = "export")]
    pub flows: Vec<FlowKind>,

    /// Start every requested flow at once; all but the first are dropped.
    #[arg(long, action = ArgAction::SetTrue)]
    pub concurrent: bool,

    /// Press the action button of each terminal toast as soon as it appears.
    #[arg(long, action = ArgAction::SetTrue)]
    pub activate: bool,

    /// Close terminal toasts right away instead of waiting for them to expire.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dismiss: bool,

    /// Emit JSON logs (requires `--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "toastflow=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
