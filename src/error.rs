use thiserror::Error;

use crate::types::FlowKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

/// Failure of a simulated background operation.
///
/// Only ever surfaced to the user as an `error` toast; the orchestrator logs it
/// and never hands it back to its caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{flow} operation failed: {reason}")]
pub struct OperationFailed {
    pub flow: FlowKind,
    pub reason: String,
}
