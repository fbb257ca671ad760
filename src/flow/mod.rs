mod orchestrator;
mod plan;

pub use orchestrator::{FlowOutcome, FlowState, TaskOrchestrator};
pub use plan::{FlowPlan, PlannedOutcome};
