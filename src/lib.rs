//! pipebench - pipeline composition and run-queue coordination for
//! conformance test benches

pub mod builder;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod queue;
pub mod runner;
pub mod schedule;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    compile, ActivityOptions, PipelineDocument, PipelineMetadata, Step, StepKind, ValidationError,
};
pub use builder::{ActiveForm, FormError, StepsBuilder};
pub use queue::{CancelBus, QueueTicket, RunState, RunTracker};
pub use runner::{HttpJobRunner, JobRunner, RunnerError, SubmitOutcome};
pub use schedule::{compute_schedule_mode, ScheduleManager, ScheduleMode};
pub use store::{InMemoryStore, RecordStore};
