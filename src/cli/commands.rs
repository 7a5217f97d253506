//! CLI command definitions

use clap::Args;
use crate::schedule::ScheduleInterval;

/// Validate a pipeline document
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipeline document YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Submit a pipeline document to the job runner
#[derive(Debug, Args, Clone)]
pub struct SubmitCommand {
    /// Path to pipeline document YAML file
    #[arg(short, long)]
    pub file: String,

    /// Base URL of the job runner
    #[arg(long)]
    pub runner_url: String,
}

/// Cancel a queued run
#[derive(Debug, Args, Clone)]
pub struct CancelCommand {
    /// Queue ticket id (as returned at submission)
    #[arg(short, long)]
    pub ticket: String,

    /// Runner ids the ticket was queued against
    #[arg(long, value_delimiter = ',')]
    pub runner_ids: Vec<String>,

    /// Base URL of the job runner
    #[arg(long)]
    pub runner_url: String,
}

/// Send a signal to a running workflow
#[derive(Debug, Args, Clone)]
pub struct SignalCommand {
    /// Workflow id (as returned at submission)
    #[arg(short, long)]
    pub workflow: String,

    /// Signal namespace
    #[arg(long, default_value = "default")]
    pub namespace: String,

    /// Signal name
    #[arg(short, long)]
    pub signal: String,

    /// Base URL of the job runner
    #[arg(long)]
    pub runner_url: String,
}

/// Compute a recurring schedule descriptor
#[derive(Debug, Args, Clone)]
pub struct ScheduleCommand {
    /// Pipeline display name
    #[arg(short, long)]
    pub pipeline: String,

    /// Owning organization
    #[arg(short, long)]
    pub owner: String,

    /// Recurrence interval
    #[arg(long, value_enum)]
    pub interval: ScheduleIntervalArg,

    /// Anchor day: weekday 0-6 for weekly, day of month 1-31 for monthly
    #[arg(long)]
    pub day: Option<u8>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Schedule interval argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScheduleIntervalArg {
    Daily,
    Weekly,
    Monthly,
}

impl From<ScheduleIntervalArg> for ScheduleInterval {
    fn from(arg: ScheduleIntervalArg) -> Self {
        match arg {
            ScheduleIntervalArg::Daily => ScheduleInterval::Daily,
            ScheduleIntervalArg::Weekly => ScheduleInterval::Weekly,
            ScheduleIntervalArg::Monthly => ScheduleInterval::Monthly,
        }
    }
}
