//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{CancelCommand, ScheduleCommand, SignalCommand, SubmitCommand, ValidateCommand};

/// Pipeline composition and run-queue tooling for conformance benches
#[derive(Debug, Parser, Clone)]
#[command(name = "pipebench")]
#[command(author = "Pipebench Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Validate, submit and schedule conformance test pipelines", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Validate a pipeline document
    Validate(ValidateCommand),

    /// Submit a pipeline document to the job runner
    Submit(SubmitCommand),

    /// Cancel a queued run by ticket id
    Cancel(CancelCommand),

    /// Send a signal to a running workflow
    Signal(SignalCommand),

    /// Compute a recurring schedule descriptor
    Schedule(ScheduleCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
