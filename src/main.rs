use anyhow::{Context, Result};
use pipebench::cli::commands::{
    CancelCommand, ScheduleCommand, SignalCommand, SubmitCommand, ValidateCommand,
};
use pipebench::cli::output::*;
use pipebench::cli::{Cli, Command};
use pipebench::core::PipelineDocument;
use pipebench::runner::{HttpJobRunner, JobRunner};
use pipebench::schedule::{canonical_schedule_id, compute_schedule_mode, ScheduleForm};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Validate(cmd) => validate_document(cmd)?,
        Command::Submit(cmd) => submit_document(cmd).await?,
        Command::Cancel(cmd) => cancel_run(cmd).await?,
        Command::Signal(cmd) => signal_workflow(cmd).await?,
        Command::Schedule(cmd) => compute_schedule(cmd)?,
    }

    Ok(())
}

fn load_document(path: &str) -> Result<PipelineDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document file: {}", path))?;
    PipelineDocument::from_yaml(&content)
}

fn validate_document(cmd: &ValidateCommand) -> Result<()> {
    let document = load_document(&cmd.file)?;
    let errors = document.validate();

    if cmd.json {
        let report: Vec<_> = errors
            .iter()
            .map(|e| serde_json::json!({ "path": e.path, "message": e.message }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if errors.is_empty() {
        println!(
            "{} Document {} is valid ({} steps)",
            CHECK,
            style(&document.name).bold(),
            document.steps.len()
        );
    } else {
        for error in &errors {
            println!("{}", format_validation_error(error));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} validation error(s)", errors.len())
    }
}

async fn submit_document(cmd: &SubmitCommand) -> Result<()> {
    let document = load_document(&cmd.file)?;

    let errors = document.validate();
    if !errors.is_empty() {
        for error in &errors {
            println!("{}", format_validation_error(error));
        }
        anyhow::bail!("document failed validation, not submitting");
    }

    let runner = HttpJobRunner::new(&cmd.runner_url);
    let outcome = runner
        .submit(&document)
        .await
        .context("Failed to submit pipeline")?;

    println!("{}", format_submit_outcome(&outcome));
    Ok(())
}

async fn cancel_run(cmd: &CancelCommand) -> Result<()> {
    let runner = HttpJobRunner::new(&cmd.runner_url);
    runner
        .cancel_queued(&cmd.ticket, &cmd.runner_ids)
        .await
        .context("Failed to cancel queued run")?;

    println!(
        "{} Cancellation requested for ticket {}",
        CHECK,
        style(&cmd.ticket).bold()
    );
    Ok(())
}

async fn signal_workflow(cmd: &SignalCommand) -> Result<()> {
    let runner = HttpJobRunner::new(&cmd.runner_url);
    runner
        .send_signal(&cmd.workflow, &cmd.namespace, &cmd.signal)
        .await
        .context("Failed to send signal")?;

    println!(
        "{} Signal {} sent to workflow {}",
        CHECK,
        style(&cmd.signal).bold(),
        style(&cmd.workflow).bold()
    );
    Ok(())
}

fn compute_schedule(cmd: &ScheduleCommand) -> Result<()> {
    let form = ScheduleForm {
        interval: cmd.interval.into(),
        weekday: cmd.day,
        month_day: cmd.day,
    };
    let mode = compute_schedule_mode(&form)?;
    let key = canonical_schedule_id(&cmd.pipeline, &cmd.owner);

    if cmd.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "key": key,
                "schedule": mode.to_wire()?,
            }))?
        );
    } else {
        println!("{} Schedule key: {}", INFO, style(&key).bold());
        println!("{} Wire form: {}", INFO, mode.to_wire()?);
    }
    Ok(())
}
