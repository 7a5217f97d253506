//! CLI output formatting

use crate::core::ValidationError;
use crate::queue::QueueTicket;
use crate::runner::SubmitOutcome;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static HOURGLASS: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format one validation error as `path: message`
pub fn format_validation_error(error: &ValidationError) -> String {
    format!(
        "{} {}: {}",
        CROSS,
        style(&error.path).cyan(),
        error.message
    )
}

/// Format a queued ticket for display (1-based position)
pub fn format_ticket(ticket: &QueueTicket) -> String {
    format!(
        "{} Queued at position {} (ticket {})",
        HOURGLASS,
        style(ticket.display_position()).bold(),
        style(&ticket.ticket_id).dim()
    )
}

/// Format a submission outcome
pub fn format_submit_outcome(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Started {
            workflow_id,
            run_id,
        } => format!(
            "{} Started workflow {} (run {})",
            ROCKET,
            style(workflow_id).bold(),
            style(run_id).dim()
        ),
        SubmitOutcome::Queued { ticket } => format_ticket(ticket),
    }
}
