//! Notify command for due-date reminders
//!
//! Implements the `trl notify` command: sorts open tickets into due-date
//! buckets and prints the Discord webhook payload. Sending it is left to the
//! caller (for example `curl -d @- $WEBHOOK_URL`).

use clap::Args;
use tracing::info;
use trellis_core::{DEFAULT_CLOSED_STATUS_IDS, categorize_due_dates, format_due_date_notification};

use crate::commands::Context;
use crate::error::CliResult;
use crate::output::format_due_stats;

/// Build the Discord due-date reminder
#[derive(Debug, Args)]
pub struct NotifyCommand {
    /// Status id treated as closed (can be specified multiple times; default: 5, 6)
    #[arg(long = "closed-status")]
    pub closed_status: Vec<i64>,
}

impl NotifyCommand {
    fn closed_status_ids(&self) -> &[i64] {
        if self.closed_status.is_empty() {
            &DEFAULT_CLOSED_STATUS_IDS
        } else {
            &self.closed_status
        }
    }

    /// Execute the notify command.
    ///
    /// Prints the payload JSON when there is something to send, otherwise a
    /// one-line summary.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the user mapping is malformed or encoding fails.
    pub fn execute(&self, ctx: &Context) -> CliResult<String> {
        let tickets = &ctx.loaded.tickets;
        let today = ctx.settings.today;

        let buckets = categorize_due_dates(tickets, today, self.closed_status_ids());
        let stats = buckets.stats(tickets.len());
        info!(
            "Due-date check: {} tomorrow, {} today, {} overdue of {} tickets",
            stats.tomorrow, stats.today, stats.overdue, stats.total_tickets
        );

        if !buckets.has_notifications() {
            return Ok(format_due_stats(&stats));
        }

        let mapping = ctx.settings.user_mapping()?;
        let payload = format_due_date_notification(&buckets, &mapping, today);
        Ok(serde_json::to_string_pretty(&payload)?)
    }
}
