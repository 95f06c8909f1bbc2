//! Due-date reminders.
//!
//! Sorts open, assigned tickets into "due tomorrow", "due today" and
//! "overdue" buckets relative to a given day.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, trace};

use crate::models::Ticket;

/// Status ids treated as closed by default (done and cancelled).
pub const DEFAULT_CLOSED_STATUS_IDS: [i64; 2] = [5, 6];

/// Tickets that warrant a reminder, by urgency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DueDateBuckets {
    pub tomorrow: Vec<Ticket>,
    pub today: Vec<Ticket>,
    pub overdue: Vec<Ticket>,
}

/// Bucket sizes, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DueDateStats {
    pub total_tickets: usize,
    pub tomorrow: usize,
    pub today: usize,
    pub overdue: usize,
}

impl DueDateBuckets {
    /// Whether any bucket has a ticket.
    pub fn has_notifications(&self) -> bool {
        !self.tomorrow.is_empty() || !self.today.is_empty() || !self.overdue.is_empty()
    }

    /// Counts per bucket; `total_tickets` is the size of the scanned input.
    pub fn stats(&self, total_tickets: usize) -> DueDateStats {
        DueDateStats {
            total_tickets,
            tomorrow: self.tomorrow.len(),
            today: self.today.len(),
            overdue: self.overdue.len(),
        }
    }
}

/// Whole days a ticket is past due on `today`; zero when not overdue or undated.
pub fn days_overdue(ticket: &Ticket, today: NaiveDate) -> i64 {
    ticket
        .due_date
        .map(|due| (today - due).num_days().max(0))
        .unwrap_or(0)
}

/// Sort tickets into due-date buckets.
///
/// Tickets without a due date, without an assignee, or whose status id is in
/// `closed_status_ids` are skipped. Due dates after tomorrow are ignored.
/// Input order is kept within each bucket.
pub fn categorize_due_dates(
    tickets: &[Ticket],
    today: NaiveDate,
    closed_status_ids: &[i64],
) -> DueDateBuckets {
    // None only at the end of the calendar, where nothing is due tomorrow.
    let tomorrow = today.checked_add_days(Days::new(1));
    let mut buckets = DueDateBuckets::default();

    for ticket in tickets {
        let Some(due) = ticket.due_date else {
            continue;
        };
        if ticket.assigned_to.is_none() {
            trace!("Skipping unassigned ticket #{}", ticket.id);
            continue;
        }
        let closed = ticket
            .status
            .as_ref()
            .and_then(|s| s.id)
            .is_some_and(|id| closed_status_ids.contains(&id));
        if closed {
            trace!("Skipping closed ticket #{}", ticket.id);
            continue;
        }

        if Some(due) == tomorrow {
            buckets.tomorrow.push(ticket.clone());
        } else if due == today {
            buckets.today.push(ticket.clone());
        } else if due < today {
            buckets.overdue.push(ticket.clone());
        }
    }

    debug!(
        "Due-date scan on {}: {} tomorrow, {} today, {} overdue",
        today,
        buckets.tomorrow.len(),
        buckets.today.len(),
        buckets.overdue.len()
    );
    buckets
}
