//! Data models for Trellis
//!
//! Defines the validated [`Ticket`] used by every algorithm in this crate and
//! the loosely-typed wire records it is converted from. Wire records mirror the
//! issue tracker's JSON; dates arrive as strings and are validated exactly once,
//! during conversion.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CoreResult;

/// Issue tracker ticket identifier
pub type TicketId = i64;

/// Workflow status attached to a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStatus {
    /// Tracker status id (closed/cancelled ids are configured by callers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Human-readable status name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A validated ticket
///
/// All optional data is explicit: a ticket without a start date simply has
/// `start_date == None`, and a date string that failed to parse is also
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub id: TicketId,
    pub subject: String,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    /// Completion percentage, always within 0..=100
    pub done_ratio: u8,
    /// Declared parent id; may reference a ticket that is not loaded
    #[serde(rename = "parent_id")]
    pub parent: Option<TicketId>,
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
}

impl Ticket {
    /// Create a ticket with no dates, parent, assignee or progress.
    pub fn new(id: TicketId, subject: impl Into<String>) -> Self {
        Self {
            id,
            subject: subject.into(),
            start_date: None,
            due_date: None,
            done_ratio: 0,
            parent: None,
            assigned_to: None,
            status: None,
        }
    }

    /// Set the start and due dates
    pub fn with_dates(mut self, start: Option<NaiveDate>, due: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.due_date = due;
        self
    }

    /// Set the parent reference
    pub fn with_parent(mut self, parent: TicketId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the completion percentage, clamped to 100
    pub fn with_done_ratio(mut self, done_ratio: u8) -> Self {
        self.done_ratio = done_ratio.min(100);
        self
    }

    /// Set the assignee display name
    pub fn with_assignee(mut self, name: impl Into<String>) -> Self {
        self.assigned_to = Some(name.into());
        self
    }

    /// Set the workflow status
    pub fn with_status(mut self, id: i64, name: impl Into<String>) -> Self {
        self.status = Some(TicketStatus {
            id: Some(id),
            name: Some(name.into()),
        });
        self
    }

    /// Whether the ticket carries at least one date
    pub fn has_any_date(&self) -> bool {
        self.start_date.is_some() || self.due_date.is_some()
    }
}

/// Parse a tracker date string.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a `T...` time part which is
/// discarded. Anything else yields `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.split('T').next().unwrap_or(value);
    if date_part.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Reference to another record by id (`{"id": 12}`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdRef {
    pub id: TicketId,
}

/// Reference carrying an optional id and display name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Issue record as delivered by the tracker
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRecord {
    pub id: TicketId,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub done_ratio: Option<i64>,
    #[serde(default)]
    pub parent: Option<IdRef>,
    #[serde(default)]
    pub assigned_to: Option<NamedRef>,
    #[serde(default)]
    pub status: Option<NamedRef>,
}

impl From<IssueRecord> for Ticket {
    fn from(record: IssueRecord) -> Self {
        let start_date = convert_date(record.id, "start_date", record.start_date.as_deref());
        let due_date = convert_date(record.id, "due_date", record.due_date.as_deref());

        Ticket {
            id: record.id,
            subject: record.subject.unwrap_or_default(),
            start_date,
            due_date,
            done_ratio: record.done_ratio.unwrap_or(0).clamp(0, 100) as u8,
            parent: record.parent.map(|p| p.id),
            assigned_to: record
                .assigned_to
                .and_then(|a| a.name)
                .filter(|name| !name.is_empty()),
            status: record.status.map(|s| TicketStatus {
                id: s.id,
                name: s.name,
            }),
        }
    }
}

fn convert_date(id: TicketId, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    let parsed = parse_date(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        warn!("Ignoring malformed {} '{}' on ticket #{}", field, raw, id);
    }
    parsed
}

/// Top-level shape of a tracker response: an `issues` envelope or a bare list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IssueDocument {
    Envelope { issues: Vec<IssueRecord> },
    List(Vec<IssueRecord>),
}

/// Parse a tracker JSON document into validated tickets, preserving order.
///
/// # Errors
///
/// Returns `CoreError::Parse` if the document is not valid JSON or does not
/// match either accepted shape.
pub fn parse_issues(json: &str) -> CoreResult<Vec<Ticket>> {
    let records = match serde_json::from_str::<IssueDocument>(json)? {
        IssueDocument::Envelope { issues } => issues,
        IssueDocument::List(issues) => issues,
    };
    Ok(records.into_iter().map(Ticket::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_plain() {
        assert_eq!(parse_date("2025-04-01"), Some(date(2025, 4, 1)));
    }

    #[test]
    fn test_parse_date_with_time_part() {
        assert_eq!(parse_date("2025-04-01T09:30:00Z"), Some(date(2025, 4, 1)));
    }

    #[test]
    fn test_parse_date_malformed_is_none() {
        assert_eq!(parse_date("2025-13-01"), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2025/04/01"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
    }

    #[test]
    fn test_ticket_builders() {
        let ticket = Ticket::new(7, "Design")
            .with_dates(Some(date(2025, 4, 1)), None)
            .with_parent(3)
            .with_done_ratio(150)
            .with_assignee("Tanaka")
            .with_status(2, "In Progress");

        assert_eq!(ticket.id, 7);
        assert_eq!(ticket.subject, "Design");
        assert_eq!(ticket.start_date, Some(date(2025, 4, 1)));
        assert_eq!(ticket.due_date, None);
        assert_eq!(ticket.parent, Some(3));
        assert_eq!(ticket.done_ratio, 100);
        assert_eq!(ticket.assigned_to.as_deref(), Some("Tanaka"));
        assert_eq!(ticket.status.as_ref().and_then(|s| s.id), Some(2));
        assert!(ticket.has_any_date());
        assert!(!Ticket::new(1, "x").has_any_date());
    }

    #[test]
    fn test_parse_issues_envelope() {
        let json = r#"{
            "issues": [
                {
                    "id": 1,
                    "subject": "Parent",
                    "start_date": "2025-04-01",
                    "due_date": "2025-04-03",
                    "done_ratio": 50,
                    "assigned_to": {"id": 4, "name": "Sato"},
                    "status": {"id": 2, "name": "In Progress"}
                },
                {"id": 2, "subject": "Child", "parent": {"id": 1}}
            ],
            "total_count": 2
        }"#;

        let tickets = parse_issues(json).unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].id, 1);
        assert_eq!(tickets[0].due_date, Some(date(2025, 4, 3)));
        assert_eq!(tickets[0].done_ratio, 50);
        assert_eq!(tickets[0].assigned_to.as_deref(), Some("Sato"));
        assert_eq!(tickets[1].parent, Some(1));
        assert_eq!(tickets[1].start_date, None);
    }

    #[test]
    fn test_parse_issues_bare_list() {
        let tickets = parse_issues(r#"[{"id": 10, "subject": "Only"}]"#).unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].subject, "Only");
    }

    #[test]
    fn test_parse_issues_malformed_date_becomes_none() {
        let json = r#"[{"id": 1, "subject": "Bad", "start_date": "soon", "due_date": null}]"#;
        let tickets = parse_issues(json).unwrap();
        assert_eq!(tickets[0].start_date, None);
        assert_eq!(tickets[0].due_date, None);
    }

    #[test]
    fn test_parse_issues_clamps_done_ratio() {
        let json = r#"[{"id": 1, "done_ratio": 140}, {"id": 2, "done_ratio": -5}]"#;
        let tickets = parse_issues(json).unwrap();
        assert_eq!(tickets[0].done_ratio, 100);
        assert_eq!(tickets[1].done_ratio, 0);
    }

    #[test]
    fn test_parse_issues_empty_assignee_name_is_none() {
        let json = r#"[{"id": 1, "assigned_to": {"id": 3, "name": ""}}]"#;
        let tickets = parse_issues(json).unwrap();
        assert_eq!(tickets[0].assigned_to, None);
    }

    #[test]
    fn test_parse_issues_invalid_json() {
        assert!(parse_issues("{not json").is_err());
        assert!(parse_issues(r#"{"issues": 3}"#).is_err());
    }

    #[test]
    fn test_ticket_serializes_dates_as_strings() {
        let ticket = Ticket::new(1, "A").with_dates(Some(date(2025, 4, 1)), None);
        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["start_date"], "2025-04-01");
        assert!(value["due_date"].is_null());
        assert!(value["parent_id"].is_null());
        assert!(value.get("status").is_none());
    }
}
