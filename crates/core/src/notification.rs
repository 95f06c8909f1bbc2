//! Discord reminder formatting.
//!
//! Turns [`DueDateBuckets`] into a webhook payload. Tracker display names are
//! mapped to Discord user ids so reminders can ping the assignee; unmapped
//! names are written as plain `@name` text.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::due_dates::{DueDateBuckets, days_overdue};
use crate::error::{CoreError, CoreResult};
use crate::models::Ticket;

/// Name shown for tickets whose assignee is unknown.
pub const UNKNOWN_USER: &str = "unknown";

/// One mapping entry: a bare Discord id or an id with a display name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UserMappingEntry {
    Id(String),
    Detailed {
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

/// Discord identity resolved for a tracker user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordUser {
    pub id: Option<String>,
    pub name: String,
}

impl DiscordUser {
    /// `<@id>` when the user is mapped.
    pub fn mention(&self) -> Option<String> {
        self.id.as_ref().map(|id| format!("<@{}>", id))
    }

    /// `@name` for readable output.
    pub fn display_name(&self) -> String {
        format!("@{}", self.name)
    }
}

/// Tracker display name → Discord identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct UserMapping(HashMap<String, UserMappingEntry>);

impl UserMapping {
    /// Parse a JSON object such as
    /// `{"Tanaka": "1234", "Sato": {"id": "5678", "name": "sato"}}`.
    ///
    /// Blank input yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UserMapping` for malformed JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(CoreError::UserMapping)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve a tracker user name.
    pub fn resolve(&self, tracker_name: Option<&str>) -> DiscordUser {
        let Some(name) = tracker_name.filter(|n| !n.is_empty()) else {
            return DiscordUser {
                id: None,
                name: UNKNOWN_USER.to_string(),
            };
        };

        match self.0.get(name) {
            Some(UserMappingEntry::Id(id)) if !id.is_empty() => DiscordUser {
                id: Some(id.clone()),
                name: name.to_string(),
            },
            Some(UserMappingEntry::Detailed { id, name: display }) if !id.is_empty() => {
                DiscordUser {
                    id: Some(id.clone()),
                    name: display
                        .clone()
                        .filter(|d| !d.is_empty())
                        .unwrap_or_else(|| name.to_string()),
                }
            }
            _ => DiscordUser {
                id: None,
                name: name.to_string(),
            },
        }
    }
}

/// Discord webhook message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscordPayload {
    pub content: String,
}

const HEADER: &str = "🔔 **Due date reminder**";
const NOTHING_DUE: &str = "✅ No due-date notifications.";

/// Build the reminder message for `buckets` as of `today`.
pub fn format_due_date_notification(
    buckets: &DueDateBuckets,
    mapping: &UserMapping,
    today: NaiveDate,
) -> DiscordPayload {
    let mut lines: Vec<String> = Vec::new();

    let sections: [(&str, &[Ticket], bool); 3] = [
        ("📅 **Due tomorrow:**", &buckets.tomorrow, false),
        ("⏰ **Due today:**", &buckets.today, false),
        ("🚨 **Overdue:**", &buckets.overdue, true),
    ];

    for (title, tickets, show_overdue) in sections {
        if tickets.is_empty() {
            continue;
        }
        lines.push(title.to_string());
        for ticket in tickets {
            let mut line = ticket_line(ticket, mapping);
            if show_overdue {
                line.push_str(&format!(
                    " ⚠️ **{} days overdue**",
                    days_overdue(ticket, today)
                ));
            }
            lines.push(line);
        }
        lines.push(String::new());
    }

    if lines.is_empty() {
        return DiscordPayload {
            content: NOTHING_DUE.to_string(),
        };
    }

    DiscordPayload {
        content: format!("{}\n\n{}", HEADER, lines.join("\n")),
    }
}

/// `<who> [#id] subject (due: YYYY-MM-DD)`
fn ticket_line(ticket: &Ticket, mapping: &UserMapping) -> String {
    let user = mapping.resolve(ticket.assigned_to.as_deref());
    let who = user.mention().unwrap_or_else(|| user.display_name());
    let due = ticket
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{} [#{}] {} (due: {})", who, ticket.id, ticket.subject, due)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::due_dates::{DEFAULT_CLOSED_STATUS_IDS, categorize_due_dates};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 4, 10)
    }

    fn mapping() -> UserMapping {
        UserMapping::from_json(
            r#"{"Tanaka": "111", "Sato": {"id": "222", "name": "hanako"}, "Yamada": {"id": ""}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_bare_id() {
        let user = mapping().resolve(Some("Tanaka"));
        assert_eq!(user.mention().as_deref(), Some("<@111>"));
        assert_eq!(user.display_name(), "@Tanaka");
    }

    #[test]
    fn test_resolve_detailed_entry_uses_mapped_name() {
        let user = mapping().resolve(Some("Sato"));
        assert_eq!(user.mention().as_deref(), Some("<@222>"));
        assert_eq!(user.display_name(), "@hanako");
    }

    #[test]
    fn test_resolve_unmapped_and_empty_id() {
        let mapping = mapping();
        assert_eq!(mapping.resolve(Some("Suzuki")).mention(), None);
        assert_eq!(mapping.resolve(Some("Suzuki")).display_name(), "@Suzuki");
        assert_eq!(mapping.resolve(Some("Yamada")).mention(), None);
    }

    #[test]
    fn test_resolve_missing_name() {
        let user = mapping().resolve(None);
        assert_eq!(user.display_name(), "@unknown");
        assert_eq!(user.mention(), None);
    }

    #[test]
    fn test_from_json_blank_and_invalid() {
        assert!(UserMapping::from_json("  ").unwrap().is_empty());
        assert!(matches!(
            UserMapping::from_json("[1, 2]"),
            Err(CoreError::UserMapping(_))
        ));
        assert_eq!(mapping().len(), 3);
    }

    #[test]
    fn test_format_empty_buckets() {
        let payload =
            format_due_date_notification(&DueDateBuckets::default(), &mapping(), today());
        assert_eq!(payload.content, "✅ No due-date notifications.");
    }

    #[test]
    fn test_format_all_sections() {
        let tickets = vec![
            Ticket::new(1, "Write docs")
                .with_dates(None, Some(date(2025, 4, 11)))
                .with_assignee("Tanaka"),
            Ticket::new(2, "Review")
                .with_dates(None, Some(date(2025, 4, 10)))
                .with_assignee("Suzuki"),
            Ticket::new(3, "Deploy")
                .with_dates(None, Some(date(2025, 4, 7)))
                .with_assignee("Sato"),
        ];
        let buckets = categorize_due_dates(&tickets, today(), &DEFAULT_CLOSED_STATUS_IDS);
        let payload = format_due_date_notification(&buckets, &mapping(), today());

        let expected = [
            "🔔 **Due date reminder**",
            "",
            "📅 **Due tomorrow:**",
            "<@111> [#1] Write docs (due: 2025-04-11)",
            "",
            "⏰ **Due today:**",
            "@Suzuki [#2] Review (due: 2025-04-10)",
            "",
            "🚨 **Overdue:**",
            "<@222> [#3] Deploy (due: 2025-04-07) ⚠️ **3 days overdue**",
            "",
        ]
        .join("\n");
        assert_eq!(payload.content, expected);
    }

    #[test]
    fn test_format_skips_empty_sections() {
        let buckets = DueDateBuckets {
            today: vec![
                Ticket::new(9, "Only today")
                    .with_dates(None, Some(today()))
                    .with_assignee("Tanaka"),
            ],
            ..DueDateBuckets::default()
        };
        let payload = format_due_date_notification(&buckets, &UserMapping::default(), today());

        assert!(payload.content.contains("Due today"));
        assert!(!payload.content.contains("Due tomorrow"));
        assert!(!payload.content.contains("Overdue"));
        assert!(payload.content.contains("@Tanaka [#9] Only today"));
    }

    #[test]
    fn test_payload_serializes_content_field() {
        let payload = DiscordPayload {
            content: "hi".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"content":"hi"}"#
        );
    }
}
