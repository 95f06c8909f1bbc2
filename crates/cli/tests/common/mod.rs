//! Test infrastructure for integration tests
//!
//! Provides isolated ticket files and command builders. Each test writes its
//! own export into a uniquely named temp directory.

use std::path::PathBuf;

use chrono::NaiveDate;
use trellis_cli::commands::{Context, GanttCommand, NotifyCommand, TreeCommand};
use trellis_cli::config::Settings;
use trellis_core::SourceConfig;

/// Reference day used by every integration test.
pub fn today() -> NaiveDate {
    date(2025, 4, 10)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Test context owning a temp directory with a ticket export
pub struct TestContext {
    pub temp_dir: PathBuf,
    pub tickets_path: PathBuf,
}

impl TestContext {
    /// Write `json` as the ticket export of a fresh temp directory.
    pub fn with_tickets(json: &str) -> Self {
        let temp_dir = std::env::temp_dir().join(format!(
            "trl-integration-test-{}-{:?}-{}",
            std::process::id(),
            std::thread::current().id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&temp_dir).unwrap();

        let tickets_path = temp_dir.join("issues.json");
        std::fs::write(&tickets_path, json).unwrap();

        Self {
            temp_dir,
            tickets_path,
        }
    }

    /// Settings reading this context's ticket file.
    pub fn settings(&self) -> Settings {
        Settings::new(SourceConfig::File(self.tickets_path.clone()), today())
    }

    /// Load the tickets into a command context.
    pub fn context(&self) -> Context {
        Context::load(self.settings()).unwrap()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Auto-cleanup on drop
        let _ = std::fs::remove_dir_all(&self.temp_dir);
    }
}

// =============================================================================
// Command Builder Helpers
// =============================================================================

/// Create a gantt command with defaults.
pub fn gantt_cmd() -> GanttCommand {
    GanttCommand {
        view: None,
        month: None,
        filter: false,
        json: false,
        width: 30,
        collapse: vec![],
    }
}

/// Create a gantt command printing JSON for a given month.
pub fn gantt_json_for_month(month: &str) -> GanttCommand {
    GanttCommand {
        month: Some(month.to_string()),
        json: true,
        ..gantt_cmd()
    }
}

/// Create a tree command.
pub fn tree_cmd(json: bool) -> TreeCommand {
    TreeCommand { json }
}

/// Create a notify command with the default closed statuses.
pub fn notify_cmd() -> NotifyCommand {
    NotifyCommand {
        closed_status: vec![],
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A small project export in the tracker's envelope shape.
pub const PROJECT_JSON: &str = r#"{
    "issues": [
        {
            "id": 10,
            "subject": "Release 1.0",
            "start_date": "2025-04-01",
            "due_date": "2025-05-31",
            "done_ratio": 20,
            "assigned_to": {"id": 1, "name": "Tanaka"},
            "status": {"id": 2, "name": "In Progress"}
        },
        {
            "id": 11,
            "subject": "Write docs",
            "parent": {"id": 10},
            "start_date": "2025-04-01",
            "due_date": "2025-04-03",
            "done_ratio": 50,
            "assigned_to": {"id": 2, "name": "Sato"},
            "status": {"id": 2, "name": "In Progress"}
        },
        {
            "id": 12,
            "subject": "Deploy",
            "parent": {"id": 10},
            "due_date": "2025-04-11T00:00:00Z",
            "assigned_to": {"id": 3, "name": "Suzuki"},
            "status": {"id": 1, "name": "New"}
        },
        {
            "id": 13,
            "subject": "Retrospective",
            "start_date": "2025-06-01",
            "due_date": "2025-06-02",
            "status": {"id": 1, "name": "New"}
        },
        {
            "id": 14,
            "subject": "Closed task",
            "due_date": "2025-04-09",
            "assigned_to": {"id": 1, "name": "Tanaka"},
            "status": {"id": 5, "name": "Closed"}
        },
        {
            "id": 15,
            "subject": "Bad dates",
            "start_date": "someday",
            "due_date": "2025-04-10",
            "assigned_to": {"id": 2, "name": "Sato"}
        }
    ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creates_isolated_dirs() {
        let ctx1 = TestContext::with_tickets("[]");
        let ctx2 = TestContext::with_tickets("[]");

        assert_ne!(
            ctx1.temp_dir, ctx2.temp_dir,
            "Each context should have unique temp dir"
        );
        assert!(ctx1.tickets_path.exists());
    }

    #[test]
    fn test_fixture_loads() {
        let ctx = TestContext::with_tickets(PROJECT_JSON);
        let loaded = ctx.context().loaded;
        assert_eq!(loaded.total(), 6);
        assert!(!loaded.mock);
    }
}
