//! Runtime configuration for the trl CLI
//!
//! Each setting is resolved with the same priority:
//! 1. Command line flag
//! 2. Environment variable (if set and non-empty)
//! 3. Built-in default

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};
use trellis_core::{
    LoadedTickets, MockSource, ProjectRange, SourceConfig, TicketSource, UserMapping,
};

use crate::error::{CliError, CliResult};

/// Environment variable naming the ticket export file
pub const TICKETS_ENV: &str = "TRELLIS_TICKETS";

/// Environment variable forcing mock tickets
pub const MOCK_ENV: &str = "TRELLIS_MOCK";

/// Environment variables overriding the master view range
pub const PROJECT_START_ENV: &str = "TRELLIS_PROJECT_START";
pub const PROJECT_END_ENV: &str = "TRELLIS_PROJECT_END";

/// Environment variable holding the Discord user mapping JSON
pub const USER_MAPPING_ENV: &str = "DISCORD_USER_MAPPING";

/// Read an environment variable, treating an empty value as unset.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Parse a `YYYY-MM-DD` flag value.
pub fn parse_date_flag(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}'. Expected YYYY-MM-DD", s))
}

/// Get the ticket file from the command line or `TRELLIS_TICKETS`.
pub fn resolve_tickets_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path);
    }
    env_value(TICKETS_ENV).map(PathBuf::from)
}

/// Whether mock tickets were requested by flag or `TRELLIS_MOCK`.
///
/// The environment variable counts when set to `1`, `true`, `yes` or `on`.
pub fn resolve_mock(cli_mock: bool) -> bool {
    if cli_mock {
        return true;
    }
    env_value(MOCK_ENV).is_some_and(|value| {
        matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Pick the ticket source.
///
/// Without a ticket file the CLI falls back to mock data, like a dashboard
/// running without tracker credentials.
pub fn resolve_source(tickets: Option<PathBuf>, mock: bool) -> SourceConfig {
    if mock {
        return SourceConfig::Mock;
    }
    match tickets {
        Some(path) => SourceConfig::File(path),
        None => {
            warn!(
                "No ticket file given (--tickets or {}); using mock data",
                TICKETS_ENV
            );
            SourceConfig::Mock
        }
    }
}

fn resolve_date(cli: Option<NaiveDate>, env_name: &str, default: NaiveDate) -> CliResult<NaiveDate> {
    if let Some(date) = cli {
        return Ok(date);
    }
    match env_value(env_name) {
        Some(raw) => parse_date_flag(&raw).map_err(|message| CliError::invalid(env_name, message)),
        None => Ok(default),
    }
}

/// Resolve the master view range from flags, environment and defaults.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for an unparsable environment value
/// and `CoreError::InvalidRange` when start is after end.
pub fn resolve_project_range(
    cli_start: Option<NaiveDate>,
    cli_end: Option<NaiveDate>,
) -> CliResult<ProjectRange> {
    let defaults = ProjectRange::default();
    let start = resolve_date(cli_start, PROJECT_START_ENV, defaults.start())?;
    let end = resolve_date(cli_end, PROJECT_END_ENV, defaults.end())?;
    Ok(ProjectRange::new(start, end)?)
}

/// The reference day; the local date unless overridden.
pub fn resolve_today(cli_today: Option<NaiveDate>) -> NaiveDate {
    cli_today.unwrap_or_else(|| Local::now().date_naive())
}

/// Resolved settings shared by every command.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: SourceConfig,
    /// Serve mock tickets when the ticket file cannot be loaded
    pub mock_on_error: bool,
    pub project_range: ProjectRange,
    pub today: NaiveDate,
    /// Raw `DISCORD_USER_MAPPING` value, parsed on demand
    pub user_mapping_json: Option<String>,
}

impl Settings {
    /// Settings for `source` with default range and no user mapping.
    pub fn new(source: SourceConfig, today: NaiveDate) -> Self {
        Self {
            source,
            mock_on_error: false,
            project_range: ProjectRange::default(),
            today,
            user_mapping_json: None,
        }
    }

    /// Resolve settings from global flags and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the project range cannot be resolved.
    pub fn resolve(
        tickets: Option<PathBuf>,
        mock: bool,
        mock_on_error: bool,
        project_start: Option<NaiveDate>,
        project_end: Option<NaiveDate>,
        today: Option<NaiveDate>,
    ) -> CliResult<Self> {
        let source = resolve_source(resolve_tickets_path(tickets), resolve_mock(mock));
        Ok(Self {
            source,
            mock_on_error,
            project_range: resolve_project_range(project_start, project_end)?,
            today: resolve_today(today),
            user_mapping_json: env_value(USER_MAPPING_ENV),
        })
    }

    /// Parse the configured Discord user mapping; empty when unset.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UserMapping` for malformed JSON.
    pub fn user_mapping(&self) -> CliResult<UserMapping> {
        match &self.user_mapping_json {
            Some(json) => Ok(UserMapping::from_json(json)?),
            None => Ok(UserMapping::default()),
        }
    }

    /// Load tickets from the configured source.
    ///
    /// When `mock_on_error` is set, a failing file source is replaced by mock
    /// tickets and the failure is logged.
    ///
    /// # Errors
    ///
    /// Returns the source's error unless the mock fallback applies.
    pub fn load_tickets(&self) -> CliResult<LoadedTickets> {
        match self.source.open(self.today).load() {
            Ok(loaded) => {
                info!(
                    "Loaded {} tickets{}",
                    loaded.total(),
                    if loaded.mock { " (mock)" } else { "" }
                );
                Ok(loaded)
            }
            Err(err) if self.mock_on_error && matches!(self.source, SourceConfig::File(_)) => {
                warn!("{}; falling back to mock data", err);
                Ok(MockSource::new(self.today).load()?)
            }
            Err(err) => Err(err.into()),
        }
    }
}
