//! Ticket sources
//!
//! A [`TicketSource`] produces the ticket list a timeline is built from. The
//! file source reads an exported tracker document; the mock source generates
//! reproducible sample tickets for demos and development.

use std::fs;
use std::path::PathBuf;

use chrono::{Datelike, Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::axis::first_of_month;
use crate::error::{CoreError, CoreResult};
use crate::models::{Ticket, parse_issues};

/// Tickets returned by a source, flagged when they are sample data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedTickets {
    pub tickets: Vec<Ticket>,
    pub mock: bool,
}

impl LoadedTickets {
    pub fn total(&self) -> usize {
        self.tickets.len()
    }
}

/// Anything that can supply tickets.
pub trait TicketSource {
    /// Load all tickets.
    ///
    /// # Errors
    ///
    /// Returns a `CoreError` when the underlying data cannot be read or parsed.
    fn load(&self) -> CoreResult<LoadedTickets>;
}

/// Reads a tracker export (`{"issues": [...]}` or a bare array) from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TicketSource for JsonFileSource {
    fn load(&self) -> CoreResult<LoadedTickets> {
        let content = fs::read_to_string(&self.path).map_err(|source| CoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let tickets = parse_issues(&content).map_err(|e| match e {
            CoreError::Parse(source) => CoreError::ParseFile {
                path: self.path.clone(),
                source,
            },
            other => other,
        })?;

        info!("Loaded {} tickets from {}", tickets.len(), self.path.display());
        Ok(LoadedTickets {
            tickets,
            mock: false,
        })
    }
}

const MOCK_TOPICS: [&str; 4] = ["Frontend", "API design", "Database design", "Test writing"];
const MOCK_ASSIGNEES: [&str; 4] = ["Tanaka", "Sato", "Suzuki", "Yamada"];
const MOCK_STATUSES: [(i64, &str); 4] = [
    (1, "New"),
    (2, "In Progress"),
    (4, "Feedback"),
    (5, "Closed"),
];

/// Generates sample tickets in the month of `today`.
///
/// Ticket `i` (1-based) starts on day `i` of the month and runs 7 to 20 days.
/// The same seed always yields the same tickets.
#[derive(Debug, Clone)]
pub struct MockSource {
    pub today: NaiveDate,
    pub count: u32,
    pub seed: u64,
}

impl MockSource {
    pub const DEFAULT_COUNT: u32 = 10;
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            count: Self::DEFAULT_COUNT,
            seed: Self::DEFAULT_SEED,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the sample tickets.
    pub fn generate(&self) -> Vec<Ticket> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let month_start = first_of_month(self.today);

        (1..=self.count)
            .map(|i| {
                let idx = (i % 4) as usize;
                let start = month_start.checked_add_days(Days::new(u64::from(i) - 1));
                let span: u64 = 7 + rng.random_range(0..14);
                let due = start.and_then(|start| start.checked_add_days(Days::new(span)));
                let done_ratio: u8 = rng.random_range(0..100);
                let (status_id, status_name) = MOCK_STATUSES[rng.random_range(0..4)];

                Ticket::new(
                    1000 + i64::from(i),
                    format!("Sample ticket {}: {}", i, MOCK_TOPICS[idx]),
                )
                .with_dates(start, due)
                .with_done_ratio(done_ratio)
                .with_assignee(MOCK_ASSIGNEES[idx])
                .with_status(status_id, status_name)
            })
            .collect()
    }
}

impl TicketSource for MockSource {
    fn load(&self) -> CoreResult<LoadedTickets> {
        let tickets = self.generate();
        debug!(
            "Generated {} mock tickets for {}-{:02}",
            tickets.len(),
            self.today.year(),
            self.today.month()
        );
        Ok(LoadedTickets {
            tickets,
            mock: true,
        })
    }
}

/// Which source to load tickets from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    File(PathBuf),
    Mock,
}

impl SourceConfig {
    /// Instantiate the configured source. `today` anchors mock data.
    pub fn open(&self, today: NaiveDate) -> Box<dyn TicketSource> {
        match self {
            SourceConfig::File(path) => Box::new(JsonFileSource::new(path.clone())),
            SourceConfig::Mock => Box::new(MockSource::new(today)),
        }
    }
}
