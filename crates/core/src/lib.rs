//! Core library for Trellis
//!
//! Builds Gantt timelines from issue tracker tickets: the parent/child
//! hierarchy, the date axis for a view, and bar geometry as percentages of the
//! axis width. Also sorts tickets into due-date reminder buckets and formats
//! them as Discord messages.
//!
//! Everything here is synchronous and pure apart from [`source`], which reads
//! ticket files.

pub mod axis;
pub mod due_dates;
pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod layout;
pub mod models;
pub mod notification;
pub mod source;

pub use axis::{DateAxis, Granularity, ProjectRange, ViewConfig, ViewMode, YearMonth};
pub use due_dates::{
    DEFAULT_CLOSED_STATUS_IDS, DueDateBuckets, DueDateStats, categorize_due_dates, days_overdue,
};
pub use error::{CoreError, CoreResult};
pub use geometry::{BarGeometry, TicketBars, actual_bar, planned_bar};
pub use hierarchy::{PreOrder, TicketNode, build_hierarchy};
pub use layout::{ExpansionState, TimelineLayout, VisibleRow, filter_for_view, flatten};
pub use models::{Ticket, TicketId, TicketStatus, parse_issues};
pub use notification::{DiscordPayload, UserMapping, format_due_date_notification};
pub use source::{JsonFileSource, LoadedTickets, MockSource, SourceConfig, TicketSource};

static_assertions::assert_impl_all!(Ticket: Send, Sync, Clone);
static_assertions::assert_impl_all!(TimelineLayout: Send, Sync);
static_assertions::assert_impl_all!(DueDateBuckets: Send, Sync);
static_assertions::assert_impl_all!(CoreError: Send, Sync);
