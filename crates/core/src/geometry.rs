//! Bar geometry for the timeline.
//!
//! Bars are expressed in percent of the axis width. A date interval is
//! converted to axis units, clipped to the axis, and measured inclusively: a
//! ticket that starts and ends in the same unit is one unit wide.

use chrono::NaiveDate;
use serde::Serialize;

use crate::axis::DateAxis;
use crate::models::Ticket;

/// Horizontal placement of a bar, in percent of the axis width.
///
/// Always satisfies `0 <= left <= 100`, `width >= 0` and
/// `left + width <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarGeometry {
    pub left: f64,
    pub width: f64,
}

impl BarGeometry {
    /// Clamp raw percentages into the axis; non-finite input yields `None`.
    pub fn clamped(left: f64, width: f64) -> Option<Self> {
        if !left.is_finite() || !width.is_finite() {
            return None;
        }
        let left = left.clamp(0.0, 100.0);
        let width = width.clamp(0.0, 100.0 - left);
        Some(Self { left, width })
    }

    /// Right edge in percent.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Same left edge, width scaled by a completion percentage.
    pub fn scaled(&self, done_ratio: u8) -> Self {
        let ratio = f64::from(done_ratio.min(100));
        Self {
            left: self.left,
            width: self.width * ratio / 100.0,
        }
    }
}

/// Planned and actual bars of one ticket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TicketBars {
    pub planned: Option<BarGeometry>,
    pub actual: Option<BarGeometry>,
}

impl TicketBars {
    /// Compute both bars of `ticket` against `axis`.
    pub fn for_ticket(ticket: &Ticket, axis: &DateAxis) -> Self {
        Self {
            planned: planned_bar(ticket, axis),
            actual: actual_bar(ticket, axis),
        }
    }

    /// Whether neither bar is drawn.
    pub fn is_empty(&self) -> bool {
        self.planned.is_none() && self.actual.is_none()
    }
}

/// Geometry of the inclusive interval `[start, end]` on `axis`.
///
/// Returns `None` for an inverted interval or one that lies entirely outside
/// the axis.
pub fn span_geometry(start: NaiveDate, end: NaiveDate, axis: &DateAxis) -> Option<BarGeometry> {
    if start > end || axis.is_empty() {
        return None;
    }

    let total = axis.len() as i64;
    let first = axis.unit_index(start).max(0);
    let last = axis.unit_index(end).min(total - 1);
    if first > last {
        return None;
    }

    let total = total as f64;
    let left = first as f64 * 100.0 / total;
    let width = (last - first + 1) as f64 * 100.0 / total;
    BarGeometry::clamped(left, width)
}

/// Scheduled start→due bar. Needs both dates.
pub fn planned_bar(ticket: &Ticket, axis: &DateAxis) -> Option<BarGeometry> {
    match (ticket.start_date, ticket.due_date) {
        (Some(start), Some(due)) => span_geometry(start, due, axis),
        _ => None,
    }
}

/// Progress overlay: the start→due (or start→start) bar scaled by
/// `done_ratio`. Only drawn for started tickets with some progress.
pub fn actual_bar(ticket: &Ticket, axis: &DateAxis) -> Option<BarGeometry> {
    if ticket.done_ratio == 0 {
        return None;
    }
    let start = ticket.start_date?;
    let end = ticket.due_date.unwrap_or(start);
    span_geometry(start, end, axis).map(|bar| bar.scaled(ticket.done_ratio))
}
