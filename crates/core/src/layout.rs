//! Complete timeline layout: hierarchy, axis and bars in one value, plus the
//! presentation helpers a front end needs to walk it.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::axis::{DateAxis, ViewConfig};
use crate::geometry::TicketBars;
use crate::hierarchy::{TicketNode, build_hierarchy};
use crate::models::{Ticket, TicketId};

/// Everything needed to draw a Gantt chart for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub view: ViewConfig,
    pub axis: DateAxis,
    pub roots: Vec<TicketNode>,
    pub bars: BTreeMap<TicketId, TicketBars>,
}

impl TimelineLayout {
    /// Lay out `tickets` for `view`.
    ///
    /// Pure: the same tickets, view and `today` always produce the same layout.
    pub fn build(tickets: &[Ticket], view: &ViewConfig, today: NaiveDate) -> Self {
        let axis = DateAxis::compute(view, tickets, today);
        let roots = build_hierarchy(tickets);

        let mut bars = BTreeMap::new();
        for ticket in tickets {
            bars.entry(ticket.id)
                .or_insert_with(|| TicketBars::for_ticket(ticket, &axis));
        }

        debug!(
            "Laid out {} tickets for {} view ({} with bars)",
            bars.len(),
            view.mode,
            bars.values().filter(|b| !b.is_empty()).count()
        );

        Self {
            view: *view,
            axis,
            roots,
            bars,
        }
    }

    /// Bars of one ticket; empty for unknown ids.
    pub fn bars_for(&self, id: TicketId) -> TicketBars {
        self.bars.get(&id).copied().unwrap_or_default()
    }

    /// Visible rows in display order.
    pub fn rows(&self, state: &ExpansionState) -> Vec<VisibleRow<'_>> {
        flatten(&self.roots, state)
            .into_iter()
            .map(|row| VisibleRow {
                bars: self.bars_for(row.ticket.id),
                ..row
            })
            .collect()
    }
}

/// Expand/collapse flags of the ticket tree.
///
/// Nodes start expanded; only collapsed ids are tracked.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    collapsed: HashSet<TicketId>,
}

impl ExpansionState {
    /// Create a state with every node expanded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a node is expanded.
    pub fn is_expanded(&self, id: TicketId) -> bool {
        !self.collapsed.contains(&id)
    }

    /// Expand a node.
    pub fn expand(&mut self, id: TicketId) {
        self.collapsed.remove(&id);
    }

    /// Collapse a node.
    pub fn collapse(&mut self, id: TicketId) {
        self.collapsed.insert(id);
    }

    /// Toggle the expanded state of a node.
    pub fn toggle(&mut self, id: TicketId) {
        if self.is_expanded(id) {
            self.collapse(id);
        } else {
            self.expand(id);
        }
    }

    /// Expand all nodes.
    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Collapse every node that has children.
    pub fn collapse_all(&mut self, roots: &[TicketNode]) {
        for node in roots.iter().flat_map(TicketNode::iter) {
            if node.has_children() {
                self.collapse(node.id());
            }
        }
    }
}

/// One displayed row of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRow<'a> {
    pub ticket: &'a Ticket,
    /// Depth in the tree (0 = root).
    pub depth: usize,
    pub has_children: bool,
    pub is_expanded: bool,
    pub bars: TicketBars,
}

/// Flatten a forest into visible rows based on expansion state.
///
/// A ticket id is emitted at most once; a repeated id (only possible in a
/// hand-assembled tree) is skipped along with its subtree.
pub fn flatten<'a>(roots: &'a [TicketNode], state: &ExpansionState) -> Vec<VisibleRow<'a>> {
    let mut rows = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<(&TicketNode, usize)> = roots.iter().rev().map(|root| (root, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        if !visited.insert(node.id()) {
            warn!("Ticket #{} reached twice while flattening; skipping", node.id());
            continue;
        }

        let is_expanded = state.is_expanded(node.id());
        rows.push(VisibleRow {
            ticket: &node.ticket,
            depth,
            has_children: node.has_children(),
            is_expanded,
            bars: TicketBars::default(),
        });

        if is_expanded {
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
    }

    rows
}

/// Narrow a ticket list to what a view is about.
///
/// Undated tickets are dropped. For a monthly view only tickets whose
/// interval overlaps the month are kept; a ticket with a single date is
/// treated as a one-day interval on that date.
pub fn filter_for_view(tickets: &[Ticket], view: &ViewConfig) -> Vec<Ticket> {
    let window = view.month_window();

    tickets
        .iter()
        .filter(|ticket| match window {
            None => ticket.has_any_date(),
            Some(month) => match (
                ticket.start_date.or(ticket.due_date),
                ticket.due_date.or(ticket.start_date),
            ) {
                (Some(start), Some(end)) => start <= month.last_day() && end >= month.first_day(),
                _ => false,
            },
        })
        .cloned()
        .collect()
}
