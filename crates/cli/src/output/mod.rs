//! Output formatting module for Trellis
//!
//! Renders timelines and ticket trees as plain text for the terminal.

use trellis_core::{
    BarGeometry, DateAxis, DueDateStats, ExpansionState, Granularity, TicketNode,
    TimelineLayout, VisibleRow,
};

/// Maximum width of the label column in the Gantt chart
const LABEL_WIDTH: usize = 36;

/// Bar and tree drawing characters.
mod glyphs {
    /// Planned interval.
    pub const PLANNED: char = '\u{2591}'; // ░
    /// Completed share of the planned interval.
    pub const ACTUAL: char = '\u{2588}'; // █
    /// Expanded node with children.
    pub const EXPANDED: &str = "\u{25BE} "; // ▾
    /// Collapsed node with children.
    pub const COLLAPSED: &str = "\u{25B8} "; // ▸
    /// Leaf node.
    pub const LEAF: &str = "  ";

    /// Branch connector for intermediate items.
    pub const BRANCH: &str = "\u{251C}\u{2500}\u{2500} "; // ├──
    /// Last item connector.
    pub const LAST_BRANCH: &str = "\u{2514}\u{2500}\u{2500} "; // └──
    /// Vertical line for continuing structure.
    pub const VERTICAL: &str = "\u{2502}   "; // │
    /// Empty space for alignment.
    pub const SPACE: &str = "    ";
}

/// Truncate a string to `max_width` characters, adding an ellipsis if needed.
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{}...", head)
    }
}

/// Character columns `[start, end)` covered by a bar in a `width`-wide area.
///
/// A bar with positive width always covers at least one column.
fn bar_columns(bar: &BarGeometry, width: usize) -> (usize, usize) {
    if width == 0 {
        return (0, 0);
    }
    let to_col = |percent: f64| (percent * width as f64 / 100.0).round() as usize;
    let start = to_col(bar.left).min(width - 1);
    if bar.width <= 0.0 {
        return (start, start);
    }
    let end = to_col(bar.right()).min(width).max(start + 1);
    (start, end)
}

/// Draw the planned and actual bars of one row.
fn render_bar(row: &VisibleRow<'_>, width: usize) -> String {
    let mut cells = vec![' '; width];

    if let Some(planned) = &row.bars.planned {
        let (start, end) = bar_columns(planned, width);
        cells[start..end].fill(glyphs::PLANNED);
    }
    if let Some(actual) = &row.bars.actual {
        let (start, end) = bar_columns(actual, width);
        cells[start..end].fill(glyphs::ACTUAL);
    }

    cells.into_iter().collect()
}

/// Unit labels positioned over the bar area; labels that would overlap are skipped.
fn render_scale(axis: &DateAxis, width: usize) -> String {
    let mut cells = vec![' '; width];
    let total = axis.len().max(1);
    let mut next_free = 0;

    for (i, unit) in axis.units().iter().enumerate() {
        let label = match axis.granularity() {
            Granularity::Day => unit.format("%d").to_string(),
            Granularity::Month => unit.format("%b").to_string(),
        };
        let col = i * width / total;
        let len = label.chars().count();
        if col < next_free || col + len > width {
            continue;
        }
        for (offset, ch) in label.chars().enumerate() {
            cells[col + offset] = ch;
        }
        next_free = col + len + 1;
    }

    cells.into_iter().collect()
}

/// Label column text: indentation, expansion marker, id and subject.
fn row_label(row: &VisibleRow<'_>) -> String {
    let marker = match (row.has_children, row.is_expanded) {
        (true, true) => glyphs::EXPANDED,
        (true, false) => glyphs::COLLAPSED,
        (false, _) => glyphs::LEAF,
    };
    let label = format!(
        "{}{}#{} {}",
        "  ".repeat(row.depth),
        marker,
        row.ticket.id,
        row.ticket.subject
    );
    truncate(&label, LABEL_WIDTH)
}

/// Format a timeline as a text Gantt chart.
///
/// Produces output in the format:
/// ```text
/// View: monthly (2025-04)                  01   06   11   ...
/// ------------------------------------  +------------------------------+
/// ▾ #1 Release                          |░░░░░░░░░                     |
///     #2 Docs                           |██░                           |
/// ```
pub fn format_gantt(layout: &TimelineLayout, state: &ExpansionState, width: usize) -> String {
    let rows = layout.rows(state);
    if rows.is_empty() {
        return "No tickets to display.".to_string();
    }

    let width = width.max(1);
    let mut output = String::new();

    output.push_str(&format!(
        "{:<label_w$}  {}\n",
        truncate(&format!("View: {}", layout.view.mode), LABEL_WIDTH),
        format!(" {}", render_scale(&layout.axis, width)).trim_end(),
        label_w = LABEL_WIDTH,
    ));
    output.push_str(&format!(
        "{:-<label_w$}  +{:-<bar_w$}+\n",
        "",
        "",
        label_w = LABEL_WIDTH,
        bar_w = width,
    ));

    for row in &rows {
        output.push_str(&format!(
            "{:<label_w$}  |{}|\n",
            row_label(row),
            render_bar(row, width),
            label_w = LABEL_WIDTH,
        ));
    }

    let unit = match layout.axis.granularity() {
        Granularity::Day => "days",
        Granularity::Month => "months",
    };
    output.push_str(&format!(
        "Axis: {} .. {} ({} {})",
        layout.axis.start(),
        layout.axis.end(),
        layout.axis.len(),
        unit
    ));

    output
}

/// Format a ticket forest with box-drawing connectors.
///
/// ```text
/// └── #1 Release [2025-04-01 .. 2025-04-30, 40%] (2)
///     ├── #2 Docs [2025-04-01 .. 2025-04-03, 50%]
///     └── #3 Deploy [- .. 2025-04-30, 0%]
/// ```
pub fn format_tree(roots: &[TicketNode]) -> String {
    if roots.is_empty() {
        return "No tickets found.".to_string();
    }

    let mut lines = Vec::new();
    let mut stack: Vec<(&TicketNode, Vec<bool>, bool)> = roots
        .iter()
        .enumerate()
        .rev()
        .map(|(i, root)| (root, Vec::new(), i == roots.len() - 1))
        .collect();

    while let Some((node, prefix_parts, is_last)) = stack.pop() {
        lines.push(format!(
            "{}{}",
            build_prefix(&prefix_parts, is_last),
            node_text(node)
        ));

        let child_count = node.children.len();
        for (i, child) in node.children.iter().enumerate().rev() {
            let mut child_prefix_parts = prefix_parts.clone();
            child_prefix_parts.push(!is_last);
            stack.push((child, child_prefix_parts, i == child_count - 1));
        }
    }
    lines.join("\n")
}

/// Build the prefix string for a node.
fn build_prefix(prefix_parts: &[bool], is_last: bool) -> String {
    let mut prefix = String::new();

    for &has_vertical in prefix_parts {
        if has_vertical {
            prefix.push_str(glyphs::VERTICAL);
        } else {
            prefix.push_str(glyphs::SPACE);
        }
    }

    if is_last {
        prefix.push_str(glyphs::LAST_BRANCH);
    } else {
        prefix.push_str(glyphs::BRANCH);
    }

    prefix
}

fn node_text(node: &TicketNode) -> String {
    let ticket = &node.ticket;
    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
    };

    let mut text = format!(
        "#{} {} [{} .. {}, {}%]",
        ticket.id,
        ticket.subject,
        date(ticket.start_date),
        date(ticket.due_date),
        ticket.done_ratio
    );
    if node.has_children() {
        text.push_str(&format!(" ({})", node.children.len()));
    }
    text
}

/// One-line summary for a due-date scan with nothing to send.
pub fn format_due_stats(stats: &DueDateStats) -> String {
    format!(
        "No due-date notifications ({} tickets scanned: {} tomorrow, {} today, {} overdue)",
        stats.total_tickets, stats.tomorrow, stats.today, stats.overdue
    )
}
