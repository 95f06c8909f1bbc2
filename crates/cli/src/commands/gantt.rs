//! Gantt command for rendering the timeline
//!
//! Implements the `trl gantt` command: builds a timeline layout for the
//! selected view and prints it as a text chart or as JSON.

use clap::Args;
use serde::Serialize;
use trellis_core::{
    ExpansionState, TicketId, TimelineLayout, ViewConfig, YearMonth, filter_for_view,
};

use crate::commands::Context;
use crate::error::{CliError, CliResult};
use crate::output::format_gantt;

/// Which view to lay out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Master,
    Monthly,
    Auto,
}

/// Parse a view name into a ViewKind
fn parse_view(s: &str) -> Result<ViewKind, String> {
    match s.to_lowercase().as_str() {
        "master" => Ok(ViewKind::Master),
        "monthly" => Ok(ViewKind::Monthly),
        "auto" => Ok(ViewKind::Auto),
        _ => Err(format!(
            "invalid view '{}'. Valid values: master, monthly, auto",
            s
        )),
    }
}

/// Render tickets as a Gantt chart
#[derive(Debug, Args)]
pub struct GanttCommand {
    /// View mode: master, monthly or auto (default: monthly if --month is given, else auto)
    #[arg(long, value_parser = parse_view)]
    pub view: Option<ViewKind>,

    /// Month for the monthly view as YYYY-MM (defaults to the current month)
    #[arg(long)]
    pub month: Option<String>,

    /// Drop undated tickets and, in the monthly view, tickets outside the month
    #[arg(long)]
    pub filter: bool,

    /// Print the layout as JSON instead of a chart
    #[arg(long)]
    pub json: bool,

    /// Width of the bar area in characters
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Hide the children of a ticket (can be specified multiple times)
    #[arg(long = "collapse")]
    pub collapse: Vec<TicketId>,
}

/// JSON document printed by `trl gantt --json`
#[derive(Debug, Serialize)]
struct GanttOutput<'a> {
    mock: bool,
    total: usize,
    #[serde(flatten)]
    layout: &'a TimelineLayout,
}

impl GanttCommand {
    /// Execute the gantt command.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if:
    /// - `--month` is malformed or used with a non-monthly view
    /// - JSON encoding fails
    pub fn execute(&self, ctx: &Context) -> CliResult<String> {
        let view = self.view_config(ctx)?;

        let tickets = if self.filter {
            filter_for_view(&ctx.loaded.tickets, &view)
        } else {
            ctx.loaded.tickets.clone()
        };

        let layout = TimelineLayout::build(&tickets, &view, ctx.settings.today);

        if self.json {
            let output = GanttOutput {
                mock: ctx.loaded.mock,
                total: tickets.len(),
                layout: &layout,
            };
            return Ok(serde_json::to_string_pretty(&output)?);
        }

        let mut state = ExpansionState::new();
        for id in &self.collapse {
            state.collapse(*id);
        }

        let chart = format_gantt(&layout, &state, self.width);
        if ctx.loaded.mock {
            Ok(format!("(mock data)\n{}", chart))
        } else {
            Ok(chart)
        }
    }

    /// Build the view configuration from the flags.
    fn view_config(&self, ctx: &Context) -> CliResult<ViewConfig> {
        let kind = match (self.view, &self.month) {
            (Some(kind), _) => kind,
            (None, Some(_)) => ViewKind::Monthly,
            (None, None) => ViewKind::Auto,
        };

        let view = match kind {
            ViewKind::Monthly => {
                let month = match &self.month {
                    Some(raw) => YearMonth::parse(raw)?,
                    None => YearMonth::of(ctx.settings.today),
                };
                ViewConfig::monthly(month)
            }
            ViewKind::Master | ViewKind::Auto if self.month.is_some() => {
                return Err(CliError::invalid(
                    "--month",
                    "only applies to the monthly view",
                ));
            }
            ViewKind::Master => ViewConfig::master(),
            ViewKind::Auto => ViewConfig::auto(),
        };

        Ok(view.with_project_range(ctx.settings.project_range))
    }
}
