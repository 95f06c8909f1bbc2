//! CLI commands for Trellis
//!
//! This module contains all subcommand implementations for the trl CLI.

pub mod gantt;
pub mod notify;
pub mod tree;

pub use gantt::{GanttCommand, ViewKind};
pub use notify::NotifyCommand;
pub use tree::TreeCommand;

use clap::Subcommand;
use trellis_core::LoadedTickets;

use crate::config::Settings;
use crate::error::CliResult;

/// Loaded tickets plus the settings they were loaded with.
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    pub loaded: LoadedTickets,
}

impl Context {
    /// Load tickets for `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket source fails and no fallback applies.
    pub fn load(settings: Settings) -> CliResult<Self> {
        let loaded = settings.load_tickets()?;
        Ok(Self { settings, loaded })
    }
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the tickets as a Gantt chart
    Gantt(GanttCommand),
    /// Show the parent/child ticket hierarchy
    Tree(TreeCommand),
    /// Build the Discord due-date reminder
    Notify(NotifyCommand),
}

impl Command {
    /// Execute the command against loaded tickets.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the command execution fails.
    pub fn execute(&self, ctx: &Context) -> CliResult<String> {
        match self {
            Command::Gantt(cmd) => cmd.execute(ctx),
            Command::Tree(cmd) => cmd.execute(ctx),
            Command::Notify(cmd) => cmd.execute(ctx),
        }
    }
}
