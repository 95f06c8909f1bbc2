//! Tree command for displaying the ticket hierarchy
//!
//! Implements the `trl tree` command.

use clap::Args;
use trellis_core::build_hierarchy;

use crate::commands::Context;
use crate::error::CliResult;
use crate::output::format_tree;

/// Show the parent/child ticket hierarchy
#[derive(Debug, Args)]
pub struct TreeCommand {
    /// Print the hierarchy as JSON
    #[arg(long)]
    pub json: bool,
}

impl TreeCommand {
    /// Execute the tree command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Encode` if JSON encoding fails.
    pub fn execute(&self, ctx: &Context) -> CliResult<String> {
        let roots = build_hierarchy(&ctx.loaded.tickets);

        if self.json {
            return Ok(serde_json::to_string_pretty(&roots)?);
        }
        Ok(format_tree(&roots))
    }
}
