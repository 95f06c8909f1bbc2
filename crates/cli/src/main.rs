use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use trellis_cli::commands::{Command, Context};
use trellis_cli::config::{Settings, parse_date_flag};
use trellis_cli::error::CliResult;

/// Trellis - Gantt timelines and due-date reminders for issue tracker tickets
#[derive(Parser)]
#[command(name = "trl")]
#[command(version = "0.1.0")]
#[command(about = "Gantt timelines and due-date reminders for issue tracker tickets", long_about = None)]
struct Args {
    /// Ticket export to read (can also be set via TRELLIS_TICKETS env var)
    #[arg(long, global = true)]
    tickets: Option<PathBuf>,

    /// Use generated sample tickets (can also be set via TRELLIS_MOCK env var)
    #[arg(long, global = true)]
    mock: bool,

    /// Fall back to sample tickets when the ticket file cannot be loaded
    #[arg(long, global = true)]
    mock_on_error: bool,

    /// First day of the master view (default 2025-04-01, env TRELLIS_PROJECT_START)
    #[arg(long, global = true, value_parser = parse_date_flag)]
    project_start: Option<NaiveDate>,

    /// Last day of the master view (default 2026-03-31, env TRELLIS_PROJECT_END)
    #[arg(long, global = true, value_parser = parse_date_flag)]
    project_end: Option<NaiveDate>,

    /// Reference day as YYYY-MM-DD (defaults to the local date)
    #[arg(long, global = true, value_parser = parse_date_flag)]
    today: Option<NaiveDate>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

/// Initialize logging based on the RUST_LOG environment variable
///
/// Examples:
/// - `RUST_LOG=trace` - show all trace logs
/// - `RUST_LOG=debug` - show debug and above
/// - `RUST_LOG=trellis_core=debug` - debug logs from the core library only
///
/// Logs go to stderr so command output stays pipeable.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

fn main() {
    init_logging();

    if let Err(e) = run_app() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

/// Main application logic - separated for testability
fn run_app() -> CliResult<()> {
    let args = Args::parse();
    let output = run_with_args(&args)?;
    println!("{}", output);
    Ok(())
}

/// Run the application with the given arguments
fn run_with_args(args: &Args) -> CliResult<String> {
    let Some(cmd) = &args.command else {
        return Ok(
            "Welcome to Trellis!\nUse 'trl --help' for usage information.".to_string(),
        );
    };

    // Resolve settings using priority: CLI arg > env var > default
    let settings = Settings::resolve(
        args.tickets.clone(),
        args.mock,
        args.mock_on_error,
        args.project_start,
        args.project_end,
        args.today,
    )?;

    let ctx = Context::load(settings)?;
    cmd.execute(&ctx)
}
