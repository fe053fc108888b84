use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;

const AGENT_COMMANDS_HELP: &str = "\
Agent commands (after init):
  /k <question>              Query the knowledge base with verified answers
  /knowledge.refresh         Refresh snapshot and index
  /knowledge.check           Check all guides for freshness
  /knowledge.create <topic>  Create a new knowledge guide";

#[derive(Parser)]
#[command(
    name = "knowledge-system",
    version,
    about = "Verified knowledge guides for AI coding agents",
    after_help = AGENT_COMMANDS_HELP
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: output::OutputFormat,

    #[command(subcommand)]
    command: Option<commands::Commands>,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let project_root =
        std::env::current_dir().context("Cannot determine the current directory")?;
    tracing::debug!(root = %project_root.display(), "Resolved project root");

    match command {
        commands::Commands::Init(args) => commands::init::run(&project_root, args),
        commands::Commands::Update => commands::update::run(&project_root),
        commands::Commands::Refresh => commands::refresh::run(&project_root, cli.format),
        commands::Commands::Check => commands::check::run(&project_root, cli.format),
    }
}
