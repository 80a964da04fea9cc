//! vaultscan CLI entry point.

mod cli;

use clap::Parser;
use cli::{
    blocks, headings, links, lint, list, properties, search, tags, tasks, Cli, Commands, Output,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vaultscan::error::exit_code;
use vaultscan::{Config, Result, Vault};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::from(exit_code::SUCCESS as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// `VAULTSCAN_LOG`, then `RUST_LOG`, then the `-v`/`-q` level.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_env("VAULTSCAN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let task_config = config.tasks.task_config();
    let output = Output::new(cli.output_format());

    // format-task needs no vault
    if let Commands::FormatTask(args) = &cli.command {
        return tasks::format(args, &task_config, &output);
    }

    let vault = Vault::new(config.resolve_vault_path(cli.vault.as_deref())?)?;
    tracing::debug!(root = %vault.root.display(), "opened vault");

    match &cli.command {
        Commands::List(args) => list::run(&vault, args, &output),
        Commands::Links(args) => links::run(&vault, args, &output),
        Commands::Tags(args) => tags::run(&vault, args, &output),
        Commands::Headings(args) => headings::run(&vault, args, &output),
        Commands::Blocks(args) => blocks::run(&vault, args, &output),
        Commands::Properties(args) => properties::run(&vault, args, &output),
        Commands::Tasks(args) => tasks::get_tasks(&vault, args, &task_config, &output),
        Commands::Search(args) => search::run(&vault, args, &output),
        Commands::Lint(args) => lint::run(&vault, args, &output),
        Commands::FormatTask(args) => tasks::format(args, &task_config, &output),
    }
}
