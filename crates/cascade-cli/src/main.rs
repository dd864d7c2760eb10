//! Cascade Config CLI
//!
//! Inspect configuration sources and resolve keys from the shell.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("{} tracing subscriber already set", "warning:".yellow().bold());
        }
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command.clone() {
        Some(cmd) => execute_command(&cli, cmd),
        None => {
            println!("{} Cascade Config CLI", "cascade".green().bold());
            println!();
            println!("Run {} for available commands.", "cascade --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cli: &Cli, cmd: Commands) -> Result<()> {
    let config = context::load_config(cli)?;
    match cmd {
        Commands::Sources { json } => commands::run_sources(&config, json),
        Commands::Entries { json } => commands::run_entries(&config, json),
        Commands::Get(args) => commands::run_get(&config, &args),
        Commands::Stage { json } => commands::run_stage(&config, json),
    }
}
