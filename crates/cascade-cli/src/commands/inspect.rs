//! Source and entry listings

use cascade_core::{Config, ConfigInfo};
use colored::Colorize;

use crate::error::Result;

/// Run the sources command
pub fn run_sources(config: &Config, json: bool) -> Result<()> {
    let info = ConfigInfo::new(config);
    let sources = info.sources();

    if json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Config sources for".bold(),
        config.application().cyan().bold()
    );
    println!();
    for source in &sources {
        println!("  {:>6}  {}", source.ordinal.to_string().green(), source.name);
    }
    println!();
    println!("{} {} sources, highest ordinal first.", "Total:".dimmed(), sources.len());

    Ok(())
}

/// Run the entries command
///
/// Values pass through the log filters, so secrets stay masked.
pub fn run_entries(config: &Config, json: bool) -> Result<()> {
    let info = ConfigInfo::new(config);

    if json {
        println!("{}", serde_json::to_string_pretty(&info.report())?);
        return Ok(());
    }

    let entries = info.config_entries();
    if entries.is_empty() {
        println!("{}", "No configuration entries found.".dimmed());
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Configuration of".bold(),
        config.application().cyan().bold(),
        config.project_stage().to_string().yellow()
    );
    println!();
    for entry in &entries {
        println!(
            "  {} = {}  {}",
            entry.key.green(),
            entry.value,
            format!("[{}]", entry.from_config_source).dimmed()
        );
    }

    Ok(())
}
