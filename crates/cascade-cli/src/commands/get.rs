//! Single key resolution

use cascade_core::{Config, TypedResolver};
use serde_json::json;

use crate::cli::GetArgs;
use crate::error::{CliError, Result};

/// Configure a resolver from the command flags.
fn configure(config: &Config, args: &GetArgs) -> TypedResolver<String> {
    let resolver = config
        .resolve(&args.key)
        .with_current_project_stage(!args.no_stage)
        .strictly(args.strict)
        .evaluate_variables(args.eval);
    match &args.param {
        Some(property) => resolver.parameterized_by(property),
        None => resolver,
    }
}

/// Run the get command
///
/// Plain output is the bare value (one line per item with `--list`) so it
/// can be captured by scripts. A missing scalar value is an error.
pub fn run_get(config: &Config, args: &GetArgs) -> Result<()> {
    if args.list {
        let mut resolver = configure(config, args).as_list();
        if let Some(default) = &args.default {
            resolver = resolver.with_string_default(default)?;
        }
        let items = resolver.get_value()?.unwrap_or_default();
        if args.json {
            let output = json!({
                "key": args.key,
                "resolved_key": resolver.resolved_key(),
                "value": items,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            for item in &items {
                println!("{item}");
            }
        }
        return Ok(());
    }

    let mut resolver = configure(config, args);
    if let Some(default) = &args.default {
        resolver = resolver.with_string_default(default)?;
    }
    let value = resolver.get_value()?;
    tracing::debug!(key = %args.key, resolved_key = ?resolver.resolved_key(), "Resolved key");

    if args.json {
        let output = json!({
            "key": args.key,
            "resolved_key": resolver.resolved_key(),
            "value": value,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match value {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => Err(CliError::user(format!("No value configured for '{}'", args.key))),
    }
}
