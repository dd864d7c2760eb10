//! Project stage display

use cascade_core::Config;
use serde_json::json;

use crate::error::Result;

/// Run the stage command
pub fn run_stage(config: &Config, json: bool) -> Result<()> {
    let stage = config.project_stage();
    if json {
        let output = json!({
            "application": config.application(),
            "project_stage": stage.name(),
            "test_stage": stage.is_test_stage(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{stage}");
    }
    Ok(())
}
