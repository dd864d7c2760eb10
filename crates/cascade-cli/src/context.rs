//! Configuration assembly from global CLI flags

use std::path::{Path, PathBuf};

use cascade_core::{
    Config, ConfigBuilder, DefaultConfigSourceProvider, ProjectStage, PropertyFileConfig,
    SecretMaskingFilter, SourceOptions,
};

use crate::cli::Cli;
use crate::error::Result;

/// Translate the global flags into provider options.
///
/// Relative paths are resolved against `cwd`. Without `--dir` the working
/// directory is the only search root.
pub fn source_options(cli: &Cli, cwd: &Path) -> SourceOptions {
    let absolute = |path: &PathBuf| {
        if path.is_absolute() {
            path.clone()
        } else {
            cwd.join(path)
        }
    };

    let search_roots = if cli.dirs.is_empty() {
        vec![cwd.to_path_buf()]
    } else {
        cli.dirs.iter().map(absolute).collect()
    };

    SourceOptions {
        search_roots,
        overrides: cli.defines.clone(),
        config_dir: cli.config_dir.as_ref().map(absolute),
        property_files: cli
            .files
            .iter()
            .map(|file| PropertyFileConfig::required(absolute(file).to_string_lossy()))
            .collect(),
        include_environment: !cli.no_env,
        home_dir: None,
        include_user_home: !cli.no_home,
    }
}

/// Stage given on the command line; unknown names become custom stages.
pub fn requested_stage(cli: &Cli) -> Option<ProjectStage> {
    let name = cli.stage.as_deref()?.trim();
    if name.is_empty() {
        return None;
    }
    Some(ProjectStage::built_in(name).unwrap_or_else(|| ProjectStage::Custom(name.to_string())))
}

/// Build the configuration every command works on.
///
/// Credentials are masked in listings by a [`SecretMaskingFilter`].
pub fn load_config(cli: &Cli) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let options = source_options(cli, &cwd);
    tracing::debug!(?options, "Assembling config sources");

    let mut builder: ConfigBuilder = Config::builder()
        .with_provider(DefaultConfigSourceProvider::new(options))
        .with_filter(SecretMaskingFilter::new());
    if let Some(app) = &cli.app {
        builder = builder.with_application(app);
    }
    if let Some(stage) = requested_stage(cli) {
        builder = builder.with_project_stage(stage);
    }

    Ok(builder.build()?)
}
