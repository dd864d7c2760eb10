//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Cascade Config - Resolve layered configuration
#[derive(Parser, Debug)]
#[command(name = "cascade")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory searched for cascade.properties and --file names (repeatable)
    #[arg(short, long = "dir", global = true, value_name = "PATH")]
    pub dirs: Vec<PathBuf>,

    /// Override a key (repeatable)
    #[arg(short = 'D', long = "define", global = true, value_name = "KEY=VALUE")]
    pub defines: Vec<String>,

    /// Additional .properties, TOML, JSON or YAML file (repeatable)
    #[arg(short, long = "file", global = true, value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Directory holding one file per key
    #[arg(long, global = true, value_name = "PATH")]
    pub config_dir: Option<PathBuf>,

    /// Project stage, skipping detection
    #[arg(short, long, global = true, env = "CASCADE_STAGE")]
    pub stage: Option<String>,

    /// Application name
    #[arg(short, long, global = true)]
    pub app: Option<String>,

    /// Do not read process environment variables
    #[arg(long, global = true)]
    pub no_env: bool,

    /// Do not read ~/.cascade/cascade.properties
    #[arg(long, global = true)]
    pub no_home: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List config sources in lookup order
    Sources {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List all entries with the source they come from
    Entries {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Resolve a single key
    ///
    /// Examples:
    ///   cascade get db.url                      # stage aware lookup
    ///   cascade get dataSource --param dbvendor # dataSource.<dbvendor>
    ///   cascade get hosts --list                # one item per line
    Get(GetArgs),

    /// Show the active project stage
    Stage {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Arguments of `cascade get`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GetArgs {
    /// Key to resolve
    pub key: String,

    /// Property whose value is appended to the key
    #[arg(short, long)]
    pub param: Option<String>,

    /// Ignore the project stage suffix
    #[arg(long)]
    pub no_stage: bool,

    /// Only consult the longest key
    #[arg(long)]
    pub strict: bool,

    /// Split the value into a comma separated list
    #[arg(short, long)]
    pub list: bool,

    /// Value used when the key is missing or empty
    #[arg(long)]
    pub default: Option<String>,

    /// Evaluate ${var} references
    #[arg(short, long)]
    pub eval: bool,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,
}
