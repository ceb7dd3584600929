//! Command-line arguments for the `scriptunit` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{HarnessConfig, DEFAULT_CONFIG_FILE};
use crate::errors::SetupError;

#[derive(Debug, Parser)]
#[command(
    name = "scriptunit",
    version,
    about = "Discover and run test suites written in embedded scripting languages."
)]
pub struct ScriptUnitArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover suites and run every test.
    Run {
        #[command(flatten)]
        discovery: DiscoveryArgs,
        /// How to report results.
        #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
        format: OutputFormat,
    },
    /// Discover suites and print the test tree without running anything.
    List {
        #[command(flatten)]
        discovery: DiscoveryArgs,
    },
    /// List the script engines built into this binary, preferred first.
    Engines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Console,
    Json,
}

/// Where suites come from. Flags override the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct DiscoveryArgs {
    /// Suites to load, in order.
    pub suites: Vec<String>,

    /// Config file (default: ./scriptunit.yaml when present).
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Directory suites are resolved against.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Use this engine instead of automatic selection.
    #[arg(long)]
    pub engine: Option<String>,
}

impl DiscoveryArgs {
    /// The effective configuration: config file, then flags on top.
    pub fn to_config(&self) -> Result<HarnessConfig, SetupError> {
        let default_file = PathBuf::from(DEFAULT_CONFIG_FILE);
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None if default_file.is_file() => HarnessConfig::load(&default_file)?,
            None => HarnessConfig::default(),
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(engine) = &self.engine {
            config.engine = Some(engine.clone());
        }
        if !self.suites.is_empty() {
            config.suites = self.suites.clone();
        }
        Ok(config)
    }
}
