//! Command-line flags and the optional TOML configuration file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use organ_growth_system_growth::{Emission, GrowthPolicy, GrowthTarget};
use serde::Deserialize;

/// Organism growth agent speaking the referee protocol on stdin/stdout.
#[derive(Debug, Parser)]
#[command(name = "organ-growth", version, about)]
pub(crate) struct Cli {
    /// TOML file providing defaults for every other flag.
    #[arg(long, env = "ORGAN_GROWTH_CONFIG", value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
    /// Which organisms receive a decision each turn.
    #[arg(long, value_enum)]
    pub(crate) emission: Option<EmissionArg>,
    /// Which cell a successful search grows into.
    #[arg(long, value_enum)]
    pub(crate) growth_target: Option<GrowthTargetArg>,
    /// Dump the board to stderr every turn.
    #[arg(long)]
    pub(crate) dump_board: bool,
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, value_name = "FILTER")]
    pub(crate) log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum EmissionArg {
    PerOrganism,
    Single,
}

impl From<EmissionArg> for Emission {
    fn from(value: EmissionArg) -> Self {
        match value {
            EmissionArg::PerOrganism => Self::PerOrganism,
            EmissionArg::Single => Self::Single,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum GrowthTargetArg {
    Resource,
    NextStep,
}

impl From<GrowthTargetArg> for GrowthTarget {
    fn from(value: GrowthTargetArg) -> Self {
        match value {
            GrowthTargetArg::Resource => Self::Resource,
            GrowthTargetArg::NextStep => Self::NextStep,
        }
    }
}

/// Settings resolved from the config file and the command line.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct AgentConfig {
    pub(crate) growth: GrowthPolicy,
    pub(crate) dump_board: bool,
    pub(crate) log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            growth: GrowthPolicy::default(),
            dump_board: false,
            log_level: String::from("info"),
        }
    }
}

impl AgentConfig {
    /// Loads the file at `path`, or the defaults when no file was given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse agent config toml contents")
    }

    /// Applies flags given on the command line over the loaded values.
    #[must_use]
    pub(crate) fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(emission) = cli.emission {
            self.growth.emission = emission.into();
        }
        if let Some(target) = cli.growth_target {
            self.growth.growth_target = target.into();
        }
        if cli.dump_board {
            self.dump_board = true;
        }
        if let Some(level) = &cli.log_level {
            self.log_level.clone_from(level);
        }
        self
    }
}
