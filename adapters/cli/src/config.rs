//! Optional `planner.toml` configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use dental_planner_core::Rgb;
use serde::Deserialize;

/// File looked up in the working directory when no path is given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "planner.toml";

/// Settings read from `planner.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlannerConfig {
    /// Where workspaces are stored.
    pub(crate) store: StoreConfig,
    /// Colors applied to designs created from scratch.
    pub(crate) colors: ColorConfig,
}

/// `[store]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StoreConfig {
    /// Directory holding one JSON document per owner.
    pub(crate) directory: PathBuf,
    /// Owner whose workspace is edited.
    pub(crate) owner: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("designs"),
            owner: "default".to_owned(),
        }
    }
}

/// `[colors]` table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ColorConfig {
    /// Background color.
    pub(crate) world: Option<Rgb>,
    /// Floor color.
    pub(crate) floor: Option<Rgb>,
}

impl PlannerConfig {
    /// Reads the configuration.
    ///
    /// An explicit path must exist. Without one, `planner.toml` in the working
    /// directory is used when present and defaults apply otherwise.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse configuration at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid planner configuration")
    }
}
