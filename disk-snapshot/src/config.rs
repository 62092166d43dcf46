//! Configuration management for disk-snapshot.
//!
//! Built-in defaults, then an optional TOML file, then `DISKSNAP_`
//! environment variables (`DISKSNAP_SNAPSHOT__MAX_DEPTH=2`). Command-line
//! flags are applied on top by the caller.

use crate::fs::WalkOptions;
use crate::utils::errors::Result;
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "DISKSNAP";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub snapshot: SnapshotConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Skip dot-files and everything beneath hidden directories
    pub ignore_hidden: bool,

    /// Leave symlinks out of the snapshot
    pub ignore_symlinks: bool,

    /// Maximum recursion depth, negative for unlimited
    pub max_depth: i64,

    /// Directory for auto-named snapshots (default: current directory)
    pub output_dir: Option<PathBuf>,

    /// Print the listing after generating
    pub show: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Human-readable sizes and times
    pub human: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        SnapshotConfig {
            ignore_hidden: false,
            ignore_symlinks: false,
            max_depth: -1,
            output_dir: None,
            show: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "warn".to_string(),
        }
    }
}

impl SnapshotConfig {
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            ignore_hidden: self.ignore_hidden,
            ignore_symlinks: self.ignore_symlinks,
            ..WalkOptions::default()
        }
        .with_depth_limit(self.max_depth)
    }
}

impl Config {
    /// Load configuration, reading `path` if given.
    ///
    /// A missing or malformed file is an error; an absent path means
    /// defaults plus environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Same as [`Config::load`] but reads variables from `env` instead of
    /// the process environment when given.
    fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = builder.build()?.try_deserialize::<Config>()?;
        Ok(config)
    }
}
