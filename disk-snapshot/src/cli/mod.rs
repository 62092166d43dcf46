//! Command-line interface definition.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Take, view and compare directory snapshots", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Use human friendly units for output
    #[arg(short = 'H', long, global = true)]
    pub human: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate snapshot
    #[command(visible_aliases = ["g", "w"])]
    Generate(GenerateArgs),

    /// View snapshot file content
    #[command(visible_aliases = ["v", "r"])]
    View(ViewArgs),

    /// Compare two snapshot files
    #[command(visible_alias = "c")]
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Source directory path
    #[arg(value_name = "SRC_PATH")]
    pub src_path: PathBuf,

    /// Snapshot output file name
    #[arg(long, value_name = "NAME")]
    pub output: Option<String>,

    /// Snapshot output directory
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Show snapshot content after generation
    #[arg(long, overrides_with = "no_show")]
    pub show: bool,

    /// Do not show snapshot content after generation
    #[arg(long, overrides_with = "show")]
    pub no_show: bool,

    /// Ignore hidden files and directories
    #[arg(long)]
    pub ignore_hidden: bool,

    /// Ignore symlinks
    #[arg(long)]
    pub ignore_symlinks: bool,

    /// Maximum recursion depth (negative for unlimited)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub max_recursion_depth: Option<i64>,
}

impl GenerateArgs {
    /// Explicit `--show`/`--no-show` choice, last one wins
    pub fn show_override(&self) -> Option<bool> {
        match (self.show, self.no_show) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Snapshot file to view
    #[arg(value_name = "SNAPSHOT_FILE")]
    pub snapshot_file: PathBuf,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Baseline snapshot
    #[arg(value_name = "SNAP_A")]
    pub snap_a: PathBuf,

    /// Snapshot compared against the baseline
    #[arg(value_name = "SNAP_B")]
    pub snap_b: PathBuf,
}
