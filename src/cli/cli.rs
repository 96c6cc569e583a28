use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Rebuilds a directory tree from a terminal session log and reports directory sizes
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Terminal log with `$ cd` / `$ ls` commands and their output
    pub input: PathBuf,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// YAML file with `total_capacity`, `required_free` and `size_ceiling`
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Total disk capacity, overrides the config file
    #[clap(long)]
    pub capacity: Option<u64>,

    /// Free space required on the disk, overrides the config file
    #[clap(long)]
    pub required: Option<u64>,

    /// Largest directory size counted in part one, overrides the config file
    #[clap(long)]
    pub ceiling: Option<u64>,

    /// Print the rebuilt tree before the answers
    #[clap(long)]
    pub show_tree: bool,
}
