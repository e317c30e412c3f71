use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dupegen",
    about = "Generate a directory tree seeded with duplicate files"
)]
pub struct Cli {
    /// Root path for the generated tree (wiped and recreated on every run)
    pub root: PathBuf,

    /// Total number of files to generate [default: 500]
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Percentage of files emitted as duplicate copies [default: 30]
    #[arg(short = 'p', long, value_name = "PERCENT")]
    pub dupe_percent: Option<u32>,

    /// Number of top-level directories under the root [default: 10]
    #[arg(long)]
    pub top_dirs: Option<u32>,

    /// Maximum subdirectories created under a directory at each level [default: 10]
    #[arg(long)]
    pub fanout: Option<u32>,

    /// Directory nesting depth, counting the top level [default: 2]
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for the random generator; omit for a fresh tree every run
    #[arg(long)]
    pub seed: Option<u64>,
}
