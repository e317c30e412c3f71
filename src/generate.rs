use anyhow::{ensure, Context, Result};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::Config;
use crate::{distribute, report, tree};

const DEFAULT_COUNT: usize = 500;
const DEFAULT_DUPE_PERCENT: u32 = 30;
const DEFAULT_TOP_DIRS: u32 = 10;
const DEFAULT_FANOUT: u32 = 10;
const DEFAULT_MAX_DEPTH: u32 = 2;

#[derive(Debug)]
pub struct GenOptions {
    pub root: PathBuf,
    pub count: usize,
    pub dupe_percent: u32,
    pub top_dirs: u32,
    pub fanout: u32,
    pub max_depth: u32,
    pub seed: Option<u64>,
}

impl GenOptions {
    /// CLI values take priority; the config file fills the gaps, then the
    /// built-in defaults.
    pub fn from_args_and_config(args: &Cli, config: &Config) -> Result<Self> {
        let opts = Self {
            root: args.root.clone(),
            count: args.count.or(config.count).unwrap_or(DEFAULT_COUNT),
            dupe_percent: args
                .dupe_percent
                .or(config.dupe_percent)
                .unwrap_or(DEFAULT_DUPE_PERCENT),
            top_dirs: args.top_dirs.or(config.top_dirs).unwrap_or(DEFAULT_TOP_DIRS),
            fanout: args.fanout.or(config.fanout).unwrap_or(DEFAULT_FANOUT),
            max_depth: args.max_depth.or(config.max_depth).unwrap_or(DEFAULT_MAX_DEPTH),
            seed: args.seed.or(config.seed),
        };
        opts.validate()?;
        Ok(opts)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.dupe_percent <= 100,
            "duplicate percentage must be 0-100, got {}",
            self.dupe_percent
        );
        ensure!(self.max_depth >= 1, "directory depth must be at least 1");
        ensure!(
            self.top_dirs >= 1 || self.count == 0,
            "cannot place {} files without any top-level directories",
            self.count
        );
        Ok(())
    }
}

pub fn run(args: &Cli, config: &Config) -> Result<()> {
    let opts = GenOptions::from_args_and_config(args, config)?;
    let mut rng = match opts.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    reset_root(&opts.root)?;
    // Canonicalize after the reset so every generated path is absolute.
    let root = opts
        .root
        .canonicalize()
        .with_context(|| format!("resolving {}", opts.root.display()))?;

    let dirs = tree::build(&root, opts.top_dirs, opts.fanout, opts.max_depth, &mut rng)?;
    let dist = distribute::distribute(opts.count, opts.dupe_percent, &dirs, &mut rng)?;
    let report = report::summarize(&dist, dirs.len());

    let log_path = root.join("log.txt");
    fs::write(&log_path, report.render())
        .with_context(|| format!("writing {}", log_path.display()))?;

    println!("Generation complete.");
    println!("{}", report.counts_block());
    println!("Log file written to: {}", log_path.display());
    Ok(())
}

/// Remove-then-recreate the output root. This is the only destructive step;
/// any failure here aborts the run before file writing begins.
fn reset_root(root: &Path) -> Result<()> {
    if root.exists() {
        fs::remove_dir_all(root)
            .with_context(|| format!("removing previous root {}", root.display()))?;
    }
    fs::create_dir_all(root).with_context(|| format!("creating root {}", root.display()))?;
    Ok(())
}
