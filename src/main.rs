mod cli;
mod config;
mod distribute;
mod generate;
mod report;
mod tree;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    generate::run(&cli, &config)
}
