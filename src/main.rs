//! suretree CLI: hash a captured tree, or migrate hashes across generations.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use suretree::cli::{handle, Cli};

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    handle(cli.command)?;

    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
