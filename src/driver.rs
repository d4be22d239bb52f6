//! Hash-update driver (§4.8): the entry point that prescans a tree for
//! progress totals, opens one transaction, and dispatches to whichever hash
//! sink (direct or threaded) the caller asked for.

use crate::hashing::{direct, threaded, HashRunStats};
use crate::path_tracker::PathTracker;
use crate::progress::{Meter, ProgressState};
use crate::stream::NodeSource;
use crate::utils::config::WorkerThreadLimits;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// How to run the hash-update pipeline.
#[derive(Clone, Debug)]
pub struct HashOptions {
    /// Force the direct (single-threaded) hasher instead of the pipeline.
    pub direct: bool,
    /// Worker count for the threaded hasher. `None` picks
    /// [`WorkerThreadLimits::default_workers`]. Ignored when `direct` is set.
    pub workers: Option<usize>,
}

impl Default for HashOptions {
    fn default() -> Self {
        HashOptions {
            direct: false,
            workers: None,
        }
    }
}

/// Prescan `source` for progress totals, then hash every node that needs it
/// (§4.4) and record the digests into `conn`, returning the connection back
/// (the threaded sink takes ownership of it for the run) along with
/// run statistics.
///
/// `root` is the absolute path the tree was captured under; file paths are
/// reconstructed relative to it via [`PathTracker`].
pub fn update_hashes(
    source: &dyn NodeSource,
    conn: Connection,
    root: &Path,
    opts: &HashOptions,
    meter: &dyn Meter,
) -> Result<(Connection, HashRunStats)> {
    let progress = ProgressState::prescan(source).context("prescan tree for progress totals")?;
    let tracked = PathTracker::new(source.iter()?, root);

    if opts.direct {
        let mut conn = conn;
        let tx = conn
            .transaction()
            .context("open hash-update transaction")?;
        let stats = direct::run(tracked, &tx, progress, meter)?;
        tx.commit().context("commit hash-update transaction")?;
        Ok((conn, stats))
    } else {
        let workers = opts.workers.unwrap_or_else(WorkerThreadLimits::default_workers);
        threaded::run(tracked, conn, workers, progress, meter)
    }
}
