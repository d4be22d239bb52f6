//! Direct hasher (§4.6): the single-threaded fallback. Hashes and inserts
//! inline, in stream order, on whatever thread calls it.

use super::sha::hash_file;
use super::HashRunStats;
use crate::node::Node;
use crate::predicate::needs_hash;
use crate::progress::{Meter, ProgressState};
use crate::store::INSERT_HASH_SQL;
use anyhow::{Context, Result};
use rusqlite::Transaction;
use std::path::PathBuf;

/// Run the direct hasher over a path-tracked node stream, inserting rows
/// through `tx`. `index` counts every event in `tracked` (not just the
/// files that get hashed), matching the upstream index-has-gaps behavior.
pub fn run<I>(
    tracked: I,
    tx: &Transaction,
    mut progress: ProgressState,
    meter: &dyn Meter,
) -> Result<HashRunStats>
where
    I: Iterator<Item = Result<(Node, PathBuf)>>,
{
    let mut stmt = tx
        .prepare(INSERT_HASH_SQL)
        .context("prepare hash insert statement")?;
    let mut stats = HashRunStats::default();
    let mut index: u64 = 0;

    for item in tracked {
        let (node, path) = item?;
        if needs_hash(&node) {
            match hash_file(&path, node.size()) {
                Ok(digest) => {
                    stmt.execute(rusqlite::params![index as i64, digest.as_slice()])
                        .context("insert hash row")?;
                    progress.update(&node);
                    meter.redraw(&progress);
                    stats.hashed += 1;
                }
                Err(e) => {
                    log::warn!("Warning: error hashing {}: {e}", path.display());
                    stats.errors += 1;
                }
            }
        }
        index += 1;
    }

    Ok(stats)
}
