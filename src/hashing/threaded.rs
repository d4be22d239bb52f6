//! Threaded hasher (§4.7): a worker pool hashes file content off the main
//! thread while a single collector thread owns the database connection and
//! serializes every insert, so the SQL handle is never touched from more
//! than one thread at a time (§5).
//!
//! The two channels are the hand-rolled bounded [`crate::channel::Channel`]
//! (§ C1 / §9 design note), not `crossbeam-channel`: a `Sender`/`Receiver`
//! pair cloned across N workers plus a collector would alias the same
//! internal condvar pair under crossbeam's implementation in exactly the
//! pattern the spec calls out as unsafe to rely on here.

use super::sha::hash_file;
use super::HashRunStats;
use crate::channel::Channel;
use crate::node::Node;
use crate::predicate::needs_hash;
use crate::progress::{Meter, ProgressState};
use crate::store::INSERT_HASH_SQL;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// `(index, size, path)`. `None` is the worker-shutdown sentinel.
type WorkItem = (u64, u64, PathBuf);
/// `(index, size, digest)`. `None` is a single worker's finished-sentinel,
/// forwarded once per worker so the collector can count down to zero.
type FinishItem = (u64, u64, super::sha::Sha1Digest);

/// Run the threaded hasher. Takes ownership of `conn` and hands it to the
/// collector thread for the lifetime of the run; the transaction is opened
/// and committed entirely on that thread, since a `rusqlite::Transaction`
/// cannot be shared across threads and the spec requires exactly one thread
/// touch the SQL handle at a time anyway. Returns the connection back.
pub fn run<I>(
    tracked: I,
    conn: Connection,
    num_workers: usize,
    mut progress: ProgressState,
    meter: &dyn Meter,
) -> Result<(Connection, HashRunStats)>
where
    I: Iterator<Item = Result<(Node, PathBuf)>>,
{
    let num_workers = num_workers.max(1);
    let cap = 2 * num_workers;
    let work: Arc<Channel<Option<WorkItem>>> = Arc::new(Channel::new(cap));
    let finish: Arc<Channel<Option<FinishItem>>> = Arc::new(Channel::new(cap));
    let errors = Arc::new(AtomicU64::new(0));

    thread::scope(|scope| -> Result<(Connection, HashRunStats)> {
        let worker_handles: Vec<_> = (0..num_workers)
            .map(|_| {
                let work = Arc::clone(&work);
                let finish = Arc::clone(&finish);
                let errors = Arc::clone(&errors);
                scope.spawn(move || loop {
                    match work.pop() {
                        None => {
                            finish.push(None);
                            return;
                        }
                        Some((index, size, path)) => match hash_file(&path, size) {
                            Ok(digest) => finish.push(Some((index, size, digest))),
                            Err(e) => {
                                log::warn!("Warning: error hashing {}: {e}", path.display());
                                errors.fetch_add(1, Ordering::Relaxed);
                            }
                        },
                    }
                })
            })
            .collect();

        let finish_collector = Arc::clone(&finish);
        let collector = scope.spawn(move || -> Result<(Connection, ProgressState, u64)> {
            let mut conn = conn;
            let tx = conn
                .transaction()
                .context("open hash-update transaction")?;
            let mut hashed = 0u64;
            {
                let mut stmt = tx
                    .prepare(INSERT_HASH_SQL)
                    .context("prepare hash insert statement")?;
                let mut remaining = num_workers;
                while remaining > 0 {
                    match finish_collector.pop() {
                        None => remaining -= 1,
                        Some((index, size, digest)) => {
                            stmt.execute(rusqlite::params![index as i64, digest.as_slice()])
                                .context("insert hash row")?;
                            progress.files += 1;
                            progress.octets += size;
                            meter.redraw(&progress);
                            hashed += 1;
                        }
                    }
                }
            }
            tx.commit().context("commit hash-update transaction")?;
            Ok((conn, progress, hashed))
        });

        let mut index: u64 = 0;
        for item in tracked {
            let (node, path) = item?;
            if needs_hash(&node) {
                work.push(Some((index, node.size(), path)));
            }
            index += 1;
        }
        for _ in 0..num_workers {
            work.push(None);
        }

        for handle in worker_handles {
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("hashing worker thread panicked"))?;
        }
        let (conn, _progress, hashed) = collector
            .join()
            .map_err(|_| anyhow::anyhow!("collector thread panicked"))??;

        Ok((
            conn,
            HashRunStats {
                hashed,
                errors: errors.load(Ordering::Relaxed),
            },
        ))
    })
}
