//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::path::{Path, PathBuf};

// ---- Package paths ----

/// Default sidecar config file name, searched for in the current directory
/// (`.suretree.toml`) the way the teacher derives its db filename from
/// `CARGO_PKG_NAME`.
pub fn default_config_filename() -> String {
    format!(".{}.toml", env!("CARGO_PKG_NAME"))
}

/// Default hash database path for a given tree file: a sibling
/// `<name>.<pkg>.db`, mirroring the teacher's `db_path()` derivation from
/// `PackagePaths::output_filename()`.
pub fn default_db_path(tree_path: &Path) -> PathBuf {
    let pkg = env!("CARGO_PKG_NAME");
    let name = tree_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tree".to_string());
    tree_path.with_file_name(format!("{name}.{pkg}.db"))
}

// ---- Hashing ----

/// Hashing I/O thresholds and buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// File size above which hashing uses memory-mapped I/O (bytes). 16 MiB.
    pub const HASH_MMAP_THRESHOLD: u64 = 16 * 1024 * 1024;
    /// Chunk size for reading files below the mmap threshold (bytes). 256 KiB.
    pub const HASH_READ_CHUNK_SIZE: usize = 256 * 1024;
}

// ---- Worker threads ----

/// Worker-count tuning for the threaded hasher (§4.7, §9 REDESIGN FLAG:
/// default comes from `available_parallelism`, not a hard-coded constant).
pub struct WorkerThreadLimits;

impl WorkerThreadLimits {
    /// Hard floor: always run at least one worker, even on a single-core
    /// host or when FD-limit capping would otherwise round down to zero.
    pub const FLOOR_WORKERS: usize = 1;

    /// Pick the default worker count: `available_parallelism()`, capped by
    /// the process's open-file-descriptor budget (each worker keeps at most
    /// one file open at a time), floored at [`Self::FLOOR_WORKERS`].
    pub fn default_workers() -> usize {
        let cores = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(Self::FLOOR_WORKERS);
        let capped = match super::fd_limit::max_workers_by_fd_limit() {
            Some(limit) => cores.min(limit),
            None => cores,
        };
        capped.max(Self::FLOOR_WORKERS)
    }
}

// ---- Progress ----

/// Progress bar and status-line tuning.
pub struct ProgressConsts;

impl ProgressConsts {
    /// Terminal progress-bar description shown while updating hashes.
    pub const HASH_UPDATE_DESC: &'static str = "hashing";
}

// ---- Weave ----

/// Weave stream tuning (§6).
pub struct WeaveConsts;

impl WeaveConsts {
    /// zlib compression level used for the gzip line-stream backend.
    pub const GZIP_LEVEL: u32 = 3;
}
