//! The two hash sinks (§4.6, §4.7): a direct single-threaded fallback and a
//! worker-pool-plus-collector pipeline, both writing into the same
//! `hashes` table inside one transaction.
//!
//! Both take a [`crate::path_tracker::PathTracker`]-produced iterator and
//! select nodes to hash via [`crate::predicate::needs_hash`]; `index` is the
//! zero-based position in that iterator over *all* events (Enter/Leave/Sep
//! included), matching the upstream "index has gaps" behavior the spec
//! preserves verbatim (§9 Open Question).

pub mod direct;
pub mod sha;
pub mod threaded;

/// Outcome of one hash-update run.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashRunStats {
    pub hashed: u64,
    pub errors: u64,
}
