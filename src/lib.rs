//! suretree: content-addressed backup/snapshot engine.
//!
//! Walks a previously captured tree of filesystem metadata (a "sure tree"),
//! augments each regular file with a SHA-1 of its current contents, persists
//! those hashes in a side SQLite database, and migrates hashes across
//! generations so unchanged files keep their previously computed hash
//! without being rehashed.
//!
//! Two entry points carry the real work:
//!
//! - [`driver::update_hashes`] runs the hashing pipeline (prescan, one
//!   transaction, worker-pool-or-direct dispatch, commit) over a
//!   [`stream::NodeSource`], producing rows in the `hashes` table.
//! - [`migrator::cp_hashes`] (or the lower-level [`migrator::Migrator`]
//!   iterator) co-walks an older and a newer tree and forwards `sha1`
//!   attributes across generations for files whose inode and ctime didn't
//!   change.

pub mod channel;
pub mod cli;
pub mod driver;
pub mod format;
pub mod hashing;
pub mod migrator;
pub mod node;
pub mod path_tracker;
pub mod predicate;
pub mod progress;
pub mod store;
pub mod stream;
pub mod utils;
pub mod weave;

pub use driver::{update_hashes, HashOptions};
pub use hashing::HashRunStats;
pub use migrator::{cp_hashes, Migrator};
pub use node::{Atts, Node, ROOT_NAME};
pub use predicate::needs_hash;
pub use stream::{Memoized, NodeSource, WeaveSource};
