//! Command-line surface: two subcommands over `clap` derive, following the
//! teacher's `arg_parser.rs` split (flags and defaults only — no behavior).
//! §1 marks the CLI itself out of scope for fidelity; this is the minimal
//! surface needed to exercise C8 and C9 from outside a test.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Content-addressed backup/snapshot engine: hash a captured tree, or
/// migrate hashes from one generation to the next.
#[derive(Clone, Parser)]
#[command(name = "suretree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Hash every file in TREE that doesn't already carry a sha1, recording
    /// digests into the hash database (C8).
    Hash {
        /// Weave line-stream file holding the captured tree (§6).
        #[arg(value_name = "TREE")]
        tree: PathBuf,

        /// Hash database path. Default: `<TREE>.suretree.db`.
        #[arg(long, short)]
        db: Option<PathBuf>,

        /// Worker thread count for the threaded hasher. Default: available
        /// parallelism, capped by the open-fd budget.
        #[arg(long, short)]
        threads: Option<usize>,

        /// Use the single-threaded direct hasher instead of the worker pool.
        #[arg(long)]
        direct: bool,

        /// TREE is gzip-compressed.
        #[arg(long)]
        compressed: bool,

        /// Root path recorded against the tree's sentinel root entry.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Verbose (debug-level) logging.
        #[arg(long, short)]
        verbose: bool,
    },

    /// Co-walk OLDER and NEWER and emit NEWER's shape with `sha1` forwarded
    /// from OLDER wherever the migration predicate holds (C9).
    Migrate {
        /// Previous generation's tree (weave line-stream file).
        older: PathBuf,

        /// Current generation's tree (weave line-stream file).
        newer: PathBuf,

        /// Where to write the migrated tree.
        output: PathBuf,

        /// OLDER and NEWER are gzip-compressed.
        #[arg(long)]
        compressed: bool,

        /// Write OUTPUT gzip-compressed (independent of the inputs).
        #[arg(long)]
        compress_output: bool,

        /// Verbose (debug-level) logging.
        #[arg(long, short)]
        verbose: bool,
    },
}
