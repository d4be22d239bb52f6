//! Command handlers: wire parsed CLI args to the library entry points,
//! applying sidecar-config defaults the way the teacher's `handlers.rs`
//! layers `.nefaxer.toml` under explicit flags.

use crate::cli::arg_parser::Commands;
use crate::driver::{update_hashes, HashOptions};
use crate::migrator::Migrator;
use crate::progress::{Meter, TerminalMeter};
use crate::store::open_db;
use crate::stream::{write_weave_tree, Memoized, NodeSource, WeaveSource};
use crate::utils::config::{default_db_path, ProgressConsts};
use crate::utils::sidecar::load_defaults;
use anyhow::{Context, Result};

/// Directory a sidecar `.suretree.toml` is searched in: the current
/// directory, same as the teacher's CLI.
fn sidecar_dir() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| ".".into())
}

pub fn handle(command: Commands) -> Result<()> {
    match command {
        Commands::Hash {
            tree,
            db,
            threads,
            direct,
            compressed,
            root,
            verbose,
        } => handle_hash(tree, db, threads, direct, compressed, root, verbose),
        Commands::Migrate {
            older,
            newer,
            output,
            compressed,
            compress_output,
            verbose,
        } => handle_migrate(older, newer, output, compressed, compress_output, verbose),
    }
}

fn handle_hash(
    tree: std::path::PathBuf,
    db: Option<std::path::PathBuf>,
    threads: Option<usize>,
    direct: bool,
    compressed: bool,
    root: std::path::PathBuf,
    verbose: bool,
) -> Result<()> {
    crate::utils::setup_logging(verbose);

    let defaults = load_defaults(&sidecar_dir());
    let db_path = db.or(defaults.db).unwrap_or_else(|| default_db_path(&tree));
    let direct = direct || defaults.direct;
    let opts = HashOptions {
        direct,
        workers: threads.or(defaults.threads),
    };

    log::debug!("hashing {} into {}", tree.display(), db_path.display());

    let source = Memoized::capture(&WeaveSource::new(tree.clone(), compressed))
        .context("read tree into memory for prescan + dispatch passes")?;
    let conn = open_db(&db_path).with_context(|| format!("open {}", db_path.display()))?;

    let meter: Box<dyn Meter> = Box::new(TerminalMeter::new(
        progress_total(&source)?,
        ProgressConsts::HASH_UPDATE_DESC,
    ));

    let (_conn, stats) = update_hashes(&source, conn, &root, &opts, meter.as_ref())
        .context("run hash-update pipeline")?;

    log::info!(
        "hashed {} files ({} per-file errors)",
        stats.hashed,
        stats.errors
    );
    Ok(())
}

fn progress_total(source: &dyn NodeSource) -> Result<u64> {
    Ok(crate::progress::ProgressState::prescan(source)?.total_files)
}

fn handle_migrate(
    older: std::path::PathBuf,
    newer: std::path::PathBuf,
    output: std::path::PathBuf,
    compressed: bool,
    compress_output: bool,
    verbose: bool,
) -> Result<()> {
    crate::utils::setup_logging(verbose);

    log::debug!(
        "migrating hashes from {} onto {} -> {}",
        older.display(),
        newer.display(),
        output.display()
    );

    let older_source = WeaveSource::new(older.clone(), compressed);
    let newer_source = WeaveSource::new(newer.clone(), compressed);
    let migrated = Migrator::new(older_source.iter()?, newer_source.iter()?)
        .context("set up hash migration co-walk")?;

    write_weave_tree(&output, compress_output, migrated).context("write migrated tree")?;
    Ok(())
}
