//! Progress accounting (§4.5): running counts against totals fixed by a
//! prescan, plus a terminal meter to render them.

use crate::node::Node;
use crate::predicate::needs_hash;
use crate::stream::NodeSource;
use anyhow::Result;
use kdam::{Bar, BarExt};
use std::sync::Mutex;

/// `{files, total_files, octets, total_octets}`, monotonic non-decreasing
/// against totals fixed once at pipeline start.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgressState {
    pub files: u64,
    pub total_files: u64,
    pub octets: u64,
    pub total_octets: u64,
}

impl ProgressState {
    /// Walk `source` once, counting files and summing `size` for every node
    /// the hashing predicate would select. Fixes the totals for the run.
    pub fn prescan(source: &dyn NodeSource) -> Result<Self> {
        let mut state = ProgressState::default();
        for node in source.iter()? {
            let node = node?;
            if needs_hash(&node) {
                state.total_files += 1;
                state.total_octets += node.size();
            }
        }
        Ok(state)
    }

    /// Record that `node` was just hashed: increments `files` and adds its size.
    pub fn update(&mut self, node: &Node) {
        self.files += 1;
        self.octets += node.size();
    }

    pub fn files_fraction(&self) -> f64 {
        if self.total_files == 0 {
            1.0
        } else {
            self.files as f64 / self.total_files as f64
        }
    }

    pub fn octets_fraction(&self) -> f64 {
        if self.total_octets == 0 {
            1.0
        } else {
            self.octets as f64 / self.total_octets as f64
        }
    }

    /// The `"  {files}/{total_files} ({pct:5.1%}) files, ..."`-shaped status
    /// line from §4.5.
    pub fn format_line(&self) -> String {
        format!(
            "  {}/{} ({:5.1}%) files, {}/{} ({:5.1}%) bytes",
            self.files,
            self.total_files,
            self.files_fraction() * 100.0,
            humanize_bytes(self.octets),
            humanize_bytes(self.total_octets),
            self.octets_fraction() * 100.0,
        )
    }
}

/// Binary-prefix humanization (KiB/MiB/...), three significant digits.
pub fn humanize_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
    let mut value = n as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{n}{}", UNITS[0])
    } else if value >= 100.0 {
        format!("{value:.0}{}", UNITS[unit])
    } else if value >= 10.0 {
        format!("{value:.1}{}", UNITS[unit])
    } else {
        format!("{value:.2}{}", UNITS[unit])
    }
}

/// Anything that can render a [`ProgressState`]. The core only ever drives
/// this through a lock, since the threaded hasher's collector is the sole
/// mutator and any real terminal renderer needs its own lock to redraw.
pub trait Meter: Send {
    fn redraw(&self, state: &ProgressState);
}

/// No-op meter: used when progress rendering isn't wanted (tests, `--quiet`).
pub struct NullMeter;

impl Meter for NullMeter {
    fn redraw(&self, _state: &ProgressState) {}
}

/// Terminal meter backed by `kdam`, the teacher's progress-bar crate.
pub struct TerminalMeter {
    bar: Mutex<Bar>,
}

impl TerminalMeter {
    pub fn new(total_files: u64, desc: &'static str) -> Self {
        TerminalMeter {
            bar: Mutex::new(kdam::tqdm!(total = total_files as usize, desc = desc)),
        }
    }
}

impl Meter for TerminalMeter {
    fn redraw(&self, state: &ProgressState) {
        if let Ok(mut bar) = self.bar.try_lock() {
            bar.desc = state.format_line();
            bar.total = state.total_files as usize;
            bar.n = state.files as usize;
            let _ = bar.refresh();
        }
    }
}
