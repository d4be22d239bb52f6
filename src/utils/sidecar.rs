//! Load `.suretree.toml` from a directory (CLI only). The library itself
//! never reads this file — it's how the consuming binary fills in defaults
//! that the CLI didn't receive as explicit flags, mirroring the teacher's
//! `.nefaxer.toml` sidecar (`nefaxer_toml.rs`).

use super::config::default_config_filename;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub(crate) struct SuretreeToml {
    #[serde(default)]
    settings: Settings,
}

#[derive(Debug, Default, Deserialize)]
struct Settings {
    db: Option<String>,
    threads: Option<usize>,
    compressed: Option<bool>,
    direct: Option<bool>,
}

/// Load `.suretree.toml` from `dir` if present. Returns `None` if the file
/// is missing or unreadable; a malformed file logs a warning and is
/// otherwise treated as absent (sidecar defaults are never load-bearing
/// enough to be worth a fatal error).
fn load(dir: &Path) -> Option<SuretreeToml> {
    let path = dir.join(default_config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    toml::from_str(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

/// Resolved sidecar defaults, pre-merged with `dir`'s `.suretree.toml` if
/// present. CLI flags that were actually passed always win over these; see
/// the `Option`-returning fields here vs. plain CLI flags in `cli::handlers`.
#[derive(Debug, Default)]
pub struct CliDefaults {
    pub db: Option<PathBuf>,
    pub threads: Option<usize>,
    pub compressed: bool,
    pub direct: bool,
}

/// Read `dir`'s `.suretree.toml`, if any, into [`CliDefaults`].
pub fn load_defaults(dir: &Path) -> CliDefaults {
    let Some(file) = load(dir) else {
        return CliDefaults::default();
    };
    CliDefaults {
        db: file.settings.db.map(PathBuf::from),
        threads: file.settings.threads,
        compressed: file.settings.compressed.unwrap_or(false),
        direct: file.settings.direct.unwrap_or(false),
    }
}
