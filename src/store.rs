//! The hash table: an embedded SQL store, treated as an opaque key/value
//! blob sink per §6. Schema is exactly `hashes("index" INTEGER, sha1 BLOB)`;
//! `index` is quoted because it's a SQL keyword.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS hashes (
    "index" INTEGER NOT NULL,
    sha1 BLOB NOT NULL
);
"#;

pub const INSERT_HASH_SQL: &str = "INSERT INTO hashes (\"index\", sha1) VALUES (?1, ?2)";

/// Open (creating if needed) the hash database and ensure the schema exists.
pub fn open_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
    conn.execute_batch(SCHEMA).context("create hashes schema")?;
    Ok(conn)
}

pub fn open_db_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory hash database")?;
    conn.execute_batch(SCHEMA).context("create hashes schema")?;
    Ok(conn)
}

/// Load every `(index, sha1)` row, for tests and diagnostics. Not used by
/// the hot path (the driver only ever appends).
pub fn load_all(conn: &Connection) -> Result<Vec<(u64, [u8; 20])>> {
    let mut stmt = conn.prepare("SELECT \"index\", sha1 FROM hashes ORDER BY \"index\"")?;
    let rows = stmt.query_map([], |row| {
        let index: i64 = row.get(0)?;
        let sha1: Vec<u8> = row.get(1)?;
        Ok((index, sha1))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (index, sha1) = row?;
        let mut digest = [0u8; 20];
        if sha1.len() == 20 {
            digest.copy_from_slice(&sha1);
        }
        out.push((index.max(0) as u64, digest));
    }
    Ok(out)
}
