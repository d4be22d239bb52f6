//! The weave line-stream contract (§6, §9): the only interface the core
//! actually drives. The full multi-delta append-only weave container (the
//! upstream `sure`/`weave` on-disk format, keyed by delta number) is out of
//! scope; only `write_lines`/`close`/`name`/`read_line` matter here, backed
//! by two small concrete implementations (plaintext, gzip) selected by a
//! boolean flag at open time.

use crate::utils::config::WeaveConsts;
use anyhow::{bail, Context, Result};
use flate2::write::GzEncoder;
use flate2::read::MultiGzDecoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A line-oriented writer. `\n`-terminated lines in, `\n`-terminated lines
/// out on disk; callers pass lines without trailing newlines.
///
/// `Send` so a `Box<dyn LineWriter>` can be moved into the migrator's output
/// closure and the threaded hasher's worker/collector split (§5: the SQL
/// handle and any file handle it owns must be movable onto whichever thread
/// drives it, even though only one thread ever touches it at a time).
pub trait LineWriter: Send {
    fn write_lines(&mut self, lines: &[String]) -> Result<()>;
    fn close(self: Box<Self>) -> Result<()>;
    fn name(&self) -> &Path;
}

/// The reader mirror. `read_line` strips the trailing `\n`; a present but
/// unterminated final line is a fatal malformed-stream error (§7). `Send`
/// for the same reason as [`LineWriter`].
pub trait LineReader: Send {
    fn read_line(&mut self) -> Result<Option<String>>;
    fn name(&self) -> &Path;
}

/// Open a writer for `path`; `compressed` selects the gzip backend.
pub fn open_writer(path: impl Into<PathBuf>, compressed: bool) -> Result<Box<dyn LineWriter + Send>> {
    let path = path.into();
    if compressed {
        Ok(Box::new(GzipWriter::create(path)?))
    } else {
        Ok(Box::new(PlainWriter::create(path)?))
    }
}

/// Open a reader for `path`; `compressed` selects the gzip backend.
pub fn open_reader(path: impl Into<PathBuf>, compressed: bool) -> Result<Box<dyn LineReader + Send>> {
    let path = path.into();
    if compressed {
        Ok(Box::new(GzipReader::open(path)?))
    } else {
        Ok(Box::new(PlainReader::open(path)?))
    }
}

struct PlainWriter {
    path: PathBuf,
    inner: BufWriter<File>,
}

impl PlainWriter {
    fn create(path: PathBuf) -> Result<Self> {
        let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        Ok(PlainWriter {
            path,
            inner: BufWriter::new(file),
        })
    }
}

impl LineWriter for PlainWriter {
    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.inner, "{line}").context("write weave line")?;
        }
        Ok(())
    }

    fn close(mut self: Box<Self>) -> Result<()> {
        self.inner.flush().context("flush weave stream")
    }

    fn name(&self) -> &Path {
        &self.path
    }
}

struct PlainReader {
    path: PathBuf,
    inner: BufReader<File>,
}

impl PlainReader {
    fn open(path: PathBuf) -> Result<Self> {
        let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
        Ok(PlainReader {
            path,
            inner: BufReader::new(file),
        })
    }
}

impl LineReader for PlainReader {
    fn read_line(&mut self) -> Result<Option<String>> {
        read_one_line(&mut self.inner, &self.path)
    }

    fn name(&self) -> &Path {
        &self.path
    }
}

struct GzipWriter {
    path: PathBuf,
    inner: GzEncoder<File>,
}

impl GzipWriter {
    fn create(path: PathBuf) -> Result<Self> {
        let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        // flate2's gzip encoder always frames a gzip header; the window-bits
        // and OS-field-3 detail the original design calls out are fixed by
        // the format itself, not independently selectable through this API.
        let inner = GzEncoder::new(file, Compression::new(WeaveConsts::GZIP_LEVEL));
        Ok(GzipWriter { path, inner })
    }
}

impl LineWriter for GzipWriter {
    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.inner, "{line}").context("write weave line")?;
        }
        Ok(())
    }

    fn close(mut self: Box<Self>) -> Result<()> {
        self.inner.try_finish().context("finish gzip weave stream")
    }

    fn name(&self) -> &Path {
        &self.path
    }
}

struct GzipReader {
    path: PathBuf,
    inner: BufReader<MultiGzDecoder<File>>,
}

impl GzipReader {
    fn open(path: PathBuf) -> Result<Self> {
        let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
        Ok(GzipReader {
            path,
            inner: BufReader::new(MultiGzDecoder::new(file)),
        })
    }
}

impl LineReader for GzipReader {
    fn read_line(&mut self) -> Result<Option<String>> {
        read_one_line(&mut self.inner, &self.path)
    }

    fn name(&self) -> &Path {
        &self.path
    }
}

/// Shared line-reading logic: strip the trailing `\n`, and treat a
/// non-empty final line with no trailing newline as a fatal malformed
/// stream (§6).
fn read_one_line(reader: &mut impl BufRead, path: &Path) -> Result<Option<String>> {
    let mut buf = String::new();
    let n = reader
        .read_line(&mut buf)
        .with_context(|| format!("read {}", path.display()))?;
    if n == 0 {
        return Ok(None);
    }
    if !buf.ends_with('\n') {
        bail!("missing trailing newline at EOF in weave stream {}", path.display());
    }
    buf.pop();
    Ok(Some(buf))
}
