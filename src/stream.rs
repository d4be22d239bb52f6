//! Lazy, single-pass node sequences, with a caller-controlled memoization
//! point so a stream can be replayed from the start after a full traversal.
//!
//! The pipeline only ever needs two passes over a tree: the progress
//! prescan (§4.5) and the hashing dispatch walk (§4.8). A vector-backed
//! buffer recorded on the first pass and replayed on the second is the
//! simplest thing that satisfies that — no need for a general-purpose lazy
//! replay cursor.

use crate::format::{decode_node, encode_node};
use crate::node::Node;
use crate::weave::open_writer;
use crate::weave::open_reader;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Something that can repeatedly produce a fresh, single-pass iterator over
/// the nodes of a tree. Analogous to `rsure`'s `Source` trait.
pub trait NodeSource {
    fn iter(&self) -> Result<Box<dyn Iterator<Item = Result<Node>> + Send + '_>>;
}

/// An in-memory tree, usable as a `NodeSource` any number of times. Used in
/// tests and for trees small enough to hold whole.
pub struct MemorySource {
    nodes: Vec<Node>,
}

impl MemorySource {
    pub fn new(nodes: Vec<Node>) -> Self {
        MemorySource { nodes }
    }
}

impl NodeSource for MemorySource {
    fn iter(&self) -> Result<Box<dyn Iterator<Item = Result<Node>> + Send + '_>> {
        Ok(Box::new(self.nodes.iter().cloned().map(Ok)))
    }
}

/// Buffers one traversal of a (possibly genuinely single-pass, e.g.
/// file-backed) source into memory, so it can be replayed. Call
/// [`Self::capture`] once; afterwards this is a `NodeSource` like any other.
pub struct Memoized {
    nodes: Vec<Node>,
}

impl Memoized {
    pub fn capture(source: &dyn NodeSource) -> Result<Self> {
        let nodes = source.iter()?.collect::<Result<Vec<_>>>()?;
        Ok(Memoized { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl NodeSource for Memoized {
    fn iter(&self) -> Result<Box<dyn Iterator<Item = Result<Node>> + Send + '_>> {
        Ok(Box::new(self.nodes.iter().cloned().map(Ok)))
    }
}

/// A tree snapshot backed by a weave line stream on disk (§6, §9: "prior-tree
/// reader"). Each call to [`NodeSource::iter`] reopens the file, so this is
/// naturally re-iterable without buffering the whole tree in memory — the
/// prescan pass and the dispatch pass each get an independent read of the
/// file. Wrap in [`Memoized`] instead when the backing reader is genuinely
/// single-pass (e.g. stdin).
pub struct WeaveSource {
    path: PathBuf,
    compressed: bool,
}

impl WeaveSource {
    pub fn new(path: impl Into<PathBuf>, compressed: bool) -> Self {
        WeaveSource {
            path: path.into(),
            compressed,
        }
    }
}

impl NodeSource for WeaveSource {
    fn iter(&self) -> Result<Box<dyn Iterator<Item = Result<Node>> + Send + '_>> {
        let mut reader = open_reader(self.path.clone(), self.compressed)?;
        Ok(Box::new(std::iter::from_fn(move || match reader.read_line() {
            Ok(Some(line)) => Some(decode_node(&line)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        })))
    }
}

/// Write a tree (any node iterator, e.g. the migrator's output) out as a
/// weave line stream at `path`, one [`encode_node`]-encoded line per node.
/// The counterpart to [`WeaveSource`] for producing new snapshots on disk.
pub fn write_weave_tree(
    path: impl AsRef<Path>,
    compressed: bool,
    nodes: impl Iterator<Item = Result<Node>>,
) -> Result<()> {
    let mut writer = open_writer(path.as_ref().to_path_buf(), compressed)?;
    for node in nodes {
        let node = node?;
        writer.write_lines(&[encode_node(&node)])?;
    }
    writer.close()
}
