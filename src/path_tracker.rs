//! Augments a node stream with the absolute logical path reached at each
//! event (§4.3).

use crate::node::{Node, ROOT_NAME};
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

/// Wraps a node iterator, yielding `(Node, PathBuf)` pairs. The first
/// `Enter` is treated as the tree root and its sentinel name is replaced by
/// `root`; every other event's path is built by joining live path
/// components under `root`.
pub struct PathTracker<I> {
    inner: I,
    root: PathBuf,
    stack: Vec<String>,
    /// Count of unmatched `Enter`s seen so far, including the root's own.
    /// Tracked separately from `stack` because the root `Enter` is a no-op
    /// on `stack` (§4.3) but still needs a matching `Leave` at the end.
    depth: u64,
    current: PathBuf,
}

impl<I> PathTracker<I>
where
    I: Iterator<Item = Result<Node>>,
{
    pub fn new(inner: I, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        PathTracker {
            inner,
            current: root.clone(),
            root,
            stack: Vec::new(),
            depth: 0,
        }
    }
}

impl<I> Iterator for PathTracker<I>
where
    I: Iterator<Item = Result<Node>>,
{
    type Item = Result<(Node, PathBuf)>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = match self.inner.next()? {
            Ok(node) => node,
            Err(e) => return Some(Err(e)),
        };

        match &node {
            Node::Enter(name, _) if self.stack.is_empty() && self.depth == 0 && name == ROOT_NAME => {
                // Root sentinel: stack stays empty, path is the caller-supplied root.
                self.depth += 1;
                self.current = self.root.clone();
            }
            Node::Enter(name, _) => {
                self.depth += 1;
                self.stack.push(name.clone());
                self.current = self.root.join(self.stack.join(std::path::MAIN_SEPARATOR_STR));
            }
            Node::Leave => {
                if self.depth == 0 {
                    return Some(Err(anyhow::anyhow!(
                        "Leave with no matching Enter (unbalanced tree)"
                    )));
                }
                self.depth -= 1;
                if !self.stack.is_empty() {
                    self.stack.pop();
                }
                self.current = if self.stack.is_empty() {
                    self.root.clone()
                } else {
                    self.root.join(self.stack.join(std::path::MAIN_SEPARATOR_STR))
                };
            }
            Node::Sep => {}
            Node::File(..) => {}
        }

        let path = match &node {
            Node::File(name, _) => self.current.join(name),
            _ => self.current.clone(),
        };
        Some(Ok((node, path)))
    }
}

/// Validate that an iterator of bare nodes is balanced (every `Leave` has a
/// matching `Enter`, no prefix over-closes). Used by callers that want to
/// fail fast on a corrupt tree before starting the pipeline proper; the
/// tracker itself also detects this lazily via the error above.
pub fn check_balanced<'a>(nodes: impl Iterator<Item = &'a Node>) -> Result<()> {
    let mut depth = 0i64;
    for node in nodes {
        match node {
            Node::Enter(..) => depth += 1,
            Node::Leave => {
                depth -= 1;
                if depth < 0 {
                    bail!("Leave with no matching Enter (unbalanced tree)");
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        bail!("tree has unmatched Enter with no Leave");
    }
    Ok(())
}
