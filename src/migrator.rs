//! Hash migrator, `cp_hashes` (§4.9): co-walks two node streams (`older`,
//! `latest`) and emits a stream shaped exactly like `latest`, forwarding the
//! `sha1` attribute from `older` onto matching unchanged files.
//!
//! The co-walk is a two-finger merge over a grammar (children section, then
//! files section, within each directory), not a flat sequence comparison.
//! It is implemented as an explicit state stack rather than native recursion
//! so stack depth tracks tree depth, never total node count (§9 design
//! note), and as a pull [`Iterator`] so the whole migrated tree is never
//! buffered in memory at once.

use crate::node::{Atts, Node};
use anyhow::{anyhow, bail, Result};
use std::iter::Peekable;

/// Which section of the current directory body the co-walk is in.
/// `Copy` means: ignore `older` entirely and pass `newer` through verbatim,
/// used for a subtree present only in `newer` (an added file or directory).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Children,
    Files,
    Copy,
}

/// A name-only view of the next node in a stream, cheap to compare without
/// holding a borrow across the two streams at once.
enum Head {
    Enter(String),
    Leave,
    Sep,
    File(String),
    End,
}

fn head<I: Iterator<Item = Result<Node>>>(it: &mut Peekable<I>) -> Result<Head> {
    if matches!(it.peek(), Some(Err(_))) {
        return Err(it.next().unwrap().unwrap_err());
    }
    Ok(match it.peek() {
        None => Head::End,
        Some(Ok(Node::Enter(name, _))) => Head::Enter(name.clone()),
        Some(Ok(Node::Leave)) => Head::Leave,
        Some(Ok(Node::Sep)) => Head::Sep,
        Some(Ok(Node::File(name, _))) => Head::File(name.clone()),
        Some(Err(_)) => unreachable!("checked above"),
    })
}

fn pull<I: Iterator<Item = Result<Node>>>(it: &mut I) -> Result<Node> {
    match it.next() {
        Some(r) => r,
        None => bail!("unexpected end of stream in co-walk"),
    }
}

/// Silently skip an entire subtree on `older`, starting at its `Enter`.
/// Discards everything; advances `older` past the matching `Leave`.
fn aconsume<I: Iterator<Item = Result<Node>>>(older: &mut I) -> Result<()> {
    let first = pull(older)?;
    if !first.is_enter() {
        bail!("Invalid node in tree");
    }
    let mut depth = 1i64;
    while depth > 0 {
        match pull(older)? {
            Node::Enter(..) => depth += 1,
            Node::Leave => depth -= 1,
            _ => {}
        }
    }
    Ok(())
}

/// The migration predicate (§4.9): forward `older`'s `sha1` onto `newer`
/// when both are files with matching inode identity and ctime, and
/// `newer` doesn't already carry its own `sha1`.
fn migrate_atts(older_atts: &Atts, mut newer_atts: Atts) -> Atts {
    if newer_atts.contains_key("sha1") {
        return newer_atts;
    }
    let is_file = |atts: &Atts| atts.get("kind").map(String::as_str) == Some("file");
    if !is_file(older_atts) || !is_file(&newer_atts) {
        return newer_atts;
    }
    let Some(older_sha1) = older_atts.get("sha1") else {
        return newer_atts;
    };
    if older_atts.get("ino") == newer_atts.get("ino") && older_atts.get("ctime") == newer_atts.get("ctime") {
        newer_atts.insert("sha1".to_string(), older_sha1.clone());
    }
    newer_atts
}

/// Co-walks `older` and `latest`, yielding `latest`'s shape with `sha1`
/// forwarded where [`migrate_atts`] applies.
pub struct Migrator<A, B>
where
    A: Iterator<Item = Result<Node>>,
    B: Iterator<Item = Result<Node>>,
{
    older: Peekable<A>,
    newer: Peekable<B>,
    stack: Vec<Phase>,
    pending_root: Option<Node>,
}

impl<A, B> Migrator<A, B>
where
    A: Iterator<Item = Result<Node>>,
    B: Iterator<Item = Result<Node>>,
{
    /// Validate and consume both roots, then set up the co-walk so the
    /// first call to `next()` returns `latest`'s root `Enter`.
    pub fn new(older: A, newer: B) -> Result<Self> {
        let mut older = older.peekable();
        let mut newer = newer.peekable();

        let older_root = pull(&mut older)?;
        let newer_root = pull(&mut newer)?;
        let (Node::Enter(older_name, _), Node::Enter(newer_name, _)) = (&older_root, &newer_root)
        else {
            bail!("Invalid node in tree");
        };
        if older_name != newer_name {
            bail!("Root directories have differing names");
        }

        Ok(Migrator {
            older,
            newer,
            stack: vec![Phase::Children],
            pending_root: Some(newer_root),
        })
    }

    /// Begin `Copy` mode for a subtree whose `Enter` hasn't been consumed
    /// yet: consumes and returns that `Enter` from `newer`, and pushes the
    /// frame that will track its nested body until the matching `Leave`.
    fn bconsume_enter(&mut self) -> Result<Node> {
        let node = pull(&mut self.newer)?;
        if !node.is_enter() {
            bail!("Invalid node in tree");
        }
        self.stack.push(Phase::Copy);
        Ok(node)
    }
}

impl<A, B> Iterator for Migrator<A, B>
where
    A: Iterator<Item = Result<Node>>,
    B: Iterator<Item = Result<Node>>,
{
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Result<Node>> {
        if let Some(node) = self.pending_root.take() {
            return Some(Ok(node));
        }

        loop {
            match self.stack.last().copied() {
                None => return None,

                Some(Phase::Copy) => {
                    let node = match pull(&mut self.newer) {
                        Ok(n) => n,
                        Err(e) => return Some(Err(e)),
                    };
                    match &node {
                        Node::Enter(..) => self.stack.push(Phase::Copy),
                        Node::Leave => {
                            self.stack.pop();
                        }
                        _ => {}
                    }
                    return Some(Ok(node));
                }

                Some(Phase::Children) => {
                    let a = match head(&mut self.older) {
                        Ok(h) => h,
                        Err(e) => return Some(Err(e)),
                    };
                    let b = match head(&mut self.newer) {
                        Ok(h) => h,
                        Err(e) => return Some(Err(e)),
                    };
                    match (a, b) {
                        (Head::Sep, Head::Sep) => {
                            let _ = self.older.next();
                            let _ = self.newer.next();
                            *self.stack.last_mut().unwrap() = Phase::Files;
                            return Some(Ok(Node::Sep));
                        }
                        (Head::Enter(_), Head::Sep) => {
                            if let Err(e) = aconsume(&mut self.older) {
                                return Some(Err(e));
                            }
                            continue;
                        }
                        (Head::Sep, Head::Enter(_)) => match self.bconsume_enter() {
                            Ok(node) => return Some(Ok(node)),
                            Err(e) => return Some(Err(e)),
                        },
                        (Head::Enter(an), Head::Enter(bn)) => match an.cmp(&bn) {
                            std::cmp::Ordering::Less => {
                                if let Err(e) = aconsume(&mut self.older) {
                                    return Some(Err(e));
                                }
                                continue;
                            }
                            std::cmp::Ordering::Greater => match self.bconsume_enter() {
                                Ok(node) => return Some(Ok(node)),
                                Err(e) => return Some(Err(e)),
                            },
                            std::cmp::Ordering::Equal => {
                                if let Err(e) = pull(&mut self.older) {
                                    return Some(Err(e));
                                }
                                let node = match pull(&mut self.newer) {
                                    Ok(n) => n,
                                    Err(e) => return Some(Err(e)),
                                };
                                self.stack.push(Phase::Children);
                                return Some(Ok(node));
                            }
                        },
                        (Head::End, _) | (_, Head::End) => {
                            return Some(Err(anyhow!("unexpected end of stream in co-walk")))
                        }
                        _ => return Some(Err(anyhow!("Invalid node in tree"))),
                    }
                }

                Some(Phase::Files) => {
                    let a = match head(&mut self.older) {
                        Ok(h) => h,
                        Err(e) => return Some(Err(e)),
                    };
                    let b = match head(&mut self.newer) {
                        Ok(h) => h,
                        Err(e) => return Some(Err(e)),
                    };
                    match (a, b) {
                        (Head::Leave, Head::Leave) => {
                            if let Err(e) = pull(&mut self.older) {
                                return Some(Err(e));
                            }
                            let node = match pull(&mut self.newer) {
                                Ok(n) => n,
                                Err(e) => return Some(Err(e)),
                            };
                            self.stack.pop();
                            return Some(Ok(node));
                        }
                        (Head::File(_), Head::Leave) => {
                            if let Err(e) = pull(&mut self.older) {
                                return Some(Err(e));
                            }
                            continue;
                        }
                        (Head::Leave, Head::File(_)) => {
                            let node = match pull(&mut self.newer) {
                                Ok(n) => n,
                                Err(e) => return Some(Err(e)),
                            };
                            return Some(Ok(node));
                        }
                        (Head::File(an), Head::File(bn)) => match an.cmp(&bn) {
                            std::cmp::Ordering::Less => {
                                if let Err(e) = pull(&mut self.older) {
                                    return Some(Err(e));
                                }
                                continue;
                            }
                            std::cmp::Ordering::Greater => {
                                let node = match pull(&mut self.newer) {
                                    Ok(n) => n,
                                    Err(e) => return Some(Err(e)),
                                };
                                return Some(Ok(node));
                            }
                            std::cmp::Ordering::Equal => {
                                let older_node = match pull(&mut self.older) {
                                    Ok(n) => n,
                                    Err(e) => return Some(Err(e)),
                                };
                                let newer_node = match pull(&mut self.newer) {
                                    Ok(n) => n,
                                    Err(e) => return Some(Err(e)),
                                };
                                let older_atts = match &older_node {
                                    Node::File(_, atts) => atts,
                                    _ => return Some(Err(anyhow!("Invalid node in file part of tree"))),
                                };
                                let (newer_name, newer_atts) = match newer_node {
                                    Node::File(name, atts) => (name, atts),
                                    _ => return Some(Err(anyhow!("Invalid node in file part of tree"))),
                                };
                                let merged = migrate_atts(older_atts, newer_atts);
                                return Some(Ok(Node::File(newer_name, merged)));
                            }
                        },
                        (Head::End, _) | (_, Head::End) => {
                            return Some(Err(anyhow!("unexpected end of stream in co-walk")))
                        }
                        _ => return Some(Err(anyhow!("Invalid node in file part of tree"))),
                    }
                }
            }
        }
    }
}

/// Convenience entry point: co-walk `older` and `newer` and collect the
/// migrated tree. Named after the operation this mirrors in the lineage
/// this design is drawn from.
pub fn cp_hashes(
    older: impl Iterator<Item = Result<Node>>,
    newer: impl Iterator<Item = Result<Node>>,
) -> Result<Vec<Node>> {
    Migrator::new(older, newer)?.collect()
}
