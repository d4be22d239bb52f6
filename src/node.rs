//! Tree events: the tagged union a depth-first walk of a captured filesystem
//! tree is made of. See the data model in the project notes for the
//! invariants these are expected to satisfy (balanced nesting, section
//! ordering, ascending name order within a directory).

use std::collections::HashMap;

/// String-keyed attribute bag carried by `Enter` and `File` nodes.
pub type Atts = HashMap<String, String>;

/// One event in a depth-first traversal of a tree snapshot.
///
/// Exactly four cases; do not add a fifth without re-checking every
/// co-walk and pattern match that assumes this is closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Open a directory.
    Enter(String, Atts),
    /// Close the most recently entered directory.
    Leave,
    /// Separator between the "directories" and "files" sections of one directory.
    Sep,
    /// A non-directory entry.
    File(String, Atts),
}

/// Sentinel name carried by the outermost `Enter` of a tree.
pub const ROOT_NAME: &str = "__root__";

impl Node {
    pub fn is_enter(&self) -> bool {
        matches!(self, Node::Enter(..))
    }

    pub fn is_leave(&self) -> bool {
        matches!(self, Node::Leave)
    }

    pub fn is_sep(&self) -> bool {
        matches!(self, Node::Sep)
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(..))
    }

    /// Name of an `Enter` or `File` node. Panics on `Leave`/`Sep`; callers
    /// only call this where the tag has already been checked.
    pub fn name(&self) -> &str {
        match self {
            Node::Enter(name, _) => name,
            Node::File(name, _) => name,
            Node::Leave | Node::Sep => panic!("Node::name called on Leave/Sep"),
        }
    }

    pub fn atts(&self) -> Option<&Atts> {
        match self {
            Node::Enter(_, atts) | Node::File(_, atts) => Some(atts),
            Node::Leave | Node::Sep => None,
        }
    }

    pub fn atts_mut(&mut self) -> Option<&mut Atts> {
        match self {
            Node::Enter(_, atts) | Node::File(_, atts) => Some(atts),
            Node::Leave | Node::Sep => None,
        }
    }

    /// Byte size recorded in the `size` attribute; 0 if absent or not a file/dir node.
    pub fn size(&self) -> u64 {
        self.atts()
            .and_then(|a| a.get("size"))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    pub fn kind(&self) -> Option<&str> {
        self.atts().and_then(|a| a.get("kind")).map(|s| s.as_str())
    }

    /// True for `File` nodes of `kind == "file"` that do not yet carry a `sha1`.
    pub fn needs_hash(&self) -> bool {
        matches!(self, Node::File(_, atts) if atts.get("kind").map(String::as_str) == Some("file") && !atts.contains_key("sha1"))
    }
}
