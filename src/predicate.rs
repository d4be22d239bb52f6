//! Needs-hash predicate (§4.4).

use crate::node::Node;

/// True iff `node` is a `File` of `kind == "file"` that doesn't yet carry a `sha1`.
/// Directories and separators never need hashing.
pub fn needs_hash(node: &Node) -> bool {
    node.needs_hash()
}
