//! Path tracker invariant (§4.3, §8): at every `File` event the path popped
//! equals the concatenation of all live `Enter` names above it, joined by
//! the platform separator, prefixed with the supplied root.

use anyhow::Result;
use proptest::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use suretree::node::Node;
use suretree::path_tracker::PathTracker;

fn atts() -> HashMap<String, String> {
    HashMap::new()
}

#[test]
fn file_path_is_root_joined_with_live_enters() {
    let nodes: Vec<Result<Node>> = vec![
        Ok(Node::Enter("__root__".into(), atts())),
        Ok(Node::Enter("a".into(), atts())),
        Ok(Node::Sep),
        Ok(Node::Enter("b".into(), atts())),
        Ok(Node::Sep),
        Ok(Node::File("c.txt".into(), atts())),
        Ok(Node::Leave), // close b
        Ok(Node::Sep),
        Ok(Node::File("d.txt".into(), atts())),
        Ok(Node::Leave), // close a
        Ok(Node::Sep),
        Ok(Node::Leave), // close root
    ];

    let root = PathBuf::from("/snapshot");
    let tracked = PathTracker::new(nodes.into_iter(), &root);
    let paths: Vec<(String, PathBuf)> = tracked
        .map(|r| r.unwrap())
        .filter_map(|(node, path)| match node {
            Node::File(name, _) => Some((name, path)),
            _ => None,
        })
        .collect();

    assert_eq!(
        paths,
        vec![
            ("c.txt".to_string(), root.join("a").join("b").join("c.txt")),
            ("d.txt".to_string(), root.join("a").join("d.txt")),
        ]
    );
}

#[test]
fn root_sentinel_is_replaced_by_caller_root() {
    let nodes: Vec<Result<Node>> = vec![
        Ok(Node::Enter("__root__".into(), atts())),
        Ok(Node::Sep),
        Ok(Node::File("only.txt".into(), atts())),
        Ok(Node::Leave),
    ];
    let root = PathBuf::from("/elsewhere");
    let mut tracked = PathTracker::new(nodes.into_iter(), &root);

    let (node, path) = tracked.next().unwrap().unwrap();
    assert!(matches!(node, Node::Enter(ref n, _) if n == "__root__"));
    assert_eq!(path, root);
}

#[test]
fn unbalanced_leave_is_an_error() {
    // An empty root (Enter immediately followed by its own Leave) is a
    // valid, balanced tree and must not error.
    let nodes: Vec<Result<Node>> = vec![
        Ok(Node::Enter("__root__".into(), atts())),
        Ok(Node::Leave),
    ];
    let root = PathBuf::from("/r");
    let mut tracked = PathTracker::new(nodes.into_iter(), &root);
    assert!(tracked.next().unwrap().is_ok()); // Enter
    assert!(tracked.next().unwrap().is_ok()); // Leave closing root: balanced

    // A second, extra Leave beyond the root's own is the genuinely
    // unbalanced case: depth is already back to zero.
    let nodes: Vec<Result<Node>> = vec![
        Ok(Node::Enter("__root__".into(), atts())),
        Ok(Node::Leave),
        Ok(Node::Leave),
    ];
    let mut tracked = PathTracker::new(nodes.into_iter(), &root);
    assert!(tracked.next().unwrap().is_ok()); // Enter
    assert!(tracked.next().unwrap().is_ok()); // Leave closing root
    assert!(tracked.next().unwrap().is_err()); // extra unmatched Leave
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

proptest! {
    /// A flat directory with a random set of distinct, sorted file names:
    /// every file's tracked path is `root/file`.
    #[test]
    fn flat_dir_paths_match_root_join_name(mut names in prop::collection::hash_set(name_strategy(), 1..12)) {
        let mut names: Vec<String> = names.drain().collect();
        names.sort();

        let mut nodes: Vec<Result<Node>> =
            vec![Ok(Node::Enter("__root__".into(), atts())), Ok(Node::Sep)];
        for n in &names {
            nodes.push(Ok(Node::File(n.clone(), atts())));
        }
        nodes.push(Ok(Node::Leave));

        let root = PathBuf::from("/root");
        let tracked = PathTracker::new(nodes.into_iter(), &root);
        let paths: Vec<PathBuf> = tracked
            .map(|r| r.unwrap())
            .filter_map(|(node, path)| match node {
                Node::File(_, _) => Some(path),
                _ => None,
            })
            .collect();

        let expected: Vec<PathBuf> = names.iter().map(|n| root.join(n)).collect();
        prop_assert_eq!(paths, expected);
    }
}
