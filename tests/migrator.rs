//! Hash migrator / `cp_hashes` (§4.9, §8): shape preservation, migration
//! predicate tie-breaks, idempotence, and the concrete end-to-end scenarios
//! from spec §8 (3, 4, 5).

use anyhow::Result;
use std::collections::HashMap;
use suretree::migrator::{cp_hashes, Migrator};
use suretree::node::Node;

fn atts(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn root() -> Node {
    Node::Enter("__root__".into(), atts(&[]))
}

/// older: a single unchanged file with a sha1; newer: same file, no sha1 yet.
fn unchanged_trees(ctime_newer: &str) -> (Vec<Result<Node>>, Vec<Result<Node>>) {
    let older = vec![
        Ok(root()),
        Ok(Node::Sep),
        Ok(Node::File(
            "a.txt".into(),
            atts(&[
                ("kind", "file"),
                ("ino", "10"),
                ("ctime", "100"),
                ("sha1", "deadbeef"),
            ]),
        )),
        Ok(Node::Leave),
    ];
    let newer = vec![
        Ok(root()),
        Ok(Node::Sep),
        Ok(Node::File(
            "a.txt".into(),
            atts(&[("kind", "file"), ("ino", "10"), ("ctime", ctime_newer)]),
        )),
        Ok(Node::Leave),
    ];
    (older, newer)
}

#[test]
fn scenario_3_unchanged_inode_and_ctime_migrates_sha1() {
    let (older, newer) = unchanged_trees("100");
    let out = cp_hashes(older.into_iter(), newer.into_iter()).unwrap();
    match &out[2] {
        Node::File(name, atts) => {
            assert_eq!(name, "a.txt");
            assert_eq!(atts.get("sha1").map(String::as_str), Some("deadbeef"));
        }
        other => panic!("expected File, got {other:?}"),
    }
}

#[test]
fn scenario_4_ctime_differs_does_not_migrate() {
    let (older, newer) = unchanged_trees("101");
    let out = cp_hashes(older.into_iter(), newer.into_iter()).unwrap();
    match &out[2] {
        Node::File(name, atts) => {
            assert_eq!(name, "a.txt");
            assert_eq!(atts.get("sha1"), None);
        }
        other => panic!("expected File, got {other:?}"),
    }
}

#[test]
fn scenario_5_added_subtree_passes_through_verbatim() {
    // older = {root}/{x/}; newer = {root}/{x/, y/a.txt}
    let older: Vec<Result<Node>> = vec![
        Ok(root()),
        Ok(Node::Enter("x".into(), atts(&[]))),
        Ok(Node::Sep),
        Ok(Node::Leave), // close x
        Ok(Node::Sep),
        Ok(Node::Leave), // close root
    ];
    let newer: Vec<Result<Node>> = vec![
        Ok(root()),
        Ok(Node::Enter("x".into(), atts(&[]))),
        Ok(Node::Sep),
        Ok(Node::Leave), // close x
        Ok(Node::Enter("y".into(), atts(&[]))),
        Ok(Node::Sep),
        Ok(Node::File(
            "a.txt".into(),
            atts(&[("kind", "file"), ("ino", "20"), ("ctime", "5")]),
        )),
        Ok(Node::Leave), // close y
        Ok(Node::Sep),
        Ok(Node::Leave), // close root
    ];

    let newer_shape: Vec<Node> = newer
        .iter()
        .map(|r| r.as_ref().unwrap().clone())
        .collect();
    let out = cp_hashes(older.into_iter(), newer.into_iter()).unwrap();
    assert_eq!(out, newer_shape, "migrator output must equal newer's shape verbatim");
}

#[test]
fn migrator_output_shape_matches_newer_names_and_order() {
    let older: Vec<Result<Node>> = vec![
        Ok(root()),
        Ok(Node::Sep),
        Ok(Node::File("a".into(), atts(&[("kind", "file")]))),
        Ok(Node::File("b".into(), atts(&[("kind", "file")]))),
        Ok(Node::Leave),
    ];
    let newer: Vec<Result<Node>> = vec![
        Ok(root()),
        Ok(Node::Sep),
        Ok(Node::File("a".into(), atts(&[("kind", "file")]))),
        Ok(Node::File("c".into(), atts(&[("kind", "file")]))),
        Ok(Node::Leave),
    ];
    let newer_names: Vec<String> = newer
        .iter()
        .filter_map(|r| match r.as_ref().unwrap() {
            Node::File(n, _) => Some(n.clone()),
            _ => None,
        })
        .collect();

    let out = cp_hashes(older.into_iter(), newer.into_iter()).unwrap();
    let out_names: Vec<String> = out
        .iter()
        .filter_map(|n| match n {
            Node::File(n, _) => Some(n.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(out_names, newer_names);
}

#[test]
fn root_name_mismatch_is_fatal() {
    let older: Vec<Result<Node>> = vec![Ok(Node::Enter("one".into(), atts(&[]))), Ok(Node::Leave)];
    let newer: Vec<Result<Node>> = vec![Ok(Node::Enter("two".into(), atts(&[]))), Ok(Node::Leave)];
    let err = Migrator::new(older.into_iter(), newer.into_iter()).unwrap_err();
    assert!(err.to_string().contains("differing names"));
}

#[test]
fn migrator_idempotence() {
    let (older, newer) = unchanged_trees("100");
    let older_for_second: Vec<Result<Node>> = older
        .iter()
        .map(|r| Ok(r.as_ref().unwrap().clone()))
        .collect();

    let once = cp_hashes(older.into_iter(), newer.into_iter()).unwrap();
    let once_as_input: Vec<Result<Node>> = once.iter().cloned().map(Ok).collect();
    let twice = cp_hashes(older_for_second.into_iter(), once_as_input.into_iter()).unwrap();

    assert_eq!(once, twice, "migrate(older, migrate(older, newer)) == migrate(older, newer)");
}

#[test]
fn never_writes_sha1_onto_a_non_file_node() {
    let older: Vec<Result<Node>> = vec![
        Ok(root()),
        Ok(Node::Sep),
        Ok(Node::Leave),
    ];
    let newer: Vec<Result<Node>> = vec![
        Ok(root()),
        Ok(Node::Sep),
        Ok(Node::Leave),
    ];
    let out = cp_hashes(older.into_iter(), newer.into_iter()).unwrap();
    for node in &out {
        if let Node::Enter(_, atts) = node {
            assert!(!atts.contains_key("sha1"));
        }
    }
}

#[test]
fn never_overwrites_an_already_present_sha1() {
    let older: Vec<Result<Node>> = vec![
        Ok(root()),
        Ok(Node::Sep),
        Ok(Node::File(
            "a.txt".into(),
            atts(&[("kind", "file"), ("ino", "10"), ("ctime", "100"), ("sha1", "old")]),
        )),
        Ok(Node::Leave),
    ];
    let newer: Vec<Result<Node>> = vec![
        Ok(root()),
        Ok(Node::Sep),
        Ok(Node::File(
            "a.txt".into(),
            atts(&[
                ("kind", "file"),
                ("ino", "10"),
                ("ctime", "100"),
                ("sha1", "new"),
            ]),
        )),
        Ok(Node::Leave),
    ];
    let out = cp_hashes(older.into_iter(), newer.into_iter()).unwrap();
    match &out[2] {
        Node::File(_, atts) => assert_eq!(atts.get("sha1").map(String::as_str), Some("new")),
        other => panic!("expected File, got {other:?}"),
    }
}
