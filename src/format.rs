//! A concrete, crate-owned textual encoding of one [`Node`] per line, used
//! to back the weave line-stream (§6) with real content. The upstream
//! `sure` tree's actual on-disk binary format is out of scope (§1); this is
//! only a fixture for driving [`crate::weave`] end to end, not a
//! reimplementation of that format.
//!
//! One line per node: a one-letter tag, then tab-separated fields. `Enter`
//! and `File` carry a name field followed by `key=value` attribute pairs;
//! `Leave` and `Sep` are bare tags. Tabs and newlines inside names or
//! attribute values are percent-escaped so the line-per-node framing holds.

use crate::node::{Atts, Node};
use anyhow::{bail, Context, Result};

const ENTER: char = 'E';
const LEAVE: char = 'L';
const SEP: char = 'S';
const FILE: char = 'F';

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\t' => out.push_str("%09"),
            '\n' => out.push_str("%0a"),
            '%' => out.push_str("%25"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let hi = chars.next().context("truncated percent-escape")?;
        let lo = chars.next().context("truncated percent-escape")?;
        let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16).context("invalid percent-escape")?;
        out.push(byte as char);
    }
    Ok(out)
}

fn encode_atts(atts: &Atts) -> String {
    let mut pairs: Vec<_> = atts.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
        .collect::<Vec<_>>()
        .join("\t")
}

fn decode_atts(fields: &[&str]) -> Result<Atts> {
    let mut atts = Atts::new();
    for field in fields {
        let (k, v) = field
            .split_once('=')
            .with_context(|| format!("malformed attribute field {field:?}"))?;
        atts.insert(unescape(k)?, unescape(v)?);
    }
    Ok(atts)
}

/// Encode one node as a single line (no trailing newline; the weave writer
/// adds that).
pub fn encode_node(node: &Node) -> String {
    match node {
        Node::Enter(name, atts) => {
            let atts = encode_atts(atts);
            if atts.is_empty() {
                format!("{ENTER}\t{}", escape(name))
            } else {
                format!("{ENTER}\t{}\t{atts}", escape(name))
            }
        }
        Node::Leave => LEAVE.to_string(),
        Node::Sep => SEP.to_string(),
        Node::File(name, atts) => {
            let atts = encode_atts(atts);
            if atts.is_empty() {
                format!("{FILE}\t{}", escape(name))
            } else {
                format!("{FILE}\t{}\t{atts}", escape(name))
            }
        }
    }
}

/// Decode one line produced by [`encode_node`] back into a [`Node`].
pub fn decode_node(line: &str) -> Result<Node> {
    let mut fields = line.split('\t');
    let tag = fields.next().context("empty weave line")?;
    match tag {
        "E" => {
            let name = unescape(fields.next().context("Enter line missing name")?)?;
            let rest: Vec<&str> = fields.collect();
            Ok(Node::Enter(name, decode_atts(&rest)?))
        }
        "L" => Ok(Node::Leave),
        "S" => Ok(Node::Sep),
        "F" => {
            let name = unescape(fields.next().context("File line missing name")?)?;
            let rest: Vec<&str> = fields.collect();
            Ok(Node::File(name, decode_atts(&rest)?))
        }
        other => bail!("unrecognized node tag {other:?}"),
    }
}
