//! SHA-1 of a file's current contents. Mirrors the teacher's
//! `engine/hashing.rs` mmap/chunked split, generalized from blake3 to sha1.

use crate::utils::config::HashingConsts;
use anyhow::{Context, Result};
use memmap2::Mmap;
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Raw 20-byte SHA-1 digest.
pub type Sha1Digest = [u8; 20];

/// Hash the file at `path`. `size` is the size recorded in the tree
/// snapshot, used only to pick mmap vs. chunked reads; the hash itself is
/// always computed over however many bytes are actually on disk right now.
pub fn hash_file(path: &Path, size: u64) -> Result<Sha1Digest> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha1::new();

    if size > HashingConsts::HASH_MMAP_THRESHOLD {
        let mmap = unsafe { Mmap::map(&file) }.with_context(|| format!("mmap {}", path.display()))?;
        hasher.update(&mmap);
    } else {
        let mut reader =
            std::io::BufReader::with_capacity(HashingConsts::HASH_READ_CHUNK_SIZE, file);
        let mut buffer = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
        loop {
            let n = reader
                .read(&mut buffer)
                .with_context(|| format!("read {}", path.display()))?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    }

    Ok(hasher.finalize().into())
}

/// Lowercase hex encoding of a digest, via `data-encoding` (the crate
/// `rsure` itself uses for this, rather than the more common `hex` crate).
pub fn to_hex(digest: &Sha1Digest) -> String {
    data_encoding::HEXLOWER.encode(digest)
}

pub fn from_hex(s: &str) -> Result<Sha1Digest> {
    let bytes = data_encoding::HEXLOWER
        .decode(s.as_bytes())
        .with_context(|| format!("decode sha1 hex {s:?}"))?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| anyhow::anyhow!("sha1 hex decoded to {} bytes, want 20", v.len()))
}
