//! Duplicate detection for imported files.
//!
//! A file is a duplicate when its name, size and modification time all
//! match an earlier file. Files that only share a size are compared by a
//! sampled content digest, computed lazily the first time a size collision
//! needs it.

use std::sync::{Arc, OnceLock};

use sha2::{Digest, Sha256};

/// Bytes hashed from each sampled region.
const SAMPLE_LEN: usize = 64 * 1024;

/// Metadata the host reports for a selected file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileMeta {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, milliseconds since the Unix epoch.
    pub modified_ms: Option<u64>,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64, modified_ms: Option<u64>) -> Self {
        Self {
            name: name.into(),
            size,
            modified_ms,
        }
    }
}

/// SHA-256 based digest of a file's content.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    /// Digest of up to three regions (head, middle, tail) plus the length.
    ///
    /// Region digests are sorted before they are hashed together, so the
    /// result does not depend on the order regions are visited in and equal
    /// regions never cancel out. Small inputs are hashed whole.
    pub fn of(bytes: &[u8]) -> Self {
        let mut regions: Vec<[u8; 32]> = sample_regions(bytes)
            .into_iter()
            .map(|region| Sha256::digest(region).into())
            .collect();
        regions.sort_unstable();
        let mut h = Sha256::new();
        for d in &regions {
            h.update(d);
        }
        h.update((bytes.len() as u64).to_le_bytes());
        Self(h.finalize().into())
    }
}

fn sample_regions(bytes: &[u8]) -> Vec<&[u8]> {
    if bytes.len() <= 3 * SAMPLE_LEN {
        return vec![bytes];
    }
    let mid = bytes.len() / 2 - SAMPLE_LEN / 2;
    vec![
        &bytes[..SAMPLE_LEN],
        &bytes[mid..mid + SAMPLE_LEN],
        &bytes[bytes.len() - SAMPLE_LEN..],
    ]
}

#[derive(Debug)]
struct Entry {
    meta: FileMeta,
    content: Arc<[u8]>,
    digest: OnceLock<ContentDigest>,
}

impl Entry {
    fn new(meta: FileMeta, content: Arc<[u8]>) -> Self {
        Self {
            meta,
            content,
            digest: OnceLock::new(),
        }
    }

    fn digest(&self) -> ContentDigest {
        *self.digest.get_or_init(|| ContentDigest::of(&self.content))
    }
}

/// Ordered index of accepted files, parallel to the session's assets.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    entries: Vec<Entry>,
}

impl DuplicateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first accepted file `meta`/`content` duplicates.
    pub fn find(&self, meta: &FileMeta, content: &[u8]) -> Option<usize> {
        let candidate = OnceLock::new();
        self.entries.iter().position(|e| {
            if e.meta == *meta {
                return true;
            }
            e.meta.size == meta.size
                && e.digest() == *candidate.get_or_init(|| ContentDigest::of(content))
        })
    }

    pub fn is_duplicate(&self, meta: &FileMeta, content: &[u8]) -> bool {
        self.find(meta, content).is_some()
    }

    /// Record an accepted file at the end of the index.
    pub fn push(&mut self, meta: FileMeta, content: Arc<[u8]>) {
        self.entries.push(Entry::new(meta, content));
    }

    /// Forget the file at `index`. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
