//! Content fingerprints for duplicate detection.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use sha2::{Digest, Sha256};

const BLOCK_SIZE: usize = 64 * 1024;

/// SHA-256 of the full file content, streamed in fixed-size blocks.
/// Returns the lowercase hex digest. The path must be a regular file.
pub fn hash_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        bail!("{} is not a regular file", path.display());
    }
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut block = vec![0u8; BLOCK_SIZE];
    loop {
        let n = file
            .read(&mut block)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Fingerprints seen so far in one directory run.
#[derive(Debug, Default)]
pub struct FingerprintSet {
    seen: HashSet<String>,
}

impl FingerprintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.seen.contains(fingerprint)
    }

    pub fn insert(&mut self, fingerprint: String) {
        self.seen.insert(fingerprint);
    }
}
