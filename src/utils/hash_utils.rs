use std::path::Path;

use anyhow::Result;
use log::trace;
use sha2::{Digest, Sha256};

use super::file_utils;

/// Calculate SHA-256 hash of a string
pub fn hash_string(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Calculate SHA-256 hash of a file
pub fn hash_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    trace!("Calculating hash for file: {}", path.display());

    let content = file_utils::read_file_to_string(path)?;
    Ok(hash_string(&content))
}
