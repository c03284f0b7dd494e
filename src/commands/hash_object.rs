use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use gitobj::{Hash, ObjectStore, ObjectType};

/// Returns the blob hash of every file in `files`, one per line, storing them if a `store` is
/// given.
pub fn hash_object(store: Option<&ObjectStore>, files: &[PathBuf]) -> Result<String> {
    let mut hashes = Vec::with_capacity(files.len());

    for path in files {
        let data = fs::read(path).context(format!("could not read file {:?}", path))?;
        let hash = match store {
            Some(store) => store
                .write(ObjectType::Blob, &data)
                .context(format!("could not write blob for {:?}", path))?,
            None => Hash::compute(ObjectType::Blob, &data),
        };
        hashes.push(hash.to_string());
    }

    Ok(hashes.join("\n"))
}
