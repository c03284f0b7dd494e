use anyhow::{Context, Result, anyhow};
use gitobj::ObjectType;
use gitobj::byteable::Byteable;
use gitobj::object::tree::{TreeEntry, build_tree};

use super::parse_hash;
use crate::config::Config;

/// Builds a tree from entries with the format `{mode} {name} {hash}`, writes it and returns its
/// hash. Names may contain spaces.
pub fn mktree(config: &Config, entries: &[String]) -> Result<String> {
    let mut tree_entries = Vec::with_capacity(entries.len());
    for e in entries {
        tree_entries.push(parse_entry(e).context(format!("invalid tree entry {:?}", e))?);
    }

    let tree = build_tree(&tree_entries);
    let hash = config
        .store()
        .write(ObjectType::Tree, &tree.as_bytes()?)
        .context("could not write tree object")?;

    Ok(hash.to_string())
}

fn parse_entry(entry: &str) -> Result<TreeEntry> {
    let (mode, rest) = entry
        .split_once(' ')
        .ok_or_else(|| anyhow!("expected mode followed by a space"))?;
    let (name, hash) = rest
        .rsplit_once(' ')
        .ok_or_else(|| anyhow!("expected name and hash separated by a space"))?;
    Ok(TreeEntry::new(mode, name, parse_hash(hash)?)?)
}
