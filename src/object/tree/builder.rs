use std::collections::BTreeMap;

use crate::fs::object::ObjectStore;
use crate::hashing::Hash;
use crate::object::ObjectType;
use crate::byteable::Byteable;
use crate::{Error, Result};

use super::{DIRECTORY_MODE, Tree, TreeEntry};

/// Returns the canonical tree for `entries`: a copy of them sorted by name, comparing bytes.
///
/// The sort is stable, so entries sharing a name keep the order they were given in. The tree is
/// not written anywhere, that is done by `ObjectStore`.
pub fn build_tree(entries: &[TreeEntry]) -> Tree {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.name().as_bytes().cmp(b.name().as_bytes()));
    Tree::from_sorted(sorted)
}

#[derive(Debug, Default)]
pub struct TreeBuilder {
    entries: Vec<TreeEntry>,
    /// Every entry on the map represents a subtree, keyed by its name inside this tree.
    subtrees: BTreeMap<String, TreeBuilder>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry that lives directly in this tree.
    pub fn add_entry(&mut self, entry: TreeEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Adds an object by its slash separated path. Every directory component of the path creates
    /// (or reuses) a subtree, and the last component becomes an entry of the innermost one.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidTreeEntry` if the path has an empty component or the last
    /// component is not a valid entry.
    pub fn insert_path(&mut self, mode: &str, path: &str, hash: Hash) -> Result<&mut Self> {
        match path.split_once('/') {
            None => {
                self.add_entry(TreeEntry::new(mode, path, hash)?);
            }
            Some((dir, rest)) => {
                if dir.is_empty() {
                    return Err(Error::InvalidTreeEntry(format!(
                        "path {:?} has an empty component",
                        path
                    )));
                }
                self.subtrees
                    .entry(dir.to_owned())
                    .or_default()
                    .insert_path(mode, rest, hash)?;
            }
        }
        Ok(self)
    }

    /// Returns the canonical tree of the entries added directly to this builder.
    ///
    /// Subtrees are not included since their hashes are only known once they are written, use
    /// `write` for nested structures.
    pub fn build(&self) -> Tree {
        build_tree(&self.entries)
    }

    /// Writes every subtree (deepest first) and then this tree, returning this tree's hash.
    ///
    /// # Errors
    ///
    /// This function will fail if any of the trees could not be written to `store`.
    pub fn write(&self, store: &ObjectStore) -> Result<Hash> {
        let mut entries = self.entries.clone();
        for (name, subtree) in self.subtrees.iter() {
            let hash = subtree.write(store)?;
            entries.push(TreeEntry::new(DIRECTORY_MODE, name.as_str(), hash)?);
        }

        let tree = build_tree(&entries);
        let hash = store.write(ObjectType::Tree, &tree.as_bytes()?)?;
        log::debug!("wrote tree {} with {} entries", hash, tree.len());
        Ok(hash)
    }
}
