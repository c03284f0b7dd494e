use std::fmt::Display;

use crate::byteable::Byteable;
use crate::hashing::Hash;
use crate::Result;

use super::ObjectType;
use super::commit::Commit;
use super::tree::Tree;

/// Represents the different type of objects there can be: Blobs, Commits and Trees, with methods
/// to move between them and their raw payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Vec<u8>),
    Tree(Tree),
    Commit(Commit),
}

impl Object {
    pub fn kind(&self) -> ObjectType {
        match self {
            Object::Blob(_) => ObjectType::Blob,
            Object::Tree(_) => ObjectType::Tree,
            Object::Commit(_) => ObjectType::Commit,
        }
    }

    /// Returns the payload of this object, the bytes that go after the envelope header.
    pub fn payload(&self) -> Result<Vec<u8>> {
        match self {
            Object::Blob(data) => Ok(data.clone()),
            Object::Tree(tree) => tree.as_bytes(),
            Object::Commit(commit) => commit.as_bytes(),
        }
    }

    /// Parses `payload` with the grammar of `kind`.
    pub fn from_parts(kind: ObjectType, payload: &[u8]) -> Result<Self> {
        Ok(match kind {
            ObjectType::Blob => Object::Blob(payload.to_vec()),
            ObjectType::Tree => Object::Tree(Tree::from_bytes(payload)?),
            ObjectType::Commit => Object::Commit(Commit::from_bytes(payload)?),
        })
    }

    pub fn hash(&self) -> Result<Hash> {
        Ok(Hash::compute(self.kind(), &self.payload()?))
    }
}

impl Display for Object {
    /// Pretty prints the object, blobs are shown as (lossy) text.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Blob(data) => f.write_str(&String::from_utf8_lossy(data)),
            Object::Tree(tree) => Display::fmt(tree, f),
            Object::Commit(commit) => Display::fmt(commit, f),
        }
    }
}

impl From<Tree> for Object {
    fn from(value: Tree) -> Self {
        Object::Tree(value)
    }
}

impl From<Commit> for Object {
    fn from(value: Commit) -> Self {
        Object::Commit(value)
    }
}
