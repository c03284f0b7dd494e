use std::fmt::Display;
use std::io::{Cursor, Read, Write};

use byteorder::WriteBytesExt;

use crate::byteable::Byteable;
use crate::hashing::{HASH_BYTE_LEN, Hash};
use crate::object::{NULL_BYTE, ObjectType, SPACE_BYTE, envelope};
use crate::utils::cursor::EasyRead;
use crate::{Error, Result};

use super::DIRECTORY_MODE;

const SUBMODULE_MODE: &str = "160000";

/// Struct that represents a single tree entry in a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    mode: String,
    name: String,
    hash: Hash,
}

impl TreeEntry {
    /// Creates a tree entry, validating that:
    /// - `mode` is a non empty string of octal digits.
    /// - `name` is not empty and has no null bytes or forward slashes.
    pub fn new(mode: impl Into<String>, name: impl Into<String>, hash: Hash) -> Result<Self> {
        let mode = mode.into();
        let name = name.into();

        if mode.is_empty() || !mode.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(Error::InvalidTreeEntry(format!(
                "mode {:?} is not an octal number",
                mode
            )));
        }
        if name.is_empty() {
            return Err(Error::InvalidTreeEntry("name is empty".into()));
        }
        if name.contains(['\0', '/']) {
            return Err(Error::InvalidTreeEntry(format!(
                "name {:?} contains a null byte or a forward slash",
                name
            )));
        }

        Ok(Self { mode, name, hash })
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// The kind of object this entry points to, inferred from its mode.
    pub fn kind(&self) -> ObjectType {
        match self.mode.as_str() {
            DIRECTORY_MODE => ObjectType::Tree,
            SUBMODULE_MODE => ObjectType::Commit,
            _ => ObjectType::Blob,
        }
    }
}

impl Display for TreeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:0>6} {} {}\t{}",
            self.mode,
            self.kind(),
            self.hash,
            self.name
        )
    }
}

/// A directory listing. Trees built through `build_tree` or `TreeBuilder` have their entries
/// sorted by name; decoded trees keep the order they were stored in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Wraps entries that are already in the order they must be encoded in.
    pub(super) fn from_sorted(entries: Vec<TreeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TreeEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hash(&self) -> Result<Hash> {
        Ok(Hash::compute(ObjectType::Tree, &self.as_bytes()?))
    }
}

impl Byteable for Tree {
    /// Will encode the entries of this tree, one after the other, with this format:
    ///
    /// "`{mode} {name}\0{hash}`"
    ///
    /// The hash is stored as its 20 raw bytes.
    fn as_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        for e in self.entries.iter() {
            cursor.write_all(e.mode.as_bytes())?;
            cursor.write_u8(SPACE_BYTE)?;
            cursor.write_all(e.name.as_bytes())?;
            cursor.write_u8(NULL_BYTE)?;
            cursor.write_all(e.hash.as_ref())?;
        }
        Ok(cursor.into_inner())
    }

    /// Parses a tree payload. There are no separators between entries, so every entry is read
    /// sequentially: mode until a space, name until a null byte, and then 20 bytes of hash.
    ///
    /// # Errors
    ///
    /// - `Error::TruncatedTree` if a delimiter or part of a hash is missing.
    /// - `Error::InvalidTreeEntry` if the mode or name read are not valid.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let mut entries = Vec::new();

        while !cursor.is_exhausted() {
            let mode = cursor
                .read_until_checked(SPACE_BYTE)
                .ok_or_else(|| Error::TruncatedTree("expected space after entry mode".into()))?;

            let name = cursor.read_until_checked(NULL_BYTE).ok_or_else(|| {
                Error::TruncatedTree("expected null byte after entry name".into())
            })?;

            let mut hash_buf = [0; HASH_BYTE_LEN];
            cursor.read_exact(&mut hash_buf).map_err(|_| {
                Error::TruncatedTree(format!("expected {} bytes of entry hash", HASH_BYTE_LEN))
            })?;

            let mode = String::from_utf8(mode)
                .map_err(|_| Error::InvalidTreeEntry("mode is not valid utf-8".into()))?;
            let name = String::from_utf8(name)
                .map_err(|_| Error::InvalidTreeEntry("name is not valid utf-8".into()))?;

            entries.push(TreeEntry::new(mode, name, Hash::from(hash_buf))?);
        }

        Ok(Self { entries })
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for e in self.entries.iter() {
            writeln!(f, "{}", e)?;
        }
        Ok(())
    }
}

/// Reads an uncompressed envelope and parses its payload as a tree.
///
/// # Errors
///
/// Fails with `Error::UnexpectedKind` if the envelope holds another kind of object.
pub fn decode_tree(bytes: &[u8]) -> Result<Tree> {
    let payload = envelope::decode_expecting(ObjectType::Tree, bytes)?;
    Tree::from_bytes(payload)
}
