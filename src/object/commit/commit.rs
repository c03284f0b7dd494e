use std::fmt::Display;
use std::str::FromStr;

use crate::byteable::Byteable;
use crate::hashing::Hash;
use crate::object::{ObjectType, envelope};
use crate::{Error, Result};

use super::*;

const HEADERS_END: &[u8] = b"\n\n";

/// A snapshot of a tree, with its history and the people behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    tree: Hash,
    parents: Vec<Hash>,
    author: Signature,
    committer: Signature,
    message: Vec<u8>,
}

impl Commit {
    pub fn new(
        tree: Hash,
        parents: Vec<Hash>,
        author: Signature,
        committer: Signature,
        message: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            tree,
            parents,
            author,
            committer,
            message: message.into(),
        }
    }

    pub fn tree(&self) -> Hash {
        self.tree
    }

    /// Parents in the order they were given when the commit was created.
    pub fn parents(&self) -> &[Hash] {
        &self.parents
    }

    pub fn author(&self) -> &Signature {
        &self.author
    }

    pub fn committer(&self) -> &Signature {
        &self.committer
    }

    /// The raw message bytes, which are not required to be utf-8.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    pub fn hash(&self) -> Result<Hash> {
        Ok(Hash::compute(ObjectType::Commit, &self.as_bytes()?))
    }

    fn headers(&self) -> String {
        let mut headers = format!("{} {}\n", TREE_STR, self.tree);
        for hash in self.parents.iter() {
            headers.push_str(&format!("{} {}\n", PARENT_STR, hash));
        }
        headers.push_str(&format!("{} {}\n", AUTHOR_STR, self.author.format()));
        headers.push_str(&format!("{} {}\n", COMMITTER_STR, self.committer.format()));
        headers
    }

    fn to_bytes(&self) -> Vec<u8> {
        let headers = self.headers();
        let mut bytes = Vec::with_capacity(headers.len() + 1 + self.message.len());
        bytes.extend_from_slice(headers.as_bytes());
        bytes.push(b'\n');
        bytes.extend_from_slice(&self.message);
        bytes
    }
}

impl Byteable for Commit {
    /// Returns the commit as bytes with the following format:
    ///
    /// ```text
    /// tree {tree_hash}
    /// parent {parent_hash}        (zero or more times)
    /// author {name} <{email}> {timestamp} {offset}
    /// committer {name} <{email}> {timestamp} {offset}
    ///
    /// {message}
    /// ```
    ///
    /// The message is written as is, no newline is appended.
    fn as_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_bytes())
    }

    /// Parses a commit payload.
    ///
    /// # Errors
    ///
    /// Fails with `Error::MalformedCommit` if the payload does not follow the expected layout:
    /// missing tree line, unparseable signatures, missing blank line or unknown headers.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        // Header lines are never empty, so the first empty line ends them
        let split = bytes
            .windows(HEADERS_END.len())
            .position(|window| window == HEADERS_END)
            .ok_or_else(|| {
                Error::MalformedCommit("expected blank line between headers and message".into())
            })?;
        let message = &bytes[split + HEADERS_END.len()..];
        let headers = std::str::from_utf8(&bytes[..split])
            .map_err(|_| Error::MalformedCommit("commit headers are not valid utf-8".into()))?;

        let mut lines = headers.split('\n').peekable();

        // tree {tree_hash}
        let tree = lines
            .next()
            .and_then(|line| header_value(line, TREE_STR))
            .ok_or_else(|| {
                Error::MalformedCommit(format!("expected commit to start with {}", TREE_STR))
            })?;
        let tree = parse_hash(tree, TREE_STR)?;

        // parent {parent_hash} (zero or more)
        let mut parents = Vec::new();
        while let Some(parent) = lines.peek().and_then(|line| header_value(*line, PARENT_STR)) {
            parents.push(parse_hash(parent, PARENT_STR)?);
            lines.next();
        }

        let author = lines
            .next()
            .and_then(|line| header_value(line, AUTHOR_STR))
            .ok_or_else(|| Error::MalformedCommit(format!("expected {} line", AUTHOR_STR)))?;
        let author = Signature::from_str(author)?;

        let committer = lines
            .next()
            .and_then(|line| header_value(line, COMMITTER_STR))
            .ok_or_else(|| Error::MalformedCommit(format!("expected {} line", COMMITTER_STR)))?;
        let committer = Signature::from_str(committer)?;

        if let Some(line) = lines.next() {
            return Err(Error::MalformedCommit(format!(
                "unexpected header line {:?}",
                line
            )));
        }

        Ok(Commit {
            tree,
            parents,
            author,
            committer,
            message: message.to_vec(),
        })
    }
}

impl Display for Commit {
    /// Shows the payload, with the message decoded as (lossy) text.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.headers(), String::from_utf8_lossy(&self.message))
    }
}

/// Returns what follows `"{name} "` in `line`, if the line is that header.
fn header_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    line.strip_prefix(name)?.strip_prefix(' ')
}

fn parse_hash(value: &str, header: &str) -> Result<Hash> {
    Hash::from_str(value).map_err(|_| {
        Error::MalformedCommit(format!("{:?} after {} is not a valid hash", value, header))
    })
}

/// Reads an uncompressed envelope and parses its payload as a commit.
///
/// # Errors
///
/// Fails with `Error::UnexpectedKind` if the envelope holds another kind of object.
pub fn decode_commit(bytes: &[u8]) -> Result<Commit> {
    let payload = envelope::decode_expecting(ObjectType::Commit, bytes)?;
    Commit::from_bytes(payload)
}

// Tests
