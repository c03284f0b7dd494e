use crate::hashing::Hash;
use crate::object::ObjectType;

/// Enum intended to represent all the different error types the object store can return.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid digest {0:?}, expected 40 hexadecimal characters")]
    InvalidDigest(String),
    #[error("object {0} does not exist")]
    ObjectNotFound(Hash),
    #[error("object {hash} is corrupt: {reason}")]
    CorruptObject { hash: Hash, reason: String },
    #[error("malformed object envelope: {0}")]
    MalformedEnvelope(String),
    #[error("expected a {expected} object but found a {found}")]
    UnexpectedKind {
        expected: ObjectType,
        found: ObjectType,
    },
    #[error("truncated tree: {0}")]
    TruncatedTree(String),
    #[error("malformed commit: {0}")]
    MalformedCommit(String),
    #[error("invalid tree entry: {0}")]
    InvalidTreeEntry(String),
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    #[error("error working with time: {0}")]
    Time(String),
    #[error("i/o operation error: {0:?}")]
    IO(#[from] std::io::Error),
}

impl From<time::error::ComponentRange> for Error {
    fn from(value: time::error::ComponentRange) -> Self {
        Error::Time(value.to_string())
    }
}

/// Abstraction of the result type where the error is always an Error from this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
