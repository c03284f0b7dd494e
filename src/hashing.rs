use std::fmt::Display;
use std::str::FromStr;

use sha1::{Digest, Sha1};

use crate::object::{ObjectType, envelope};
use crate::{Error, Result};

pub const HASH_BYTE_LEN: usize = 20;
pub const HASH_HEX_LEN: usize = HASH_BYTE_LEN * 2;

/// Length of the hex prefix used as the name of an object's subdirectory.
const PREFIX_LEN: usize = 2;

/// The SHA1 identifier of an object, computed over its whole envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; HASH_BYTE_LEN]);

impl Hash {
    /// Returns the hash of the envelope `{kind} {len}\0{payload}`.
    pub fn compute(kind: ObjectType, payload: &[u8]) -> Self {
        Self::of(&envelope::encode(kind, payload))
    }

    /// Returns the SHA1 hash for the data passed, without any framing.
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First two hex characters, the name of the folder the object is stored in.
    pub fn prefix(&self) -> String {
        self.to_hex()[..PREFIX_LEN].to_owned()
    }

    /// Remaining 38 hex characters, the name of the object file.
    pub fn remainder(&self) -> String {
        self.to_hex()[PREFIX_LEN..].to_owned()
    }

    pub fn as_bytes(&self) -> &[u8; HASH_BYTE_LEN] {
        &self.0
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = Error;

    /// Parses a 40 character hex string. Upper case digits are accepted.
    fn from_str(s: &str) -> Result<Self> {
        if s.len() != HASH_HEX_LEN {
            return Err(Error::InvalidDigest(s.to_owned()));
        }
        let mut bytes = [0; HASH_BYTE_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::InvalidDigest(s.to_owned()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; HASH_BYTE_LEN]> for Hash {
    fn from(value: [u8; HASH_BYTE_LEN]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for Hash {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        let bytes: [u8; HASH_BYTE_LEN] = value
            .try_into()
            .map_err(|_| Error::InvalidDigest(hex::encode(value)))?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Tests
