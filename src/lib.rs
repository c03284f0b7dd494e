//! A content addressable object store laid out like git's `objects` folder.
//!
//! Objects (blobs, trees and commits) are framed in an envelope (`{type} {len}\0{payload}`),
//! identified by the SHA1 hash of that envelope and stored zlib compressed under
//! `objects/{first 2 hex chars}/{remaining 38 hex chars}`.
#![allow(clippy::uninlined_format_args)]

pub mod byteable;
pub mod constants;
pub mod error;
pub mod fs;
pub mod hashing;
pub mod object;
mod utils;

pub use constants::Constants;
pub use error::{Error, Result};
pub use fs::ObjectStore;
pub use hashing::Hash;
pub use object::{Object, ObjectType};
