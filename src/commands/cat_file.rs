use anyhow::{Context, Result};
use gitobj::ObjectType;
use gitobj::byteable::Byteable;
use gitobj::object::tree::Tree;

use super::{Output, parse_hash};
use crate::config::Config;

/// Returns the type of the object with `hash` if `kind_only` is set, or its content otherwise.
///
/// Trees are listed one entry per line, blobs and commits are returned as their raw payload.
pub fn cat_file(config: &Config, hash: &str, kind_only: bool) -> Result<Output> {
    let hash = parse_hash(hash)?;
    let store = config.store();

    let (kind, payload) = store.read(hash).context("could not read object")?;
    if kind_only {
        return Ok(Output::Message(kind.to_string()));
    }

    match kind {
        ObjectType::Tree => {
            let tree = Tree::from_bytes(&payload).context(format!("could not parse tree {}", hash))?;
            Ok(Output::Message(tree.to_string()))
        }
        ObjectType::Blob | ObjectType::Commit => Ok(Output::Raw(payload)),
    }
}
