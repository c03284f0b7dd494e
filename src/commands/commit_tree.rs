use anyhow::{Context, Result};
use gitobj::Object;
use gitobj::object::commit::{Commit, Signature};

use super::parse_hash;
use crate::config::Config;

/// Writes a commit for `tree` with the given parents (in order), returning its hash.
///
/// # Errors
///
/// This function will fail if any hash is invalid, `tree` is not a stored tree or a parent is not
/// a stored commit.
pub fn commit_tree(
    config: &Config,
    tree: &str,
    parents: &[String],
    message: &str,
) -> Result<String> {
    let store = config.store();

    let tree = parse_hash(tree)?;
    store
        .read_tree(tree)
        .context(format!("{} is not a stored tree", tree))?;

    let mut parent_hashes = Vec::with_capacity(parents.len());
    for p in parents {
        let hash = parse_hash(p)?;
        store
            .read_commit(hash)
            .context(format!("parent {} is not a stored commit", hash))?;
        parent_hashes.push(hash);
    }

    let author = Signature::now(&config.author.name, &config.author.email)
        .context("invalid author")?;
    let committer = Signature::now(&config.committer.name, &config.committer.email)
        .context("invalid committer")?;

    let mut message = message.to_owned();
    if !message.ends_with('\n') {
        message.push('\n');
    }

    let commit = Commit::new(tree, parent_hashes, author, committer, message);
    let hash = store
        .write_object(&Object::from(commit))
        .context("could not write commit object")?;

    Ok(hash.to_string())
}
