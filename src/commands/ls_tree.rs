use anyhow::{Context, Result};

use super::parse_hash;
use crate::config::Config;

pub fn ls_tree(config: &Config, hash: &str) -> Result<String> {
    let hash = parse_hash(hash)?;
    let tree = config
        .store()
        .read_tree(hash)
        .context(format!("could not read tree {}", hash))?;
    Ok(tree.to_string())
}
