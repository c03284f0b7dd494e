mod cat_file;
mod commit_tree;
mod hash_object;
mod init;
mod ls_tree;
mod mktree;

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use gitobj::Hash;

use cat_file::cat_file;
use commit_tree::commit_tree;
use hash_object::hash_object;
use init::init;
use ls_tree::ls_tree;
use mktree::mktree;

use crate::args::{Args, Command};
use crate::config::Config;

/// What a command prints when it succeeds.
#[derive(Debug, PartialEq, Eq)]
pub enum Output {
    /// Text for the user, a newline is added if it does not end with one
    Message(String),
    /// Bytes written to stdout exactly as they are
    Raw(Vec<u8>),
}

impl From<String> for Output {
    fn from(value: String) -> Self {
        Output::Message(value)
    }
}

/// Calls the corresponding function to perform every command variant.
///
/// # Return
///
/// The output to show to the user
///
/// # Errors
///
/// This function will fail if any of the executed commands return an error.
pub fn execute_command(args: &Args) -> Result<Output> {
    let git_dir = args.git_dir.as_deref();

    match &args.command {
        Command::Init { path } => {
            init(&Config::resolve_repository(git_dir, path.as_deref())?).map(Output::from)
        }
        Command::HashObject { write, files } => {
            // Hashing alone does not need a repository
            let store = if *write {
                Some(open_repository(git_dir)?.store())
            } else {
                None
            };
            hash_object(store.as_ref(), files).map(Output::from)
        }
        Command::CatFile { kind, pretty, hash } => {
            cat_file(&open_repository(git_dir)?, hash, *kind && !*pretty)
        }
        Command::Mktree { entries } => mktree(&open_repository(git_dir)?, entries).map(Output::from),
        Command::CommitTree {
            tree,
            parents,
            message,
        } => commit_tree(&open_repository(git_dir)?, tree, parents, message).map(Output::from),
        Command::LsTree { hash } => ls_tree(&open_repository(git_dir)?, hash).map(Output::from),
    }
}

/// Loads the configuration, failing if it does not point to an existing repository.
fn open_repository(git_dir: Option<&Path>) -> Result<Config> {
    let config = Config::load(git_dir).context("could not load configuration")?;
    if !config.store().objects_dir().is_dir() {
        bail!("{:?} is not a repository", config.repository_path);
    }
    Ok(config)
}

/// Parses a hash given as an argument.
fn parse_hash(hash: &str) -> Result<Hash> {
    Hash::from_str(hash).context(format!("{:?} is not a valid object hash", hash))
}
