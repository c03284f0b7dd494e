use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::Compression;
use gitobj::{Constants, ObjectStore};
use path_clean::PathClean;

/// Identity written in the commits made from the command line.
#[derive(Debug, Clone)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Runtime settings, read from the environment (and a `.env` file if there is one).
#[derive(Debug)]
pub struct Config {
    pub repository_path: PathBuf,
    pub author: Identity,
    pub committer: Identity,
    pub compression: Compression,
}

impl Config {
    pub const DIR_VAR: &str = "GITOBJ_DIR";
    pub const AUTHOR_NAME_VAR: &str = "GITOBJ_AUTHOR_NAME";
    pub const AUTHOR_EMAIL_VAR: &str = "GITOBJ_AUTHOR_EMAIL";
    pub const COMMITTER_NAME_VAR: &str = "GITOBJ_COMMITTER_NAME";
    pub const COMMITTER_EMAIL_VAR: &str = "GITOBJ_COMMITTER_EMAIL";
    pub const COMPRESSION_VAR: &str = "GITOBJ_COMPRESSION";

    const DEFAULT_NAME: &str = "gitobj";
    const DEFAULT_EMAIL: &str = "gitobj@localhost";

    /// Builds the configuration, `git_dir` takes precedence over `GITOBJ_DIR`.
    ///
    /// # Errors
    ///
    /// This function will fail if the current directory could not be read or the compression
    /// level is not a number between 0 and 9.
    pub fn load(git_dir: Option<&Path>) -> Result<Self> {
        let repository_path = Config::resolve_repository(git_dir, None)?;

        let author = Identity {
            name: var(Config::AUTHOR_NAME_VAR).unwrap_or_else(|| Config::DEFAULT_NAME.to_owned()),
            email: var(Config::AUTHOR_EMAIL_VAR)
                .unwrap_or_else(|| Config::DEFAULT_EMAIL.to_owned()),
        };
        let committer = Identity {
            name: var(Config::COMMITTER_NAME_VAR).unwrap_or_else(|| author.name.clone()),
            email: var(Config::COMMITTER_EMAIL_VAR).unwrap_or_else(|| author.email.clone()),
        };

        let compression = match var(Config::COMPRESSION_VAR) {
            Some(level) => {
                let level: u32 = level
                    .parse()
                    .context(format!("{} must be a number", Config::COMPRESSION_VAR))?;
                if level > 9 {
                    anyhow::bail!("{} must be between 0 and 9", Config::COMPRESSION_VAR)
                }
                Compression::new(level)
            }
            None => Compression::default(),
        };

        log::debug!("using repository {:?}", repository_path);

        Ok(Self {
            repository_path,
            author,
            committer,
            compression,
        })
    }

    /// Returns the repository folder: `git_dir` if given, then `GITOBJ_DIR`, then the .git folder
    /// inside `folder` (or the current directory).
    pub fn resolve_repository(git_dir: Option<&Path>, folder: Option<&Path>) -> Result<PathBuf> {
        resolve_repository_with(git_dir, var(Config::DIR_VAR), folder)
    }

    pub fn store(&self) -> ObjectStore {
        ObjectStore::in_repository(&self.repository_path).with_compression(self.compression)
    }
}

fn resolve_repository_with(
    git_dir: Option<&Path>,
    env_dir: Option<String>,
    folder: Option<&Path>,
) -> Result<PathBuf> {
    let path = match (git_dir, env_dir, folder) {
        (Some(git_dir), _, _) => git_dir.to_owned(),
        (None, Some(env_dir), _) => PathBuf::from(env_dir),
        (None, None, Some(folder)) => Constants::repository_path(folder),
        (None, None, None) => Constants::repository_path(
            &std::env::current_dir().context("failed to get current dir")?,
        ),
    };
    Ok(path.clean())
}

fn var(key: &str) -> Option<String> {
    dotenvy::var(key).ok().filter(|value| !value.is_empty())
}
