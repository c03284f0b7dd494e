use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use gitobj::Constants;

/// Creates a new repository in `repository_path`, usually the .git folder of a project.
///
/// # Errors
///
/// This function will fail if any of the operations related with the creation of directories and
/// files fail.
pub fn init(repository_path: &Path) -> Result<String> {
    if fs::exists(repository_path).context("could not verify folder existance when initializing")? {
        return Ok(format!("{:?} is already a repository", repository_path));
    }

    for p in [
        Constants::objects_path(repository_path),
        Constants::heads_path(repository_path),
    ] {
        fs::create_dir_all(&p).context(format!("could not create repository folder {:?}", p))?;
    }

    fs::write(
        Constants::head_path(repository_path),
        Constants::default_head_content(),
    )
    .context("could not write to HEAD when initializing")?;

    log::info!("initialized repository at {:?}", repository_path);

    Ok(format!(
        "{} {:?}",
        "Initialized empty repository in".green(),
        repository_path
    ))
}
