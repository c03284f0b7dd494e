use std::path::{Path, PathBuf};

pub struct Constants;

impl Constants {
    pub const REPOSITORY_FOLDER_NAME: &str = ".git";
    pub const OBJECTS_FOLDER_NAME: &str = "objects";
    pub const REFS_FOLDER_NAME: &str = "refs";
    pub const HEADS_FOLDER_NAME: &str = "heads";
    pub const HEAD_CONTENT_HEADER: &str = "ref: ";
    pub const DEFAULT_BRANCH_NAME: &str = "main";
    pub const HEAD_FILE_NAME: &str = "HEAD";

    /// The location of the .git folder inside of `working_tree_root`
    pub fn repository_path(working_tree_root: &Path) -> PathBuf {
        working_tree_root.join(Constants::REPOSITORY_FOLDER_NAME)
    }

    pub fn objects_path(repository_path: &Path) -> PathBuf {
        repository_path.join(Constants::OBJECTS_FOLDER_NAME)
    }

    pub fn refs_path(repository_path: &Path) -> PathBuf {
        repository_path.join(Constants::REFS_FOLDER_NAME)
    }

    pub fn heads_path(repository_path: &Path) -> PathBuf {
        Constants::refs_path(repository_path).join(Constants::HEADS_FOLDER_NAME)
    }

    pub fn head_path(repository_path: &Path) -> PathBuf {
        repository_path.join(Constants::HEAD_FILE_NAME)
    }

    pub fn default_head_content() -> String {
        format!(
            "{}{}/{}/{}\n",
            Constants::HEAD_CONTENT_HEADER,
            Constants::REFS_FOLDER_NAME,
            Constants::HEADS_FOLDER_NAME,
            Constants::DEFAULT_BRANCH_NAME
        )
    }
}
