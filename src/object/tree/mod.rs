pub mod builder;
#[allow(clippy::module_inception)]
mod tree;

pub use builder::{TreeBuilder, build_tree};
pub use tree::{Tree, TreeEntry, decode_tree};

pub const FILE_MODE: &str = "100644";
pub const EXECUTABLE_MODE: &str = "100755";
pub const SYMLINK_MODE: &str = "120000";
pub const DIRECTORY_MODE: &str = "40000";
