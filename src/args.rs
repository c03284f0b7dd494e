use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// Contains the commands passed to the program
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the repository folder, overrides GITOBJ_DIR
    #[arg(long, global = true)]
    pub git_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// A list of subcommands the program can perform
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Creates a new, empty repository
    Init {
        /// Folder the repository is created in, the current one if not set
        path: Option<PathBuf>,
    },

    /// Computes the hash of files as blobs
    HashObject {
        /// Also writes the blobs to the object store
        #[arg(short, long)]
        write: bool,
        files: Vec<PathBuf>,
    },

    /// Shows the object stored with the specified hash
    #[command(group(ArgGroup::new("mode").required(true).args(["kind", "pretty"])))]
    CatFile {
        /// Shows the type of the object
        #[arg(short = 't')]
        kind: bool,
        /// Pretty prints the content of the object
        #[arg(short = 'p')]
        pretty: bool,
        hash: String,
    },

    /// Creates a tree object from entries with the format "{mode} {name} {hash}"
    Mktree { entries: Vec<String> },

    /// Creates a commit object pointing to a tree
    CommitTree {
        /// Hash of the tree of the commit
        tree: String,
        /// Hash of a parent commit, can be repeated
        #[arg(short = 'p', long = "parent")]
        parents: Vec<String>,
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Lists the entries of a tree object
    LsTree { hash: String },
}
