use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tidykit",
    about = "File management toolkit: organize, search, compress, report",
    version,
    long_about = "TidyKit bundles everyday file chores into one tool:\n\
                  create/read/write files, rename, copy, move and delete,\n\
                  recursive search by name, extension or content keyword,\n\
                  zip compression with integrity-checked extraction,\n\
                  folder organization into category subfolders, and a\n\
                  storage report with temp cleanup."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty file (its folder must exist)
    Create {
        path: PathBuf,
    },

    /// Print a text file's contents
    Read {
        path: PathBuf,
    },

    /// Write a line of text to a file, replacing what was there
    Write {
        path: PathBuf,
        text: String,
    },

    /// Append a line of text to an existing file
    Append {
        path: PathBuf,
        text: String,
    },

    /// Rename a file or folder
    Rename {
        src: PathBuf,
        dst: PathBuf,
    },

    /// Delete a file or folder
    Delete {
        path: PathBuf,

        /// Send to the recycle bin instead of deleting outright
        #[arg(long)]
        trash: bool,
    },

    /// Copy a file or folder (directories merge into existing targets)
    Copy {
        src: PathBuf,
        dst: PathBuf,
    },

    /// Move a file or folder
    Move {
        src: PathBuf,
        dst: PathBuf,
    },

    /// Search a directory tree for files
    Search(SearchArgs),

    /// Compress a file or folder into a zip archive
    Compress {
        src: PathBuf,

        /// Archive path; `.zip` is appended when missing
        dst: PathBuf,
    },

    /// Verify and extract a zip archive
    Extract {
        src: PathBuf,
        dst: PathBuf,
    },

    /// Sort a folder's files into category subfolders
    Organize(OrganizeArgs),

    /// Show volume usage and offer temp-folder cleanup
    Storage,

    /// Show configuration
    Config {
        /// Write the default config file if none exists
        #[arg(long)]
        init: bool,
    },

    /// Run the interactive menu
    Menu,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    pub directory: PathBuf,

    /// Case-insensitive substring of the file name
    #[arg(short, long)]
    pub name: Option<String>,

    /// File name suffix, e.g. `.txt` or `.tar.gz` (leading dot optional)
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Case-insensitive substring of the file's text content
    #[arg(short, long)]
    pub keyword: Option<String>,
}

#[derive(Args, Debug)]
pub struct OrganizeArgs {
    pub folder: PathBuf,

    /// Preview the moves without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Zip the moved files into a timestamped archive afterwards
    #[arg(long)]
    pub bundle: bool,

    /// Where the bundle archive goes (default: <folder>/Compressed)
    #[arg(long, requires = "bundle")]
    pub bundle_dest: Option<PathBuf>,
}
