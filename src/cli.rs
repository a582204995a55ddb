use clap::Parser;
use std::path::PathBuf;

use crate::export;

/// gitree – ignore-aware project tree with interactive selection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root to scan (defaults to CWD); must contain a .gitignore
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Limit recursion depth; at the limit a directory shows a single `…`
    /// placeholder child
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,

    /// Use ASCII tree characters instead of Unicode
    #[arg(long)]
    pub ascii: bool,

    /// Omit directories that contain no visible files
    #[arg(long)]
    pub files_only: bool,

    /// Include hidden entries (still subject to .gitignore)
    #[arg(long)]
    pub hidden: bool,

    /// Post-filter include glob, gitignore-style (repeatable)
    #[arg(long = "match", value_name = "GLOB")]
    pub match_globs: Vec<String>,

    /// Post-filter exclude glob, gitignore-style (repeatable)
    #[arg(long = "ignore", value_name = "GLOB")]
    pub ignore_globs: Vec<String>,

    /// Run the interactive selection TUI after printing the tree
    #[arg(long)]
    pub ui: bool,

    /// Export artifact path
    #[arg(long, value_name = "FILE", default_value = export::DEFAULT_EXPORT_FILE)]
    pub output: PathBuf,

    /// Copy the export text to the clipboard instead of writing a file
    #[arg(long)]
    pub clipboard: bool,
}
