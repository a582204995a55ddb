use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Yields the immediate children of a directory as `(path, is_directory)`
/// pairs in a stable, deterministic order. Abstracted so the snapshot
/// builder can be driven by a stub in tests.
pub trait Scanner {
    fn children(&self, dir: &Path) -> Vec<(PathBuf, bool)>;
}

/// Filesystem-backed scanner. Entries come back sorted by file name so
/// repeated runs over the same tree produce identical snapshots.
pub struct FsScanner;

impl Scanner for FsScanner {
    fn children(&self, dir: &Path) -> Vec<(PathBuf, bool)> {
        let mut entries = Vec::new();
        for result in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            match result {
                Ok(entry) => {
                    let is_dir = entry.file_type().is_dir();
                    entries.push((entry.into_path(), is_dir));
                }
                Err(e) => eprintln!("⚠️  Warning during scan: {}", e),
            }
        }
        entries
    }
}

/// Hidden entries are dotfiles; the root itself never counts as hidden.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
