use std::collections::HashSet;

use crate::ranges::RangeIndex;
use crate::snapshot::TreeSnapshot;

/// The set of selected *file* paths. Directories are never stored; their
/// state is always derived from descendant coverage.
#[derive(Debug, Default)]
pub struct SelectionSet {
    selected: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, rel_path: &str) -> bool {
        !rel_path.is_empty() && self.selected.contains(rel_path)
    }

    /// Idempotent; empty paths are silently ignored.
    pub fn select_many<I>(&mut self, rel_paths: I)
    where
        I: IntoIterator<Item = String>,
    {
        for path in rel_paths {
            if !path.is_empty() {
                self.selected.insert(path);
            }
        }
    }

    /// Idempotent; unknown and empty paths are silently ignored.
    pub fn deselect_many<'a, I>(&mut self, rel_paths: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for path in rel_paths {
            self.selected.remove(path);
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}

/// A directory's descendant-file tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryCoverage {
    pub total_files: usize,
    pub selected_files: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageState {
    None,
    Partial,
    Full,
}

impl DirectoryCoverage {
    pub fn state(&self) -> CoverageState {
        if self.selected_files == 0 {
            CoverageState::None
        } else if self.selected_files == self.total_files {
            CoverageState::Full
        } else {
            CoverageState::Partial
        }
    }
}

/// Aggregated selection counts for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSummary {
    pub selected_files: usize,
    pub full_dirs: usize,
    pub partial_dirs: usize,
}

impl SelectionSummary {
    /// Aggregate full/partial directory counts over the given line set —
    /// the whole snapshot or just the currently visible lines. The
    /// on-screen status uses the visible set, so a collapsed directory
    /// still shows its own tri-state while the directories hidden inside
    /// it are not counted separately.
    pub fn compute<I>(
        snapshot: &TreeSnapshot,
        index: &RangeIndex,
        selection: &SelectionSet,
        lines: I,
    ) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut full_dirs = 0;
        let mut partial_dirs = 0;
        for i in lines {
            let Some(node) = snapshot.get(i) else { continue };
            // The root is the project itself, not a subdirectory tally.
            if !node.is_directory || i == 0 {
                continue;
            }
            match index.coverage(snapshot, i, selection).state() {
                CoverageState::Full => full_dirs += 1,
                CoverageState::Partial => partial_dirs += 1,
                CoverageState::None => {}
            }
        }
        Self {
            selected_files: selection.selected_count(),
            full_dirs,
            partial_dirs,
        }
    }
}
