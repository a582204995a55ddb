use std::collections::HashSet;

use crate::ranges::RangeIndex;
use crate::snapshot::TreeSnapshot;

/// Per-directory expanded/collapsed state, keyed by snapshot index.
///
/// The root (index 0) is special: it is never stored and always answers
/// with the configured default. Every other directory is collapsed until
/// explicitly expanded.
#[derive(Debug)]
pub struct ExpandState {
    expanded: HashSet<usize>,
    root_expanded: bool,
}

impl ExpandState {
    pub fn new(root_expanded: bool) -> Self {
        Self {
            expanded: HashSet::new(),
            root_expanded,
        }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        if index == 0 {
            self.root_expanded
        } else {
            self.expanded.contains(&index)
        }
    }

    pub fn expand(&mut self, index: usize) {
        if index > 0 {
            self.expanded.insert(index);
        }
    }

    pub fn collapse(&mut self, index: usize) {
        if index > 0 {
            self.expanded.remove(&index);
        }
    }

    pub fn toggle(&mut self, index: usize) {
        if index > 0 && !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
    }
}

/// The ordered list of snapshot indexes currently visible: one forward
/// pass keeping, per open ancestor level, whether that ancestor hides its
/// descendants. In files-only mode directories additionally need at least
/// one reachable descendant file.
pub fn visible_lines(
    snapshot: &TreeSnapshot,
    expand: &ExpandState,
    files_only: bool,
    index: &RangeIndex,
) -> Vec<usize> {
    let mut visible = Vec::new();
    // hidden_stack[d] covers the open directory at depth d; the flag
    // already ORs in every collapsed ancestor above it.
    let mut hidden_stack: Vec<bool> = Vec::new();

    for (i, node) in snapshot.nodes().iter().enumerate() {
        hidden_stack.truncate(node.depth);
        let under_collapsed = hidden_stack.last().copied().unwrap_or(false);

        if node.depth == 0 || !under_collapsed {
            let shown = if files_only && node.is_directory {
                dir_has_visible_files(snapshot, expand, index, i)
            } else {
                true
            };
            if shown {
                visible.push(i);
            }
        }

        if node.is_directory {
            hidden_stack.push(under_collapsed || !expand.is_expanded(i));
        }
    }
    visible
}

/// Whether a directory contributes at least one file reachable through an
/// unbroken chain of expanded directories. A collapsed directory
/// contributes nothing, regardless of its actual contents. Kept separate
/// from `visible_lines` so the files-only rule can be checked on its own.
pub fn dir_has_visible_files(
    snapshot: &TreeSnapshot,
    expand: &ExpandState,
    index: &RangeIndex,
    dir: usize,
) -> bool {
    let Some(base) = snapshot.get(dir) else {
        return false;
    };
    if !base.is_directory || !expand.is_expanded(dir) {
        return false;
    }

    let mut hidden_stack: Vec<bool> = Vec::new();
    for i in index.descendants(dir) {
        let Some(node) = snapshot.get(i) else { continue };
        // Depth relative to the directory under test; 0 = direct child.
        let rel_depth = node.depth - base.depth - 1;
        hidden_stack.truncate(rel_depth);
        let hidden = hidden_stack.last().copied().unwrap_or(false);

        if node.is_directory {
            hidden_stack.push(hidden || !expand.is_expanded(i));
        } else if !hidden {
            return true;
        }
    }
    false
}
