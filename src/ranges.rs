use std::ops::Range;

use crate::selection::{DirectoryCoverage, SelectionSet};
use crate::snapshot::TreeSnapshot;

/// Precomputed descendant span for every snapshot line.
///
/// Because the snapshot is laid out pre-order, a directory's descendants
/// occupy one contiguous index range right after it. The index is built in
/// a single linear pass with a stack of open directories and is read-only
/// afterwards; lookups are O(1).
#[derive(Debug)]
pub struct RangeIndex {
    spans: Vec<Range<usize>>,
}

impl RangeIndex {
    pub fn build(snapshot: &TreeSnapshot) -> Self {
        let n = snapshot.len();
        let mut spans: Vec<Range<usize>> = (0..n).map(|i| i + 1..i + 1).collect();
        let mut open: Vec<usize> = Vec::new();

        for (i, node) in snapshot.nodes().iter().enumerate() {
            while let Some(&top) = open.last() {
                if snapshot.nodes()[top].depth >= node.depth {
                    spans[top].end = i;
                    open.pop();
                } else {
                    break;
                }
            }
            if node.is_directory {
                open.push(i);
            }
        }
        while let Some(top) = open.pop() {
            spans[top].end = n;
        }

        Self { spans }
    }

    /// Descendant index range of the line at `index`; empty for files,
    /// childless directories, and out-of-bounds indexes.
    pub fn descendants(&self, index: usize) -> Range<usize> {
        self.spans.get(index).cloned().unwrap_or(0..0)
    }

    pub fn has_descendants(&self, index: usize) -> bool {
        !self.descendants(index).is_empty()
    }

    /// Relative paths of all descendant *files* of a directory, in
    /// snapshot order.
    pub fn descendant_file_paths(&self, snapshot: &TreeSnapshot, index: usize) -> Vec<String> {
        self.descendants(index)
            .filter_map(|i| snapshot.get(i))
            .filter(|node| !node.is_directory)
            .map(|node| node.rel_path.clone())
            .collect()
    }

    /// Count descendant files and how many of them are selected. Computed
    /// on demand; the descendant span keeps it O(subtree).
    pub fn coverage(
        &self,
        snapshot: &TreeSnapshot,
        index: usize,
        selection: &SelectionSet,
    ) -> DirectoryCoverage {
        let mut total_files = 0;
        let mut selected_files = 0;
        for i in self.descendants(index) {
            let Some(node) = snapshot.get(i) else { continue };
            if node.is_directory {
                continue;
            }
            total_files += 1;
            if selection.is_selected(&node.rel_path) {
                selected_files += 1;
            }
        }
        DirectoryCoverage {
            total_files,
            selected_files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Node;
    use pretty_assertions::assert_eq;

    fn node(rel: &str, is_dir: bool, depth: usize) -> Node {
        Node {
            rel_path: rel.to_string(),
            display_name: rel.rsplit('/').next().unwrap_or(rel).to_string(),
            is_directory: is_dir,
            depth,
            is_last_sibling: false,
            printed_text: rel.to_string(),
        }
    }

    fn sample() -> TreeSnapshot {
        TreeSnapshot::new(vec![
            node("", true, 0),
            node("docs", true, 1),
            node("docs/c.txt", false, 2),
            node("empty", true, 1),
            node("src", true, 1),
            node("src/a.txt", false, 2),
            node("src/nested", true, 2),
            node("src/nested/b.txt", false, 3),
        ])
    }

    #[test]
    fn spans_cover_contiguous_subtrees() {
        let snapshot = sample();
        let index = RangeIndex::build(&snapshot);
        assert_eq!(index.descendants(0), 1..8);
        assert_eq!(index.descendants(1), 2..3);
        assert_eq!(index.descendants(3), 4..4);
        assert_eq!(index.descendants(4), 5..8);
        assert_eq!(index.descendants(6), 7..8);
        // Files and out-of-bounds lines have no descendants.
        assert!(!index.has_descendants(2));
        assert!(!index.has_descendants(99));
        assert!(!index.has_descendants(3));
    }

    #[test]
    fn single_pass_matches_a_naive_forward_scan() {
        let snapshot = sample();
        let index = RangeIndex::build(&snapshot);
        for (i, node) in snapshot.nodes().iter().enumerate() {
            if !node.is_directory {
                continue;
            }
            let mut end = i + 1;
            while end < snapshot.len() && snapshot.nodes()[end].depth > node.depth {
                end += 1;
            }
            assert_eq!(index.descendants(i), i + 1..end, "directory at {i}");
        }
    }

    #[test]
    fn descendant_file_paths_keep_snapshot_order() {
        let snapshot = sample();
        let index = RangeIndex::build(&snapshot);
        assert_eq!(
            index.descendant_file_paths(&snapshot, 4),
            vec!["src/a.txt", "src/nested/b.txt"]
        );
        assert!(index.descendant_file_paths(&snapshot, 3).is_empty());
    }

    #[test]
    fn coverage_counts_selected_descendant_files() {
        let snapshot = sample();
        let index = RangeIndex::build(&snapshot);
        let mut selection = SelectionSet::new();
        selection.select_many(["src/a.txt".to_string()]);

        let src = index.coverage(&snapshot, 4, &selection);
        assert_eq!((src.total_files, src.selected_files), (2, 1));

        let whole = index.coverage(&snapshot, 0, &selection);
        assert_eq!((whole.total_files, whole.selected_files), (3, 1));
        assert!(whole.selected_files <= whole.total_files);

        let missing = index.coverage(&snapshot, 99, &selection);
        assert_eq!((missing.total_files, missing.selected_files), (0, 0));
    }
}
