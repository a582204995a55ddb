use std::path::{Path, PathBuf};

use crate::pattern::{GlobSet, IgnoreRules};
use crate::scanner::{self, Scanner};

/// Tree drawing characters for one rendering style.
#[derive(Debug, Clone, Copy)]
pub struct TreeStyle {
    pub vert: &'static str,
    pub mid: &'static str,
    pub last: &'static str,
    pub space: &'static str,
    pub unicode: bool,
}

impl TreeStyle {
    pub const UNICODE: Self = Self {
        vert: "│",
        mid: "├─",
        last: "└─",
        space: " ",
        unicode: true,
    };

    pub const ASCII: Self = Self {
        vert: "|",
        mid: "|--",
        last: "`--",
        space: " ",
        unicode: false,
    };
}

/// One flattened record of the filtered tree, laid out in pre-order.
/// The snapshot is immutable once built; everything downstream (range
/// index, visibility, selection) works on indexes into it.
#[derive(Debug, Clone)]
pub struct Node {
    /// Forward-slash path relative to the scan root; `""` is the root.
    pub rel_path: String,
    pub display_name: String,
    pub is_directory: bool,
    /// Root is depth 0.
    pub depth: usize,
    /// Last among its *surviving* siblings, so branch glyphs stay correct
    /// even when a trailing sibling was filtered out.
    pub is_last_sibling: bool,
    /// The full line as printed, prefix glyphs included.
    pub printed_text: String,
}

#[derive(Debug, Default)]
pub struct TreeSnapshot {
    nodes: Vec<Node>,
}

impl TreeSnapshot {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Filters and limits applied during the snapshot walk.
pub struct WalkOptions<'a> {
    pub rules: &'a IgnoreRules,
    pub extra_ignore: &'a GlobSet,
    pub extra_match: &'a GlobSet,
    pub include_hidden: bool,
    pub files_only: bool,
    /// `None` = unlimited. At the limit a directory with children gets a
    /// single `…` placeholder child instead of its subtree.
    pub max_depth: Option<usize>,
    pub style: &'a TreeStyle,
}

/// Walk the root's subtree through the scanner and the filters, producing
/// the flattened pre-order snapshot. Built once per run.
pub fn build_snapshot(root: &Path, scanner: &dyn Scanner, opts: &WalkOptions) -> TreeSnapshot {
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut walker = Walker {
        root,
        scanner,
        opts,
        nodes: Vec::new(),
        prefix_stack: Vec::new(),
    };
    walker.nodes.push(Node {
        rel_path: String::new(),
        display_name: root_name.clone(),
        is_directory: true,
        depth: 0,
        is_last_sibling: true,
        printed_text: root_name,
    });

    let remaining = opts.max_depth.map_or(i64::MAX, |d| d as i64);
    walker.walk_children(root, 1, remaining);
    TreeSnapshot::new(walker.nodes)
}

fn rel_forward(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

struct Walker<'a> {
    root: &'a Path,
    scanner: &'a dyn Scanner,
    opts: &'a WalkOptions<'a>,
    nodes: Vec<Node>,
    /// One entry per open ancestor level: true when more siblings follow
    /// there, i.e. a vertical bar must be drawn.
    prefix_stack: Vec<bool>,
}

impl Walker<'_> {
    fn walk_children(&mut self, dir: &Path, depth: usize, remaining: i64) {
        let children = self.scanner.children(dir);
        let surviving: Vec<(PathBuf, bool)> = children
            .into_iter()
            .filter(|(path, is_dir)| self.survives(path, *is_dir, remaining))
            .collect();

        let count = surviving.len();
        for (idx, (path, is_dir)) in surviving.into_iter().enumerate() {
            let is_last = idx + 1 == count;
            let rel = rel_forward(&path, self.root);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| rel.clone());
            self.push_node(rel.clone(), name, is_dir, depth, is_last);

            if !is_dir {
                continue;
            }

            if remaining == 0 {
                if !self.scanner.children(&path).is_empty() {
                    self.push_ellipsis(&rel, depth);
                }
            } else {
                self.prefix_stack.push(!is_last);
                self.walk_children(&path, depth + 1, remaining - 1);
                self.prefix_stack.pop();
            }
        }
    }

    fn push_node(
        &mut self,
        rel_path: String,
        display_name: String,
        is_directory: bool,
        depth: usize,
        is_last_sibling: bool,
    ) {
        let mut node = Node {
            rel_path,
            display_name,
            is_directory,
            depth,
            is_last_sibling,
            printed_text: String::new(),
        };
        let branch = if node.is_last_sibling {
            self.opts.style.last
        } else {
            self.opts.style.mid
        };
        node.printed_text = format!("{}{} {}", self.prefix(), branch, node.display_name);
        self.nodes.push(node);
    }

    /// Depth limit reached: stand in for the directory's subtree with a
    /// single `…` child line.
    fn push_ellipsis(&mut self, dir_rel: &str, dir_depth: usize) {
        let dir_is_last = self.nodes.last().is_some_and(|n| n.is_last_sibling);
        self.prefix_stack.push(!dir_is_last);
        let rel_path = if dir_rel.is_empty() {
            "…".to_string()
        } else {
            format!("{dir_rel}/…")
        };
        self.push_node(rel_path, "…".to_string(), false, dir_depth + 1, true);
        self.prefix_stack.pop();
    }

    fn prefix(&self) -> String {
        let mut out = String::new();
        for &more in &self.prefix_stack {
            out.push_str(if more {
                self.opts.style.vert
            } else {
                self.opts.style.space
            });
            out.push(' ');
        }
        out
    }

    /// Whether an entry makes it into the snapshot. `remaining` is the
    /// depth budget the entry itself would walk with.
    fn survives(&self, path: &Path, is_dir: bool, remaining: i64) -> bool {
        if !self.opts.include_hidden && scanner::is_hidden(path) {
            return false;
        }
        let rel = rel_forward(path, self.root);
        if self.opts.rules.is_ignored(&rel, is_dir) {
            return false;
        }
        if !self.opts.extra_ignore.is_empty() && self.opts.extra_ignore.matches(&rel) {
            return false;
        }

        if !is_dir {
            return self.opts.extra_match.is_empty() || self.opts.extra_match.matches(&rel);
        }

        // Directories: always shown in plain mode; with --files-only or
        // include globs they must either match explicitly or contain
        // something that will be shown.
        if !self.opts.files_only && self.opts.extra_match.is_empty() {
            return true;
        }
        if !self.opts.extra_match.is_empty() && self.opts.extra_match.matches(&rel) {
            return true;
        }
        remaining != 0 && self.has_visible_descendants(&self.scanner.children(path), remaining - 1)
    }

    fn has_visible_descendants(&self, children: &[(PathBuf, bool)], remaining: i64) -> bool {
        for (path, is_dir) in children {
            if !self.opts.include_hidden && scanner::is_hidden(path) {
                continue;
            }
            let rel = rel_forward(path, self.root);
            if self.opts.rules.is_ignored(&rel, *is_dir) {
                continue;
            }
            if !self.opts.extra_ignore.is_empty() && self.opts.extra_ignore.matches(&rel) {
                continue;
            }

            if !*is_dir {
                if self.opts.extra_match.is_empty() || self.opts.extra_match.matches(&rel) {
                    return true;
                }
            } else {
                if remaining < 0 {
                    continue;
                }
                if !self.opts.extra_match.is_empty() && self.opts.extra_match.matches(&rel) {
                    return true;
                }
                if self.has_visible_descendants(&self.scanner.children(path), remaining - 1) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    struct StubScanner {
        map: BTreeMap<PathBuf, Vec<(PathBuf, bool)>>,
    }

    impl StubScanner {
        /// Entries are root-relative forward-slash paths, listed in the
        /// per-directory order the scanner should yield them.
        fn new(root: &str, entries: &[(&str, bool)]) -> Self {
            let mut map: BTreeMap<PathBuf, Vec<(PathBuf, bool)>> = BTreeMap::new();
            for (rel, is_dir) in entries {
                let full = Path::new(root).join(rel);
                let parent = full
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(root));
                map.entry(parent).or_default().push((full, *is_dir));
            }
            Self { map }
        }
    }

    impl Scanner for StubScanner {
        fn children(&self, dir: &Path) -> Vec<(PathBuf, bool)> {
            self.map.get(dir).cloned().unwrap_or_default()
        }
    }

    #[derive(Default)]
    struct TestOpts {
        files_only: bool,
        include_hidden: bool,
        max_depth: Option<usize>,
        ascii: bool,
    }

    fn build(entries: &[(&str, bool)], gitignore: &str, t: TestOpts) -> TreeSnapshot {
        let rules = IgnoreRules::parse(gitignore);
        let none = GlobSet::default();
        let style = if t.ascii {
            TreeStyle::ASCII
        } else {
            TreeStyle::UNICODE
        };
        let opts = WalkOptions {
            rules: &rules,
            extra_ignore: &none,
            extra_match: &none,
            include_hidden: t.include_hidden,
            files_only: t.files_only,
            max_depth: t.max_depth,
            style: &style,
        };
        let scanner = StubScanner::new("/proj", entries);
        build_snapshot(Path::new("/proj"), &scanner, &opts)
    }

    fn rel_paths(snapshot: &TreeSnapshot) -> Vec<String> {
        snapshot.nodes().iter().map(|n| n.rel_path.clone()).collect()
    }

    #[test]
    fn walk_is_preorder_with_contiguous_subtrees() {
        let snapshot = build(
            &[
                ("docs", true),
                ("docs/c.txt", false),
                ("src", true),
                ("src/a.txt", false),
                ("src/b.txt", false),
            ],
            "",
            TestOpts::default(),
        );
        assert_eq!(
            rel_paths(&snapshot),
            vec!["", "docs", "docs/c.txt", "src", "src/a.txt", "src/b.txt"]
        );
        let depths: Vec<usize> = snapshot.nodes().iter().map(|n| n.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 2, 2]);

        // Every directory's descendants form one contiguous run of
        // strictly deeper entries.
        for (i, node) in snapshot.nodes().iter().enumerate() {
            if !node.is_directory {
                continue;
            }
            let mut j = i + 1;
            while j < snapshot.len() && snapshot.nodes()[j].depth > node.depth {
                j += 1;
            }
            for k in j..snapshot.len() {
                assert!(snapshot.nodes()[k].depth <= node.depth);
            }
        }
    }

    #[test]
    fn ignored_directory_subtree_is_never_walked() {
        let snapshot = build(
            &[
                ("build", true),
                ("build/out.bin", false),
                ("src", true),
                ("src/a.txt", false),
            ],
            "/build/\n",
            TestOpts::default(),
        );
        assert_eq!(rel_paths(&snapshot), vec!["", "src", "src/a.txt"]);
    }

    #[test]
    fn last_sibling_is_computed_over_surviving_entries() {
        // `z.log` is last on disk but filtered out, so `src` must be
        // printed as the final branch.
        let snapshot = build(
            &[("src", true), ("src/a.txt", false), ("z.log", false)],
            "*.log\n",
            TestOpts::default(),
        );
        let src = &snapshot.nodes()[1];
        assert_eq!(src.rel_path, "src");
        assert!(src.is_last_sibling);
        assert_eq!(src.printed_text, "└─ src");
        assert_eq!(snapshot.nodes()[2].printed_text, "  └─ a.txt");
    }

    #[test]
    fn branch_glyphs_follow_sibling_structure() {
        let snapshot = build(
            &[
                ("docs", true),
                ("docs/c.txt", false),
                ("src", true),
                ("src/a.txt", false),
                ("src/b.txt", false),
            ],
            "",
            TestOpts::default(),
        );
        let printed: Vec<&str> = snapshot
            .nodes()
            .iter()
            .map(|n| n.printed_text.as_str())
            .collect();
        assert_eq!(
            printed,
            vec![
                "proj",
                "├─ docs",
                "│ └─ c.txt",
                "└─ src",
                "  ├─ a.txt",
                "  └─ b.txt",
            ]
        );
    }

    #[test]
    fn files_only_prunes_directories_without_surviving_files() {
        let snapshot = build(
            &[
                ("assets", true),
                ("assets/logo.bin", false),
                ("empty", true),
                ("src", true),
                ("src/a.txt", false),
            ],
            "*.bin\n",
            TestOpts { files_only: true, ..Default::default() },
        );
        assert_eq!(rel_paths(&snapshot), vec!["", "src", "src/a.txt"]);
    }

    #[test]
    fn include_globs_filter_files_and_prune_unrelated_directories() {
        let rules = IgnoreRules::parse("");
        let none = GlobSet::default();
        let matches = GlobSet::compile(&["*.rs".to_string()]);
        let opts = WalkOptions {
            rules: &rules,
            extra_ignore: &none,
            extra_match: &matches,
            include_hidden: false,
            files_only: false,
            max_depth: None,
            style: &TreeStyle::UNICODE,
        };
        let scanner = StubScanner::new(
            "/proj",
            &[
                ("docs", true),
                ("docs/readme.md", false),
                ("src", true),
                ("src/main.rs", false),
            ],
        );
        let snapshot = build_snapshot(Path::new("/proj"), &scanner, &opts);
        assert_eq!(rel_paths(&snapshot), vec!["", "src", "src/main.rs"]);
    }

    #[test]
    fn exclude_globs_hide_surviving_paths() {
        let snapshot = build(
            &[("a.txt", false), ("b.txt", false)],
            "",
            TestOpts::default(),
        );
        assert_eq!(snapshot.len(), 3);

        let rules = IgnoreRules::parse("");
        let excludes = GlobSet::compile(&["b.txt".to_string()]);
        let none = GlobSet::default();
        let opts = WalkOptions {
            rules: &rules,
            extra_ignore: &excludes,
            extra_match: &none,
            include_hidden: false,
            files_only: false,
            max_depth: None,
            style: &TreeStyle::UNICODE,
        };
        let scanner = StubScanner::new("/proj", &[("a.txt", false), ("b.txt", false)]);
        let snapshot = build_snapshot(Path::new("/proj"), &scanner, &opts);
        assert_eq!(rel_paths(&snapshot), vec!["", "a.txt"]);
    }

    #[test]
    fn depth_limit_replaces_subtrees_with_a_placeholder() {
        let snapshot = build(
            &[
                ("src", true),
                ("src/nested", true),
                ("src/nested/deep.txt", false),
                ("top.txt", false),
            ],
            "",
            TestOpts { max_depth: Some(1), ..Default::default() },
        );
        assert_eq!(
            rel_paths(&snapshot),
            vec!["", "src", "src/nested", "src/nested/…", "top.txt"]
        );
        let placeholder = &snapshot.nodes()[3];
        assert!(!placeholder.is_directory);
        assert_eq!(placeholder.depth, 3);
        assert_eq!(placeholder.display_name, "…");
    }

    #[test]
    fn hidden_entries_are_skipped_unless_requested() {
        let entries = [
            (".git", true),
            (".gitignore", false),
            ("src", true),
            ("src/a.txt", false),
        ];
        let snapshot = build(&entries, "", TestOpts::default());
        assert_eq!(rel_paths(&snapshot), vec!["", "src", "src/a.txt"]);

        let snapshot = build(&entries, "", TestOpts { include_hidden: true, ..Default::default() });
        assert_eq!(
            rel_paths(&snapshot),
            vec!["", ".git", ".gitignore", "src", "src/a.txt"]
        );
    }

    #[test]
    fn ascii_style_uses_plain_branches() {
        let snapshot = build(
            &[("src", true), ("src/a.txt", false)],
            "",
            TestOpts { ascii: true, ..Default::default() },
        );
        assert_eq!(snapshot.nodes()[1].printed_text, "`-- src");
        assert_eq!(snapshot.nodes()[2].printed_text, "  `-- a.txt");
    }
}
