use crate::ranges::RangeIndex;
use crate::selection::{CoverageState, SelectionSet, SelectionSummary};
use crate::snapshot::{TreeSnapshot, TreeStyle};
use crate::view::{self, ExpandState};

use super::keymap::UiAction;
use super::line;

/// Terminal states of the interaction loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    Quit,
    Interrupted,
}

/// Single-threaded controller state: immutable snapshot + range index,
/// mutable expand/selection/files-only state, and the focus, tracked by
/// snapshot index so it survives changes of the visible list.
pub struct App<'a> {
    snapshot: &'a TreeSnapshot,
    index: &'a RangeIndex,
    style: &'a TreeStyle,
    expand: ExpandState,
    selection: SelectionSet,
    files_only: bool,
    focus: Option<usize>,
    outcome: Option<LoopOutcome>,
}

impl<'a> App<'a> {
    pub fn new(
        snapshot: &'a TreeSnapshot,
        index: &'a RangeIndex,
        style: &'a TreeStyle,
        files_only: bool,
    ) -> Self {
        Self {
            snapshot,
            index,
            style,
            expand: ExpandState::new(true),
            selection: SelectionSet::new(),
            files_only,
            focus: None,
            outcome: None,
        }
    }

    pub fn visible(&self) -> Vec<usize> {
        view::visible_lines(self.snapshot, &self.expand, self.files_only, self.index)
    }

    /// Keep the focused snapshot index if it is still visible; otherwise
    /// the nearest later visible line, then the last one, then none.
    pub fn relocate_focus(&mut self, visible: &[usize]) {
        self.focus = match self.focus {
            Some(f) if visible.binary_search(&f).is_ok() => Some(f),
            Some(f) => visible
                .iter()
                .copied()
                .find(|&i| i > f)
                .or_else(|| visible.last().copied()),
            None => visible.first().copied(),
        };
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Position of the focus within the visible list, for the renderer.
    pub fn focus_position(&self, visible: &[usize]) -> Option<usize> {
        self.focus().and_then(|f| visible.binary_search(&f).ok())
    }

    pub fn outcome(&self) -> Option<LoopOutcome> {
        self.outcome
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn into_selection(self) -> SelectionSet {
        self.selection
    }

    pub fn compose_lines(&self, visible: &[usize]) -> Vec<String> {
        visible
            .iter()
            .map(|&i| {
                let node = &self.snapshot.nodes()[i];
                let glyph = line::expand_glyph(
                    node,
                    self.index.has_descendants(i),
                    self.expand.is_expanded(i),
                    self.style,
                );
                let checkbox = if node.is_directory {
                    line::dir_checkbox(
                        self.index.coverage(self.snapshot, i, self.selection()),
                        self.style,
                    )
                } else {
                    line::file_checkbox(self.selection().is_selected(&node.rel_path))
                };
                line::compose(node, glyph, checkbox)
            })
            .collect()
    }

    /// Status summary aggregated over the visible set only.
    pub fn status_line(&self, visible: &[usize]) -> String {
        let summary = SelectionSummary::compute(
            self.snapshot,
            self.index,
            self.selection(),
            visible.iter().copied(),
        );
        line::status_text(&summary)
    }

    pub fn apply(&mut self, action: UiAction, visible: &[usize]) {
        match action {
            UiAction::MoveUp => self.move_focus(-1, visible),
            UiAction::MoveDown => self.move_focus(1, visible),
            UiAction::ToggleSelection => self.toggle_at_focus(),
            UiAction::SelectAllUnder => self.set_all_under(true),
            UiAction::ClearAllUnder => self.set_all_under(false),
            UiAction::Expand => self.expand_focused(),
            UiAction::ToggleExpand => self.toggle_fold_focused(),
            UiAction::CollapseOrParent => self.collapse_or_parent(visible),
            UiAction::ToggleFilesOnly => self.files_only = !self.files_only,
            UiAction::Quit => self.outcome = Some(LoopOutcome::Quit),
            UiAction::Interrupt => self.outcome = Some(LoopOutcome::Interrupted),
            UiAction::NoOp => {}
        }
    }

    /// Clamped, no wraparound.
    fn move_focus(&mut self, delta: isize, visible: &[usize]) {
        let Some(pos) = self.focus_position(visible) else {
            return;
        };
        let last = visible.len() - 1;
        let new = pos.saturating_add_signed(delta).min(last);
        self.focus = Some(visible[new]);
    }

    /// File: flip. Directory: full coverage deselects the subtree, any
    /// other coverage selects all of it (partial promotes to full).
    fn toggle_at_focus(&mut self) {
        let Some(f) = self.focus else { return };
        let Some(node) = self.snapshot.get(f) else {
            return;
        };
        if node.is_directory {
            let coverage = self.index.coverage(self.snapshot, f, &self.selection);
            if coverage.total_files == 0 {
                return;
            }
            let files = self.index.descendant_file_paths(self.snapshot, f);
            if coverage.state() == CoverageState::Full {
                self.selection.deselect_many(files.iter().map(String::as_str));
            } else {
                self.selection.select_many(files);
            }
        } else if self.selection.is_selected(&node.rel_path) {
            self.selection.deselect_many([node.rel_path.as_str()]);
        } else {
            self.selection.select_many([node.rel_path.clone()]);
        }
    }

    fn set_all_under(&mut self, select: bool) {
        let Some(f) = self.focus else { return };
        let Some(node) = self.snapshot.get(f) else {
            return;
        };
        if node.is_directory {
            let files = self.index.descendant_file_paths(self.snapshot, f);
            if select {
                self.selection.select_many(files);
            } else {
                self.selection.deselect_many(files.iter().map(String::as_str));
            }
        } else if select {
            self.selection.select_many([node.rel_path.clone()]);
        } else {
            self.selection.deselect_many([node.rel_path.as_str()]);
        }
    }

    /// Only a collapsed directory with descendants can expand.
    fn expand_focused(&mut self) {
        let Some(f) = self.focus else { return };
        let Some(node) = self.snapshot.get(f) else {
            return;
        };
        if node.is_directory && !self.expand.is_expanded(f) && self.index.has_descendants(f) {
            self.expand.expand(f);
        }
    }

    /// Fold toggle: expand when collapsed, collapse when expanded.
    fn toggle_fold_focused(&mut self) {
        let Some(f) = self.focus else { return };
        let Some(node) = self.snapshot.get(f) else {
            return;
        };
        if node.is_directory && self.index.has_descendants(f) {
            self.expand.toggle(f);
        }
    }

    /// Collapse an expanded directory in place; otherwise climb to the
    /// nearest preceding visible directory at a strictly smaller depth.
    fn collapse_or_parent(&mut self, visible: &[usize]) {
        let Some(f) = self.focus else { return };
        let Some(node) = self.snapshot.get(f) else {
            return;
        };
        if node.is_directory && self.expand.is_expanded(f) && self.index.has_descendants(f) {
            self.expand.collapse(f);
            return;
        }
        let Some(pos) = self.focus_position(visible) else {
            return;
        };
        for p in (0..pos).rev() {
            let i = visible[p];
            let candidate = &self.snapshot.nodes()[i];
            if candidate.is_directory && candidate.depth < node.depth {
                self.focus = Some(i);
                return;
            }
        }
    }
}
