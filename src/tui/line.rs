use crate::selection::{CoverageState, DirectoryCoverage, SelectionSummary};
use crate::snapshot::{Node, TreeStyle};

pub const STATUS_HINT: &str =
    "Arrows move · Space toggle · a/A select/clear · Enter/→ expand · ← collapse · s files-only · q quit";

/// `glyph checkbox printed-label`, e.g. `▸ [•] ├─ src`.
pub fn compose(node: &Node, glyph: &str, checkbox: &str) -> String {
    format!("{glyph} {checkbox} {}", node.printed_text)
}

/// Blank for files and childless directories.
pub fn expand_glyph(
    node: &Node,
    has_descendants: bool,
    expanded: bool,
    style: &TreeStyle,
) -> &'static str {
    if !node.is_directory || !has_descendants {
        return " ";
    }
    match (style.unicode, expanded) {
        (true, true) => "▾",
        (true, false) => "▸",
        (false, true) => "-",
        (false, false) => "+",
    }
}

pub fn file_checkbox(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

pub fn dir_checkbox(coverage: DirectoryCoverage, style: &TreeStyle) -> &'static str {
    match coverage.state() {
        CoverageState::None => "[ ]",
        CoverageState::Full => "[x]",
        CoverageState::Partial => {
            if style.unicode {
                "[•]"
            } else {
                "[~]"
            }
        }
    }
}

pub fn status_text(summary: &SelectionSummary) -> String {
    format!(
        "{STATUS_HINT} — {} selected · {} full · {} partial",
        summary.selected_files, summary.full_dirs, summary.partial_dirs
    )
}
