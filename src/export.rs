use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const SECTION_SEPARATOR: &str = "---";
pub const DEFAULT_EXPORT_FILE: &str = "gitree-export.md";

/// Everything the export artifact is built from: the printed tree and the
/// selected file list, de-duplicated and sorted case-insensitively.
#[derive(Debug)]
pub struct ExportSpec {
    project_root: PathBuf,
    printed_tree_lines: Vec<String>,
    selected_paths: Vec<String>,
}

impl ExportSpec {
    pub fn new<I>(project_root: PathBuf, printed_tree_lines: Vec<String>, selected: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let mut selected_paths: Vec<String> = selected
            .into_iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.replace('\\', "/"))
            .filter(|p| seen.insert(p.to_lowercase()))
            .collect();
        selected_paths.sort_by_key(|p| p.to_lowercase());

        Self {
            project_root,
            printed_tree_lines,
            selected_paths,
        }
    }

    pub fn selected_paths(&self) -> &[String] {
        &self.selected_paths
    }

    /// Render the artifact, reading each selected file from disk. A file
    /// that cannot be read gets an inline error marker as its section
    /// content instead of aborting the export.
    pub fn render(&self) -> String {
        format_export(self, |rel| read_file_content(&self.project_root, rel))
    }
}

/// Printed tree, a blank line, then one fenced section per selected path.
pub fn format_export<F>(spec: &ExportSpec, resolve: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::new();
    for line in &spec.printed_tree_lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');

    for path in &spec.selected_paths {
        let content = resolve(path);
        out.push_str(SECTION_SEPARATOR);
        out.push('\n');
        out.push('`');
        out.push_str(path);
        out.push_str("`:\n```\n");
        out.push_str(&content);
        if !content.is_empty() && !content.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("```\n");
        out.push_str(SECTION_SEPARATOR);
        out.push('\n');
    }
    out
}

fn read_file_content(root: &Path, rel_path: &str) -> String {
    match fs::read_to_string(root.join(rel_path)) {
        Ok(content) => content,
        Err(e) => format!("[ERROR] Could not read file: {e}"),
    }
}

/// Write the artifact through a temp file so a failed run never leaves a
/// half-written export behind.
pub fn write_export(spec: &ExportSpec, dest: &Path) -> Result<()> {
    let text = spec.render();
    let tmp = PathBuf::from(format!("{}.tmp", dest.display()));

    let write_result = (|| -> Result<()> {
        fs::write(&tmp, &text).with_context(|| format!("failed to write {}", tmp.display()))?;
        if dest.exists() {
            fs::remove_file(dest)
                .with_context(|| format!("failed to replace {}", dest.display()))?;
        }
        fs::rename(&tmp, dest)
            .with_context(|| format!("failed to move export into {}", dest.display()))?;
        Ok(())
    })();

    if write_result.is_err() && tmp.exists() {
        let _ = fs::remove_file(&tmp);
    }
    write_result
}
