use anyhow::{Context, Result};
use std::fs;

use crate::cli::Cli;
use crate::export::ExportSpec;
use crate::pattern::{GlobSet, IgnoreRules};
use crate::ranges::RangeIndex;
use crate::scanner::FsScanner;
use crate::snapshot::{self, TreeStyle, WalkOptions};
use crate::tui::{self, LoopOutcome};
use crate::{clipboard, export};

pub const EXIT_OK: i32 = 0;
pub const EXIT_MISSING_GITIGNORE: i32 = 2;
pub const EXIT_INTERRUPTED: i32 = 130;

/// Top-level orchestration: load rules, build the snapshot, print the
/// tree, and optionally run the interactive loop + export.
pub fn run_gitree(cli_args: Cli) -> Result<i32> {
    let root = cli_args
        .root
        .canonicalize()
        .with_context(|| format!("path does not exist: {}", cli_args.root.display()))?;
    anyhow::ensure!(root.is_dir(), "not a directory: {}", root.display());

    let gitignore_path = root.join(".gitignore");
    if !gitignore_path.is_file() {
        println!("❌ .gitignore NOT found in: {}", root.display());
        println!("This tool requires a .gitignore at the project root.");
        return Ok(EXIT_MISSING_GITIGNORE);
    }
    let gitignore_text = fs::read_to_string(&gitignore_path)
        .with_context(|| format!("failed to read {}", gitignore_path.display()))?;

    let rules = IgnoreRules::parse(&gitignore_text);
    let extra_ignore = GlobSet::compile(&cli_args.ignore_globs);
    let extra_match = GlobSet::compile(&cli_args.match_globs);
    let style = if cli_args.ascii {
        TreeStyle::ASCII
    } else {
        TreeStyle::UNICODE
    };

    let opts = WalkOptions {
        rules: &rules,
        extra_ignore: &extra_ignore,
        extra_match: &extra_match,
        include_hidden: cli_args.hidden,
        files_only: cli_args.files_only,
        max_depth: cli_args.depth,
        style: &style,
    };
    let snapshot = snapshot::build_snapshot(&root, &FsScanner, &opts);

    for node in snapshot.nodes() {
        println!("{}", node.printed_text);
    }

    if !cli_args.ui {
        return Ok(EXIT_OK);
    }

    let index = RangeIndex::build(&snapshot);
    let (outcome, selection) = tui::run(&snapshot, &index, &style, cli_args.files_only)?;

    match outcome {
        LoopOutcome::Interrupted => Ok(EXIT_INTERRUPTED),
        LoopOutcome::Quit => {
            if selection.is_empty() {
                println!("Nothing selected; no export written.");
                return Ok(EXIT_OK);
            }

            let printed_lines = snapshot
                .nodes()
                .iter()
                .map(|n| n.printed_text.clone())
                .collect();
            let spec = ExportSpec::new(
                root,
                printed_lines,
                selection.iter().map(str::to_string),
            );
            let file_count = spec.selected_paths().len();

            if cli_args.clipboard {
                clipboard::copy_text_to_clipboard(spec.render())?;
                println!("✅ Copied {} files to the clipboard.", file_count);
            } else {
                export::write_export(&spec, &cli_args.output)?;
                println!(
                    "✅ Wrote {} files to {}.",
                    file_count,
                    cli_args.output.display()
                );
            }
            Ok(EXIT_OK)
        }
    }
}
