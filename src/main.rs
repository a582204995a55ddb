mod cli;
mod clipboard;
mod export;
mod pattern;
mod ranges;
mod scanner;
mod selection;
mod snapshot;
mod tui;
mod view;
mod workflow;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // Clipboard daemon mode is an early exit, before clap sees the args.
    if clipboard::check_and_run_daemon_if_requested()? {
        return Ok(());
    }

    let cli_args = cli::Cli::parse();
    let code = workflow::run_gitree(cli_args)?;
    std::process::exit(code);
}
