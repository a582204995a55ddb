mod app;
mod keymap;
mod line;
mod screen;

pub use app::LoopOutcome;

use anyhow::Result;

use crate::ranges::RangeIndex;
use crate::selection::SelectionSet;
use crate::snapshot::{TreeSnapshot, TreeStyle};

use app::App;
use screen::{CrosstermKeys, KeySource, Renderer, TerminalScreen};

/// Run the interactive loop on the real terminal. Raw mode is scoped to
/// this call and released on every exit path.
pub fn run(
    snapshot: &TreeSnapshot,
    index: &RangeIndex,
    style: &TreeStyle,
    files_only: bool,
) -> Result<(LoopOutcome, SelectionSet)> {
    let mut screen = TerminalScreen::new()?;
    let mut keys = CrosstermKeys;
    let mut app = App::new(snapshot, index, style, files_only);
    let outcome = run_loop(&mut app, &mut screen, &mut keys)?;
    drop(screen);
    Ok((outcome, app.into_selection()))
}

/// One redraw per applied action; the key read is the only blocking
/// point. An interrupt terminates without a further redraw.
fn run_loop(
    app: &mut App<'_>,
    renderer: &mut dyn Renderer,
    keys: &mut dyn KeySource,
) -> Result<LoopOutcome> {
    loop {
        let visible = app.visible();
        app.relocate_focus(&visible);
        let lines = app.compose_lines(&visible);
        renderer.draw_lines(&lines, app.focus_position(&visible))?;
        renderer.draw_status(&app.status_line(&visible))?;

        let key = keys.next_key()?;
        app.apply(keymap::map_key(key), &visible);
        if let Some(outcome) = app.outcome() {
            return Ok(outcome);
        }
    }
}
