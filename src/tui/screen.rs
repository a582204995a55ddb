use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use std::io::{self, Stdout};

/// What the interaction loop needs from a display. The loop knows nothing
/// about terminal coordinates, width, or colors.
pub trait Renderer {
    fn draw_lines(&mut self, lines: &[String], focus: Option<usize>) -> Result<()>;
    fn draw_status(&mut self, text: &str) -> Result<()>;
}

/// Blocking source of key presses.
pub trait KeySource {
    fn next_key(&mut self) -> Result<KeyEvent>;
}

/// Scoped raw-mode + alternate-screen acquisition. Dropping the guard
/// restores the terminal on every exit path, panics included.
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen)
            .context("failed to enter alternate screen")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
    }
}

pub struct TerminalScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    list_state: ListState,
    pending_lines: Vec<String>,
    pending_focus: Option<usize>,
    _guard: RawModeGuard,
}

impl TerminalScreen {
    pub fn new() -> Result<Self> {
        let guard = RawModeGuard::acquire()?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
            .context("failed to create terminal")?;
        Ok(Self {
            terminal,
            list_state: ListState::default(),
            pending_lines: Vec::new(),
            pending_focus: None,
            _guard: guard,
        })
    }
}

impl Renderer for TerminalScreen {
    fn draw_lines(&mut self, lines: &[String], focus: Option<usize>) -> Result<()> {
        self.pending_lines = lines.to_vec();
        self.pending_focus = focus;
        Ok(())
    }

    // The status arrives last in each iteration, so this is where the
    // frame actually gets drawn. The stateful list keeps the focused line
    // scrolled into view.
    fn draw_status(&mut self, text: &str) -> Result<()> {
        self.list_state.select(self.pending_focus);
        let items: Vec<ListItem> = self
            .pending_lines
            .iter()
            .map(|l| ListItem::new(l.clone()))
            .collect();
        let status = text.to_string();
        let list_state = &mut self.list_state;

        self.terminal
            .draw(|frame| {
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(1)])
                    .split(frame.area());

                let list = List::new(items)
                    .highlight_style(
                        Style::default()
                            .add_modifier(Modifier::BOLD)
                            .bg(Color::DarkGray),
                    )
                    .highlight_symbol("❯ ");
                frame.render_stateful_widget(list, layout[0], list_state);
                frame.render_widget(Paragraph::new(status), layout[1]);
            })
            .context("failed to draw frame")?;
        Ok(())
    }
}

pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn next_key(&mut self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(key) = event::read().context("failed to read key event")? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key);
                }
            }
        }
    }
}
