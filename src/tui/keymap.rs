use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Everything the interaction loop knows how to apply. Unrecognized keys
/// map to `NoOp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    MoveUp,
    MoveDown,
    ToggleSelection,
    SelectAllUnder,
    ClearAllUnder,
    Expand,
    ToggleExpand,
    CollapseOrParent,
    ToggleFilesOnly,
    Quit,
    Interrupt,
    NoOp,
}

pub fn map_key(key: KeyEvent) -> UiAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return UiAction::Interrupt;
    }
    match key.code {
        KeyCode::Up => UiAction::MoveUp,
        KeyCode::Down => UiAction::MoveDown,
        KeyCode::Char(' ') => UiAction::ToggleSelection,
        KeyCode::Char('a') => UiAction::SelectAllUnder,
        KeyCode::Char('A') => UiAction::ClearAllUnder,
        KeyCode::Enter | KeyCode::Right => UiAction::Expand,
        KeyCode::Tab | KeyCode::Char('o') => UiAction::ToggleExpand,
        KeyCode::Left => UiAction::CollapseOrParent,
        KeyCode::Char('s') => UiAction::ToggleFilesOnly,
        KeyCode::Char('q') | KeyCode::Char('Q') => UiAction::Quit,
        _ => UiAction::NoOp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_move_and_fold() {
        assert_eq!(map_key(plain(KeyCode::Up)), UiAction::MoveUp);
        assert_eq!(map_key(plain(KeyCode::Down)), UiAction::MoveDown);
        assert_eq!(map_key(plain(KeyCode::Right)), UiAction::Expand);
        assert_eq!(map_key(plain(KeyCode::Enter)), UiAction::Expand);
        assert_eq!(map_key(plain(KeyCode::Tab)), UiAction::ToggleExpand);
        assert_eq!(map_key(plain(KeyCode::Char('o'))), UiAction::ToggleExpand);
        assert_eq!(map_key(plain(KeyCode::Left)), UiAction::CollapseOrParent);
    }

    #[test]
    fn selection_keys_respect_shift() {
        assert_eq!(map_key(plain(KeyCode::Char(' '))), UiAction::ToggleSelection);
        assert_eq!(map_key(plain(KeyCode::Char('a'))), UiAction::SelectAllUnder);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            UiAction::ClearAllUnder
        );
    }

    #[test]
    fn control_c_interrupts_even_with_other_bindings() {
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            UiAction::Interrupt
        );
    }

    #[test]
    fn unknown_keys_are_noops() {
        assert_eq!(map_key(plain(KeyCode::Char('z'))), UiAction::NoOp);
        assert_eq!(map_key(plain(KeyCode::Esc)), UiAction::NoOp);
    }
}
