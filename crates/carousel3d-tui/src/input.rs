use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Swipe right, revealing the previous item
    SwipePrev,
    /// Swipe left, revealing the next item
    SwipeNext,
    SwipeUp,
    SwipeDown,
    /// Jump back to the first item
    Home,
    ToggleLoop,
    CycleDirection,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Left, _) => Action::SwipePrev,
        (KeyCode::Right, _) => Action::SwipeNext,
        (KeyCode::Up, _) => Action::SwipeUp,
        (KeyCode::Down, _) => Action::SwipeDown,
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::Home,

        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::ToggleLoop,
        (KeyCode::Char('d'), KeyModifiers::NONE) => Action::CycleDirection,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_swipe_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Left)), Action::SwipePrev);
        assert_eq!(handle_key_event(key(KeyCode::Right)), Action::SwipeNext);
        assert_eq!(handle_key_event(key(KeyCode::Up)), Action::SwipeUp);
        assert_eq!(handle_key_event(key(KeyCode::Down)), Action::SwipeDown);
        assert_eq!(handle_key_event(key(KeyCode::Home)), Action::Home);
    }

    #[test]
    fn test_toggles() {
        assert_eq!(handle_key_event(key(KeyCode::Char('l'))), Action::ToggleLoop);
        assert_eq!(handle_key_event(key(KeyCode::Char('d'))), Action::CycleDirection);
        assert_eq!(handle_key_event(key(KeyCode::Char('x'))), Action::None);
    }
}
