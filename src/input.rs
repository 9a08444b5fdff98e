//! Key -> Intent mapping

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Hide one more word
    Advance,
    /// Show every word again
    Reset,
    Quit,
}

pub fn intent_for_key(key: KeyEvent) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            Some(Intent::Advance)
        }
        KeyCode::Char('r') | KeyCode::Left | KeyCode::Backspace => Some(Intent::Reset),
        KeyCode::Esc | KeyCode::Char('q') => Some(Intent::Quit),
        _ => None,
    }
}
