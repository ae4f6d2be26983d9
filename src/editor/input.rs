use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::CursorMove;
use crate::search::{Direction, FindOption};

/// Keys while the note itself has focus
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    Move(CursorMove),
    Select(CursorMove),
    OpenFind,
    FindNext(Direction),
    CloseFind,
    Quit,
    None,
}

/// Keys while the find bar input has focus
#[derive(Debug, Clone, PartialEq)]
pub enum FindAction {
    InsertChar(char),
    DeleteCharBefore,
    ClearInput,
    Submit { shift: bool },
    Toggle(FindOption),
    SelectAll,
    Close,
    /// Hand focus back to the note without closing the bar
    Blur,
    None,
}

fn is_find_shortcut(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('f') | KeyCode::Char('F'))
        && key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
}

fn cursor_move(code: KeyCode) -> Option<CursorMove> {
    Some(match code {
        KeyCode::Left => CursorMove::Back,
        KeyCode::Right => CursorMove::Forward,
        KeyCode::Up => CursorMove::Up,
        KeyCode::Down => CursorMove::Down,
        KeyCode::Home => CursorMove::Head,
        KeyCode::End => CursorMove::End,
        KeyCode::PageUp => CursorMove::PageUp,
        KeyCode::PageDown => CursorMove::PageDown,
        _ => return None,
    })
}

pub fn process_viewer_key(key: KeyEvent) -> ViewerAction {
    if is_find_shortcut(&key) {
        return ViewerAction::OpenFind;
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    if let Some(movement) = cursor_move(key.code) {
        return if shift {
            ViewerAction::Select(movement)
        } else {
            ViewerAction::Move(movement)
        };
    }

    match key.code {
        KeyCode::F(3) => ViewerAction::FindNext(Direction::from_shift(shift)),
        KeyCode::Char('n') => ViewerAction::FindNext(Direction::Forward),
        KeyCode::Char('N') => ViewerAction::FindNext(Direction::Backward),
        KeyCode::Char('/') => ViewerAction::OpenFind,
        KeyCode::Char('g') => ViewerAction::Move(CursorMove::Top),
        KeyCode::Char('G') => ViewerAction::Move(CursorMove::Bottom),
        KeyCode::Char('j') => ViewerAction::Move(CursorMove::Down),
        KeyCode::Char('k') => ViewerAction::Move(CursorMove::Up),
        KeyCode::Esc => ViewerAction::CloseFind,
        KeyCode::Char('q') => ViewerAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => ViewerAction::Quit,
        _ => ViewerAction::None,
    }
}

pub fn process_find_key(key: KeyEvent) -> FindAction {
    if is_find_shortcut(&key) {
        return FindAction::SelectAll;
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Enter | KeyCode::F(3) => FindAction::Submit { shift },
        KeyCode::Esc => FindAction::Close,
        KeyCode::Tab => FindAction::Blur,
        KeyCode::Backspace => FindAction::DeleteCharBefore,
        KeyCode::Char('c') | KeyCode::Char('C') if alt => FindAction::Toggle(FindOption::CaseSensitive),
        KeyCode::Char('w') | KeyCode::Char('W') if alt => FindAction::Toggle(FindOption::WholeWord),
        KeyCode::Char('u') if ctrl => FindAction::ClearInput,
        KeyCode::Char(c) if !ctrl => FindAction::InsertChar(c),
        _ => FindAction::None,
    }
}
