//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use cozy_types::scheme;

/// Where typed characters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Page,
    /// Address bar or prompt overlay.
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Type an address under this scheme.
    PickScheme(&'static str),
    /// Type a link shortcut.
    ShortcutEntry,
    ToggleFocus,
    Escape,
    Back,
    Reload,
    Cancel,
    Bookmark,
    OpenBookmarks,
    Help,
    Scroll(Scroll),
    Submit,
    Backspace,
    Insert(char),
}

/// Map a key press to a command. Control chords work everywhere; plain
/// characters edit text when an input has focus.
pub fn command(key: KeyEvent, focus: Focus) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('g') => Some(Command::PickScheme(scheme::GEMINI)),
            KeyCode::Char('s') => Some(Command::PickScheme(scheme::SPARTAN)),
            KeyCode::Char('n') => Some(Command::PickScheme(scheme::NEX)),
            KeyCode::Char('l') => Some(Command::ShortcutEntry),
            KeyCode::Char('e') => Some(Command::ToggleFocus),
            KeyCode::Char('r') => Some(Command::Reload),
            KeyCode::Char('y') => Some(Command::Bookmark),
            KeyCode::Char('o') => Some(Command::OpenBookmarks),
            KeyCode::Char('h') => Some(Command::Help),
            _ => None,
        };
    }

    match (key.code, focus) {
        (KeyCode::Tab, _) => Some(Command::ToggleFocus),
        (KeyCode::Esc, _) => Some(Command::Escape),
        (KeyCode::Left, _) if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Command::Back),
        (KeyCode::Enter, Focus::Input) => Some(Command::Submit),
        (KeyCode::Backspace, Focus::Input) => Some(Command::Backspace),
        (KeyCode::Char(c), Focus::Input) => Some(Command::Insert(c)),
        (KeyCode::Char('.'), Focus::Page) => Some(Command::Cancel),
        (KeyCode::Up, Focus::Page) => Some(Command::Scroll(Scroll::Up)),
        (KeyCode::Down, Focus::Page) => Some(Command::Scroll(Scroll::Down)),
        (KeyCode::PageUp, Focus::Page) => Some(Command::Scroll(Scroll::PageUp)),
        (KeyCode::PageDown, Focus::Page) => Some(Command::Scroll(Scroll::PageDown)),
        (KeyCode::Home, Focus::Page) => Some(Command::Scroll(Scroll::Top)),
        (KeyCode::End, Focus::Page) => Some(Command::Scroll(Scroll::Bottom)),
        _ => None,
    }
}
