use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const KEY_DOWN: char = 'j';
pub const KEY_UP: char = 'k';
pub const KEY_CONFIRM: char = '\r';
pub const KEY_QUIT: char = 'q';
pub const KEY_ESCAPE: char = '\x1b';

/// What a single raw character means to the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKey {
    Down,
    Up,
    Confirm,
    Cancel,
    Other,
}

impl PickerKey {
    pub fn from_char(c: char) -> Self {
        match c {
            KEY_DOWN => PickerKey::Down,
            KEY_UP => PickerKey::Up,
            KEY_CONFIRM => PickerKey::Confirm,
            KEY_QUIT | KEY_ESCAPE => PickerKey::Cancel,
            _ => PickerKey::Other,
        }
    }
}

/// Flatten a crossterm key event to the raw character a getch-style read would give.
///
/// Arrow keys fold onto j/k and Ctrl-C onto escape, since raw mode swallows SIGINT.
/// Other Ctrl chords become their control byte; Alt chords are dropped.
pub fn key_to_char(key: KeyEvent) -> Option<char> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if ctrl => Some(KEY_ESCAPE),
        KeyCode::Char(c) if ctrl => c.is_ascii().then(|| (c as u8 & 0x1f) as char),
        KeyCode::Char(c) => Some(c),
        KeyCode::Enter => Some(KEY_CONFIRM),
        KeyCode::Esc => Some(KEY_ESCAPE),
        KeyCode::Down => Some(KEY_DOWN),
        KeyCode::Up => Some(KEY_UP),
        KeyCode::Tab => Some('\t'),
        KeyCode::Backspace => Some('\x7f'),
        _ => None,
    }
}
