// Terminal side of spo - raw single-key input and the result picker
// Everything here draws inline on the normal screen, no alternate screen

pub mod keys;   // raw char -> picker action
mod picker;     // interactive result list

pub use keys::PickerKey;
pub use picker::{Picker, PickerState, HINT};

use crate::error::SpoError;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};

/// One blocking, unbuffered, unechoed character read at a time
pub trait RawInputSource {
    fn read_char(&mut self) -> Result<char, SpoError>;
}

/// Keyboard in raw mode for as long as this value lives
pub struct TerminalInput {
    _cleanup_guard: CleanupGuard,
}

struct CleanupGuard;

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        // Back to cooked mode even if the picker bailed out with an error
        let _ = disable_raw_mode();
    }
}

impl TerminalInput {
    pub fn new() -> Result<Self, SpoError> {
        enable_raw_mode().map_err(SpoError::InputRead)?;

        Ok(Self {
            _cleanup_guard: CleanupGuard,
        })
    }
}

impl RawInputSource for TerminalInput {
    fn read_char(&mut self) -> Result<char, SpoError> {
        loop {
            match event::read().map_err(SpoError::InputRead)? {
                // Windows reports releases too; only presses and repeats count
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(c) = keys::key_to_char(key) {
                        return Ok(c);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Canned input for driving the picker without a terminal
#[cfg(test)]
pub(crate) struct ScriptedInput {
    keys: std::collections::VecDeque<char>,
}

#[cfg(test)]
impl ScriptedInput {
    pub(crate) fn new(keys: &str) -> Self {
        Self {
            keys: keys.chars().collect(),
        }
    }
}

#[cfg(test)]
impl RawInputSource for ScriptedInput {
    fn read_char(&mut self) -> Result<char, SpoError> {
        self.keys.pop_front().ok_or_else(|| {
            SpoError::InputRead(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "script exhausted",
            ))
        })
    }
}
