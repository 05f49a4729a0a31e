use super::{PickerKey, RawInputSource};
use crate::error::SpoError;
use crate::results::ResultModel;
use crossterm::{
    cursor::{MoveToColumn, MoveUp},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const HINT: &str = "j/k: move  enter: play  q/esc: cancel";

// Lines drawn above the result rows (the hint)
const HEADER_LINES: usize = 1;
const COLUMN_GAP: &str = "  ";
const SELECTED_MARKER: &str = "> ";
const IDLE_MARKER: &str = "  ";

/// Cursor position plus the first row of the visible window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickerState {
    pub index: usize,
    pub offset: usize,
}

impl PickerState {
    /// Returns false at the last entry - no wrap
    pub fn move_down(&mut self, len: usize, rows: usize) -> bool {
        if self.index + 1 >= len {
            return false;
        }
        self.index += 1;
        if self.index >= self.offset + rows {
            self.offset = self.index + 1 - rows;
        }
        true
    }

    /// Returns false at the first entry
    pub fn move_up(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        if self.index < self.offset {
            self.offset = self.index;
        }
        true
    }
}

/// Inline list picker: draws the results under the cursor and repaints in place
pub struct Picker<I, W> {
    model: ResultModel,
    input: I,
    out: W,
    width: usize,
    max_rows: usize,
    height: Option<usize>,
    column_widths: Vec<usize>,
}

impl<I: RawInputSource, W: Write> Picker<I, W> {
    /// `model` must not be empty, callers report "no results" themselves
    pub fn new(model: ResultModel, input: I, out: W) -> Self {
        assert!(!model.is_empty(), "picker needs at least one result");

        let column_widths = column_widths(&model);
        Self {
            model,
            input,
            out,
            width: 80,
            max_rows: 10,
            height: None,
            column_widths,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_max_rows(mut self, rows: usize) -> Self {
        self.max_rows = rows.max(1);
        self
    }

    /// Terminal height in lines. The block plus the cursor line must fit, or the
    /// first frame scrolls and relative cursor moves land on the wrong lines
    pub fn with_height(mut self, height: usize) -> Self {
        self.height = Some(height);
        self
    }

    /// Block on the keyboard until the user confirms (`Some(id)`) or cancels (`None`).
    ///
    /// The drawn block is erased on both exits so later output starts on a clean line.
    pub fn pick(mut self) -> Result<Option<String>, SpoError> {
        let rows = self.visible_rows();
        let mut state = PickerState::default();
        self.render(&state, None)?;

        loop {
            let moved = match PickerKey::from_char(self.input.read_char()?) {
                PickerKey::Down => state.move_down(self.model.size(), rows),
                PickerKey::Up => state.move_up(),
                PickerKey::Confirm => {
                    self.erase()?;
                    return Ok(Some(self.model.identifier_at(state.index).to_string()));
                }
                PickerKey::Cancel => {
                    self.erase()?;
                    return Ok(None);
                }
                PickerKey::Other => false,
            };

            if moved {
                self.render(&state, Some(self.block_height()))?;
            }
        }
    }

    fn visible_rows(&self) -> usize {
        let rows = self.model.size().min(self.max_rows);
        match self.height {
            // hint line above, cursor line below
            Some(height) => rows.min(height.saturating_sub(HEADER_LINES + 1).max(1)),
            None => rows,
        }
    }

    fn block_height(&self) -> usize {
        self.visible_rows() + HEADER_LINES
    }

    fn render(&mut self, state: &PickerState, previous: Option<usize>) -> Result<(), SpoError> {
        self.draw(state, previous).map_err(SpoError::Render)
    }

    fn draw(&mut self, state: &PickerState, previous: Option<usize>) -> io::Result<()> {
        if let Some(height) = previous {
            queue!(self.out, MoveUp(height as u16))?;
        }
        queue!(self.out, MoveToColumn(0))?;

        let hint = truncate(HINT, self.width);
        queue!(self.out, Clear(ClearType::CurrentLine), Print(hint), Print("\r\n"))?;

        let end = state.offset + self.visible_rows();
        for i in state.offset..end {
            let selected = i == state.index;
            let line = truncate(&self.format_row(i, selected), self.width);

            queue!(self.out, Clear(ClearType::CurrentLine))?;
            if selected {
                queue!(
                    self.out,
                    SetAttribute(Attribute::Reverse),
                    Print(line),
                    SetAttribute(Attribute::Reset)
                )?;
            } else {
                queue!(self.out, Print(line))?;
            }
            queue!(self.out, Print("\r\n"))?;
        }

        self.out.flush()
    }

    fn erase(&mut self) -> Result<(), SpoError> {
        let height = self.block_height();
        queue!(
            self.out,
            MoveUp(height as u16),
            MoveToColumn(0),
            Clear(ClearType::FromCursorDown)
        )
        .and_then(|_| self.out.flush())
        .map_err(SpoError::Render)
    }

    fn format_row(&self, index: usize, selected: bool) -> String {
        let entry = self.model.get(index);
        let last = entry.fields.len().saturating_sub(1);

        let mut line = String::from(if selected { SELECTED_MARKER } else { IDLE_MARKER });
        for (col, field) in entry.fields.iter().enumerate() {
            line.push_str(field);
            if col < last {
                let pad = self.column_widths[col].saturating_sub(field.width());
                line.extend(std::iter::repeat(' ').take(pad));
                line.push_str(COLUMN_GAP);
            }
        }
        line
    }
}

fn column_widths(model: &ResultModel) -> Vec<usize> {
    let mut widths = vec![0; model.kind().arity()];
    for entry in model.iter() {
        for (col, field) in entry.fields.iter().enumerate() {
            widths[col] = widths[col].max(field.width());
        }
    }
    widths
}

/// Cut to fit one terminal line; the last column stays free so nothing auto-wraps
fn truncate(text: &str, width: usize) -> String {
    let limit = width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > limit {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::tests::{three_tracks, track};
    use crate::results::ResultKind;
    use crate::ui::ScriptedInput;

    fn run(keys: &str) -> (Option<String>, String) {
        run_with_rows(keys, 10)
    }

    fn run_with_rows(keys: &str, rows: usize) -> (Option<String>, String) {
        let model = ResultModel::build(&three_tracks(), ResultKind::Track);
        let mut out = Vec::new();
        let picked = Picker::new(model, ScriptedInput::new(keys), &mut out)
            .with_width(120)
            .with_max_rows(rows)
            .pick()
            .unwrap();
        (picked, String::from_utf8(out).unwrap())
    }

    fn frames(output: &str) -> usize {
        output.matches(HINT).count()
    }

    fn last_frame(output: &str) -> &str {
        output.rsplit(HINT).next().unwrap()
    }

    fn erase_sequence(height: u16) -> String {
        let mut expected = Vec::new();
        queue!(
            expected,
            MoveUp(height),
            MoveToColumn(0),
            Clear(ClearType::FromCursorDown)
        )
        .unwrap();
        String::from_utf8(expected).unwrap()
    }

    #[test]
    fn test_down_down_confirm_picks_third() {
        let (picked, _) = run("jj\r");
        assert_eq!(picked.as_deref(), Some("spotify:track:C"));
    }

    #[test]
    fn test_down_up_confirm_picks_first() {
        let (picked, _) = run("jk\r");
        assert_eq!(picked.as_deref(), Some("spotify:track:A"));
    }

    #[test]
    fn test_cancel_immediately() {
        let (picked, output) = run("q");
        assert_eq!(picked, None);
        assert_eq!(frames(&output), 1);

        let (picked, _) = run("\x1b");
        assert_eq!(picked, None);
    }

    #[test]
    fn test_cancel_after_navigation() {
        let (picked, _) = run("jjkq");
        assert_eq!(picked, None);
    }

    #[test]
    fn test_no_overflow_past_last_entry() {
        // size-1 downs reach the end, extra downs are no-ops
        let (picked, output) = run("jjjjj\r");
        assert_eq!(picked.as_deref(), Some("spotify:track:C"));
        // initial frame + two real moves
        assert_eq!(frames(&output), 3);
    }

    #[test]
    fn test_no_underflow_at_first_entry() {
        let (picked, output) = run("kk\r");
        assert_eq!(picked.as_deref(), Some("spotify:track:A"));
        assert_eq!(frames(&output), 1);
    }

    #[test]
    fn test_other_keys_do_nothing() {
        let (picked, output) = run("xJ \nj\r");
        assert_eq!(picked.as_deref(), Some("spotify:track:B"));
        assert_eq!(frames(&output), 2);
    }

    #[test]
    fn test_confirm_matches_highlighted_row() {
        let (picked, output) = run("j\r");
        assert_eq!(picked.as_deref(), Some("spotify:track:B"));

        let frame = last_frame(&output);
        assert!(frame.contains("> Song B"));
        assert!(frame.contains("  Song A"));
        assert!(frame.contains("  Song C"));
    }

    #[test]
    fn test_repaint_moves_back_over_previous_frame() {
        let (_, output) = run("j\r");
        let up = {
            let mut buf = Vec::new();
            queue!(buf, MoveUp(4)).unwrap();
            String::from_utf8(buf).unwrap()
        };
        // one repaint, one erase
        assert_eq!(output.matches(&up).count(), 2);
    }

    #[test]
    fn test_both_exits_erase_the_block() {
        // hint line + three rows
        let (_, selected) = run("j\r");
        assert!(selected.ends_with(&erase_sequence(4)));

        let (_, cancelled) = run("jq");
        assert!(cancelled.ends_with(&erase_sequence(4)));
    }

    #[test]
    fn test_window_scrolls_with_cursor() {
        let (picked, output) = run_with_rows("jj\r", 2);
        assert_eq!(picked.as_deref(), Some("spotify:track:C"));

        let frame = last_frame(&output);
        assert!(!frame.contains("Song A"));
        assert!(frame.contains("  Song B"));
        assert!(frame.contains("> Song C"));
        assert!(output.ends_with(&erase_sequence(3)));
    }

    #[test]
    fn test_window_scrolls_back_up() {
        let (picked, output) = run_with_rows("jjkk\r", 2);
        assert_eq!(picked.as_deref(), Some("spotify:track:A"));

        let frame = last_frame(&output);
        assert!(frame.contains("> Song A"));
        assert!(!frame.contains("Song C"));
    }

    #[test]
    fn test_input_failure_propagates() {
        let model = ResultModel::build(&three_tracks(), ResultKind::Track);
        let mut out = Vec::new();
        let err = Picker::new(model, ScriptedInput::new("j"), &mut out)
            .pick()
            .unwrap_err();
        assert!(matches!(err, SpoError::InputRead(_)));
    }

    #[test]
    fn test_columns_are_aligned() {
        let raw = vec![
            track("spotify:track:1", "Short", "Band", "LP"),
            track("spotify:track:2", "A Much Longer Title", "Band", "LP"),
        ];
        let model = ResultModel::build(&raw, ResultKind::Track);
        let mut out = Vec::new();
        let picker = Picker::new(model, ScriptedInput::new(""), &mut out);

        let first = picker.format_row(0, true);
        let second = picker.format_row(1, false);
        assert_eq!(first.find("Band"), second.find("Band"));
        assert_eq!(first, "> Short                Band  LP");
    }

    #[test]
    fn test_truncate_respects_display_width() {
        assert_eq!(truncate("abcdef", 4), "abc");
        assert_eq!(truncate("abc", 80), "abc");
        // each CJK char is two columns wide
        assert_eq!(truncate("日本語", 6), "日本");
        assert_eq!(truncate("anything", 0), "");
    }

    #[test]
    #[should_panic]
    fn test_empty_model_is_rejected() {
        let model = ResultModel::build(&[], ResultKind::Track);
        let _ = Picker::new(model, ScriptedInput::new(""), Vec::new());
    }

    fn pick_from(raw: &[crate::results::CatalogItem], keys: &str, rows: usize, height: Option<usize>) -> (Option<String>, String) {
        let model = ResultModel::build(raw, ResultKind::Track);
        let mut out = Vec::new();
        let mut picker = Picker::new(model, ScriptedInput::new(keys), &mut out)
            .with_width(120)
            .with_max_rows(rows);
        if let Some(height) = height {
            picker = picker.with_height(height);
        }
        let picked = picker.pick().unwrap();
        (picked, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_entry_is_both_first_and_last() {
        let raw = vec![track("spotify:track:only", "Lone Song", "Solo", "Single")];
        let (picked, output) = pick_from(&raw, "jkjk\r", 10, None);

        assert_eq!(picked.as_deref(), Some("spotify:track:only"));
        // no move ever redraws
        assert_eq!(frames(&output), 1);
        // hint + one row
        assert!(output.ends_with(&erase_sequence(2)));
    }

    #[test]
    fn test_model_exactly_filling_the_window() {
        let raw: Vec<_> = (0..4)
            .map(|i| track(&format!("spotify:track:{i}"), &format!("Song {i}"), "Band", "LP"))
            .collect();
        let (picked, output) = pick_from(&raw, "jjj\r", 4, None);

        assert_eq!(picked.as_deref(), Some("spotify:track:3"));
        let frame = last_frame(&output);
        assert!(frame.contains("  Song 0"));
        assert!(frame.contains("> Song 3"));
        assert!(output.ends_with(&erase_sequence(5)));
    }

    #[test]
    fn test_short_terminal_shrinks_the_window() {
        let raw: Vec<_> = (0..10)
            .map(|i| track(&format!("spotify:track:{i}"), &format!("Song {i}"), "Band", "LP"))
            .collect();

        // 6 lines: hint + 4 rows + the cursor line
        let (picked, output) = pick_from(&raw, "jjjj\r", 10, Some(6));
        assert_eq!(picked.as_deref(), Some("spotify:track:4"));
        assert!(output.ends_with(&erase_sequence(5)));
        let frame = last_frame(&output);
        assert!(!frame.contains("Song 0"));
        assert!(frame.contains("> Song 4"));

        // Tiny terminals still show one row
        let (_, output) = pick_from(&raw, "q", 10, Some(1));
        assert!(output.ends_with(&erase_sequence(2)));

        // A tall terminal leaves the configured limit alone
        let (_, output) = pick_from(&raw, "q", 10, Some(50));
        assert!(output.ends_with(&erase_sequence(11)));
    }

    #[test]
    fn test_state_bounds() {
        let mut state = PickerState::default();
        assert!(!state.move_up());
        assert!(state.move_down(2, 5));
        assert!(!state.move_down(2, 5));
        assert_eq!(state.index, 1);
        assert_eq!(state.offset, 0);
    }
}
