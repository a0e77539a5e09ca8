// ratachat — an embeddable chat widget for ratatui terminals
// Copyright (C) 2026  The ratachat developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::ui::theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Geometry handed to the injected input bar once per layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputGeometry {
    /// Full widget width in columns.
    pub width: u16,
    /// Full widget height in rows.
    pub height: u16,
    /// Rows reserved below the input (host status bars and the like).
    pub bottom_inset: u16,
}

/// Something the injected bar produced from a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The user submitted the current text.
    Submitted(String),
}

/// The injectable input-bar view.
///
/// The widget asks for the desired height with the pass's geometry,
/// reserves that many rows at the bottom, and hands back the area to
/// render into. Key events are routed here while the bar has focus.
pub trait InputBar {
    fn desired_height(&self, geometry: InputGeometry) -> u16;
    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool);
    fn handle_key(&mut self, key: KeyEvent) -> Option<InputEvent>;
}

/// Horizontal padding to match the widget chrome.
const INPUT_PAD: u16 = 2;

/// Prompt prefix width: "❯ " = 2 columns
const PROMPT_WIDTH: u16 = 2;

/// Cap so a long draft cannot consume the whole viewport.
const MAX_INPUT_HEIGHT: u16 = 8;

/// Default multi-line text bar: Enter submits, Shift+Enter breaks the
/// line. Hosts wanting anything fancier inject their own [`InputBar`].
#[derive(Debug)]
pub struct TextInputBar {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    placeholder: String,
}

impl Default for TextInputBar {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            placeholder: "Type a message...".to_owned(),
        }
    }
}

fn char_to_byte_index(line: &str, char_idx: usize) -> usize {
    line.char_indices().nth(char_idx).map_or(line.len(), |(i, _)| i)
}

impl TextInputBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        Self { placeholder: placeholder.into(), ..Self::default() }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    fn insert_char(&mut self, c: char) {
        let line = &mut self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        line.insert(byte_idx, c);
        self.cursor_col += 1;
    }

    fn insert_newline(&mut self) {
        let line = &mut self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let rest = line[byte_idx..].to_owned();
        line.truncate(byte_idx);
        self.cursor_row += 1;
        self.lines.insert(self.cursor_row, rest);
        self.cursor_col = 0;
    }

    fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let byte_idx = char_to_byte_index(line, self.cursor_col - 1);
            line.remove(byte_idx);
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            // Join with the previous line.
            let removed = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
            self.lines[self.cursor_row].push_str(&removed);
        }
    }

    fn move_cursor(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => {
                if self.cursor_col > 0 {
                    self.cursor_col -= 1;
                } else if self.cursor_row > 0 {
                    self.cursor_row -= 1;
                    self.cursor_col = self.lines[self.cursor_row].chars().count();
                }
            }
            KeyCode::Right => {
                if self.cursor_col < self.lines[self.cursor_row].chars().count() {
                    self.cursor_col += 1;
                } else if self.cursor_row + 1 < self.lines.len() {
                    self.cursor_row += 1;
                    self.cursor_col = 0;
                }
            }
            KeyCode::Up if self.cursor_row > 0 => {
                self.cursor_row -= 1;
                self.cursor_col = self.cursor_col.min(self.lines[self.cursor_row].chars().count());
            }
            KeyCode::Down if self.cursor_row + 1 < self.lines.len() => {
                self.cursor_row += 1;
                self.cursor_col = self.cursor_col.min(self.lines[self.cursor_row].chars().count());
            }
            KeyCode::Home => self.cursor_col = 0,
            KeyCode::End => self.cursor_col = self.lines[self.cursor_row].chars().count(),
            _ => {}
        }
    }
}

impl InputBar for TextInputBar {
    fn desired_height(&self, geometry: InputGeometry) -> u16 {
        if self.is_empty() {
            return 1;
        }
        let content_width =
            geometry.width.saturating_sub(INPUT_PAD * 2).saturating_sub(PROMPT_WIDTH) as usize;
        if content_width == 0 {
            return 1;
        }
        let mut total: u16 = 0;
        for line in &self.lines {
            let chars = line.chars().count();
            #[allow(clippy::cast_possible_truncation)]
            let wrapped = ((chars + content_width) / content_width).max(1) as u16;
            total = total.saturating_add(wrapped);
        }
        total.min(MAX_INPUT_HEIGHT).min(geometry.height.saturating_sub(geometry.bottom_inset))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let padded = Rect {
            x: area.x + INPUT_PAD,
            y: area.y,
            width: area.width.saturating_sub(INPUT_PAD * 2),
            height: area.height,
        };

        if self.is_empty() {
            let line = Line::from(vec![
                Span::styled(
                    format!("{} ", theme::PROMPT_CHAR),
                    Style::default().fg(theme::ACCENT),
                ),
                Span::styled(self.placeholder.clone(), Style::default().fg(theme::DIM)),
            ]);
            frame.render_widget(Paragraph::new(line), padded);
            if focused {
                frame.set_cursor_position((padded.x + PROMPT_WIDTH, padded.y));
            }
            return;
        }

        // Prompt on the first line, aligned indent on continuations.
        let lines: Vec<Line> = self
            .lines
            .iter()
            .enumerate()
            .map(|(row, text)| {
                let prefix = if row == 0 {
                    Span::styled(
                        format!("{} ", theme::PROMPT_CHAR),
                        Style::default().fg(theme::ACCENT),
                    )
                } else {
                    Span::raw("  ")
                };
                Line::from(vec![prefix, Span::raw(text.clone())])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), padded);

        if !focused {
            return;
        }
        // Place the terminal cursor, accounting for visual wrapping.
        let content_width = padded.width.saturating_sub(PROMPT_WIDTH) as usize;
        if content_width == 0 {
            return;
        }
        let mut visual_row: u16 = 0;
        for row in 0..self.lines.len() {
            let line_chars = self.lines[row].chars().count();
            #[allow(clippy::cast_possible_truncation)]
            let wrapped_lines = ((line_chars + content_width) / content_width).max(1) as u16;
            if row == self.cursor_row {
                #[allow(clippy::cast_possible_truncation)]
                let wrap_row = (self.cursor_col / content_width) as u16;
                #[allow(clippy::cast_possible_truncation)]
                let wrap_col = (self.cursor_col % content_width) as u16;
                let cursor_x = padded.x + PROMPT_WIDTH + wrap_col;
                let cursor_y = padded.y + visual_row + wrap_row;
                if cursor_x < padded.right() && cursor_y < padded.bottom() {
                    frame.set_cursor_position((cursor_x, cursor_y));
                }
                return;
            }
            visual_row += wrapped_lines;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<InputEvent> {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, m) if m.contains(KeyModifiers::SHIFT) => {
                self.insert_newline();
                None
            }
            (KeyCode::Enter, _) => {
                if self.is_empty() {
                    return None;
                }
                let text = self.text();
                self.clear();
                Some(InputEvent::Submitted(text))
            }
            (KeyCode::Backspace, _) => {
                self.backspace();
                None
            }
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
                self.insert_char(c);
                None
            }
            (code, _) => {
                self.move_cursor(code);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn shift(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::SHIFT)
    }

    fn type_str(bar: &mut TextInputBar, text: &str) {
        for c in text.chars() {
            bar.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_builds_text() {
        let mut bar = TextInputBar::new();
        type_str(&mut bar, "hello");
        assert_eq!(bar.text(), "hello");
    }

    #[test]
    fn enter_submits_and_clears() {
        let mut bar = TextInputBar::new();
        type_str(&mut bar, "send me");
        assert_eq!(bar.handle_key(key(KeyCode::Enter)), Some(InputEvent::Submitted("send me".into())));
        assert!(bar.is_empty());
    }

    #[test]
    fn enter_on_empty_draft_submits_nothing() {
        let mut bar = TextInputBar::new();
        assert_eq!(bar.handle_key(key(KeyCode::Enter)), None);
    }

    #[test]
    fn shift_enter_inserts_newline() {
        let mut bar = TextInputBar::new();
        type_str(&mut bar, "one");
        bar.handle_key(shift(KeyCode::Enter));
        type_str(&mut bar, "two");
        assert_eq!(bar.text(), "one\ntwo");
    }

    #[test]
    fn backspace_joins_lines() {
        let mut bar = TextInputBar::new();
        type_str(&mut bar, "ab");
        bar.handle_key(shift(KeyCode::Enter));
        bar.handle_key(key(KeyCode::Backspace));
        assert_eq!(bar.text(), "ab");
        assert_eq!(bar.handle_key(key(KeyCode::Enter)), Some(InputEvent::Submitted("ab".into())));
    }

    #[test]
    fn backspace_handles_multibyte_chars() {
        let mut bar = TextInputBar::new();
        type_str(&mut bar, "aé");
        bar.handle_key(key(KeyCode::Backspace));
        assert_eq!(bar.text(), "a");
    }

    #[test]
    fn desired_height_grows_with_wrapping() {
        let geometry = InputGeometry { width: 20, height: 30, bottom_inset: 0 };
        let mut bar = TextInputBar::new();
        assert_eq!(bar.desired_height(geometry), 1);

        // 14 content columns at width 20; 30 chars wrap to 3 rows.
        type_str(&mut bar, &"x".repeat(30));
        assert_eq!(bar.desired_height(geometry), 3);
    }

    #[test]
    fn desired_height_is_capped() {
        let geometry = InputGeometry { width: 20, height: 30, bottom_inset: 0 };
        let mut bar = TextInputBar::new();
        for _ in 0..20 {
            type_str(&mut bar, "line");
            bar.handle_key(shift(KeyCode::Enter));
        }
        assert_eq!(bar.desired_height(geometry), MAX_INPUT_HEIGHT);
    }
}
