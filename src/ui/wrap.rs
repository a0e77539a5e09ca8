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

//! Width-bounded wrapping of styled lines.
//!
//! Cells pre-wrap their content so that one [`Line`] is exactly one
//! terminal row. Scroll offsets and hotspot coordinates stay in plain
//! row/column math -- the paragraph is never asked to wrap again.

use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Wrap a styled line to `width` columns, breaking at spaces where
/// possible and mid-word when a single word exceeds the width. Styles
/// survive the split. A `width` of 0 returns the line untouched.
pub fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line];
    }

    let mut out: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;
    let line_style = line.style;

    let mut flush = |current: &mut Vec<Span<'static>>, current_width: &mut usize| {
        out.push(Line::from(std::mem::take(current)).style(line_style));
        *current_width = 0;
    };

    for span in line.spans {
        let style = span.style;
        let mut buf = String::new();
        let mut buf_width = 0usize;

        for ch in span.content.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + buf_width + ch_width > width {
                // Try to break at the last space in the pending buffer.
                if let Some(cut) = buf.rfind(' ') {
                    let rest = buf.split_off(cut + 1);
                    if !buf.trim_end().is_empty() || !current.is_empty() {
                        current.push(Span::styled(std::mem::take(&mut buf), style));
                    }
                    flush(&mut current, &mut current_width);
                    buf = rest.trim_start().to_owned();
                } else if current.is_empty() && buf.is_empty() {
                    // A single over-wide character: emit it alone.
                    buf.push(ch);
                    current.push(Span::styled(std::mem::take(&mut buf), style));
                    flush(&mut current, &mut current_width);
                    buf_width = 0;
                    continue;
                } else {
                    // No break point in the pending word. If the row
                    // already holds committed spans, move the whole
                    // word to the next row; otherwise hard-break it.
                    if current.is_empty() {
                        current.push(Span::styled(std::mem::take(&mut buf), style));
                    }
                    flush(&mut current, &mut current_width);
                }
                buf_width = buf.chars().filter_map(UnicodeWidthChar::width).sum();
            }
            buf.push(ch);
            buf_width += ch_width;
        }

        if !buf.is_empty() {
            current_width += buf_width;
            current.push(Span::styled(buf, style));
        }
    }

    if !current.is_empty() || out.is_empty() {
        out.push(Line::from(current).style(line_style));
    }
    out
}

/// Wrap every line in `lines` to `width`.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    lines.into_iter().flat_map(|line| wrap_line(line, width)).collect()
}

/// Flatten a line back to its plain text, ignoring styling.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::style::{Color, Style};
    use unicode_width::UnicodeWidthStr;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(line_text).collect()
    }

    #[test]
    fn short_line_is_untouched() {
        let wrapped = wrap_line(Line::from("hello"), 20);
        assert_eq!(texts(&wrapped), ["hello"]);
    }

    #[test]
    fn breaks_at_spaces() {
        let wrapped = wrap_line(Line::from("the quick brown fox jumps"), 10);
        for line in &wrapped {
            assert!(line_text(line).width() <= 10, "line too wide: {:?}", line_text(line));
        }
        let rejoined = texts(&wrapped).join(" ").split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(rejoined, "the quick brown fox jumps");
    }

    #[test]
    fn breaks_mid_word_when_word_exceeds_width() {
        let wrapped = wrap_line(Line::from("abcdefghij"), 4);
        assert_eq!(texts(&wrapped), ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn style_survives_the_split() {
        let style = Style::default().fg(Color::Blue);
        let line = Line::from(Span::styled("aaaa bbbb cccc", style));
        let wrapped = wrap_line(line, 5);
        assert!(wrapped.len() > 1);
        for line in &wrapped {
            for span in &line.spans {
                assert_eq!(span.style, style);
            }
        }
    }

    #[test]
    fn wide_characters_count_double() {
        // CJK glyphs occupy two columns each.
        let wrapped = wrap_line(Line::from("你好世界"), 4);
        assert_eq!(texts(&wrapped), ["你好", "世界"]);
    }

    #[test]
    fn zero_width_disables_wrapping() {
        let wrapped = wrap_line(Line::from("anything at all"), 0);
        assert_eq!(texts(&wrapped), ["anything at all"]);
    }

    #[test]
    fn empty_line_stays_one_row() {
        let wrapped = wrap_line(Line::default(), 10);
        assert_eq!(wrapped.len(), 1);
    }
}
