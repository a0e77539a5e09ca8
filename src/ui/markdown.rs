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

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use std::panic::{self, AssertUnwindSafe};

/// Render a text payload as markdown, overlaying `bg` (the bubble
/// background for sent messages) on every span. `tui_markdown` panics
/// on some inputs chat users genuinely type; those fall back to plain
/// text instead of taking the widget down.
pub(super) fn render_markdown_safe(text: &str, bg: Option<Color>) -> Vec<Line<'static>> {
    if let Ok(lines) =
        panic::catch_unwind(AssertUnwindSafe(|| render_with_tui_markdown(text, bg)))
    {
        lines
    } else {
        tracing::warn!("tui-markdown panic; falling back to plain-text rendering");
        plain_text_fallback(text, bg)
    }
}

fn render_with_tui_markdown(text: &str, bg: Option<Color>) -> Vec<Line<'static>> {
    let rendered = tui_markdown::from_str(text);
    rendered
        .lines
        .into_iter()
        .map(|line| {
            let owned_spans: Vec<Span<'static>> = line
                .spans
                .into_iter()
                .map(|span| {
                    let style =
                        if let Some(bg_color) = bg { span.style.bg(bg_color) } else { span.style };
                    Span::styled(span.content.into_owned(), style)
                })
                .collect();
            let line_style =
                if let Some(bg_color) = bg { line.style.bg(bg_color) } else { line.style };
            Line::from(owned_spans).style(line_style)
        })
        .collect()
}

fn plain_text_fallback(text: &str, bg: Option<Color>) -> Vec<Line<'static>> {
    let style =
        if let Some(bg_color) = bg { Style::default().bg(bg_color) } else { Style::default() };
    text.split('\n').map(|line| Line::from(Span::styled(line.to_owned(), style))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme;

    #[test]
    fn plain_chat_text_renders_one_line_per_row() {
        let lines = render_markdown_safe("hello there", None);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn bubble_background_is_applied_to_every_span() {
        let lines = render_markdown_safe("a **bold** word", Some(theme::SENDER_MSG_BG));
        for line in &lines {
            for span in &line.spans {
                assert_eq!(span.style.bg, Some(theme::SENDER_MSG_BG));
            }
        }
    }

    #[test]
    fn link_markup_is_rendered() {
        let lines = render_markdown_safe("see [the docs](https://example.com)", None);
        assert!(!lines.is_empty());
    }

    #[test]
    fn does_not_panic_on_weird_user_input() {
        let weird_inputs = [
            "- [ ] unchecked\n- [x] checked",
            "[]()[]()[]()",
            "```\nunclosed fence",
            "> - [ ] quoted checklist\n>\n> text",
            "😲😎 emoji only",
            "\u{200d}\u{200d}\u{200d}",
        ];
        for input in weird_inputs {
            let lines = render_markdown_safe(input, None);
            assert!(!lines.is_empty(), "zero lines for {input:?}");
        }
    }
}
