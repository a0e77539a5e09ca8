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
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

/// Floating context menu anchored near the long-pressed cell. Content
/// comes from the host's provider; the widget only positions, draws,
/// and dismisses it.
#[derive(Debug)]
pub struct ContextMenu {
    lines: Vec<Line<'static>>,
    anchor: (u16, u16),
}

impl ContextMenu {
    pub fn new(lines: Vec<Line<'static>>, anchor: (u16, u16)) -> Self {
        Self { lines, anchor }
    }

    fn size(&self) -> (u16, u16) {
        let widest = self
            .lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.width()).sum::<usize>())
            .max()
            .unwrap_or(0);
        #[allow(clippy::cast_possible_truncation)]
        let width = (widest as u16).saturating_add(4); // border + 1 col padding
        #[allow(clippy::cast_possible_truncation)]
        let height = (self.lines.len() as u16).saturating_add(2);
        (width, height)
    }

    /// Clamp the menu inside `area`, preferring to open below-right of
    /// the anchor.
    fn placement(&self, area: Rect) -> Rect {
        let (w, h) = self.size();
        let w = w.min(area.width);
        let h = h.min(area.height);
        let x = self.anchor.0.min(area.right().saturating_sub(w)).max(area.x);
        let y = self.anchor.1.min(area.bottom().saturating_sub(h)).max(area.y);
        Rect::new(x, y, w, h)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.lines.is_empty() || area.width == 0 || area.height == 0 {
            return;
        }
        let rect = self.placement(area);
        let block = Block::new()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::MENU_BORDER));
        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(self.lines.clone()).block(block), rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn menu(anchor: (u16, u16)) -> ContextMenu {
        ContextMenu::new(vec![Line::from("Copy"), Line::from("Forward")], anchor)
    }

    #[test]
    fn sizes_to_widest_entry_plus_chrome() {
        assert_eq!(menu((0, 0)).size(), (11, 4)); // "Forward" = 7 + 4
    }

    #[test]
    fn opens_at_the_anchor_when_room_allows() {
        let rect = menu((10, 5)).placement(Rect::new(0, 0, 80, 24));
        assert_eq!((rect.x, rect.y), (10, 5));
    }

    #[test]
    fn clamps_inside_the_widget_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = menu((39, 9)).placement(area);
        assert!(rect.right() <= area.right());
        assert!(rect.bottom() <= area.bottom());
    }
}
