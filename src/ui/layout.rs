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

use ratatui::layout::{Constraint, Layout, Rect};

/// Areas of one widget pass: message list on top, separator, input bar,
/// then whatever bottom inset the host reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLayout {
    pub body: Rect,
    pub input_sep: Rect,
    pub input: Rect,
    pub inset: Rect,
}

pub fn compute(area: Rect, input_height: u16, bottom_inset: u16) -> ChatLayout {
    let input_height = input_height.max(1);

    if area.height < 4 {
        // Ultra-compact: no separator, no inset; input gets one row.
        let [body, input] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let zero = Rect::new(area.x, input.y, area.width, 0);
        return ChatLayout { body, input_sep: zero, input, inset: zero };
    }

    let [body, input_sep, input, inset] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(input_height),
        Constraint::Length(bottom_inset),
    ])
    .areas(area);
    ChatLayout { body, input_sep, input, inset }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn area(w: u16, h: u16) -> Rect {
        Rect::new(0, 0, w, h)
    }

    fn total_height(layout: &ChatLayout) -> u16 {
        layout.body.height + layout.input_sep.height + layout.input.height + layout.inset.height
    }

    #[test]
    fn areas_tile_the_full_height() {
        let layout = compute(area(80, 24), 1, 0);
        assert_eq!(total_height(&layout), 24);
        assert_eq!(layout.input.height, 1);
        assert_eq!(layout.input_sep.height, 1);
    }

    #[test]
    fn input_growth_eats_into_the_body() {
        let one = compute(area(80, 24), 1, 0);
        let five = compute(area(80, 24), 5, 0);
        assert_eq!(five.input.height, 5);
        assert_eq!(five.body.height, one.body.height - 4);
    }

    #[test]
    fn bottom_inset_is_reserved_below_the_input() {
        let layout = compute(area(80, 24), 1, 3);
        assert_eq!(layout.inset.height, 3);
        assert_eq!(layout.inset.y, 23 - 2);
        assert_eq!(total_height(&layout), 24);
    }

    #[test]
    fn zero_input_height_still_reserves_one_row() {
        let layout = compute(area(80, 24), 0, 0);
        assert_eq!(layout.input.height, 1);
    }

    #[test]
    fn ultra_compact_keeps_a_body_and_an_input() {
        let layout = compute(area(80, 3), 4, 2);
        assert_eq!(layout.body.height, 2);
        assert_eq!(layout.input.height, 1);
        assert_eq!(layout.input_sep.height, 0);
        assert_eq!(layout.inset.height, 0);
    }

    #[test]
    fn body_sits_above_the_input() {
        let layout = compute(area(80, 24), 2, 0);
        assert!(layout.body.bottom() <= layout.input.y);
    }
}
