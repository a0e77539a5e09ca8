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

use ratatui::style::Color;

// Accent
pub const ACCENT: Color = Color::Rgb(93, 169, 255);

// UI chrome
pub const DIM: Color = Color::DarkGray;
pub const PROMPT_CHAR: &str = "❯";
pub const SEPARATOR_CHAR: &str = "─";
pub const MENU_BORDER: Color = Color::Rgb(100, 100, 100);

// Sent-message bubble background
pub const SENDER_MSG_BG: Color = Color::Rgb(40, 44, 52);

// Name header colors
pub const NAME_SENDER: Color = ACCENT;
pub const NAME_RECEIVED: Color = Color::White;

// Interactive elements (muted, no bright green/cyan)
pub const BUTTON_FG: Color = Color::White;
pub const BUTTON_BRACKET: Color = Color::DarkGray;
pub const LINK_FG: Color = Color::Blue;

// Cell kind glyphs. Monochrome Unicode symbols.
pub const ICON_IMAGE: &str = "▦";
pub const ICON_LOCATION: &str = "⌖";
pub const ICON_CONTACT: &str = "☎";

/// Header color for a message's user name.
pub fn name_color(is_sender: bool) -> Color {
    if is_sender { NAME_SENDER } else { NAME_RECEIVED }
}

/// Bubble background, applied to sent messages only.
pub fn bubble_bg(is_sender: bool) -> Option<Color> {
    is_sender.then_some(SENDER_MSG_BG)
}
