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

//! Per-kind message cells.
//!
//! A cell is the rendered form of one message: a name header, the
//! payload rows, and a trailing blank separator. Rows are pre-wrapped
//! to the given width (one [`Line`] == one terminal row), and every
//! interactive region is reported as a [`Hotspot`] in cell-local
//! row/column coordinates.

use crate::message::{
    CarouselItem, CarouselItemButton, ChatMessage, ImageSource, LocationItem, MessageKind,
    QuickReplyItem,
};
use crate::ui::detect::{self, TextToken};
use crate::ui::theme;
use crate::ui::wrap;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Columns of indent under the name header.
pub const CELL_INDENT: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum HotspotAction {
    QuickReply(QuickReplyItem),
    CarouselButton(CarouselItemButton),
    /// Index into the host-provided contact footer buttons.
    ContactButton(usize),
    Text(TextToken),
}

/// An interactive region inside a cell, in cell-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub row: usize,
    pub start_col: usize,
    pub width: usize,
    pub action: HotspotAction,
}

#[derive(Debug, Default)]
pub struct CellRender {
    pub lines: Vec<Line<'static>>,
    pub hotspots: Vec<Hotspot>,
}

fn indent() -> Span<'static> {
    Span::raw(" ".repeat(CELL_INDENT))
}

fn header_line(msg: &ChatMessage) -> Line<'static> {
    let style = Style::default().fg(theme::name_color(msg.is_sender)).add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();
    if let Some(glyph) = msg.user.glyph {
        spans.push(Span::styled(format!("{glyph} "), style));
    }
    spans.push(Span::styled(msg.user.name.clone(), style));
    spans.push(Span::styled(
        if msg.is_sender { "  (you)" } else { "" }.to_owned(),
        Style::default().fg(theme::DIM),
    ));
    Line::from(spans)
}

/// Render `msg` into rows at most `width` columns wide.
/// `contact_buttons` are the host-provided footer button titles, only
/// consulted for contact cells.
pub fn render_cell(msg: &ChatMessage, width: u16, contact_buttons: &[String]) -> CellRender {
    let width = width as usize;
    let content_width = width.saturating_sub(CELL_INDENT);
    let mut out = CellRender::default();
    out.lines.push(header_line(msg));

    match &msg.kind {
        MessageKind::Text(text) => render_text(&mut out, text, msg.is_sender, content_width),
        MessageKind::Image(source) => out.lines.push(image_caption(source)),
        MessageKind::Location(loc) => out.lines.push(location_row(loc)),
        MessageKind::QuickReply(items) => {
            let labels: Vec<String> = items.iter().map(|i| i.title.clone()).collect();
            flow_buttons(&mut out, &labels, width, |i| {
                HotspotAction::QuickReply(items[i].clone())
            });
        }
        MessageKind::Contact(contact) => {
            out.lines.push(Line::from(vec![
                indent(),
                Span::styled(
                    format!("{} ", theme::ICON_CONTACT),
                    Style::default().fg(theme::DIM),
                ),
                Span::styled(
                    contact.display_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            if let Some(phone) = &contact.phone {
                let row = out.lines.len();
                out.lines.push(Line::from(vec![
                    indent(),
                    Span::styled(phone.clone(), Style::default().fg(theme::LINK_FG)),
                ]));
                out.hotspots.push(Hotspot {
                    row,
                    start_col: CELL_INDENT,
                    width: phone.width(),
                    action: HotspotAction::Text(TextToken::Phone(phone.clone())),
                });
            }
            if !contact_buttons.is_empty() {
                flow_buttons(&mut out, contact_buttons, width, HotspotAction::ContactButton);
            }
        }
        MessageKind::Carousel(items) => render_carousel(&mut out, items, width),
    }

    // Blank separator between cells.
    out.lines.push(Line::default());
    out
}

/// Rows a cell occupies at `width`; what the virtualized surface caches.
pub fn cell_height(msg: &ChatMessage, width: u16, contact_buttons: &[String]) -> usize {
    render_cell(msg, width, contact_buttons).lines.len()
}

fn render_text(out: &mut CellRender, text: &str, is_sender: bool, content_width: usize) {
    let rendered = super::markdown::render_markdown_safe(text, theme::bubble_bg(is_sender));
    for line in wrap::wrap_lines(rendered, content_width) {
        let style = line.style;
        let mut spans = vec![indent()];
        spans.extend(line.spans);
        let row = out.lines.len();
        let full = Line::from(spans).style(style);
        // Token spans are detected on the final row text, indent and
        // all, so their columns are screen columns.
        for token in detect::scan_row(&wrap::line_text(&full)) {
            out.hotspots.push(Hotspot {
                row,
                start_col: token.start_col,
                width: token.width,
                action: HotspotAction::Text(token.token),
            });
        }
        out.lines.push(full);
    }
}

fn image_caption(source: &ImageSource) -> Line<'static> {
    let caption = match source {
        ImageSource::Local(path) => {
            if path.exists() {
                format!("{} (local)", path.display())
            } else {
                // Missing asset degrades to a placeholder caption.
                format!("image unavailable: {}", path.display())
            }
        }
        ImageSource::Remote(url) => format!("{url} (remote)"),
    };
    Line::from(vec![
        indent(),
        Span::styled(format!("{} ", theme::ICON_IMAGE), Style::default().fg(theme::DIM)),
        Span::styled(caption, Style::default().fg(theme::DIM)),
    ])
}

fn location_row(loc: &LocationItem) -> Line<'static> {
    Line::from(vec![
        indent(),
        Span::styled(format!("{} ", theme::ICON_LOCATION), Style::default().fg(theme::DIM)),
        Span::raw(format!("{:.5}, {:.5}", loc.latitude, loc.longitude)),
    ])
}

/// Lay `[ label ]` buttons left to right, wrapping to new rows when the
/// next button would overflow. One hotspot per button.
fn flow_buttons(
    out: &mut CellRender,
    labels: &[String],
    width: usize,
    mut action: impl FnMut(usize) -> HotspotAction,
) {
    const GAP: usize = 2;
    let mut spans: Vec<Span<'static>> = vec![indent()];
    let mut col = CELL_INDENT;

    for (i, label) in labels.iter().enumerate() {
        let button_width = label.width() + 4; // "[ " + label + " ]"
        if col > CELL_INDENT && col + GAP + button_width > width {
            out.lines.push(Line::from(std::mem::replace(&mut spans, vec![indent()])));
            col = CELL_INDENT;
        } else if col > CELL_INDENT {
            spans.push(Span::raw(" ".repeat(GAP)));
            col += GAP;
        }
        out.hotspots.push(Hotspot {
            row: out.lines.len(),
            start_col: col,
            width: button_width,
            action: action(i),
        });
        spans.push(Span::styled("[ ", Style::default().fg(theme::BUTTON_BRACKET)));
        spans.push(Span::styled(label.clone(), Style::default().fg(theme::BUTTON_FG)));
        spans.push(Span::styled(" ]", Style::default().fg(theme::BUTTON_BRACKET)));
        col += button_width;
    }
    if spans.len() > 1 {
        out.lines.push(Line::from(spans));
    }
}

fn render_carousel(out: &mut CellRender, items: &[CarouselItem], width: usize) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.lines.push(Line::from(vec![
                indent(),
                Span::styled(
                    theme::SEPARATOR_CHAR.repeat(width.saturating_sub(CELL_INDENT).min(24)),
                    Style::default().fg(theme::DIM),
                ),
            ]));
        }
        out.lines.push(Line::from(vec![
            indent(),
            Span::styled(item.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]));
        if !item.subtitle.is_empty() {
            out.lines.push(Line::from(vec![
                indent(),
                Span::styled(item.subtitle.clone(), Style::default().fg(theme::DIM)),
            ]));
        }
        if let Some(image) = &item.image {
            out.lines.push(image_caption(image));
        }
        let labels: Vec<String> = item.buttons.iter().map(|b| b.title.clone()).collect();
        flow_buttons(out, &labels, width, |b| {
            HotspotAction::CarouselButton(item.buttons[b].clone())
        });
    }
}
