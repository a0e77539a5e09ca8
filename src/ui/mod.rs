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

pub mod cell;
mod detect;
mod input;
mod layout;
mod markdown;
mod menu;
pub mod theme;
mod wrap;

pub use detect::TextToken;
pub use input::{InputBar, InputEvent, InputGeometry, TextInputBar};

use crate::message::{
    CarouselItemButton, ChatMessage, ContactItem, MessageKind, QuickReplyItem,
};
use crate::scroll::ScrollSync;
use crate::store::{ChangeListener, MessageStore};
use crate::surface::{LegacyList, Mount, RenderStrategy, VirtualizedList};
use cell::{HotspotAction, render_cell};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use menu::ContextMenu;
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use std::collections::HashMap;
use uuid::Uuid;

/// A footer button under a contact cell, produced by the host's
/// provider per (contact, message) pair.
pub struct ContactCellButton {
    pub title: String,
    pub on_press: Box<dyn FnMut(&ContactItem, &ChatMessage)>,
}

impl ContactCellButton {
    pub fn new(
        title: impl Into<String>,
        on_press: impl FnMut(&ContactItem, &ChatMessage) + 'static,
    ) -> Self {
        Self { title: title.into(), on_press: Box::new(on_press) }
    }
}

/// Sub-handlers for taps on detected text tokens. Addresses have no
/// detector; the handler slot exists for hosts that mark addresses up
/// as links.
#[derive(Default)]
pub struct AttributedTextHandlers {
    pub on_url: Option<Box<dyn FnMut(&str)>>,
    pub on_phone: Option<Box<dyn FnMut(&str)>>,
    pub on_date: Option<Box<dyn FnMut(&str)>>,
    pub on_address: Option<Box<dyn FnMut(&str)>>,
}

/// Interaction the host has to act on, bubbled out of `handle_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The input bar submitted a message draft.
    Submitted(String),
}

type CellTapFn = Box<dyn FnMut(&ChatMessage)>;
type MenuProviderFn = Box<dyn FnMut(&ChatMessage) -> Vec<Line<'static>>>;
type QuickReplyFn = Box<dyn FnMut(&QuickReplyItem)>;
type ContactButtonsFn = Box<dyn FnMut(&ContactItem, &ChatMessage) -> Vec<ContactCellButton>>;
type CarouselFn = Box<dyn FnMut(&CarouselItemButton, &ChatMessage)>;

/// Absolute extent of one rendered cell, in content rows.
struct CellExtent {
    index: usize,
    start_row: usize,
    rows: usize,
}

struct PlacedHotspot {
    message_index: usize,
    row: usize,
    start_col: usize,
    width: usize,
    action: HotspotAction,
}

/// Event-mapping caches from the most recent render pass.
#[derive(Default)]
struct PassCache {
    chat_area: Rect,
    input_area: Rect,
    /// Row offset applied to the rendered content this pass.
    offset: usize,
    cells: Vec<CellExtent>,
    hotspots: Vec<PlacedHotspot>,
    contact_buttons: HashMap<Uuid, Vec<ContactCellButton>>,
}

/// The chat widget: a scrollable message list bound to a
/// [`MessageStore`], an injected input bar, and interaction callbacks.
///
/// Configure with the builder methods, then call [`ChatView::render`]
/// every frame and [`ChatView::handle_event`] for every terminal event.
pub struct ChatView {
    strategy: RenderStrategy,
    sync: ScrollSync,
    listener: ChangeListener,
    virt: VirtualizedList,
    legacy: LegacyList,
    input: Box<dyn InputBar>,
    input_focused: bool,
    bottom_inset: u16,
    on_cell_tap: CellTapFn,
    menu_provider: Option<MenuProviderFn>,
    on_quick_reply: QuickReplyFn,
    contact_buttons_provider: ContactButtonsFn,
    text_handlers: AttributedTextHandlers,
    on_carousel_action: CarouselFn,
    menu: Option<ContextMenu>,
    pass: PassCache,
}

impl ChatView {
    /// `listener` is a fresh subscription to the store this view will
    /// be rendered against (`store.subscribe()`).
    pub fn new(listener: ChangeListener) -> Self {
        Self {
            strategy: RenderStrategy::detect(),
            sync: ScrollSync::new(),
            listener,
            virt: VirtualizedList::new(),
            legacy: LegacyList::new(),
            input: Box::new(TextInputBar::new()),
            input_focused: true,
            bottom_inset: 0,
            on_cell_tap: Box::new(|msg| {
                tracing::debug!(kind = msg.kind.label(), "message cell tapped");
            }),
            menu_provider: None,
            on_quick_reply: Box::new(|_| {}),
            contact_buttons_provider: Box::new(|_, _| Vec::new()),
            text_handlers: AttributedTextHandlers::default(),
            on_carousel_action: Box::new(|_, _| {}),
            menu: None,
            pass: PassCache::default(),
        }
    }

    // -----------------------------------------------------------------
    // Builder surface
    // -----------------------------------------------------------------

    pub fn with_strategy(mut self, strategy: RenderStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_input(mut self, input: impl InputBar + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Rows kept free below the input bar (host status lines etc.).
    pub fn with_bottom_inset(mut self, rows: u16) -> Self {
        self.bottom_inset = rows;
        self
    }

    /// Triggered when a message cell is tapped.
    pub fn on_cell_tap(mut self, action: impl FnMut(&ChatMessage) + 'static) -> Self {
        self.on_cell_tap = Box::new(action);
        self
    }

    /// Present a context menu when a cell is right-clicked.
    pub fn context_menu(
        mut self,
        provider: impl FnMut(&ChatMessage) -> Vec<Line<'static>> + 'static,
    ) -> Self {
        self.menu_provider = Some(Box::new(provider));
        self
    }

    /// Triggered when a quick-reply button is selected.
    pub fn on_quick_reply(mut self, action: impl FnMut(&QuickReplyItem) + 'static) -> Self {
        self.on_quick_reply = Box::new(action);
        self
    }

    /// Provide footer buttons for contact cells.
    pub fn contact_footer_buttons(
        mut self,
        provider: impl FnMut(&ContactItem, &ChatMessage) -> Vec<ContactCellButton> + 'static,
    ) -> Self {
        self.contact_buttons_provider = Box::new(provider);
        self
    }

    /// Listen for taps on detected phone / url / date tokens.
    pub fn attributed_text_handlers(mut self, handlers: AttributedTextHandlers) -> Self {
        self.text_handlers = handlers;
        self
    }

    /// Triggered when a carousel card button is pressed.
    pub fn on_carousel_item_action(
        mut self,
        action: impl FnMut(&CarouselItemButton, &ChatMessage) + 'static,
    ) -> Self {
        self.on_carousel_action = Box::new(action);
        self
    }

    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    // -----------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------

    pub fn render(&mut self, frame: &mut Frame, area: Rect, store: &MessageStore) {
        let geometry = InputGeometry {
            width: area.width,
            height: area.height,
            bottom_inset: self.bottom_inset,
        };
        let input_height = self.input.desired_height(geometry);
        let areas = layout::compute(area, input_height, self.bottom_inset);
        self.pass.chat_area = areas.body;
        self.pass.input_area = areas.input;

        match self.strategy {
            RenderStrategy::Legacy => self.render_legacy(frame, areas.body, store),
            RenderStrategy::Virtualized => self.render_virtualized(frame, areas.body, store),
        }

        render_separator(frame, areas.input_sep);
        self.input.render(frame, areas.input, self.input_focused);

        if let Some(menu) = &self.menu {
            menu.render(frame, area);
        }
    }

    /// Rebuild the contact-button cache and return the titles for one
    /// message (empty for non-contact kinds).
    fn refresh_contact_buttons(&mut self, msg: &ChatMessage) -> Vec<String> {
        let MessageKind::Contact(contact) = &msg.kind else {
            return Vec::new();
        };
        let buttons = (self.contact_buttons_provider)(contact, msg);
        let titles = buttons.iter().map(|b| b.title.clone()).collect();
        self.pass.contact_buttons.insert(msg.id, buttons);
        titles
    }

    fn render_legacy(&mut self, frame: &mut Frame, body: Rect, store: &MessageStore) {
        self.pass.cells.clear();
        self.pass.hotspots.clear();
        self.pass.contact_buttons.clear();

        // The whole conversation goes into one paragraph; rows are
        // pre-wrapped so lines == rows.
        let mut lines: Vec<Line<'static>> = Vec::new();
        for (index, msg) in store.messages().iter().enumerate() {
            let titles = self.refresh_contact_buttons(msg);
            let rendered = render_cell(msg, body.width, &titles);
            let start_row = lines.len();
            for h in rendered.hotspots {
                self.pass.hotspots.push(PlacedHotspot {
                    message_index: index,
                    row: start_row + h.row,
                    start_col: h.start_col,
                    width: h.width,
                    action: h.action,
                });
            }
            self.pass.cells.push(CellExtent { index, start_row, rows: rendered.lines.len() });
            lines.extend(rendered.lines);
        }

        let viewport_rows = body.height as usize;
        match self.legacy.attach(body.width, viewport_rows, lines.len()) {
            Mount::First | Mount::Remount => self.sync.on_surface_mount(&mut self.legacy),
            Mount::Unchanged => {}
        }
        // One scroll adjustment per pending notification, in order.
        while self.listener.try_next().is_some() {
            self.sync.on_collection_changed(&mut self.legacy);
        }
        self.legacy.tick();

        let offset = self.legacy.row_offset();
        self.pass.offset = offset;
        #[allow(clippy::cast_possible_truncation)]
        let paragraph = Paragraph::new(Text::from(lines)).scroll((offset as u16, 0));
        frame.render_widget(paragraph, body);
    }

    fn render_virtualized(&mut self, frame: &mut Frame, body: Rect, store: &MessageStore) {
        self.pass.cells.clear();
        self.pass.hotspots.clear();
        self.pass.contact_buttons.clear();

        let viewport_rows = body.height as usize;
        if self.virt.attach(viewport_rows) == Mount::First {
            self.sync.on_surface_mount(&mut self.virt);
        }

        // Height pass: only unseen messages are measured.
        let mut titles_by_id: HashMap<Uuid, Vec<String>> = HashMap::new();
        for msg in store.messages() {
            let titles = self.refresh_contact_buttons(msg);
            titles_by_id.insert(msg.id, titles);
        }
        let width = body.width;
        self.virt.measure(store.messages(), width, |msg| {
            let titles = titles_by_id.get(&msg.id).map_or(&[] as &[String], Vec::as_slice);
            cell::cell_height(msg, width, titles)
        });

        while self.listener.try_next().is_some() {
            self.sync.on_collection_changed(&mut self.virt);
        }

        // Materialize only the rows in (and just above) the viewport.
        let (first, clip) = self.virt.visible_range();
        let offset = self.virt.offset();
        self.pass.offset = offset;

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut row_cursor = offset - clip;
        for (index, msg) in store.messages().iter().enumerate().skip(first) {
            if lines.len() >= clip + viewport_rows {
                break;
            }
            let titles = titles_by_id.remove(&msg.id).unwrap_or_default();
            let rendered = render_cell(msg, width, &titles);
            for h in rendered.hotspots {
                self.pass.hotspots.push(PlacedHotspot {
                    message_index: index,
                    row: row_cursor + h.row,
                    start_col: h.start_col,
                    width: h.width,
                    action: h.action,
                });
            }
            self.pass.cells.push(CellExtent {
                index,
                start_row: row_cursor,
                rows: rendered.lines.len(),
            });
            row_cursor += rendered.lines.len();
            lines.extend(rendered.lines);
        }

        #[allow(clippy::cast_possible_truncation)]
        let paragraph = Paragraph::new(Text::from(lines)).scroll((clip as u16, 0));
        frame.render_widget(paragraph, body);
    }

    // -----------------------------------------------------------------
    // Event handling
    // -----------------------------------------------------------------

    /// Feed one terminal event through the widget. Interactions with
    /// cells dispatch to the configured callbacks; input submissions
    /// bubble back to the host.
    pub fn handle_event(&mut self, event: &Event, store: &MessageStore) -> Option<ChatEvent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Mouse(mouse) => {
                self.handle_mouse(*mouse, store);
                None
            }
            _ => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<ChatEvent> {
        if self.menu.is_some() {
            if key.code == KeyCode::Esc {
                self.menu = None;
            }
            return None;
        }
        if self.input_focused {
            if let Some(InputEvent::Submitted(text)) = self.input.handle_key(key) {
                return Some(ChatEvent::Submitted(text));
            }
            return None;
        }
        // Unfocused: keys drive the list.
        let page = i32::from(self.pass.chat_area.height.max(2) - 1);
        match key.code {
            KeyCode::Up => self.scroll_surface_by(-1),
            KeyCode::Down => self.scroll_surface_by(1),
            KeyCode::PageUp => self.scroll_surface_by(-page),
            KeyCode::PageDown => self.scroll_surface_by(page),
            KeyCode::End => self.scroll_to_newest(),
            _ => {}
        }
        None
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, store: &MessageStore) {
        let at = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_surface_by(-3),
            MouseEventKind::ScrollDown => self.scroll_surface_by(3),
            MouseEventKind::Down(MouseButton::Left) => self.on_left_click(at, store),
            MouseEventKind::Down(MouseButton::Right) => self.on_right_click(at, store),
            _ => {}
        }
    }

    fn scroll_surface_by(&mut self, delta: i32) {
        match self.strategy {
            RenderStrategy::Virtualized => self.virt.scroll_by(delta),
            RenderStrategy::Legacy => self.legacy.scroll_by(delta),
        }
    }

    fn scroll_to_newest(&mut self) {
        match self.strategy {
            RenderStrategy::Virtualized => self.virt.scroll_to_latest(),
            RenderStrategy::Legacy => {
                use crate::surface::ListSurface as _;
                if let Some(offset) = self.legacy.bottom_offset() {
                    self.legacy.scroll_to(offset, true);
                }
            }
        }
    }

    /// Content row under a screen position, if it is inside the list.
    fn content_row_at(&self, at: Position) -> Option<(usize, usize)> {
        if !self.pass.chat_area.contains(at) {
            return None;
        }
        let row = self.pass.offset + (at.y - self.pass.chat_area.y) as usize;
        let col = (at.x - self.pass.chat_area.x) as usize;
        Some((row, col))
    }

    fn on_left_click(&mut self, at: Position, store: &MessageStore) {
        if self.menu.take().is_some() {
            return; // any click dismisses an open menu
        }
        if self.pass.input_area.contains(at) {
            self.input_focused = true;
            return;
        }
        // Tapping outside the input drops its focus.
        self.input_focused = false;

        let Some((row, col)) = self.content_row_at(at) else {
            return;
        };
        if let Some(spot) = self
            .pass
            .hotspots
            .iter()
            .find(|h| h.row == row && col >= h.start_col && col < h.start_col + h.width)
        {
            let index = spot.message_index;
            let action = spot.action.clone();
            self.dispatch_hotspot(action, index, store);
            return;
        }
        if let Some(extent) =
            self.pass.cells.iter().find(|c| row >= c.start_row && row < c.start_row + c.rows)
        {
            if let Some(msg) = store.messages().get(extent.index) {
                (self.on_cell_tap)(msg);
            }
        }
    }

    fn on_right_click(&mut self, at: Position, store: &MessageStore) {
        let Some((row, _)) = self.content_row_at(at) else {
            return;
        };
        let Some(provider) = self.menu_provider.as_mut() else {
            return;
        };
        let Some(extent) =
            self.pass.cells.iter().find(|c| row >= c.start_row && row < c.start_row + c.rows)
        else {
            return;
        };
        if let Some(msg) = store.messages().get(extent.index) {
            let lines = provider(msg);
            if !lines.is_empty() {
                self.menu = Some(ContextMenu::new(lines, (at.x, at.y)));
            }
        }
    }

    fn dispatch_hotspot(&mut self, action: HotspotAction, index: usize, store: &MessageStore) {
        let Some(msg) = store.messages().get(index) else {
            return;
        };
        match action {
            HotspotAction::QuickReply(item) => (self.on_quick_reply)(&item),
            HotspotAction::CarouselButton(button) => (self.on_carousel_action)(&button, msg),
            HotspotAction::ContactButton(i) => {
                let MessageKind::Contact(contact) = &msg.kind else {
                    return;
                };
                if let Some(buttons) = self.pass.contact_buttons.get_mut(&msg.id)
                    && let Some(button) = buttons.get_mut(i)
                {
                    (button.on_press)(contact, msg);
                }
            }
            HotspotAction::Text(token) => {
                let (slot, value) = match &token {
                    TextToken::Url(v) => (&mut self.text_handlers.on_url, v),
                    TextToken::Phone(v) => (&mut self.text_handlers.on_phone, v),
                    TextToken::Date(v) => (&mut self.text_handlers.on_date, v),
                };
                if let Some(handler) = slot {
                    handler(value);
                }
            }
        }
    }
}

fn render_separator(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let line = Line::from(Span::styled(
        theme::SEPARATOR_CHAR.repeat(area.width as usize),
        Style::default().fg(theme::DIM),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
