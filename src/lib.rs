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

//! A scrollable chat message list for ratatui, bound to an observable
//! message collection, with per-kind cells, an injectable input bar,
//! and interaction callbacks. See [`ui::ChatView`] for the entry point.

pub mod message;
pub mod mock;
pub mod scroll;
pub mod store;
pub mod surface;
pub mod ui;

pub use message::{
    CarouselItem, CarouselItemButton, ChatMessage, ChatUser, ContactItem, ImageSource,
    LocationItem, MessageKind, QuickReplyItem,
};
pub use scroll::ScrollSync;
pub use store::{ChangeListener, CollectionChanged, MessageStore, StoreError};
pub use surface::{LegacyList, ListSurface, Mount, RenderStrategy, VirtualizedList};
pub use ui::{
    AttributedTextHandlers, ChatEvent, ChatView, ContactCellButton, InputBar, InputEvent,
    InputGeometry, TextInputBar, TextToken,
};
