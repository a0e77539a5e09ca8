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

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// A participant in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    pub name: String,
    /// Single-cell glyph shown in the gutter next to this user's messages.
    pub glyph: Option<char>,
}

impl ChatUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), glyph: None }
    }

    pub fn with_glyph(name: impl Into<String>, glyph: char) -> Self {
        Self { name: name.into(), glyph: Some(glyph) }
    }
}

/// Where an image cell sources its pixels from.
///
/// Terminals cannot blit either one; both render as a captioned
/// placeholder, but hosts routing taps or exporting transcripts still
/// need to know which side owns the asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    /// Asset on the local filesystem.
    Local(PathBuf),
    /// Asset addressed by URL, fetched by the host if at all.
    Remote(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationItem {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReplyItem {
    pub title: String,
    pub payload: String,
}

impl QuickReplyItem {
    pub fn new(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self { title: title.into(), payload: payload.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactItem {
    pub display_name: String,
    pub phone: Option<String>,
}

/// A button on a carousel card. `url` is opaque payload for the host;
/// the widget only reports which button was pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselItemButton {
    pub title: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselItem {
    pub title: String,
    pub subtitle: String,
    pub image: Option<ImageSource>,
    pub buttons: Vec<CarouselItemButton>,
}

/// Payload variant of a message. Immutable once constructed -- store
/// mutations replace whole messages, they never edit a payload in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageKind {
    Text(String),
    Image(ImageSource),
    Location(LocationItem),
    QuickReply(Vec<QuickReplyItem>),
    Contact(ContactItem),
    Carousel(Vec<CarouselItem>),
}

impl MessageKind {
    /// Short label used by status lines and logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Location(_) => "location",
            Self::QuickReply(_) => "quick-reply",
            Self::Contact(_) => "contact",
            Self::Carousel(_) => "carousel",
        }
    }
}

/// One chat entry. The id is assigned at construction and stays stable
/// for the message's lifetime -- cells, height caches, and hosts all key
/// on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user: ChatUser,
    pub kind: MessageKind,
    pub is_sender: bool,
}

impl ChatMessage {
    pub fn new(user: ChatUser, kind: MessageKind) -> Self {
        Self { id: Uuid::new_v4(), user, kind, is_sender: false }
    }

    pub fn from_sender(user: ChatUser, kind: MessageKind) -> Self {
        Self { id: Uuid::new_v4(), user, kind, is_sender: true }
    }
}
