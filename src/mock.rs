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

//! Canned conversation data for the demo binary and for tests that need
//! a populated store.

use crate::message::{
    CarouselItem, CarouselItemButton, ChatMessage, ChatUser, ContactItem, ImageSource,
    LocationItem, MessageKind, QuickReplyItem,
};
use rand::Rng;
use rand::seq::IndexedRandom;

pub fn sender() -> ChatUser {
    ChatUser::with_glyph("You", '●')
}

pub fn chatbot() -> ChatUser {
    ChatUser::with_glyph("Chatbot", '◆')
}

const SAMPLE_IMAGES: &[&str] = &[
    "https://picsum.photos/id/1015/600/400",
    "https://picsum.photos/id/1025/600/400",
    "https://picsum.photos/id/1043/600/400",
];

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed",
    "tempor", "incididunt", "labore", "dolore", "magna", "aliqua", "enim", "minim", "veniam",
    "quis", "nostrud", "ullamco", "laboris", "nisi", "aliquip", "commodo", "consequat",
];

/// One lorem-ipsum sentence, 5 to 12 words.
pub fn sentence(rng: &mut impl Rng) -> String {
    let len = rng.random_range(5..=12);
    let mut words: Vec<&str> = Vec::with_capacity(len);
    for _ in 0..len {
        // LOREM is a non-empty const; choose cannot fail.
        if let Some(word) = LOREM.choose(rng) {
            words.push(word);
        }
    }
    let mut sentence = words.join(" ");
    if let Some(first) = sentence.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    sentence.push('.');
    sentence
}

/// The scripted demo conversation: mixed kinds, both sides talking.
pub fn sample_conversation() -> Vec<ChatMessage> {
    let you = sender();
    let bot = chatbot();
    vec![
        ChatMessage::from_sender(you.clone(), MessageKind::Text("Hi, can I ask you something?".into())),
        ChatMessage::new(bot.clone(), MessageKind::Text("Of course!".into())),
        ChatMessage::from_sender(
            you.clone(),
            MessageKind::Text(
                "Okay, here comes a longer question to see how a row wraps when the text \
                 does not fit on one line.\nWhere are you right now?"
                    .into(),
            ),
        ),
        ChatMessage::new(
            bot.clone(),
            MessageKind::Location(LocationItem { latitude: 41.04192, longitude: 28.966912 }),
        ),
        ChatMessage::new(bot.clone(), MessageKind::Text("Here is a photo".into())),
        ChatMessage::from_sender(
            you.clone(),
            MessageKind::Image(ImageSource::Local("assets/landscape.png".into())),
        ),
        ChatMessage::new(
            bot.clone(),
            MessageKind::Image(ImageSource::Remote(SAMPLE_IMAGES[0].into())),
        ),
        ChatMessage::new(
            bot.clone(),
            MessageKind::QuickReply(vec![
                QuickReplyItem::new("Sounds good", "ack"),
                QuickReplyItem::new("Tell me more", "more"),
                QuickReplyItem::new("No thanks", "decline"),
            ]),
        ),
        ChatMessage::new(
            bot.clone(),
            MessageKind::Contact(ContactItem {
                display_name: "Support Desk".into(),
                phone: Some("+1 555 0100".into()),
            }),
        ),
        ChatMessage::new(
            bot.clone(),
            MessageKind::Carousel(vec![
                CarouselItem {
                    title: "City tour".into(),
                    subtitle: "Three hours through the old town".into(),
                    image: Some(ImageSource::Remote(SAMPLE_IMAGES[1].into())),
                    buttons: vec![CarouselItemButton {
                        title: "Book now".into(),
                        url: Some("https://example.com/tour".into()),
                    }],
                },
                CarouselItem {
                    title: "Boat trip".into(),
                    subtitle: "Sunset on the water".into(),
                    image: Some(ImageSource::Remote(SAMPLE_IMAGES[2].into())),
                    buttons: vec![CarouselItemButton {
                        title: "Details".into(),
                        url: Some("https://example.com/boat".into()),
                    }],
                },
            ]),
        ),
        ChatMessage::new(
            bot.clone(),
            MessageKind::Text(
                "My turn, I'll send you a link, let's see if you can open it 🤯 \
                 https://github.com/ratatui/ratatui"
                    .into(),
            ),
        ),
        ChatMessage::from_sender(you, MessageKind::Text("Not now, maybe later..".into())),
    ]
}

fn random_user(rng: &mut impl Rng) -> (ChatUser, bool) {
    if rng.random_bool(0.5) { (sender(), true) } else { (chatbot(), false) }
}

fn random_kind(rng: &mut impl Rng) -> MessageKind {
    // Weighted like a real conversation: mostly text, the odd image or
    // quick-reply set.
    match rng.random_range(0..7u8) {
        0 => {
            let src = SAMPLE_IMAGES
                .choose(rng)
                .map_or_else(
                    // Fallback placeholder when no sample asset is available.
                    || ImageSource::Remote("https://placehold.co/600x400".into()),
                    |url| ImageSource::Remote((*url).into()),
                );
            MessageKind::Image(src)
        }
        1 => MessageKind::QuickReply(vec![
            QuickReplyItem::new("Option 1", "opt1"),
            QuickReplyItem::new("Option 2", "opt2"),
            QuickReplyItem::new("Option 3", "opt3"),
        ]),
        _ => MessageKind::Text(sentence(rng)),
    }
}

/// `count` random messages from alternating random users.
pub fn generated_messages(count: usize) -> Vec<ChatMessage> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let (user, is_sender) = random_user(&mut rng);
            let kind = random_kind(&mut rng);
            if is_sender {
                ChatMessage::from_sender(user, kind)
            } else {
                ChatMessage::new(user, kind)
            }
        })
        .collect()
}

/// A single random reply from the bot side, used by the demo to answer
/// submitted input.
pub fn bot_reply() -> ChatMessage {
    let mut rng = rand::rng();
    ChatMessage::new(chatbot(), random_kind(&mut rng))
}
