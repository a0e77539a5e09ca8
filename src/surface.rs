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

use crate::message::ChatMessage;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// How the message list is laid out and scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Lazily materialize only the visible rows from cached heights.
    Virtualized,
    /// Materialize every row into one paragraph with a manual offset.
    Legacy,
}

impl RenderStrategy {
    /// Pick the best strategy the build supports. The virtualized path
    /// needs the incremental row-measurement capability; without it the
    /// legacy full-paragraph list is the only option.
    pub fn detect() -> Self {
        if cfg!(feature = "virtualized") { Self::Virtualized } else { Self::Legacy }
    }
}

/// Outcome of attaching a surface to the current render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    /// Surface seen for the first time.
    First,
    /// Surface was rebuilt since the last pass; prior offsets are void.
    Remount,
    /// Same surface instance as last pass.
    Unchanged,
}

/// A scrollable list surface, reduced to the two operations the scroll
/// synchronizer needs. Both operations are best-effort: an unmounted
/// surface answers `None` / ignores the scroll, never errors.
pub trait ListSurface {
    /// `content_extent - viewport_extent`, or `None` when the content
    /// fits inside the viewport and no scrolling is meaningful.
    fn bottom_offset(&self) -> Option<usize>;

    /// Move the visible window to `offset` (clamped to the content).
    /// Animated scrolls glide over the next few ticks; non-animated
    /// scrolls snap immediately.
    fn scroll_to(&mut self, offset: usize, animated: bool);
}

// ---------------------------------------------------------------------------
// Legacy full-paragraph list
// ---------------------------------------------------------------------------

/// Fallback surface: the whole conversation is rendered into a single
/// wrapped paragraph and scrolled by row offset.
///
/// Its layout is tied to the wrap width, so a width change rebuilds the
/// surface -- reported as [`Mount::Remount`] so the caller can restore
/// the previous scroll position onto the fresh instance.
#[derive(Debug, Default)]
pub struct LegacyList {
    mounted: bool,
    width: u16,
    content_rows: usize,
    viewport_rows: usize,
    scroll_target: usize,
    /// Fractional position for animation; converges on `scroll_target`.
    scroll_pos: f32,
}

impl LegacyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind this surface to the current pass's geometry.
    pub fn attach(&mut self, width: u16, viewport_rows: usize, content_rows: usize) -> Mount {
        self.viewport_rows = viewport_rows;
        self.content_rows = content_rows;
        if !self.mounted {
            self.mounted = true;
            self.width = width;
            Mount::First
        } else if width != self.width {
            // Rewrapped at a new width: every prior row offset is void.
            self.width = width;
            self.scroll_target = 0;
            self.scroll_pos = 0.0;
            Mount::Remount
        } else {
            Mount::Unchanged
        }
    }

    fn max_offset(&self) -> usize {
        self.content_rows.saturating_sub(self.viewport_rows)
    }

    /// Advance the scroll animation by one frame.
    #[allow(clippy::cast_precision_loss)]
    pub fn tick(&mut self) {
        let target = self.scroll_target.min(self.max_offset()) as f32;
        let delta = target - self.scroll_pos;
        if delta.abs() < 0.01 {
            self.scroll_pos = target;
        } else {
            // Smooth over ~2-3 frames at 30fps.
            self.scroll_pos += delta * 0.5;
        }
    }

    /// Row offset to apply to the rendered paragraph this frame.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn row_offset(&self) -> usize {
        self.scroll_pos.round().max(0.0) as usize
    }

    /// User-driven scrolling (mouse wheel / keys): jump without animation.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scroll_by(&mut self, delta: i32) {
        if !self.mounted {
            return;
        }
        let next = (self.row_offset() as i64 + i64::from(delta))
            .clamp(0, self.max_offset() as i64) as usize;
        self.scroll_target = next;
        self.scroll_pos = next as f32;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl ListSurface for LegacyList {
    fn bottom_offset(&self) -> Option<usize> {
        if !self.mounted {
            return None;
        }
        let overflow = self.content_rows.saturating_sub(self.viewport_rows);
        (overflow > 0).then_some(overflow)
    }

    #[allow(clippy::cast_precision_loss)]
    fn scroll_to(&mut self, offset: usize, animated: bool) {
        if !self.mounted {
            return;
        }
        self.scroll_target = offset.min(self.max_offset());
        if !animated {
            self.scroll_pos = self.scroll_target as f32;
        }
    }
}

// ---------------------------------------------------------------------------
// Virtualized list
// ---------------------------------------------------------------------------

/// Preferred surface: per-message heights are cached by id so each pass
/// only measures messages it has not seen at the current width, and only
/// the visible rows are materialized.
///
/// Persists across render passes and never remounts; following the tail
/// is its native primitive, so offset restoration never has work to do
/// here.
#[derive(Debug)]
pub struct VirtualizedList {
    mounted: bool,
    viewport_rows: usize,
    cached_width: u16,
    heights: HashMap<Uuid, usize>,
    /// Message ids in render order, refreshed by `measure`.
    order: Vec<Uuid>,
    offset: usize,
    /// Pin the viewport to the newest content.
    follow: bool,
}

impl Default for VirtualizedList {
    fn default() -> Self {
        Self {
            mounted: false,
            viewport_rows: 0,
            cached_width: 0,
            heights: HashMap::new(),
            order: Vec::new(),
            offset: 0,
            follow: true,
        }
    }
}

impl VirtualizedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to the current pass's viewport. Always [`Mount::Unchanged`]
    /// after the first pass -- this surface survives re-renders.
    pub fn attach(&mut self, viewport_rows: usize) -> Mount {
        self.viewport_rows = viewport_rows;
        if self.mounted {
            Mount::Unchanged
        } else {
            self.mounted = true;
            Mount::First
        }
    }

    /// Refresh the height cache against the live collection. `measure`
    /// is only invoked for messages without a cached height at `width`.
    pub fn measure<F>(&mut self, messages: &[ChatMessage], width: u16, mut measure: F)
    where
        F: FnMut(&ChatMessage) -> usize,
    {
        if width != self.cached_width {
            self.heights.clear();
            self.cached_width = width;
        }
        self.order.clear();
        for msg in messages {
            self.order.push(msg.id);
            self.heights.entry(msg.id).or_insert_with(|| measure(msg));
        }
        let live: HashSet<Uuid> = self.order.iter().copied().collect();
        self.heights.retain(|id, _| live.contains(id));

        if self.follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    fn total_rows(&self) -> usize {
        self.order.iter().filter_map(|id| self.heights.get(id)).sum()
    }

    fn max_offset(&self) -> usize {
        self.total_rows().saturating_sub(self.viewport_rows)
    }

    /// Native tail primitive: pin to the newest message.
    pub fn scroll_to_latest(&mut self) {
        self.follow = true;
        self.offset = self.max_offset();
    }

    /// User-driven scrolling. Scrolling away from the bottom disengages
    /// tail-following; reaching it again re-engages.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn scroll_by(&mut self, delta: i32) {
        if !self.mounted {
            return;
        }
        self.offset = (self.offset as i64 + i64::from(delta)).clamp(0, self.max_offset() as i64)
            as usize;
        self.follow = self.offset >= self.max_offset();
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Index of the first visible message and how many of its rows are
    /// clipped above the viewport top.
    pub fn visible_range(&self) -> (usize, usize) {
        let mut remaining = self.offset;
        for (idx, id) in self.order.iter().enumerate() {
            let h = self.heights.get(id).copied().unwrap_or(0);
            if remaining < h {
                return (idx, remaining);
            }
            remaining -= h;
        }
        (self.order.len(), 0)
    }

    pub fn height_of(&self, id: Uuid) -> Option<usize> {
        self.heights.get(&id).copied()
    }
}

impl ListSurface for VirtualizedList {
    fn bottom_offset(&self) -> Option<usize> {
        if !self.mounted {
            return None;
        }
        let overflow = self.total_rows().saturating_sub(self.viewport_rows);
        (overflow > 0).then_some(overflow)
    }

    fn scroll_to(&mut self, offset: usize, _animated: bool) {
        if !self.mounted {
            return;
        }
        self.offset = offset.min(self.max_offset());
        self.follow = self.offset >= self.max_offset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ChatUser, MessageKind};
    use pretty_assertions::assert_eq;

    fn msg(n: usize) -> ChatMessage {
        ChatMessage::new(ChatUser::new("u"), MessageKind::Text(format!("m{n}")))
    }

    #[test]
    fn unmounted_legacy_surface_is_inert() {
        let mut list = LegacyList::new();
        assert_eq!(list.bottom_offset(), None);
        list.scroll_to(10, true);
        assert_eq!(list.row_offset(), 0);
    }

    #[test]
    fn legacy_attach_reports_first_then_unchanged() {
        let mut list = LegacyList::new();
        assert_eq!(list.attach(80, 20, 100), Mount::First);
        assert_eq!(list.attach(80, 20, 120), Mount::Unchanged);
    }

    #[test]
    fn legacy_width_change_is_a_remount() {
        let mut list = LegacyList::new();
        list.attach(80, 20, 100);
        list.scroll_to(50, false);
        assert_eq!(list.attach(60, 20, 100), Mount::Remount);
        // Offsets from the old wrap width are discarded.
        assert_eq!(list.row_offset(), 0);
    }

    #[test]
    fn legacy_bottom_offset_is_none_when_content_fits() {
        let mut list = LegacyList::new();
        list.attach(80, 500, 300);
        assert_eq!(list.bottom_offset(), None);
        // Exactly filling the viewport still needs no scroll.
        list.attach(80, 500, 500);
        assert_eq!(list.bottom_offset(), None);
    }

    #[test]
    fn legacy_bottom_offset_is_overflow_rows() {
        let mut list = LegacyList::new();
        list.attach(80, 500, 520);
        assert_eq!(list.bottom_offset(), Some(20));
    }

    #[test]
    fn legacy_animated_scroll_converges_on_target() {
        let mut list = LegacyList::new();
        list.attach(80, 10, 100);
        list.scroll_to(90, true);
        assert_eq!(list.row_offset(), 0, "animated scroll must not jump");
        for _ in 0..32 {
            list.tick();
        }
        assert_eq!(list.row_offset(), 90);
    }

    #[test]
    fn legacy_unanimated_scroll_snaps() {
        let mut list = LegacyList::new();
        list.attach(80, 10, 100);
        list.scroll_to(90, false);
        assert_eq!(list.row_offset(), 90);
    }

    #[test]
    fn legacy_scroll_target_clamps_to_content() {
        let mut list = LegacyList::new();
        list.attach(80, 10, 30);
        list.scroll_to(9999, false);
        assert_eq!(list.row_offset(), 20);
    }

    #[test]
    fn virtualized_never_remounts() {
        let mut list = VirtualizedList::new();
        assert_eq!(list.attach(20), Mount::First);
        assert_eq!(list.attach(20), Mount::Unchanged);
        assert_eq!(list.attach(40), Mount::Unchanged);
    }

    #[test]
    fn virtualized_measures_each_message_once_per_width() {
        let mut list = VirtualizedList::new();
        list.attach(10);
        let messages: Vec<_> = (0..4).map(msg).collect();

        let mut calls = 0;
        list.measure(&messages, 80, |_| {
            calls += 1;
            3
        });
        assert_eq!(calls, 4);

        list.measure(&messages, 80, |_| {
            calls += 1;
            3
        });
        assert_eq!(calls, 4, "cached heights must be reused");

        list.measure(&messages, 40, |_| {
            calls += 1;
            5
        });
        assert_eq!(calls, 8, "width change invalidates every height");
    }

    #[test]
    fn virtualized_follows_tail_as_content_grows() {
        let mut list = VirtualizedList::new();
        list.attach(10);
        let mut messages: Vec<_> = (0..3).map(msg).collect();
        list.measure(&messages, 80, |_| 2);
        assert_eq!(list.offset(), 0, "6 rows fit in a 10-row viewport");

        messages.extend((3..10).map(msg));
        list.measure(&messages, 80, |_| 2);
        assert_eq!(list.offset(), 10, "pinned to the bottom of 20 rows");
        assert!(list.is_following());
    }

    #[test]
    fn virtualized_scrolling_up_disengages_follow() {
        let mut list = VirtualizedList::new();
        list.attach(10);
        let messages: Vec<_> = (0..10).map(msg).collect();
        list.measure(&messages, 80, |_| 2);

        list.scroll_by(-5);
        assert!(!list.is_following());
        let before = list.offset();

        // New content must not yank the viewport while reading backlog.
        list.measure(&messages, 80, |_| 2);
        assert_eq!(list.offset(), before);

        list.scroll_to_latest();
        assert!(list.is_following());
        assert_eq!(list.offset(), 10);
    }

    #[test]
    fn virtualized_visible_range_walks_heights() {
        let mut list = VirtualizedList::new();
        list.attach(5);
        let messages: Vec<_> = (0..4).map(msg).collect();
        // Heights 4 each, 16 rows total, viewport 5 → offset 11.
        list.measure(&messages, 80, |_| 4);
        assert_eq!(list.offset(), 11);
        // Row 11 is inside message 2 (rows 8..12), 3 rows clipped.
        assert_eq!(list.visible_range(), (2, 3));
    }

    #[test]
    fn virtualized_drops_heights_of_removed_messages() {
        let mut list = VirtualizedList::new();
        list.attach(10);
        let messages: Vec<_> = (0..3).map(msg).collect();
        list.measure(&messages, 80, |_| 2);
        let gone = messages[0].id;

        list.measure(&messages[1..], 80, |_| 2);
        assert_eq!(list.height_of(gone), None);
    }

    #[test]
    fn strategy_detect_prefers_virtualized_when_compiled_in() {
        let expected = if cfg!(feature = "virtualized") {
            RenderStrategy::Virtualized
        } else {
            RenderStrategy::Legacy
        };
        assert_eq!(RenderStrategy::detect(), expected);
    }
}
