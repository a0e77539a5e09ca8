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

use crate::surface::ListSurface;

/// Keeps the newest message visible as the bound collection mutates,
/// and carries the scroll position across surface remounts.
///
/// Two states: unbound (no surface seen yet) and bound. The first mount
/// only binds -- scrolling there would animate the initial population
/// into view. Every later mount re-applies the saved offset to the
/// fresh surface instance, and every collection-changed notification
/// recomputes the bottom offset and scrolls to it.
///
/// Notifications are handled one at a time with no coalescing; a burst
/// of mutations produces a burst of scroll requests, each simply
/// re-targeting the surface.
#[derive(Debug, Default)]
pub struct ScrollSync {
    bound: bool,
    saved_offset: Option<usize>,
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last offset handed to the surface, if any mutation has ever
    /// produced one.
    pub fn saved_offset(&self) -> Option<usize> {
        self.saved_offset
    }

    /// The surface for the current pass came up. First mount binds
    /// without scrolling; later mounts restore the saved offset onto
    /// the new instance with an animated scroll.
    pub fn on_surface_mount(&mut self, surface: &mut dyn ListSurface) {
        if !self.bound {
            self.bound = true;
            return;
        }
        if let Some(offset) = self.saved_offset {
            tracing::trace!(offset, "restoring scroll position after remount");
            surface.scroll_to(offset, true);
        }
    }

    /// The bound collection mutated. Recompute the bottom extent; when
    /// the content overflows the viewport, save it and glide there.
    /// Content that fits needs no scroll and leaves the saved offset
    /// untouched.
    pub fn on_collection_changed(&mut self, surface: &mut dyn ListSurface) {
        let Some(offset) = surface.bottom_offset() else {
            return;
        };
        self.saved_offset = Some(offset);
        surface.scroll_to(offset, true);
        tracing::trace!(offset, "following newest message");
    }
}
