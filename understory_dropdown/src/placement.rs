// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement engine: keep an opening menu inside the viewport.
//!
//! When a menu opens, its client rectangle is measured against the viewport.
//! Overflowing the right (or left) edge aligns it to the trigger's trailing
//! edge; overflowing the bottom (or top) edge flips it above the trigger.
//! A static preference from markup forces either flag regardless of overflow.
//!
//! Flipping upward can push the menu past the top of the viewport, so the
//! menu is measured again and the upward flip is dropped if the top edge is
//! still negative.

use kurbo::{Rect, Size};
use understory_dom::{Document, NodeId, PlacementFlags};

use crate::markers::Markers;

/// Which viewport edges a rectangle crosses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Overflow {
    /// Left edge negative or right edge past the viewport width.
    pub right: bool,
    /// Top edge negative or bottom edge past the viewport height.
    pub bottom: bool,
}

impl Overflow {
    /// Measure `rect` against a viewport of `viewport` size anchored at the origin.
    pub fn measure(rect: Rect, viewport: Size) -> Self {
        Self {
            right: rect.x0 < 0.0 || rect.x1 > viewport.width,
            bottom: rect.y0 < 0.0 || rect.y1 > viewport.height,
        }
    }

    /// Flags this overflow calls for.
    pub fn flags(self) -> PlacementFlags {
        let mut flags = PlacementFlags::empty();
        flags.set(PlacementFlags::END, self.right);
        flags.set(PlacementFlags::ABOVE, self.bottom);
        flags
    }
}

/// Static placement preference read from a menu's markup classes.
pub fn preference(doc: &Document, menu: NodeId, markers: &Markers) -> PlacementFlags {
    let mut flags = PlacementFlags::empty();
    flags.set(
        PlacementFlags::ABOVE,
        doc.has_class(menu, &markers.top_class),
    );
    flags.set(PlacementFlags::END, doc.has_class(menu, &markers.end_class));
    flags
}

/// Measure `menu`, apply placement classes, and correct an upward flip that
/// leaves the top edge off-screen. Returns the flags left applied.
pub fn apply(
    doc: &mut Document,
    menu: NodeId,
    preferred: PlacementFlags,
    markers: &Markers,
) -> PlacementFlags {
    let rect = doc.client_rect(menu);
    // An unmeasurable menu still gets its static preference.
    let overflow = rect.map_or_else(Overflow::default, |r| Overflow::measure(r, doc.viewport()));
    let wanted = overflow.flags() | preferred;
    log::trace!("menu {menu:?} at {rect:?}: {overflow:?}, applying {wanted:?}");

    if wanted.contains(PlacementFlags::END) {
        doc.add_class(menu, &markers.end_class);
    }
    if wanted.contains(PlacementFlags::ABOVE) {
        doc.add_class(menu, &markers.top_class);
    }

    if doc.client_rect(menu).is_some_and(|r| r.y0 < 0.0) {
        log::trace!("menu {menu:?} flipped above the viewport, dropping upward placement");
        doc.remove_class(menu, &markers.top_class);
    }

    preference(doc, menu, markers)
}

/// Remove both placement classes.
pub fn clear(doc: &mut Document, menu: NodeId, markers: &Markers) {
    doc.remove_class(menu, &markers.end_class);
    doc.remove_class(menu, &markers.top_class);
}
