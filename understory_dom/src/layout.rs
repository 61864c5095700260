// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored popover layout driven by classes.
//!
//! This is not a layout engine. Static elements carry client-space bounds
//! computed upstream; popovers are placed against their anchor using
//! [`PlacementFlags`] derived from their classes through a [`StyleSheet`].
//!
//! Without flags a popover opens below its anchor, aligned to the anchor's
//! leading (left) edge. [`PlacementFlags::ABOVE`] puts its bottom edge on the
//! anchor's top edge and [`PlacementFlags::END`] aligns its right edge with the
//! anchor's right edge.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Rect, Size};

bitflags::bitflags! {
    /// Placement modifiers for a popover.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PlacementFlags: u8 {
        /// Open above the anchor instead of below.
        const ABOVE = 0b0000_0001;
        /// Align to the anchor's trailing edge instead of its leading edge.
        const END   = 0b0000_0010;
    }
}

/// Maps class names to placement flags.
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    rules: Vec<(String, PlacementFlags)>,
}

impl StyleSheet {
    /// Create an empty style sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule: elements with `class` get `flags`.
    #[must_use]
    pub fn with_rule(mut self, class: &str, flags: PlacementFlags) -> Self {
        self.rules.push((class.to_string(), flags));
        self
    }

    /// Union of the flags of every rule matching one of `classes`.
    pub fn flags_for<'a>(&self, classes: impl IntoIterator<Item = &'a str>) -> PlacementFlags {
        let mut out = PlacementFlags::empty();
        for class in classes {
            for (rule, flags) in &self.rules {
                if rule == class {
                    out |= *flags;
                }
            }
        }
        out
    }
}

/// Place a box of `size` against `anchor` according to `flags`.
pub fn popover_rect(anchor: Rect, size: Size, flags: PlacementFlags) -> Rect {
    let x0 = if flags.contains(PlacementFlags::END) {
        anchor.x1 - size.width
    } else {
        anchor.x0
    };
    let y0 = if flags.contains(PlacementFlags::ABOVE) {
        anchor.y0 - size.height
    } else {
        anchor.y1
    };
    Rect::new(x0, y0, x0 + size.width, y0 + size.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: Rect = Rect::new(100.0, 50.0, 160.0, 80.0);
    const SIZE: Size = Size::new(120.0, 90.0);

    #[test]
    fn default_opens_below_leading() {
        let r = popover_rect(ANCHOR, SIZE, PlacementFlags::empty());
        assert_eq!(r, Rect::new(100.0, 80.0, 220.0, 170.0));
    }

    #[test]
    fn above_and_end_flip_both_axes() {
        let r = popover_rect(ANCHOR, SIZE, PlacementFlags::ABOVE | PlacementFlags::END);
        assert_eq!(r, Rect::new(40.0, -40.0, 160.0, 50.0));
    }

    #[test]
    fn style_sheet_unions_matching_rules() {
        let sheet = StyleSheet::new()
            .with_rule("menu-top", PlacementFlags::ABOVE)
            .with_rule("menu-end", PlacementFlags::END);
        assert_eq!(sheet.flags_for(["plain"]), PlacementFlags::empty());
        assert_eq!(sheet.flags_for(["menu-top"]), PlacementFlags::ABOVE);
        assert_eq!(
            sheet.flags_for(["menu-end", "other", "menu-top"]),
            PlacementFlags::ABOVE | PlacementFlags::END
        );
    }
}
