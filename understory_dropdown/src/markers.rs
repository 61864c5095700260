// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markup conventions the widget reads and writes.

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use understory_dom::{PlacementFlags, StyleSheet};

/// Class names, roles, and attribute names shared between markup and widget.
///
/// The [`Default`] matches the support theme's markup. Override individual
/// fields with struct update syntax:
///
/// ```rust
/// use understory_dropdown::Markers;
///
/// let markers = Markers {
///     toggle_class: "menu-button".into(),
///     ..Markers::default()
/// };
/// assert_eq!(markers.menu_class, "dropdown-menu");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markers {
    /// Class marking a trigger.
    pub toggle_class: String,
    /// Class marking a menu; must be on the trigger's next sibling.
    pub menu_class: String,
    /// Class that opens the menu upward.
    pub top_class: String,
    /// Class that aligns the menu to the trigger's trailing edge.
    pub end_class: String,
    /// `role` values identifying selectable items.
    pub item_roles: Vec<String>,
    /// Attribute carrying the expansion state on trigger and menu.
    pub expanded_attr: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            toggle_class: "dropdown-toggle".to_string(),
            menu_class: "dropdown-menu".to_string(),
            top_class: "dropdown-menu-top".to_string(),
            end_class: "dropdown-menu-end".to_string(),
            item_roles: vec!["menuitem".to_string(), "menuitemradio".to_string()],
            expanded_attr: "aria-expanded".to_string(),
        }
    }
}

impl Markers {
    /// Whether `role` identifies a selectable item.
    pub fn is_item_role(&self, role: &str) -> bool {
        self.item_roles.iter().any(|r| r == role)
    }

    /// Style sheet mapping the placement classes to popover flags.
    pub fn style_sheet(&self) -> StyleSheet {
        StyleSheet::new()
            .with_rule(&self.top_class, PlacementFlags::ABOVE)
            .with_rule(&self.end_class, PlacementFlags::END)
    }
}
