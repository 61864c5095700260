// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, flags, and element data.

use alloc::string::{String, ToString};

use hashbrown::HashMap;
use kurbo::{Rect, Size};
use smallvec::SmallVec;

/// Identifier for a node in the document (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-element behavior flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Element is focusable without a `tabindex` attribute (buttons, links, form fields).
        const FOCUSABLE = 0b0000_0001;
    }
}

impl NodeFlags {
    /// Flags implied by an element's tag name.
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "a" | "button" | "input" | "select" | "textarea" => Self::FOCUSABLE,
            _ => Self::empty(),
        }
    }
}

/// How an element's client rectangle is resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layout {
    /// Fixed client-space bounds computed upstream.
    Fixed(Rect),
    /// Positioned relative to another element's client rectangle.
    ///
    /// The side and edge alignment come from the document's
    /// [`StyleSheet`](crate::StyleSheet) applied to this element's classes.
    Popover {
        /// Element the popover hangs off.
        anchor: NodeId,
        /// Size of the popover box.
        size: Size,
    },
}

impl Default for Layout {
    fn default() -> Self {
        Self::Fixed(Rect::ZERO)
    }
}

/// Element data: tag, attributes, classes, own text, and layout.
///
/// Classes live in [`Element::classes`], not in the attribute map.
#[derive(Clone, Debug, Default)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attribute map (excluding `class`).
    pub attributes: HashMap<String, String>,
    /// Class list in insertion order, without duplicates.
    pub classes: SmallVec<[String; 4]>,
    /// Text owned directly by this element.
    pub text: String,
    /// Behavior flags; see [`NodeFlags::for_tag`].
    pub flags: NodeFlags,
    /// Layout used by [`Document::client_rect`](crate::Document::client_rect).
    pub layout: Layout,
}

impl Element {
    /// Create an element with flags derived from its tag.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            flags: NodeFlags::for_tag(tag),
            ..Self::default()
        }
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    /// Set an arbitrary attribute.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Set the `role` attribute.
    #[must_use]
    pub fn with_role(self, role: &str) -> Self {
        self.with_attr("role", role)
    }

    /// Add a class.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Set the element's own text.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Use fixed client-space bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.layout = Layout::Fixed(bounds);
        self
    }

    /// Position this element as a popover of `anchor`.
    #[must_use]
    pub fn anchored_to(mut self, anchor: NodeId, size: Size) -> Self {
        self.layout = Layout::Popover { anchor, size };
        self
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add `class` if absent. Returns `true` if the list changed.
    pub fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }

    /// Remove `class` if present. Returns `true` if the list changed.
    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        self.classes.len() != before
    }

    /// Parsed `tabindex`, if present and numeric.
    pub fn tab_index(&self) -> Option<i32> {
        self.attributes.get("tabindex")?.trim().parse().ok()
    }

    /// Whether the element can take focus at all.
    pub fn is_focusable(&self) -> bool {
        self.attributes.contains_key("tabindex") || self.flags.contains(NodeFlags::FOCUSABLE)
    }

    /// Whether the element participates in sequential (Tab) navigation.
    pub fn is_tabbable(&self) -> bool {
        match self.tab_index() {
            Some(i) => i >= 0,
            None => self.flags.contains(NodeFlags::FOCUSABLE),
        }
    }
}
