// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expansion state.
//!
//! The expansion attribute on the trigger is the single source of truth for
//! "open". Writes always go to trigger and menu together, so the two
//! attributes cannot disagree; reads only ever look at the trigger.

use understory_dom::{Document, NodeId};

/// Observable state of a dropdown.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MenuState {
    /// Menu hidden.
    Closed,
    /// Menu shown.
    Open {
        /// Index of the item holding logical focus, if any.
        focused: Option<usize>,
    },
}

impl MenuState {
    /// Whether the menu is shown.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Whether `trigger` currently reports an expanded menu.
pub(crate) fn is_expanded(doc: &Document, trigger: NodeId, attr: &str) -> bool {
    doc.attribute(trigger, attr) == Some("true")
}

/// Mark trigger and menu expanded.
pub(crate) fn expand(doc: &mut Document, trigger: NodeId, menu: NodeId, attr: &str) {
    doc.set_attribute(trigger, attr, "true");
    doc.set_attribute(menu, attr, "true");
}

/// Clear the expansion attribute from trigger and menu.
pub(crate) fn collapse(doc: &mut Document, trigger: NodeId, menu: NodeId, attr: &str) {
    doc.remove_attribute(trigger, attr);
    doc.remove_attribute(menu, attr);
}
