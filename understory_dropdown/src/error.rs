// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reasons a (trigger, menu) pair cannot be bound.

use understory_dom::NodeId;

/// Why a dropdown was not created for a pair of elements.
///
/// Page discovery logs these and moves on; they never abort the page.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The node is not part of the document.
    #[error("node {0:?} is not part of the document")]
    Stale(NodeId),
    /// Trigger and menu are the same element.
    #[error("trigger {0:?} cannot be its own menu")]
    SameNode(NodeId),
    /// The toggle has no following sibling to act as its menu.
    #[error("toggle {0:?} has no next sibling")]
    NoMenuSibling(NodeId),
    /// The toggle's next sibling lacks the menu marker class.
    #[error("next sibling {menu:?} of toggle {trigger:?} is not marked as a menu")]
    NotAMenu {
        /// The toggle.
        trigger: NodeId,
        /// Its next sibling.
        menu: NodeId,
    },
    /// A dropdown is already bound to this trigger.
    #[error("toggle {0:?} is already bound")]
    AlreadyBound(NodeId),
}
