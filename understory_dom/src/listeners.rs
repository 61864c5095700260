// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry: who wants which event on which node.
//!
//! The registry stores opaque listener keys `L` (for example a widget index
//! plus a role) rather than closures, so a host can look up the listeners due
//! at a [`Dispatch`] step and call into its own state with `&mut` access.
//!
//! Listeners follow DOM phase rules: capture listeners run in the capture and
//! target phases, bubble listeners in the target and bubble phases. On a
//! single node they run in registration order.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::event::{Dispatch, EventType, Phase};
use crate::types::NodeId;

#[derive(Clone, Copy, Debug)]
struct Registration<L> {
    listener: L,
    capture: bool,
}

/// Registry of listener keys per (node, event type).
#[derive(Clone, Debug)]
pub struct Listeners<L> {
    map: HashMap<(NodeId, EventType), SmallVec<[Registration<L>; 2]>>,
}

impl<L> Default for Listeners<L> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<L: Copy + PartialEq> Listeners<L> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bubble-phase listener.
    ///
    /// Registering the same listener twice for the same node, type, and phase
    /// is a no-op, as with `addEventListener`.
    pub fn add(&mut self, node: NodeId, ty: EventType, listener: L) {
        self.insert(node, ty, listener, false);
    }

    /// Register a capture-phase listener.
    pub fn add_capture(&mut self, node: NodeId, ty: EventType, listener: L) {
        self.insert(node, ty, listener, true);
    }

    fn insert(&mut self, node: NodeId, ty: EventType, listener: L, capture: bool) {
        let regs = self.map.entry((node, ty)).or_default();
        if regs
            .iter()
            .any(|r| r.listener == listener && r.capture == capture)
        {
            return;
        }
        regs.push(Registration { listener, capture });
    }

    /// Remove a listener from a node.
    pub fn remove(&mut self, node: NodeId, ty: EventType, listener: L) {
        if let Some(regs) = self.map.get_mut(&(node, ty)) {
            regs.retain(|r| r.listener != listener);
            if regs.is_empty() {
                self.map.remove(&(node, ty));
            }
        }
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.map.values().map(SmallVec::len).sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Listeners due at dispatch step `d` for an event of type `ty`.
    pub fn due(&self, d: &Dispatch, ty: EventType) -> SmallVec<[L; 4]> {
        let Some(regs) = self.map.get(&(d.node, ty)) else {
            return SmallVec::new();
        };
        regs.iter()
            .filter(|r| match d.phase {
                Phase::Capture => r.capture,
                Phase::Target => true,
                Phase::Bubble => !r.capture,
            })
            .map(|r| r.listener)
            .collect()
    }
}
