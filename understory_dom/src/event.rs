// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events, phases, and the capture → target → bubble sequence.
//!
//! An [`Event`] snapshots its composed path when it is created, the same way
//! a browser fixes `composedPath()` at dispatch time: handlers that mutate the
//! tree during dispatch do not change who receives the event.
//!
//! [`propagation`] turns a composed path into the ordered [`Dispatch`]
//! entries; [`crate::dispatcher::run`] walks them.

use alloc::vec::Vec;

use crate::document::{ComposedPath, Document};
use crate::keyboard::KeyboardEvent;
use crate::types::NodeId;

/// Event kinds a listener can register for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Primary pointer activation.
    Click,
    /// Key press.
    KeyDown,
}

/// Event payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventData {
    /// A click carries no payload.
    Click,
    /// A key press.
    KeyDown(KeyboardEvent),
}

bitflags::bitflags! {
    /// Cancelation state set by handlers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventFlags: u8 {
        /// The host should skip the default action.
        const DEFAULT_PREVENTED   = 0b0000_0001;
        /// No further nodes receive the event.
        const PROPAGATION_STOPPED = 0b0000_0010;
    }
}

/// An event in flight.
#[derive(Clone, Debug)]
pub struct Event {
    target: NodeId,
    data: EventData,
    path: ComposedPath,
    flags: EventFlags,
}

impl Event {
    /// Create an event for `target`, snapshotting its composed path.
    pub fn new(doc: &Document, target: NodeId, data: EventData) -> Self {
        Self {
            target,
            data,
            path: doc.composed_path(target),
            flags: EventFlags::empty(),
        }
    }

    /// A click on `target`.
    pub fn click(doc: &Document, target: NodeId) -> Self {
        Self::new(doc, target, EventData::Click)
    }

    /// A key press delivered to `target`.
    pub fn key_down(doc: &Document, target: NodeId, key: KeyboardEvent) -> Self {
        Self::new(doc, target, EventData::KeyDown(key))
    }

    /// The node the event was dispatched to.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Kind of this event.
    pub fn kind(&self) -> EventType {
        match self.data {
            EventData::Click => EventType::Click,
            EventData::KeyDown(_) => EventType::KeyDown,
        }
    }

    /// Payload.
    pub fn data(&self) -> &EventData {
        &self.data
    }

    /// Key press payload, if this is a key event.
    pub fn keyboard(&self) -> Option<&KeyboardEvent> {
        match &self.data {
            EventData::KeyDown(k) => Some(k),
            EventData::Click => None,
        }
    }

    /// Composed path captured at creation, target first.
    ///
    /// `None` when the target was not part of the document, so no path could
    /// be computed.
    pub fn composed_path(&self) -> Option<&[NodeId]> {
        (!self.path.is_empty()).then_some(self.path.as_slice())
    }

    /// Cancelation flags.
    pub fn flags(&self) -> EventFlags {
        self.flags
    }

    /// Skip the host's default action.
    pub fn prevent_default(&mut self) {
        self.flags |= EventFlags::DEFAULT_PREVENTED;
    }

    /// Stop delivery to further nodes. Remaining listeners on the current
    /// node still run.
    pub fn stop_propagation(&mut self) {
        self.flags |= EventFlags::PROPAGATION_STOPPED;
    }

    /// Prevent the default action and stop propagation.
    pub fn consume(&mut self) {
        self.prevent_default();
        self.stop_propagation();
    }

    /// Whether the default action was prevented.
    pub fn default_prevented(&self) -> bool {
        self.flags.contains(EventFlags::DEFAULT_PREVENTED)
    }

    /// Whether propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.flags.contains(EventFlags::PROPAGATION_STOPPED)
    }
}

/// Propagation phase of a dispatch entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root toward target, excluding the target.
    Capture,
    /// At the target.
    Target,
    /// Target's parent toward root.
    Bubble,
}

/// One step of a propagation sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch {
    /// Phase of this step.
    pub phase: Phase,
    /// Node receiving this step.
    pub node: NodeId,
}

impl Dispatch {
    /// A capture step.
    pub const fn capture(node: NodeId) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// The target step.
    pub const fn target(node: NodeId) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble step.
    pub const fn bubble(node: NodeId) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// Propagation control returned by a handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// Abort propagation immediately.
    Stop,
}

/// Build the capture → target → bubble sequence for a composed path
/// (target first, root last).
pub fn propagation(path: &[NodeId]) -> Vec<Dispatch> {
    let Some((&target, ancestors)) = path.split_first() else {
        return Vec::new();
    };
    let mut seq = Vec::with_capacity(path.len() * 2 - 1);
    seq.extend(ancestors.iter().rev().copied().map(Dispatch::capture));
    seq.push(Dispatch::target(target));
    seq.extend(ancestors.iter().copied().map(Dispatch::bubble));
    seq
}
