// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk a propagation sequence and honor stop outcomes.
//!
//! - [`Outcome`] only controls propagation (`Continue` vs `Stop`).
//! - The return value from [`run`] reports where propagation stopped (if at all).
//! - "Default prevented" lives on the [`Event`](crate::Event) you pass to
//!   [`run`], not in [`Outcome`].
//!
//! Sequences come from [`propagation`](crate::event::propagation).
//!
//! ## Example
//!
//! ```
//! use kurbo::Size;
//! use understory_dom::dispatcher;
//! use understory_dom::event::{Event, Outcome, Phase, propagation};
//! use understory_dom::{Document, Element};
//!
//! let mut doc = Document::new(Size::new(100.0, 100.0));
//! let body = doc.append(doc.root(), Element::new("body")).unwrap();
//! let button = doc.append(body, Element::new("button")).unwrap();
//!
//! let mut ev = Event::click(&doc, button);
//! let seq = propagation(ev.composed_path().unwrap());
//!
//! // The target consumes the click; nothing bubbles past it.
//! let mut seen = Vec::new();
//! let stopped = dispatcher::run(&seq, &mut ev, |d, e| {
//!     seen.push(d.phase);
//!     if d.phase == Phase::Target {
//!         e.consume();
//!         Outcome::Stop
//!     } else {
//!         Outcome::Continue
//!     }
//! });
//!
//! assert_eq!(stopped.map(|d| d.node), Some(button));
//! assert!(ev.default_prevented());
//! assert_eq!(seen, [Phase::Capture, Phase::Capture, Phase::Target]);
//! ```

use crate::event::{Dispatch, Outcome};

/// Run a handler over a propagation sequence and honor stop outcomes.
///
/// - [`Outcome::Continue`]: keep going.
/// - [`Outcome::Stop`]: abort propagation immediately (no later phases).
///
/// Returns `None` if the full sequence was visited, or the entry at which a
/// handler returned [`Outcome::Stop`].
pub fn run<'a, E>(
    seq: &'a [Dispatch],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch, &mut E) -> Outcome,
) -> Option<&'a Dispatch> {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}
