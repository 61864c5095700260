// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory DOM: a headless element tree for driving widget behavior.
//!
//! Widgets that speak in terms of attributes, classes, roles, focus, and
//! bubbling events (ARIA menus, disclosure buttons, listboxes) need a document
//! to act on. This crate provides one without a browser:
//!
//! - [`Document`]: generational element tree with attributes, classes, text,
//!   a single focused element, sequential (Tab) focus navigation, and portal
//!   roots whose composed path continues through a host element.
//! - [`layout`]: client rectangles. Elements either carry fixed bounds
//!   computed upstream or hang off an anchor as popovers, flipped by classes
//!   through a [`StyleSheet`].
//! - [`keyboard`]: DOM-style logical keys (with legacy aliases) and
//!   [`Modifiers`].
//! - [`event`]: [`Event`] with a composed path snapshot, cancelation flags,
//!   and the capture → target → bubble [`Dispatch`] sequence.
//! - [`dispatcher::run`]: walks a sequence and honors [`Outcome::Stop`].
//! - [`Listeners`]: registry of listener keys per node and event type.
//!
//! ## Routing an event
//!
//! ```rust
//! use kurbo::Size;
//! use understory_dom::event::{Event, EventType, Outcome, propagation};
//! use understory_dom::{Document, Element, Listeners, dispatcher};
//!
//! let mut doc = Document::new(Size::new(800.0, 600.0));
//! let body = doc.append(doc.root(), Element::new("body")).unwrap();
//! let button = doc.append(body, Element::new("button")).unwrap();
//!
//! let mut listeners: Listeners<&str> = Listeners::new();
//! listeners.add(button, EventType::Click, "button");
//! listeners.add(body, EventType::Click, "body");
//!
//! let mut ev = Event::click(&doc, button);
//! let seq = propagation(ev.composed_path().unwrap());
//! let mut heard = Vec::new();
//! dispatcher::run(&seq, &mut ev, |d, e| {
//!     for l in listeners.due(d, e.kind()) {
//!         heard.push(l);
//!     }
//!     Outcome::Continue
//! });
//! assert_eq!(heard, ["button", "body"]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` for `kurbo` and random (UUID v4) tokens
//!   from [`Document::generate_id`].
//! - `libm`: `no_std` + `alloc` builds relying on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
pub mod event;
pub mod keyboard;
pub mod layout;

mod document;
mod listeners;
mod types;

pub use document::{ComposedPath, Descendants, Document};
pub use event::{Dispatch, Event, EventData, EventFlags, EventType, Outcome, Phase};
pub use keyboard::{Key, KeyboardEvent, Modifiers, NamedKey};
pub use layout::{PlacementFlags, StyleSheet};
pub use listeners::Listeners;
pub use types::{Element, Layout, NodeFlags, NodeId};
