// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Dropdown: accessible menu button behavior over an `understory_dom` document.
//!
//! ## Overview
//!
//! A dropdown is a trigger element paired with the menu that follows it. This
//! crate implements the keyboard, pointer, focus, and placement behavior of
//! the WAI-ARIA menu button pattern, headlessly:
//!
//! - [`Dropdown`]: one bound (trigger, menu) pair and its event handlers.
//! - [`Page`]: discovers pairs in a document, registers listeners, and
//!   dispatches clicks and key presses through capture → target → bubble.
//! - [`Markers`]: the class, role, and attribute conventions shared with markup.
//! - [`placement`]: flips an opening menu to stay inside the viewport.
//! - [`items`]: roving-focus and typeahead index arithmetic.
//!
//! Expansion lives in the trigger's `aria-expanded` attribute (mirrored on the
//! menu), so assistive technology and the widget can never disagree about it.
//! [`Dropdown::state`] derives a [`MenuState`] from that attribute.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_dom::{Document, Element, KeyboardEvent, NamedKey};
//! use understory_dropdown::{Markers, MenuState, Page};
//!
//! let mut doc = Document::new(Size::new(800.0, 600.0));
//! doc.set_style_sheet(Markers::default().style_sheet());
//! let body = doc.append(doc.root(), Element::new("body")).unwrap();
//! let toggle = doc
//!     .append(
//!         body,
//!         Element::new("button")
//!             .with_class("dropdown-toggle")
//!             .with_bounds(Rect::new(20.0, 20.0, 120.0, 50.0)),
//!     )
//!     .unwrap();
//! let menu = doc
//!     .append(
//!         body,
//!         Element::new("ul")
//!             .with_class("dropdown-menu")
//!             .anchored_to(toggle, Size::new(160.0, 90.0)),
//!     )
//!     .unwrap();
//! for label in ["Copy", "Cut", "Paste"] {
//!     doc.append(menu, Element::new("li").with_role("menuitem").with_text(label));
//! }
//!
//! let mut page = Page::new(doc);
//! assert_eq!(page.bind(), 1);
//!
//! page.click(toggle);
//! page.press(KeyboardEvent::new('p'));
//! let dropdown = &page.dropdowns()[0];
//! assert_eq!(dropdown.state(page.document()), MenuState::Open { focused: Some(2) });
//!
//! page.press(KeyboardEvent::new(NamedKey::Escape));
//! assert_eq!(page.document().active_element(), Some(toggle));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `understory_dom/std` and `kurbo/std`.
//! - `libm`: `no_std` + `alloc` builds relying on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod items;
pub mod placement;

mod dropdown;
mod error;
mod markers;
mod page;
mod state;

pub use dropdown::Dropdown;
pub use error::BindError;
pub use markers::Markers;
pub use page::Page;
pub use state::MenuState;
