// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropdown walkthrough: bind the dropdowns of a small page and drive them
//! with clicks and key presses, printing what a screen reader would see.
//!
//! The page has a toolbar with two dropdowns:
//! - "Account", which prefers to align with its trigger's trailing edge,
//! - "Sort", near the bottom right corner, which flips up and left when it
//!   opens.
//!
//! Run:
//! - `cargo run -p understory_demos --example dropdown_walkthrough`

use kurbo::{Rect, Size};
use understory_dom::{Document, Element, EventFlags, KeyboardEvent, Modifiers, NamedKey, NodeId};
use understory_dropdown::{Markers, Page};

fn dropdown(
    doc: &mut Document,
    parent: NodeId,
    label: &str,
    bounds: Rect,
    menu_class: Option<&str>,
    items: &[&str],
) -> Option<(NodeId, NodeId)> {
    let toggle = doc.append(
        parent,
        Element::new("button")
            .with_class("dropdown-toggle")
            .with_text(label)
            .with_bounds(bounds),
    )?;
    let mut menu = Element::new("ul")
        .with_class("dropdown-menu")
        .with_role("menu")
        .anchored_to(toggle, Size::new(180.0, 30.0 * items.len() as f64));
    if let Some(class) = menu_class {
        menu = menu.with_class(class);
    }
    let menu = doc.append(parent, menu)?;
    for item in items {
        doc.append(menu, Element::new("li").with_role("menuitem").with_text(item))?;
    }
    Some((toggle, menu))
}

fn describe(page: &Page, what: &str, flags: EventFlags) {
    let doc = page.document();
    let focused = doc
        .active_element()
        .map(|n| doc.text_content(n))
        .unwrap_or_else(|| "<nothing>".to_string());
    println!("{what:<28} focus={focused:<10} {flags:?}");
    for d in page.dropdowns() {
        let rect = doc
            .client_rect(d.menu())
            .map(|r| format!("{:?}", r.origin()))
            .unwrap_or_default();
        println!(
            "    {:<8} {:?} placement={:?} menu@{rect}",
            doc.text_content(d.trigger()),
            d.state(doc),
            d.placement(),
        );
    }
}

fn main() {
    let markers = Markers::default();
    let mut doc = Document::new(Size::new(640.0, 400.0));
    doc.set_style_sheet(markers.style_sheet());
    let body = doc
        .append(doc.root(), Element::new("body"))
        .expect("root is live");
    let toolbar = doc
        .append(body, Element::new("nav"))
        .expect("body is live");

    let (account, _) = dropdown(
        &mut doc,
        toolbar,
        "Account",
        Rect::new(520.0, 10.0, 620.0, 40.0),
        Some("dropdown-menu-end"),
        &["Profile", "Settings", "Sign out"],
    )
    .expect("toolbar is live");
    let (sort, sort_menu) = dropdown(
        &mut doc,
        toolbar,
        "Sort",
        Rect::new(560.0, 340.0, 620.0, 370.0),
        None,
        &["Newest", "Oldest", "Name", "Size"],
    )
    .expect("toolbar is live");
    let footer = doc
        .append(body, Element::new("a").with_text("Help"))
        .expect("body is live");

    let mut page = Page::with_markers(doc, markers);
    let bound = page.bind();
    println!("bound {bound} dropdown(s)\n");

    page.document_mut().focus(account);
    let f = page.press(KeyboardEvent::new(NamedKey::Enter));
    describe(&page, "Enter on Account", f);
    let f = page.press(KeyboardEvent::new(NamedKey::ArrowUp));
    describe(&page, "ArrowUp (wraps)", f);
    let f = page.press(KeyboardEvent::new('p'));
    describe(&page, "typeahead 'p'", f);
    let f = page.press(KeyboardEvent::new('c').with_modifiers(Modifiers::CONTROL));
    describe(&page, "Ctrl+C (ignored)", f);
    let f = page.press(KeyboardEvent::new(NamedKey::Escape));
    describe(&page, "Escape", f);

    let f = page.click(sort);
    describe(&page, "click Sort", f);
    let late = page
        .document_mut()
        .append(
            sort_menu,
            Element::new("li").with_role("menuitemradio").with_text("Type"),
        )
        .expect("menu is live");
    let f = page.press(KeyboardEvent::new(NamedKey::End));
    describe(&page, "End after inserting Type", f);
    assert_eq!(page.document().active_element(), Some(late));
    let f = page.press(KeyboardEvent::new(NamedKey::Tab));
    describe(&page, "Tab", f);

    page.click(sort);
    let f = page.click(footer);
    describe(&page, "click outside", f);
}
