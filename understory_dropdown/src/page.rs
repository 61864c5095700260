// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page wiring: discovery, listener registration, and event dispatch.
//!
//! A [`Page`] owns the [`Document`] and every dropdown bound in it. Each
//! dropdown registers four listeners on a shared registry: click and key
//! press on its trigger, key press on its menu, and click on the body (or
//! the document root when there is none). Events are routed capture → target
//! → bubble along the composed path, and propagation stops after the node
//! whose listener stopped it.
//!
//! After dispatch the page performs the default action of an unprevented
//! Tab: sequential focus navigation.

use alloc::sync::Arc;
use alloc::vec::Vec;

use understory_dom::event::propagation;
use understory_dom::{
    Document, Event, EventFlags, EventType, KeyboardEvent, Listeners, NamedKey, NodeId, Outcome,
    dispatcher,
};

use crate::dropdown::Dropdown;
use crate::error::BindError;
use crate::markers::Markers;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Role {
    TriggerClick,
    TriggerKey,
    MenuKey,
    OutsideClick,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Binding {
    widget: usize,
    role: Role,
}

/// A document with its dropdowns bound and listening.
#[derive(Debug)]
pub struct Page {
    doc: Document,
    markers: Arc<Markers>,
    dropdowns: Vec<Dropdown>,
    listeners: Listeners<Binding>,
}

impl Page {
    /// Wrap `doc` using the default markers. Nothing is bound yet.
    pub fn new(doc: Document) -> Self {
        Self::with_markers(doc, Markers::default())
    }

    /// Wrap `doc` using custom markers.
    pub fn with_markers(doc: Document, markers: Markers) -> Self {
        Self {
            doc,
            markers: Arc::new(markers),
            dropdowns: Vec::new(),
            listeners: Listeners::new(),
        }
    }

    /// Bind every toggle in the document whose next sibling is a menu.
    ///
    /// Toggles that cannot be bound are skipped and logged. Toggles bound
    /// earlier are skipped, so calling this again after the host adds markup
    /// only binds the new pairs. Returns the number of new dropdowns.
    pub fn bind(&mut self) -> usize {
        let toggles = self.doc.elements_with_class(&self.markers.toggle_class);
        let mut bound = 0;
        for trigger in toggles {
            match self.bind_toggle(trigger) {
                Ok(_) => bound += 1,
                Err(BindError::AlreadyBound(_)) => {}
                Err(err) => log::debug!("skipping dropdown toggle: {err}"),
            }
        }
        log::debug!("bound {bound} new dropdown(s), {} total", self.dropdowns.len());
        bound
    }

    /// Bind one toggle to its next element sibling.
    ///
    /// Returns the index of the new dropdown in [`Page::dropdowns`].
    pub fn bind_toggle(&mut self, trigger: NodeId) -> Result<usize, BindError> {
        if !self.doc.is_alive(trigger) {
            return Err(BindError::Stale(trigger));
        }
        if self.dropdowns.iter().any(|d| d.trigger() == trigger) {
            return Err(BindError::AlreadyBound(trigger));
        }
        let menu = self
            .doc
            .next_element_sibling(trigger)
            .ok_or(BindError::NoMenuSibling(trigger))?;
        if !self.doc.has_class(menu, &self.markers.menu_class) {
            return Err(BindError::NotAMenu { trigger, menu });
        }
        let dropdown = Dropdown::bind(&mut self.doc, trigger, menu, Arc::clone(&self.markers))?;
        Ok(self.attach(dropdown))
    }

    fn attach(&mut self, dropdown: Dropdown) -> usize {
        let widget = self.dropdowns.len();
        let surface = self.doc.body().unwrap_or_else(|| self.doc.root());
        let on = |role| Binding { widget, role };
        self.listeners.add(dropdown.trigger(), EventType::Click, on(Role::TriggerClick));
        self.listeners.add(dropdown.trigger(), EventType::KeyDown, on(Role::TriggerKey));
        self.listeners.add(dropdown.menu(), EventType::KeyDown, on(Role::MenuKey));
        self.listeners.add(surface, EventType::Click, on(Role::OutsideClick));
        self.dropdowns.push(dropdown);
        widget
    }

    /// Bound dropdowns, in binding order.
    pub fn dropdowns(&self) -> &[Dropdown] {
        &self.dropdowns
    }

    /// The dropdown whose trigger is `trigger`.
    pub fn dropdown(&self, trigger: NodeId) -> Option<&Dropdown> {
        self.dropdowns.iter().find(|d| d.trigger() == trigger)
    }

    /// Markers in use.
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The document, for host mutations such as adding items.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Unwrap the document.
    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Click `target`.
    pub fn click(&mut self, target: NodeId) -> EventFlags {
        let ev = Event::click(&self.doc, target);
        self.dispatch(ev)
    }

    /// Deliver a key press to `target`.
    pub fn key_down(&mut self, target: NodeId, key: KeyboardEvent) -> EventFlags {
        let ev = Event::key_down(&self.doc, target, key);
        self.dispatch(ev)
    }

    /// Deliver a key press to the focused element, or the body when nothing
    /// has focus.
    pub fn press(&mut self, key: KeyboardEvent) -> EventFlags {
        let target = self
            .doc
            .active_element()
            .or_else(|| self.doc.body())
            .unwrap_or_else(|| self.doc.root());
        self.key_down(target, key)
    }

    /// Route `ev` through its composed path, then run its default action.
    pub fn dispatch(&mut self, mut ev: Event) -> EventFlags {
        let Some(path) = ev.composed_path() else {
            log::trace!("dropping event for detached target {:?}", ev.target());
            return ev.flags();
        };
        let seq = propagation(path);
        let kind = ev.kind();
        let Self {
            doc,
            dropdowns,
            listeners,
            ..
        } = self;
        dispatcher::run(&seq, &mut ev, |d, ev| {
            for binding in listeners.due(d, kind) {
                let Some(dropdown) = dropdowns.get_mut(binding.widget) else {
                    continue;
                };
                match binding.role {
                    Role::TriggerClick => dropdown.on_trigger_click(doc, ev),
                    Role::TriggerKey => dropdown.on_trigger_key(doc, ev),
                    Role::MenuKey => dropdown.on_menu_key(doc, ev),
                    Role::OutsideClick => dropdown.on_outside_click(doc, ev),
                }
            }
            if ev.propagation_stopped() {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        self.default_action(&ev);
        ev.flags()
    }

    fn default_action(&mut self, ev: &Event) {
        if ev.default_prevented() {
            return;
        }
        if let Some(kb) = ev.keyboard()
            && kb.key.is(NamedKey::Tab)
        {
            let next = self.doc.focus_sequential(kb.shift());
            log::trace!("tab moved focus to {next:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::{Rect, Size};
    use understory_dom::{Element, Modifiers};

    use crate::MenuState;

    struct Ids {
        body: NodeId,
        trigger: NodeId,
        menu: NodeId,
        items: Vec<NodeId>,
        after: NodeId,
    }

    fn add_dropdown(doc: &mut Document, parent: NodeId, labels: &[&str], x: f64) -> Ids {
        let trigger = doc
            .append(
                parent,
                Element::new("button")
                    .with_class("dropdown-toggle")
                    .with_bounds(Rect::new(x, 10.0, x + 80.0, 40.0)),
            )
            .unwrap();
        let menu = doc
            .append(
                parent,
                Element::new("ul")
                    .with_class("dropdown-menu")
                    .anchored_to(trigger, Size::new(150.0, 100.0)),
            )
            .unwrap();
        let items = labels
            .iter()
            .map(|l| {
                doc.append(menu, Element::new("li").with_role("menuitem").with_text(l))
                    .unwrap()
            })
            .collect();
        let after = doc.append(parent, Element::new("a")).unwrap();
        Ids {
            body: parent,
            trigger,
            menu,
            items,
            after,
        }
    }

    fn page(labels: &[&str]) -> (Page, Ids) {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        doc.set_style_sheet(Markers::default().style_sheet());
        let body = doc.append(doc.root(), Element::new("body")).unwrap();
        let ids = add_dropdown(&mut doc, body, labels, 10.0);
        let mut page = Page::new(doc);
        assert_eq!(page.bind(), 1);
        (page, ids)
    }

    fn key(k: impl Into<understory_dom::Key>) -> KeyboardEvent {
        KeyboardEvent::new(k)
    }

    fn state(page: &Page, ids: &Ids) -> MenuState {
        page.dropdown(ids.trigger).unwrap().state(page.document())
    }

    #[test]
    fn walkthrough_with_trailing_preference() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        doc.set_style_sheet(Markers::default().style_sheet());
        let body = doc.append(doc.root(), Element::new("body")).unwrap();
        let trigger = doc
            .append(
                body,
                Element::new("button")
                    .with_id("t1")
                    .with_class("dropdown-toggle")
                    .with_bounds(Rect::new(200.0, 10.0, 280.0, 40.0)),
            )
            .unwrap();
        let menu = doc
            .append(
                body,
                Element::new("ul")
                    .with_class("dropdown-menu")
                    .with_class("dropdown-menu-end")
                    .anchored_to(trigger, Size::new(150.0, 100.0)),
            )
            .unwrap();
        let items: Vec<NodeId> = ["Alpha", "Beta", "Gamma"]
            .iter()
            .map(|l| {
                doc.append(menu, Element::new("li").with_role("menuitem").with_text(l))
                    .unwrap()
            })
            .collect();
        let mut page = Page::new(doc);
        assert_eq!(page.bind(), 1);
        assert_eq!(
            page.dropdowns()[0].preferred_placement(),
            understory_dom::PlacementFlags::END
        );

        page.document_mut().focus(trigger);
        let flags = page.press(key(NamedKey::Enter));
        assert!(flags.contains(EventFlags::DEFAULT_PREVENTED));
        let doc = page.document();
        assert_eq!(doc.active_element(), Some(items[0]));
        assert_eq!(doc.attribute(trigger, "aria-expanded"), Some("true"));
        assert!(doc.has_class(menu, "dropdown-menu-end"));
        assert_eq!(doc.client_rect(menu), Some(Rect::new(130.0, 40.0, 280.0, 140.0)));

        page.press(key(NamedKey::ArrowDown));
        page.press(key(NamedKey::ArrowDown));
        assert_eq!(page.document().active_element(), Some(items[2]));
        page.press(key(NamedKey::ArrowDown));
        assert_eq!(page.document().active_element(), Some(items[0]));

        page.press(key(NamedKey::Escape));
        let doc = page.document();
        assert_eq!(doc.active_element(), Some(trigger));
        assert!(!doc.has_attribute(trigger, "aria-expanded"));
        assert!(!doc.has_class(menu, "dropdown-menu-end"));
    }

    #[test]
    fn discovery_skips_unpaired_toggles() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let body = doc.append(doc.root(), Element::new("body")).unwrap();
        let lonely = doc
            .append(body, Element::new("button").with_class("dropdown-toggle"))
            .unwrap();
        let wrapper = doc.append(body, Element::new("div")).unwrap();
        let paired = add_dropdown(&mut doc, wrapper, &["One"], 100.0);
        let mismatched = doc
            .append(wrapper, Element::new("button").with_class("dropdown-toggle"))
            .unwrap();
        doc.append(wrapper, Element::new("ul")).unwrap();

        let mut page = Page::new(doc);
        assert_eq!(page.bind(), 1);
        assert_eq!(page.dropdowns().len(), 1);
        assert_eq!(page.dropdowns()[0].menu(), paired.menu);
        assert_eq!(
            page.bind_toggle(lonely),
            Err(BindError::NotAMenu {
                trigger: lonely,
                menu: wrapper
            })
        );
        assert!(matches!(
            page.bind_toggle(mismatched),
            Err(BindError::NotAMenu { .. })
        ));
    }

    #[test]
    fn last_toggle_without_sibling_is_reported() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let body = doc.append(doc.root(), Element::new("body")).unwrap();
        let t = doc
            .append(body, Element::new("button").with_class("dropdown-toggle"))
            .unwrap();
        let mut page = Page::new(doc);
        assert_eq!(page.bind(), 0);
        assert_eq!(page.bind_toggle(t), Err(BindError::NoMenuSibling(t)));
    }

    #[test]
    fn binding_again_only_picks_up_new_markup() {
        let (mut page, ids) = page(&["Alpha"]);
        assert_eq!(page.bind(), 0);
        assert_eq!(
            page.bind_toggle(ids.trigger),
            Err(BindError::AlreadyBound(ids.trigger))
        );
        add_dropdown(page.document_mut(), ids.body, &["Beta"], 300.0);
        assert_eq!(page.bind(), 1);
        assert_eq!(page.dropdowns().len(), 2);
    }

    #[test]
    fn trigger_click_toggles_without_reaching_the_document() {
        let (mut page, ids) = page(&["Alpha", "Beta"]);
        let flags = page.click(ids.trigger);
        assert_eq!(
            flags,
            EventFlags::DEFAULT_PREVENTED | EventFlags::PROPAGATION_STOPPED
        );
        assert_eq!(state(&page, &ids), MenuState::Open { focused: Some(0) });

        page.click(ids.trigger);
        assert_eq!(state(&page, &ids), MenuState::Closed);
        assert_eq!(page.document().active_element(), Some(ids.trigger));
    }

    #[test]
    fn outside_click_closes_and_inside_click_does_not() {
        let (mut page, ids) = page(&["Alpha"]);
        let portal = page
            .document_mut()
            .insert_portal(ids.menu, Element::new("div"))
            .unwrap();
        page.click(ids.trigger);

        page.click(ids.items[0]);
        page.click(ids.menu);
        page.click(portal);
        assert!(state(&page, &ids).is_open());

        let flags = page.click(ids.after);
        assert_eq!(flags, EventFlags::empty());
        assert_eq!(state(&page, &ids), MenuState::Closed);
        assert_eq!(page.document().active_element(), Some(ids.trigger));

        // Nothing left to do on repeated outside clicks.
        page.document_mut().blur();
        page.click(ids.body);
        assert_eq!(page.document().active_element(), None);
    }

    #[test]
    fn item_keys_bubble_to_the_menu() {
        let (mut page, ids) = page(&["Alpha", "Beta"]);
        page.click(ids.trigger);
        let flags = page.key_down(ids.items[0], key(NamedKey::ArrowDown));
        assert!(flags.contains(EventFlags::PROPAGATION_STOPPED));
        assert_eq!(page.document().active_element(), Some(ids.items[1]));
        let tabs: Vec<_> = ids
            .items
            .iter()
            .map(|&i| page.document().tab_index(i))
            .collect();
        assert_eq!(tabs, vec![Some(-1), Some(0)]);
    }

    #[test]
    fn tab_closes_and_follows_document_order() {
        let (mut page, ids) = page(&["Alpha", "Beta"]);
        page.click(ids.trigger);
        let flags = page.press(key(NamedKey::Tab));
        assert_eq!(flags, EventFlags::empty());
        assert_eq!(state(&page, &ids), MenuState::Closed);
        assert_eq!(page.document().active_element(), Some(ids.after));
    }

    #[test]
    fn shift_tab_returns_to_trigger_without_default_action() {
        let (mut page, ids) = page(&["Alpha", "Beta"]);
        page.click(ids.trigger);
        page.press(key(NamedKey::Tab).with_modifiers(Modifiers::SHIFT));
        assert_eq!(state(&page, &ids), MenuState::Closed);
        assert_eq!(page.document().active_element(), Some(ids.trigger));
    }

    #[test]
    fn dropdowns_are_independent() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let body = doc.append(doc.root(), Element::new("body")).unwrap();
        let a = add_dropdown(&mut doc, body, &["Alpha"], 10.0);
        let b = add_dropdown(&mut doc, body, &["Beta"], 300.0);
        let mut page = Page::new(doc);
        assert_eq!(page.bind(), 2);

        page.click(a.trigger);
        // The trigger consumes its click, so `a` never sees it as outside.
        page.click(b.trigger);
        assert!(state(&page, &a).is_open());
        assert!(state(&page, &b).is_open());
        assert_eq!(page.document().active_element(), Some(b.items[0]));

        page.press(key(NamedKey::Escape));
        assert!(state(&page, &a).is_open());
        assert_eq!(state(&page, &b), MenuState::Closed);

        page.click(b.after);
        assert_eq!(state(&page, &a), MenuState::Closed);
        assert_eq!(page.document().active_element(), Some(a.trigger));
    }

    #[test]
    fn runtime_items_and_empty_menus() {
        let (mut page, ids) = page(&[]);
        page.click(ids.trigger);
        assert_eq!(state(&page, &ids), MenuState::Open { focused: None });
        page.key_down(ids.menu, key(NamedKey::ArrowDown));
        assert_eq!(state(&page, &ids), MenuState::Open { focused: None });

        let late = page
            .document_mut()
            .append(ids.menu, Element::new("li").with_role("menuitem").with_text("Late"))
            .unwrap();
        page.key_down(ids.menu, key('l'));
        assert_eq!(page.document().active_element(), Some(late));
        assert_eq!(state(&page, &ids), MenuState::Open { focused: Some(0) });
    }

    #[test]
    fn stale_targets_are_ignored() {
        let (mut page, ids) = page(&["Alpha"]);
        page.click(ids.trigger);
        let doc = page.document_mut();
        let gone = doc.append(ids.body, Element::new("p")).unwrap();
        doc.remove(gone);
        assert_eq!(page.click(gone), EventFlags::empty());
        assert!(state(&page, &ids).is_open());
    }

    #[test]
    fn press_without_focus_targets_the_body() {
        let (mut page, ids) = page(&["Alpha"]);
        assert_eq!(page.press(key('a')), EventFlags::empty());
        assert_eq!(state(&page, &ids), MenuState::Closed);
    }
}
