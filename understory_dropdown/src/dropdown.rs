// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dropdown widget: trigger controller and menu controller.

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use understory_dom::{Document, Event, Key, NamedKey, NodeId, PlacementFlags};

use crate::error::BindError;
use crate::items;
use crate::markers::Markers;
use crate::placement;
use crate::state::{self, MenuState};

/// An accessible dropdown bound to one (trigger, menu) pair.
///
/// The widget follows the WAI-ARIA menu button pattern:
///
/// - Trigger: click toggles; Enter, Space, and ArrowDown open on the first
///   item; ArrowUp opens on the last; Escape closes.
/// - Menu: arrows move with wrap-around; Home/PageUp and End/PageDown jump to
///   the ends; a printable character jumps to the next item starting with it;
///   Escape and Shift+Tab close and return focus to the trigger; Tab closes and
///   leaves focus to the default tab order. Key presses with Control, Alt, or
///   Meta are left alone.
/// - Document: a click outside the trigger and outside the menu's composed
///   path closes and returns focus to the trigger.
///
/// Expansion is read from the trigger's expansion attribute on every query.
/// Items are re-queried on every operation. The widget only caches the index
/// of the item it last focused and the placement flags applied on open; both
/// are reset when it closes.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use kurbo::Size;
/// use understory_dom::{Document, Element, Event, KeyboardEvent, NamedKey};
/// use understory_dropdown::{Dropdown, Markers, MenuState};
///
/// let mut doc = Document::new(Size::new(800.0, 600.0));
/// let body = doc.append(doc.root(), Element::new("body")).unwrap();
/// let trigger = doc.append(body, Element::new("button").with_text("Account")).unwrap();
/// let menu = doc.append(body, Element::new("ul")).unwrap();
/// let profile = doc.append(menu, Element::new("li").with_role("menuitem")).unwrap();
///
/// let mut dropdown = Dropdown::bind(&mut doc, trigger, menu, Arc::new(Markers::default())).unwrap();
///
/// let mut ev = Event::key_down(&doc, trigger, KeyboardEvent::new(NamedKey::ArrowDown));
/// dropdown.on_trigger_key(&mut doc, &mut ev);
/// assert!(ev.default_prevented());
/// assert_eq!(dropdown.state(&doc), MenuState::Open { focused: Some(0) });
/// assert_eq!(doc.active_element(), Some(profile));
/// ```
#[derive(Clone, Debug)]
pub struct Dropdown {
    trigger: NodeId,
    menu: NodeId,
    preferred: PlacementFlags,
    applied: PlacementFlags,
    focused_index: Option<usize>,
    markers: Arc<Markers>,
}

impl Dropdown {
    /// Bind a dropdown to `trigger` and `menu`.
    ///
    /// Reads the static placement preference from the menu's classes,
    /// repairs missing ids, wires `aria-controls` and `aria-labelledby`, and
    /// takes the menu and its current items out of the tab order.
    pub fn bind(
        doc: &mut Document,
        trigger: NodeId,
        menu: NodeId,
        markers: Arc<Markers>,
    ) -> Result<Self, BindError> {
        for node in [trigger, menu] {
            if !doc.is_alive(node) {
                return Err(BindError::Stale(node));
            }
        }
        if trigger == menu {
            return Err(BindError::SameNode(trigger));
        }

        let preferred = placement::preference(doc, menu, &markers);
        let trigger_id = ensure_id(doc, trigger);
        let menu_id = ensure_id(doc, menu);
        doc.set_attribute(trigger, "aria-controls", &menu_id);
        doc.set_attribute(menu, "aria-labelledby", &trigger_id);
        doc.set_tab_index(menu, -1);
        for item in items::menu_items(doc, menu, &markers) {
            doc.set_tab_index(item, -1);
        }

        log::debug!("bound dropdown #{trigger_id} -> #{menu_id} (prefers {preferred:?})");
        Ok(Self {
            trigger,
            menu,
            preferred,
            applied: PlacementFlags::empty(),
            focused_index: None,
            markers,
        })
    }

    /// The trigger element.
    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    /// The menu element.
    pub fn menu(&self) -> NodeId {
        self.menu
    }

    /// Markup conventions in use.
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Static placement preference captured at bind time.
    pub fn preferred_placement(&self) -> PlacementFlags {
        self.preferred
    }

    /// Placement applied when the menu last opened; empty while closed.
    pub fn placement(&self) -> PlacementFlags {
        self.applied
    }

    /// Whether the menu is open, as reported by the trigger's attribute.
    pub fn is_expanded(&self, doc: &Document) -> bool {
        state::is_expanded(doc, self.trigger, &self.markers.expanded_attr)
    }

    /// Current state. The focused index is only reported while open.
    pub fn state(&self, doc: &Document) -> MenuState {
        if self.is_expanded(doc) {
            MenuState::Open {
                focused: self.focused_index,
            }
        } else {
            MenuState::Closed
        }
    }

    /// Current items, freshly queried.
    pub fn menu_items(&self, doc: &Document) -> Vec<NodeId> {
        items::menu_items(doc, self.menu, &self.markers)
    }

    /// Open the menu and place it. Returns `false` if it was already open.
    pub fn open(&mut self, doc: &mut Document) -> bool {
        if self.is_expanded(doc) {
            return false;
        }
        state::expand(doc, self.trigger, self.menu, &self.markers.expanded_attr);
        self.applied = placement::apply(doc, self.menu, self.preferred, &self.markers);
        log::debug!("dropdown {:?} opened ({:?})", self.trigger, self.applied);
        true
    }

    /// Close the menu and strip placement. Returns `false` if it was closed.
    pub fn dismiss(&mut self, doc: &mut Document) -> bool {
        if !self.is_expanded(doc) {
            return false;
        }
        state::collapse(doc, self.trigger, self.menu, &self.markers.expanded_attr);
        placement::clear(doc, self.menu, &self.markers);
        self.applied = PlacementFlags::empty();
        self.focused_index = None;
        log::debug!("dropdown {:?} dismissed", self.trigger);
        true
    }

    fn close_and_refocus(&mut self, doc: &mut Document) {
        self.dismiss(doc);
        doc.focus(self.trigger);
    }

    /// Make item `index` the only tab stop and focus it.
    ///
    /// No-op while closed or when `index` is out of range.
    pub fn focus_by_index(&mut self, doc: &mut Document, index: usize) {
        let items = self.menu_items(doc);
        self.focus_in(doc, &items, index);
    }

    fn focus_in(&mut self, doc: &mut Document, items: &[NodeId], index: usize) {
        if !self.is_expanded(doc) {
            return;
        }
        let Some(&target) = items.get(index) else {
            return;
        };
        for (i, &item) in items.iter().enumerate() {
            doc.set_tab_index(item, if i == index { 0 } else { -1 });
        }
        doc.focus(target);
        self.focused_index = Some(index);
        log::trace!("dropdown {:?} focused item {index}", self.trigger);
    }

    /// Focus the first item.
    pub fn focus_first(&mut self, doc: &mut Document) {
        self.focus_by_index(doc, 0);
    }

    /// Focus the last item.
    pub fn focus_last(&mut self, doc: &mut Document) {
        let items = self.menu_items(doc);
        if let Some(last) = items.len().checked_sub(1) {
            self.focus_in(doc, &items, last);
        }
    }

    /// Focus the item after `current`, wrapping to the first.
    pub fn focus_next(&mut self, doc: &mut Document, current: Option<NodeId>) {
        let items = self.menu_items(doc);
        let pos = position(&items, current);
        if let Some(next) = items::next_index(items.len(), pos) {
            self.focus_in(doc, &items, next);
        }
    }

    /// Focus the item before `current`, wrapping to the last.
    pub fn focus_previous(&mut self, doc: &mut Document, current: Option<NodeId>) {
        let items = self.menu_items(doc);
        let pos = position(&items, current);
        if let Some(prev) = items::previous_index(items.len(), pos) {
            self.focus_in(doc, &items, prev);
        }
    }

    /// Focus the next item after `current` whose label starts with `typed`.
    pub fn focus_by_char(&mut self, doc: &mut Document, current: Option<NodeId>, typed: char) {
        let items = self.menu_items(doc);
        let initials: Vec<Option<char>> = items
            .iter()
            .map(|&item| items::initial(&doc.text_content(item)))
            .collect();
        let pos = position(&items, current);
        if let Some(hit) = items::typeahead_index(&initials, pos, typed) {
            self.focus_in(doc, &items, hit);
        }
    }

    /// The item a key press with composed path `path` acts from.
    ///
    /// That is the innermost item on `path`, so content portaled out of an
    /// item still counts as that item. When no item is on the path (for
    /// example a key press on the menu itself), the item at the last focused
    /// index is used.
    pub fn current_item(&self, doc: &Document, path: &[NodeId]) -> Option<NodeId> {
        let items = self.menu_items(doc);
        path.iter()
            .copied()
            .find(|node| items.contains(node))
            .or_else(|| self.focused_index.and_then(|i| items.get(i).copied()))
    }

    /// Click on the trigger: toggle.
    pub fn on_trigger_click(&mut self, doc: &mut Document, ev: &mut Event) {
        ev.consume();
        if self.is_expanded(doc) {
            self.close_and_refocus(doc);
        } else {
            self.open(doc);
            self.focus_first(doc);
        }
    }

    /// Key press on the trigger.
    pub fn on_trigger_key(&mut self, doc: &mut Document, ev: &mut Event) {
        let Some(kb) = ev.keyboard() else {
            return;
        };
        let action = match &kb.key {
            Key::Named(NamedKey::Enter | NamedKey::ArrowDown) => TriggerAction::OpenFirst,
            Key::Named(NamedKey::ArrowUp) => TriggerAction::OpenLast,
            Key::Named(NamedKey::Escape) => TriggerAction::Close,
            key if key.as_char() == Some(' ') => TriggerAction::OpenFirst,
            _ => return,
        };
        ev.consume();
        log::trace!("dropdown {:?} trigger key: {action:?}", self.trigger);
        match action {
            TriggerAction::OpenFirst => {
                self.open(doc);
                self.focus_first(doc);
            }
            TriggerAction::OpenLast => {
                self.open(doc);
                self.focus_last(doc);
            }
            TriggerAction::Close => self.close_and_refocus(doc),
        }
    }

    /// Key press inside the menu.
    pub fn on_menu_key(&mut self, doc: &mut Document, ev: &mut Event) {
        let Some(kb) = ev.keyboard() else {
            return;
        };
        if kb.is_shortcut() {
            return;
        }
        let action = match &kb.key {
            Key::Named(NamedKey::Escape) => MenuAction::Close,
            Key::Named(NamedKey::ArrowDown) => MenuAction::Next,
            Key::Named(NamedKey::ArrowUp) => MenuAction::Previous,
            Key::Named(NamedKey::Home | NamedKey::PageUp) => MenuAction::First,
            Key::Named(NamedKey::End | NamedKey::PageDown) => MenuAction::Last,
            Key::Named(NamedKey::Tab) if kb.shift() => MenuAction::Close,
            Key::Named(NamedKey::Tab) => MenuAction::TabOut,
            key => match key.printable() {
                Some(c) => MenuAction::Typeahead(c),
                None => return,
            },
        };
        log::trace!("dropdown {:?} menu key: {action:?}", self.trigger);

        if action == MenuAction::TabOut {
            // Default tab order moves focus on from here.
            self.dismiss(doc);
            return;
        }
        ev.consume();
        let current = self.current_item(doc, ev.composed_path().unwrap_or_default());
        match action {
            MenuAction::Close => self.close_and_refocus(doc),
            MenuAction::Next => self.focus_next(doc, current),
            MenuAction::Previous => self.focus_previous(doc, current),
            MenuAction::First => self.focus_first(doc),
            MenuAction::Last => self.focus_last(doc),
            MenuAction::Typeahead(c) => self.focus_by_char(doc, current, c),
            MenuAction::TabOut => {}
        }
    }

    /// Click anywhere in the document: close if it landed outside.
    ///
    /// Clicks on or inside the trigger, and clicks whose composed path passes
    /// through the menu, are inside. Without a composed path nothing happens.
    pub fn on_outside_click(&mut self, doc: &mut Document, ev: &Event) {
        if !self.is_expanded(doc) {
            return;
        }
        let Some(path) = ev.composed_path() else {
            return;
        };
        if doc.contains(self.trigger, ev.target()) || path.contains(&self.menu) {
            return;
        }
        log::debug!("dropdown {:?} closed by outside click", self.trigger);
        self.close_and_refocus(doc);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TriggerAction {
    OpenFirst,
    OpenLast,
    Close,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum MenuAction {
    Close,
    Next,
    Previous,
    First,
    Last,
    TabOut,
    Typeahead(char),
}

fn position(items: &[NodeId], current: Option<NodeId>) -> Option<usize> {
    let current = current?;
    items.iter().position(|&i| i == current)
}

/// The element's id, generating one if it is missing or malformed.
fn ensure_id(doc: &mut Document, node: NodeId) -> String {
    if let Some(id) = doc
        .id_of(node)
        .filter(|id| !id.is_empty() && !id.contains(char::is_whitespace))
    {
        return id.to_string();
    }
    let id = doc.generate_id();
    doc.set_attribute(node, "id", &id);
    id
}
