// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, focus, queries.

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Rect, Size};
use smallvec::SmallVec;

use crate::layout::{StyleSheet, popover_rect};
use crate::types::{Element, Layout, NodeId};

/// Popovers may anchor to popovers; resolution gives up past this depth.
const MAX_ANCHOR_DEPTH: usize = 32;

/// Path from a node up to its root, innermost first.
pub type ComposedPath = SmallVec<[NodeId; 16]>;

/// An element tree with a single focused element and a viewport.
///
/// Nodes are addressed by generational [`NodeId`]s. Operations on stale ids
/// are no-ops and queries on them return `None`.
///
/// Besides the main tree hanging off [`Document::root`], the document can hold
/// portal roots: subtrees without a structural parent that are logically
/// hosted by an element elsewhere. [`Document::contains`] only follows the
/// structural hierarchy, while [`Document::composed_path`] continues from a
/// portal root to its host.
///
/// ## Example
///
/// ```rust
/// use kurbo::Size;
/// use understory_dom::{Document, Element};
///
/// let mut doc = Document::new(Size::new(800.0, 600.0));
/// let body = doc.append(doc.root(), Element::new("body")).unwrap();
/// let button = doc.append(body, Element::new("button").with_id("go")).unwrap();
///
/// assert_eq!(doc.find_by_id("go"), Some(button));
/// assert!(doc.focus(button));
/// assert_eq!(doc.active_element(), Some(button));
/// ```
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    active: Option<NodeId>,
    viewport: Size,
    style: StyleSheet,
    #[cfg_attr(feature = "std", allow(dead_code, reason = "Only used by the no_std id fallback."))]
    id_counter: u64,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("active", &self.active)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    /// Logical owner of a portal root.
    host: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

impl Document {
    /// Create a document whose root is a `#document` element.
    pub fn new(viewport: Size) -> Self {
        let root = Node {
            generation: 1,
            parent: None,
            host: None,
            children: Vec::new(),
            element: Element::new("#document"),
        };
        Self {
            nodes: alloc::vec![Some(root)],
            generations: alloc::vec![1],
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            active: None,
            viewport,
            style: StyleSheet::default(),
            id_counter: 0,
        }
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The first `body` child of the root, if any.
    pub fn body(&self) -> Option<NodeId> {
        self.children_of(self.root)
            .iter()
            .copied()
            .find(|&c| self.element(c).is_some_and(|e| e.tag == "body"))
    }

    /// Viewport size in client coordinates.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Style sheet used to place popovers.
    pub fn style_sheet(&self) -> &StyleSheet {
        &self.style
    }

    /// Replace the style sheet.
    pub fn set_style_sheet(&mut self, style: StyleSheet) {
        self.style = style;
    }

    /// Whether `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|n| n.generation == id.1)
    }

    fn alloc(&mut self, parent: Option<NodeId>, host: Option<NodeId>, element: Element) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        self.nodes[idx] = Some(Node {
            generation,
            parent,
            host,
            children: Vec::new(),
            element,
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId stores 32-bit slot indices."
        )]
        let idx = idx as u32;
        NodeId::new(idx, generation)
    }

    /// Append `element` as the last child of `parent`.
    ///
    /// Returns `None` if `parent` is stale.
    pub fn append(&mut self, parent: NodeId, element: Element) -> Option<NodeId> {
        if !self.is_alive(parent) {
            return None;
        }
        let id = self.alloc(Some(parent), None, element);
        self.node_mut(parent)?.children.push(id);
        Some(id)
    }

    /// Insert `element` under `parent`, immediately before `reference`.
    ///
    /// Appends when `reference` is not a child of `parent`. Returns `None` if
    /// `parent` is stale.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        reference: NodeId,
        element: Element,
    ) -> Option<NodeId> {
        if !self.is_alive(parent) {
            return None;
        }
        let id = self.alloc(Some(parent), None, element);
        let children = &mut self.node_mut(parent)?.children;
        match children.iter().position(|&c| c == reference) {
            Some(pos) => children.insert(pos, id),
            None => children.push(id),
        }
        Some(id)
    }

    /// Create a portal root logically hosted by `host`.
    ///
    /// The portal has no structural parent: it is not a descendant of `host`
    /// for [`Document::contains`], but its composed path runs through `host`.
    pub fn insert_portal(&mut self, host: NodeId, element: Element) -> Option<NodeId> {
        if !self.is_alive(host) {
            return None;
        }
        Some(self.alloc(None, Some(host), element))
    }

    /// Remove a node, its subtree, and any portals hosted inside that subtree.
    ///
    /// The root cannot be removed. Focus inside the removed subtree is dropped.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.parent_of(id)
            && let Some(p) = self.node_mut(parent)
        {
            p.children.retain(|&c| c != id);
        }
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        let children = node.children.clone();
        for child in children {
            self.free_subtree(child);
        }
        let hosted: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let n = slot.as_ref()?;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId stores 32-bit slot indices."
                )]
                let i = i as u32;
                (n.host == Some(id)).then_some(NodeId::new(i, n.generation))
            })
            .collect();
        for portal in hosted {
            self.free_subtree(portal);
        }
        if self.active == Some(id) {
            self.active = None;
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Structural parent of a live node.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Host of a live portal root.
    pub fn host_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.host
    }

    /// Children of a live node; empty for stale ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The sibling immediately after `id`.
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children_of(self.parent_of(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// The sibling immediately before `id`.
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children_of(self.parent_of(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    /// Descendants of `id` in document order, excluding `id` itself.
    ///
    /// Portals hosted inside the subtree are not included.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = Vec::new();
        stack.extend(self.children_of(id).iter().rev().copied());
        Descendants { doc: self, stack }
    }

    /// Whether `node` is `ancestor` or one of its structural descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// Propagation path from `target` to its root, crossing portal hosts.
    ///
    /// Empty when `target` is stale.
    pub fn composed_path(&self, target: NodeId) -> ComposedPath {
        let mut path = ComposedPath::new();
        let mut current = self.node(target).map(|_| target);
        while let Some(id) = current {
            path.push(id);
            let Some(node) = self.node(id) else {
                break;
            };
            current = node.parent.or(node.host);
        }
        path
    }

    /// Element data of a live node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }

    /// Mutable element data of a live node.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_mut(id).map(|n| &mut n.element)
    }

    /// Value of attribute `name`.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attributes.get(name).map(String::as_str)
    }

    /// Whether attribute `name` is present.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id)
            .is_some_and(|e| e.attributes.contains_key(name))
    }

    /// Set attribute `name`. Returns `false` for stale ids.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(el) = self.element_mut(id) else {
            return false;
        };
        match el.attributes.get_mut(name) {
            Some(v) if v.as_str() == value => {}
            Some(v) => value.clone_into(v),
            None => {
                el.attributes.insert(name.to_string(), value.to_string());
            }
        }
        true
    }

    /// Remove attribute `name`. Returns `true` if it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.element_mut(id)
            .is_some_and(|e| e.attributes.remove(name).is_some())
    }

    /// The `id` attribute.
    pub fn id_of(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id")
    }

    /// The `role` attribute.
    pub fn role(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "role")
    }

    /// Parsed `tabindex` attribute.
    pub fn tab_index(&self, id: NodeId) -> Option<i32> {
        self.element(id)?.tab_index()
    }

    /// Write the `tabindex` attribute.
    pub fn set_tab_index(&mut self, id: NodeId, index: i32) -> bool {
        self.set_attribute(id, "tabindex", &index.to_string())
    }

    /// First element of the main tree whose `id` attribute equals `value`.
    pub fn find_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|&n| self.id_of(n) == Some(value))
    }

    /// Whether `id` carries `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Add `class` to `id`. Returns `true` if the class list changed.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        self.element_mut(id).is_some_and(|e| e.add_class(class))
    }

    /// Remove `class` from `id`. Returns `true` if the class list changed.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        self.element_mut(id).is_some_and(|e| e.remove_class(class))
    }

    /// Elements of the main tree carrying `class`, in document order.
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    /// Concatenated text of `id` and its descendants, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(el) = self.element(id) {
            out.push_str(&el.text);
        }
        for n in self.descendants(id) {
            if let Some(el) = self.element(n) {
                out.push_str(&el.text);
            }
        }
        out
    }

    /// Generate an element id that no element in the main tree uses yet.
    ///
    /// With `std` this is a random UUID v4. Without it, tokens are
    /// sequential UUIDs, still unique within this document.
    pub fn generate_id(&mut self) -> String {
        loop {
            let token = self.next_token();
            if self.find_by_id(&token).is_none() {
                return token;
            }
        }
    }

    #[cfg(feature = "std")]
    fn next_token(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    #[cfg(not(feature = "std"))]
    fn next_token(&mut self) -> String {
        self.id_counter += 1;
        uuid::Uuid::from_u128(u128::from(self.id_counter)).to_string()
    }

    /// The focused element.
    pub fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|&a| self.is_alive(a))
    }

    /// Move focus to `id` if it is live and focusable.
    ///
    /// Returns `true` if `id` is now the active element.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.element(id).is_some_and(Element::is_focusable) {
            return false;
        }
        if self.active != Some(id) {
            log::trace!("focus {:?} -> {:?}", self.active, id);
            self.active = Some(id);
        }
        true
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Sequential focus navigation (the default action of Tab / Shift+Tab).
    ///
    /// Moves focus to the next (or previous) tabbable element of the main
    /// tree in document order, relative to the focused element. Leaving
    /// either end of the document clears focus. Returns the new focus.
    pub fn focus_sequential(&mut self, backward: bool) -> Option<NodeId> {
        let order: Vec<NodeId> = self.descendants(self.root).collect();
        let tabbable = |doc: &Self, n: NodeId| doc.element(n).is_some_and(Element::is_tabbable);
        let pos = self
            .active_element()
            .and_then(|a| order.iter().position(|&n| n == a));
        let next = if backward {
            let end = pos.unwrap_or(order.len());
            order[..end].iter().rev().copied().find(|&n| tabbable(self, n))
        } else {
            let start = pos.map_or(0, |p| p + 1);
            order[start..].iter().copied().find(|&n| tabbable(self, n))
        };
        match next {
            Some(n) => {
                self.focus(n);
            }
            None => self.blur(),
        }
        next
    }

    /// Client-space rectangle of a live element.
    pub fn client_rect(&self, id: NodeId) -> Option<Rect> {
        self.client_rect_at_depth(id, 0)
    }

    fn client_rect_at_depth(&self, id: NodeId, depth: usize) -> Option<Rect> {
        let el = self.element(id)?;
        match el.layout {
            Layout::Fixed(rect) => Some(rect),
            Layout::Popover { anchor, size } => {
                if depth >= MAX_ANCHOR_DEPTH {
                    return None;
                }
                let anchor_rect = self.client_rect_at_depth(anchor, depth + 1)?;
                let flags = self.style.flags_for(el.classes.iter().map(String::as_str));
                Some(popover_rect(anchor_rect, size, flags))
            }
        }
    }
}

/// Document-order iterator returned by [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children_of(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PlacementFlags;
    use alloc::vec;

    fn doc_with_body() -> (Document, NodeId) {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let body = doc.append(doc.root(), Element::new("body")).unwrap();
        (doc, body)
    }

    #[test]
    fn descendants_follow_document_order() {
        let (mut doc, body) = doc_with_body();
        let a = doc.append(body, Element::new("div")).unwrap();
        let a1 = doc.append(a, Element::new("span")).unwrap();
        let b = doc.append(body, Element::new("div")).unwrap();
        let a2 = doc.append(a, Element::new("span")).unwrap();
        let got: Vec<NodeId> = doc.descendants(body).collect();
        assert_eq!(got, vec![a, a1, a2, b]);
    }

    #[test]
    fn insert_before_places_node_ahead_of_reference() {
        let (mut doc, body) = doc_with_body();
        let a = doc.append(body, Element::new("li")).unwrap();
        let c = doc.append(body, Element::new("li")).unwrap();
        let b = doc.insert_before(body, c, Element::new("li")).unwrap();
        assert_eq!(doc.children_of(body), &[a, b, c]);
        assert_eq!(doc.next_element_sibling(a), Some(b));
        assert_eq!(doc.previous_element_sibling(c), Some(b));
        assert_eq!(doc.previous_element_sibling(a), None);
        assert_eq!(doc.next_element_sibling(c), None);
    }

    #[test]
    fn removed_ids_become_stale_and_slots_are_reused() {
        let (mut doc, body) = doc_with_body();
        let a = doc.append(body, Element::new("div")).unwrap();
        let child = doc.append(a, Element::new("button")).unwrap();
        assert!(doc.focus(child));
        doc.remove(a);
        assert!(!doc.is_alive(a));
        assert!(!doc.is_alive(child));
        assert_eq!(doc.active_element(), None);
        assert!(doc.children_of(body).is_empty());

        let b = doc.append(body, Element::new("div")).unwrap();
        assert_ne!(a, b);
        assert!(doc.element(a).is_none());
        assert!(!doc.set_attribute(a, "id", "x"));
    }

    #[test]
    fn set_attribute_overwrites_in_place() {
        let (mut doc, body) = doc_with_body();
        let b = doc
            .append(body, Element::new("button").with_attr("aria-expanded", "false"))
            .unwrap();
        assert!(doc.set_attribute(b, "aria-expanded", "true"));
        assert_eq!(doc.attribute(b, "aria-expanded"), Some("true"));
        assert!(doc.set_attribute(b, "aria-expanded", "true"));
        assert_eq!(doc.element(b).unwrap().attributes.len(), 1);
    }

    #[test]
    fn root_cannot_be_removed() {
        let (mut doc, _) = doc_with_body();
        let root = doc.root();
        doc.remove(root);
        assert!(doc.is_alive(root));
    }

    #[test]
    fn portal_is_on_composed_path_but_not_contained() {
        let (mut doc, body) = doc_with_body();
        let menu = doc.append(body, Element::new("ul")).unwrap();
        let portal = doc.insert_portal(menu, Element::new("div")).unwrap();
        let inner = doc.append(portal, Element::new("button")).unwrap();

        assert!(!doc.contains(menu, inner));
        assert!(doc.contains(portal, inner));
        let path = doc.composed_path(inner);
        assert_eq!(path.as_slice(), &[inner, portal, menu, body, doc.root()]);

        doc.remove(menu);
        assert!(!doc.is_alive(portal));
        assert!(!doc.is_alive(inner));
    }

    #[test]
    fn composed_path_of_stale_node_is_empty() {
        let (mut doc, body) = doc_with_body();
        let a = doc.append(body, Element::new("div")).unwrap();
        doc.remove(a);
        assert!(doc.composed_path(a).is_empty());
    }

    #[test]
    fn text_content_concatenates_subtree() {
        let (mut doc, body) = doc_with_body();
        let li = doc.append(body, Element::new("li").with_text("  ")).unwrap();
        doc.append(li, Element::new("a").with_text("Sign ")).unwrap();
        doc.append(li, Element::new("b").with_text("out")).unwrap();
        assert_eq!(doc.text_content(li), "  Sign out");
    }

    #[test]
    fn generated_ids_are_unique() {
        let (mut doc, body) = doc_with_body();
        let a = doc.generate_id();
        doc.append(body, Element::new("div").with_id(&a)).unwrap();
        let b = doc.generate_id();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn focus_requires_focusable_element() {
        let (mut doc, body) = doc_with_body();
        let div = doc.append(body, Element::new("div")).unwrap();
        assert!(!doc.focus(div));
        doc.set_tab_index(div, -1);
        assert!(doc.focus(div));
        assert_eq!(doc.active_element(), Some(div));
    }

    #[test]
    fn sequential_focus_skips_negative_tabindex() {
        let (mut doc, body) = doc_with_body();
        let first = doc.append(body, Element::new("button")).unwrap();
        let skipped = doc
            .append(body, Element::new("li").with_attr("tabindex", "-1"))
            .unwrap();
        let last = doc
            .append(body, Element::new("li").with_attr("tabindex", "0"))
            .unwrap();

        assert_eq!(doc.focus_sequential(false), Some(first));
        assert_eq!(doc.focus_sequential(false), Some(last));
        assert_eq!(doc.focus_sequential(false), None);
        assert_eq!(doc.active_element(), None);

        assert!(doc.focus(skipped));
        assert_eq!(doc.focus_sequential(true), Some(first));
        assert_eq!(doc.focus_sequential(true), None);
    }

    #[test]
    fn popover_follows_anchor_and_classes() {
        let (mut doc, body) = doc_with_body();
        doc.set_style_sheet(StyleSheet::new().with_rule("up", PlacementFlags::ABOVE));
        let anchor = doc
            .append(
                body,
                Element::new("button").with_bounds(Rect::new(10.0, 300.0, 90.0, 330.0)),
            )
            .unwrap();
        let pop = doc
            .append(
                body,
                Element::new("ul").anchored_to(anchor, Size::new(100.0, 50.0)),
            )
            .unwrap();
        assert_eq!(
            doc.client_rect(pop),
            Some(Rect::new(10.0, 330.0, 110.0, 380.0))
        );
        doc.add_class(pop, "up");
        assert_eq!(
            doc.client_rect(pop),
            Some(Rect::new(10.0, 250.0, 110.0, 300.0))
        );
    }

    #[test]
    fn popover_anchor_cycle_resolves_to_none() {
        let (mut doc, body) = doc_with_body();
        let a = doc.append(body, Element::new("div")).unwrap();
        let b = doc
            .append(body, Element::new("div").anchored_to(a, Size::new(1.0, 1.0)))
            .unwrap();
        doc.element_mut(a).unwrap().layout = Layout::Popover {
            anchor: b,
            size: Size::new(1.0, 1.0),
        };
        assert_eq!(doc.client_rect(a), None);
    }
}
