// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu items: live queries and index arithmetic for roving focus.
//!
//! Items are a view over the current document, never a stored collection.
//! Every operation re-queries, so items inserted or removed by the host take
//! part in the very next key press.
//!
//! Positions follow the menu's DOM conventions: a current item that is not
//! in the list behaves like position `-1`, so "next" lands on the first item
//! and "previous" on the last.

use alloc::vec::Vec;

use understory_dom::{Document, NodeId};

use crate::markers::Markers;

/// Selectable items of `menu`, in document order.
pub fn menu_items(doc: &Document, menu: NodeId, markers: &Markers) -> Vec<NodeId> {
    doc.descendants(menu)
        .filter(|&n| doc.role(n).is_some_and(|r| markers.is_item_role(r)))
        .collect()
}

/// Index after `current`, wrapping to the start.
pub fn next_index(len: usize, current: Option<usize>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(current.map_or(0, |c| (c + 1) % len))
}

/// Index before `current`, wrapping to the end.
pub fn previous_index(len: usize, current: Option<usize>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(c) if c > 0 && c < len => c - 1,
        _ => len - 1,
    })
}

/// First non-whitespace character of a label.
pub fn initial(label: &str) -> Option<char> {
    label.chars().find(|c| !c.is_whitespace())
}

fn folded_eq(a: char, b: char) -> bool {
    a.to_lowercase().eq(b.to_lowercase())
}

/// Typeahead target for `typed`, given each item's initial.
///
/// Searches from the item after `current` to the end, then from the start.
/// Matching is case-insensitive; items without an initial never match.
pub fn typeahead_index(
    initials: &[Option<char>],
    current: Option<usize>,
    typed: char,
) -> Option<usize> {
    let start = next_index(initials.len(), current)?;
    let matches = |i: &usize| initials[*i].is_some_and(|c| folded_eq(c, typed));
    (start..initials.len())
        .find(matches)
        .or_else(|| (0..initials.len()).find(matches))
}
