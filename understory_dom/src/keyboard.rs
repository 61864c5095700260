// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard input: logical keys, modifiers, and key events.
//!
//! Keys follow the DOM `KeyboardEvent.key` vocabulary. [`Key::parse`] accepts
//! the current names as well as the legacy aliases some browsers still emit
//! (`"Esc"`, `"Up"`, `"Down"`, `"Left"`, `"Right"`, `"Spacebar"`).

use alloc::string::{String, ToString};

bitflags::bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Alt / Option.
        const ALT     = 0b0000_0100;
        /// Meta / Command / Windows.
        const META    = 0b0000_1000;
    }
}

impl Modifiers {
    /// Modifiers that turn a key press into a shortcut (everything but Shift).
    pub const SHORTCUT: Self = Self::CONTROL.union(Self::ALT).union(Self::META);
}

/// Non-character keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NamedKey {
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Home.
    Home,
    /// End.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
}

/// A logical key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A named, non-character key.
    Named(NamedKey),
    /// The string a key produces (`" "` for the space bar), or any key name
    /// this crate does not model.
    Character(String),
}

impl Key {
    /// Parse a DOM key string.
    pub fn parse(key: &str) -> Self {
        let named = match key {
            "Enter" => NamedKey::Enter,
            "Escape" | "Esc" => NamedKey::Escape,
            "Tab" => NamedKey::Tab,
            "ArrowUp" | "Up" => NamedKey::ArrowUp,
            "ArrowDown" | "Down" => NamedKey::ArrowDown,
            "ArrowLeft" | "Left" => NamedKey::ArrowLeft,
            "ArrowRight" | "Right" => NamedKey::ArrowRight,
            "Home" => NamedKey::Home,
            "End" => NamedKey::End,
            "PageUp" => NamedKey::PageUp,
            "PageDown" => NamedKey::PageDown,
            "Backspace" => NamedKey::Backspace,
            "Delete" | "Del" => NamedKey::Delete,
            "Spacebar" => return Self::Character(" ".to_string()),
            other => return Self::Character(other.to_string()),
        };
        Self::Named(named)
    }

    /// The single character this key produces, if any.
    pub fn as_char(&self) -> Option<char> {
        let Self::Character(s) = self else {
            return None;
        };
        let mut chars = s.chars();
        let c = chars.next()?;
        chars.next().is_none().then_some(c)
    }

    /// The character if this key produces exactly one non-whitespace character.
    pub fn printable(&self) -> Option<char> {
        self.as_char().filter(|c| !c.is_whitespace())
    }

    /// Whether this is the named key `named`.
    pub fn is(&self, named: NamedKey) -> bool {
        matches!(self, Self::Named(k) if *k == named)
    }
}

impl From<NamedKey> for Key {
    fn from(named: NamedKey) -> Self {
        Self::Named(named)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::Character(c.to_string())
    }
}

/// A key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// Logical key.
    pub key: Key,
    /// Modifiers held at the time of the press.
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    /// A key press without modifiers.
    pub fn new(key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::empty(),
        }
    }

    /// Replace the modifier set.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether Shift is held.
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Whether any of Control, Alt, or Meta is held.
    pub fn is_shortcut(&self) -> bool {
        self.modifiers.intersects(Modifiers::SHORTCUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_aliases_parse_to_named_keys() {
        assert_eq!(Key::parse("Esc"), Key::Named(NamedKey::Escape));
        assert_eq!(Key::parse("Down"), Key::Named(NamedKey::ArrowDown));
        assert_eq!(Key::parse("Up"), Key::Named(NamedKey::ArrowUp));
        assert_eq!(Key::parse("Spacebar"), Key::from(' '));
        assert_eq!(Key::parse("PageDown"), Key::Named(NamedKey::PageDown));
    }

    #[test]
    fn printable_requires_single_non_whitespace_char() {
        assert_eq!(Key::parse("a").printable(), Some('a'));
        assert_eq!(Key::parse("Ä").printable(), Some('Ä'));
        assert_eq!(Key::parse(" ").printable(), None);
        assert_eq!(Key::parse("F1").printable(), None);
        assert_eq!(Key::parse("").printable(), None);
        assert_eq!(Key::Named(NamedKey::Enter).printable(), None);
    }

    #[test]
    fn shortcut_ignores_shift() {
        let ev = KeyboardEvent::new('a').with_modifiers(Modifiers::SHIFT);
        assert!(ev.shift());
        assert!(!ev.is_shortcut());
        let ev = KeyboardEvent::new('a').with_modifiers(Modifiers::CONTROL);
        assert!(ev.is_shortcut());
        let ev = KeyboardEvent::new('a').with_modifiers(Modifiers::META | Modifiers::SHIFT);
        assert!(ev.is_shortcut());
    }
}
