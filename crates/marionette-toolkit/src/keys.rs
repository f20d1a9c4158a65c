//! Key codes, modifier masks and mouse buttons.

use std::fmt;

/// Virtual key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const BACK_SPACE: KeyCode = KeyCode(8);
    pub const TAB: KeyCode = KeyCode(9);
    pub const ENTER: KeyCode = KeyCode(10);
    pub const SHIFT: KeyCode = KeyCode(16);
    pub const CONTROL: KeyCode = KeyCode(17);
    pub const ALT: KeyCode = KeyCode(18);
    pub const ESCAPE: KeyCode = KeyCode(27);
    pub const SPACE: KeyCode = KeyCode(32);
    pub const PAGE_UP: KeyCode = KeyCode(33);
    pub const PAGE_DOWN: KeyCode = KeyCode(34);
    pub const END: KeyCode = KeyCode(35);
    pub const HOME: KeyCode = KeyCode(36);
    pub const LEFT: KeyCode = KeyCode(37);
    pub const UP: KeyCode = KeyCode(38);
    pub const RIGHT: KeyCode = KeyCode(39);
    pub const DOWN: KeyCode = KeyCode(40);
    pub const DIGIT_0: KeyCode = KeyCode(48);
    pub const A: KeyCode = KeyCode(65);
    pub const C: KeyCode = KeyCode(67);
    pub const V: KeyCode = KeyCode(86);
    pub const X: KeyCode = KeyCode(88);
    pub const Z: KeyCode = KeyCode(90);
    pub const F1: KeyCode = KeyCode(112);
    pub const DELETE: KeyCode = KeyCode(127);
    pub const META: KeyCode = KeyCode(157);
    pub const ALT_GRAPH: KeyCode = KeyCode(65406);

    /// Key code for an ASCII letter or digit, case-insensitive.
    pub fn for_char(c: char) -> Option<KeyCode> {
        match c {
            'a'..='z' => Some(KeyCode(c as u32 - 'a' as u32 + 65)),
            'A'..='Z' => Some(KeyCode(c as u32)),
            '0'..='9' => Some(KeyCode(c as u32)),
            ' ' => Some(KeyCode::SPACE),
            '\n' => Some(KeyCode::ENTER),
            '\t' => Some(KeyCode::TAB),
            _ => None,
        }
    }

    /// The modifier flag this key toggles, if it is a modifier key.
    pub fn modifier(self) -> Option<Modifiers> {
        match self {
            KeyCode::SHIFT => Some(Modifiers::SHIFT),
            KeyCode::CONTROL => Some(Modifiers::CTRL),
            KeyCode::ALT => Some(Modifiers::ALT),
            KeyCode::ALT_GRAPH => Some(Modifiers::ALT_GRAPH),
            KeyCode::META => Some(Modifiers::META),
            _ => None,
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            KeyCode::SHIFT => f.write_str("SHIFT"),
            KeyCode::CONTROL => f.write_str("CONTROL"),
            KeyCode::ALT => f.write_str("ALT"),
            KeyCode::ALT_GRAPH => f.write_str("ALT_GRAPH"),
            KeyCode::META => f.write_str("META"),
            KeyCode::ENTER => f.write_str("ENTER"),
            KeyCode::TAB => f.write_str("TAB"),
            KeyCode::ESCAPE => f.write_str("ESCAPE"),
            KeyCode::SPACE => f.write_str("SPACE"),
            KeyCode(code @ 65..=90) | KeyCode(code @ 48..=57) => {
                write!(f, "{}", char::from(code as u8))
            }
            KeyCode(code) => write!(f, "0x{code:x}"),
        }
    }
}

/// Bitmask of keyboard modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1);
    pub const CTRL: Self = Self(1 << 1);
    pub const META: Self = Self(1 << 2);
    pub const ALT: Self = Self(1 << 3);
    pub const ALT_GRAPH: Self = Self(1 << 5);

    /// Canonical press order. Releases walk it backwards.
    pub const PRESS_ORDER: [(Modifiers, KeyCode); 5] = [
        (Modifiers::SHIFT, KeyCode::SHIFT),
        (Modifiers::CTRL, KeyCode::CONTROL),
        (Modifiers::ALT, KeyCode::ALT),
        (Modifiers::ALT_GRAPH, KeyCode::ALT_GRAPH),
        (Modifiers::META, KeyCode::META),
    ];

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Modifiers) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Modifiers) {
        self.0 &= !other.0;
    }

    pub fn contains(self, other: Modifiers) -> bool {
        other.0 != 0 && (self.0 & other.0) == other.0
    }

    pub fn is_shift_down(self) -> bool {
        self.contains(Modifiers::SHIFT)
    }

    pub fn is_ctrl_down(self) -> bool {
        self.contains(Modifiers::CTRL)
    }

    pub fn is_meta_down(self) -> bool {
        self.contains(Modifiers::META)
    }

    pub fn is_alt_down(self) -> bool {
        self.contains(Modifiers::ALT)
    }

    pub fn is_alt_graph_down(self) -> bool {
        self.contains(Modifiers::ALT_GRAPH)
    }

    /// Keys to press for this mask, in canonical order.
    pub fn keys(self) -> impl DoubleEndedIterator<Item = KeyCode> {
        Self::PRESS_ORDER
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, key)| key)
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<Modifiers> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifiers>>(iter: I) -> Self {
        iter.into_iter().fold(Modifiers::NONE, |acc, m| acc | m)
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left = 0,
    Middle = 1,
    Right = 2,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Middle, MouseButton::Right];
}

/// Set of mouse buttons, pressed or released together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MouseButtons(u8);

impl MouseButtons {
    pub const NONE: Self = Self(0);

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn with(mut self, button: MouseButton) -> Self {
        self.insert(button);
        self
    }

    pub fn insert(&mut self, button: MouseButton) {
        self.0 |= 1 << (button as u8);
    }

    pub fn remove(&mut self, button: MouseButton) {
        self.0 &= !(1 << (button as u8));
    }

    pub fn contains(&self, button: MouseButton) -> bool {
        (self.0 & (1 << (button as u8))) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = MouseButton> {
        MouseButton::ALL
            .into_iter()
            .filter(move |button| self.contains(*button))
    }
}

impl Default for MouseButtons {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        MouseButtons::NONE.with(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_keys_follow_canonical_order() {
        let mods = Modifiers::META | Modifiers::SHIFT | Modifiers::ALT;
        let keys: Vec<_> = mods.keys().collect();
        assert_eq!(keys, vec![KeyCode::SHIFT, KeyCode::ALT, KeyCode::META]);
        let reversed: Vec<_> = mods.keys().rev().collect();
        assert_eq!(reversed, vec![KeyCode::META, KeyCode::ALT, KeyCode::SHIFT]);
    }

    #[test]
    fn empty_mask_contains_nothing() {
        assert!(!Modifiers::NONE.contains(Modifiers::NONE));
        assert!(!Modifiers::NONE.is_alt_down());
        assert_eq!(Modifiers::from_iter([]), Modifiers::NONE);
    }

    #[test]
    fn mouse_buttons_insert_and_remove() {
        let mut buttons = MouseButtons::from(MouseButton::Left).with(MouseButton::Right);
        assert!(buttons.contains(MouseButton::Right));
        buttons.remove(MouseButton::Left);
        assert_eq!(buttons.iter().collect::<Vec<_>>(), vec![MouseButton::Right]);
    }

    #[test]
    fn key_codes_for_letters_ignore_case() {
        assert_eq!(KeyCode::for_char('a'), Some(KeyCode::A));
        assert_eq!(KeyCode::for_char('A'), Some(KeyCode::A));
        assert_eq!(KeyCode::for_char('é'), None);
        assert_eq!(KeyCode::SHIFT.modifier(), Some(Modifiers::SHIFT));
        assert_eq!(KeyCode::A.modifier(), None);
    }
}
