//! Abstract input key event, independent of any front end.
//!
//! Front ends (the headless stdin driver, tests, a future browser bridge)
//! translate their native key events into `InputKey` at the boundary.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Regular character key
    Char(char),

    // Navigation
    /// ArrowUp
    Up,
    /// ArrowDown
    Down,
    /// Alt+ArrowUp (opens the hover card of the focused link)
    AltUp,

    // Action keys
    Enter,
    Esc,
    Tab,
    /// Shift+Tab
    BackTab,
    Backspace,
}

impl FromStr for InputKey {
    type Err = String;

    /// Parse key names as used in scripts: `down`, `alt-up`, `esc`, `a`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let key = match name.to_ascii_lowercase().as_str() {
            "up" | "arrowup" => InputKey::Up,
            "down" | "arrowdown" => InputKey::Down,
            "alt-up" | "alt+up" | "alt+arrowup" => InputKey::AltUp,
            "enter" | "return" => InputKey::Enter,
            "esc" | "escape" => InputKey::Esc,
            "tab" => InputKey::Tab,
            "backtab" | "shift-tab" | "shift+tab" => InputKey::BackTab,
            "backspace" => InputKey::Backspace,
            "space" => InputKey::Char(' '),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => InputKey::Char(c),
                    _ => return Err(format!("unknown key: {name}")),
                }
            }
        };
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_keys() {
        assert_eq!("down".parse::<InputKey>().unwrap(), InputKey::Down);
        assert_eq!("ArrowUp".parse::<InputKey>().unwrap(), InputKey::Up);
        assert_eq!("alt-up".parse::<InputKey>().unwrap(), InputKey::AltUp);
        assert_eq!("Escape".parse::<InputKey>().unwrap(), InputKey::Esc);
        assert_eq!("space".parse::<InputKey>().unwrap(), InputKey::Char(' '));
    }

    #[test]
    fn test_parse_single_char_keeps_case() {
        assert_eq!("G".parse::<InputKey>().unwrap(), InputKey::Char('G'));
        assert!("ctrl-x".parse::<InputKey>().is_err());
        assert!("".parse::<InputKey>().is_err());
    }
}
