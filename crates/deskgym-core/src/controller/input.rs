use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Tab,
    Enter,
    Escape,
    Space,
    Up,
    Down,
    Left,
    Right,
    Y,
    N,
    W,
    S,
}

impl Key {
    fn bit(self) -> u16 {
        1 << self as u16
    }
}

impl FromStr for Key {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tab" => Ok(Key::Tab),
            "enter" | "return" => Ok(Key::Enter),
            "esc" | "escape" => Ok(Key::Escape),
            "space" => Ok(Key::Space),
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "y" => Ok(Key::Y),
            "n" => Ok(Key::N),
            "w" => Ok(Key::W),
            "s" => Ok(Key::S),
            other => Err(ValidationError::InvalidValue {
                field: "key".to_string(),
                message: format!("unknown key: {other}"),
            }),
        }
    }
}

/// Keys pressed during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keys(u16);

impl Keys {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn press(mut self, key: Key) -> Self {
        self.0 |= key.bit();
        self
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl From<Key> for Keys {
    fn from(key: Key) -> Self {
        Keys::none().press(key)
    }
}

impl FromIterator<Key> for Keys {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        iter.into_iter().fold(Keys::none(), Keys::press)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_set() {
        let keys: Keys = [Key::Y, Key::Escape].into_iter().collect();
        assert!(keys.is_pressed(Key::Y));
        assert!(keys.is_pressed(Key::Escape));
        assert!(!keys.is_pressed(Key::N));
        assert!(Keys::none().is_empty());
    }

    #[test]
    fn parses_key_names() {
        assert_eq!("Esc".parse::<Key>().unwrap(), Key::Escape);
        assert_eq!("enter".parse::<Key>().unwrap(), Key::Enter);
        assert!("f1".parse::<Key>().is_err());
    }
}
