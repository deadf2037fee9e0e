//! Keyboard shortcut literals such as `"Ctrl+Shift+Z"`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a shortcut literal cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortcutError {
    #[error("empty shortcut")]
    Empty,
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("shortcut '{0}' has no key")]
    MissingKey(String),
}

/// Modifier keys held together with the main key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Cmd on macOS, the Windows key elsewhere.
    pub meta: bool,
}

impl Modifiers {
    fn set(&mut self, name: &str) -> Result<(), ShortcutError> {
        match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => self.ctrl = true,
            "shift" => self.shift = true,
            "alt" | "option" => self.alt = true,
            "meta" | "cmd" | "command" | "super" => self.meta = true,
            _ => return Err(ShortcutError::UnknownModifier(name.to_owned())),
        }
        Ok(())
    }
}

/// A key combination.
///
/// Parsing is case-insensitive for modifiers; single-character keys are
/// normalized to upper case, so `"ctrl+z"` and `"Ctrl+Z"` are equal.
///
/// ```
/// use rewind_actions::Shortcut;
///
/// let redo: Shortcut = "ctrl+shift+z".parse().unwrap();
/// assert!(redo.modifiers().shift);
/// assert_eq!(redo.key(), "Z");
/// assert_eq!(redo.to_string(), "Ctrl+Shift+Z");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
    modifiers: Modifiers,
    key: String,
}

impl Shortcut {
    pub fn new(modifiers: Modifiers, key: impl Into<String>) -> Self {
        Self {
            modifiers,
            key: normalize_key(&key.into()),
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_uppercase().collect(),
        _ => key.to_owned(),
    }
}

impl FromStr for Shortcut {
    type Err = ShortcutError;

    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        let literal = literal.trim();
        if literal.is_empty() {
            return Err(ShortcutError::Empty);
        }
        let parts: Vec<&str> = literal.split('+').map(str::trim).collect();
        let Some((key, modifier_names)) = parts.split_last() else {
            return Err(ShortcutError::Empty);
        };
        if key.is_empty() {
            return Err(ShortcutError::MissingKey(literal.to_owned()));
        }

        let mut modifiers = Modifiers::default();
        for name in modifier_names {
            modifiers.set(name)?;
        }
        Ok(Self::new(modifiers, *key))
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Modifiers {
            ctrl,
            shift,
            alt,
            meta,
        } = self.modifiers;
        for (held, name) in [(ctrl, "Ctrl"), (shift, "Shift"), (alt, "Alt"), (meta, "Meta")] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key)
    }
}
