use serde::{Deserialize, Serialize};

use crate::error::HintError;

/// A keydown as delivered by the host's global capturing listener.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn has_modifier(&self) -> bool {
        self.ctrl || self.meta || self.alt || self.shift
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn is_mod(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn is_escape(&self) -> bool {
        self.key == "Escape" || self.key == "Esc"
    }

    pub fn is_erase(&self) -> bool {
        self.key == "Backspace" || self.key == "Delete"
    }

    /// The key as a single character, when it is one.
    pub fn as_char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// Parses script notation such as `a`, `Escape` or `Ctrl+Shift+g`.
    pub fn parse(token: &str) -> Result<Self, HintError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(HintError::KeyParse(token.to_string()));
        }

        // A bare "+" is a key, not a separator.
        if token == "+" {
            return Ok(Self::new("+"));
        }

        let mut parts: Vec<&str> = token.split('+').collect();
        let key = parts.pop().unwrap_or_default();
        if key.is_empty() {
            return Err(HintError::KeyParse(token.to_string()));
        }

        let mut input = Self::new(key);
        for modifier in parts {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => input.ctrl = true,
                "cmd" | "meta" => input.meta = true,
                "mod" => {
                    if cfg!(target_os = "macos") {
                        input.meta = true
                    } else {
                        input.ctrl = true
                    }
                }
                "alt" | "option" => input.alt = true,
                "shift" => input.shift = true,
                _ => return Err(HintError::KeyParse(token.to_string())),
            }
        }

        Ok(input)
    }
}

/// Comma-separated key script, e.g. `"A,S,Backspace,Escape"`.
pub fn parse_key_script(script: &str) -> Result<Vec<KeyInput>, HintError> {
    script
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(KeyInput::parse)
        .collect()
}

/// Typed prefix. Holds at most `cap` characters; pushing at capacity drops the
/// oldest character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    chars: Vec<char>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char, cap: usize) {
        while !self.chars.is_empty() && self.chars.len() >= cap {
            self.chars.remove(0);
        }
        self.chars.push(c);
    }

    pub fn pop(&mut self) -> Option<char> {
        self.chars.pop()
    }

    pub fn first(&self) -> Option<char> {
        self.chars.first().copied()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}
