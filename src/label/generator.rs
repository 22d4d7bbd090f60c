use std::collections::HashSet;
use std::fmt;

pub const DEFAULT_ALPHABET: &str = "ASDFGQWERTZXCVB";
pub const DEFAULT_MAX_TWO_CHAR_LABELS: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// The two-character product ran out before the configured budget was issued.
    TwoCharSpaceExhausted { issued: usize },

    /// Every two- and three-character label this generator may hand out is taken.
    LabelSpaceExhausted { issued: usize },
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelError::TwoCharSpaceExhausted { issued } => {
                write!(f, "two-character label space exhausted after {} labels", issued)
            }
            LabelError::LabelSpaceExhausted { issued } => {
                write!(f, "label space exhausted after {} labels", issued)
            }
        }
    }
}

impl std::error::Error for LabelError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPhase {
    TwoChar,
    ThreeChar,
}

/// Hands out unique labels for one hint session.
///
/// Two-character labels come first, scanned first-character-major. Once the
/// two-character budget is spent, three-character labels start with a
/// character that never led a two-character label, so the first keystroke
/// tells the matcher which label length it is looking at.
#[derive(Debug, Clone)]
pub struct LabelGenerator {
    alphabet: Vec<char>,
    max_two_char: usize,
    issued: HashSet<String>,
    two_char_issued: usize,
    two_char_cursor: usize,
    three_char_cursor: usize,
    used_heads: Vec<char>,
    three_char_heads: Option<Vec<char>>,
}

impl LabelGenerator {
    pub fn new(alphabet: &str, max_two_char: usize) -> Self {
        let mut chars: Vec<char> = Vec::new();
        for c in alphabet.chars().map(|c| c.to_ascii_uppercase()) {
            if !chars.contains(&c) {
                chars.push(c);
            }
        }

        Self {
            alphabet: chars,
            max_two_char,
            issued: HashSet::new(),
            two_char_issued: 0,
            two_char_cursor: 0,
            three_char_cursor: 0,
            used_heads: Vec::new(),
            three_char_heads: None,
        }
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    pub fn phase(&self) -> LabelPhase {
        if self.three_char_heads.is_some() {
            LabelPhase::ThreeChar
        } else {
            LabelPhase::TwoChar
        }
    }

    /// Whether `c` leads the three-character label space.
    pub fn is_three_char_head(&self, c: char) -> bool {
        self.three_char_heads
            .as_ref()
            .map(|heads| heads.contains(&c.to_ascii_uppercase()))
            .unwrap_or(false)
    }

    pub fn three_char_heads(&self) -> &[char] {
        self.three_char_heads.as_deref().unwrap_or(&[])
    }

    pub fn next(&mut self) -> Result<String, LabelError> {
        if self.two_char_issued < self.max_two_char {
            return self.next_two_char();
        }

        self.next_three_char()
    }

    fn next_two_char(&mut self) -> Result<String, LabelError> {
        let size = self.alphabet.len();

        loop {
            if self.two_char_cursor >= size * size {
                return Err(LabelError::TwoCharSpaceExhausted {
                    issued: self.issued.len(),
                });
            }

            let first = self.alphabet[self.two_char_cursor / size];
            let second = self.alphabet[self.two_char_cursor % size];
            self.two_char_cursor += 1;

            let label: String = [first, second].iter().collect();
            if !self.issued.insert(label.clone()) {
                continue;
            }

            if !self.used_heads.contains(&first) {
                self.used_heads.push(first);
            }
            self.two_char_issued += 1;
            return Ok(label);
        }
    }

    fn next_three_char(&mut self) -> Result<String, LabelError> {
        if self.three_char_heads.is_none() {
            let heads = self
                .alphabet
                .iter()
                .copied()
                .filter(|c| !self.used_heads.contains(c))
                .collect();
            self.three_char_heads = Some(heads);
        }

        let size = self.alphabet.len();
        let heads = self.three_char_heads.as_deref().unwrap_or(&[]);
        let space = heads.len() * size * size;

        loop {
            if self.three_char_cursor >= space {
                return Err(LabelError::LabelSpaceExhausted {
                    issued: self.issued.len(),
                });
            }

            let cursor = self.three_char_cursor;
            self.three_char_cursor += 1;

            let head = heads[cursor / (size * size)];
            let rest = cursor % (size * size);
            let label: String = [head, self.alphabet[rest / size], self.alphabet[rest % size]]
                .iter()
                .collect();

            if self.issued.insert(label.clone()) {
                return Ok(label);
            }
        }
    }
}

impl Default for LabelGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET, DEFAULT_MAX_TWO_CHAR_LABELS)
    }
}

