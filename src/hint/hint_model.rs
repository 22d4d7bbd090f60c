use serde::{Deserialize, Serialize};

use crate::dom::classifier::NodeKind;
use crate::dom::dom_model::{NodeId, Rect};
use crate::error::HintError;
use crate::label::generator::{DEFAULT_ALPHABET, DEFAULT_MAX_TWO_CHAR_LABELS};

pub const MARKER_CHAR_WIDTH: f64 = 8.0;
pub const MARKER_PADDING: f64 = 3.0;
pub const MARKER_HEIGHT: f64 = 16.0;

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintConfig {
    #[serde(default = "default_alphabet")]
    pub alphabet: String,

    /// Two-character labels handed out before switching to three characters.
    #[serde(default = "default_max_two_char_labels")]
    pub max_two_char_labels: usize,

    /// Longest gap between the two presses of the activation chord.
    #[serde(default = "default_combo_window_ms")]
    pub combo_window_ms: u64,

    #[serde(default = "default_alternate_action_key")]
    pub alternate_action_key: String,

    /// Class of the modal container a scan is scoped to when one is open.
    #[serde(default = "default_modal_class")]
    pub modal_class: String,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            alphabet: default_alphabet(),
            max_two_char_labels: default_max_two_char_labels(),
            combo_window_ms: default_combo_window_ms(),
            alternate_action_key: default_alternate_action_key(),
            modal_class: default_modal_class(),
        }
    }
}

fn default_alphabet() -> String { DEFAULT_ALPHABET.to_string() }
fn default_max_two_char_labels() -> usize { DEFAULT_MAX_TWO_CHAR_LABELS }
fn default_combo_window_ms() -> u64 { 1000 }
fn default_alternate_action_key() -> String { "`".to_string() }
fn default_modal_class() -> String { "modal-container".to_string() }

impl HintConfig {
    pub fn validate(&self) -> Result<(), HintError> {
        if self.alphabet.is_empty() {
            return Err(HintError::InvalidConfig("alphabet is empty".into()));
        }

        let mut seen = Vec::new();
        for c in self.alphabet.chars() {
            if !c.is_ascii_alphanumeric() {
                return Err(HintError::InvalidConfig(format!(
                    "alphabet character '{}' is not alphanumeric",
                    c
                )));
            }
            let upper = c.to_ascii_uppercase();
            if seen.contains(&upper) {
                return Err(HintError::InvalidConfig(format!(
                    "alphabet repeats '{}'",
                    upper
                )));
            }
            seen.push(upper);
        }

        if self.max_two_char_labels == 0 {
            return Err(HintError::InvalidConfig(
                "max_two_char_labels must be at least 1".into(),
            ));
        }

        let mut alternate = self.alternate_action_key.chars();
        let (Some(key), None) = (alternate.next(), alternate.next()) else {
            return Err(HintError::InvalidConfig(
                "alternate_action_key must be a single character".into(),
            ));
        };

        if self.in_alphabet(key) {
            return Err(HintError::InvalidConfig(format!(
                "alternate_action_key '{}' is also a label character",
                key
            )));
        }

        Ok(())
    }

    pub fn in_alphabet(&self, c: char) -> bool {
        let upper = c.to_ascii_uppercase();
        self.alphabet
            .chars()
            .any(|a| a.to_ascii_uppercase() == upper)
    }
}

// ============================================================================
// Session state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Building,
    Listening,
    Matched,
    Cancelled,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    Click,
    ContextMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CancelReason {
    Escape,
    OutsideClick,
    StaleTarget,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionOutcome {
    Matched {
        label: String,
        target: NodeId,
        action: ActionKind,
    },
    Cancelled(CancelReason),
}

/// What a keystroke did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Key was swallowed and changed session state.
    Consumed,
    /// Key was swallowed without any effect.
    Ignored,
    Matched(String),
    Cancelled,
    /// The session is already closing; the key is left to the host.
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    PassThrough,
    Cancelled,
    Inactive,
}

// ============================================================================
// Candidates and overlay
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub label: String,
    pub node: NodeId,
    pub kind: NodeKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Default,
    Highlighted,
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: String,
    /// Offset from the overlay's left edge.
    pub left: f64,
    /// Offset from the overlay's top edge.
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub state: MarkerState,
}

impl Marker {
    pub fn is_visible(&self) -> bool {
        self.state != MarkerState::Hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAnchor {
    Viewport,
    /// Hosted inside an open modal; closing the overlay closes the modal.
    Modal(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub anchor: OverlayAnchor,
    pub bounds: Rect,
    pub markers: Vec<Marker>,
    pub input_display: String,
}

impl Overlay {
    pub fn new(anchor: OverlayAnchor, bounds: Rect) -> Self {
        Self {
            anchor,
            bounds,
            markers: Vec::new(),
            input_display: String::new(),
        }
    }

    pub fn marker(&self, label: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.label == label)
    }

    pub fn highlighted(&self) -> Vec<&str> {
        self.markers
            .iter()
            .filter(|m| m.state == MarkerState::Highlighted)
            .map(|m| m.label.as_str())
            .collect()
    }

    pub fn visible(&self) -> Vec<&str> {
        self.markers
            .iter()
            .filter(|m| m.is_visible())
            .map(|m| m.label.as_str())
            .collect()
    }

    pub fn reset_markers(&mut self) {
        for marker in &mut self.markers {
            marker.state = MarkerState::Default;
        }
    }

    /// Highlights markers whose label starts with `prefix`, hides the rest.
    pub fn narrow(&mut self, prefix: &str) {
        for marker in &mut self.markers {
            marker.state = if marker.label.starts_with(prefix) {
                MarkerState::Highlighted
            } else {
                MarkerState::Hidden
            };
        }
    }
}

// ============================================================================
// Synthetic events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticEvent {
    pub kind: ActionKind,
    pub target: NodeId,
    pub client_x: f64,
    pub client_y: f64,
    pub bubbles: bool,
}
