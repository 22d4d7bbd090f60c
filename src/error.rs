use std::fmt;

use crate::label::generator::LabelError;

#[derive(Debug)]
pub enum HintError {
    /// Label space ran out while building the overlay
    Labels(LabelError),

    /// Snapshot or config file could not be read
    Io { path: String, source: std::io::Error },

    /// Snapshot JSON did not match the expected shape
    SnapshotParse { context: String, source: serde_json::Error },

    /// Key script token could not be understood
    KeyParse(String),

    /// Hint configuration is unusable
    InvalidConfig(String),
}

impl fmt::Display for HintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintError::Labels(err) => write!(f, "Cannot label document: {}", err),
            HintError::Io { path, source } => write!(f, "Cannot read '{}': {}", path, source),
            HintError::SnapshotParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            HintError::KeyParse(token) => write!(f, "Unrecognised key '{}'", token),
            HintError::InvalidConfig(msg) => write!(f, "Invalid hint configuration: {}", msg),
        }
    }
}

impl std::error::Error for HintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HintError::Labels(source) => Some(source),
            HintError::Io { source, .. } => Some(source),
            HintError::SnapshotParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<LabelError> for HintError {
    fn from(err: LabelError) -> Self {
        HintError::Labels(err)
    }
}
