use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::hint::hint_model::SessionState;

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub session: u64,

    pub state: String,
    pub event: String,

    pub label: Option<String>,
    pub key: Option<String>,
    pub node: Option<usize>,

    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(session: u64, state: SessionState, event: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            session,
            state: format!("{:?}", state),
            event: event.to_string(),
            label: None,
            key: None,
            node: None,
            detail: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_node(mut self, node: crate::dom::dom_model::NodeId) -> Self {
        self.node = Some(node.0);
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
