use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::dom::dom_model::{ComputedStyle, Document, DomNode, NodeId, Rect};
use crate::error::HintError;

/// Serialized form of a host document, as captured by the host's DOM walker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub viewport: Rect,
    pub root: SnapshotNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub style: ComputedStyle,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            text: None,
            rect: None,
            style: ComputedStyle::default(),
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_child(mut self, child: SnapshotNode) -> Self {
        self.children.push(child);
        self
    }
}

impl Document {
    /// Flattens a nested snapshot into the node arena. Node ids follow
    /// breadth-first order, children keep their document order.
    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Document {
        let mut nodes: Vec<DomNode> = Vec::new();
        let mut queue: VecDeque<(SnapshotNode, Option<NodeId>)> =
            VecDeque::from([(snapshot.root, None)]);

        while let Some((snap, parent)) = queue.pop_front() {
            let id = NodeId(nodes.len());

            if let Some(parent_id) = parent {
                nodes[parent_id.0].children.push(id);
            }

            nodes.push(DomNode {
                id,
                tag: snap.tag.to_lowercase(),
                attrs: snap.attrs,
                classes: snap.classes,
                text: snap.text,
                rect: snap.rect,
                style: snap.style,
                parent,
                children: Vec::new(),
                detached: false,
            });

            for child in snap.children {
                queue.push_back((child, Some(id)));
            }
        }

        Document {
            nodes,
            root: NodeId(0),
            viewport: snapshot.viewport,
        }
    }
}

pub fn parse_snapshot(json: &str) -> Result<Document, HintError> {
    let snapshot: DocumentSnapshot =
        serde_json::from_str(json).map_err(|source| HintError::SnapshotParse {
            context: "document snapshot".into(),
            source,
        })?;

    Ok(Document::from_snapshot(snapshot))
}

pub fn load_snapshot(path: &str) -> Result<Document, HintError> {
    let json = std::fs::read_to_string(path).map_err(|source| HintError::Io {
        path: path.to_string(),
        source,
    })?;

    parse_snapshot(&json)
}
