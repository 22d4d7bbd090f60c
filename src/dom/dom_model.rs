use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    #[default]
    Block,
    Inline,
    Flex,
    Grid,
    Contents,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComputedStyle {
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub visibility: Visibility,
}

impl ComputedStyle {
    pub fn is_rendered(&self) -> bool {
        self.display != Display::None && self.visibility == Visibility::Visible
    }
}

/// One element of the host document.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub id: NodeId,
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub classes: Vec<String>,
    /// Direct text content only, not the text of descendants.
    pub text: Option<String>,
    pub rect: Option<Rect>,
    pub style: ComputedStyle,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub detached: bool,
}

impl DomNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn has_direct_text(&self) -> bool {
        self.text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Arena of nodes making up one snapshot of the host document.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) nodes: Vec<DomNode>,
    pub root: NodeId,
    pub viewport: Rect,
}

impl Document {
    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DomNode> {
        self.nodes.iter()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &DomNode> {
        self.node(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|c| self.node(*c))
    }

    pub fn parent(&self, id: NodeId) -> Option<&DomNode> {
        self.node(id).and_then(|n| n.parent).and_then(|p| self.node(p))
    }

    /// A node is live while neither it nor any of its ancestors was detached.
    pub fn is_live(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            match self.node(cur) {
                Some(node) if !node.detached => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Whether `id` is `ancestor` or one of its descendants.
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.node(cur).and_then(|n| n.parent);
        }
        false
    }

    /// Removes a subtree from the document, as a host re-render would.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.detached = true;
        }
    }

    /// First live node, in breadth-first order, carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<NodeId> {
        let mut queue = std::collections::VecDeque::from([self.root]);
        while let Some(id) = queue.pop_front() {
            let Some(node) = self.node(id) else { continue };
            if node.detached {
                continue;
            }
            if node.has_class(class) {
                return Some(id);
            }
            queue.extend(node.children.iter().copied());
        }
        None
    }

    /// Stable digest of the document structure and layout.
    pub fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let mut hasher = Sha1::new();
        for node in &self.nodes {
            hasher.update(node.tag.as_bytes());
            hasher.update(node.text.as_deref().unwrap_or("").as_bytes());
            if let Some(rect) = node.rect {
                hasher.update(format!("{}:{}:{}:{}", rect.left, rect.top, rect.width, rect.height));
            }
            hasher.update(format!("{:?}", node.children));
        }
        format!("{:x}", hasher.finalize())
    }
}
