use crate::dom::dom_model::{Document, DomNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Vector graphics: `svg` and its drawing children.
    Graphical,
    TextInput,
    Checkbox,
    Dropdown,
    /// Compound interactive element such as a button, link or clickable icon.
    Container,
    Generic,
}

impl NodeKind {
    pub fn is_form_control(&self) -> bool {
        matches!(
            self,
            NodeKind::TextInput | NodeKind::Checkbox | NodeKind::Dropdown
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Include,
    Exclude,
}

/// A single inclusion rule. `None` defers to the next rule.
pub type Rule = fn(&Document, &DomNode) -> Option<Verdict>;

pub fn classify_node(node: &DomNode) -> NodeKind {
    if is_graphical(node) {
        return NodeKind::Graphical;
    }

    match node.tag.as_str() {
        "textarea" => return NodeKind::TextInput,
        "select" => return NodeKind::Dropdown,
        "input" => return classify_input(node),
        _ => {}
    }

    if node.attr("contenteditable") == Some("true") {
        return NodeKind::TextInput;
    }

    if is_container(node) {
        return NodeKind::Container;
    }

    NodeKind::Generic
}

fn classify_input(node: &DomNode) -> NodeKind {
    match node.attr("type") {
        // Textual inputs
        None
        | Some("text")
        | Some("email")
        | Some("password")
        | Some("search")
        | Some("number")
        | Some("tel")
        | Some("url")
        | Some("date")
        | Some("time")
        | Some("month")
        | Some("week") => NodeKind::TextInput,

        // Choice inputs
        Some("checkbox") | Some("radio") => NodeKind::Checkbox,

        // Buttons in input clothing
        Some("submit") | Some("button") | Some("reset") | Some("image") | Some("file") => {
            NodeKind::Container
        }

        _ => NodeKind::Generic,
    }
}

fn is_graphical(node: &DomNode) -> bool {
    matches!(
        node.tag.as_str(),
        "svg" | "path" | "g" | "use" | "circle" | "rect" | "line" | "polyline" | "polygon"
            | "ellipse"
    )
}

fn is_container(node: &DomNode) -> bool {
    if matches!(node.tag.as_str(), "button" | "a" | "summary") {
        return true;
    }

    if matches!(
        node.attr("role"),
        Some("button" | "link" | "menuitem" | "tab" | "option" | "treeitem" | "checkbox")
    ) {
        return true;
    }

    node.attrs.contains_key("onclick")
        || node.attrs.contains_key("tabindex")
        || node.has_class("clickable-icon")
}

/// Structural, decorative and placeholder nodes never get a label.
pub fn rule_exclude_decorative(_doc: &Document, node: &DomNode) -> Option<Verdict> {
    if matches!(
        node.tag.as_str(),
        "html"
            | "head"
            | "body"
            | "script"
            | "style"
            | "meta"
            | "link"
            | "title"
            | "noscript"
            | "template"
            | "br"
            | "hr"
    ) {
        return Some(Verdict::Exclude);
    }

    if node.attr("aria-hidden") == Some("true") {
        return Some(Verdict::Exclude);
    }

    if node.classes.iter().any(|c| c.contains("placeholder")) {
        return Some(Verdict::Exclude);
    }

    None
}

pub fn rule_form_control(_doc: &Document, node: &DomNode) -> Option<Verdict> {
    classify_node(node)
        .is_form_control()
        .then_some(Verdict::Include)
}

pub fn rule_graphical_child(doc: &Document, node: &DomNode) -> Option<Verdict> {
    doc.children(node.id)
        .any(|child| classify_node(child) == NodeKind::Graphical)
        .then_some(Verdict::Include)
}

pub fn rule_container_child(doc: &Document, node: &DomNode) -> Option<Verdict> {
    doc.children(node.id)
        .any(|child| classify_node(child) == NodeKind::Container)
        .then_some(Verdict::Include)
}

fn default_verdict(node: &DomNode) -> Verdict {
    if node.has_direct_text() {
        Verdict::Include
    } else {
        Verdict::Exclude
    }
}

/// Ordered inclusion rules. The first rule returning a verdict wins; nodes no
/// rule decides on are included when they carry direct text.
#[derive(Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Puts `rule` in front of every rule already in the set.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.insert(0, rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn evaluate(&self, doc: &Document, node: &DomNode) -> Verdict {
        self.rules
            .iter()
            .find_map(|rule| rule(doc, node))
            .unwrap_or_else(|| default_verdict(node))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: vec![
                rule_exclude_decorative,
                rule_form_control,
                rule_graphical_child,
                rule_container_child,
            ],
        }
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rules.len())
            .finish()
    }
}
