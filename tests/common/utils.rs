use std::cell::RefCell;
use std::rc::Rc;

use hint_mode::{
    dom::{
        dom_model::{Document, NodeId, Rect},
        snapshot::{DocumentSnapshot, SnapshotNode, load_snapshot},
    },
    hint::hint_model::{HintConfig, SessionOutcome},
};

pub fn fixture(name: &str) -> Document {
    let base = std::env::current_dir().unwrap();
    let path = base.join("tests").join("fixtures").join(name);

    load_snapshot(path.to_str().unwrap()).unwrap()
}

pub fn viewport() -> Rect {
    Rect::new(0.0, 0.0, 800.0, 600.0)
}

/// `html > body > children`, laid out over an 800x600 viewport.
pub fn page(children: Vec<SnapshotNode>) -> Document {
    let body = children.into_iter().fold(
        SnapshotNode::new("body").with_rect(viewport()),
        |body, child| body.with_child(child),
    );
    let html = SnapshotNode::new("html").with_rect(viewport()).with_child(body);

    Document::from_snapshot(DocumentSnapshot {
        viewport: viewport(),
        root: html,
    })
}

pub fn button(text: &str, left: f64, top: f64) -> SnapshotNode {
    SnapshotNode::new("button")
        .with_text(text)
        .with_rect(Rect::new(left, top, 80.0, 24.0))
}

/// A row of `count` buttons, 90px apart.
pub fn buttons(count: usize) -> Vec<SnapshotNode> {
    (0..count)
        .map(|i| button(&format!("Button {}", i), 10.0 + 90.0 * (i % 8) as f64, 10.0 + 30.0 * (i / 8) as f64))
        .collect()
}

pub fn config(alphabet: &str, max_two_char_labels: usize) -> HintConfig {
    HintConfig {
        alphabet: alphabet.to_string(),
        max_two_char_labels,
        ..HintConfig::default()
    }
}

pub fn first_with_text(doc: &Document, text: &str) -> NodeId {
    doc.nodes()
        .find(|n| n.text.as_deref() == Some(text))
        .map(|n| n.id)
        .unwrap()
}

pub fn first_with_tag(doc: &Document, tag: &str) -> NodeId {
    doc.nodes().find(|n| n.tag == tag).map(|n| n.id).unwrap()
}

/// Completion callback that records every outcome it receives.
pub fn outcome_recorder() -> (
    Rc<RefCell<Vec<SessionOutcome>>>,
    impl FnMut(&SessionOutcome) + 'static,
) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |outcome: &SessionOutcome| {
        sink.borrow_mut().push(outcome.clone())
    })
}
