use std::collections::VecDeque;

use crate::dom::classifier::{RuleSet, Verdict, classify_node};
use crate::dom::dom_model::{Document, DomNode, NodeId, Rect};
use crate::hint::hint_model::{
    Candidate, MARKER_CHAR_WIDTH, MARKER_HEIGHT, MARKER_PADDING, Marker, MarkerState, Overlay,
    SessionState,
};
use crate::label::generator::{LabelError, LabelGenerator};
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No bounding rect could be measured.
    LayoutUnavailable,
    NotRendered,
    ZeroArea,
    Offscreen,
    /// Sitting exactly on the coordinate origin, which unrendered nodes report.
    AtOrigin,
}

#[derive(Debug)]
pub struct ScanResult {
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<(NodeId, SkipReason)>,
    pub visited: usize,
}

/// Rect of `node` if it is actually on screen, i.e. inside `area`.
pub fn visible_rect(node: &DomNode, area: &Rect) -> Result<Rect, SkipReason> {
    if !node.style.is_rendered() {
        return Err(SkipReason::NotRendered);
    }

    let rect = node.rect.ok_or(SkipReason::LayoutUnavailable)?;

    if rect.is_empty() {
        return Err(SkipReason::ZeroArea);
    }

    if !rect.intersects(area) {
        return Err(SkipReason::Offscreen);
    }

    if rect.left == 0.0 && rect.top == 0.0 {
        return Err(SkipReason::AtOrigin);
    }

    Ok(rect)
}

/// Places a marker on the centre of `rect`, flipping it left of / above the
/// centre when it would spill over the overlay's right / bottom edge. The
/// marker box never leaves the overlay.
pub fn place_marker(label: &str, rect: &Rect, bounds: &Rect) -> Marker {
    let width = label.chars().count() as f64 * MARKER_CHAR_WIDTH + 2.0 * MARKER_PADDING;
    let height = MARKER_HEIGHT;
    let (cx, cy) = rect.center();

    let mut left = cx - bounds.left;
    if bounds.left + left + width > bounds.right() {
        left -= width;
    }

    let mut top = cy - bounds.top;
    if bounds.top + top + height > bounds.bottom() {
        top -= height;
    }

    Marker {
        label: label.to_string(),
        left: left.min(bounds.width - width).max(0.0),
        top: top.min(bounds.height - height).max(0.0),
        width,
        height,
        state: MarkerState::Default,
    }
}

/// Walks the subtree under `root` breadth-first, labels every included and
/// visible node and adds its marker to `overlay`.
pub fn scan(
    doc: &Document,
    root: NodeId,
    rules: &RuleSet,
    generator: &mut LabelGenerator,
    overlay: &mut Overlay,
    tracer: &TraceLogger,
    session: u64,
) -> Result<ScanResult, LabelError> {
    let mut queue: VecDeque<NodeId> = VecDeque::from([root]);
    let mut candidates = Vec::new();
    let mut skipped = Vec::new();
    let mut visited = 0;

    while let Some(id) = queue.pop_front() {
        let Some(node) = doc.node(id) else { continue };
        if node.detached {
            continue;
        }
        visited += 1;

        queue.extend(node.children.iter().copied());

        if rules.evaluate(doc, node) == Verdict::Exclude {
            continue;
        }

        let rect = match visible_rect(node, &overlay.bounds) {
            Ok(rect) => rect,
            Err(reason) => {
                if reason == SkipReason::LayoutUnavailable {
                    tracer.log(
                        &TraceEvent::now(session, SessionState::Building, "skip_element")
                            .with_node(id)
                            .with_detail(format!("{:?}", reason)),
                    );
                }
                skipped.push((id, reason));
                continue;
            }
        };

        let label = generator.next()?;
        overlay.markers.push(place_marker(&label, &rect, &overlay.bounds));
        candidates.push(Candidate {
            label,
            node: id,
            kind: classify_node(node),
            rect,
        });
    }

    Ok(ScanResult {
        candidates,
        skipped,
        visited,
    })
}
