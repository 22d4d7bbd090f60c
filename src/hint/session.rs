use std::collections::HashMap;

use crate::dom::classifier::{NodeKind, RuleSet, classify_node};
use crate::dom::dom_model::{Document, NodeId};
use crate::error::HintError;
use crate::hint::{
    hint_model::{
        ActionKind, CancelReason, Candidate, ClickOutcome, HintConfig, KeyOutcome, Overlay,
        OverlayAnchor, SessionOutcome, SessionState, SyntheticEvent,
    },
    input::{InputBuffer, KeyInput},
    scan::scan,
};
use crate::host::host::{Deferred, HostView, TaskQueue};
use crate::label::generator::LabelGenerator;
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

/// One hint-mode activation, from the scan until the overlay is gone.
#[derive(Debug)]
pub struct HintSession {
    id: u64,
    state: SessionState,
    config: HintConfig,
    generator: LabelGenerator,
    candidates: Vec<Candidate>,
    index: HashMap<String, usize>,
    overlay: Overlay,
    buffer: InputBuffer,
    alternate_armed: bool,
    closing: bool,
    finalized: bool,
    outcome: Option<SessionOutcome>,
}

impl HintSession {
    /// Scans the document (or the modal subtree when `modal` is given), mounts
    /// the overlay and starts listening. On failure no overlay is left behind
    /// and the key capture is released again.
    pub fn build(
        id: u64,
        doc: &Document,
        modal: Option<NodeId>,
        config: &HintConfig,
        rules: &RuleSet,
        host: &mut dyn HostView,
        tracer: &TraceLogger,
    ) -> Result<HintSession, HintError> {
        config.validate()?;

        let (anchor, root, bounds) = match modal {
            Some(modal_id) => {
                let bounds = doc
                    .node(modal_id)
                    .and_then(|n| n.rect)
                    .filter(|r| !r.is_empty())
                    .unwrap_or(doc.viewport);
                (OverlayAnchor::Modal(modal_id), modal_id, bounds)
            }
            None => (OverlayAnchor::Viewport, doc.root, doc.viewport),
        };

        if tracer.is_enabled() {
            tracer.log(
                &TraceEvent::now(id, SessionState::Building, "build_started")
                    .with_node(root)
                    .with_detail(doc.fingerprint()),
            );
        }

        host.install_key_capture();

        let mut generator = LabelGenerator::new(&config.alphabet, config.max_two_char_labels);
        let mut overlay = Overlay::new(anchor, bounds);

        let result = match scan(doc, root, rules, &mut generator, &mut overlay, tracer, id) {
            Ok(result) => result,
            Err(err) => {
                host.remove_key_capture();
                tracer.log(
                    &TraceEvent::now(id, SessionState::Building, "build_failed")
                        .with_detail(&err),
                );
                return Err(err.into());
            }
        };

        let index = result
            .candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (c.label.clone(), i))
            .collect();

        host.mount_overlay(&overlay);

        tracer.log(
            &TraceEvent::now(id, SessionState::Listening, "overlay_mounted").with_detail(format!(
                "{} labels, {} visited, {} skipped",
                result.candidates.len(),
                result.visited,
                result.skipped.len()
            )),
        );

        Ok(HintSession {
            id,
            state: SessionState::Listening,
            config: config.clone(),
            generator,
            candidates: result.candidates,
            index,
            overlay,
            buffer: InputBuffer::new(),
            alternate_armed: false,
            closing: false,
            finalized: false,
            outcome: None,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn lookup(&self, label: &str) -> Option<&Candidate> {
        self.index.get(label).map(|i| &self.candidates[*i])
    }

    pub fn input(&self) -> String {
        self.buffer.as_string()
    }

    pub fn alternate_armed(&self) -> bool {
        self.alternate_armed
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn handle_key(
        &mut self,
        doc: &Document,
        key: &KeyInput,
        host: &mut dyn HostView,
        tasks: &mut TaskQueue,
        tracer: &TraceLogger,
    ) -> KeyOutcome {
        if self.closing {
            return KeyOutcome::Inactive;
        }

        if key.is_escape() {
            self.request_close(SessionOutcome::Cancelled(CancelReason::Escape), tasks, tracer);
            return KeyOutcome::Cancelled;
        }

        if key.has_modifier() {
            return KeyOutcome::Ignored;
        }

        if key.key == self.config.alternate_action_key {
            self.alternate_armed = true;
            tracer.log(&TraceEvent::now(self.id, self.state, "alternate_armed").with_key(&key.key));
            return KeyOutcome::Consumed;
        }

        if key.is_erase() {
            return self.erase(host);
        }

        let Some(c) = key.as_char().filter(|c| self.config.in_alphabet(*c)) else {
            return KeyOutcome::Ignored;
        };

        let upper = c.to_ascii_uppercase();
        let cap = match self.buffer.first() {
            Some(first) if self.generator.is_three_char_head(first) => 3,
            _ => 2,
        };
        self.buffer.push(upper, cap);

        let typed = self.buffer.as_string();
        self.overlay.input_display = typed.clone();
        self.overlay.narrow(&typed);
        host.refresh_overlay(&self.overlay);

        tracer.log(&TraceEvent::now(self.id, self.state, "key").with_key(&typed));

        match self.index.get(&typed).copied() {
            Some(i) => self.activate(i, doc, host, tasks, tracer),
            None => KeyOutcome::Consumed,
        }
    }

    fn erase(&mut self, host: &mut dyn HostView) -> KeyOutcome {
        if self.buffer.is_empty() && !self.alternate_armed {
            return KeyOutcome::Ignored;
        }

        self.buffer.pop();
        self.alternate_armed = false;
        self.overlay.input_display = self.buffer.as_string();
        self.overlay.reset_markers();
        host.refresh_overlay(&self.overlay);
        KeyOutcome::Consumed
    }

    fn activate(
        &mut self,
        index: usize,
        doc: &Document,
        host: &mut dyn HostView,
        tasks: &mut TaskQueue,
        tracer: &TraceLogger,
    ) -> KeyOutcome {
        let candidate = self.candidates[index].clone();
        let target = action_target(doc, &candidate);

        if !doc.is_live(target) {
            tracer.log(
                &TraceEvent::now(self.id, self.state, "stale_target")
                    .with_label(&candidate.label)
                    .with_node(target),
            );
            self.request_close(
                SessionOutcome::Cancelled(CancelReason::StaleTarget),
                tasks,
                tracer,
            );
            return KeyOutcome::Cancelled;
        }

        let action = if self.alternate_armed {
            ActionKind::ContextMenu
        } else {
            ActionKind::Click
        };

        let (client_x, client_y) = doc
            .node(target)
            .and_then(|n| n.rect)
            .filter(|r| !r.is_empty())
            .unwrap_or(candidate.rect)
            .center();

        self.state = SessionState::Matched;
        host.dispatch(&SyntheticEvent {
            kind: action,
            target,
            client_x,
            client_y,
            bubbles: true,
        });

        self.request_close(
            SessionOutcome::Matched {
                label: candidate.label.clone(),
                target,
                action,
            },
            tasks,
            tracer,
        );

        let wants_focus = doc
            .node(target)
            .map(|n| classify_node(n) == NodeKind::TextInput)
            .unwrap_or(false);
        if wants_focus {
            tasks.schedule(Deferred::Focus(target));
        }

        KeyOutcome::Matched(candidate.label)
    }

    /// A click outside every hinted element ends the session.
    pub fn handle_click(
        &mut self,
        doc: &Document,
        target: NodeId,
        tasks: &mut TaskQueue,
        tracer: &TraceLogger,
    ) -> ClickOutcome {
        if self.closing {
            return ClickOutcome::Inactive;
        }

        if self.candidates.iter().any(|c| doc.is_within(target, c.node)) {
            return ClickOutcome::PassThrough;
        }

        self.request_close(
            SessionOutcome::Cancelled(CancelReason::OutsideClick),
            tasks,
            tracer,
        );
        ClickOutcome::Cancelled
    }

    /// First half of closing: records the outcome and schedules the teardown.
    /// Returns false when the session was already closing.
    pub fn request_close(
        &mut self,
        outcome: SessionOutcome,
        tasks: &mut TaskQueue,
        tracer: &TraceLogger,
    ) -> bool {
        if self.closing {
            return false;
        }

        self.closing = true;
        self.state = match outcome {
            SessionOutcome::Matched { .. } => SessionState::Matched,
            SessionOutcome::Cancelled(_) => SessionState::Cancelled,
        };
        self.buffer.clear();
        self.alternate_armed = false;

        tracer.log(
            &TraceEvent::now(self.id, self.state, "close_requested")
                .with_detail(format!("{:?}", outcome)),
        );

        self.outcome = Some(outcome);
        tasks.schedule(Deferred::FinalizeClose);
        true
    }

    /// Second half of closing: removes the overlay and the key capture.
    /// Yields the outcome exactly once; later calls return `None`.
    pub fn finalize_close(
        &mut self,
        host: &mut dyn HostView,
        tracer: &TraceLogger,
    ) -> Option<SessionOutcome> {
        if self.finalized {
            return None;
        }

        if !self.closing {
            self.closing = true;
            self.outcome = Some(SessionOutcome::Cancelled(CancelReason::Shutdown));
        }

        host.unmount_overlay(&self.overlay);
        host.remove_key_capture();

        self.overlay.markers.clear();
        self.overlay.input_display.clear();
        self.buffer.clear();
        self.finalized = true;
        self.state = SessionState::Closed;

        tracer.log(&TraceEvent::now(self.id, self.state, "closed"));

        self.outcome.clone()
    }
}

/// Element that receives the synthesized action. Graphical leaves hand the
/// action to their parent.
pub fn action_target(doc: &Document, candidate: &Candidate) -> NodeId {
    if candidate.kind != NodeKind::Graphical {
        return candidate.node;
    }

    doc.parent(candidate.node)
        .map(|p| p.id)
        .unwrap_or(candidate.node)
}
