use crate::dom::classifier::RuleSet;
use crate::dom::dom_model::{Document, NodeId};
use crate::error::HintError;
use crate::hint::{
    hint_model::{CancelReason, ClickOutcome, HintConfig, KeyOutcome, SessionOutcome},
    input::KeyInput,
    session::HintSession,
};
use crate::host::host::{Deferred, HostView, TaskQueue};
use crate::trace::logger::TraceLogger;

/// Key pressed twice, with Ctrl/Cmd held, to enter hint mode.
pub const CHORD_KEY: &str = "g";

/// Detects two chord presses within the combo window. Fires once per burst of
/// presses; a gap longer than the window re-arms it.
#[derive(Debug, Clone)]
pub struct ChordDetector {
    window_ms: u64,
    last_press: Option<u64>,
    fired: bool,
}

impl ChordDetector {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_press: None,
            fired: false,
        }
    }

    pub fn press(&mut self, now_ms: u64) -> bool {
        let within = self
            .last_press
            .map(|t| now_ms.saturating_sub(t) <= self.window_ms)
            .unwrap_or(false);
        self.last_press = Some(now_ms);

        if !within {
            self.fired = false;
            return false;
        }

        if self.fired {
            return false;
        }

        self.fired = true;
        true
    }
}

pub type CompletionCallback = Box<dyn FnMut(&SessionOutcome)>;

/// Host-facing entry point. Owns at most one live session per host view.
pub struct HintMode {
    config: HintConfig,
    rules: RuleSet,
    session: Option<HintSession>,
    tasks: TaskQueue,
    chord: ChordDetector,
    tracer: TraceLogger,
    next_id: u64,
    on_complete: Option<CompletionCallback>,
}

impl HintMode {
    pub fn new(config: HintConfig, tracer: TraceLogger) -> Self {
        let chord = ChordDetector::new(config.combo_window_ms);
        Self {
            config,
            rules: RuleSet::default(),
            session: None,
            tasks: TaskQueue::new(),
            chord,
            tracer,
            next_id: 1,
            on_complete: None,
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Called exactly once per session, after its overlay is gone.
    pub fn on_complete(mut self, callback: impl FnMut(&SessionOutcome) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&HintSession> {
        self.session.as_ref()
    }

    pub fn pending_tasks(&self) -> Vec<Deferred> {
        self.tasks.pending()
    }

    /// Starts a session. Returns `Ok(false)` without doing anything while a
    /// session is already live.
    pub fn activate(
        &mut self,
        doc: &Document,
        host: &mut dyn HostView,
    ) -> Result<bool, HintError> {
        if self.session.is_some() {
            return Ok(false);
        }

        let modal = doc.find_by_class(&self.config.modal_class);
        let id = self.next_id;
        self.next_id += 1;

        let session = HintSession::build(
            id,
            doc,
            modal,
            &self.config,
            &self.rules,
            host,
            &self.tracer,
        )?;
        self.session = Some(session);
        Ok(true)
    }

    pub fn on_keydown(
        &mut self,
        doc: &Document,
        key: &KeyInput,
        host: &mut dyn HostView,
        now_ms: u64,
    ) -> Result<KeyOutcome, HintError> {
        if let Some(session) = self.session.as_mut() {
            return Ok(session.handle_key(doc, key, host, &mut self.tasks, &self.tracer));
        }

        let is_chord = key.is_mod() && !key.alt && key.key.eq_ignore_ascii_case(CHORD_KEY);
        if is_chord && self.chord.press(now_ms) && self.activate(doc, host)? {
            return Ok(KeyOutcome::Consumed);
        }

        Ok(KeyOutcome::Inactive)
    }

    pub fn on_click(&mut self, doc: &Document, target: NodeId) -> ClickOutcome {
        match self.session.as_mut() {
            Some(session) => session.handle_click(doc, target, &mut self.tasks, &self.tracer),
            None => ClickOutcome::Inactive,
        }
    }

    /// Runs the work deferred to the next turn. Returns the outcome of the
    /// session that finished during this drain, if any.
    pub fn run_deferred(&mut self, host: &mut dyn HostView) -> Option<SessionOutcome> {
        let mut finished = None;

        while let Some(task) = self.tasks.pop() {
            match task {
                Deferred::FinalizeClose => {
                    if let Some(outcome) = self.finalize(host) {
                        finished = Some(outcome);
                    }
                }
                Deferred::Focus(node) => host.focus(node),
            }
        }

        finished
    }

    /// Forcibly closes a live session, e.g. when the feature is disabled.
    pub fn shutdown(&mut self, host: &mut dyn HostView) -> Option<SessionOutcome> {
        if let Some(session) = self.session.as_mut() {
            session.request_close(
                SessionOutcome::Cancelled(CancelReason::Shutdown),
                &mut self.tasks,
                &self.tracer,
            );
        }

        let outcome = self.finalize(host);
        self.tasks = TaskQueue::new();
        outcome
    }

    fn finalize(&mut self, host: &mut dyn HostView) -> Option<SessionOutcome> {
        let outcome = self.session.as_mut()?.finalize_close(host, &self.tracer)?;
        self.session = None;

        if let Some(callback) = self.on_complete.as_mut() {
            callback(&outcome);
        }

        Some(outcome)
    }
}
