use serde::Serialize;

use crate::{
    dom::dom_model::{Document, NodeId},
    error::HintError,
    hint::{
        hint_model::{Candidate, HintConfig, SessionOutcome},
        input::KeyInput,
        shell::HintMode,
    },
    host::recording::{HostCall, RecordingHost},
    trace::logger::TraceLogger,
};

pub mod cli;
pub mod dom;
pub mod error;
pub mod hint;
pub mod host;
pub mod label;
pub mod trace;

/// One host event in a scripted replay.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayStep {
    Key(KeyInput),
    /// Click on a node; the document root when `None`.
    Click(Option<NodeId>),
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub labels: Vec<(String, NodeId)>,
    pub outcome: Option<SessionOutcome>,
    pub calls: Vec<HostCall>,
}

/// Parses `"A,S,Backspace,Click,Click#4,Escape"` into replay steps.
pub fn parse_replay_script(script: &str) -> Result<Vec<ReplayStep>, HintError> {
    script
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|token| {
            if token.eq_ignore_ascii_case("click") {
                return Ok(ReplayStep::Click(None));
            }
            if let Some(id) = token.strip_prefix("Click#").or_else(|| token.strip_prefix("click#")) {
                let id = id
                    .parse::<usize>()
                    .map_err(|_| HintError::KeyParse(token.to_string()))?;
                return Ok(ReplayStep::Click(Some(NodeId(id))));
            }
            KeyInput::parse(token).map(ReplayStep::Key)
        })
        .collect()
}

/// Labels a session would assign to `doc`, without leaving anything mounted.
pub fn preview_labels(doc: &Document, config: &HintConfig) -> Result<Vec<Candidate>, HintError> {
    let mut host = RecordingHost::new();
    let mut mode = HintMode::new(config.clone(), TraceLogger::disabled());

    mode.activate(doc, &mut host)?;
    let candidates = mode
        .session()
        .map(|s| s.candidates().to_vec())
        .unwrap_or_default();
    mode.shutdown(&mut host);

    Ok(candidates)
}

/// Activates hint mode on `doc` and feeds it `steps`, draining deferred work
/// after every step the way a host event loop would.
pub fn replay(
    doc: &Document,
    config: &HintConfig,
    steps: &[ReplayStep],
    tracer: TraceLogger,
) -> Result<ReplayReport, HintError> {
    let mut host = RecordingHost::new();
    let mut mode = HintMode::new(config.clone(), tracer);

    mode.activate(doc, &mut host)?;
    let labels = mode
        .session()
        .map(|s| {
            s.candidates()
                .iter()
                .map(|c| (c.label.clone(), c.node))
                .collect()
        })
        .unwrap_or_default();

    let mut outcome = None;
    for step in steps {
        match step {
            ReplayStep::Key(key) => {
                mode.on_keydown(doc, key, &mut host, 0)?;
            }
            ReplayStep::Click(target) => {
                mode.on_click(doc, target.unwrap_or(doc.root));
            }
        }

        if let Some(finished) = mode.run_deferred(&mut host) {
            outcome = Some(finished);
        }

        if !mode.is_active() {
            break;
        }
    }

    Ok(ReplayReport {
        labels,
        outcome,
        calls: host.calls,
    })
}
