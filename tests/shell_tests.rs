use hint_mode::{
    ReplayStep,
    dom::{
        classifier::{RuleSet, Verdict},
        dom_model::{Document, DomNode, NodeId, Rect},
        snapshot::SnapshotNode,
    },
    hint::{
        hint_model::{
            ActionKind, CancelReason, ClickOutcome, HintConfig, KeyOutcome, OverlayAnchor,
            SessionOutcome,
        },
        input::KeyInput,
        shell::{ChordDetector, HintMode},
    },
    host::{
        host::Deferred,
        recording::{HostCall, RecordingHost},
    },
    parse_replay_script, replay,
    trace::logger::TraceLogger,
};

use crate::common::utils::{
    button, buttons, config, first_with_tag, first_with_text, fixture, outcome_recorder, page,
};

mod common;

fn mode() -> HintMode {
    HintMode::new(HintConfig::default(), TraceLogger::disabled())
}

// =========================================================================
// Activation
// =========================================================================

#[test]
fn second_activation_is_refused_while_live() {
    let doc = page(buttons(3));
    let mut host = RecordingHost::new();
    let mut mode = mode();

    assert!(mode.activate(&doc, &mut host).unwrap());
    assert!(mode.is_active());
    assert!(!mode.activate(&doc, &mut host).unwrap());

    assert_eq!(host.count(|c| matches!(c, HostCall::MountOverlay { .. })), 1);
}

#[test]
fn session_slot_is_released_after_completion() {
    let doc = page(buttons(3));
    let mut host = RecordingHost::new();
    let (seen, callback) = outcome_recorder();
    let mut mode = mode().on_complete(callback);

    mode.activate(&doc, &mut host).unwrap();
    mode.on_keydown(&doc, &KeyInput::new("Escape"), &mut host, 0).unwrap();

    // Still owned until the deferred teardown runs.
    assert!(mode.is_active());
    assert_eq!(mode.pending_tasks(), vec![Deferred::FinalizeClose]);

    let outcome = mode.run_deferred(&mut host);
    assert_eq!(outcome, Some(SessionOutcome::Cancelled(CancelReason::Escape)));
    assert!(!mode.is_active());
    assert_eq!(seen.borrow().len(), 1);

    // A fresh session can start again.
    assert!(mode.activate(&doc, &mut host).unwrap());
    assert_eq!(mode.session().unwrap().id(), 2);
}

#[test]
fn failed_build_leaves_shell_idle() {
    let doc = page(buttons(6));
    let mut host = RecordingHost::new();
    let mut mode = HintMode::new(config("AB", 1), TraceLogger::disabled());

    assert!(mode.activate(&doc, &mut host).is_err());
    assert!(!mode.is_active());
    assert!(!host.key_capture);
    assert!(host.overlay.is_none());
}

#[test]
fn open_modal_scopes_the_scan() {
    let doc = fixture("modal.json");
    let mut host = RecordingHost::new();
    let mut mode = mode();

    mode.activate(&doc, &mut host).unwrap();
    let session = mode.session().unwrap();
    let modal = doc.find_by_class("modal-container").unwrap();

    assert_eq!(session.overlay().anchor, OverlayAnchor::Modal(modal));
    assert_eq!(session.overlay().bounds, doc.node(modal).unwrap().rect.unwrap());

    let behind = first_with_text(&doc, "Behind the modal");
    assert!(session.candidates().iter().all(|c| c.node != behind));
    assert_eq!(session.lookup("AS").unwrap().node, first_with_text(&doc, "Confirm"));
    assert_eq!(session.lookup("AD").unwrap().node, first_with_text(&doc, "Cancel"));

    mode.on_keydown(&doc, &KeyInput::new("Escape"), &mut host, 0).unwrap();
    mode.run_deferred(&mut host);
    assert_eq!(
        host.calls.iter().find(|c| matches!(c, HostCall::UnmountOverlay { .. })),
        Some(&HostCall::UnmountOverlay { closed_modal: true })
    );
}

#[test]
fn modal_scope_skips_elements_outside_the_modal() {
    let doc = page(vec![
        SnapshotNode::new("div")
            .with_class("modal-container")
            .with_rect(Rect::new(100.0, 100.0, 200.0, 200.0))
            .with_child(button("Inside", 120.0, 150.0))
            .with_child(button("Corner", 260.0, 280.0))
            .with_child(button("Below", 120.0, 350.0)),
    ]);
    let mut host = RecordingHost::new();
    let mut mode = mode();

    mode.activate(&doc, &mut host).unwrap();
    let session = mode.session().unwrap();
    let overlay = session.overlay();

    let below = first_with_text(&doc, "Below");
    assert!(session.candidates().iter().all(|c| c.node != below));
    assert!(session.candidates().iter().any(|c| c.node == first_with_text(&doc, "Corner")));

    for marker in &overlay.markers {
        assert!(marker.left + marker.width <= overlay.bounds.width, "{:?}", marker);
        assert!(marker.top + marker.height <= overlay.bounds.height, "{:?}", marker);
    }
}

fn exclude_first_button(_doc: &Document, node: &DomNode) -> Option<Verdict> {
    (node.text.as_deref() == Some("Button 0")).then_some(Verdict::Exclude)
}

#[test]
fn custom_rules_change_which_nodes_get_labels() {
    let doc = page(buttons(3));
    let mut host = RecordingHost::new();
    let mut mode = mode().with_rules(RuleSet::default().with_rule(exclude_first_button));

    mode.activate(&doc, &mut host).unwrap();
    let session = mode.session().unwrap();

    let first = first_with_text(&doc, "Button 0");
    assert_eq!(session.candidates().len(), 2);
    assert!(session.candidates().iter().all(|c| c.node != first));
    assert_eq!(session.lookup("AA").unwrap().node, first_with_text(&doc, "Button 1"));
}

// =========================================================================
// Chord activation
// =========================================================================

#[test]
fn chord_fires_once_per_double_press() {
    let mut chord = ChordDetector::new(1000);

    assert!(!chord.press(0));
    assert!(chord.press(500));
    assert!(!chord.press(700), "third press in the same burst must not fire");
    assert!(!chord.press(2000), "gap longer than the window re-arms");
    assert!(chord.press(2500));
}

#[test]
fn double_mod_g_activates_hint_mode() {
    let doc = page(buttons(3));
    let mut host = RecordingHost::new();
    let mut mode = mode();
    let chord = KeyInput::new("g").ctrl();

    assert_eq!(
        mode.on_keydown(&doc, &chord, &mut host, 1_000).unwrap(),
        KeyOutcome::Inactive
    );
    assert!(!mode.is_active());

    assert_eq!(
        mode.on_keydown(&doc, &chord, &mut host, 1_400).unwrap(),
        KeyOutcome::Consumed
    );
    assert!(mode.is_active());
}

#[test]
fn slow_or_plain_presses_do_not_activate() {
    let doc = page(buttons(3));
    let mut host = RecordingHost::new();
    let mut mode = mode();

    mode.on_keydown(&doc, &KeyInput::new("g").meta(), &mut host, 0).unwrap();
    mode.on_keydown(&doc, &KeyInput::new("g").meta(), &mut host, 1_500).unwrap();
    assert!(!mode.is_active());

    mode.on_keydown(&doc, &KeyInput::new("g"), &mut host, 1_600).unwrap();
    mode.on_keydown(&doc, &KeyInput::new("g"), &mut host, 1_700).unwrap();
    assert!(!mode.is_active());
}

// =========================================================================
// Clicks and shutdown
// =========================================================================

#[test]
fn click_while_idle_is_ignored() {
    let doc = page(buttons(1));
    let mut mode = mode();
    assert_eq!(mode.on_click(&doc, doc.root), ClickOutcome::Inactive);
}

#[test]
fn synthesized_click_routed_back_is_a_no_op() {
    let doc = page(buttons(3));
    let mut host = RecordingHost::new();
    let mut mode = mode();

    mode.activate(&doc, &mut host).unwrap();
    mode.on_keydown(&doc, &KeyInput::new("a"), &mut host, 0).unwrap();
    mode.on_keydown(&doc, &KeyInput::new("s"), &mut host, 0).unwrap();

    // The host delivers the synthesized click before the next turn.
    let target = host.dispatched()[0].target;
    assert_eq!(mode.on_click(&doc, target), ClickOutcome::Inactive);
    let body = first_with_tag(&doc, "body");
    assert_eq!(mode.on_click(&doc, body), ClickOutcome::Inactive);

    assert_eq!(mode.pending_tasks(), vec![Deferred::FinalizeClose]);
    mode.run_deferred(&mut host);
    assert_eq!(host.count(|c| matches!(c, HostCall::UnmountOverlay { .. })), 1);
}

#[test]
fn shutdown_force_closes_live_session() {
    let doc = page(buttons(3));
    let mut host = RecordingHost::new();
    let (seen, callback) = outcome_recorder();
    let mut mode = mode().on_complete(callback);

    mode.activate(&doc, &mut host).unwrap();
    let outcome = mode.shutdown(&mut host);

    assert_eq!(outcome, Some(SessionOutcome::Cancelled(CancelReason::Shutdown)));
    assert!(!mode.is_active());
    assert!(!host.key_capture);
    assert!(host.overlay.is_none());
    assert_eq!(seen.borrow().len(), 1);

    assert_eq!(mode.shutdown(&mut host), None);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn shutdown_after_match_but_before_teardown_keeps_match_outcome() {
    let doc = page(buttons(3));
    let mut host = RecordingHost::new();
    let mut mode = mode();

    mode.activate(&doc, &mut host).unwrap();
    mode.on_keydown(&doc, &KeyInput::new("A"), &mut host, 0).unwrap();
    mode.on_keydown(&doc, &KeyInput::new("A"), &mut host, 0).unwrap();

    let outcome = mode.shutdown(&mut host);
    assert!(matches!(outcome, Some(SessionOutcome::Matched { .. })));
    assert!(mode.pending_tasks().is_empty());
    assert_eq!(host.count(|c| matches!(c, HostCall::UnmountOverlay { .. })), 1);
}

// =========================================================================
// Replay
// =========================================================================

#[test]
fn replay_script_parses_keys_and_clicks() {
    let steps = parse_replay_script("A, s ,Backspace,`,Click,Click#4,Ctrl+g").unwrap();

    assert_eq!(
        steps,
        vec![
            ReplayStep::Key(KeyInput::new("A")),
            ReplayStep::Key(KeyInput::new("s")),
            ReplayStep::Key(KeyInput::new("Backspace")),
            ReplayStep::Key(KeyInput::new("`")),
            ReplayStep::Click(None),
            ReplayStep::Click(Some(NodeId(4))),
            ReplayStep::Key(KeyInput::new("g").ctrl()),
        ]
    );
    assert!(parse_replay_script("Click#x").is_err());
    assert!(parse_replay_script("Hyper+a").is_err());
}

#[test]
fn replay_clicks_icon_through_its_svg() {
    let doc = fixture("workspace.json");
    let steps = parse_replay_script("A,Q").unwrap();
    let report = replay(&doc, &HintConfig::default(), &steps, TraceLogger::disabled()).unwrap();

    let icon = doc.find_by_class("clickable-icon").unwrap();
    assert_eq!(report.labels.len(), 6);
    assert_eq!(
        report.outcome,
        Some(SessionOutcome::Matched {
            label: "AQ".into(),
            target: icon,
            action: ActionKind::Click,
        })
    );
}

#[test]
fn replay_focuses_matched_text_input() {
    let doc = fixture("workspace.json");
    let steps = parse_replay_script("A,S").unwrap();
    let report = replay(&doc, &HintConfig::default(), &steps, TraceLogger::disabled()).unwrap();

    let input = first_with_tag(&doc, "input");
    assert_eq!(report.calls.last(), Some(&HostCall::Focus(input)));
}

#[test]
fn replay_context_menu_and_outside_click() {
    let doc = fixture("workspace.json");

    let steps = parse_replay_script("`,A,F").unwrap();
    let report = replay(&doc, &HintConfig::default(), &steps, TraceLogger::disabled()).unwrap();
    assert!(matches!(
        report.outcome,
        Some(SessionOutcome::Matched { action: ActionKind::ContextMenu, .. })
    ));

    let steps = parse_replay_script("A,Click").unwrap();
    let report = replay(&doc, &HintConfig::default(), &steps, TraceLogger::disabled()).unwrap();
    assert_eq!(
        report.outcome,
        Some(SessionOutcome::Cancelled(CancelReason::OutsideClick))
    );
}

#[test]
fn replay_writes_trace_lines() {
    let dir = std::env::temp_dir().join("hint_mode_trace_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("trace.jsonl");
    std::fs::remove_file(&path).ok();

    let doc = page(buttons(2));
    let steps = parse_replay_script("A,A").unwrap();
    replay(
        &doc,
        &HintConfig::default(),
        &steps,
        TraceLogger::new(path.to_str().unwrap()),
    )
    .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let events: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let names: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();

    assert_eq!(names.first(), Some(&"build_started"));
    assert!(names.contains(&"overlay_mounted"));
    assert!(names.contains(&"close_requested"));
    assert_eq!(names.last(), Some(&"closed"));

    std::fs::remove_file(&path).ok();
    std::fs::remove_dir(&dir).ok();
}
