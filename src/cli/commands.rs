use crate::dom::snapshot::load_snapshot;
use crate::hint::hint_model::{HintConfig, SessionOutcome};
use crate::trace::logger::TraceLogger;
use crate::{parse_replay_script, preview_labels, replay};

// ============================================================================
// scan subcommand
// ============================================================================

pub fn cmd_scan(
    dom_path: &str,
    format: &str,
    config: &HintConfig,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_snapshot(dom_path)?;

    if verbose > 0 {
        eprintln!("Scanning {} ({} nodes)...", dom_path, doc.len());
    }

    let candidates = preview_labels(&doc, config)?;

    match format {
        "json" => {
            let rows: Vec<_> = candidates
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "label": c.label,
                        "node": c.node.0,
                        "kind": format!("{:?}", c.kind),
                        "rect": c.rect,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        "table" => {
            for c in &candidates {
                let tag = doc.node(c.node).map(|n| n.tag.as_str()).unwrap_or("?");
                println!(
                    "  {:<4} #{:<5} {:<10} {:?} @ ({:.0}, {:.0})",
                    c.label, c.node.0, tag, c.kind, c.rect.left, c.rect.top
                );
            }
            println!("{} labels", candidates.len());
        }
        other => return Err(format!("Unknown format: {}. Use table or json.", other).into()),
    }

    Ok(())
}

// ============================================================================
// replay subcommand
// ============================================================================

/// Replay a key script and return whether it ended in a match.
pub fn cmd_replay(
    dom_path: &str,
    keys: &str,
    config: &HintConfig,
    trace_path: Option<&str>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let doc = load_snapshot(dom_path)?;
    let steps = parse_replay_script(keys)?;

    if verbose > 0 {
        eprintln!("Replaying {} steps against {}...", steps.len(), dom_path);
    }

    let report = replay(&doc, config, &steps, TraceLogger::from_option(trace_path))?;

    if verbose > 1 {
        for call in &report.calls {
            eprintln!("  host: {:?}", call);
        }
    }

    let matched = matches!(report.outcome, Some(SessionOutcome::Matched { .. }));
    match &report.outcome {
        Some(SessionOutcome::Matched {
            label,
            target,
            action,
        }) => println!("{:?} on #{} via {}", action, target.0, label),
        Some(SessionOutcome::Cancelled(reason)) => println!("Cancelled: {:?}", reason),
        None => println!("Session still listening after {} steps", steps.len()),
    }

    Ok(matched)
}
