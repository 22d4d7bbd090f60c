use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::hint::hint_model::HintConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "hint-mode",
    version,
    about = "Keyboard hint overlay for DOM snapshots"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: hint-mode.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append JSONL trace events to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Label alphabet, overrides the config file
    #[arg(long, global = true)]
    pub alphabet: Option<String>,

    /// Two-character labels before switching to three, overrides the config file
    #[arg(long, global = true)]
    pub max_two_char_labels: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the labels a hint session would assign
    Scan {
        /// DOM snapshot (JSON)
        #[arg(long)]
        dom: String,

        /// Output format: table or json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Run a full hint session with a scripted key sequence
    Replay {
        /// DOM snapshot (JSON)
        #[arg(long)]
        dom: String,

        /// Comma-separated steps, e.g. "A,S" or "`,A,D" or "Click,Escape"
        #[arg(long)]
        keys: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `hint-mode.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub hints: HintConfig,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("hint-mode.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

/// Resolve hint settings: CLI > config file > defaults.
pub fn resolve_hint_config(cli: &Cli, file: &AppConfig) -> HintConfig {
    let mut hints = file.hints.clone();

    if let Some(alphabet) = &cli.alphabet {
        hints.alphabet = alphabet.clone();
    }
    if let Some(max) = cli.max_two_char_labels {
        hints.max_two_char_labels = max;
    }

    hints
}
