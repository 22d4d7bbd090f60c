use clap::Parser;
use hint_mode::cli::commands::{cmd_replay, cmd_scan};
use hint_mode::cli::config::{Cli, Commands, load_config, resolve_hint_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve hint settings: CLI > config > defaults
    let hints = resolve_hint_config(&cli, &config);
    hints.validate()?;

    match &cli.command {
        Commands::Scan { dom, format } => {
            cmd_scan(dom, format, &hints, cli.verbose)?;
        }
        Commands::Replay { dom, keys } => {
            let matched = cmd_replay(dom, keys, &hints, cli.trace.as_deref(), cli.verbose)?;
            if !matched {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
