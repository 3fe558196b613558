mod cli;

use adsync::{config, replay, session::SessionEvent};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "adsync=trace,adsync_playhead=trace,adsync_timeline=trace,adsync_common=debug"
                .to_string()
        } else {
            "adsync=debug,adsync_playhead=debug,adsync_timeline=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Replay { trace, json, raw } => {
            replay_trace(&trace, cli.config.as_deref(), json, raw)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("adsync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn replay_trace(
    trace: &Path,
    config_path: Option<&Path>,
    json: bool,
    raw: bool,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    if raw {
        config.normalizer.enabled = false;
    }

    if !trace.exists() {
        anyhow::bail!("Trace file does not exist: {:?}", trace);
    }

    let file = File::open(trace).with_context(|| format!("Failed to open trace: {:?}", trace))?;
    let events = replay::read_trace(BufReader::new(file), config.replay.strict)
        .with_context(|| format!("Failed to read trace: {:?}", trace))?;

    tracing::info!("Replaying {} events from {:?}", events.len(), trace);
    let report = replay::replay(&config, events);

    if json {
        for event in &report.events {
            println!("{}", serde_json::to_string(event)?);
        }
        return Ok(());
    }

    for event in &report.events {
        match event {
            SessionEvent::Beacon { beacon } => println!("{}", beacon),
            SessionEvent::Playhead { raw, normalized }
                if config.replay.show_corrections && raw != normalized =>
            {
                println!("  playhead {:.3} -> {:.3}", raw, normalized);
            }
            SessionEvent::NormalizingStarted => println!("-- normalizing started"),
            SessionEvent::NormalizingFinished => println!("-- normalizing finished"),
            _ => {}
        }
    }

    println!();
    println!("Player events: {}", report.inputs);
    println!("Beacon batches: {}", report.batches());
    println!("Beacons delivered: {}", report.beacons().count());
    println!("Corrected samples: {}", report.corrections().count());

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Normalizer enabled: {}", config.normalizer.enabled);
            println!(
                "  Normalize outside ads: {}",
                config.normalizer.normalize_outside_ads
            );
            println!(
                "  Thresholds: ads +{} default +{} backward {}",
                config.normalizer.ads_forward_threshold,
                config.normalizer.default_forward_threshold,
                config.normalizer.backward_threshold
            );
            println!(
                "  Emitter: lead-in {}s, mid interval {}s, grace {}s",
                config.emitter.lead_in_secs,
                config.emitter.mid_interval_secs,
                config.emitter.fire_grace_secs
            );
            println!("  Drain due beacons: {}", config.emitter.drain_due_beacons);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            config::validate_config(&config)?;
            println!("Default config:");
            println!("  Normalizer enabled: {}", config.normalizer.enabled);
            println!("  Drain due beacons: {}", config.emitter.drain_due_beacons);
        }
    }

    Ok(())
}
