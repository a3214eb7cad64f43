//! Snowdrift - procedurally generated ambient drone loops

use anyhow::{anyhow, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use snowdrift::config::{GenerationContext, Preset};
use snowdrift::engine::{self, OfflineRenderer, Player, Recorder};
use snowdrift::orchestrator::Orchestrator;
use snowdrift::params;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { preset, seed } => {
            let preset = lookup_preset(&preset)?;
            let mut rng = make_rng(seed);

            let sample_rate = engine::default_output_sample_rate().unwrap_or(44100);
            let config = params::generate_config(preset, &mut rng);

            println!("Generating a new piece ({})...", preset.name);
            println!("  Root: {} Hz", config.root_frequency);
            println!("  Chord ratios: {:?}", config.chord_ratios);
            println!("  Tempo: {:.3}", config.tempo);
            println!("  Track length: {:.1} s", config.track_duration);
            println!("  Sample rate: {} Hz", sample_rate);

            let context = GenerationContext::new(config, sample_rate)?;
            let mut orchestrator = Orchestrator::new(
                context,
                OfflineRenderer::new(sample_rate),
                Player::new(),
            );

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(orchestrator.run(&mut rng))?;

            println!("\nPlaying on a loop. Press Ctrl-C for silence,");
            println!("re-run for a new atmosphere.");

            let (tx, rx) = std::sync::mpsc::channel();
            ctrlc::set_handler(move || {
                let _ = tx.send(());
            })?;
            rx.recv()?;
        }

        Commands::Render {
            preset,
            seed,
            output,
            loops,
            sample_rate,
        } => {
            let preset = lookup_preset(&preset)?;
            let mut rng = make_rng(seed);

            let config = params::generate_config(preset, &mut rng);
            println!("Generating a new piece ({})...", preset.name);
            println!("  Root: {} Hz", config.root_frequency);
            println!("  Track length: {:.1} s", config.track_duration);

            let context = GenerationContext::new(config, sample_rate)?;
            let mut orchestrator = Orchestrator::new(
                context,
                OfflineRenderer::new(sample_rate),
                Player::new(),
            );

            let rt = tokio::runtime::Runtime::new()?;
            let buffer = rt.block_on(orchestrator.render_track(&mut rng))?;

            let mut recorder = Recorder::new(&output, sample_rate)?;
            for _ in 0..loops.max(1) {
                recorder.write_buffer(&buffer)?;
            }
            let duration = recorder.duration_secs();
            recorder.finalize()?;

            println!("Wrote {:?} ({:.1} s)", output, duration);
        }

        Commands::Describe { preset, seed, json } => {
            let preset = lookup_preset(&preset)?;
            let mut rng = make_rng(seed);

            let config = params::generate_config(preset, &mut rng);
            let voices = params::generate_voices(&config, &mut rng);

            if json {
                let report = serde_json::json!({
                    "preset": preset.name,
                    "config": config,
                    "voices": voices,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Preset: {}", preset.name);
                println!("  Root: {} Hz", config.root_frequency);
                println!("  Chord ratios: {:?}", config.chord_ratios);
                println!("  Tempo: {:.3}", config.tempo);
                println!("  Track length: {:.1} s", config.track_duration);
                println!("  Partials per voice: {}", config.partial_count);
                for (i, voice) in voices.iter().enumerate() {
                    let top = voice
                        .partials
                        .last()
                        .map(|p| p.frequency)
                        .unwrap_or_default();
                    println!(
                        "  Voice {}: root {:.1} Hz, partials up to {:.0} Hz",
                        i + 1,
                        voice.root_frequency,
                        top
                    );
                }
            }
        }

        Commands::Devices => {
            println!("Available audio devices:\n");

            if let Some(name) = engine::default_device_name() {
                println!("Default output: {}", name);
                if let Some(rate) = engine::default_output_sample_rate() {
                    println!("  Sample rate: {} Hz", rate);
                }
                println!();
            }

            println!("Output devices:");
            for (name, config) in engine::list_output_devices() {
                println!(
                    "  - {} ({} Hz, {} ch)",
                    name, config.sample_rate.0, config.channels
                );
            }
        }

        Commands::Presets => {
            println!("Built-in presets:\n");
            for preset in Preset::all() {
                println!("{}", preset.name);
                println!("  Partials per voice: {}", preset.partial_count);
                println!(
                    "  Tempo range: {:.2} - {:.2}",
                    preset.tempo_range.0, preset.tempo_range.1
                );
                println!("  Track length: {} beats", preset.duration_beats);
                println!(
                    "  Voice envelope: {}",
                    if preset.voice_envelope.is_some() {
                        "swell"
                    } else {
                        "constant"
                    }
                );
                println!();
            }
        }
    }

    Ok(())
}

fn make_rng(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_entropy(),
    }
}

fn lookup_preset(name: &str) -> Result<&'static Preset> {
    Preset::by_name(name).ok_or_else(|| {
        anyhow!(
            "unknown preset '{}' (available: {})",
            name,
            Preset::all()
                .iter()
                .map(|p| p.name)
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}
