//! CLI interface for snowdrift

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Procedurally generated ambient drone loops
#[derive(Parser)]
#[command(name = "snowdrift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new piece and loop it through the default output device
    Play {
        /// Preset name
        #[arg(short, long, default_value = "powder")]
        preset: String,

        /// Seed for reproducible generation (omit for a fresh piece)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Generate a new piece and write it to a WAV file
    Render {
        /// Preset name
        #[arg(short, long, default_value = "powder")]
        preset: String,

        /// Seed for reproducible generation (omit for a fresh piece)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Number of times the track loop is written
        #[arg(short, long, default_value = "1")]
        loops: u32,

        /// Sample rate of the rendered file
        #[arg(long, default_value = "44100")]
        sample_rate: u32,
    },

    /// Print the parameters a generation run would draw
    Describe {
        /// Preset name
        #[arg(short, long, default_value = "powder")]
        preset: String,

        /// Seed for reproducible generation (omit for a fresh piece)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// List available audio devices
    Devices,

    /// List the built-in presets
    Presets,
}
