//! Snowdrift - procedurally generated ambient drone loops
//!
//! Draws a randomized but musically coherent parameter set, compiles it
//! into a declarative audio graph, renders the whole track offline, then
//! loops the rendered buffer through a minimal playback graph.

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod orchestrator;
pub mod params;
pub mod synth;

pub use config::{GenerationContext, Preset, SynthesisConfig};
pub use error::Error;
pub use orchestrator::Orchestrator;
