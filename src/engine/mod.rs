//! Graph engine
//!
//! Compiles graph descriptions into runnable processors and drives them
//! either offline (into a buffer) or live (through cpal). The core pipeline
//! only depends on the [`OfflineEngine`] and [`PlaybackEngine`] traits;
//! tests substitute mocks.

mod graph;
mod offline;
mod player;
mod recorder;

pub use graph::RenderGraph;
pub use offline::OfflineRenderer;
pub use player::{
    default_device_name, default_output_sample_rate, list_output_devices, Player,
};
pub use recorder::Recorder;

use crate::error::RenderError;
use crate::graph::GraphDescription;
use crate::synth::SampleBuffer;

/// Renders a graph description to a finished buffer off the real-time thread
pub trait OfflineEngine: Send + Sync {
    /// Render `frames` stereo frames, or reject the request
    fn render(
        &self,
        description: &GraphDescription,
        frames: usize,
    ) -> Result<SampleBuffer, RenderError>;
}

/// Realizes a graph description against the real-time output.
///
/// Stays on the thread that created it; cpal streams are not `Send`.
pub trait PlaybackEngine {
    /// Build the graph and start it; playback continues until the engine
    /// is stopped or dropped
    fn play(&mut self, description: &GraphDescription) -> Result<(), RenderError>;
}
