//! Offline rendering
//!
//! Runs a compiled graph for a fixed number of frames and collects the
//! output into a buffer, decoupling synthesis cost from audible latency.

use super::{OfflineEngine, RenderGraph};
use crate::error::RenderError;
use crate::graph::GraphDescription;
use crate::synth::SampleBuffer;

/// Renders graph descriptions to stereo buffers
pub struct OfflineRenderer {
    sample_rate: u32,
}

impl OfflineRenderer {
    /// Create a renderer at the given sample rate
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl OfflineEngine for OfflineRenderer {
    fn render(
        &self,
        description: &GraphDescription,
        frames: usize,
    ) -> Result<SampleBuffer, RenderError> {
        if frames == 0 {
            return Err(RenderError::EmptyRequest);
        }

        let mut graph = RenderGraph::compile(description, self.sample_rate)?;
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for _ in 0..frames {
            let frame = graph.process();
            left.push(frame[0] as f32);
            right.push(frame[1] as f32);
        }

        Ok(SampleBuffer::stereo(left, right, self.sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Connection, NodeKind, NodeSpec, ParamValue};
    use std::sync::Arc;

    fn tone_graph() -> GraphDescription {
        let mut graph = GraphDescription::new();
        graph.insert(
            "osc",
            NodeSpec::new(NodeKind::Oscillator)
                .with_float("frequency", 440.0)
                .connect(Connection::Input("amp".to_string())),
        );
        graph.insert(
            "amp",
            NodeSpec::new(NodeKind::Gain)
                .with_float("gain", 0.5)
                .connect(Connection::Output),
        );
        graph
    }

    #[test]
    fn test_render_produces_requested_frame_count() {
        let renderer = OfflineRenderer::new(44100);
        let buffer = renderer.render(&tone_graph(), 4410).unwrap();

        assert_eq!(buffer.frames(), 4410);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.sample_rate(), 44100);
        assert!(buffer.peak() > 0.1);
    }

    #[test]
    fn test_render_rejects_zero_frames() {
        let renderer = OfflineRenderer::new(44100);
        assert!(matches!(
            renderer.render(&tone_graph(), 0),
            Err(RenderError::EmptyRequest)
        ));
    }

    #[test]
    fn test_render_rejects_invalid_graph() {
        let renderer = OfflineRenderer::new(44100);
        let mut graph = GraphDescription::new();
        graph.insert(
            "amp",
            NodeSpec::new(NodeKind::Gain).connect(Connection::Input("gone".to_string())),
        );
        assert!(matches!(
            renderer.render(&graph, 100),
            Err(RenderError::Graph(_))
        ));
    }

    #[test]
    fn test_rendered_buffer_replays_through_a_playback_graph() {
        let renderer = OfflineRenderer::new(8000);
        let buffer = Arc::new(renderer.render(&tone_graph(), 800).unwrap());

        let mut playback = GraphDescription::new();
        playback.insert(
            "track",
            NodeSpec::new(NodeKind::BufferSource)
                .with_param("buffer", ParamValue::Buffer(Arc::clone(&buffer)))
                .with_param("loop", ParamValue::Bool(true))
                .connect(Connection::Input("out".to_string())),
        );
        playback.insert(
            "out",
            NodeSpec::new(NodeKind::Gain).connect(Connection::Output),
        );

        let mut compiled = RenderGraph::compile(&playback, 8000).unwrap();
        for i in 0..1600 {
            let frame = compiled.process();
            let expected = buffer.frame(i % 800);
            assert!((frame[0] - expected[0] as f64).abs() < 1e-6);
        }
    }
}
