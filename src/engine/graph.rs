//! Realizing graph descriptions as runnable processors
//!
//! Compilation resolves keys to indices and orders nodes so every producer
//! runs before its consumers, covering audio and parameter edges alike.
//! Evaluation is per stereo frame: accumulators are cleared, nodes run in
//! order, and each output is summed into its targets' input or parameter
//! buses. A modulated parameter reads as its base value plus the summed
//! modulation signals.

use crate::error::GraphError;
use crate::graph::{Connection, GraphDescription, NodeKind, NodeSpec, ParamTarget};
use crate::synth::{
    BandpassFilter, Compressor, Oscillator, SampleBuffer, StereoPanner, ValueCurve, Waveform,
};
use std::collections::HashMap;
use std::sync::Arc;

enum Processor {
    Oscillator(Oscillator),
    Gain {
        gain: f64,
        envelope: Option<ValueCurve>,
    },
    Filter(BandpassFilter),
    Panner(StereoPanner),
    Compressor(Compressor),
    BufferSource {
        buffer: Arc<SampleBuffer>,
        looped: bool,
        playhead: usize,
    },
}

enum EdgeTarget {
    Output,
    Input(usize),
    Param(usize, ParamTarget),
}

struct NodeSlot {
    processor: Processor,
    outputs: Vec<EdgeTarget>,
}

/// Per-node modulation sums for one frame
#[derive(Debug, Clone, Copy, Default)]
struct ParamMods {
    frequency: f64,
    gain: f64,
    pan: f64,
    q: f64,
}

/// A compiled, runnable graph
pub struct RenderGraph {
    nodes: Vec<NodeSlot>,
    inputs: Vec<[f64; 2]>,
    mods: Vec<ParamMods>,
    sample_rate: f64,
    clock: u64,
}

impl RenderGraph {
    /// Compile a description, validating it first
    pub fn compile(description: &GraphDescription, sample_rate: u32) -> Result<Self, GraphError> {
        description.validate()?;
        let order = description.topological_order()?;
        let index: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), i))
            .collect();

        let mut nodes = Vec::with_capacity(order.len());
        for key in &order {
            let spec = description.get(key).expect("ordered key exists");
            let processor = instantiate(key, spec, sample_rate as f64)?;
            let outputs = spec
                .outputs
                .iter()
                .map(|connection| match connection {
                    Connection::Output => EdgeTarget::Output,
                    Connection::Input(target) => EdgeTarget::Input(index[target.as_str()]),
                    Connection::Param(target, param) => {
                        EdgeTarget::Param(index[target.as_str()], *param)
                    }
                })
                .collect();
            nodes.push(NodeSlot { processor, outputs });
        }

        let count = nodes.len();
        Ok(Self {
            nodes,
            inputs: vec![[0.0; 2]; count],
            mods: vec![ParamMods::default(); count],
            sample_rate: sample_rate as f64,
            clock: 0,
        })
    }

    /// Sample rate the graph was compiled for
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Frames produced so far
    pub fn frames_processed(&self) -> u64 {
        self.clock
    }

    /// Produce the next stereo output frame
    pub fn process(&mut self) -> [f64; 2] {
        let t = self.clock as f64 / self.sample_rate;
        for input in self.inputs.iter_mut() {
            *input = [0.0; 2];
        }
        for mods in self.mods.iter_mut() {
            *mods = ParamMods::default();
        }

        let mut output = [0.0; 2];
        for i in 0..self.nodes.len() {
            let input = self.inputs[i];
            let mods = self.mods[i];
            let frame = match &mut self.nodes[i].processor {
                Processor::Oscillator(osc) => {
                    let s = osc.generate(mods.frequency);
                    [s, s]
                }
                Processor::Gain { gain, envelope } => {
                    let base = match envelope {
                        Some(curve) => curve.value_at(t),
                        None => *gain,
                    };
                    let g = base + mods.gain;
                    [input[0] * g, input[1] * g]
                }
                Processor::Filter(filter) => filter.process(input, mods.q),
                Processor::Panner(panner) => panner.process(input, mods.pan),
                Processor::Compressor(compressor) => compressor.process(input),
                Processor::BufferSource {
                    buffer,
                    looped,
                    playhead,
                } => {
                    if *playhead >= buffer.frames() && *looped && buffer.frames() > 0 {
                        *playhead = 0;
                    }
                    if *playhead < buffer.frames() {
                        let f = buffer.frame(*playhead);
                        *playhead += 1;
                        [f[0] as f64, f[1] as f64]
                    } else {
                        [0.0, 0.0]
                    }
                }
            };

            for edge in &self.nodes[i].outputs {
                match edge {
                    EdgeTarget::Output => {
                        output[0] += frame[0];
                        output[1] += frame[1];
                    }
                    EdgeTarget::Input(j) => {
                        self.inputs[*j][0] += frame[0];
                        self.inputs[*j][1] += frame[1];
                    }
                    EdgeTarget::Param(j, param) => {
                        // Modulation signals are mono; downmix before summing
                        let v = 0.5 * (frame[0] + frame[1]);
                        let mods = &mut self.mods[*j];
                        match param {
                            ParamTarget::Frequency => mods.frequency += v,
                            ParamTarget::Gain => mods.gain += v,
                            ParamTarget::Pan => mods.pan += v,
                            ParamTarget::Q => mods.q += v,
                        }
                    }
                }
            }
        }

        self.clock += 1;
        output
    }
}

fn instantiate(key: &str, spec: &NodeSpec, sample_rate: f64) -> Result<Processor, GraphError> {
    match spec.kind {
        NodeKind::Oscillator => {
            let frequency = spec.float("frequency").unwrap_or(440.0);
            let waveform = spec.waveform("type").unwrap_or(Waveform::Sine);
            Ok(Processor::Oscillator(Oscillator::new(
                waveform,
                frequency,
                sample_rate,
            )))
        }
        NodeKind::Gain => Ok(Processor::Gain {
            gain: spec.float("gain").unwrap_or(1.0),
            envelope: spec.curve("envelope").cloned(),
        }),
        NodeKind::BiquadFilter => {
            let frequency = spec.float("frequency").ok_or(GraphError::MissingParameter {
                key: key.to_string(),
                param: "frequency",
            })?;
            if !frequency.is_finite() || frequency <= 0.0 {
                return Err(GraphError::InvalidFrequency { freq: frequency });
            }
            let q = spec.float("q").unwrap_or(1.0);
            Ok(Processor::Filter(BandpassFilter::new(
                sample_rate,
                frequency,
                q,
            )))
        }
        NodeKind::StereoPanner => Ok(Processor::Panner(StereoPanner::new(
            spec.float("pan").unwrap_or(0.0),
        ))),
        NodeKind::DynamicsCompressor => Ok(Processor::Compressor(Compressor::new(
            sample_rate,
            spec.float("threshold").unwrap_or(-24.0),
            spec.float("knee").unwrap_or(30.0),
            spec.float("ratio").unwrap_or(12.0),
            spec.float("attack").unwrap_or(0.003),
            spec.float("release").unwrap_or(0.25),
        ))),
        NodeKind::BufferSource => {
            let buffer = spec
                .buffer("buffer")
                .cloned()
                .ok_or(GraphError::MissingParameter {
                    key: key.to_string(),
                    param: "buffer",
                })?;
            Ok(Processor::BufferSource {
                buffer,
                looped: spec.boolean("loop").unwrap_or(false),
                playhead: 0,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ParamValue;

    fn constant_source(value: f32, frames: usize, looped: bool) -> NodeSpec {
        let buffer = Arc::new(SampleBuffer::mono(vec![value; frames], 8));
        NodeSpec::new(NodeKind::BufferSource)
            .with_param("buffer", ParamValue::Buffer(buffer))
            .with_param("loop", ParamValue::Bool(looped))
    }

    #[test]
    fn test_compile_rejects_invalid_description() {
        let mut graph = GraphDescription::new();
        graph.insert(
            "a",
            NodeSpec::new(NodeKind::Gain).connect(Connection::Input("missing".to_string())),
        );
        assert!(matches!(
            RenderGraph::compile(&graph, 8),
            Err(GraphError::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_compile_rejects_buffer_source_without_buffer() {
        let mut graph = GraphDescription::new();
        graph.insert(
            "src",
            NodeSpec::new(NodeKind::BufferSource).connect(Connection::Output),
        );
        assert!(matches!(
            RenderGraph::compile(&graph, 8),
            Err(GraphError::MissingParameter { param: "buffer", .. })
        ));
    }

    #[test]
    fn test_gain_scales_source() {
        let mut graph = GraphDescription::new();
        graph.insert(
            "src",
            constant_source(1.0, 16, false).connect(Connection::Input("amp".to_string())),
        );
        graph.insert(
            "amp",
            NodeSpec::new(NodeKind::Gain)
                .with_float("gain", 0.25)
                .connect(Connection::Output),
        );

        let mut compiled = RenderGraph::compile(&graph, 8).unwrap();
        let frame = compiled.process();
        assert!((frame[0] - 0.25).abs() < 1e-9);
        assert!((frame[1] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_parameter_modulation_adds_to_base() {
        // A constant 0.5 signal into the gain parameter of a zero-gain node
        let mut graph = GraphDescription::new();
        graph.insert(
            "src",
            constant_source(1.0, 16, false).connect(Connection::Input("amp".to_string())),
        );
        graph.insert(
            "mod",
            constant_source(0.5, 16, false)
                .connect(Connection::Param("amp".to_string(), ParamTarget::Gain)),
        );
        graph.insert(
            "amp",
            NodeSpec::new(NodeKind::Gain)
                .with_float("gain", 0.0)
                .connect(Connection::Output),
        );

        let mut compiled = RenderGraph::compile(&graph, 8).unwrap();
        let frame = compiled.process();
        assert!((frame[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_looped_buffer_wraps() {
        let buffer = Arc::new(SampleBuffer::mono(vec![1.0, -1.0], 8));
        let mut graph = GraphDescription::new();
        graph.insert(
            "src",
            NodeSpec::new(NodeKind::BufferSource)
                .with_param("buffer", ParamValue::Buffer(buffer))
                .with_param("loop", ParamValue::Bool(true))
                .connect(Connection::Output),
        );

        let mut compiled = RenderGraph::compile(&graph, 8).unwrap();
        let samples: Vec<f64> = (0..6).map(|_| compiled.process()[0]).collect();
        assert_eq!(samples, vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_unlooped_buffer_goes_silent() {
        let buffer = Arc::new(SampleBuffer::mono(vec![1.0, 1.0], 8));
        let mut graph = GraphDescription::new();
        graph.insert(
            "src",
            NodeSpec::new(NodeKind::BufferSource)
                .with_param("buffer", ParamValue::Buffer(buffer))
                .connect(Connection::Output),
        );

        let mut compiled = RenderGraph::compile(&graph, 8).unwrap();
        assert_eq!(compiled.process()[0], 1.0);
        assert_eq!(compiled.process()[0], 1.0);
        assert_eq!(compiled.process()[0], 0.0);
        assert_eq!(compiled.process()[0], 0.0);
    }

    #[test]
    fn test_envelope_curve_replaces_base_gain() {
        // Ramp 0 -> 1 over one second at 4 Hz: gains 0, 0.25, 0.5, 0.75
        let mut graph = GraphDescription::new();
        graph.insert(
            "src",
            constant_source(1.0, 16, true).connect(Connection::Input("amp".to_string())),
        );
        graph.insert(
            "amp",
            NodeSpec::new(NodeKind::Gain)
                .with_float("gain", 1.0)
                .with_param(
                    "envelope",
                    ParamValue::Curve(ValueCurve::new(vec![0.0, 1.0], 1.0)),
                )
                .connect(Connection::Output),
        );

        let mut compiled = RenderGraph::compile(&graph, 4).unwrap();
        let samples: Vec<f64> = (0..4).map(|_| compiled.process()[0]).collect();
        for (sample, expected) in samples.iter().zip([0.0, 0.25, 0.5, 0.75]) {
            assert!((sample - expected).abs() < 1e-9, "{samples:?}");
        }
    }

    #[test]
    fn test_fan_out_sums_at_destination() {
        let mut graph = GraphDescription::new();
        graph.insert(
            "a",
            constant_source(0.25, 16, true).connect(Connection::Input("sum".to_string())),
        );
        graph.insert(
            "b",
            constant_source(0.5, 16, true).connect(Connection::Input("sum".to_string())),
        );
        graph.insert(
            "sum",
            NodeSpec::new(NodeKind::Gain).connect(Connection::Output),
        );

        let mut compiled = RenderGraph::compile(&graph, 8).unwrap();
        let frame = compiled.process();
        assert!((frame[0] - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_oscillator_through_gain_to_output() {
        let mut graph = GraphDescription::new();
        graph.insert(
            "osc",
            NodeSpec::new(NodeKind::Oscillator)
                .with_float("frequency", 2.0)
                .with_param("type", ParamValue::Waveform(Waveform::Square))
                .connect(Connection::Input("amp".to_string())),
        );
        graph.insert(
            "amp",
            NodeSpec::new(NodeKind::Gain)
                .with_float("gain", 0.5)
                .connect(Connection::Output),
        );

        let mut compiled = RenderGraph::compile(&graph, 8).unwrap();
        // Square at 2 Hz over 8 Hz: two samples high, two low
        assert_eq!(compiled.process()[0], 0.5);
        assert_eq!(compiled.process()[0], 0.5);
        assert_eq!(compiled.process()[0], -0.5);
        assert_eq!(compiled.process()[0], -0.5);
    }

    #[test]
    fn test_frames_processed_counts() {
        let mut graph = GraphDescription::new();
        graph.insert(
            "src",
            constant_source(0.0, 4, true).connect(Connection::Output),
        );
        let mut compiled = RenderGraph::compile(&graph, 8).unwrap();
        for _ in 0..10 {
            compiled.process();
        }
        assert_eq!(compiled.frames_processed(), 10);
    }
}
