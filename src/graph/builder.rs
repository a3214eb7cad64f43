//! Compiling parameters into graph descriptions
//!
//! Deterministic: identical partials, voices, and config always produce
//! structurally identical descriptions. Every random decision has already
//! been made by the generator.

use super::node::{Connection, NodeKind, NodeSpec, ParamTarget, ParamValue};
use super::GraphDescription;
use crate::config::SynthesisConfig;
use crate::error::GraphError;
use crate::params::{ModTarget, Partial, Voice};
use crate::synth::{SampleBuffer, ValueCurve};
use std::sync::Arc;

/// Fixed offset of the stereo image of the whole piece
const MASTER_PAN: f64 = 0.1;
/// Output level after the compressor
const MASTER_GAIN: f64 = 0.1;
/// Base scale applied to every snowflake's gain
const FLAKE_GAIN_SCALE: f64 = 0.001;

/// Near-limiting compressor settings for the master bus
const COMPRESSOR_THRESHOLD_DB: f64 = -100.0;
const COMPRESSOR_KNEE_DB: f64 = 40.0;
const COMPRESSOR_RATIO: f64 = 20.0;
const COMPRESSOR_ATTACK: f64 = 0.0;

/// Build one partial's snowflake into `graph`: bandpass filter, panner, and
/// weighted gain feeding `bus`, with the partial's modulator attached.
/// Returns the snowflake's input key (the filter).
pub fn build_snowflake(
    prefix: &str,
    partial: &Partial,
    config: &SynthesisConfig,
    graph: &mut GraphDescription,
    bus: &str,
) -> Result<String, GraphError> {
    if !partial.frequency.is_finite() || partial.frequency <= 0.0 {
        return Err(GraphError::InvalidFrequency {
            freq: partial.frequency,
        });
    }

    let filter_key = format!("{prefix}/filter");
    let panner_key = format!("{prefix}/panner");
    let gain_key = format!("{prefix}/gain");

    graph.insert(
        &filter_key,
        NodeSpec::new(NodeKind::BiquadFilter)
            .with_float("frequency", partial.frequency)
            .with_float("q", partial.q)
            .connect(Connection::Input(panner_key.clone())),
    );
    graph.insert(
        &panner_key,
        NodeSpec::new(NodeKind::StereoPanner)
            .with_float("pan", partial.pan)
            .connect(Connection::Input(gain_key.clone())),
    );
    // Sharper resonances lose bandpass energy; q^tonal_boost compensates
    graph.insert(
        &gain_key,
        NodeSpec::new(NodeKind::Gain)
            .with_float(
                "gain",
                FLAKE_GAIN_SCALE * partial.gain * partial.q.powf(config.tonal_boost),
            )
            .connect(Connection::Input(bus.to_string())),
    );

    let modulator = &partial.modulator;
    let (target_key, target_param) = match modulator.target {
        ModTarget::Pan => (panner_key, ParamTarget::Pan),
        ModTarget::Gain => (gain_key, ParamTarget::Gain),
        ModTarget::Resonance => (filter_key.clone(), ParamTarget::Q),
    };

    let depth_key = format!("{prefix}/mod-depth");
    let osc_key = format!("{prefix}/mod-osc");
    graph.insert(
        &depth_key,
        NodeSpec::new(NodeKind::Gain)
            .with_float("gain", modulator.depth)
            .connect(Connection::Param(target_key, target_param)),
    );
    graph.insert(
        &osc_key,
        NodeSpec::new(NodeKind::Oscillator)
            .with_param("type", ParamValue::Waveform(modulator.waveform))
            .with_float("frequency", modulator.frequency)
            .connect(Connection::Input(depth_key)),
    );

    Ok(filter_key)
}

/// Build one voice into `graph`: an input nozzle fanned into every partial's
/// snowflake, all snowflakes summed into an output bus feeding `master_bus`.
/// Returns the voice's input key (the nozzle).
pub fn build_voice(
    prefix: &str,
    voice: &Voice,
    config: &SynthesisConfig,
    graph: &mut GraphDescription,
    master_bus: &str,
) -> Result<String, GraphError> {
    if voice.partials.is_empty() {
        return Err(GraphError::NoPartials);
    }

    let out_key = format!("{prefix}/out");
    let mut out_spec = NodeSpec::new(NodeKind::Gain)
        .with_float("gain", 1.0)
        .connect(Connection::Input(master_bus.to_string()));
    if let Some(envelope) = &voice.envelope {
        out_spec = out_spec.with_param(
            "envelope",
            ParamValue::Curve(ValueCurve::new(envelope.clone(), config.track_duration)),
        );
    }
    graph.insert(&out_key, out_spec);

    let mut nozzle = NodeSpec::new(NodeKind::Gain).with_float("gain", 1.0);
    for (i, partial) in voice.partials.iter().enumerate() {
        let flake_input =
            build_snowflake(&format!("{prefix}/flake{i}"), partial, config, graph, &out_key)?;
        nozzle = nozzle.connect(Connection::Input(flake_input));
    }
    let nozzle_key = format!("{prefix}/nozzle");
    graph.insert(&nozzle_key, nozzle);

    Ok(nozzle_key)
}

/// Build the full offline graph: the shared noise bed excites every voice,
/// voices sum into pan -> compressor -> master gain -> destination.
pub fn build_master_graph(
    voices: &[Voice],
    noise: Arc<SampleBuffer>,
    config: &SynthesisConfig,
) -> Result<GraphDescription, GraphError> {
    if voices.is_empty() {
        return Err(GraphError::NoPartials);
    }

    let mut graph = GraphDescription::new();

    graph.insert(
        "master-pan",
        NodeSpec::new(NodeKind::StereoPanner)
            .with_float("pan", MASTER_PAN)
            .connect(Connection::Input("compressor".to_string())),
    );
    graph.insert(
        "compressor",
        NodeSpec::new(NodeKind::DynamicsCompressor)
            .with_float("threshold", COMPRESSOR_THRESHOLD_DB)
            .with_float("knee", COMPRESSOR_KNEE_DB)
            .with_float("ratio", COMPRESSOR_RATIO)
            .with_float("attack", COMPRESSOR_ATTACK)
            .with_float("release", config.tempo * 0.25)
            .connect(Connection::Input("master-gain".to_string())),
    );
    graph.insert(
        "master-gain",
        NodeSpec::new(NodeKind::Gain)
            .with_float("gain", MASTER_GAIN)
            .connect(Connection::Output),
    );

    let mut noise_spec = NodeSpec::new(NodeKind::BufferSource)
        .with_param("buffer", ParamValue::Buffer(noise))
        .with_param("loop", ParamValue::Bool(true));
    for (i, voice) in voices.iter().enumerate() {
        let nozzle = build_voice(&format!("voice{i}"), voice, config, &mut graph, "master-pan")?;
        noise_spec = noise_spec.connect(Connection::Input(nozzle));
    }
    graph.insert("noise", noise_spec);

    graph.validate()?;
    Ok(graph)
}

/// Build the minimal playback graph: the rendered track looped through a
/// unit gain into the destination.
pub fn build_playback_graph(buffer: Arc<SampleBuffer>) -> Result<GraphDescription, GraphError> {
    let mut graph = GraphDescription::new();
    graph.insert(
        "master-gain",
        NodeSpec::new(NodeKind::Gain)
            .with_float("gain", 1.0)
            .connect(Connection::Output),
    );
    graph.insert(
        "track",
        NodeSpec::new(NodeKind::BufferSource)
            .with_param("buffer", ParamValue::Buffer(buffer))
            .with_param("loop", ParamValue::Bool(true))
            .connect(Connection::Input("master-gain".to_string())),
    );
    graph.validate()?;
    Ok(graph)
}
