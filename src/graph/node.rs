//! Declarative node model
//!
//! A node spec carries a kind, named parameters, and output connections.
//! Specs describe processing; they hold no DSP state themselves.

use crate::synth::{SampleBuffer, ValueCurve, Waveform};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Processing node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Oscillator,
    Gain,
    BiquadFilter,
    StereoPanner,
    DynamicsCompressor,
    BufferSource,
}

/// Modulatable parameters a connection can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParamTarget {
    Frequency,
    Gain,
    Pan,
    Q,
}

/// A parameter value on a node
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Float(f64),
    Bool(bool),
    Waveform(Waveform),
    Curve(ValueCurve),
    Buffer(Arc<SampleBuffer>),
}

/// Where a node's output goes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Connection {
    /// The context destination (the audible or rendered output)
    Output,
    /// Another node's audio input
    Input(String),
    /// A modulatable parameter on another node
    Param(String, ParamTarget),
}

impl Connection {
    /// The destination node key, if the connection targets a node
    pub fn target_key(&self) -> Option<&str> {
        match self {
            Connection::Output => None,
            Connection::Input(key) | Connection::Param(key, _) => Some(key),
        }
    }
}

/// One node in a graph description
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub params: BTreeMap<String, ParamValue>,
    pub outputs: Vec<Connection>,
}

impl NodeSpec {
    /// Create a spec with no parameters or connections
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            params: BTreeMap::new(),
            outputs: Vec::new(),
        }
    }

    /// Set a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Set a float parameter
    pub fn with_float(self, name: impl Into<String>, value: f64) -> Self {
        self.with_param(name, ParamValue::Float(value))
    }

    /// Add an output connection
    pub fn connect(mut self, connection: Connection) -> Self {
        self.outputs.push(connection);
        self
    }

    /// Read a float parameter
    pub fn float(&self, name: &str) -> Option<f64> {
        match self.params.get(name) {
            Some(ParamValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Read a bool parameter
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.params.get(name) {
            Some(ParamValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Read a waveform parameter
    pub fn waveform(&self, name: &str) -> Option<Waveform> {
        match self.params.get(name) {
            Some(ParamValue::Waveform(w)) => Some(*w),
            _ => None,
        }
    }

    /// Read a curve parameter
    pub fn curve(&self, name: &str) -> Option<&ValueCurve> {
        match self.params.get(name) {
            Some(ParamValue::Curve(c)) => Some(c),
            _ => None,
        }
    }

    /// Read a buffer parameter
    pub fn buffer(&self, name: &str) -> Option<&Arc<SampleBuffer>> {
        match self.params.get(name) {
            Some(ParamValue::Buffer(b)) => Some(b),
            _ => None,
        }
    }
}
