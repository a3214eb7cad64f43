//! Error types for snowdrift
//!
//! Three categories: invalid generated parameters, malformed graph
//! descriptions, and rendering/playback failures.

use thiserror::Error;

/// Errors from validating generated or preset parameters.
///
/// These indicate a programming defect rather than a runtime condition;
/// generation invariants should make them unreachable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("partial count must be at least 1, got {count}")]
    PartialCount { count: usize },

    #[error("root frequency must be positive and finite, got {freq} Hz")]
    RootFrequency { freq: f64 },

    #[error("chord ratio must be positive, got {ratio}")]
    ChordRatio { ratio: f64 },

    #[error("tempo must be positive, got {tempo}")]
    Tempo { tempo: f64 },

    #[error("tonal range must be non-negative, got {range}")]
    TonalRange { range: f64 },

    #[error("track duration must be positive, got {duration} s")]
    TrackDuration { duration: f64 },

    #[error("rhythm frequency set must not be empty")]
    EmptyRhythmSet,

    #[error("sample rate must be non-zero")]
    SampleRate,
}

/// Errors from assembling or validating a graph description.
///
/// A graph that fails here is never submitted to an engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("graph contains no nodes")]
    Empty,

    #[error("voice has no partials")]
    NoPartials,

    #[error("connection from '{from}' references unknown node '{to}'")]
    UnknownNode { from: String, to: String },

    #[error("node '{key}' connects to itself")]
    SelfConnection { key: String },

    #[error("graph contains a cycle through '{key}'")]
    Cycle { key: String },

    #[error("filter frequency must be positive, got {freq} Hz")]
    InvalidFrequency { freq: f64 },

    #[error("node '{key}' is missing required parameter '{param}'")]
    MissingParameter { key: String, param: &'static str },
}

/// Errors from offline rendering or starting playback.
///
/// Surfaced and logged; the system degrades to silence rather than retrying.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("render request for zero frames")]
    EmptyRequest,

    #[error("no output device available")]
    NoOutputDevice,

    #[error("unsupported sample format")]
    UnsupportedFormat,

    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offending_value() {
        let err = ConfigError::PartialCount { count: 0 };
        assert!(err.to_string().contains("0"));

        let err = GraphError::UnknownNode {
            from: "noise".to_string(),
            to: "missing".to_string(),
        };
        assert!(err.to_string().contains("noise"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_top_level_conversions() {
        let err: Error = ConfigError::EmptyRhythmSet.into();
        assert!(matches!(err, Error::Config(_)));

        let err: Error = GraphError::Empty.into();
        assert!(matches!(err, Error::Graph(_)));

        let err: Error = RenderError::EmptyRequest.into();
        assert!(matches!(err, Error::Render(_)));
    }
}
