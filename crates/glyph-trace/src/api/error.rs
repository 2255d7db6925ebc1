use thiserror::Error;

/// Errors raised while building a glyph or its sample sequence.
///
/// Gesture handling never fails; these only surface at setup time, before an
/// exercise starts.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TraceError {
    #[error("glyph has no sub-paths")]
    EmptyGlyph,

    #[error("sub-path {sub_path} has no segments")]
    EmptySubPath { sub_path: usize },

    #[error("sub-path {sub_path} has {points} points, expected 3k+1 with k >= 1")]
    MalformedSubPath { sub_path: usize, points: usize },

    #[error("segment {segment} of sub-path {sub_path} has zero length")]
    DegenerateSegment { sub_path: usize, segment: usize },

    #[error("non-finite coordinate in {0}")]
    NonFiniteCoordinate(&'static str),

    #[error("marker {marker} has invalid radius {radius}")]
    InvalidMarkerRadius { marker: usize, radius: f32 },

    #[error("sampling needs at least 2 steps per segment, got {0}")]
    TooFewSamples(usize),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("no glyph named {0:?}")]
    UnknownGlyph(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
