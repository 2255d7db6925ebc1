//! Guided path tracing and gesture validation.
//!
//! A glyph ([`GlyphPath`]) is sampled once into a [`SampleSequence`]; a
//! [`GestureTracker`] then validates a single-pointer touch stream against it,
//! queuing [`ProgressEvent`]s for the host and exposing a pure
//! [`TraceFeedback`] projection for the renderer.

pub mod api;
pub mod glyph;
pub mod input;
pub mod sampling;
pub mod tracking;
#[cfg(feature = "vectors")]
pub mod render;

// Re-export key types at crate root for convenience
pub use api::config::TraceConfig;
pub use api::error::TraceError;
pub use api::types::{EventRecord, MarkerId, ProgressEvent, RejectReason};
pub use glyph::{CubicSegment, GlyphDef, GlyphPath, GlyphSet, Marker, MarkerDef, Placement, SubPath};
pub use input::queue::{TouchEvent, TouchPhase, TouchQueue};
pub use sampling::{nearest_in_range, sample, Nearest, ProximityIndex, Sample, SampleSequence};
pub use tracking::{
    check_markers, feedback, GestureTracker, MarkerState, TraceFeedback, TracePhase, TrackerState,
};

#[cfg(feature = "vectors")]
pub use render::mesh::{FeedbackMesh, MeshStyle, VectorColor, VectorVertex};
