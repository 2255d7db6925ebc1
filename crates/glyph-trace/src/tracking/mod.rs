pub mod feedback;
pub mod markers;
pub mod state;
pub mod tracker;

pub use feedback::{feedback, TraceFeedback};
pub use markers::check_markers;
pub use state::{MarkerState, TracePhase, TrackerState};
pub use tracker::GestureTracker;
