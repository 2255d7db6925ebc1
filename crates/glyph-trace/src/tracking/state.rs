use glam::Vec2;

use crate::api::types::MarkerId;

/// Phase of one exercise attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracePhase {
    /// Waiting for a touch-down at the start (or resume) sample.
    Idle,
    /// Finger is down and following the path.
    Tracing,
    /// End of the path reached. Terminal until reset.
    Completed,
}

/// Touched/untouched flag per marker, indexed by [`MarkerId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerState {
    touched: Vec<bool>,
}

impl MarkerState {
    pub fn new(count: usize) -> Self {
        Self {
            touched: vec![false; count],
        }
    }

    pub fn len(&self) -> usize {
        self.touched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    pub fn is_touched(&self, id: MarkerId) -> bool {
        self.touched.get(id.0 as usize).copied().unwrap_or(false)
    }

    /// Mark `id` as touched. Returns true only the first time.
    pub fn mark(&mut self, id: MarkerId) -> bool {
        match self.touched.get_mut(id.0 as usize) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub fn touched_count(&self) -> usize {
        self.touched.iter().filter(|t| **t).count()
    }

    /// True when every marker has been touched (vacuously true with none).
    pub fn all_touched(&self) -> bool {
        self.touched.iter().all(|t| *t)
    }

    fn clear(&mut self) {
        self.touched.iter_mut().for_each(|t| *t = false);
    }
}

/// Mutable state of one attempt, owned by the gesture tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    pub(crate) phase: TracePhase,
    /// Furthest accepted sample; `None` until the first valid touch-down.
    pub(crate) current_index: Option<usize>,
    pub(crate) is_touching: bool,
    /// Accepted raw touch points, for feedback only.
    pub(crate) traced_polyline: Vec<Vec2>,
    /// Offsets into `traced_polyline` where each touch stroke begins.
    pub(crate) stroke_starts: Vec<usize>,
    pub(crate) markers: MarkerState,
    pub(crate) last_advance_time: Option<f64>,
}

impl TrackerState {
    pub fn new(marker_count: usize) -> Self {
        Self {
            phase: TracePhase::Idle,
            current_index: None,
            is_touching: false,
            traced_polyline: Vec::with_capacity(256),
            stroke_starts: Vec::new(),
            markers: MarkerState::new(marker_count),
            last_advance_time: None,
        }
    }

    pub fn phase(&self) -> TracePhase {
        self.phase
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn is_touching(&self) -> bool {
        self.is_touching
    }

    pub fn traced_polyline(&self) -> &[Vec2] {
        &self.traced_polyline
    }

    pub fn markers(&self) -> &MarkerState {
        &self.markers
    }

    /// Host timestamp of the last forward step (or start), for inactivity policies.
    pub fn last_advance_time(&self) -> Option<f64> {
        self.last_advance_time
    }

    pub(crate) fn begin_stroke(&mut self, pos: Vec2) {
        self.stroke_starts.push(self.traced_polyline.len());
        self.traced_polyline.push(pos);
    }

    /// Forget path progress, keep marker flags.
    pub(crate) fn clear_progress(&mut self) {
        self.current_index = None;
        self.traced_polyline.clear();
        self.stroke_starts.clear();
        self.last_advance_time = None;
    }

    pub(crate) fn reset(&mut self) {
        self.clear_progress();
        self.phase = TracePhase::Idle;
        self.is_touching = false;
        self.markers.clear();
    }
}
