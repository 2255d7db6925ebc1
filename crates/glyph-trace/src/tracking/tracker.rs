use std::sync::Arc;

use glam::Vec2;

use super::feedback::{feedback, TraceFeedback};
use super::markers::check_markers;
use super::state::{TracePhase, TrackerState};
use crate::api::config::TraceConfig;
use crate::api::error::TraceError;
use crate::api::types::{ProgressEvent, RejectReason};
use crate::glyph::path::{GlyphPath, Marker};
use crate::input::queue::{TouchEvent, TouchPhase, TouchQueue};
use crate::sampling::proximity::ProximityIndex;
use crate::sampling::sampler::{sample, SampleSequence};

/// Validates a single-pointer gesture against a sampled glyph.
///
/// Touch input moves the tracker through `Idle -> Tracing -> Completed`.
/// Every meaningful transition is queued as a [`ProgressEvent`]; the host
/// drains them after feeding input. Nothing here fails at runtime: stray
/// touches are reported as `Rejected` and the attempt carries on.
pub struct GestureTracker {
    sequence: Arc<SampleSequence>,
    markers: Vec<Marker>,
    proximity: ProximityIndex,
    config: TraceConfig,
    state: TrackerState,
    events: Vec<ProgressEvent>,
}

impl GestureTracker {
    /// Sample `glyph` and set up a fresh attempt.
    pub fn new(glyph: &GlyphPath, config: TraceConfig) -> Result<Self, TraceError> {
        config.validate()?;
        let sequence = sample(glyph, config.steps_per_segment)?;
        Self::with_sequence(Arc::new(sequence), glyph.markers().to_vec(), config)
    }

    /// Set up an attempt over an already-sampled glyph (e.g. pre-sampled on a
    /// worker thread). The config is checked against the sequence length.
    pub fn with_sequence(
        sequence: Arc<SampleSequence>,
        markers: Vec<Marker>,
        config: TraceConfig,
    ) -> Result<Self, TraceError> {
        config.validate_for(sequence.len())?;
        let proximity = ProximityIndex::new(&sequence, &config);
        let state = TrackerState::new(markers.len());
        Ok(Self {
            sequence,
            markers,
            proximity,
            config,
            state,
            events: Vec::with_capacity(16),
        })
    }

    /// Dispatch one raw touch event.
    pub fn handle(&mut self, event: TouchEvent) {
        match event.phase {
            TouchPhase::Down => self.on_pointer_down(event.pos, event.timestamp),
            TouchPhase::Move => self.on_pointer_move(event.pos, event.timestamp),
            TouchPhase::Up => self.on_pointer_up(),
        }
    }

    /// Drain and handle everything queued since the last frame.
    pub fn process(&mut self, queue: &mut TouchQueue) {
        for event in queue.drain() {
            self.handle(event);
        }
    }

    /// Finger touches the screen.
    pub fn on_pointer_down(&mut self, pos: Vec2, timestamp: f64) {
        self.state.is_touching = true;
        self.touch_markers(pos);

        if self.state.phase != TracePhase::Idle {
            return;
        }

        let start_sq = self.config.start_radius() * self.config.start_radius();
        match self.state.current_index {
            None => {
                if pos.distance_squared(self.sequence.first().position) <= start_sq {
                    self.state.phase = TracePhase::Tracing;
                    self.state.current_index = Some(0);
                    self.state.last_advance_time = Some(timestamp);
                    self.state.begin_stroke(pos);
                    log::info!("trace started");
                    self.events.push(ProgressEvent::Started);
                } else {
                    self.events.push(ProgressEvent::Rejected(RejectReason::InvalidStart));
                }
            }
            Some(current) => {
                match self.proximity.nearest_within(&self.sequence, pos, current, start_sq) {
                    Some(hit) => {
                        self.state.phase = TracePhase::Tracing;
                        self.state.begin_stroke(pos);
                        log::debug!("trace resumed at sample {current}");
                        self.events.push(ProgressEvent::Started);
                        if hit.index > current {
                            self.advance(hit.index, timestamp);
                        }
                    }
                    None => self.events.push(ProgressEvent::Rejected(RejectReason::InvalidStart)),
                }
            }
        }
    }

    /// Finger drags across the screen. Hover moves (no finger down) are ignored.
    ///
    /// An accepted move emits `Advanced` only when it lands on a sample past
    /// the current one. Moves that stay on the current sample, or fall back
    /// inside the backward slack, are drawn but emit nothing.
    pub fn on_pointer_move(&mut self, pos: Vec2, timestamp: f64) {
        if !self.state.is_touching {
            return;
        }
        self.touch_markers(pos);

        if self.state.phase != TracePhase::Tracing {
            return;
        }
        let Some(current) = self.state.current_index else {
            return;
        };

        match self.proximity.nearest(&self.sequence, pos, current) {
            None => {
                let reason = if self.proximity.behind(&self.sequence, pos, current).is_some() {
                    RejectReason::Backtrack
                } else {
                    RejectReason::TooFarFromPath
                };
                self.events.push(ProgressEvent::Rejected(reason));
            }
            Some(hit) => {
                // Hits inside the backward slack are jitter: drawn, never regress.
                self.state.traced_polyline.push(pos);
                if hit.index > current {
                    self.advance(hit.index, timestamp);
                }
            }
        }
    }

    /// Finger lifts. Progress is kept for resuming unless the config says otherwise.
    pub fn on_pointer_up(&mut self) {
        self.state.is_touching = false;
        if self.state.phase != TracePhase::Tracing {
            return;
        }

        self.state.phase = TracePhase::Idle;
        if !self.config.resume_after_lift {
            self.state.clear_progress();
            log::debug!("finger lifted before the end, progress discarded");
            self.events.push(ProgressEvent::Rejected(RejectReason::LiftedBeforeEnd));
        }
    }

    /// Discard the attempt (progress, polyline, marker flags) and start over.
    pub fn reset(&mut self) {
        self.state.reset();
        self.events.clear();
    }

    fn advance(&mut self, idx: usize, timestamp: f64) {
        self.state.current_index = Some(idx);
        self.state.last_advance_time = Some(timestamp);
        self.events.push(ProgressEvent::Advanced(idx));

        if idx.saturating_add(self.config.completion_margin) >= self.sequence.last_index() {
            self.state.phase = TracePhase::Completed;
            self.state.current_index = Some(self.sequence.last_index());
            self.state.traced_polyline.push(self.sequence.last().position);
            log::info!("trace completed");
            self.events.push(ProgressEvent::Completed);
        }
    }

    fn touch_markers(&mut self, pos: Vec2) {
        while let Some(id) = check_markers(&self.markers, &mut self.state.markers, pos) {
            log::debug!("marker {} touched", id.0);
            self.events.push(ProgressEvent::MarkerTouched(id));
        }
    }

    /// Events queued since the last drain.
    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ProgressEvent> {
        std::mem::take(&mut self.events)
    }

    /// Renderable view of the current attempt.
    pub fn feedback(&self) -> TraceFeedback<'_> {
        feedback(&self.sequence, &self.state)
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn phase(&self) -> TracePhase {
        self.state.phase
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index
    }

    pub fn sequence(&self) -> &Arc<SampleSequence> {
        &self.sequence
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn proximity(&self) -> &ProximityIndex {
        &self.proximity
    }

    /// Arc-length fraction traced so far (0.0 to 1.0).
    pub fn progress_fraction(&self) -> f32 {
        self.state
            .current_index
            .map_or(0.0, |idx| self.sequence.progress_fraction(idx))
    }

    pub fn is_path_complete(&self) -> bool {
        self.state.phase == TracePhase::Completed
    }

    /// The usual host policy: path completed and every marker touched.
    pub fn is_exercise_complete(&self) -> bool {
        self.is_path_complete() && self.state.markers.all_touched()
    }
}
