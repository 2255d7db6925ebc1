use glam::Vec2;
use glyph_trace::{
    EventRecord, GestureTracker, GlyphSet, Placement, TouchEvent, TouchQueue, TraceConfig,
    TraceError, TracePhase,
};
#[cfg(feature = "vectors")]
use glyph_trace::{FeedbackMesh, MeshStyle};

/// Owns one tracing session on behalf of the browser.
///
/// wasm-bindgen cannot export stateful structs with borrowed views, so the
/// exports in `lib.rs` keep one runner in a `thread_local!` and forward to it.
/// Input is queued as it arrives and applied in `tick`, which also rebuilds
/// the flat event and vertex buffers JavaScript reads.
pub struct TraceRunner {
    config: TraceConfig,
    glyphs: Option<GlyphSet>,
    tracker: Option<GestureTracker>,
    input: TouchQueue,
    /// Events produced by the last tick, flattened for buffer reads.
    events: Vec<EventRecord>,
    #[cfg(feature = "vectors")]
    mesh: FeedbackMesh,
    #[cfg(feature = "vectors")]
    style: MeshStyle,
}

impl TraceRunner {
    pub fn new() -> Self {
        Self {
            config: TraceConfig::default(),
            glyphs: None,
            tracker: None,
            input: TouchQueue::new(),
            events: Vec::with_capacity(32),
            #[cfg(feature = "vectors")]
            mesh: FeedbackMesh::new(),
            #[cfg(feature = "vectors")]
            style: MeshStyle::default(),
        }
    }

    /// Replace the config used by the next `start`.
    pub fn configure(&mut self, json: &str) -> Result<(), TraceError> {
        self.config = TraceConfig::from_json(json)?;
        Ok(())
    }

    /// Load a glyph catalogue. Returns the number of glyphs.
    pub fn load_glyphs(&mut self, json: &str) -> Result<usize, TraceError> {
        let set = GlyphSet::from_json(json)?;
        let count = set.glyphs.len();
        self.glyphs = Some(set);
        Ok(count)
    }

    /// Start an exercise for `name`, dropping any previous attempt.
    pub fn start(&mut self, name: &str, placement: Placement) -> Result<(), TraceError> {
        let set = self
            .glyphs
            .as_ref()
            .ok_or_else(|| TraceError::UnknownGlyph(name.to_string()))?;
        let path = set.build_path(name, placement)?;
        let config = match set.tolerance_for(name, placement) {
            Some(tol) => self.config.clone().with_tolerance(tol),
            None => self.config.clone(),
        };

        self.tracker = Some(GestureTracker::new(&path, config)?);
        self.input.drain();
        self.events.clear();
        self.rebuild_mesh();
        log::info!("exercise started: {name}");
        Ok(())
    }

    pub fn push_input(&mut self, event: TouchEvent) {
        self.input.push(event);
    }

    /// Apply queued input and refresh the output buffers.
    pub fn tick(&mut self) {
        self.events.clear();
        let Some(tracker) = self.tracker.as_mut() else {
            self.input.drain();
            return;
        };

        tracker.process(&mut self.input);
        self.events
            .extend(tracker.drain_events().into_iter().map(EventRecord::from));
        self.rebuild_mesh();
    }

    /// Restart the current exercise from scratch.
    pub fn reset(&mut self) {
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.reset();
        }
        self.input.drain();
        self.events.clear();
        self.rebuild_mesh();
    }

    #[cfg(feature = "vectors")]
    fn rebuild_mesh(&mut self) {
        match &self.tracker {
            Some(t) => self
                .mesh
                .build(&t.feedback(), t.markers(), t.state().markers(), &self.style),
            None => self.mesh.clear(),
        }
    }

    #[cfg(not(feature = "vectors"))]
    fn rebuild_mesh(&mut self) {}

    pub fn tracker(&self) -> Option<&GestureTracker> {
        self.tracker.as_ref()
    }

    // ---- Accessors for JavaScript buffer reads ----

    pub fn events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    #[cfg(feature = "vectors")]
    pub fn vertices_ptr(&self) -> *const f32 {
        self.mesh.as_floats().as_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vertex_count(&self) -> u32 {
        self.mesh.vertex_count() as u32
    }

    pub fn cursor(&self) -> (Vec2, f32) {
        self.tracker
            .as_ref()
            .map(|t| {
                let fb = t.feedback();
                (fb.cursor_position, fb.cursor_tangent)
            })
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    pub fn progress(&self) -> f32 {
        self.tracker.as_ref().map_or(0.0, |t| t.progress_fraction())
    }

    /// 0 = no exercise, 1 = idle, 2 = tracing, 3 = completed.
    pub fn phase_code(&self) -> u32 {
        match self.tracker.as_ref().map(|t| t.phase()) {
            None => 0,
            Some(TracePhase::Idle) => 1,
            Some(TracePhase::Tracing) => 2,
            Some(TracePhase::Completed) => 3,
        }
    }

    pub fn is_exercise_complete(&self) -> bool {
        self.tracker.as_ref().is_some_and(|t| t.is_exercise_complete())
    }
}

impl Default for TraceRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLYPHS: &str = r#"{
        "glyphs": {
            "l": {
                "strokes": [ [[0.5, 0.1], [0.5, 0.3], [0.5, 0.5], [0.5, 0.7]] ]
            },
            "i": {
                "strokes": [ [[0.5, 0.4], [0.5, 0.5], [0.5, 0.6], [0.5, 0.7]] ],
                "markers": [ { "center": [0.5, 0.2], "radius": 0.06 } ],
                "tolerance": 0.05
            }
        }
    }"#;

    fn placement() -> Placement {
        Placement::new(Vec2::new(100.0, 0.0), 400.0)
    }

    #[test]
    fn start_requires_loaded_glyphs() {
        let mut runner = TraceRunner::new();
        assert!(matches!(
            runner.start("l", placement()),
            Err(TraceError::UnknownGlyph(_))
        ));
        assert_eq!(runner.load_glyphs(GLYPHS).unwrap(), 2);
        assert!(runner.start("l", placement()).is_ok());
        assert_eq!(runner.phase_code(), 1);
    }

    #[test]
    fn tick_applies_queued_input() {
        let mut runner = TraceRunner::new();
        runner.load_glyphs(GLYPHS).unwrap();
        runner.start("l", placement()).unwrap();

        let positions: Vec<Vec2> = runner
            .tracker()
            .unwrap()
            .sequence()
            .positions()
            .collect();
        runner.push_input(TouchEvent::down(positions[0], 0.0));
        for (i, &p) in positions.iter().enumerate().skip(1) {
            runner.push_input(TouchEvent::moved(p, i as f64 * 16.0));
        }
        runner.tick();

        assert_eq!(runner.phase_code(), 3);
        assert!(runner.is_exercise_complete());
        assert_eq!(runner.events().first().unwrap().kind, EventRecord::KIND_STARTED);
        assert_eq!(runner.events().last().unwrap().kind, EventRecord::KIND_COMPLETED);
        assert_eq!(runner.progress(), 1.0);

        // Events only live for one tick.
        runner.tick();
        assert_eq!(runner.events_len(), 0);
    }

    #[test]
    fn glyph_tolerance_override_applies() {
        let mut runner = TraceRunner::new();
        runner.load_glyphs(GLYPHS).unwrap();
        runner.start("i", placement()).unwrap();
        let tracker = runner.tracker().unwrap();
        assert!((tracker.config().tolerance_radius - 20.0).abs() < 1e-3);
        assert!(!runner.is_exercise_complete());
    }

    #[test]
    fn configure_rejects_bad_json() {
        let mut runner = TraceRunner::new();
        assert!(runner.configure(r#"{ "steps_per_segment": 0 }"#).is_err());
        assert!(runner.configure(r#"{ "tolerance_radius": 50.0 }"#).is_ok());
    }

    #[test]
    fn cursor_starts_at_glyph_origin() {
        let mut runner = TraceRunner::new();
        assert_eq!(runner.cursor(), (Vec2::ZERO, 0.0));
        runner.load_glyphs(GLYPHS).unwrap();
        runner.start("l", placement()).unwrap();
        let (pos, angle) = runner.cursor();
        assert!((pos - Vec2::new(300.0, 40.0)).length() < 1e-3);
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[cfg(feature = "vectors")]
    #[test]
    fn mesh_is_ready_after_start() {
        let mut runner = TraceRunner::new();
        runner.load_glyphs(GLYPHS).unwrap();
        assert_eq!(runner.vertex_count(), 0);
        runner.start("l", placement()).unwrap();
        assert!(runner.vertex_count() > 0);
    }
}
