//! WASM bridge for glyph-trace.
//!
//! One tracing session lives in a `thread_local!` [`TraceRunner`]; the free
//! functions below are the JavaScript surface. Pointer handlers only queue
//! input, `trace_tick` applies it and refreshes the flat buffers:
//!
//! ```text
//! events:   trace_events_len() × 4 floats  (kind, a, b, c)
//! vertices: trace_vertex_count() × 6 floats (x, y, r, g, b, a), triangle list
//! ```

pub mod runner;

pub use runner::TraceRunner;

use std::cell::RefCell;

use glam::Vec2;
use glyph_trace::{Placement, TouchEvent};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<TraceRunner> = RefCell::new(TraceRunner::new());
}

fn with_runner<R>(f: impl FnOnce(&mut TraceRunner) -> R) -> R {
    RUNNER.with(|cell| f(&mut cell.borrow_mut()))
}

#[wasm_bindgen]
pub fn trace_init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("glyph-trace: initialized");
}

/// Apply a JSON config for subsequent exercises. Returns false if it was rejected.
#[wasm_bindgen]
pub fn trace_configure(json: &str) -> bool {
    with_runner(|r| match r.configure(json) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("config rejected: {e}");
            false
        }
    })
}

/// Load a glyph catalogue. Returns the glyph count, 0 on failure.
#[wasm_bindgen]
pub fn trace_load_glyphs(json: &str) -> u32 {
    with_runner(|r| match r.load_glyphs(json) {
        Ok(count) => count as u32,
        Err(e) => {
            log::error!("failed to load glyphs: {e}");
            0
        }
    })
}

/// Start tracing `name`, placed at `origin + authored * scale`.
#[wasm_bindgen]
pub fn trace_start(name: &str, origin_x: f32, origin_y: f32, scale: f32) -> bool {
    let placement = Placement::new(Vec2::new(origin_x, origin_y), scale);
    with_runner(|r| match r.start(name, placement) {
        Ok(()) => true,
        Err(e) => {
            log::error!("cannot start {name:?}: {e}");
            false
        }
    })
}

#[wasm_bindgen]
pub fn trace_pointer_down(x: f32, y: f32, timestamp: f64) {
    with_runner(|r| r.push_input(TouchEvent::down(Vec2::new(x, y), timestamp)));
}

#[wasm_bindgen]
pub fn trace_pointer_move(x: f32, y: f32, timestamp: f64) {
    with_runner(|r| r.push_input(TouchEvent::moved(Vec2::new(x, y), timestamp)));
}

#[wasm_bindgen]
pub fn trace_pointer_up(x: f32, y: f32, timestamp: f64) {
    with_runner(|r| r.push_input(TouchEvent::up(Vec2::new(x, y), timestamp)));
}

#[wasm_bindgen]
pub fn trace_tick() {
    with_runner(|r| r.tick());
}

#[wasm_bindgen]
pub fn trace_reset() {
    with_runner(|r| r.reset());
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn trace_events_ptr() -> *const f32 {
    with_runner(|r| r.events_ptr())
}

#[wasm_bindgen]
pub fn trace_events_len() -> u32 {
    with_runner(|r| r.events_len())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn trace_vertices_ptr() -> *const f32 {
    with_runner(|r| r.vertices_ptr())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn trace_vertex_count() -> u32 {
    with_runner(|r| r.vertex_count())
}

#[wasm_bindgen]
pub fn trace_cursor_x() -> f32 {
    with_runner(|r| r.cursor().0.x)
}

#[wasm_bindgen]
pub fn trace_cursor_y() -> f32 {
    with_runner(|r| r.cursor().0.y)
}

#[wasm_bindgen]
pub fn trace_cursor_angle() -> f32 {
    with_runner(|r| r.cursor().1)
}

#[wasm_bindgen]
pub fn trace_progress() -> f32 {
    with_runner(|r| r.progress())
}

#[wasm_bindgen]
pub fn trace_phase() -> u32 {
    with_runner(|r| r.phase_code())
}

#[wasm_bindgen]
pub fn trace_is_complete() -> bool {
    with_runner(|r| r.is_exercise_complete())
}
