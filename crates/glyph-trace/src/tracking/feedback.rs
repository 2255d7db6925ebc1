//! Trace feedback: the renderable view of an attempt.
//!
//! A pure projection of `(SampleSequence, TrackerState)`. It is recomputed
//! after every tracker update and never feeds back into validation.

use glam::Vec2;

use super::state::{TracePhase, TrackerState};
use crate::sampling::sampler::{Sample, SampleSequence};

/// Everything a renderer needs to draw the current attempt.
#[derive(Debug, Clone, Copy)]
pub struct TraceFeedback<'a> {
    /// The whole sampled path.
    pub path: &'a [Sample],
    /// Samples up to and including the current index (empty before the start).
    pub guided: &'a [Sample],
    /// Samples not yet reached.
    pub remaining: &'a [Sample],
    /// Guide cursor: where the finger should be.
    pub cursor_position: Vec2,
    /// Guide cursor orientation in degrees, [0, 360).
    pub cursor_tangent: f32,
    /// Raw accepted touch points.
    pub user_polyline: &'a [Vec2],
    /// Arc-length fraction reached (0.0 to 1.0).
    pub progress: f32,
    pub phase: TracePhase,
    stroke_starts: &'a [usize],
}

/// Project tracker state into renderable geometry.
pub fn feedback<'a>(seq: &'a SampleSequence, state: &'a TrackerState) -> TraceFeedback<'a> {
    let samples = seq.samples();
    let (guided, remaining, cursor, progress) = match state.current_index {
        Some(idx) => {
            let idx = idx.min(seq.last_index());
            (
                &samples[..=idx],
                &samples[idx + 1..],
                &samples[idx],
                seq.progress_fraction(idx),
            )
        }
        None => (&samples[..0], samples, seq.first(), 0.0),
    };

    TraceFeedback {
        path: samples,
        guided,
        remaining,
        cursor_position: cursor.position,
        cursor_tangent: cursor.tangent_angle,
        user_polyline: &state.traced_polyline,
        progress,
        phase: state.phase,
        stroke_starts: &state.stroke_starts,
    }
}

impl<'a> TraceFeedback<'a> {
    /// Full path split per sub-path.
    pub fn path_runs(&self) -> impl Iterator<Item = &'a [Sample]> {
        self.path.chunk_by(|a, b| a.sub_path_index == b.sub_path_index)
    }

    /// Guided samples split per sub-path, so pen-lift gaps are never drawn.
    pub fn guided_runs(&self) -> impl Iterator<Item = &'a [Sample]> {
        self.guided.chunk_by(|a, b| a.sub_path_index == b.sub_path_index)
    }

    /// Untraced samples split per sub-path.
    pub fn remaining_runs(&self) -> impl Iterator<Item = &'a [Sample]> {
        self.remaining.chunk_by(|a, b| a.sub_path_index == b.sub_path_index)
    }

    /// User polyline split per touch stroke (finger down to finger up).
    pub fn user_strokes(&self) -> impl Iterator<Item = &'a [Vec2]> {
        let poly = self.user_polyline;
        let starts = self.stroke_starts;
        starts.iter().enumerate().map(move |(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(poly.len());
            &poly[start.min(end)..end]
        })
    }

    /// Unit vector of the cursor orientation.
    pub fn cursor_direction(&self) -> Vec2 {
        Vec2::from_angle(self.cursor_tangent.to_radians())
    }
}
