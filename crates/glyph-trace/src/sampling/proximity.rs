//! Windowed nearest-sample lookup.
//!
//! Only samples in `[center - backward_slack, center + lookahead]` are
//! considered, so a curve that passes near itself (loops, the bowl of an `a`)
//! can never pull the cursor onto a far-away part of the path. A linear scan
//! over that window is cheap at glyph resolutions.

use std::ops::Range;

use glam::Vec2;

use super::sampler::{Sample, SampleSequence};
use crate::api::config::TraceConfig;

/// Result of a proximity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub index: usize,
    pub distance_sq: f32,
}

/// Search window parameters for one glyph. Built once per sample sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityIndex {
    lookahead: usize,
    backward_slack: usize,
    distance_cap_sq: f32,
}

impl ProximityIndex {
    pub fn new(seq: &SampleSequence, config: &TraceConfig) -> Self {
        let scaled = (seq.len() as f32 * config.lookahead_fraction).ceil() as usize;
        Self::from_parts(
            scaled.max(config.min_lookahead).min(seq.len()).max(1),
            config.backward_slack,
            config.tolerance_radius,
        )
    }

    pub fn from_parts(lookahead: usize, backward_slack: usize, distance_cap: f32) -> Self {
        Self {
            lookahead,
            backward_slack,
            distance_cap_sq: distance_cap * distance_cap,
        }
    }

    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    pub fn backward_slack(&self) -> usize {
        self.backward_slack
    }

    pub fn distance_cap_sq(&self) -> f32 {
        self.distance_cap_sq
    }

    /// Index range searched around `center` (end exclusive, clamped to the sequence).
    pub fn window(&self, seq: &SampleSequence, center: usize) -> Range<usize> {
        let start = center.saturating_sub(self.backward_slack);
        let end = center
            .saturating_add(self.lookahead)
            .saturating_add(1)
            .min(seq.len());
        start.min(end)..end
    }

    /// Nearest sample in the window around `center`, if within the distance cap.
    pub fn nearest(&self, seq: &SampleSequence, point: Vec2, center: usize) -> Option<Nearest> {
        self.nearest_within(seq, point, center, self.distance_cap_sq)
    }

    /// Same as [`nearest`](Self::nearest) with an explicit squared cap.
    pub fn nearest_within(
        &self,
        seq: &SampleSequence,
        point: Vec2,
        center: usize,
        cap_sq: f32,
    ) -> Option<Nearest> {
        nearest_in_range(seq.samples(), point, self.window(seq, center), cap_sq)
    }

    /// Probe the stretch just behind the window (one lookahead long) to tell a
    /// true backtrack apart from wandering off the path.
    pub fn behind(&self, seq: &SampleSequence, point: Vec2, center: usize) -> Option<Nearest> {
        let end = center.saturating_sub(self.backward_slack).min(seq.len());
        let start = end.saturating_sub(self.lookahead);
        nearest_in_range(seq.samples(), point, start..end, self.distance_cap_sq)
    }
}

/// Nearest sample to `point` among `samples[range]` whose squared distance is
/// at most `cap_sq`. Ties resolve to the earlier index.
pub fn nearest_in_range(
    samples: &[Sample],
    point: Vec2,
    range: Range<usize>,
    cap_sq: f32,
) -> Option<Nearest> {
    let end = range.end.min(samples.len());
    let start = range.start.min(end);

    let mut best: Option<Nearest> = None;
    for (offset, s) in samples[start..end].iter().enumerate() {
        let d = point.distance_squared(s.position);
        if d > cap_sq {
            continue;
        }
        if best.map_or(true, |b| d < b.distance_sq) {
            best = Some(Nearest {
                index: start + offset,
                distance_sq: d,
            });
        }
    }
    best
}
