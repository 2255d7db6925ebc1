//! Curve sampler: turns a [`GlyphPath`] into a fixed-resolution run of
//! position / arc-length / tangent samples.
//!
//! Every cubic segment is evaluated at `steps` evenly spaced parameter values
//! in [0, 1]. Points that would not move the running arc-length forward are
//! dropped, so consecutive samples are never coincident and
//! `cumulative_distance` is strictly increasing across the whole glyph,
//! pen-lift gaps included.

use std::ops::Range;

use glam::Vec2;

use crate::api::config::MAX_STEPS_PER_SEGMENT;
use crate::api::error::TraceError;
use crate::glyph::path::GlyphPath;

/// Derivatives shorter than this fall back to the secant direction.
const DEGENERATE_DERIVATIVE_SQ: f32 = 1e-8;

/// One discretized point along the glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Vec2,
    /// Arc-length from the glyph start.
    pub cumulative_distance: f32,
    /// Direction of travel in degrees, [0, 360), measured from +x towards +y.
    pub tangent_angle: f32,
    pub sub_path_index: usize,
}

impl Sample {
    /// Unit vector pointing along `tangent_angle`.
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.tangent_angle.to_radians())
    }
}

/// Immutable, ordered samples of one glyph. Built once per exercise; safe to
/// build on a worker thread and share.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSequence {
    samples: Vec<Sample>,
    sub_path_ranges: Vec<Range<usize>>,
}

/// Sample `glyph` with `steps` evaluations per cubic segment.
pub fn sample(glyph: &GlyphPath, steps: usize) -> Result<SampleSequence, TraceError> {
    if steps < 2 {
        return Err(TraceError::TooFewSamples(steps));
    }
    if steps > MAX_STEPS_PER_SEGMENT {
        return Err(TraceError::InvalidConfig(format!(
            "steps_per_segment must be <= {MAX_STEPS_PER_SEGMENT}, got {steps}"
        )));
    }

    let segment_count: usize = glyph.sub_paths().iter().map(|s| s.segments.len()).sum();
    let mut samples: Vec<Sample> = Vec::with_capacity(segment_count * steps);
    let mut tangents: Vec<Option<f32>> = Vec::with_capacity(segment_count * steps);
    let mut sub_path_ranges = Vec::with_capacity(glyph.sub_paths().len());
    let mut total = 0.0f32;

    for (sp, sub) in glyph.sub_paths().iter().enumerate() {
        let range_start = samples.len();

        for seg in &sub.segments {
            let curve = seg.to_lyon();
            for i in 0..steps {
                let t = i as f32 / (steps - 1) as f32;
                let p = curve.sample(t);
                let position = Vec2::new(p.x, p.y);

                if let Some(prev) = samples.last() {
                    let next_total = total + prev.position.distance(position);
                    // Coincident (or numerically absorbed) steps are dropped.
                    if next_total <= total {
                        continue;
                    }
                    total = next_total;
                }

                let d = curve.derivative(t);
                let tangent = (d.square_length() > DEGENERATE_DERIVATIVE_SQ)
                    .then(|| angle_degrees(Vec2::new(d.x, d.y)));

                samples.push(Sample {
                    position,
                    cumulative_distance: total,
                    tangent_angle: 0.0,
                    sub_path_index: sp,
                });
                tangents.push(tangent);
            }
        }

        if samples.len() == range_start {
            return Err(TraceError::DegenerateSegment {
                sub_path: sp,
                segment: 0,
            });
        }
        sub_path_ranges.push(range_start..samples.len());
    }

    if samples.len() < 2 {
        return Err(TraceError::DegenerateSegment {
            sub_path: 0,
            segment: 0,
        });
    }

    for range in &sub_path_ranges {
        for i in range.clone() {
            samples[i].tangent_angle = match tangents[i] {
                Some(angle) => angle,
                None => secant_angle(&samples, range, i),
            };
        }
    }

    log::debug!(
        "sampled glyph: {} sub-paths, {} samples, length {:.1}",
        sub_path_ranges.len(),
        samples.len(),
        total
    );

    Ok(SampleSequence {
        samples,
        sub_path_ranges,
    })
}

/// Direction between the neighbours of `i`, preferring neighbours in the same sub-path.
fn secant_angle(samples: &[Sample], range: &Range<usize>, i: usize) -> f32 {
    let (lo, hi) = if range.len() >= 2 {
        (range.start, range.end - 1)
    } else {
        (0, samples.len() - 1)
    };
    let a = samples[i.saturating_sub(1).max(lo)].position;
    let b = samples[(i + 1).min(hi)].position;
    angle_degrees(b - a)
}

/// Angle of `v` in degrees, normalized to [0, 360).
pub fn angle_degrees(v: Vec2) -> f32 {
    let deg = v.y.atan2(v.x).to_degrees();
    let deg = if deg < 0.0 { deg + 360.0 } else { deg };
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

impl SampleSequence {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn get(&self, idx: usize) -> Option<&Sample> {
        self.samples.get(idx)
    }

    pub fn first(&self) -> &Sample {
        &self.samples[0]
    }

    pub fn last(&self) -> &Sample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn last_index(&self) -> usize {
        self.samples.len() - 1
    }

    /// Arc-length of the whole glyph, pen-lift gaps included.
    pub fn total_length(&self) -> f32 {
        self.last().cumulative_distance
    }

    pub fn sub_path_count(&self) -> usize {
        self.sub_path_ranges.len()
    }

    /// Sample indices belonging to sub-path `sp`.
    pub fn sub_path_range(&self, sp: usize) -> Option<Range<usize>> {
        self.sub_path_ranges.get(sp).cloned()
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.samples.iter().map(|s| s.position)
    }

    /// Fraction of the total arc-length reached at sample `idx` (0.0 to 1.0).
    pub fn progress_fraction(&self, idx: usize) -> f32 {
        let idx = idx.min(self.last_index());
        self.samples[idx].cumulative_distance / self.total_length()
    }

    /// First sample whose cumulative distance is at least `distance`.
    pub fn index_at_distance(&self, distance: f32) -> usize {
        self.samples
            .partition_point(|s| s.cumulative_distance < distance)
            .min(self.last_index())
    }
}
