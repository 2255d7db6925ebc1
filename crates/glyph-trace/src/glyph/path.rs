use glam::Vec2;
use lyon::geom::CubicBezierSegment;
use lyon::math::point;

use crate::api::error::TraceError;

/// One cubic Bézier piece: start, two control points, end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub from: Vec2,
    pub ctrl1: Vec2,
    pub ctrl2: Vec2,
    pub to: Vec2,
}

impl CubicSegment {
    pub fn new(from: Vec2, ctrl1: Vec2, ctrl2: Vec2, to: Vec2) -> Self {
        Self { from, ctrl1, ctrl2, to }
    }

    /// A straight segment with control points at 1/3 and 2/3, which keeps the
    /// parameterization uniform along the line.
    pub fn line(from: Vec2, to: Vec2) -> Self {
        Self {
            from,
            ctrl1: from.lerp(to, 1.0 / 3.0),
            ctrl2: from.lerp(to, 2.0 / 3.0),
            to,
        }
    }

    pub fn to_lyon(&self) -> CubicBezierSegment<f32> {
        CubicBezierSegment {
            from: point(self.from.x, self.from.y),
            ctrl1: point(self.ctrl1.x, self.ctrl1.y),
            ctrl2: point(self.ctrl2.x, self.ctrl2.y),
            to: point(self.to.x, self.to.y),
        }
    }

    /// Length of the control polygon. Zero exactly when the curve collapses to a point.
    pub fn control_polygon_length(&self) -> f32 {
        self.from.distance(self.ctrl1) + self.ctrl1.distance(self.ctrl2) + self.ctrl2.distance(self.to)
    }

    fn is_finite(&self) -> bool {
        self.from.is_finite() && self.ctrl1.is_finite() && self.ctrl2.is_finite() && self.to.is_finite()
    }

    fn translated_scaled(&self, origin: Vec2, scale: f32) -> Self {
        let map = |p: Vec2| origin + p * scale;
        Self::new(map(self.from), map(self.ctrl1), map(self.ctrl2), map(self.to))
    }
}

/// A continuous stroke: chained cubic segments drawn without lifting the pen.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    pub segments: Vec<CubicSegment>,
}

impl SubPath {
    pub fn new(segments: Vec<CubicSegment>) -> Self {
        Self { segments }
    }

    /// Build a stroke from a poly-Bézier point list: `start, (c1, c2, end)*`.
    /// `sub_path` is only used to label errors.
    pub fn from_points(points: &[Vec2], sub_path: usize) -> Result<Self, TraceError> {
        if points.len() < 4 || (points.len() - 1) % 3 != 0 {
            return Err(TraceError::MalformedSubPath {
                sub_path,
                points: points.len(),
            });
        }
        let segments = points
            .windows(4)
            .step_by(3)
            .map(|w| CubicSegment::new(w[0], w[1], w[2], w[3]))
            .collect();
        Ok(Self { segments })
    }

    pub fn start(&self) -> Option<Vec2> {
        self.segments.first().map(|s| s.from)
    }

    pub fn end(&self) -> Option<Vec2> {
        self.segments.last().map(|s| s.to)
    }
}

/// A point target that must be touched independently of the main path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub center: Vec2,
    pub radius: f32,
}

impl Marker {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Inclusive hit test using squared distances.
    pub fn contains(&self, p: Vec2) -> bool {
        p.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Immutable definition of a traceable shape.
///
/// Construction validates the geometry, so any `GlyphPath` in hand can be
/// sampled without further checks on finiteness or degenerate segments.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPath {
    sub_paths: Vec<SubPath>,
    markers: Vec<Marker>,
}

impl GlyphPath {
    pub fn new(sub_paths: Vec<SubPath>, markers: Vec<Marker>) -> Result<Self, TraceError> {
        if sub_paths.is_empty() {
            return Err(TraceError::EmptyGlyph);
        }

        for (sp, sub) in sub_paths.iter().enumerate() {
            if sub.segments.is_empty() {
                return Err(TraceError::EmptySubPath { sub_path: sp });
            }
            for (si, seg) in sub.segments.iter().enumerate() {
                if !seg.is_finite() {
                    return Err(TraceError::NonFiniteCoordinate("sub-path"));
                }
                if seg.control_polygon_length() <= f32::EPSILON {
                    return Err(TraceError::DegenerateSegment {
                        sub_path: sp,
                        segment: si,
                    });
                }
            }
        }

        for (i, m) in markers.iter().enumerate() {
            if !m.center.is_finite() {
                return Err(TraceError::NonFiniteCoordinate("marker"));
            }
            if !(m.radius.is_finite() && m.radius > 0.0) {
                return Err(TraceError::InvalidMarkerRadius {
                    marker: i,
                    radius: m.radius,
                });
            }
        }

        Ok(Self { sub_paths, markers })
    }

    /// Convenience for a glyph made of a single stroke and no markers.
    pub fn single(sub_path: SubPath) -> Result<Self, TraceError> {
        Self::new(vec![sub_path], Vec::new())
    }

    pub fn sub_paths(&self) -> &[SubPath] {
        &self.sub_paths
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Map authored coordinates into screen space: `origin + p * scale`.
    /// Marker radii scale too.
    pub fn placed(&self, origin: Vec2, scale: f32) -> Result<Self, TraceError> {
        let sub_paths = self
            .sub_paths
            .iter()
            .map(|sp| SubPath::new(sp.segments.iter().map(|s| s.translated_scaled(origin, scale)).collect()))
            .collect();
        let markers = self
            .markers
            .iter()
            .map(|m| Marker::new(origin + m.center * scale, m.radius * scale.abs()))
            .collect();
        Self::new(sub_paths, markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: f32, y0: f32, x1: f32, y1: f32) -> SubPath {
        SubPath::new(vec![CubicSegment::line(Vec2::new(x0, y0), Vec2::new(x1, y1))])
    }

    #[test]
    fn from_points_chains_segments() {
        let pts: Vec<Vec2> = (0..7).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let sub = SubPath::from_points(&pts, 0).unwrap();
        assert_eq!(sub.segments.len(), 2);
        assert_eq!(sub.segments[0].to, sub.segments[1].from);
        assert_eq!(sub.start(), Some(Vec2::ZERO));
        assert_eq!(sub.end(), Some(Vec2::new(6.0, 0.0)));
    }

    #[test]
    fn from_points_rejects_bad_counts() {
        for n in [0, 1, 3, 5, 6] {
            let pts = vec![Vec2::ONE; n];
            assert!(
                matches!(
                    SubPath::from_points(&pts, 2),
                    Err(TraceError::MalformedSubPath { sub_path: 2, points }) if points == n
                ),
                "{n} points should be malformed"
            );
        }
    }

    #[test]
    fn rejects_empty_and_degenerate() {
        assert!(matches!(GlyphPath::new(vec![], vec![]), Err(TraceError::EmptyGlyph)));
        assert!(matches!(
            GlyphPath::new(vec![SubPath::new(vec![])], vec![]),
            Err(TraceError::EmptySubPath { sub_path: 0 })
        ));
        assert!(matches!(
            GlyphPath::new(vec![line(0.0, 0.0, 10.0, 0.0), line(5.0, 5.0, 5.0, 5.0)], vec![]),
            Err(TraceError::DegenerateSegment { sub_path: 1, segment: 0 })
        ));
    }

    #[test]
    fn rejects_non_finite_and_bad_markers() {
        assert!(matches!(
            GlyphPath::single(line(0.0, 0.0, f32::NAN, 0.0)),
            Err(TraceError::NonFiniteCoordinate(_))
        ));
        assert!(matches!(
            GlyphPath::new(vec![line(0.0, 0.0, 10.0, 0.0)], vec![Marker::new(Vec2::ZERO, 0.0)]),
            Err(TraceError::InvalidMarkerRadius { marker: 0, .. })
        ));
    }

    #[test]
    fn closed_loop_is_not_degenerate() {
        let p = Vec2::new(10.0, 10.0);
        let seg = CubicSegment::new(p, Vec2::new(40.0, 10.0), Vec2::new(40.0, 40.0), p);
        assert!(GlyphPath::single(SubPath::new(vec![seg])).is_ok());
    }

    #[test]
    fn marker_hit_is_inclusive() {
        let m = Marker::new(Vec2::new(100.0, 100.0), 24.0);
        assert!(m.contains(Vec2::new(124.0, 100.0)));
        assert!(!m.contains(Vec2::new(124.01, 100.0)));
    }

    #[test]
    fn placed_maps_geometry_and_markers() {
        let glyph = GlyphPath::new(
            vec![line(0.0, 0.0, 1.0, 0.0)],
            vec![Marker::new(Vec2::new(0.5, 0.5), 0.1)],
        )
        .unwrap();
        let placed = glyph.placed(Vec2::new(100.0, 200.0), 300.0).unwrap();
        assert_eq!(placed.sub_paths()[0].start(), Some(Vec2::new(100.0, 200.0)));
        assert_eq!(placed.sub_paths()[0].end(), Some(Vec2::new(400.0, 200.0)));
        assert_eq!(placed.markers()[0].center, Vec2::new(250.0, 350.0));
        assert!((placed.markers()[0].radius - 30.0).abs() < 1e-4);
    }
}
