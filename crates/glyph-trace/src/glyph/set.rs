use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;

use super::path::{GlyphPath, Marker, SubPath};
use crate::api::error::TraceError;

/// A catalogue of glyph definitions, as bundled with the lesson content.
///
/// Coordinates are authored in a normalized box (typically 0..1) and mapped to
/// screen space with a [`Placement`] when an exercise starts.
#[derive(Debug, Deserialize)]
pub struct GlyphSet {
    pub glyphs: HashMap<String, GlyphDef>,
}

/// Definition of a single glyph.
#[derive(Debug, Clone, Deserialize)]
pub struct GlyphDef {
    /// Strokes in tracing order. Each stroke is a poly-Bézier point list:
    /// `[start, c1, c2, end, c1, c2, end, ...]`.
    pub strokes: Vec<Vec<[f32; 2]>>,
    /// Dots and other point targets.
    #[serde(default)]
    pub markers: Vec<MarkerDef>,
    /// Tolerance override in authored units (scaled with the glyph).
    #[serde(default)]
    pub tolerance: Option<f32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MarkerDef {
    pub center: [f32; 2],
    pub radius: f32,
}

/// Where a glyph lands on screen: `origin + authored * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub origin: Vec2,
    pub scale: f32,
}

impl Placement {
    pub fn new(origin: Vec2, scale: f32) -> Self {
        Self { origin, scale }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl GlyphDef {
    /// Validate and build the glyph in authored coordinates.
    pub fn to_path(&self) -> Result<GlyphPath, TraceError> {
        let sub_paths = self
            .strokes
            .iter()
            .enumerate()
            .map(|(i, stroke)| {
                let pts: Vec<Vec2> = stroke.iter().map(|&p| Vec2::from(p)).collect();
                SubPath::from_points(&pts, i)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let markers = self
            .markers
            .iter()
            .map(|m| Marker::new(Vec2::from(m.center), m.radius))
            .collect();
        GlyphPath::new(sub_paths, markers)
    }
}

impl GlyphSet {
    /// Parse a glyph catalogue from JSON.
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, name: &str) -> Option<&GlyphDef> {
        self.glyphs.get(name)
    }

    pub fn has_glyph(&self, name: &str) -> bool {
        self.glyphs.contains_key(name)
    }

    /// Glyph names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.glyphs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a glyph placed in screen space.
    pub fn build_path(&self, name: &str, placement: Placement) -> Result<GlyphPath, TraceError> {
        let def = self
            .get(name)
            .ok_or_else(|| TraceError::UnknownGlyph(name.to_string()))?;
        def.to_path()?.placed(placement.origin, placement.scale)
    }

    /// The glyph's tolerance override in screen units, if it has one.
    pub fn tolerance_for(&self, name: &str, placement: Placement) -> Option<f32> {
        self.get(name)?.tolerance.map(|t| t * placement.scale.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_JSON: &str = r#"{
        "glyphs": {
            "i": {
                "strokes": [
                    [[0.5, 0.4], [0.5, 0.5], [0.5, 0.6], [0.5, 0.75]]
                ],
                "markers": [ { "center": [0.5, 0.25], "radius": 0.06 } ],
                "tolerance": 0.1
            },
            "T": {
                "strokes": [
                    [[0.2, 0.15], [0.4, 0.15], [0.6, 0.15], [0.8, 0.15]],
                    [[0.5, 0.15], [0.5, 0.35], [0.5, 0.55], [0.5, 0.75]]
                ]
            },
            "bad": {
                "strokes": [ [[0.0, 0.0], [1.0, 1.0]] ]
            }
        }
    }"#;

    #[test]
    fn parse_glyph_set() {
        let set = GlyphSet::from_json(TEST_JSON).unwrap();
        assert_eq!(set.names(), vec!["T", "bad", "i"]);
        assert!(set.has_glyph("i"));
        assert!(!set.has_glyph("x"));
        assert_eq!(set.get("i").unwrap().markers.len(), 1);
        assert!(set.get("T").unwrap().markers.is_empty());
    }

    #[test]
    fn build_placed_path() {
        let set = GlyphSet::from_json(TEST_JSON).unwrap();
        let placement = Placement::new(Vec2::new(100.0, 50.0), 400.0);
        let path = set.build_path("T", placement).unwrap();
        assert_eq!(path.sub_paths().len(), 2);
        let start = path.sub_paths()[0].start().unwrap();
        assert!((start - Vec2::new(180.0, 110.0)).length() < 1e-3);
    }

    #[test]
    fn tolerance_scales_with_placement() {
        let set = GlyphSet::from_json(TEST_JSON).unwrap();
        let placement = Placement::new(Vec2::ZERO, 400.0);
        let tol = set.tolerance_for("i", placement).unwrap();
        assert!((tol - 40.0).abs() < 1e-3);
        assert_eq!(set.tolerance_for("T", placement), None);
    }

    #[test]
    fn unknown_and_malformed_glyphs() {
        let set = GlyphSet::from_json(TEST_JSON).unwrap();
        assert!(matches!(
            set.build_path("x", Placement::default()),
            Err(TraceError::UnknownGlyph(_))
        ));
        assert!(matches!(
            set.build_path("bad", Placement::default()),
            Err(TraceError::MalformedSubPath { sub_path: 0, points: 2 })
        ));
    }
}
