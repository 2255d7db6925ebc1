//! Lyon tessellation of a feedback snapshot.
//!
//! Optional convenience for hosts that want a ready-to-upload triangle list
//! instead of drawing [`TraceFeedback`] themselves. Draw order: untraced
//! guide, traced guide, user strokes, markers, cursor.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::{point, Point};
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    LineCap, LineJoin, StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor,
    VertexBuffers,
};

use crate::glyph::path::Marker;
use crate::sampling::sampler::Sample;
use crate::tracking::feedback::TraceFeedback;
use crate::tracking::state::MarkerState;
use crate::api::types::MarkerId;

/// Per-vertex data: position and RGBA color.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn colored(p: Point, color: VectorColor) -> Self {
        Self {
            x: p.x,
            y: p.y,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// RGBA color (0.0 - 1.0 per channel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorColor {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGB u8 values (0-255) with full opacity.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const ORANGE: Self = Self::rgb(1.0, 0.5, 0.0);
    pub const LIGHT_GRAY: Self = Self::rgb(0.75, 0.75, 0.75);
}

/// Widths and colors for the feedback layers.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshStyle {
    pub guide_width: f32,
    pub guide_color: VectorColor,
    pub traced_color: VectorColor,
    pub user_width: f32,
    pub user_color: VectorColor,
    pub cursor_radius: f32,
    pub cursor_color: VectorColor,
    pub marker_color: VectorColor,
    pub marker_touched_color: VectorColor,
}

impl Default for MeshStyle {
    fn default() -> Self {
        Self {
            guide_width: 28.0,
            guide_color: VectorColor::LIGHT_GRAY,
            traced_color: VectorColor::rgb8(120, 200, 255),
            user_width: 10.0,
            user_color: VectorColor::GREEN,
            cursor_radius: 16.0,
            cursor_color: VectorColor::ORANGE,
            marker_color: VectorColor::LIGHT_GRAY.with_alpha(0.8),
            marker_touched_color: VectorColor::rgb8(80, 200, 120),
        }
    }
}

/// Flat-shaded vertex constructor shared by fills and strokes.
struct Solid(VectorColor);

impl FillVertexConstructor<VectorVertex> for Solid {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex::colored(vertex.position(), self.0)
    }
}

impl StrokeVertexConstructor<VectorVertex> for Solid {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex::colored(vertex.position(), self.0)
    }
}

/// Tessellators plus a flat triangle-list buffer, rebuilt per update.
pub struct FeedbackMesh {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
}

impl FeedbackMesh {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(8192 * VectorVertex::FLOATS),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// Flat float view: `FLOATS` per vertex, three vertices per triangle.
    /// Hosts read it through `as_ptr()`.
    pub fn as_floats(&self) -> &[f32] {
        &self.buffer
    }

    /// Replace the buffer contents with the given feedback snapshot.
    pub fn build(
        &mut self,
        feedback: &TraceFeedback<'_>,
        markers: &[Marker],
        marker_state: &MarkerState,
        style: &MeshStyle,
    ) {
        self.clear();

        for run in feedback.path_runs() {
            self.stroke_samples(run, style.guide_width, style.guide_color);
        }
        for run in feedback.guided_runs() {
            self.stroke_samples(run, style.guide_width, style.traced_color);
        }
        for stroke in feedback.user_strokes() {
            self.stroke_polyline(stroke, style.user_width, style.user_color);
        }
        for (i, m) in markers.iter().enumerate() {
            let color = if marker_state.is_touched(MarkerId(i as u32)) {
                style.marker_touched_color
            } else {
                style.marker_color
            };
            self.fill_circle(m.center, m.radius, color);
        }

        if style.cursor_radius > 0.0 {
            let c = feedback.cursor_position;
            let dir = feedback.cursor_direction();
            let side = dir.perp() * style.cursor_radius * 0.6;
            self.fill_circle(c, style.cursor_radius, style.cursor_color);
            // Arrowhead pointing along the tangent.
            let tip = c + dir * style.cursor_radius * 1.8;
            let base = c + dir * style.cursor_radius * 0.8;
            self.fill_polygon(&[tip, base + side, base - side], style.cursor_color);
        }
    }

    /// Unroll the indexed geometry into the triangle list.
    fn flush_geometry(&mut self) {
        let vertices = &self.geometry.vertices;
        for &idx in &self.geometry.indices {
            let vertex = std::slice::from_ref(&vertices[idx as usize]);
            self.buffer.extend_from_slice(bytemuck::cast_slice(vertex));
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn stroke_samples(&mut self, run: &[Sample], width: f32, color: VectorColor) {
        let points: Vec<Vec2> = run.iter().map(|s| s.position).collect();
        self.stroke_polyline(&points, width, color);
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        if points.len() < 2 || width <= 0.0 {
            return;
        }

        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(false);
        let path = builder.build();

        let options = StrokeOptions::tolerance(0.5)
            .with_line_width(width)
            .with_line_cap(LineCap::Round)
            .with_line_join(LineJoin::Round);
        let result = self.stroke_tess.tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut self.geometry, Solid(color)),
        );
        if result.is_ok() {
            self.flush_geometry();
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: VectorColor) {
        if points.len() < 3 {
            return;
        }

        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.close();
        let path = builder.build();
        self.fill_path(&path, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor) {
        if radius <= 0.0 {
            return;
        }

        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, lyon::path::Winding::Positive);
        let path = builder.build();
        self.fill_path(&path, color);
    }

    fn fill_path(&mut self, path: &Path, color: VectorColor) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(0.5),
            &mut BuffersBuilder::new(&mut self.geometry, Solid(color)),
        );
        if result.is_ok() {
            self.flush_geometry();
        }
    }
}

impl Default for FeedbackMesh {
    fn default() -> Self {
        Self::new()
    }
}
