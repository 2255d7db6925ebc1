pub mod path;
pub mod set;

pub use path::{CubicSegment, GlyphPath, Marker, SubPath};
pub use set::{GlyphDef, GlyphSet, MarkerDef, Placement};
