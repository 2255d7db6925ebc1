pub mod proximity;
pub mod sampler;

pub use proximity::{nearest_in_range, Nearest, ProximityIndex};
pub use sampler::{sample, Sample, SampleSequence};
