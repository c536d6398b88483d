pub mod generate;
pub mod graph;
pub mod sweep;

pub use generate::{GenerateNoodles, GeneratedTube, NoodleParams, NoodleReport, SegmentFailure};
pub use graph::{BuildPaths, ResolvePath};
pub use sweep::{Frame, SweepFrames};
