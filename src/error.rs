use std::fmt;

use thiserror::Error;

/// Top-level error type for noodle generation.
#[derive(Debug, Error)]
pub enum NoodlerError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("path needs at least 2 points, got {points}")]
    PathTooShort { points: usize },

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl NoodlerError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Selection(_) => ErrorKind::Selection,
            Self::Topology(_) => ErrorKind::Topology,
            Self::PathTooShort { .. } => ErrorKind::PathTooShort,
            Self::Parameter(_) => ErrorKind::Parameter,
            Self::Geometry(_) => ErrorKind::Geometry,
        }
    }
}

/// Coarse classification of a [`NoodlerError`], used when reporting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Selection,
    Topology,
    PathTooShort,
    Parameter,
    Geometry,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Selection => "SelectionError",
            Self::Topology => "TopologyError",
            Self::PathTooShort => "PathTooShortError",
            Self::Parameter => "ParameterError",
            Self::Geometry => "GeometryError",
        };
        f.write_str(name)
    }
}

/// Errors raised at the host selection boundary.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("nothing is selected")]
    NothingSelected,

    #[error("selection on {0} contains no edges")]
    NoEdges(String),

    #[error("unknown source object: {0}")]
    UnknownSource(String),
}

/// Errors related to edge-graph and lattice topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("edge {edge} is a self-loop on vertex {vertex}")]
    SelfLoop { edge: u32, vertex: u32 },

    #[error("edge id {0} appears more than once")]
    DuplicateEdgeId(u32),

    #[error("path segment has no edges")]
    EmptySegment,

    #[error("vertex {0} not found")]
    VertexNotFound(u32),

    #[error("lattice not found")]
    LatticeNotFound,

    #[error("template lattice does not match the path: {0}")]
    LatticeMismatch(String),
}

/// Errors caused by invalid caller-supplied parameters.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("expected {expected} up vectors (one per section), got {actual}")]
    UpVectorCount { expected: usize, actual: usize },

    #[error("radial segments must be at least {min}, got {actual}")]
    TooFewRadialSegments { min: usize, actual: usize },

    #[error("a tube lattice needs at least one section")]
    NoSections,
}

/// Errors raised while computing frames along a path.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("section {section} has zero length")]
    ZeroLengthSection { section: usize },

    #[error("frame at section {section} is ill-defined: {reason}")]
    IllDefinedFrame {
        section: usize,
        reason: &'static str,
    },
}

/// Convenience type alias for results using [`NoodlerError`].
pub type Result<T> = std::result::Result<T, NoodlerError>;
