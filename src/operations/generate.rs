use std::fmt;

use tracing::{info, warn};

use crate::error::{NoodlerError, ParameterError, Result, SelectionError};
use crate::host::{MeshHost, SourceRef};
use crate::math::{world_up, Vector3, TOLERANCE};
use crate::topology::{EdgeSet, PathSegment, VertexIndex};

use super::graph::{BuildPaths, ResolvePath};
use super::sweep::{Frame, SweepFrames};

/// Parameters for a noodle generation run.
#[derive(Debug, Clone)]
pub struct NoodleParams {
    /// Tube radius.
    pub radius: f64,
    /// Use vertex normals as per-section up hints instead of world-up.
    pub use_normals: bool,
    /// Wrap tubes all the way around closed loops.
    pub close_loops: bool,
    /// Name prefix of generated tubes; previous tubes with this prefix are
    /// deleted at the start of every run.
    pub name_prefix: String,
}

impl Default for NoodleParams {
    fn default() -> Self {
        Self {
            radius: 0.1,
            use_normals: false,
            close_loops: false,
            name_prefix: "pNoodle".to_owned(),
        }
    }
}

impl NoodleParams {
    /// Sets the tube radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Enables vertex normals as up hints.
    #[must_use]
    pub fn with_normals(mut self) -> Self {
        self.use_normals = true;
        self
    }

    /// Enables wrapping around closed loops.
    #[must_use]
    pub fn with_closed_loops(mut self) -> Self {
        self.close_loops = true;
        self
    }

    /// Sets the name prefix of generated tubes.
    #[must_use]
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::InvalidRadius`] if the radius is not positive
    /// and finite.
    pub fn validate(&self) -> std::result::Result<(), ParameterError> {
        if self.radius <= 0.0 || !self.radius.is_finite() {
            return Err(ParameterError::InvalidRadius(self.radius));
        }
        Ok(())
    }
}

/// A tube generated for one path segment.
#[derive(Debug, Clone)]
pub struct GeneratedTube<L> {
    /// Object the edges were selected on.
    pub source: SourceRef,
    /// Index of the segment among the source's reconstructed segments.
    pub segment_index: usize,
    /// The reconstructed path the tube follows.
    pub segment: PathSegment,
    /// Name given to the tube.
    pub name: String,
    /// Tube radius.
    pub radius: f64,
    /// Object the tube is parented under.
    pub parent: SourceRef,
    /// Host handle of the tube lattice.
    pub lattice: L,
}

/// A failure isolated to one segment, or to a whole source when its edge
/// set was rejected before reconstruction.
#[derive(Debug)]
pub struct SegmentFailure {
    /// Object the edges were selected on.
    pub source: SourceRef,
    /// Index of the failing segment, or `None` for the whole source.
    pub segment: Option<usize>,
    /// The error that aborted this segment.
    pub error: NoodlerError,
}

impl fmt::Display for SegmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.segment {
            Some(index) => write!(
                f,
                "{} on {} segment {index}: {}",
                self.error.kind(),
                self.source,
                self.error
            ),
            None => write!(f, "{} on {}: {}", self.error.kind(), self.source, self.error),
        }
    }
}

/// Outcome of a generation run.
#[derive(Debug)]
pub struct NoodleReport<L> {
    /// Tubes that were created, in processing order.
    pub tubes: Vec<GeneratedTube<L>>,
    /// Segments (or sources) that failed.
    pub failures: Vec<SegmentFailure>,
    /// Number of previously generated tubes deleted before the run.
    pub deleted: usize,
}

impl<L> NoodleReport<L> {
    /// Returns `true` if every segment produced a tube.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Turns the host's edge selections into tubes, one per path segment.
///
/// Each selected source is reconstructed into path segments and every
/// segment is swept independently: a failure aborts only that segment and is
/// recorded in the report, and any lattice already created for it is deleted.
#[derive(Debug, Default)]
pub struct GenerateNoodles {
    params: NoodleParams,
}

impl GenerateNoodles {
    /// Creates a new generation run.
    #[must_use]
    pub fn new(params: NoodleParams) -> Self {
        Self { params }
    }

    /// Executes the run against `host`.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures affecting the whole run: invalid
    /// parameters (checked before the host is touched), failure to delete
    /// previous tubes, or an empty selection. Per-segment failures are
    /// reported in [`NoodleReport::failures`].
    pub fn execute<H: MeshHost>(&self, host: &mut H) -> Result<NoodleReport<H::Lattice>> {
        self.params.validate()?;

        let deleted = host.delete_generated_tubes(&format!("{}*", self.params.name_prefix))?;
        let selections = host.selected_edge_sets()?;

        let mut report = NoodleReport {
            tubes: Vec::new(),
            failures: Vec::new(),
            deleted,
        };

        for (source, edges) in selections {
            if edges.is_empty() {
                record_failure(
                    &mut report.failures,
                    source.clone(),
                    None,
                    SelectionError::NoEdges(source.to_string()).into(),
                );
                continue;
            }
            let edge_set = match EdgeSet::new(edges) {
                Ok(set) => set,
                Err(err) => {
                    record_failure(&mut report.failures, source, None, err.into());
                    continue;
                }
            };

            let segments = BuildPaths::new(&edge_set).execute();
            for (index, segment) in segments.into_iter().enumerate() {
                let name = format!("{}{}", self.params.name_prefix, report.tubes.len() + 1);
                match self.generate_tube(host, &source, &segment, &name) {
                    Ok(lattice) => {
                        info!(%source, segment = index, %name, "generated tube");
                        report.tubes.push(GeneratedTube {
                            source: source.clone(),
                            segment_index: index,
                            segment,
                            name,
                            radius: self.params.radius,
                            parent: source.clone(),
                            lattice,
                        });
                    }
                    Err(err) => {
                        record_failure(&mut report.failures, source.clone(), Some(index), err);
                    }
                }
            }
        }

        info!(
            tubes = report.tubes.len(),
            failures = report.failures.len(),
            deleted = report.deleted,
            "noodle generation finished"
        );
        Ok(report)
    }

    /// Builds one tube. Everything that can fail without touching the host
    /// runs before the lattice is created.
    fn generate_tube<H: MeshHost>(
        &self,
        host: &mut H,
        source: &SourceRef,
        segment: &PathSegment,
        name: &str,
    ) -> Result<H::Lattice> {
        let points = ResolvePath::new(segment)
            .close_loop(self.params.close_loops)
            .execute(|v| host.vertex_position(source, v))?;

        let mut sweep = SweepFrames::new(points, self.params.radius);
        if self.params.use_normals {
            let ups = self.up_hints(host, source, segment)?;
            sweep = sweep.with_up_vectors(ups);
        }
        let frames = sweep.compute_frames()?;

        let handle = host.create_tube_lattice(name, sweep.num_sections(), self.params.radius)?;
        if let Err(err) = place_lattice(host, handle, &sweep, &frames, source) {
            if let Err(cleanup) = host.delete_lattice(handle) {
                warn!(%name, error = %cleanup, "failed to delete tube after error");
            }
            return Err(err);
        }
        Ok(handle)
    }

    /// Per-section up hints: the normalized sum of the normals at both ends of
    /// each section, or world-up where they cancel.
    fn up_hints<H: MeshHost>(
        &self,
        host: &H,
        source: &SourceRef,
        segment: &PathSegment,
    ) -> Result<Vec<Vector3>> {
        let mut indices: Vec<VertexIndex> = segment.vertices().to_vec();
        if self.params.close_loops && segment.is_closed() {
            if let Some(&head) = indices.first() {
                indices.push(head);
            }
        }

        let normals = indices
            .iter()
            .map(|&v| host.vertex_normal(source, v))
            .collect::<Result<Vec<_>>>()?;

        Ok(normals
            .windows(2)
            .map(|pair| {
                (pair[0] + pair[1])
                    .try_normalize(TOLERANCE)
                    .unwrap_or_else(world_up)
            })
            .collect())
    }
}

/// Deforms a freshly created lattice and parents it under its source.
fn place_lattice<H: MeshHost>(
    host: &mut H,
    handle: H::Lattice,
    sweep: &SweepFrames,
    frames: &[Frame],
    source: &SourceRef,
) -> Result<()> {
    let positions = sweep.deform(frames, host.lattice(handle)?)?;
    host.set_lattice_vertex_positions(handle, &positions)?;
    host.attach_to_parent(handle, source)
}

fn record_failure(
    failures: &mut Vec<SegmentFailure>,
    source: SourceRef,
    segment: Option<usize>,
    error: NoodlerError,
) {
    let failure = SegmentFailure {
        source,
        segment,
        error,
    };
    warn!(%failure, "tube generation failed");
    failures.push(failure);
}
