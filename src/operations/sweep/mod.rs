mod frame;

pub use frame::Frame;

use tracing::debug;

use crate::error::{NoodlerError, ParameterError, Result, TopologyError};
use crate::lattice::{RingPositions, TubeLattice};
use crate::math::{transform_point, world_up, Point3, Vector3, TOLERANCE};

/// Sweeps a template tube lattice along an ordered list of points.
///
/// Each section between consecutive points gets a frame; ring `s` of the
/// template is placed at `points[s]` using the average of the frames of
/// sections `s - 1` and `s`. The last ring is a cap placed at the final point.
#[derive(Debug)]
pub struct SweepFrames {
    points: Vec<Point3>,
    radius: f64,
    up_vectors: Option<Vec<Vector3>>,
}

impl SweepFrames {
    /// Creates a new sweep along `points` with the given tube radius.
    #[must_use]
    pub fn new(points: Vec<Point3>, radius: f64) -> Self {
        Self {
            points,
            radius,
            up_vectors: None,
        }
    }

    /// Supplies one up hint per section instead of world-up.
    #[must_use]
    pub fn with_up_vectors(mut self, up_vectors: Vec<Vector3>) -> Self {
        self.up_vectors = Some(up_vectors);
        self
    }

    /// Number of sections (`points.len() - 1`).
    #[must_use]
    pub fn num_sections(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Checks the sweep preconditions and returns the section count.
    ///
    /// # Errors
    ///
    /// Returns [`NoodlerError::PathTooShort`] for fewer than 2 points, or a
    /// [`ParameterError`] for a bad radius or up-vector count.
    pub fn validate(&self) -> Result<usize> {
        if self.points.len() < 2 {
            return Err(NoodlerError::PathTooShort {
                points: self.points.len(),
            });
        }
        if self.radius <= 0.0 || !self.radius.is_finite() {
            return Err(ParameterError::InvalidRadius(self.radius).into());
        }
        let num_sections = self.num_sections();
        if let Some(ups) = &self.up_vectors {
            if ups.len() != num_sections {
                return Err(ParameterError::UpVectorCount {
                    expected: num_sections,
                    actual: ups.len(),
                }
                .into());
            }
        }
        Ok(num_sections)
    }

    /// Computes the raw, unsmoothed frame of every section.
    ///
    /// A section whose up hint is parallel to it falls back to a world axis
    /// and is then rolled so its `right` axis bisects the `right` axes of the
    /// nearest hinted sections before and after it. If those two cancel, the
    /// section's own `forward × previous right` is used instead.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`Self::validate`], or a
    /// [`crate::error::GeometryError`] naming the first degenerate section.
    pub fn section_frames(&self) -> Result<Vec<Frame>> {
        let num_sections = self.validate()?;
        let mut frames = Vec::with_capacity(num_sections);
        let mut hinted = Vec::with_capacity(num_sections);
        for s in 0..num_sections {
            let up = self
                .up_vectors
                .as_ref()
                .map_or_else(world_up, |ups| ups[s]);
            let direction = self.points[s + 1] - self.points[s];
            let (frame, fell_back) =
                Frame::looking_along_tracked(self.points[s], direction, up, s)?;
            if !fell_back {
                hinted.push(s);
            }
            frames.push(frame);
        }

        for s in 0..num_sections {
            let at = hinted.partition_point(|&h| h < s);
            if hinted.get(at) == Some(&s) {
                continue;
            }
            let previous = at.checked_sub(1).map(|i| frames[hinted[i]]);
            let next = hinted.get(at).map(|&i| frames[i]);
            let target = match (previous, next) {
                (Some(a), Some(b)) => {
                    let bisector = a.right + b.right;
                    if bisector.norm() > TOLERANCE {
                        bisector
                    } else {
                        frames[s].forward.cross(&a.right)
                    }
                }
                (Some(a), None) => a.right,
                (None, Some(b)) => b.right,
                // No hinted section at all; follow the previous fallback.
                (None, None) if s > 0 => frames[s - 1].right,
                (None, None) => continue,
            };
            frames[s] = frames[s].rolled_toward(&target);
        }
        Ok(frames)
    }

    /// Computes the frame used for every ring: one smoothed frame per
    /// section followed by the cap frame.
    ///
    /// # Errors
    ///
    /// Same as [`Self::section_frames`], plus a
    /// [`crate::error::GeometryError`] if two adjacent frames cancel out.
    pub fn compute_frames(&self) -> Result<Vec<Frame>> {
        let raw = self.section_frames()?;
        let num_sections = raw.len();
        let mut frames = Vec::with_capacity(num_sections + 1);

        for (s, frame) in raw.iter().enumerate() {
            if s == 0 {
                frames.push(*frame);
            } else {
                frames.push(frame.blended_with(&raw[s - 1], s)?);
            }
        }

        // The cap has no following section, so it reuses the last raw
        // forward with world-up.
        let last = &raw[num_sections - 1];
        let end = self.points[num_sections];
        let (cap, fell_back) =
            Frame::looking_along_tracked(end, last.forward, world_up(), num_sections)?;
        frames.push(if fell_back { cap.rolled_toward(&last.right) } else { cap });

        debug!(sections = num_sections, "computed sweep frames");
        Ok(frames)
    }

    /// Executes the sweep, returning world-space positions for every template
    /// vertex grouped by ring.
    ///
    /// Each vertex is projected onto the template's cross-sectional plane,
    /// scaled from the template radius to the sweep radius, and mapped by its
    /// ring's frame. Nothing is returned unless every ring succeeds.
    ///
    /// # Errors
    ///
    /// Same as [`Self::compute_frames`], plus [`TopologyError::LatticeMismatch`]
    /// if the template's rings do not match the path.
    pub fn execute(&self, template: &TubeLattice) -> Result<RingPositions> {
        let frames = self.compute_frames()?;
        self.deform(&frames, template)
    }

    /// Maps the template through frames previously returned by
    /// [`Self::compute_frames`].
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::LatticeMismatch`] if the template's rings do
    /// not match the frames, or [`ParameterError::InvalidRadius`] if the
    /// template radius is unusable.
    pub fn deform(&self, frames: &[Frame], template: &TubeLattice) -> Result<RingPositions> {
        let rings = template.rings()?;
        if rings.len() != frames.len() {
            return Err(TopologyError::LatticeMismatch(format!(
                "template has {} rings, path needs {}",
                rings.len(),
                frames.len()
            ))
            .into());
        }
        if template.radius() <= 0.0 || !template.radius().is_finite() {
            return Err(ParameterError::InvalidRadius(template.radius()).into());
        }

        let scale = self.radius / template.radius();
        let vertices = template.vertices();
        let positioned: Vec<Vec<(usize, Point3)>> = rings
            .iter()
            .zip(frames)
            .map(|(ring, frame)| {
                let matrix = frame.to_matrix();
                ring.iter()
                    .map(|&index| {
                        let p = vertices[index];
                        let local = Point3::new(0.0, p.y * scale, p.z * scale);
                        (index, transform_point(&matrix, &local))
                    })
                    .collect()
            })
            .collect();

        Ok(RingPositions::new(positioned))
    }
}
