use std::f64::consts::PI;

use crate::error::{ParameterError, Result};
use crate::math::Point3;

use super::{TubeLattice, TubeLatticeFactory};

/// Parameters controlling the template cylinder.
#[derive(Debug, Clone, Copy)]
pub struct LatticeParams {
    /// Number of vertices around each ring.
    pub radial_segments: usize,
    /// Whether to close both end rings with triangle fans.
    pub capped: bool,
}

impl Default for LatticeParams {
    fn default() -> Self {
        Self {
            radial_segments: 20,
            capped: true,
        }
    }
}

impl LatticeParams {
    /// Sets the number of vertices around each ring.
    #[must_use]
    pub fn with_radial_segments(mut self, radial_segments: usize) -> Self {
        self.radial_segments = radial_segments;
        self
    }

    /// Disables the end-cap faces.
    #[must_use]
    pub fn uncapped(mut self) -> Self {
        self.capped = false;
        self
    }
}

/// Builds template cylinders along local X, centered at the origin, with one
/// subdivision per section and a height equal to the section count.
#[derive(Debug, Clone, Copy, Default)]
pub struct CylinderLatticeFactory {
    params: LatticeParams,
}

impl CylinderLatticeFactory {
    /// Creates a factory with the given parameters.
    #[must_use]
    pub fn new(params: LatticeParams) -> Self {
        Self { params }
    }

    /// Returns the factory parameters.
    #[must_use]
    pub fn params(&self) -> &LatticeParams {
        &self.params
    }

    /// Builds a lattice without requiring a mutable factory.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] if `num_sections` is zero, `radius` is not
    /// positive, or fewer than 3 radial segments are configured.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn build(&self, num_sections: usize, radius: f64) -> Result<TubeLattice> {
        if num_sections == 0 {
            return Err(ParameterError::NoSections.into());
        }
        if radius <= 0.0 || !radius.is_finite() {
            return Err(ParameterError::InvalidRadius(radius).into());
        }
        let n_segs = self.params.radial_segments;
        if n_segs < 3 {
            return Err(ParameterError::TooFewRadialSegments {
                min: 3,
                actual: n_segs,
            }
            .into());
        }

        let n_rings = num_sections + 1;
        let half = num_sections as f64 / 2.0;
        let mut vertices = Vec::with_capacity(n_rings * n_segs);
        let mut indices = Vec::new();

        for ring in 0..n_rings {
            let x = ring as f64 - half;
            for seg in 0..n_segs {
                let angle = 2.0 * PI * (seg as f64) / (n_segs as f64);
                vertices.push(Point3::new(x, radius * angle.cos(), radius * angle.sin()));

                if ring < n_rings - 1 {
                    let curr = (ring * n_segs + seg) as u32;
                    let next_seg = (ring * n_segs + (seg + 1) % n_segs) as u32;
                    let next_ring = ((ring + 1) * n_segs + seg) as u32;
                    let next_both = ((ring + 1) * n_segs + (seg + 1) % n_segs) as u32;

                    indices.push([curr, next_seg, next_ring]);
                    indices.push([next_seg, next_both, next_ring]);
                }
            }
        }

        if self.params.capped {
            add_cap(&mut indices, 0, n_segs, true);
            add_cap(&mut indices, num_sections * n_segs, n_segs, false);
        }

        Ok(TubeLattice::new(vertices, indices, num_sections, radius))
    }
}

impl TubeLatticeFactory for CylinderLatticeFactory {
    fn create_lattice(&mut self, num_sections: usize, radius: f64) -> Result<TubeLattice> {
        self.build(num_sections, radius)
    }
}

/// Closes a ring with a triangle fan anchored at its first vertex.
///
/// No center vertex is added, so every ring keeps the same vertex count.
#[allow(clippy::cast_possible_truncation)]
fn add_cap(indices: &mut Vec<[u32; 3]>, ring_start: usize, n_segs: usize, is_start: bool) {
    let anchor = ring_start as u32;
    for seg in 1..n_segs - 1 {
        let curr = (ring_start + seg) as u32;
        let next = (ring_start + seg + 1) as u32;
        if is_start {
            indices.push([anchor, next, curr]);
        } else {
            indices.push([anchor, curr, next]);
        }
    }
}
