mod cylinder;

pub use cylinder::{CylinderLatticeFactory, LatticeParams};

use crate::error::{Result, TopologyError};
use crate::math::{centroid, Point3};

/// Maximum distance of a vertex's sweep coordinate from an integer ring key.
const RING_KEY_TOLERANCE: f64 = 1e-6;

/// Supplies template tube lattices.
pub trait TubeLatticeFactory {
    /// Creates a template with `num_sections + 1` rings along local X.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot produce a valid lattice.
    fn create_lattice(&mut self, num_sections: usize, radius: f64) -> Result<TubeLattice>;
}

/// A template tube mesh in local space.
///
/// Vertices are arranged in rings along the local X axis. The ring of a
/// vertex is its X coordinate offset by `num_sections / 2`, so rings run
/// from `0` to `num_sections`.
#[derive(Debug, Clone, Default)]
pub struct TubeLattice {
    vertices: Vec<Point3>,
    indices: Vec<[u32; 3]>,
    num_sections: usize,
    radius: f64,
}

impl TubeLattice {
    /// Creates a lattice from raw mesh data.
    #[must_use]
    pub fn new(
        vertices: Vec<Point3>,
        indices: Vec<[u32; 3]>,
        num_sections: usize,
        radius: f64,
    ) -> Self {
        Self {
            vertices,
            indices,
            num_sections,
            radius,
        }
    }

    /// Vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Triangle indices (each triple defines a triangle).
    #[must_use]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// Number of sections the lattice was built for.
    #[must_use]
    pub fn num_sections(&self) -> usize {
        self.num_sections
    }

    /// Radius the template cross-section was built with.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Groups vertex indices by ring.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::LatticeMismatch`] if a vertex has a non-finite
    /// X coordinate or does not sit on an integer ring key in
    /// `0..=num_sections`, if a ring is empty, or if rings differ in size.
    pub fn rings(&self) -> std::result::Result<Vec<Vec<usize>>, TopologyError> {
        #[allow(clippy::cast_precision_loss)]
        let offset = self.num_sections as f64 / 2.0;
        let mut rings = vec![Vec::new(); self.num_sections + 1];

        for (index, p) in self.vertices.iter().enumerate() {
            let key = p.x + offset;
            if !key.is_finite() {
                return Err(TopologyError::LatticeMismatch(format!(
                    "vertex {index} has a non-finite sweep coordinate"
                )));
            }
            let rounded = key.round();
            if (key - rounded).abs() > RING_KEY_TOLERANCE
                || rounded < 0.0
                || rounded > offset * 2.0
            {
                return Err(TopologyError::LatticeMismatch(format!(
                    "vertex {index} at x = {} is not on a ring",
                    p.x
                )));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let ring = rounded as usize;
            rings[ring].push(index);
        }

        let size = rings.first().map_or(0, Vec::len);
        if size == 0 {
            return Err(TopologyError::LatticeMismatch("ring 0 is empty".into()));
        }
        if let Some(bad) = rings.iter().position(|r| r.len() != size) {
            return Err(TopologyError::LatticeMismatch(format!(
                "ring {bad} has {} vertices, expected {size}",
                rings[bad].len()
            )));
        }
        Ok(rings)
    }

    /// Writes deformed positions back into the lattice.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::LatticeMismatch`] if a position refers to a
    /// vertex outside the lattice. The lattice is left untouched in that case.
    pub fn apply(&mut self, positions: &RingPositions) -> std::result::Result<(), TopologyError> {
        if let Some((index, _)) = positions
            .iter()
            .flat_map(|(_, ring)| ring.iter())
            .find(|(index, _)| *index >= self.vertices.len())
        {
            return Err(TopologyError::LatticeMismatch(format!(
                "vertex {index} is out of range"
            )));
        }
        for (_, ring) in positions.iter() {
            for &(index, point) in ring {
                self.vertices[index] = point;
            }
        }
        Ok(())
    }
}

/// World-space vertex positions grouped by ring index.
#[derive(Debug, Clone, Default)]
pub struct RingPositions {
    rings: Vec<Vec<(usize, Point3)>>,
}

impl RingPositions {
    /// Creates ring positions from `(vertex index, point)` lists, one per ring.
    #[must_use]
    pub fn new(rings: Vec<Vec<(usize, Point3)>>) -> Self {
        Self { rings }
    }

    /// Number of rings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    /// Returns `true` if there are no rings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Returns the `(vertex index, point)` pairs of one ring.
    #[must_use]
    pub fn ring(&self, index: usize) -> Option<&[(usize, Point3)]> {
        self.rings.get(index).map(Vec::as_slice)
    }

    /// Iterates rings in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[(usize, Point3)])> {
        self.rings.iter().map(Vec::as_slice).enumerate()
    }

    /// Returns the centroid of one ring's points.
    #[must_use]
    pub fn ring_centroid(&self, index: usize) -> Option<Point3> {
        let points: Vec<Point3> = self.ring(index)?.iter().map(|&(_, p)| p).collect();
        centroid(&points)
    }

    /// Total number of positioned vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }
}
