mod memory;

pub use memory::{GeneratedLattice, LatticeId, MemoryHost, SourceMesh};

use std::fmt;

use crate::error::Result;
use crate::lattice::{RingPositions, TubeLattice};
use crate::math::{Point3, Vector3};
use crate::topology::{Edge, VertexIndex};

/// Reference to a source object (mesh) in the host scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRef(pub String);

impl SourceRef {
    /// Creates a reference from an object name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scene access needed to turn edge selections into tubes.
///
/// Implementations wrap whatever application owns the meshes. The noodle
/// generator only reads selections and vertex data through this trait and
/// only creates, deforms, parents and deletes its own tube lattices.
pub trait MeshHost {
    /// Handle to a tube lattice created by this host.
    type Lattice: Copy + fmt::Debug;

    /// Returns one edge list per source object that has an edge selection.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::SelectionError`] if nothing is selected.
    fn selected_edge_sets(&self) -> Result<Vec<(SourceRef, Vec<Edge>)>>;

    /// Returns the world-space position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the source or vertex does not exist.
    fn vertex_position(&self, source: &SourceRef, vertex: VertexIndex) -> Result<Point3>;

    /// Returns the normal of a vertex, used as an up hint.
    ///
    /// # Errors
    ///
    /// Returns an error if the source or vertex does not exist.
    fn vertex_normal(&self, source: &SourceRef, vertex: VertexIndex) -> Result<Vector3>;

    /// Creates a named template tube lattice with `num_sections + 1` rings.
    ///
    /// # Errors
    ///
    /// Returns an error if the lattice cannot be created.
    fn create_tube_lattice(
        &mut self,
        name: &str,
        num_sections: usize,
        radius: f64,
    ) -> Result<Self::Lattice>;

    /// Returns the current geometry of a lattice.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown.
    fn lattice(&self, handle: Self::Lattice) -> Result<&TubeLattice>;

    /// Writes deformed vertex positions into a lattice.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown or the positions do not fit.
    fn set_lattice_vertex_positions(
        &mut self,
        handle: Self::Lattice,
        positions: &RingPositions,
    ) -> Result<()>;

    /// Parents a lattice under a source object.
    ///
    /// # Errors
    ///
    /// Returns an error if either object is unknown.
    fn attach_to_parent(&mut self, handle: Self::Lattice, parent: &SourceRef) -> Result<()>;

    /// Deletes a single lattice.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown.
    fn delete_lattice(&mut self, handle: Self::Lattice) -> Result<()>;

    /// Deletes every generated tube whose name matches `name_pattern`
    /// (a trailing `*` matches any suffix) and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot delete objects.
    fn delete_generated_tubes(&mut self, name_pattern: &str) -> Result<usize>;
}

/// Matches `name` against a pattern with an optional trailing `*` wildcard.
#[must_use]
pub fn matches_name_pattern(name: &str, pattern: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => name.starts_with(prefix),
        None => name == pattern,
    }
}
