use slotmap::SlotMap;
use tracing::debug;

use crate::error::{Result, SelectionError, TopologyError};
use crate::lattice::{CylinderLatticeFactory, RingPositions, TubeLattice, TubeLatticeFactory};
use crate::math::{Point3, Vector3};
use crate::topology::{Edge, VertexIndex};

use super::{matches_name_pattern, MeshHost, SourceRef};

slotmap::new_key_type! {
    /// Unique identifier for a tube lattice held by a [`MemoryHost`].
    pub struct LatticeId;
}

/// A source mesh: vertex data plus the current edge selection.
#[derive(Debug, Clone, Default)]
pub struct SourceMesh {
    /// Vertex positions, indexed by [`VertexIndex`].
    pub positions: Vec<Point3>,
    /// Vertex normals; may be empty if the mesh has none.
    pub normals: Vec<Vector3>,
    /// Selected edges, in selection order.
    pub selected_edges: Vec<Edge>,
}

impl SourceMesh {
    /// Creates a mesh with positions only.
    #[must_use]
    pub fn new(positions: Vec<Point3>) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }

    /// Sets the vertex normals.
    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Vector3>) -> Self {
        self.normals = normals;
        self
    }
}

/// A tube lattice created through a [`MemoryHost`].
#[derive(Debug, Clone)]
pub struct GeneratedLattice {
    /// Object name, e.g. `pNoodle1`.
    pub name: String,
    /// Current geometry.
    pub lattice: TubeLattice,
    /// Source object the lattice is parented under, if any.
    pub parent: Option<SourceRef>,
}

/// An in-memory scene implementing [`MeshHost`].
///
/// Source meshes are kept in insertion order; generated lattices live in a
/// slot map so handles stay valid while other lattices are deleted. Templates
/// come from `F`, the default cylinder unless another factory is supplied.
#[derive(Debug, Default)]
pub struct MemoryHost<F = CylinderLatticeFactory> {
    sources: Vec<(SourceRef, SourceMesh)>,
    lattices: SlotMap<LatticeId, GeneratedLattice>,
    factory: F,
}

impl MemoryHost {
    /// Creates an empty scene using the default template cylinder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: TubeLatticeFactory> MemoryHost<F> {
    /// Creates an empty scene with a custom template factory.
    #[must_use]
    pub fn with_factory(factory: F) -> Self {
        Self {
            sources: Vec::new(),
            lattices: SlotMap::with_key(),
            factory,
        }
    }

    /// Returns the template factory.
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Adds a source mesh and returns its reference.
    pub fn add_source(&mut self, name: impl Into<String>, mesh: SourceMesh) -> SourceRef {
        let source = SourceRef::new(name);
        self.sources.push((source.clone(), mesh));
        source
    }

    /// Replaces the edge selection of a source mesh.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::UnknownSource`] if the source does not exist.
    pub fn select_edges(&mut self, source: &SourceRef, edges: Vec<Edge>) -> Result<()> {
        self.source_mut(source)?.selected_edges = edges;
        Ok(())
    }

    /// Clears every edge selection.
    pub fn clear_selection(&mut self) {
        for (_, mesh) in &mut self.sources {
            mesh.selected_edges.clear();
        }
    }

    /// Returns a generated lattice by handle.
    #[must_use]
    pub fn generated(&self, handle: LatticeId) -> Option<&GeneratedLattice> {
        self.lattices.get(handle)
    }

    /// Iterates generated lattices.
    pub fn generated_lattices(&self) -> impl Iterator<Item = (LatticeId, &GeneratedLattice)> {
        self.lattices.iter()
    }

    /// Number of generated lattices currently in the scene.
    #[must_use]
    pub fn lattice_count(&self) -> usize {
        self.lattices.len()
    }

    fn source(&self, source: &SourceRef) -> Result<&SourceMesh> {
        self.sources
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, mesh)| mesh)
            .ok_or_else(|| SelectionError::UnknownSource(source.to_string()).into())
    }

    fn source_mut(&mut self, source: &SourceRef) -> Result<&mut SourceMesh> {
        self.sources
            .iter_mut()
            .find(|(s, _)| s == source)
            .map(|(_, mesh)| mesh)
            .ok_or_else(|| SelectionError::UnknownSource(source.to_string()).into())
    }

    fn generated_mut(&mut self, handle: LatticeId) -> Result<&mut GeneratedLattice> {
        self.lattices
            .get_mut(handle)
            .ok_or_else(|| TopologyError::LatticeNotFound.into())
    }
}

impl<F: TubeLatticeFactory> MeshHost for MemoryHost<F> {
    type Lattice = LatticeId;

    fn selected_edge_sets(&self) -> Result<Vec<(SourceRef, Vec<Edge>)>> {
        let sets: Vec<_> = self
            .sources
            .iter()
            .filter(|(_, mesh)| !mesh.selected_edges.is_empty())
            .map(|(source, mesh)| (source.clone(), mesh.selected_edges.clone()))
            .collect();
        if sets.is_empty() {
            return Err(SelectionError::NothingSelected.into());
        }
        Ok(sets)
    }

    fn vertex_position(&self, source: &SourceRef, vertex: VertexIndex) -> Result<Point3> {
        let mesh = self.source(source)?;
        usize::try_from(vertex)
            .ok()
            .and_then(|i| mesh.positions.get(i))
            .copied()
            .ok_or_else(|| TopologyError::VertexNotFound(vertex).into())
    }

    fn vertex_normal(&self, source: &SourceRef, vertex: VertexIndex) -> Result<Vector3> {
        let mesh = self.source(source)?;
        usize::try_from(vertex)
            .ok()
            .and_then(|i| mesh.normals.get(i))
            .copied()
            .ok_or_else(|| TopologyError::VertexNotFound(vertex).into())
    }

    fn create_tube_lattice(
        &mut self,
        name: &str,
        num_sections: usize,
        radius: f64,
    ) -> Result<LatticeId> {
        let lattice = self.factory.create_lattice(num_sections, radius)?;
        let handle = self.lattices.insert(GeneratedLattice {
            name: name.to_owned(),
            lattice,
            parent: None,
        });
        debug!(name, num_sections, "created tube lattice");
        Ok(handle)
    }

    fn lattice(&self, handle: LatticeId) -> Result<&TubeLattice> {
        self.lattices
            .get(handle)
            .map(|g| &g.lattice)
            .ok_or_else(|| TopologyError::LatticeNotFound.into())
    }

    fn set_lattice_vertex_positions(
        &mut self,
        handle: LatticeId,
        positions: &RingPositions,
    ) -> Result<()> {
        self.generated_mut(handle)?.lattice.apply(positions)?;
        Ok(())
    }

    fn attach_to_parent(&mut self, handle: LatticeId, parent: &SourceRef) -> Result<()> {
        self.source(parent)?;
        self.generated_mut(handle)?.parent = Some(parent.clone());
        Ok(())
    }

    fn delete_lattice(&mut self, handle: LatticeId) -> Result<()> {
        self.lattices
            .remove(handle)
            .map(|_| ())
            .ok_or_else(|| TopologyError::LatticeNotFound.into())
    }

    fn delete_generated_tubes(&mut self, name_pattern: &str) -> Result<usize> {
        let before = self.lattices.len();
        self.lattices
            .retain(|_, g| !matches_name_pattern(&g.name, name_pattern));
        let removed = before - self.lattices.len();
        if removed > 0 {
            debug!(removed, name_pattern, "deleted generated tubes");
        }
        Ok(removed)
    }
}
