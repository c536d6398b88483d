use std::collections::HashSet;
use std::fmt;

use crate::error::TopologyError;

/// Index of a vertex in a source mesh.
pub type VertexIndex = u32;

/// Source-assigned identifier of a mesh edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// An unordered pair of vertex indices, identified by its source edge id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Identifier assigned by the source mesh.
    pub id: EdgeId,
    /// First endpoint.
    pub v0: VertexIndex,
    /// Second endpoint.
    pub v1: VertexIndex,
}

impl Edge {
    /// Creates a new edge.
    #[must_use]
    pub fn new(id: u32, v0: VertexIndex, v1: VertexIndex) -> Self {
        Self {
            id: EdgeId(id),
            v0,
            v1,
        }
    }

    /// Returns `true` if `vertex` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, vertex: VertexIndex) -> bool {
        self.v0 == vertex || self.v1 == vertex
    }

    /// Returns the endpoint opposite to `vertex`, if `vertex` is an endpoint.
    #[must_use]
    pub fn other(&self, vertex: VertexIndex) -> Option<VertexIndex> {
        if self.v0 == vertex {
            Some(self.v1)
        } else if self.v1 == vertex {
            Some(self.v0)
        } else {
            None
        }
    }
}

/// A validated, input-ordered collection of edges.
///
/// Self-loop edges and duplicate edge ids are rejected on construction, so
/// path reconstruction can consume the set without further checks.
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    edges: Vec<Edge>,
}

impl EdgeSet {
    /// Validates and wraps the given edges, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::SelfLoop`] if an edge joins a vertex to itself,
    /// or [`TopologyError::DuplicateEdgeId`] if two edges share an id.
    pub fn new(edges: Vec<Edge>) -> Result<Self, TopologyError> {
        let mut seen = HashSet::with_capacity(edges.len());
        for edge in &edges {
            if edge.v0 == edge.v1 {
                return Err(TopologyError::SelfLoop {
                    edge: edge.id.0,
                    vertex: edge.v0,
                });
            }
            if !seen.insert(edge.id) {
                return Err(TopologyError::DuplicateEdgeId(edge.id.0));
            }
        }
        Ok(Self { edges })
    }

    /// Builds an edge set from vertex pairs, numbering edge ids by position.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::SelfLoop`] if a pair repeats the same vertex.
    pub fn from_pairs(pairs: &[(VertexIndex, VertexIndex)]) -> Result<Self, TopologyError> {
        let edges = pairs
            .iter()
            .zip(0_u32..)
            .map(|(&(v0, v1), id)| Edge::new(id, v0, v1))
            .collect();
        Self::new(edges)
    }

    /// Returns the edges in input order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the set holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
