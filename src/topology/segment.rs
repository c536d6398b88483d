use std::collections::VecDeque;

use super::edge::{EdgeId, VertexIndex};

slotmap::new_key_type! {
    /// Stable identifier for a path segment under construction.
    pub struct SegmentId;
}

/// A path segment while it is still being assembled.
///
/// Vertices and edge ids are kept in double-ended buffers so the head can be
/// extended as cheaply as the tail. `edges[i]` joins `vertices[i]` and
/// `vertices[i + 1]`; for a closed segment the last edge joins the tail back
/// to the head.
#[derive(Debug, Clone)]
pub struct SegmentData {
    vertices: VecDeque<VertexIndex>,
    edges: VecDeque<EdgeId>,
    closed: bool,
}

impl SegmentData {
    /// Starts a segment from a single edge.
    #[must_use]
    pub fn from_edge(start: VertexIndex, end: VertexIndex, edge: EdgeId) -> Self {
        Self {
            vertices: VecDeque::from([start, end]),
            edges: VecDeque::from([edge]),
            closed: false,
        }
    }

    /// First vertex of the segment.
    #[must_use]
    pub fn head(&self) -> VertexIndex {
        self.vertices[0]
    }

    /// Last vertex of the segment.
    #[must_use]
    pub fn tail(&self) -> VertexIndex {
        self.vertices[self.vertices.len() - 1]
    }

    /// Returns `true` if the segment has been closed into a loop.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns `true` if the head and tail refer to the same vertex but the
    /// segment has not yet been closed.
    #[must_use]
    pub fn is_pending_loop(&self) -> bool {
        !self.closed && self.vertices.len() > 2 && self.head() == self.tail()
    }

    /// Returns `true` if new edges may attach at the head or tail.
    #[must_use]
    pub fn has_free_ends(&self) -> bool {
        !self.closed && !self.is_pending_loop()
    }

    /// Returns `true` if `vertex` occurs strictly between head and tail.
    #[must_use]
    pub fn has_interior(&self, vertex: VertexIndex) -> bool {
        let n = self.vertices.len();
        n > 2 && self.vertices.range(1..n - 1).any(|&v| v == vertex)
    }

    /// Returns `true` if `vertex` occurs anywhere in the segment.
    #[must_use]
    pub fn contains(&self, vertex: VertexIndex) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Number of edges consumed by this segment.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Extends the head with `vertex`, recording `edge` at the head.
    pub fn prepend(&mut self, vertex: VertexIndex, edge: EdgeId) {
        self.vertices.push_front(vertex);
        self.edges.push_front(edge);
    }

    /// Extends the tail with `vertex`, recording `edge` at the tail.
    pub fn append(&mut self, vertex: VertexIndex, edge: EdgeId) {
        self.vertices.push_back(vertex);
        self.edges.push_back(edge);
    }

    /// Reverses point and edge order in place.
    pub fn reverse(&mut self) {
        self.vertices.make_contiguous().reverse();
        self.edges.make_contiguous().reverse();
    }

    /// Splices `other` onto the tail. `other.head()` must equal `self.tail()`.
    pub fn splice_tail(&mut self, other: SegmentData) {
        debug_assert_eq!(self.tail(), other.head());
        self.vertices.extend(other.vertices.into_iter().skip(1));
        self.edges.extend(other.edges);
    }

    /// Splices `other` in front of the head. `other.tail()` must equal `self.head()`.
    pub fn splice_head(&mut self, mut other: SegmentData) {
        debug_assert_eq!(self.head(), other.tail());
        other.vertices.pop_back();
        other.vertices.extend(self.vertices.drain(..));
        other.edges.extend(self.edges.drain(..));
        self.vertices = other.vertices;
        self.edges = other.edges;
    }

    /// Closes a segment whose head and tail coincide, dropping the duplicated
    /// tail point. Returns `false` if head and tail differ.
    pub fn close(&mut self) -> bool {
        if self.vertices.len() < 2 || self.head() != self.tail() {
            return false;
        }
        self.vertices.pop_back();
        self.closed = true;
        true
    }

    /// Freezes the segment into its public, immutable form.
    #[must_use]
    pub fn into_path(self) -> PathSegment {
        PathSegment {
            vertices: self.vertices.into(),
            edges: self.edges.into(),
            closed: self.closed,
        }
    }
}

/// An ordered path reconstructed from an edge set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    vertices: Vec<VertexIndex>,
    edges: Vec<EdgeId>,
    closed: bool,
}

impl PathSegment {
    /// Creates a segment directly from its parts.
    #[must_use]
    pub fn new(vertices: Vec<VertexIndex>, edges: Vec<EdgeId>, closed: bool) -> Self {
        Self {
            vertices,
            edges,
            closed,
        }
    }

    /// Vertex indices from head to tail.
    #[must_use]
    pub fn vertices(&self) -> &[VertexIndex] {
        &self.vertices
    }

    /// Edge ids in traversal order.
    #[must_use]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Whether head and tail are joined into a cycle.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// First vertex, if any.
    #[must_use]
    pub fn head(&self) -> Option<VertexIndex> {
        self.vertices.first().copied()
    }

    /// Last vertex, if any.
    #[must_use]
    pub fn tail(&self) -> Option<VertexIndex> {
        self.vertices.last().copied()
    }
}
