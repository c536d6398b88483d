pub mod edge;
pub mod segment;

pub use edge::{Edge, EdgeId, EdgeSet, VertexIndex};
pub use segment::{PathSegment, SegmentData, SegmentId};

use slotmap::SlotMap;

/// Arena that owns the path segments of a single reconstruction.
///
/// Segments reference each other only via [`SegmentId`]s (generational
/// indices). Iteration follows slot order, which equals creation order as
/// long as no segment is inserted after one has been removed.
#[derive(Debug, Default)]
pub struct SegmentArena {
    segments: SlotMap<SegmentId, SegmentData>,
}

impl SegmentArena {
    /// Creates a new, empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a segment and returns its ID.
    pub fn insert(&mut self, data: SegmentData) -> SegmentId {
        self.segments.insert(data)
    }

    /// Returns a reference to the segment, if it is still alive.
    #[must_use]
    pub fn get(&self, id: SegmentId) -> Option<&SegmentData> {
        self.segments.get(id)
    }

    /// Returns a mutable reference to the segment, if it is still alive.
    pub fn get_mut(&mut self, id: SegmentId) -> Option<&mut SegmentData> {
        self.segments.get_mut(id)
    }

    /// Removes a segment, returning its data.
    pub fn remove(&mut self, id: SegmentId) -> Option<SegmentData> {
        self.segments.remove(id)
    }

    /// Returns the live segment ids in creation order.
    #[must_use]
    pub fn ids(&self) -> Vec<SegmentId> {
        self.segments.keys().collect()
    }

    /// Iterates live segments in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &SegmentData)> {
        self.segments.iter()
    }

    /// Returns the number of live segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the arena holds no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Consumes the arena, returning frozen segments in creation order.
    #[must_use]
    pub fn into_paths(self) -> Vec<PathSegment> {
        self.segments
            .into_iter()
            .map(|(_, data)| data.into_path())
            .collect()
    }
}
