use crate::error::{NoodlerError, Result, TopologyError};
use crate::math::Point3;
use crate::topology::{PathSegment, VertexIndex};

/// Maps a path segment's vertex indices to an ordered list of points.
#[derive(Debug)]
pub struct ResolvePath<'a> {
    segment: &'a PathSegment,
    close_loop: bool,
}

impl<'a> ResolvePath<'a> {
    /// Creates a new `ResolvePath` operation.
    #[must_use]
    pub fn new(segment: &'a PathSegment) -> Self {
        Self {
            segment,
            close_loop: false,
        }
    }

    /// When enabled, a closed segment repeats its head point at the end so a
    /// sweep wraps all the way around the loop.
    #[must_use]
    pub fn close_loop(mut self, close_loop: bool) -> Self {
        self.close_loop = close_loop;
        self
    }

    /// Executes the resolution, looking up each vertex in order.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EmptySegment`] if the segment has no edges,
    /// [`NoodlerError::PathTooShort`] if fewer than 2 points result, or any
    /// error produced by `lookup`.
    pub fn execute<F>(&self, lookup: F) -> Result<Vec<Point3>>
    where
        F: Fn(VertexIndex) -> Result<Point3>,
    {
        if self.segment.edges().is_empty() {
            return Err(TopologyError::EmptySegment.into());
        }

        let vertices = self.segment.vertices();
        let mut points = Vec::with_capacity(vertices.len() + 1);
        for &v in vertices {
            points.push(lookup(v)?);
        }

        if self.close_loop && self.segment.is_closed() {
            if let Some(&first) = points.first() {
                points.push(first);
            }
        }

        if points.len() < 2 {
            return Err(NoodlerError::PathTooShort {
                points: points.len(),
            });
        }
        Ok(points)
    }
}
