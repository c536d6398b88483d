use tracing::{debug, info};

use crate::topology::{
    Edge, EdgeSet, PathSegment, SegmentArena, SegmentData, SegmentId, VertexIndex,
};

/// How an incoming edge attaches to the segments built so far.
#[derive(Debug, Clone, Copy)]
enum Attachment {
    /// Prepend `vertex` at the head of the segment.
    Head(SegmentId, VertexIndex),
    /// Append `vertex` at the tail of the segment.
    Tail(SegmentId, VertexIndex),
    /// The edge leaves an interior vertex: start a new segment `[from, to]`.
    Branch { from: VertexIndex, to: VertexIndex },
}

/// Which endpoints two open segments share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Junction {
    HeadHead,
    HeadTail,
    TailHead,
    TailTail,
}

impl Junction {
    fn between(a: &SegmentData, b: &SegmentData) -> Option<Self> {
        if a.head() == b.head() {
            Some(Self::HeadHead)
        } else if a.head() == b.tail() {
            Some(Self::HeadTail)
        } else if a.tail() == b.head() {
            Some(Self::TailHead)
        } else if a.tail() == b.tail() {
            Some(Self::TailTail)
        } else {
            None
        }
    }
}

/// Reconstructs ordered path segments from an unordered edge set.
///
/// Every edge ends up in exactly one segment. Where more than two edges meet
/// at a vertex the path is split into several segments rather than rejected,
/// and cycles are detected and flagged as closed.
#[derive(Debug)]
pub struct BuildPaths<'a> {
    edges: &'a EdgeSet,
}

impl<'a> BuildPaths<'a> {
    /// Creates a new `BuildPaths` operation.
    #[must_use]
    pub fn new(edges: &'a EdgeSet) -> Self {
        Self { edges }
    }

    /// Executes the reconstruction.
    ///
    /// Runs a single assignment pass over the edges in input order, then
    /// merges fragments sharing an endpoint until no merge applies.
    #[must_use]
    pub fn execute(&self) -> Vec<PathSegment> {
        let mut arena = SegmentArena::new();

        for edge in self.edges.edges() {
            assign_edge(&mut arena, edge);
        }
        debug!(
            edges = self.edges.len(),
            fragments = arena.len(),
            "initial edge assignment done"
        );

        let mut merges = 0_usize;
        while merge_once(&mut arena) {
            merges += 1;
        }

        let paths = arena.into_paths();
        info!(
            edges = self.edges.len(),
            merges,
            segments = paths.len(),
            closed = paths.iter().filter(|p| p.is_closed()).count(),
            "reconstructed path segments"
        );
        paths
    }
}

/// Attaches a single edge to the arena, starting a new segment when needed.
fn assign_edge(arena: &mut SegmentArena, edge: &Edge) {
    match find_attachment(arena, edge) {
        Some(Attachment::Head(id, vertex)) => {
            if let Some(seg) = arena.get_mut(id) {
                seg.prepend(vertex, edge.id);
            }
        }
        Some(Attachment::Tail(id, vertex)) => {
            if let Some(seg) = arena.get_mut(id) {
                seg.append(vertex, edge.id);
            }
        }
        Some(Attachment::Branch { from, to }) => {
            debug!(vertex = from, edge = %edge.id, "T-section, starting branch segment");
            arena.insert(SegmentData::from_edge(from, to, edge.id));
        }
        None => {
            arena.insert(SegmentData::from_edge(edge.v0, edge.v1, edge.id));
        }
    }
}

/// Finds the first segment, in creation order, that the edge touches.
///
/// Within a segment the head is tested before the tail, and the tail before
/// interior vertices. A segment whose head and tail already coincide has no
/// free ends, so all of its vertices count as interior.
fn find_attachment(arena: &SegmentArena, edge: &Edge) -> Option<Attachment> {
    let ends = [(edge.v0, edge.v1), (edge.v1, edge.v0)];

    for (id, seg) in arena.iter() {
        if seg.has_free_ends() {
            if let Some(&(_, other)) = ends.iter().find(|(v, _)| *v == seg.head()) {
                return Some(Attachment::Head(id, other));
            }
            if let Some(&(_, other)) = ends.iter().find(|(v, _)| *v == seg.tail()) {
                return Some(Attachment::Tail(id, other));
            }
        }

        let shared = ends.iter().find(|(v, _)| {
            if seg.has_free_ends() {
                seg.has_interior(*v)
            } else {
                seg.contains(*v)
            }
        });
        if let Some(&(from, to)) = shared {
            return Some(Attachment::Branch { from, to });
        }
    }
    None
}

/// Performs at most one merge or loop closure. Returns `true` if the arena
/// changed, so the caller restarts from the first segment.
fn merge_once(arena: &mut SegmentArena) -> bool {
    let ids = arena.ids();

    for (i, &a) in ids.iter().enumerate() {
        let Some(seg_a) = arena.get(a) else { continue };
        if seg_a.is_closed() {
            continue;
        }
        if seg_a.is_pending_loop() {
            if let Some(seg) = arena.get_mut(a) {
                seg.close();
                debug!(edges = seg.edge_count(), "closed loop");
            }
            return true;
        }

        for &b in &ids[i + 1..] {
            let Some(seg_b) = arena.get(b) else { continue };
            if !seg_b.has_free_ends() {
                continue;
            }
            if let Some(junction) = Junction::between(seg_a, seg_b) {
                merge(arena, a, b, junction);
                return true;
            }
        }
    }
    false
}

/// Absorbs segment `b` into segment `a` through the given junction.
fn merge(arena: &mut SegmentArena, a: SegmentId, b: SegmentId, junction: Junction) {
    let Some(mut absorbed) = arena.remove(b) else {
        return;
    };
    let Some(target) = arena.get_mut(a) else {
        return;
    };

    match junction {
        Junction::HeadHead => {
            absorbed.reverse();
            target.splice_head(absorbed);
        }
        Junction::HeadTail => target.splice_head(absorbed),
        Junction::TailHead => target.splice_tail(absorbed),
        Junction::TailTail => {
            absorbed.reverse();
            target.splice_tail(absorbed);
        }
    }
    debug!(?junction, edges = target.edge_count(), "merged segments");

    if target.close() {
        debug!(edges = target.edge_count(), "merge closed a loop");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;
    use crate::topology::EdgeId;

    fn build(pairs: &[(VertexIndex, VertexIndex)]) -> Vec<PathSegment> {
        let set = EdgeSet::from_pairs(pairs).unwrap();
        BuildPaths::new(&set).execute()
    }

    /// Checks conservation, uniqueness, and that each segment is a valid walk.
    fn assert_well_formed(pairs: &[(VertexIndex, VertexIndex)], paths: &[PathSegment]) {
        let by_id: HashMap<EdgeId, (VertexIndex, VertexIndex)> = pairs
            .iter()
            .zip(0_u32..)
            .map(|(&pair, id)| (EdgeId(id), pair))
            .collect();

        let mut seen = HashSet::new();
        for path in paths {
            for e in path.edges() {
                assert!(seen.insert(*e), "edge {e} used twice");
            }

            let v = path.vertices();
            let expected_edges = if path.is_closed() { v.len() } else { v.len() - 1 };
            assert_eq!(path.edges().len(), expected_edges);

            for (i, e) in path.edges().iter().enumerate() {
                let a = v[i];
                let b = v[(i + 1) % v.len()];
                let (p, q) = by_id[e];
                assert!(
                    (p, q) == (a, b) || (p, q) == (b, a),
                    "edge {e} does not join {a} and {b}"
                );
            }
        }
        assert_eq!(seen.len(), pairs.len(), "edges dropped");
    }

    fn permutations(items: &[(u32, u32)]) -> Vec<Vec<(u32, u32)>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let first = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, first);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(build(&[]).is_empty());
    }

    #[test]
    fn single_edge() {
        let paths = build(&[(4, 7)]);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].vertices(), &[4, 7]);
        assert!(!paths[0].is_closed());
    }

    #[test]
    fn open_chain_in_any_order() {
        let chain = [(0, 1), (1, 2), (2, 3)];
        for order in permutations(&chain) {
            // Flip edge orientation as well to cover unordered pairs.
            for flip in [false, true] {
                let pairs: Vec<_> = order
                    .iter()
                    .map(|&(a, b)| if flip { (b, a) } else { (a, b) })
                    .collect();
                let paths = build(&pairs);
                assert_eq!(paths.len(), 1, "order {pairs:?}");
                let v = paths[0].vertices();
                assert!(
                    v == [0, 1, 2, 3] || v == [3, 2, 1, 0],
                    "order {pairs:?} gave {v:?}"
                );
                assert_well_formed(&pairs, &paths);
            }
        }
    }

    #[test]
    fn triangle_is_closed_loop() {
        let triangle = [(0, 1), (1, 2), (2, 0)];
        for order in permutations(&triangle) {
            let paths = build(&order);
            assert_eq!(paths.len(), 1);
            let path = &paths[0];
            assert!(path.is_closed());
            assert_eq!(path.vertices().len(), 3);
            let distinct: HashSet<_> = path.vertices().iter().collect();
            assert_eq!(distinct.len(), 3);
            assert_well_formed(&order, &paths);
        }
    }

    #[test]
    fn square_from_two_fragments_closes() {
        // (0,1) and (2,3) start separate fragments; the bridges join them.
        let pairs = [(0, 1), (2, 3), (1, 2), (3, 0)];
        let paths = build(&pairs);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].is_closed());
        assert_eq!(paths[0].vertices().len(), 4);
        assert_well_formed(&pairs, &paths);
    }

    #[test]
    fn head_head_merge_reverses() {
        let pairs = [(1, 2), (3, 4), (3, 1)];
        let paths = build(&pairs);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].vertices(), &[4, 3, 1, 2]);
        assert_eq!(paths[0].edges(), &[EdgeId(1), EdgeId(2), EdgeId(0)]);
    }

    #[test]
    fn tail_tail_merge_reverses() {
        let pairs = [(0, 1), (3, 2), (1, 2)];
        let paths = build(&pairs);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].vertices(), &[0, 1, 2, 3]);
        assert_eq!(paths[0].edges(), &[EdgeId(0), EdgeId(2), EdgeId(1)]);
    }

    #[test]
    fn t_section_starts_new_segment() {
        let pairs = [(0, 1), (1, 2), (1, 3)];
        let paths = build(&pairs);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].vertices(), &[0, 1, 2]);
        assert_eq!(paths[1].vertices(), &[1, 3]);
        assert_well_formed(&pairs, &paths);
    }

    #[test]
    fn crossing_branches_rejoin_through_branch_point() {
        let pairs = [(0, 1), (1, 2), (3, 1), (1, 4)];
        let paths = build(&pairs);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].vertices(), &[0, 1, 2]);
        assert_eq!(paths[1].vertices(), &[4, 1, 3]);
        assert_well_formed(&pairs, &paths);
    }

    #[test]
    fn disconnected_components_stay_separate() {
        let pairs = [(0, 1), (10, 11), (1, 2), (11, 12)];
        let paths = build(&pairs);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].vertices(), &[0, 1, 2]);
        assert_eq!(paths[1].vertices(), &[10, 11, 12]);
    }

    #[test]
    fn loop_with_tail_branch() {
        let pairs = [(0, 1), (1, 2), (2, 0), (2, 5), (5, 6)];
        let paths = build(&pairs);
        assert_well_formed(&pairs, &paths);
        let closed: Vec<_> = paths.iter().filter(|p| p.is_closed()).collect();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].vertices().len(), 3);
        let open: Vec<_> = paths.iter().filter(|p| !p.is_closed()).collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].vertices(), &[2, 5, 6]);
    }

    #[test]
    fn parallel_edges_form_two_point_loop() {
        let set = EdgeSet::new(vec![Edge::new(0, 0, 1), Edge::new(1, 1, 0)]).unwrap();
        let paths = BuildPaths::new(&set).execute();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].is_closed());
        assert_eq!(paths[0].vertices().len(), 2);
        assert_eq!(paths[0].edges().len(), 2);
    }

    #[test]
    fn grid_conserves_every_edge() {
        // 4x4 vertex grid, all horizontal and vertical edges.
        let n = 4_u32;
        let mut pairs = Vec::new();
        for row in 0..n {
            for col in 0..n {
                let v = row * n + col;
                if col + 1 < n {
                    pairs.push((v, v + 1));
                }
                if row + 1 < n {
                    pairs.push((v, v + n));
                }
            }
        }
        let paths = build(&pairs);
        assert_well_formed(&pairs, &paths);
        let total: usize = paths.iter().map(|p| p.edges().len()).sum();
        assert_eq!(total, pairs.len());
    }
}
