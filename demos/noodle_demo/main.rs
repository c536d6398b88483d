//! Noodle demo: builds a small grid mesh in memory, selects a branching edge
//! path and a loop, and sweeps tubes along them.
//!
//! Usage:
//! ```text
//! cargo run --example noodle_demo
//! RUST_LOG=noodler=debug cargo run --example noodle_demo
//! ```

use noodler::host::{MemoryHost, MeshHost, SourceMesh};
use noodler::math::{Point3, Vector3};
use noodler::operations::{GenerateNoodles, NoodleParams};
use noodler::topology::Edge;

/// Vertex index of `(row, col)` on an `n x n` grid.
fn at(n: u32, row: u32, col: u32) -> u32 {
    row * n + col
}

fn grid(n: u32) -> SourceMesh {
    let mut positions = Vec::new();
    for row in 0..n {
        for col in 0..n {
            positions.push(Point3::new(f64::from(col), 0.0, f64::from(row)));
        }
    }
    let count = positions.len();
    SourceMesh::new(positions).with_normals(vec![Vector3::y(); count])
}

fn main() -> noodler::Result<()> {
    // Default: WARN for everything, INFO for noodler.
    // Override with RUST_LOG env var (e.g. RUST_LOG=noodler=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("noodle_demo=info".parse().unwrap_or_default())
        .add_directive("noodler=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let n = 5;
    let mut host = MemoryHost::new();
    let plane = host.add_source("pPlane1", grid(n));
    let second = host.add_source("pPlane2", grid(n));

    // A T: the top row, plus a column dropping from its middle.
    let mut pairs = Vec::new();
    for col in 0..n - 1 {
        pairs.push((at(n, 0, col), at(n, 0, col + 1)));
    }
    for row in 0..n - 1 {
        pairs.push((at(n, row, 2), at(n, row + 1, 2)));
    }
    let t_edges = pairs
        .iter()
        .zip(0_u32..)
        .map(|(&(a, b), id)| Edge::new(id, a, b))
        .collect();
    host.select_edges(&plane, t_edges)?;

    // A square loop, listed out of order.
    let ring = [(1, 1, 1, 2), (2, 2, 2, 1), (1, 2, 2, 2), (2, 1, 1, 1)];
    let loop_edges = ring
        .iter()
        .zip(100_u32..)
        .map(|(&(r0, c0, r1, c1), id)| Edge::new(id, at(n, r0, c0), at(n, r1, c1)))
        .collect();
    host.select_edges(&second, loop_edges)?;

    let params = NoodleParams::default().with_radius(0.05).with_closed_loops();
    let report = GenerateNoodles::new(params).execute(&mut host)?;

    for tube in &report.tubes {
        let lattice = host.lattice(tube.lattice)?;
        tracing::info!(
            name = %tube.name,
            parent = %tube.parent,
            vertices = ?tube.segment.vertices(),
            closed = tube.segment.is_closed(),
            lattice_vertices = lattice.vertices().len(),
            "tube"
        );
    }
    for failure in &report.failures {
        tracing::warn!(%failure, "failed");
    }
    Ok(())
}
