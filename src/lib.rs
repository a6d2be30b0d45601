//! Voxelization of triangle meshes and batching of the resulting cubes into
//! one renderable mesh.
//!
//! The pipeline has two halves:
//! - [`voxelize`]: rasterizes every triangle onto a uniform grid with a
//!   separating-axis intersection test, sampling color and UV per occupied
//!   cell. Triangles rasterize in parallel; the merge is deterministic and the
//!   first triangle to claim a cell keeps it.
//! - [`build_batch_mesh`]: expands each occupied cell into a 24-vertex,
//!   36-index cube stamped from a shared [`CubeTemplate`], producing a single
//!   vertex/index buffer pair for the whole grid.
//!
//! [`Voxelizer`] wires the two together behind a small config. Two alternative
//! occupancy strategies are included: [`probe_voxelize`] (six-direction ray
//! probing of grid sample points) and [`scatter_voxelize`] (append-buffer
//! rasterization with a bounded output). Batched meshes can be dumped as
//! ASCII PLY for inspection.
//!
//! # Example Code
//!
//! ```
//! use mesh2voxel::ilattice::glam::{Vec2, Vec3};
//! use mesh2voxel::{build_batch_mesh, voxelize, CubeTemplate, Triangle};
//!
//! // One triangle spanning a few voxels.
//! let tri = Triangle::new(
//!     [
//!         Vec3::ZERO,
//!         Vec3::new(2.0, 0.0, 0.0),
//!         Vec3::new(0.0, 2.0, 0.0),
//!     ],
//!     [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
//! );
//!
//! let voxel_size = 0.5;
//! let cubes = voxelize(&[tri], voxel_size, None).cube_data(voxel_size);
//! assert!(!cubes.is_empty());
//!
//! let template = CubeTemplate::with_edge_length(voxel_size);
//! let mesh = build_batch_mesh(&cubes, &template);
//! assert_eq!(mesh.vertices.len(), cubes.len() * 24);
//! assert_eq!(mesh.indices.len(), cubes.len() * 36);
//! ```

mod batch;
mod engine;
pub mod geometry;
mod ply;
mod probe;
mod rasterize;
mod scatter;
mod texture;
mod voxelize;

pub use batch::*;
pub use engine::*;
#[doc(inline)]
pub use geometry::*;
pub use ply::*;
pub use probe::*;
pub use rasterize::*;
pub use scatter::*;
pub use texture::*;
pub use voxelize::*;

pub use ilattice;
pub use ndshape;
