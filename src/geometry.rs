//! Triangle geometry and the exact triangle/cube overlap test.
//!
//! Everything here is a pure function of its inputs. The rasterizer drives
//! these primitives over the cells of a triangle's bounding box; nothing in
//! this module knows about voxel sets or meshes.

mod sat;
mod tri;

pub use sat::*;
pub use tri::*;
