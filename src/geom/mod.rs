mod core;
mod edge_curve;
mod error;
mod network;
mod point_set;
mod rbf;
mod slab;
mod spacing;
mod surface_fit;
mod triangulation;
mod wing;

pub use core::{Axis, AxisPermutation, BBox, Point3, Tolerance};
pub use edge_curve::EdgeCurve;
pub use error::{ConfigurationError, InputError, MeshError, MeshResult};
pub use network::{Network, NetworkRole, Station, cubic_bounds};
pub use point_set::{Facet, PointSet, extract_point_set};
pub use rbf::{RadialBasis, RbfKernel};
pub use slab::{SlabMeshOptions, SlabPointSets, mesh_slab};
pub use spacing::{Spacing, cosine_space, linspace};
pub use surface_fit::{FitMethod, SurfaceFitOptions, SurfaceInterpolant};
pub use triangulation::LinearTriangulation;
pub use wing::{WingMesh, WingMeshOptions, WingPointSets, WingSide, mesh_wing};

#[cfg(test)]
mod tests;
