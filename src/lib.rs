//! Structured surface meshes for panel-method solvers.
//!
//! Triangulated exports of a wing (or any slab-like part) are reduced to
//! point sets, fitted with scattered-data interpolants, and resampled into
//! rectangular networks of stations: upper and lower skins, tip and root caps,
//! and a flat wake.
//!
//! ```no_run
//! use aeromesh::{Facet, WingMeshOptions, WingPointSets, extract_point_set, mesh_wing};
//!
//! # fn surfaces() -> [Vec<Facet>; 6] { unimplemented!() }
//! let [upper, lower, le, te, uj, lj] = surfaces();
//! let sets = WingPointSets {
//!     upper: extract_point_set(&upper)?,
//!     lower: extract_point_set(&lower)?,
//!     leading_edge: extract_point_set(&le)?,
//!     trailing_edge: extract_point_set(&te)?,
//!     upper_junction: extract_point_set(&uj)?,
//!     lower_junction: extract_point_set(&lj)?,
//! };
//! let mesh = mesh_wing(&sets, &WingMeshOptions::default().with_columns(12))?;
//! for (role, network) in mesh.networks() {
//!     println!("{role}: {:?}", network.shape());
//! }
//! # Ok::<(), aeromesh::MeshError>(())
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;

pub use geom::{
    Axis, AxisPermutation, BBox, ConfigurationError, EdgeCurve, Facet, FitMethod, InputError,
    MeshError, MeshResult, Network, NetworkRole, Point3, PointSet, RbfKernel, SlabMeshOptions,
    SlabPointSets, Spacing, Station, SurfaceFitOptions, SurfaceInterpolant, Tolerance, WingMesh,
    WingMeshOptions, WingPointSets, WingSide, cubic_bounds, extract_point_set, mesh_slab,
    mesh_wing,
};
