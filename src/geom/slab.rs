//! Structured meshing of slab-like parts (fuselage halves, fairings, pods).
//!
//! A slab has two sides and two edge lines. The caller picks which physical
//! axis runs along the columns, which one across the rows, and which one is
//! the interpolated value. Every station is a closed loop: side 1 with rows
//! ascending, then side 2 with rows descending.

use serde::{Deserialize, Serialize};

use super::core::{AxisPermutation, Point3};
use super::edge_curve::EdgeCurve;
use super::error::{ConfigurationError, InputError, MeshResult};
use super::network::{Network, Station};
use super::point_set::PointSet;
use super::rbf::RbfKernel;
use super::spacing::Spacing;
use super::surface_fit::{SurfaceFitOptions, SurfaceInterpolant};

/// Options for [`mesh_slab`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlabMeshOptions {
    pub axes: AxisPermutation,
    pub columns: usize,
    /// Points per side in each station; stations hold twice as many.
    pub rows: usize,
    pub scale: f64,
    pub row_spacing: Spacing,
    pub column_spacing: Spacing,
    pub fit: SurfaceFitOptions,
}

impl Default for SlabMeshOptions {
    fn default() -> Self {
        Self {
            axes: AxisPermutation::XYZ,
            columns: 10,
            rows: 10,
            scale: 1.0,
            row_spacing: Spacing::Uniform,
            column_spacing: Spacing::Uniform,
            fit: SurfaceFitOptions::radial_basis(RbfKernel::Cubic),
        }
    }
}

impl SlabMeshOptions {
    #[must_use]
    pub const fn with_axes(mut self, axes: AxisPermutation) -> Self {
        self.axes = axes;
        self
    }

    #[must_use]
    pub const fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub const fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub const fn with_spacing(mut self, rows: Spacing, columns: Spacing) -> Self {
        self.row_spacing = rows;
        self.column_spacing = columns;
        self
    }

    #[must_use]
    pub const fn with_fit(mut self, fit: SurfaceFitOptions) -> Self {
        self.fit = fit;
        self
    }

    /// # Errors
    /// [`ConfigurationError::InvalidParameter`] for a zero or non-finite
    /// `scale` or invalid fit options.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "scale",
                value: self.scale,
            });
        }
        self.fit.validate()
    }
}

/// The two sides and two edge lines of a slab.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabPointSets {
    pub side1: PointSet,
    pub side2: PointSet,
    pub edge1: PointSet,
    pub edge2: PointSet,
}

impl SlabPointSets {
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            side1: self.side1.scaled(factor),
            side2: self.side2.scaled(factor),
            edge1: self.edge1.scaled(factor),
            edge2: self.edge2.scaled(factor),
        }
    }
}

/// Build the closed-loop network of a slab.
///
/// Stations are emitted in physical `(x, y, z)` coordinates. The first and
/// last point of each side come from the edge lines.
///
/// # Errors
/// - [`ConfigurationError`] for invalid options or an under-determined side fit.
/// - [`InputError::NoOverlap`] if the edge lines share no extent along the
///   column axis, and other [`InputError`]s for malformed edge lines.
pub fn mesh_slab(sets: &SlabPointSets, options: &SlabMeshOptions) -> MeshResult<Network> {
    options.validate()?;
    let sets = sets.scaled(options.scale);
    let axes = options.axes;

    let side1 = SurfaceInterpolant::fit(&sets.side1, axes, &options.fit)?;
    let side2 = SurfaceInterpolant::fit(&sets.side2, axes, &options.fit)?;
    let edge1 = EdgeCurve::fit(&sets.edge1, axes.column())?;
    let edge2 = EdgeCurve::fit(&sets.edge2, axes.column())?;

    let (lo1, hi1) = edge1.range();
    let (lo2, hi2) = edge2.range();
    let start = lo1.max(lo2);
    let end = hi1.min(hi2);
    if start > end {
        return Err(InputError::NoOverlap { axis: axes.column() }.into());
    }

    let columns = options.column_spacing.sample(start, end, options.columns);
    log::debug!(
        "meshing {} slab stations along {} from {start} to {end}",
        columns.len(),
        axes.column()
    );

    let stations: Vec<Station> = columns
        .into_iter()
        .map(|c| slab_station(&side1, &side2, &edge1, &edge2, c, options))
        .collect();
    let network = Network::new(stations);

    let missing = network.non_finite_count();
    if missing > 0 {
        log::warn!("slab network has {missing} non-finite points outside the interpolation domain");
    }
    Ok(network)
}

fn slab_station(
    side1: &SurfaceInterpolant,
    side2: &SurfaceInterpolant,
    edge1: &EdgeCurve,
    edge2: &EdgeCurve,
    column: f64,
    options: &SlabMeshOptions,
) -> Station {
    let row_axis = options.axes.row();
    let a = edge1.point_at(column);
    let b = edge2.point_at(column);
    let (low, high) = if a.coord(row_axis) <= b.coord(row_axis) {
        (a, b)
    } else {
        (b, a)
    };

    let ascending = options
        .row_spacing
        .sample(low.coord(row_axis), high.coord(row_axis), options.rows);
    let descending: Vec<f64> = ascending.iter().rev().copied().collect();

    let mut points = side_points(side1, &ascending, column, low, high);
    points.extend(side_points(side2, &descending, column, high, low));
    Station::new(points)
}

fn side_points(
    side: &SurfaceInterpolant,
    rows: &[f64],
    column: f64,
    first: Point3,
    last: Point3,
) -> Vec<Point3> {
    let end = rows.len().saturating_sub(1);
    rows.iter()
        .enumerate()
        .map(|(i, &row)| {
            if i == 0 {
                first
            } else if i == end {
                last
            } else {
                side.point_at(column, row)
            }
        })
        .collect()
}

