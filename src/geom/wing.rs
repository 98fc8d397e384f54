//! Structured wing meshing.
//!
//! A wing is described by six point sets: the upper and lower skins, the
//! leading and trailing edge lines, and the upper and lower junction lines
//! where the wing meets the fuselage. [`mesh_wing`] turns them into the five
//! networks a panel solver expects: upper skin, lower skin, tip cap, root cap
//! and wake.
//!
//! # Ordering
//! - Upper stations run from the trailing edge to the leading edge.
//! - Lower stations run from the leading edge to the trailing edge.
//! - Stations are ordered from the root towards the tip.
//! - Every wake station starts at the trailing-edge point of the matching
//!   upper station and ends at `x = wake_length`.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::core::{Axis, AxisPermutation, Point3};
use super::edge_curve::EdgeCurve;
use super::error::{ConfigurationError, MeshResult};
use super::network::{Network, NetworkRole, Station};
use super::point_set::PointSet;
use super::spacing::{Spacing, linspace};
use super::surface_fit::{SurfaceFitOptions, SurfaceInterpolant};

// ============================================================================
// Options
// ============================================================================

/// Which half-wing is meshed. The right wing lies at positive y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WingSide {
    #[default]
    Right,
    Left,
}

impl WingSide {
    /// Pick the spanwise extreme for this side: the larger value for the
    /// right wing, the smaller for the left wing.
    #[must_use]
    pub fn outermost(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Right => a.max(b),
            Self::Left => a.min(b),
        }
    }
}

impl fmt::Display for WingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Right => f.write_str("right"),
            Self::Left => f.write_str("left"),
        }
    }
}

impl FromStr for WingSide {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right" => Ok(Self::Right),
            "left" => Ok(Self::Left),
            other => Err(ConfigurationError::UnknownSide(other.to_string())),
        }
    }
}

/// Options for [`mesh_wing`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WingMeshOptions {
    /// Spanwise stations, root included.
    pub columns: usize,
    /// Points per station on each skin.
    pub rows: usize,
    /// x coordinate where the wake ends.
    pub wake_length: f64,
    /// Points per wake station, trailing edge included.
    pub wake_points: usize,
    pub side: WingSide,
    /// Uniform factor applied to every input point before meshing.
    pub scale: f64,
    /// Chordwise distribution.
    pub row_spacing: Spacing,
    /// Spanwise distribution.
    pub column_spacing: Spacing,
    pub fit: SurfaceFitOptions,
}

impl Default for WingMeshOptions {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 10,
            wake_length: 200.0,
            wake_points: 10,
            side: WingSide::Right,
            scale: 1.0,
            row_spacing: Spacing::Uniform,
            column_spacing: Spacing::Uniform,
            fit: SurfaceFitOptions::default(),
        }
    }
}

impl WingMeshOptions {
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
    pub const fn with_wake(mut self, wake_length: f64, wake_points: usize) -> Self {
        self.wake_length = wake_length;
        self.wake_points = wake_points;
        self
    }

    #[must_use]
    pub const fn with_side(mut self, side: WingSide) -> Self {
        self.side = side;
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
    /// `scale`, a non-finite `wake_length`, or invalid fit options.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "scale",
                value: self.scale,
            });
        }
        if !self.wake_length.is_finite() {
            return Err(ConfigurationError::InvalidParameter {
                name: "wake_length",
                value: self.wake_length,
            });
        }
        self.fit.validate()
    }
}

// ============================================================================
// Inputs / outputs
// ============================================================================

/// The six point sets describing one half-wing.
#[derive(Debug, Clone, PartialEq)]
pub struct WingPointSets {
    pub upper: PointSet,
    pub lower: PointSet,
    pub leading_edge: PointSet,
    pub trailing_edge: PointSet,
    pub upper_junction: PointSet,
    pub lower_junction: PointSet,
}

impl WingPointSets {
    /// Every set scaled by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            upper: self.upper.scaled(factor),
            lower: self.lower.scaled(factor),
            leading_edge: self.leading_edge.scaled(factor),
            trailing_edge: self.trailing_edge.scaled(factor),
            upper_junction: self.upper_junction.scaled(factor),
            lower_junction: self.lower_junction.scaled(factor),
        }
    }

    /// Every set reflected across the plane normal to `axis`.
    #[must_use]
    pub fn mirrored(&self, axis: Axis) -> Self {
        Self {
            upper: self.upper.mirrored(axis),
            lower: self.lower.mirrored(axis),
            leading_edge: self.leading_edge.mirrored(axis),
            trailing_edge: self.trailing_edge.mirrored(axis),
            upper_junction: self.upper_junction.mirrored(axis),
            lower_junction: self.lower_junction.mirrored(axis),
        }
    }
}

/// Networks produced by [`mesh_wing`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WingMesh {
    pub upper: Network,
    pub lower: Network,
    /// Outermost upper station and the outermost lower station reversed.
    pub tip: Network,
    /// Innermost upper station and the innermost lower station reversed.
    pub root: Network,
    pub wake: Network,
}

impl WingMesh {
    /// Networks in solver deck order.
    #[must_use]
    pub fn networks(&self) -> [(NetworkRole, &Network); 5] {
        [
            (NetworkRole::UpperSurface, &self.upper),
            (NetworkRole::LowerSurface, &self.lower),
            (NetworkRole::TipCap, &self.tip),
            (NetworkRole::RootCap, &self.root),
            (NetworkRole::Wake, &self.wake),
        ]
    }

    /// Reflect every network across the plane normal to `axis`.
    #[must_use]
    pub fn mirrored(&self, axis: Axis) -> Self {
        Self {
            upper: self.upper.mirrored(axis),
            lower: self.lower.mirrored(axis),
            tip: self.tip.mirrored(axis),
            root: self.root.mirrored(axis),
            wake: self.wake.mirrored(axis),
        }
    }
}

// ============================================================================
// Meshing
// ============================================================================

/// Interpolants shared by every spanwise station.
struct WingModel {
    upper: SurfaceInterpolant,
    lower: SurfaceInterpolant,
    leading_edge: EdgeCurve,
    trailing_edge: EdgeCurve,
}

struct StationTriple {
    upper: Station,
    lower: Station,
    wake: Station,
}

/// Build the structured networks of one half-wing.
///
/// # Errors
/// - [`ConfigurationError`] for invalid options or an under-determined
///   skin fit.
/// - [`InputError`](super::error::InputError) for edge lines that are not
///   single-valued along their parameter or a singular radial basis system.
pub fn mesh_wing(sets: &WingPointSets, options: &WingMeshOptions) -> MeshResult<WingMesh> {
    options.validate()?;

    let sets = sets.scaled(options.scale);

    let model = WingModel {
        upper: SurfaceInterpolant::fit(&sets.upper, AxisPermutation::XYZ, &options.fit)?,
        lower: SurfaceInterpolant::fit(&sets.lower, AxisPermutation::XYZ, &options.fit)?,
        leading_edge: EdgeCurve::fit(&sets.leading_edge, Axis::Y)?,
        trailing_edge: EdgeCurve::fit(&sets.trailing_edge, Axis::Y)?,
    };
    let upper_junction = EdgeCurve::fit(&sets.upper_junction, Axis::X)?;
    let lower_junction = EdgeCurve::fit(&sets.lower_junction, Axis::X)?;
    log::debug!("wing interpolants fitted ({})", options.fit.method);

    if options.columns == 0 || options.rows == 0 {
        return Ok(WingMesh::default());
    }

    let root = root_station(&upper_junction, &lower_junction, options);

    let Some(line_limit) = root
        .upper
        .points
        .iter()
        .chain(&root.lower.points)
        .map(|p| p.y)
        .reduce(|a, b| options.side.outermost(a, b))
    else {
        return Ok(WingMesh::default());
    };
    let wing_tip = sets
        .upper
        .range(Axis::Y)
        .map_or(line_limit, |(lo, hi)| options.side.outermost(lo, hi));
    let columns_y: Vec<f64> = options
        .column_spacing
        .sample(line_limit, wing_tip, options.columns)
        .into_iter()
        .skip(1)
        .collect();
    log::debug!(
        "meshing {} {} wing stations from y = {line_limit} to y = {wing_tip}",
        options.columns,
        options.side
    );

    let mut stations = Vec::with_capacity(options.columns);
    stations.push(root);
    stations.extend(span_stations(&model, &columns_y, options));

    let mut upper = Vec::with_capacity(stations.len());
    let mut lower = Vec::with_capacity(stations.len());
    let mut wake = Vec::with_capacity(stations.len());
    for station in stations {
        upper.push(station.upper);
        lower.push(station.lower);
        wake.push(station.wake);
    }

    let tip = cap(upper.last(), lower.last());
    let root = cap(upper.first(), lower.first());
    let mesh = WingMesh {
        upper: Network::new(upper),
        lower: Network::new(lower),
        tip,
        root,
        wake: Network::new(wake),
    };

    for (role, network) in mesh.networks() {
        let missing = network.non_finite_count();
        if missing > 0 {
            log::warn!(
                "{role} network has {missing} non-finite points outside the interpolation domain"
            );
        }
    }
    Ok(mesh)
}

/// Root station sampled along the junction lines.
fn root_station(
    upper_junction: &EdgeCurve,
    lower_junction: &EdgeCurve,
    options: &WingMeshOptions,
) -> StationTriple {
    let (upper_lo, upper_hi) = upper_junction.range();
    let upper: Vec<Point3> = options
        .row_spacing
        .sample(upper_hi, upper_lo, options.rows)
        .into_iter()
        .map(|x| upper_junction.point_at(x))
        .collect();

    let (lower_lo, lower_hi) = lower_junction.range();
    let lower: Vec<Point3> = options
        .row_spacing
        .sample(lower_hi, lower_lo, options.rows)
        .into_iter()
        .rev()
        .map(|x| lower_junction.point_at(x))
        .collect();

    let wake = wake_station(upper.first().copied(), options);
    StationTriple {
        upper: Station::new(upper),
        lower: Station::new(lower),
        wake,
    }
}

#[cfg(feature = "parallel")]
fn span_stations(
    model: &WingModel,
    columns_y: &[f64],
    options: &WingMeshOptions,
) -> Vec<StationTriple> {
    columns_y
        .par_iter()
        .map(|&y| span_station(model, y, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn span_stations(
    model: &WingModel,
    columns_y: &[f64],
    options: &WingMeshOptions,
) -> Vec<StationTriple> {
    columns_y
        .iter()
        .map(|&y| span_station(model, y, options))
        .collect()
}

/// One spanwise station at `y`, bounded by the edge lines.
fn span_station(model: &WingModel, y: f64, options: &WingMeshOptions) -> StationTriple {
    let trailing = model.trailing_edge.point_at(y);
    let leading = model.leading_edge.point_at(y);
    let xs = options.row_spacing.sample(trailing.x, leading.x, options.rows);

    // Both skins are sampled trailing edge first; the lower one is then flipped.
    let upper = skin_points(&model.upper, &xs, y, trailing, leading);
    let mut lower = skin_points(&model.lower, &xs, y, trailing, leading);
    lower.reverse();

    StationTriple {
        upper: Station::new(upper),
        lower: Station::new(lower),
        wake: wake_station(Some(trailing), options),
    }
}

fn skin_points(
    surface: &SurfaceInterpolant,
    xs: &[f64],
    y: f64,
    trailing: Point3,
    leading: Point3,
) -> Vec<Point3> {
    let last = xs.len().saturating_sub(1);
    xs.iter()
        .enumerate()
        .map(|(i, &x)| {
            if i == 0 {
                trailing
            } else if i == last {
                leading
            } else {
                surface.point_at(x, y)
            }
        })
        .collect()
}

fn wake_station(anchor: Option<Point3>, options: &WingMeshOptions) -> Station {
    let Some(anchor) = anchor else {
        return Station::default();
    };
    let points = linspace(anchor.x, options.wake_length, options.wake_points)
        .into_iter()
        .map(|x| anchor.with_coord(Axis::X, x))
        .collect();
    Station::new(points)
}

fn cap(upper: Option<&Station>, lower: Option<&Station>) -> Network {
    match (upper, lower) {
        (Some(upper), Some(lower)) => Network::new(vec![upper.clone(), lower.reversed()]),
        _ => Network::default(),
    }
}
