//! Structured point grids handed to the panel solver and to plotting.
//!
//! A [`Network`] is an ordered list of [`Station`]s; each station is an
//! ordered list of points. Networks produced by the mesh builders are
//! rectangular, but [`Network::dedup_consecutive`] may leave ragged stations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::core::{Axis, BBox, Point3, Tolerance};

/// Ordered points sharing one value of the column coordinate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Station {
    pub points: Vec<Point3>,
}

impl Station {
    #[must_use]
    pub const fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<Point3> {
        self.points.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<Point3> {
        self.points.last().copied()
    }

    /// Same points in opposite order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.points.iter().rev().copied().collect())
    }
}

impl From<Vec<Point3>> for Station {
    fn from(points: Vec<Point3>) -> Self {
        Self::new(points)
    }
}

/// Ordered grid of stations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Network {
    pub stations: Vec<Station>,
}

impl Network {
    #[must_use]
    pub const fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// `(stations, points in the first station)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        let rows = self.stations.first().map_or(0, Station::len);
        (self.stations.len(), rows)
    }

    /// Whether every station carries the same number of points.
    #[must_use]
    pub fn is_rectangular(&self) -> bool {
        let (_, rows) = self.shape();
        self.stations.iter().all(|s| s.len() == rows)
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.stations.iter().map(Station::len).sum()
    }

    /// Number of points with a NaN or infinite coordinate.
    #[must_use]
    pub fn non_finite_count(&self) -> usize {
        self.iter_points().filter(|p| !p.is_finite()).count()
    }

    /// All points, station by station.
    pub fn iter_points(&self) -> impl Iterator<Item = &Point3> {
        self.stations.iter().flat_map(|s| s.points.iter())
    }

    /// Bounding box of the finite points, `None` if there are none.
    #[must_use]
    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(self.iter_points())
    }

    /// Reflect every point across the plane normal to `axis`.
    ///
    /// Shape and point order are preserved.
    #[must_use]
    pub fn mirrored(&self, axis: Axis) -> Self {
        let stations = self
            .stations
            .iter()
            .map(|s| Station::new(s.points.iter().map(|p| p.mirrored(axis)).collect()))
            .collect();
        Self::new(stations)
    }

    /// Within each station, drop points equal (within `tol`) to their
    /// immediate predecessor. Points in different stations are never compared.
    #[must_use]
    pub fn dedup_consecutive(&self, tol: Tolerance) -> Self {
        let stations = self
            .stations
            .iter()
            .map(|s| {
                let mut points = s.points.clone();
                points.dedup_by(|current, previous| tol.approx_eq_point3(*previous, *current));
                Station::new(points)
            })
            .collect();
        Self::new(stations)
    }
}

impl From<Vec<Station>> for Network {
    fn from(stations: Vec<Station>) -> Self {
        Self::new(stations)
    }
}

/// Meaning of a network in the solver input deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkRole {
    UpperSurface,
    LowerSurface,
    TipCap,
    RootCap,
    Wake,
    Slab,
}

impl NetworkRole {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UpperSurface => "upper_surface",
            Self::LowerSurface => "lower_surface",
            Self::TipCap => "tip_cap",
            Self::RootCap => "root_cap",
            Self::Wake => "wake",
            Self::Slab => "slab",
        }
    }

    /// Wakes are emitted with a wake network type; all others are solid surfaces.
    #[must_use]
    pub const fn is_wake(self) -> bool {
        matches!(self, Self::Wake)
    }
}

impl fmt::Display for NetworkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One cube enclosing every finite point of `networks`.
///
/// The cube spans the smallest to the largest coordinate found on any axis,
/// so plots get an equal aspect ratio.
#[must_use]
pub fn cubic_bounds(networks: &[&Network]) -> Option<BBox> {
    let bounds = networks
        .iter()
        .filter_map(|n| n.bbox())
        .reduce(BBox::union)?;
    let lo = bounds.min.x.min(bounds.min.y).min(bounds.min.z);
    let hi = bounds.max.x.max(bounds.max.y).max(bounds.max.z);
    Some(BBox::new(Point3::new(lo, lo, lo), Point3::new(hi, hi, hi)))
}
