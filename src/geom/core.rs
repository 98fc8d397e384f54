use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

// ─────────────────────────────────────────────────────────────────────────────
// Axis
// ─────────────────────────────────────────────────────────────────────────────

/// One of the three physical coordinate axes.
///
/// X runs nose-to-tail, Y is spanwise (positive = right side), Z is vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    /// The two axes other than `self`, in ascending order.
    #[must_use]
    pub const fn others(self) -> [Self; 2] {
        match self {
            Self::X => [Self::Y, Self::Z],
            Self::Y => [Self::X, Self::Z],
            Self::Z => [Self::X, Self::Y],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        f.write_str(name)
    }
}

impl FromStr for Axis {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "0" => Ok(Self::X),
            "y" | "1" => Ok(Self::Y),
            "z" | "2" => Ok(Self::Z),
            other => Err(ConfigurationError::UnknownAxis(other.to_string())),
        }
    }
}

/// Assignment of the physical axes to the column, row and value roles of a
/// structured grid. The three axes are always distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[Axis; 3]", into = "[Axis; 3]")]
pub struct AxisPermutation {
    column: Axis,
    row: Axis,
    value: Axis,
}

impl AxisPermutation {
    /// Columns along x, rows along y, values in z.
    pub const XYZ: Self = Self {
        column: Axis::X,
        row: Axis::Y,
        value: Axis::Z,
    };

    /// # Errors
    /// [`ConfigurationError::AxisPermutation`] if an axis appears twice.
    pub fn new(column: Axis, row: Axis, value: Axis) -> Result<Self, ConfigurationError> {
        if column == row || column == value || row == value {
            return Err(ConfigurationError::AxisPermutation {
                reason: format!("axes must be distinct, got [{column}, {row}, {value}]"),
            });
        }
        Ok(Self { column, row, value })
    }

    /// Build from a list of axis indices (0 = x, 1 = y, 2 = z).
    ///
    /// # Errors
    /// [`ConfigurationError::AxisPermutation`] unless the list names exactly
    /// three distinct valid axes.
    pub fn from_indices(indices: &[usize]) -> Result<Self, ConfigurationError> {
        let &[c, r, v] = indices else {
            return Err(ConfigurationError::AxisPermutation {
                reason: format!("expected 3 axes, got {}", indices.len()),
            });
        };
        let axis = |i: usize| {
            Axis::from_index(i).ok_or_else(|| ConfigurationError::AxisPermutation {
                reason: format!("axis index {i} out of range"),
            })
        };
        Self::new(axis(c)?, axis(r)?, axis(v)?)
    }

    #[must_use]
    pub const fn column(self) -> Axis {
        self.column
    }

    #[must_use]
    pub const fn row(self) -> Axis {
        self.row
    }

    #[must_use]
    pub const fn value(self) -> Axis {
        self.value
    }

    /// Project a point onto its `(column, row)` coordinates.
    #[must_use]
    pub const fn project(self, p: Point3) -> [f64; 2] {
        [p.coord(self.column), p.coord(self.row)]
    }

    /// Physical point from column, row and value coordinates.
    #[must_use]
    pub const fn compose(self, column: f64, row: f64, value: f64) -> Point3 {
        Point3::ORIGIN
            .with_coord(self.column, column)
            .with_coord(self.row, row)
            .with_coord(self.value, value)
    }
}

impl Default for AxisPermutation {
    fn default() -> Self {
        Self::XYZ
    }
}

impl TryFrom<[Axis; 3]> for AxisPermutation {
    type Error = ConfigurationError;

    fn try_from(axes: [Axis; 3]) -> Result<Self, Self::Error> {
        Self::new(axes[0], axes[1], axes[2])
    }
}

impl From<AxisPermutation> for [Axis; 3] {
    fn from(p: AxisPermutation) -> Self {
        [p.column, p.row, p.value]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The origin point (0, 0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a Point3 from an array.
    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub const fn coord(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Copy of `self` with the coordinate along `axis` replaced.
    #[must_use]
    pub const fn with_coord(mut self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
        self
    }

    /// Negate the coordinate along `axis`.
    #[must_use]
    pub const fn mirrored(self, axis: Axis) -> Self {
        self.with_coord(axis, -self.coord(axis))
    }

    #[must_use]
    pub const fn scaled(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Linear interpolation between two points.
    /// Returns `self * (1 - t) + rhs * t`.
    #[must_use]
    pub fn lerp(self, rhs: Self, t: f64) -> Self {
        Self::new(
            self.x + (rhs.x - self.x) * t,
            self.y + (rhs.y - self.y) * t,
            self.z + (rhs.z - self.z) * t,
        )
    }

    #[must_use]
    pub fn distance_squared_to(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

impl Default for Point3 {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.to_array()
    }
}

impl Add for Point3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        self.scaled(rhs)
    }
}

impl Neg for Point3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BBox
// ─────────────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point3,
    pub max: Point3,
}

impl BBox {
    #[must_use]
    pub const fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Bounding box of the finite points in `points`.
    /// Returns `None` when there is no finite point.
    #[must_use]
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut iter = points.into_iter().copied().filter(|p| p.is_finite());
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), Self::expand_point))
    }

    #[must_use]
    pub fn expand_point(self, p: Point3) -> Self {
        Self::new(
            Point3::new(
                self.min.x.min(p.x),
                self.min.y.min(p.y),
                self.min.z.min(p.z),
            ),
            Point3::new(
                self.max.x.max(p.x),
                self.max.y.max(p.y),
                self.max.z.max(p.z),
            ),
        )
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        self.expand_point(other.min).expand_point(other.max)
    }

    #[must_use]
    pub fn center(self) -> Point3 {
        self.min.lerp(self.max, 0.5)
    }

    /// Extent of the box along each axis.
    #[must_use]
    pub fn size(self) -> [f64; 3] {
        [
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        ]
    }

    #[must_use]
    pub fn max_extent(self) -> f64 {
        let [dx, dy, dz] = self.size();
        dx.max(dy).max(dz)
    }

    #[must_use]
    pub fn contains_point(self, p: Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance configuration for geometric comparisons.
///
/// - `Tolerance::DEFAULT` - General geometry comparisons (1e-9)
/// - `Tolerance::ZERO_LENGTH` - Degenerate spans and pivots (1e-12)
/// - `Tolerance::LOOSE` - Coarse comparisons (1e-6)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Default geometric tolerance (1e-9).
    pub const DEFAULT: Self = Self { eps: 1e-9 };

    /// Tolerance for detecting zero-length spans (1e-12).
    pub const ZERO_LENGTH: Self = Self { eps: 1e-12 };

    /// Loose tolerance for coarse comparisons (1e-6).
    pub const LOOSE: Self = Self { eps: 1e-6 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    #[must_use]
    pub const fn eps_squared(self) -> f64 {
        self.eps * self.eps
    }

    /// Create a scaled tolerance (e.g., for relative comparisons).
    #[must_use]
    pub fn scaled(self, scale: f64) -> Self {
        Self::new(self.eps * scale.abs())
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    /// Relative comparison: `|a - b| <= eps * max(1, |a|, |b|)`.
    #[must_use]
    pub fn approx_eq_rel(self, a: f64, b: f64) -> bool {
        let scale = 1.0_f64.max(a.abs()).max(b.abs());
        (a - b).abs() <= self.eps * scale
    }

    #[must_use]
    pub fn approx_eq_point3(self, a: Point3, b: Point3) -> bool {
        a.distance_squared_to(b) <= self.eps_squared()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
