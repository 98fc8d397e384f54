//! Unique vertex sets extracted from triangulated surfaces.
//!
//! A triangulated surface is consumed as a plain sequence of [`Facet`]s. Only
//! vertex positions matter; facet normals and grouping are ignored. Vertices
//! shared between adjacent facets appear once in the resulting [`PointSet`].

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::core::{Axis, BBox, Point3};
use super::error::InputError;

/// One triangle of a triangulated surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub vertices: [Point3; 3],
}

impl Facet {
    #[must_use]
    pub const fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { vertices: [a, b, c] }
    }
}

/// Unordered collection of unique points without connectivity.
///
/// Points are kept sorted lexicographically by (x, y, z) so that every
/// interpolant fitted from the same set sees the samples in the same order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PointSet {
    points: Vec<Point3>,
}

impl PointSet {
    /// Build a point set from raw points, removing exact duplicates.
    ///
    /// Fails if the input is empty or any coordinate is non-finite.
    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Result<Self, InputError> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for (index, p) in points.into_iter().enumerate() {
            if !p.is_finite() {
                return Err(InputError::NonFinitePoint { index });
            }
            if seen.insert(point_key(p)) {
                unique.push(p);
            }
        }
        if unique.is_empty() {
            return Err(InputError::NotEnoughPoints {
                provided: 0,
                required: 1,
            });
        }
        sort_points(&mut unique);
        Ok(Self { points: unique })
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point3> {
        self.points.iter()
    }

    /// Uniformly scale every point about the origin.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let mut points: Vec<Point3> = self.points.iter().map(|p| p.scaled(factor)).collect();
        sort_points(&mut points);
        Self { points }
    }

    /// Negate one coordinate of every point.
    #[must_use]
    pub fn mirrored(&self, axis: Axis) -> Self {
        let mut points: Vec<Point3> = self.points.iter().map(|p| p.mirrored(axis)).collect();
        sort_points(&mut points);
        Self { points }
    }

    #[must_use]
    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(&self.points)
    }

    /// Smallest and largest coordinate along `axis`.
    #[must_use]
    pub fn range(&self, axis: Axis) -> Option<(f64, f64)> {
        self.bbox().map(|b| (b.min.coord(axis), b.max.coord(axis)))
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point3;
    type IntoIter = std::slice::Iter<'a, Point3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Collect the unique vertices of a triangulated surface.
///
/// # Errors
/// [`InputError::EmptySurface`] for zero facets, [`InputError::NonFinitePoint`]
/// (indexed by flattened vertex position) for NaN or infinite coordinates.
pub fn extract_point_set(facets: &[Facet]) -> Result<PointSet, InputError> {
    if facets.is_empty() {
        return Err(InputError::EmptySurface);
    }
    let point_set = PointSet::from_points(facets.iter().flat_map(|f| f.vertices))?;
    log::debug!(
        "extracted {} unique vertices from {} facets",
        point_set.len(),
        facets.len()
    );
    Ok(point_set)
}

fn sort_points(points: &mut [Point3]) {
    points.sort_by(|a, b| a.to_array().partial_cmp(&b.to_array()).unwrap_or(Ordering::Equal));
}

/// Hash key for exact coordinate equality; `-0.0` and `0.0` collapse.
fn point_key(p: Point3) -> [u64; 3] {
    let bits = |v: f64| if v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}
