use super::core::{Axis, BBox, Point3, Tolerance};
use super::error::InputError;
use super::point_set::PointSet;

/// Piecewise-linear boundary curve parametrized by one coordinate.
///
/// Samples are ordered by the parameter axis; evaluating at `t` returns the
/// point whose parameter coordinate is exactly `t` and whose other two
/// coordinates are interpolated along the neighbouring samples. Outside the
/// sampled range the end segments are extended linearly.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeCurve {
    param: Axis,
    samples: Vec<Point3>,
}

impl EdgeCurve {
    /// Fit an edge curve through `points` parametrized by `param`.
    ///
    /// Samples that coincide (within tolerance) are merged.
    ///
    /// # Errors
    /// - [`InputError::NonMonotonicEdge`] if two distinct samples share the
    ///   same parameter value, so the mapping would be ambiguous.
    /// - [`InputError::NotEnoughPoints`] if fewer than two distinct parameter
    ///   values remain.
    pub fn fit(points: &PointSet, param: Axis) -> Result<Self, InputError> {
        let extent = points.bbox().map_or(0.0, BBox::max_extent).max(1.0);
        let tol = Tolerance::DEFAULT.scaled(extent);

        let mut sorted: Vec<Point3> = points.points().to_vec();
        sorted.sort_by(|a, b| a.coord(param).total_cmp(&b.coord(param)));

        let mut samples: Vec<Point3> = Vec::with_capacity(sorted.len());
        for p in sorted {
            match samples.last() {
                Some(prev) if tol.approx_eq_f64(prev.coord(param), p.coord(param)) => {
                    if !tol.approx_eq_point3(*prev, p) {
                        return Err(InputError::NonMonotonicEdge {
                            axis: param,
                            value: p.coord(param),
                        });
                    }
                }
                _ => samples.push(p),
            }
        }

        if samples.len() < 2 {
            return Err(InputError::NotEnoughPoints {
                provided: samples.len(),
                required: 2,
            });
        }

        Ok(Self { param, samples })
    }

    #[must_use]
    pub const fn param_axis(&self) -> Axis {
        self.param
    }

    /// Distinct samples ordered by ascending parameter.
    #[must_use]
    pub fn samples(&self) -> &[Point3] {
        &self.samples
    }

    /// Smallest and largest sampled parameter value.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        let first = self.samples[0].coord(self.param);
        let last = self.samples[self.samples.len() - 1].coord(self.param);
        (first, last)
    }

    /// Curve point at parameter value `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        let n = self.samples.len();
        // Index of the segment [i, i + 1] used for interpolation or extension.
        let upper = self.samples.partition_point(|p| p.coord(self.param) < t);
        let i = upper.clamp(1, n - 1) - 1;

        let a = self.samples[i];
        let b = self.samples[i + 1];
        let ta = a.coord(self.param);
        let tb = b.coord(self.param);
        let s = (t - ta) / (tb - ta);
        a.lerp(b, s).with_coord(self.param, t)
    }

    /// Coordinate along `axis` at parameter value `t`.
    #[must_use]
    pub fn coord_at(&self, t: f64, axis: Axis) -> f64 {
        self.point_at(t).coord(axis)
    }
}
