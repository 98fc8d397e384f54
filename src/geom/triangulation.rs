//! Piecewise-linear interpolation over a Delaunay triangulation.
//!
//! Samples are projected onto two independent coordinates and triangulated
//! with `delaunator`. A query inside the convex hull returns the barycentric
//! blend of the containing triangle's values; a query outside returns NaN.

use super::error::ConfigurationError;

/// Barycentric slack accepted at triangle edges.
const EDGE_SLACK: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedTriangle {
    indices: [usize; 3],
    min: [f64; 2],
    max: [f64; 2],
}

/// Linear interpolant on the Delaunay triangulation of scattered `(u, v)` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearTriangulation {
    samples: Vec<[f64; 2]>,
    values: Vec<f64>,
    triangles: Vec<IndexedTriangle>,
}

impl LinearTriangulation {
    /// Triangulate `samples` and attach `values`.
    ///
    /// # Errors
    /// [`ConfigurationError::UnderDetermined`] if the samples span no triangle
    /// (fewer than three points, or all collinear).
    pub fn fit(samples: Vec<[f64; 2]>, values: &[f64]) -> Result<Self, ConfigurationError> {
        if samples.len() < 3 || samples.len() != values.len() {
            return Err(ConfigurationError::UnderDetermined {
                provided: samples.len().min(values.len()),
            });
        }

        let points: Vec<delaunator::Point> = samples
            .iter()
            .map(|s| delaunator::Point { x: s[0], y: s[1] })
            .collect();
        let triangulation = delaunator::triangulate(&points);

        let triangles: Vec<IndexedTriangle> = triangulation
            .triangles
            .chunks_exact(3)
            .map(|t| {
                let indices = [t[0], t[1], t[2]];
                let mut min = [f64::INFINITY; 2];
                let mut max = [f64::NEG_INFINITY; 2];
                for &i in &indices {
                    for k in 0..2 {
                        min[k] = min[k].min(samples[i][k]);
                        max[k] = max[k].max(samples[i][k]);
                    }
                }
                IndexedTriangle { indices, min, max }
            })
            .collect();

        if triangles.is_empty() {
            return Err(ConfigurationError::UnderDetermined {
                provided: samples.len(),
            });
        }

        log::debug!(
            "triangulated {} samples into {} triangles",
            samples.len(),
            triangles.len()
        );

        Ok(Self {
            samples,
            values: values.to_vec(),
            triangles,
        })
    }

    /// Interpolated value at `(u, v)`, or NaN outside the convex hull.
    #[must_use]
    pub fn evaluate(&self, at: [f64; 2]) -> f64 {
        for tri in &self.triangles {
            let span = (tri.max[0] - tri.min[0]).max(tri.max[1] - tri.min[1]);
            let pad = span * EDGE_SLACK;
            if at[0] < tri.min[0] - pad
                || at[0] > tri.max[0] + pad
                || at[1] < tri.min[1] - pad
                || at[1] > tri.max[1] + pad
            {
                continue;
            }
            if let Some(weights) = self.barycentric(tri, at) {
                return weights
                    .iter()
                    .zip(tri.indices)
                    .map(|(w, i)| w * self.values[i])
                    .sum();
            }
        }
        f64::NAN
    }

    fn barycentric(&self, tri: &IndexedTriangle, at: [f64; 2]) -> Option<[f64; 3]> {
        let [a, b, c] = tri.indices.map(|i| self.samples[i]);
        let det = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
        if det == 0.0 {
            return None;
        }
        let w0 = ((b[1] - c[1]) * (at[0] - c[0]) + (c[0] - b[0]) * (at[1] - c[1])) / det;
        let w1 = ((c[1] - a[1]) * (at[0] - c[0]) + (a[0] - c[0]) * (at[1] - c[1])) / det;
        let w2 = 1.0 - w0 - w1;
        if w0 >= -EDGE_SLACK && w1 >= -EDGE_SLACK && w2 >= -EDGE_SLACK {
            Some([w0, w1, w2])
        } else {
            None
        }
    }
}
