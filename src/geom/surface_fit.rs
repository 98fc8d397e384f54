//! Scattered-data surface fitting.
//!
//! A [`SurfaceInterpolant`] projects a [`PointSet`] onto two independent axes
//! and fits the remaining axis as a function of them, using either a global
//! radial basis function or piecewise-linear interpolation over a Delaunay
//! triangulation.
//!
//! # Domain
//! The radial basis strategy is defined everywhere but only meaningful close
//! to the samples. The piecewise-linear strategy returns NaN outside the
//! convex hull of the projected samples, so callers must keep their queries
//! inside the region spanned by the boundary curves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::core::{AxisPermutation, Point3, Tolerance};
use super::error::{ConfigurationError, MeshResult};
use super::point_set::PointSet;
use super::rbf::{RadialBasis, RbfKernel};
use super::triangulation::LinearTriangulation;

// ============================================================================
// Options
// ============================================================================

/// Interpolation strategy for scattered surface samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FitMethod {
    /// Global radial basis function through every sample.
    RadialBasis {
        kernel: RbfKernel,
        /// Ridge added to the kernel diagonal; 0 fits the samples exactly.
        #[serde(default)]
        smoothing: f64,
        /// Shape parameter; `None` uses the average sample spacing.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        epsilon: Option<f64>,
    },
    /// Linear interpolation on the Delaunay triangulation of the samples.
    PiecewiseLinear,
}

impl Default for FitMethod {
    fn default() -> Self {
        Self::RadialBasis {
            kernel: RbfKernel::ThinPlate,
            smoothing: 0.0,
            epsilon: None,
        }
    }
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RadialBasis { kernel, smoothing, .. } => {
                write!(f, "rbf({kernel}, smoothing = {smoothing})")
            }
            Self::PiecewiseLinear => f.write_str("linear"),
        }
    }
}

impl FromStr for FitMethod {
    type Err = ConfigurationError;

    /// Accepts `rbf` (thin-plate), `rbf:<kernel>`, a bare kernel name, or `linear`.
    ///
    /// A bare `linear` selects piecewise-linear interpolation; use
    /// `rbf:linear` for the linear radial kernel.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "linear" | "piecewise_linear" => Ok(Self::PiecewiseLinear),
            "rbf" | "radial_basis" => Ok(Self::default()),
            other => {
                let kernel_name = other
                    .strip_prefix("rbf:")
                    .or_else(|| other.strip_prefix("radial_basis:"))
                    .unwrap_or(other);
                let kernel = kernel_name
                    .parse::<RbfKernel>()
                    .map_err(|_| ConfigurationError::UnknownMethod(other.to_string()))?;
                Ok(Self::RadialBasis {
                    kernel,
                    smoothing: 0.0,
                    epsilon: None,
                })
            }
        }
    }
}

/// Options for fitting a [`SurfaceInterpolant`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceFitOptions {
    #[serde(flatten)]
    pub method: FitMethod,
}

impl SurfaceFitOptions {
    /// Exact radial basis fit with the given kernel.
    #[must_use]
    pub const fn radial_basis(kernel: RbfKernel) -> Self {
        Self {
            method: FitMethod::RadialBasis {
                kernel,
                smoothing: 0.0,
                epsilon: None,
            },
        }
    }

    #[must_use]
    pub const fn piecewise_linear() -> Self {
        Self {
            method: FitMethod::PiecewiseLinear,
        }
    }

    /// Parse the legacy `(function, rbf_function, smooth)` triple.
    ///
    /// # Errors
    /// [`ConfigurationError::UnknownMethod`] / [`ConfigurationError::UnknownKernel`].
    pub fn from_names(
        method: &str,
        kernel: &str,
        smoothing: f64,
    ) -> Result<Self, ConfigurationError> {
        match method.trim().to_ascii_lowercase().as_str() {
            "rbf" | "radial_basis" => {
                Ok(Self::radial_basis(kernel.parse()?).with_smoothing(smoothing))
            }
            "linear" | "piecewise_linear" => Ok(Self::piecewise_linear()),
            other => Err(ConfigurationError::UnknownMethod(other.to_string())),
        }
    }

    /// Set the smoothing parameter. No effect for piecewise-linear fits.
    #[must_use]
    pub fn with_smoothing(mut self, value: f64) -> Self {
        if let FitMethod::RadialBasis { smoothing, .. } = &mut self.method {
            *smoothing = value;
        }
        self
    }

    /// Set the shape parameter. No effect for piecewise-linear fits.
    #[must_use]
    pub fn with_epsilon(mut self, value: f64) -> Self {
        if let FitMethod::RadialBasis { epsilon, .. } = &mut self.method {
            *epsilon = Some(value);
        }
        self
    }

    /// # Errors
    /// [`ConfigurationError::InvalidParameter`] for a negative or non-finite
    /// smoothing, or a non-positive shape parameter.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let FitMethod::RadialBasis { smoothing, epsilon, .. } = self.method {
            if !smoothing.is_finite() || smoothing < 0.0 {
                return Err(ConfigurationError::InvalidParameter {
                    name: "smoothing",
                    value: smoothing,
                });
            }
            if let Some(eps) = epsilon {
                if !eps.is_finite() || eps <= 0.0 {
                    return Err(ConfigurationError::InvalidParameter {
                        name: "epsilon",
                        value: eps,
                    });
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Interpolant
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum SurfaceModel {
    RadialBasis(RadialBasis<2>),
    PiecewiseLinear(LinearTriangulation),
}

/// Continuous `value = f(column, row)` fitted over a point set.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceInterpolant {
    axes: AxisPermutation,
    model: SurfaceModel,
}

impl SurfaceInterpolant {
    /// Fit `axes.value()` as a function of `(axes.column(), axes.row())`.
    ///
    /// # Errors
    /// - [`ConfigurationError::UnderDetermined`] with fewer than three
    ///   non-collinear projected samples.
    /// - [`ConfigurationError::InvalidParameter`] for invalid options.
    /// - [`InputError::SingularSystem`](super::error::InputError::SingularSystem)
    ///   when the radial basis system cannot be solved.
    pub fn fit(
        points: &PointSet,
        axes: AxisPermutation,
        options: &SurfaceFitOptions,
    ) -> MeshResult<Self> {
        options.validate()?;

        let samples: Vec<[f64; 2]> = points.iter().map(|p| axes.project(*p)).collect();
        let values: Vec<f64> = points.iter().map(|p| p.coord(axes.value())).collect();
        ensure_spanning(&samples)?;

        let model = match options.method {
            FitMethod::RadialBasis {
                kernel,
                smoothing,
                epsilon,
            } => SurfaceModel::RadialBasis(RadialBasis::fit(
                samples, &values, kernel, smoothing, epsilon,
            )?),
            FitMethod::PiecewiseLinear => {
                SurfaceModel::PiecewiseLinear(LinearTriangulation::fit(samples, &values)?)
            }
        };

        Ok(Self { axes, model })
    }

    /// Interpolated value coordinate at `(column, row)`.
    ///
    /// NaN outside the convex hull for piecewise-linear fits.
    #[must_use]
    pub fn evaluate(&self, column: f64, row: f64) -> f64 {
        match &self.model {
            SurfaceModel::RadialBasis(rbf) => rbf.evaluate([column, row]),
            SurfaceModel::PiecewiseLinear(lin) => lin.evaluate([column, row]),
        }
    }

    /// Physical point at `(column, row)` with the interpolated value.
    #[must_use]
    pub fn point_at(&self, column: f64, row: f64) -> Point3 {
        self.axes.compose(column, row, self.evaluate(column, row))
    }

    #[must_use]
    pub const fn axes(&self) -> AxisPermutation {
        self.axes
    }

    #[must_use]
    pub const fn is_piecewise_linear(&self) -> bool {
        matches!(self.model, SurfaceModel::PiecewiseLinear(_))
    }
}

/// Require three projected samples that are not collinear.
fn ensure_spanning(samples: &[[f64; 2]]) -> Result<(), ConfigurationError> {
    let under_determined = ConfigurationError::UnderDetermined {
        provided: samples.len(),
    };
    if samples.len() < 3 {
        return Err(under_determined);
    }

    let (mut lo, mut hi) = ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]);
    for s in samples {
        for k in 0..2 {
            lo[k] = lo[k].min(s[k]);
            hi[k] = hi[k].max(s[k]);
        }
    }
    let extent = (hi[0] - lo[0]).max(hi[1] - lo[1]);
    if extent <= Tolerance::ZERO_LENGTH.eps {
        return Err(under_determined);
    }

    let origin = samples[0];
    let Some(far) = samples
        .iter()
        .copied()
        .max_by(|a, b| dist2(origin, *a).total_cmp(&dist2(origin, *b)))
    else {
        return Err(under_determined);
    };
    let base = [far[0] - origin[0], far[1] - origin[1]];
    let base_len = dist2(origin, far).sqrt();
    if base_len <= Tolerance::ZERO_LENGTH.eps * extent {
        return Err(under_determined);
    }

    // Perpendicular offset of every sample from the line origin -> far.
    let spanning = samples.iter().any(|s| {
        let cross = base[0] * (s[1] - origin[1]) - base[1] * (s[0] - origin[0]);
        cross.abs() / base_len > Tolerance::DEFAULT.eps * extent
    });
    if spanning { Ok(()) } else { Err(under_determined) }
}

fn dist2(a: [f64; 2], b: [f64; 2]) -> f64 {
    let du = a[0] - b[0];
    let dv = a[1] - b[1];
    du * du + dv * dv
}
