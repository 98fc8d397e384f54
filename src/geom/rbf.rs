//! Global radial basis function interpolation.
//!
//! The interpolant is `s(x) = Σ wᵢ φ(‖x - cᵢ‖)` with one weight per sample.
//! Weights solve the dense system `(Φ + λI) w = f`, where `λ` is the
//! smoothing parameter. With `λ = 0` the interpolant passes through every
//! sample; larger values trade exactness for robustness against noise.
//!
//! The dense solve is O(n³). It is meant for the few hundred to few thousand
//! samples a surface export typically carries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::core::Tolerance;
use super::error::{ConfigurationError, InputError};

/// Radial kernel `φ(r)`. `ε` is the shape parameter of the scaled kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RbfKernel {
    /// `sqrt((r/ε)² + 1)`
    Multiquadric,
    /// `1 / sqrt((r/ε)² + 1)`
    InverseMultiquadric,
    /// `exp(-(r/ε)²)`
    Gaussian,
    /// `r`
    Linear,
    /// `r³`
    Cubic,
    /// `r⁵`
    Quintic,
    /// `r² ln r`
    #[default]
    ThinPlate,
}

impl RbfKernel {
    pub const ALL: [Self; 7] = [
        Self::Multiquadric,
        Self::InverseMultiquadric,
        Self::Gaussian,
        Self::Linear,
        Self::Cubic,
        Self::Quintic,
        Self::ThinPlate,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Multiquadric => "multiquadric",
            Self::InverseMultiquadric => "inverse_multiquadric",
            Self::Gaussian => "gaussian",
            Self::Linear => "linear",
            Self::Cubic => "cubic",
            Self::Quintic => "quintic",
            Self::ThinPlate => "thin_plate",
        }
    }

    /// Evaluate `φ(r)` for shape parameter `epsilon`.
    #[must_use]
    pub fn apply(self, r: f64, epsilon: f64) -> f64 {
        match self {
            Self::Multiquadric => ((r / epsilon).powi(2) + 1.0).sqrt(),
            Self::InverseMultiquadric => 1.0 / ((r / epsilon).powi(2) + 1.0).sqrt(),
            Self::Gaussian => (-(r / epsilon).powi(2)).exp(),
            Self::Linear => r,
            Self::Cubic => r.powi(3),
            Self::Quintic => r.powi(5),
            Self::ThinPlate => {
                if r > 0.0 {
                    r * r * r.ln()
                } else {
                    0.0
                }
            }
        }
    }
}

impl fmt::Display for RbfKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RbfKernel {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multiquadric" => Ok(Self::Multiquadric),
            "inverse" | "inverse_multiquadric" => Ok(Self::InverseMultiquadric),
            "gaussian" => Ok(Self::Gaussian),
            "linear" => Ok(Self::Linear),
            "cubic" => Ok(Self::Cubic),
            "quintic" => Ok(Self::Quintic),
            "thin_plate" | "thin-plate" | "thinplate" => Ok(Self::ThinPlate),
            other => Err(ConfigurationError::UnknownKernel(other.to_string())),
        }
    }
}

/// Fitted radial basis interpolant over `D` independent coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialBasis<const D: usize> {
    kernel: RbfKernel,
    epsilon: f64,
    centers: Vec<[f64; D]>,
    weights: Vec<f64>,
}

impl<const D: usize> RadialBasis<D> {
    /// Fit weights for `values[i]` sampled at `centers[i]`.
    ///
    /// `epsilon = None` selects the average sample spacing
    /// `(Π extent / n)^(1/d)` over the non-degenerate extents.
    ///
    /// # Errors
    /// [`InputError::NotEnoughPoints`] for an empty or mismatched sample set,
    /// [`InputError::SingularSystem`] when the kernel matrix cannot be solved
    /// (typically coincident centers).
    pub fn fit(
        centers: Vec<[f64; D]>,
        values: &[f64],
        kernel: RbfKernel,
        smoothing: f64,
        epsilon: Option<f64>,
    ) -> Result<Self, InputError> {
        if centers.is_empty() || centers.len() != values.len() {
            return Err(InputError::NotEnoughPoints {
                provided: centers.len().min(values.len()),
                required: 1,
            });
        }

        let epsilon = epsilon.unwrap_or_else(|| average_spacing(&centers));
        let n = centers.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for (i, row) in matrix.iter_mut().enumerate() {
            for (j, entry) in row.iter_mut().enumerate() {
                *entry = kernel.apply(distance(&centers[i], &centers[j]), epsilon);
            }
            row[i] += smoothing;
        }

        let weights = solve_linear_system(matrix, values.to_vec())?;
        log::debug!("fitted {kernel} radial basis over {n} samples (epsilon = {epsilon:.6e})");

        Ok(Self {
            kernel,
            epsilon,
            centers,
            weights,
        })
    }

    #[must_use]
    pub fn evaluate(&self, at: [f64; D]) -> f64 {
        self.centers
            .iter()
            .zip(&self.weights)
            .map(|(c, w)| w * self.kernel.apply(distance(c, &at), self.epsilon))
            .sum()
    }

    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

fn distance<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(p, q)| (p - q) * (p - q))
        .sum::<f64>()
        .sqrt()
}

fn average_spacing<const D: usize>(centers: &[[f64; D]]) -> f64 {
    let mut lo = [f64::INFINITY; D];
    let mut hi = [f64::NEG_INFINITY; D];
    for c in centers {
        for k in 0..D {
            lo[k] = lo[k].min(c[k]);
            hi[k] = hi[k].max(c[k]);
        }
    }

    let edges: Vec<f64> = lo
        .iter()
        .zip(&hi)
        .map(|(l, h)| h - l)
        .filter(|e| *e > Tolerance::ZERO_LENGTH.eps)
        .collect();
    if edges.is_empty() {
        return 1.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = centers.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let dims = edges.len() as f64;
    (edges.iter().product::<f64>() / n).powf(1.0 / dims)
}

/// Solves a dense linear system Ax = b using Gaussian elimination with partial pivoting.
fn solve_linear_system(mut aug: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Result<Vec<f64>, InputError> {
    let n = aug.len();
    let scale = aug
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()))
        .max(f64::MIN_POSITIVE);
    let singular = Tolerance::ZERO_LENGTH.eps * 1e-2 * scale;

    // Forward elimination with partial pivoting
    for k in 0..n {
        let mut max_row = k;
        let mut max_val = aug[k][k].abs();
        for (i, row) in aug.iter().enumerate().skip(k + 1) {
            if row[k].abs() > max_val {
                max_val = row[k].abs();
                max_row = i;
            }
        }

        if max_val <= singular {
            return Err(InputError::SingularSystem);
        }

        if max_row != k {
            aug.swap(k, max_row);
            rhs.swap(k, max_row);
        }

        let (upper, lower) = aug.split_at_mut(k + 1);
        let pivot_row = &upper[k];
        let pivot = pivot_row[k];
        for (offset, row) in lower.iter_mut().enumerate() {
            let factor = row[k] / pivot;
            if factor == 0.0 {
                continue;
            }
            for (entry, pivot_entry) in row.iter_mut().zip(pivot_row).skip(k) {
                *entry -= factor * pivot_entry;
            }
            let carry = factor * rhs[k];
            rhs[k + 1 + offset] -= carry;
        }
    }

    // Back substitution
    let mut result = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = rhs[i];
        for j in (i + 1)..n {
            sum -= aug[i][j] * result[j];
        }
        result[i] = sum / aug[i][i];
    }

    if result.iter().all(|v| v.is_finite()) {
        Ok(result)
    } else {
        Err(InputError::SingularSystem)
    }
}
