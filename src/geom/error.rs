use super::core::Axis;

pub type MeshResult<T> = Result<T, MeshError>;

/// Malformed or insufficient input point data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("surface contains no triangles")]
    EmptySurface,
    #[error("point {index} contains non-finite coordinates")]
    NonFinitePoint { index: usize },
    #[error("not enough points: {provided} provided, {required} required")]
    NotEnoughPoints { provided: usize, required: usize },
    #[error("edge curve is not monotonic in {axis}: ambiguous samples at {axis} = {value}")]
    NonMonotonicEdge { axis: Axis, value: f64 },
    #[error("interpolation system is singular (coincident projected samples?)")]
    SingularSystem,
    #[error("edge curves do not overlap along {axis}")]
    NoOverlap { axis: Axis },
}

/// Invalid enumerated option or numeric parameter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unknown radial basis kernel `{0}`")]
    UnknownKernel(String),
    #[error("unknown wing side `{0}` (expected `right` or `left`)")]
    UnknownSide(String),
    #[error("unknown spacing `{0}` (expected `uniform` or `cosine`)")]
    UnknownSpacing(String),
    #[error("unknown interpolation method `{0}` (expected `rbf` or `linear`)")]
    UnknownMethod(String),
    #[error("unknown axis `{0}`")]
    UnknownAxis(String),
    #[error("invalid axis permutation: {reason}")]
    AxisPermutation { reason: String },
    #[error("surface fit is under-determined: need 3 non-collinear points, {provided} provided")]
    UnderDetermined { provided: usize },
    #[error("invalid parameter `{name}` = {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl MeshError {
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
