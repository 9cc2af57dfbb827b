use thiserror::Error;

/// Failures surfaced by the public sampler operations.
///
/// Every condition is detected before any state is touched, so a failed
/// operation leaves the sampler exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    /// The element index is outside the current bounds of the sampler
    #[error("index {index} is out of range for a sampler of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// `draw` was called while no element has a positive weight
    #[error("cannot draw from a distribution with no positive weight")]
    EmptyDistribution,
    /// Weights must be non-negative
    #[error("invalid weight {0}: weights must be non-negative")]
    NegativeWeight(f64),
    /// Weights must be finite
    #[error("invalid weight {0}: weights must be finite")]
    NonFiniteWeight(f64),
}
