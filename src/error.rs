use thiserror::Error;

/// A simulation parameter lies outside its physical range.
///
/// Raised synchronously at construction time and never recovered
/// internally; out-of-range inputs are rejected, not clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("total optical depth must be positive and finite, got {0}")]
    OpticalDepth(f64),
    #[error("single-scattering albedo must be in [0, 1], got {0}")]
    SingleScatteringAlbedo(f64),
    #[error("asymmetry parameter must be in [-1, 1], got {0}")]
    AsymmetryParameter(f64),
    #[error("surface albedo must be in [0, 1], got {0}")]
    SurfaceAlbedo(f64),
    #[error("ensemble needs at least one photon history")]
    NoPhotons,
    #[error("depth profiles need at least one bin")]
    NoBins,
    #[error("weight cutoff must be in (0, 1), got {0}")]
    WeightCutoff(f64),
}

/// Errors surfaced by an ensemble run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// A history exceeded the step bound without terminating. Interaction
    /// steps move the photon by a positive exponential draw, so this is a
    /// logic or parameter bug rather than a stochastic outcome; the whole
    /// run is aborted.
    #[error("history {history} exceeded {steps} steps without terminating")]
    Divergence { history: usize, steps: usize },
}
