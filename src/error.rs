use thiserror::Error;

/// Fatal parameter and configuration errors.
///
/// Recoverable conditions (a trajectory that never crosses the target plane,
/// a search that exhausts its budget above tolerance) are reported as flags
/// on [`crate::Trajectory`] and [`crate::ThrowRecommendation`] instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("time step must be positive, got {0}")]
    NonPositiveTimeStep(f64),

    #[error("max time must be positive, got {0}")]
    NonPositiveMaxTime(f64),

    #[error("speed must be positive, got {0}")]
    NonPositiveSpeed(f64),

    #[error("pitch angle {0}° outside [-90, 90]")]
    PitchOutOfRange(f64),

    #[error("{name} range invalid: min {min} must be below max {max}")]
    MalformedRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("solution count must be at least 1")]
    NoSolutionBands,

    #[error("population size {0} too small, need at least 4")]
    PopulationTooSmall(usize),

    #[error("scenario file error: {0}")]
    Scenario(String),
}

pub type Result<T> = std::result::Result<T, Error>;
