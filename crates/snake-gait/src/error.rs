use thiserror::Error;

#[derive(Debug, Error)]
pub enum GaitError {
    /// Odd/even phase lists cannot be interleaved into consecutive joints.
    #[error("phase lists do not interleave: {odd} odd-slot vs {even} even-slot values")]
    PhaseListSizeMismatch { odd: usize, even: usize },

    #[error("{field} has {got} values, {needed} joints are active")]
    ParameterListTooShort { field: &'static str, needed: usize, got: usize },

    #[error("unknown gait {0:?}")]
    UnknownGait(String),

    #[error("gait {id:?} has an unsupported parameter layout: {detail}")]
    InvalidGaitShape { id: String, detail: String },

    #[error("gait file defines no [[gait]] entries")]
    NoGaits,

    #[error("speed scalar {0} outside {min}..={max}", min = crate::MIN_SPEED, max = crate::MAX_SPEED)]
    SpeedOutOfRange(f64),

    #[error("gait {0:?} only runs in relative mode")]
    ModeLocked(String),

    #[error("read gait file {path}: {source}")]
    Read { path: String, source: std::io::Error },

    #[error("parse gait file: {0}")]
    Parse(#[from] toml::de::Error),
}
