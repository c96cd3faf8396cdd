use thiserror::Error;

/// Precondition failures raised before any engine iteration begins.
#[derive(Debug, Error)]
pub enum OsilError {
    #[error("invalid distance matrix: {0}")]
    InvalidDistance(String),

    #[error("invalid cluster counts: {0}")]
    InvalidK(String),

    #[error("invalid sub-sample size {sample_size} for {n_items} items")]
    InvalidSampleSize { sample_size: usize, n_items: usize },

    #[error("trial and repeat counts must be at least 1")]
    InvalidRepeats,

    #[error("unrecognized variant: {0:?}")]
    InvalidVariant(String),

    #[error("unrecognized initialization method: {0:?}")]
    InvalidInitMethod(String),
}
