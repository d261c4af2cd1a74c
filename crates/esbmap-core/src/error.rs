use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejections of caller-supplied view parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("max_points must be greater than zero")]
    InvalidMaxPoints,

    #[error("min_confidence must be within [0, 1], got {0}")]
    InvalidConfidence(f32),

    #[error("max_distance must be a non-negative number, got {0}")]
    InvalidDistance(f32),
}
