use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("computed map center ({latitude}, {longitude}) is not a valid coordinate")]
    InvalidCenter { latitude: f64, longitude: f64 },
}
