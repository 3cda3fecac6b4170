use super::{Crs, TransitMode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("invalid geometry: {0}")]
    GeometryError(String),
    #[error("failure reprojecting coordinates: {0}")]
    ProjectionError(String),
    #[error("score function input {value} outside of log domain (normalization range [{min}, {max}])")]
    DomainError { value: f64, min: f64, max: f64 },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("no stops available for nearest neighbor search")]
    EmptyStopSet,
    #[error("{mode} stop '{stop}' has no frequency value")]
    MissingFrequency { stop: String, mode: TransitMode },
    #[error("expected geometries in {expected}, found {found}")]
    CrsMismatch { expected: Crs, found: Crs },
}
