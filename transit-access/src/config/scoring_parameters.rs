use crate::{algorithm::scoring::DEFAULT_ALPHA, model::AccessError};
use serde::{Deserialize, Serialize};

/// tunable constants of the nearest stop scorer. multiple instances may
/// coexist, for example one per city.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ScoringParameters {
    /// trips per day treated as negligible and as best-possible service
    pub frequency_range: (f64, f64),
    /// meters treated as best-possible and as negligible proximity
    pub distance_range: (f64, f64),
    /// knee rounding of the smooth saturation
    pub alpha: f64,
    /// upper bound of the composite score
    pub score_max: f64,
    /// number of nearest stops considered per district
    pub neighbors: usize,
    /// distances below this are raised to it before scoring
    pub distance_floor: f64,
    /// frequencies below this are raised to it before scoring
    pub frequency_floor: f64,
}

impl Default for ScoringParameters {
    fn default() -> Self {
        Self {
            frequency_range: (0.5, 144.0),
            distance_range: (40.0, 2400.0),
            alpha: DEFAULT_ALPHA,
            score_max: 10.0,
            neighbors: 5,
            distance_floor: 1e-6,
            frequency_floor: 1e-6,
        }
    }
}

impl ScoringParameters {
    pub fn validate(&self) -> Result<(), AccessError> {
        validate_range("frequency_range", self.frequency_range)?;
        validate_range("distance_range", self.distance_range)?;
        if !(self.alpha > 0.0 && self.alpha.is_finite()) {
            return Err(AccessError::InvalidParameter(format!(
                "alpha must be positive, found {}",
                self.alpha
            )));
        }
        if !(self.score_max > 0.0 && self.score_max.is_finite()) {
            return Err(AccessError::InvalidParameter(format!(
                "score_max must be positive, found {}",
                self.score_max
            )));
        }
        if self.neighbors == 0 {
            return Err(AccessError::InvalidParameter(String::from(
                "neighbors must be at least 1",
            )));
        }
        for (name, floor) in [
            ("distance_floor", self.distance_floor),
            ("frequency_floor", self.frequency_floor),
        ] {
            if !(floor > 0.0 && floor.is_finite()) {
                return Err(AccessError::InvalidParameter(format!(
                    "{name} must be positive, found {floor}"
                )));
            }
        }
        Ok(())
    }
}

fn validate_range(name: &str, (min, max): (f64, f64)) -> Result<(), AccessError> {
    if min > 0.0 && max > min && max.is_finite() {
        Ok(())
    } else {
        Err(AccessError::InvalidParameter(format!(
            "{name} must satisfy 0 < min < max, found [{min}, {max}]"
        )))
    }
}
