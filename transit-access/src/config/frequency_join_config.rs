use crate::model::AccessError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct FrequencyJoinConfiguration {
    /// radius of the capture disk around each stop, in meters
    pub buffer_m: f64,
}

impl Default for FrequencyJoinConfiguration {
    fn default() -> Self {
        Self {
            buffer_m: 10.0,
        }
    }
}

impl FrequencyJoinConfiguration {
    pub fn validate(&self) -> Result<(), AccessError> {
        if !(self.buffer_m > 0.0 && self.buffer_m.is_finite()) {
            return Err(AccessError::InvalidParameter(format!(
                "frequency join buffer_m must be positive, found {}",
                self.buffer_m
            )));
        }
        Ok(())
    }
}
