use serde::{Deserialize, Serialize};

/// what dataset assembly does with a stop that has no frequency value,
/// typically a bus stop with no route passing within the join buffer.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingFrequencyPolicy {
    /// abort with [`crate::model::AccessError::MissingFrequency`]
    #[default]
    Fail,
    /// drop the stop from the merged collection, logging a warning
    Exclude,
}
