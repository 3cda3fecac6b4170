use crate::{algorithm::cluster::ClusterRule, model::AccessError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CLUSTER_LABEL: &str = "other";

/// how districts are grouped into named clusters and how much slack the
/// cluster filter leaves around the kept districts.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ClusterConfiguration {
    /// label given to districts that match no rule
    pub default_label: String,
    /// ordered prefix rules, later rules overwrite earlier ones
    pub rules: Vec<ClusterRule>,
    /// buffer around the kept districts when filtering stops and routes, in meters
    pub region_buffer_m: f64,
}

impl Default for ClusterConfiguration {
    fn default() -> Self {
        Self {
            default_label: String::from(DEFAULT_CLUSTER_LABEL),
            rules: vec![],
            region_buffer_m: 100.0,
        }
    }
}

impl ClusterConfiguration {
    pub fn validate(&self) -> Result<(), AccessError> {
        if !(self.region_buffer_m >= 0.0 && self.region_buffer_m.is_finite()) {
            return Err(AccessError::InvalidParameter(format!(
                "cluster region_buffer_m must be non-negative, found {}",
                self.region_buffer_m
            )));
        }
        if let Some(rule) = self.rules.iter().find(|r| r.prefix.is_empty()) {
            return Err(AccessError::InvalidParameter(format!(
                "cluster rule for label '{}' has an empty prefix",
                rule.label
            )));
        }
        Ok(())
    }
}
