use serde::{Deserialize, Serialize};

/// assigns `label` to every district whose name starts with `prefix`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ClusterRule {
    pub prefix: String,
    pub label: String,
}

impl ClusterRule {
    pub fn new(prefix: &str, label: &str) -> ClusterRule {
        ClusterRule {
            prefix: prefix.to_string(),
            label: label.to_string(),
        }
    }

    pub fn matches(&self, district_name: &str) -> bool {
        district_name.starts_with(&self.prefix)
    }
}
