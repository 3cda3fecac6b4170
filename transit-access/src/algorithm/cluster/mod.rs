mod classifier;
mod cluster_rule;
mod filter;

pub use classifier::{classify, resolve_cluster};
pub use cluster_rule::ClusterRule;
pub use filter::{cluster_labels, filter_by_clusters, ClusterSelection};
