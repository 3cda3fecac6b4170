mod access_config;
mod cluster_config;
mod frequency_join_config;
mod missing_frequency_policy;
mod scoring_parameters;

pub use access_config::AccessConfiguration;
pub use cluster_config::{ClusterConfiguration, DEFAULT_CLUSTER_LABEL};
pub use frequency_join_config::FrequencyJoinConfiguration;
pub use missing_frequency_policy::MissingFrequencyPolicy;
pub use scoring_parameters::ScoringParameters;
