pub mod cluster;
pub mod dataset_assembly;
mod district_lookup;
pub mod frequency_join;
pub mod geometry;
pub mod nearest_stop;
pub mod scoring;

pub use dataset_assembly::{assemble, train_tables, ModeTables, TransitDataset};
pub use district_lookup::DistrictLookup;
pub use frequency_join::{join_frequencies, FrequencyJoinResult};
pub use nearest_stop::score_districts;
