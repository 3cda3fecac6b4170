mod dataset_sources;
mod geodata_source;

pub use dataset_sources::{
    DatasetSources, DistrictSourceConfig, RouteSourceConfig, StopSourceConfig,
};
pub use geodata_source::{FeatureRow, GeodataSource};
