mod geojson_writer;
mod pipeline;
pub mod source;

pub use geojson_writer::{write_geojson, DISTRICTS_FILENAME, ROUTES_FILENAME, STOPS_FILENAME};
pub use pipeline::{run_pipeline, AccessResult, PipelineInputs};
