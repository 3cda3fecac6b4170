mod buffer;
mod extract;
mod projection;

pub use buffer::{
    buffer, buffer_line_string, buffer_multi_line_string, buffer_multi_polygon, buffer_point,
    union_and_buffer,
};
pub use extract::{centroid, point_coords};
pub use projection::{project_lat_lon, to_geographic, to_projected};
