mod access_cli_error;
mod access_error;
mod crs;
mod district;
mod layer;
mod route;
mod stop;
mod transit_mode;

pub use access_cli_error::AccessCliError;
pub use access_error::AccessError;
pub use crs::{Crs, Projector};
pub use district::{District, ScoredDistrict};
pub use layer::{Layer, Reproject};
pub use route::{Route, RouteSegment};
pub use stop::Stop;
pub use transit_mode::TransitMode;
