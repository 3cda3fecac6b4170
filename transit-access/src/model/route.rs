use super::{AccessError, Projector, Reproject, TransitMode};
use geo::MultiLineString;

/// a route as read from the source, still carrying the per-segment frequency
/// attribute consumed by the frequency join.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteSegment {
    pub mode: TransitMode,
    pub geometry: MultiLineString<f64>,
    pub frequency: Option<f64>,
}

/// read-only route geometry used for display and region filtering.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub mode: TransitMode,
    pub geometry: MultiLineString<f64>,
}

impl From<RouteSegment> for Route {
    fn from(value: RouteSegment) -> Self {
        Route {
            mode: value.mode,
            geometry: value.geometry,
        }
    }
}

impl Reproject for RouteSegment {
    fn reproject(&self, projector: &Projector) -> Result<Self, AccessError> {
        Ok(RouteSegment {
            mode: self.mode,
            geometry: projector.apply(&self.geometry)?,
            frequency: self.frequency,
        })
    }
}

impl Reproject for Route {
    fn reproject(&self, projector: &Projector) -> Result<Self, AccessError> {
        Ok(Route {
            mode: self.mode,
            geometry: projector.apply(&self.geometry)?,
        })
    }
}
