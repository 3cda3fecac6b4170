use super::{AccessError, Projector, Reproject, TransitMode};
use geo::Point;

/// a transit boarding point. bus stops receive their frequency from the
/// frequency join, train stations carry it from their source attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub name: String,
    pub point: Point<f64>,
    pub mode: TransitMode,
    pub route_group: String,
    /// trips per day, or None when no serving route was found
    pub frequency: Option<f64>,
}

impl Stop {
    pub fn new(
        name: &str,
        point: Point<f64>,
        mode: TransitMode,
        route_group: &str,
        frequency: Option<f64>,
    ) -> Stop {
        Stop {
            name: name.to_string(),
            point,
            mode,
            route_group: route_group.to_string(),
            frequency,
        }
    }

    /// copy of this stop with the frequency replaced.
    pub fn with_frequency(&self, frequency: Option<f64>) -> Stop {
        Stop {
            frequency,
            ..self.clone()
        }
    }
}

impl Reproject for Stop {
    fn reproject(&self, projector: &Projector) -> Result<Self, AccessError> {
        let point = projector.apply(&self.point)?;
        Ok(Stop {
            point,
            ..self.clone()
        })
    }
}
