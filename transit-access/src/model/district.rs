use super::{AccessError, Projector, Reproject, TransitMode};
use crate::algorithm::geometry;
use geo::{MultiPolygon, Point};

/// an administrative area that receives an accessibility score.
#[derive(Clone, Debug, PartialEq)]
pub struct District {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
    pub cluster: String,
}

impl District {
    pub fn new(name: &str, geometry: MultiPolygon<f64>, cluster: &str) -> District {
        District {
            name: name.to_string(),
            geometry,
            cluster: cluster.to_string(),
        }
    }

    /// centroid of the district geometry, recomputed on every call.
    pub fn centroid(&self) -> Result<Point<f64>, AccessError> {
        geometry::centroid(&self.geometry)
    }
}

impl AsRef<District> for District {
    fn as_ref(&self) -> &District {
        self
    }
}

impl Reproject for District {
    fn reproject(&self, projector: &Projector) -> Result<Self, AccessError> {
        Ok(District {
            geometry: projector.apply(&self.geometry)?,
            ..self.clone()
        })
    }
}

/// a district along with the stop selected for it by the nearest stop scorer.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredDistrict {
    pub district: District,
    pub stop_name: String,
    pub stop_mode: TransitMode,
    /// meters from the district centroid to the stop
    pub distance: f64,
    /// trips per day at the stop
    pub frequency: f64,
    pub score: f64,
}

impl AsRef<District> for ScoredDistrict {
    fn as_ref(&self) -> &District {
        &self.district
    }
}

impl Reproject for ScoredDistrict {
    fn reproject(&self, projector: &Projector) -> Result<Self, AccessError> {
        Ok(ScoredDistrict {
            district: self.district.reproject(projector)?,
            ..self.clone()
        })
    }
}
