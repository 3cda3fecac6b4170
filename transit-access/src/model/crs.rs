use super::AccessError;
use geo::{Coord, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// coordinate reference systems understood by the accessibility model. all
/// distance, buffer and area computations happen in [`Crs::METRIC`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Crs {
    /// WGS84 longitude/latitude in degrees
    #[serde(rename = "EPSG:4326")]
    #[default]
    Wgs84,
    /// JGD2000 longitude/latitude in degrees
    #[serde(rename = "EPSG:4612")]
    Jgd2000,
    /// JGD2011 longitude/latitude in degrees
    #[serde(rename = "EPSG:6668")]
    Jgd2011,
    /// JGD2000 / UTM zone 52N, meters
    #[serde(rename = "EPSG:3098")]
    Jgd2000Utm52,
}

impl Crs {
    pub const METRIC: Crs = Crs::Jgd2000Utm52;

    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::Jgd2000 => 4612,
            Crs::Jgd2011 => 6668,
            Crs::Jgd2000Utm52 => 3098,
        }
    }

    pub fn is_geographic(&self) -> bool {
        !matches!(self, Crs::Jgd2000Utm52)
    }

    fn proj4_string(&self) -> &'static str {
        match self {
            Crs::Wgs84 => "+proj=longlat +datum=WGS84 +no_defs +type=crs",
            Crs::Jgd2000 | Crs::Jgd2011 => {
                "+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs +type=crs"
            }
            Crs::Jgd2000Utm52 => {
                "+proj=utm +zone=52 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs"
            }
        }
    }

    fn build(&self) -> Result<Proj4, AccessError> {
        Proj4::from_proj_string(self.proj4_string()).map_err(|e| {
            AccessError::ProjectionError(format!("failed to build PROJ.4 for {self}: {e}"))
        })
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// converts coordinates between two [`Crs`]. geographic coordinates are
/// given and returned in degrees.
pub struct Projector {
    source: Crs,
    target: Crs,
    transform: Option<(Proj4, Proj4)>,
}

impl Projector {
    pub fn new(source: Crs, target: Crs) -> Result<Projector, AccessError> {
        let transform = if source == target {
            None
        } else {
            Some((source.build()?, target.build()?))
        };
        Ok(Projector {
            source,
            target,
            transform,
        })
    }

    pub fn project_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>, AccessError> {
        if !(coord.x.is_finite() && coord.y.is_finite()) {
            return Err(AccessError::GeometryError(format!(
                "non-finite coordinate ({}, {})",
                coord.x, coord.y
            )));
        }
        let (from, to) = match &self.transform {
            None => return Ok(coord),
            Some(pair) => pair,
        };
        let mut point = if self.source.is_geographic() {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };
        transform(from, to, &mut point).map_err(|e| {
            AccessError::ProjectionError(format!(
                "{} -> {} failed for ({}, {}): {e}",
                self.source, self.target, coord.x, coord.y
            ))
        })?;
        let (x, y) = if self.target.is_geographic() {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };
        if !(x.is_finite() && y.is_finite()) {
            return Err(AccessError::ProjectionError(format!(
                "{} -> {} produced non-finite output for ({}, {})",
                self.source, self.target, coord.x, coord.y
            )));
        }
        Ok(Coord { x, y })
    }

    /// reprojects every coordinate of a geometry.
    pub fn apply<G>(&self, geometry: &G) -> Result<G::Output, AccessError>
    where
        G: MapCoords<f64, f64>,
    {
        geometry.try_map_coords(|c| self.project_coord(c))
    }
}
