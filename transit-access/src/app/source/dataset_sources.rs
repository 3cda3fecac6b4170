use super::{FeatureRow, GeodataSource};
use crate::model::{
    AccessCliError, Crs, District, Layer, RouteSegment, Stop, TransitMode,
};
use geo::{Geometry, MultiLineString, MultiPolygon};
use serde::{Deserialize, Serialize};

/// where stops (or stations) are read from and which attributes hold their
/// name, route group and frequency.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StopSourceConfig {
    pub source: GeodataSource,
    pub name_field: String,
    pub route_group_field: Option<String>,
    /// per-stop trips per day. bus stops usually leave this unset and take
    /// their frequency from the routes instead.
    pub frequency_field: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteSourceConfig {
    pub source: GeodataSource,
    pub frequency_field: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DistrictSourceConfig {
    pub source: GeodataSource,
    pub name_field: String,
}

/// the geodata tables of a run. train tables are optional; a run without them
/// scores districts against bus stops only.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DatasetSources {
    pub bus_stops: StopSourceConfig,
    pub bus_routes: RouteSourceConfig,
    pub train_stations: Option<StopSourceConfig>,
    pub train_lines: Option<RouteSourceConfig>,
    pub districts: DistrictSourceConfig,
}

impl StopSourceConfig {
    pub fn read(&self, mode: TransitMode, crs: Crs) -> Result<Layer<Stop>, AccessCliError> {
        let fields = [
            Some(self.name_field.as_str()),
            self.route_group_field.as_deref(),
            self.frequency_field.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
        let rows = self.source.read(&fields)?;
        let stops = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let point = match &row.geometry {
                    Geometry::Point(p) => *p,
                    other => {
                        return Err(AccessCliError::SourceError(format!(
                            "{} row {idx}: expected point geometry, found {}",
                            self.source.file(),
                            geometry_name(other)
                        )))
                    }
                };
                let name = row.get(&self.name_field).unwrap_or_default();
                let route_group = self
                    .route_group_field
                    .as_deref()
                    .and_then(|f| row.get(f))
                    .unwrap_or_default();
                let frequency = read_frequency(row, self.frequency_field.as_deref(), idx)?;
                Ok(Stop::new(name, point, mode, route_group, frequency))
            })
            .collect::<Result<Vec<_>, AccessCliError>>()?;
        Ok(Layer::new(crs, stops))
    }
}

impl RouteSourceConfig {
    pub fn read(
        &self,
        mode: TransitMode,
        crs: Crs,
    ) -> Result<Layer<RouteSegment>, AccessCliError> {
        let fields = self.frequency_field.as_deref().into_iter().collect::<Vec<_>>();
        let rows = self.source.read(&fields)?;
        let segments = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let geometry = match &row.geometry {
                    Geometry::LineString(ls) => MultiLineString::new(vec![ls.clone()]),
                    Geometry::MultiLineString(mls) => mls.clone(),
                    other => {
                        return Err(AccessCliError::SourceError(format!(
                            "{} row {idx}: expected line geometry, found {}",
                            self.source.file(),
                            geometry_name(other)
                        )))
                    }
                };
                let frequency = read_frequency(row, self.frequency_field.as_deref(), idx)?;
                Ok(RouteSegment {
                    mode,
                    geometry,
                    frequency,
                })
            })
            .collect::<Result<Vec<_>, AccessCliError>>()?;
        Ok(Layer::new(crs, segments))
    }
}

impl DistrictSourceConfig {
    /// reads districts, each labeled with `default_label` until classified.
    pub fn read(&self, crs: Crs, default_label: &str) -> Result<Layer<District>, AccessCliError> {
        let rows = self.source.read(&[self.name_field.as_str()])?;
        let districts = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let geometry = match &row.geometry {
                    Geometry::Polygon(p) => MultiPolygon::new(vec![p.clone()]),
                    Geometry::MultiPolygon(mp) => mp.clone(),
                    other => {
                        return Err(AccessCliError::SourceError(format!(
                            "{} row {idx}: expected polygon geometry, found {}",
                            self.source.file(),
                            geometry_name(other)
                        )))
                    }
                };
                let name = row.get(&self.name_field).unwrap_or_default();
                Ok(District::new(name, geometry, default_label))
            })
            .collect::<Result<Vec<_>, AccessCliError>>()?;
        Ok(Layer::new(crs, districts))
    }
}

fn read_frequency(
    row: &FeatureRow,
    field: Option<&str>,
    idx: usize,
) -> Result<Option<f64>, AccessCliError> {
    let Some(value) = field.and_then(|f| row.get(f)) else {
        return Ok(None);
    };
    let frequency = value.parse::<f64>().map_err(|e| {
        AccessCliError::SourceError(format!("row {idx}: frequency '{value}' is not a number: {e}"))
    })?;
    Ok(Some(frequency))
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
