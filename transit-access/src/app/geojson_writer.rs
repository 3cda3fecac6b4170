use crate::{
    algorithm::geometry,
    model::{AccessCliError, Crs, Layer, Reproject, Route, ScoredDistrict, Stop},
};
use geojson::{Feature, FeatureCollection, JsonObject};
use serde_json::json;
use std::path::{Path, PathBuf};

pub const DISTRICTS_FILENAME: &str = "districts.geojson";
pub const STOPS_FILENAME: &str = "stops.geojson";
pub const ROUTES_FILENAME: &str = "routes.geojson";

/// writes the scored districts, stops and routes as three GeoJSON feature
/// collections in `output_directory`, reprojected to the geographic system
/// `output_crs`. returns the written file paths.
pub fn write_geojson(
    output_directory: &Path,
    districts: &Layer<ScoredDistrict>,
    stops: &Layer<Stop>,
    routes: &Layer<Route>,
    output_crs: Crs,
) -> Result<Vec<PathBuf>, AccessCliError> {
    std::fs::create_dir_all(output_directory)?;
    let written = vec![
        write_layer(output_directory, DISTRICTS_FILENAME, districts, output_crs, district_feature)?,
        write_layer(output_directory, STOPS_FILENAME, stops, output_crs, stop_feature)?,
        write_layer(output_directory, ROUTES_FILENAME, routes, output_crs, route_feature)?,
    ];
    Ok(written)
}

fn write_layer<T, F>(
    output_directory: &Path,
    filename: &str,
    layer: &Layer<T>,
    output_crs: Crs,
    to_feature: F,
) -> Result<PathBuf, AccessCliError>
where
    T: Reproject + Clone,
    F: Fn(&T) -> Feature,
{
    let geographic = geometry::to_geographic(layer, output_crs)?;
    let collection = FeatureCollection {
        bbox: None,
        features: geographic.iter().map(to_feature).collect(),
        foreign_members: None,
    };
    let path = output_directory.join(filename);
    std::fs::write(&path, serde_json::to_string(&collection)?)?;
    log::info!("wrote {} features to {}", geographic.len(), path.to_string_lossy());
    Ok(path)
}

fn feature(value: geojson::Value, properties: serde_json::Value) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(value)),
        id: None,
        properties: properties.as_object().cloned().or_else(|| Some(JsonObject::new())),
        foreign_members: None,
    }
}

fn district_feature(row: &ScoredDistrict) -> Feature {
    feature(
        geojson::Value::from(&row.district.geometry),
        json!({
            "name": row.district.name,
            "cluster": row.district.cluster,
            "stop_name": row.stop_name,
            "stop_mode": row.stop_mode,
            "distance": row.distance,
            "frequency": row.frequency,
            "score": row.score,
        }),
    )
}

fn stop_feature(row: &Stop) -> Feature {
    feature(
        geojson::Value::from(&row.point),
        json!({
            "name": row.name,
            "mode": row.mode,
            "route_group": row.route_group,
            "frequency": row.frequency,
        }),
    )
}

fn route_feature(row: &Route) -> Feature {
    feature(
        geojson::Value::from(&row.geometry),
        json!({ "mode": row.mode }),
    )
}

#[cfg(test)]
mod test {
    use super::{write_geojson, DISTRICTS_FILENAME, STOPS_FILENAME};
    use crate::algorithm::geometry::project_lat_lon;
    use crate::config::AccessConfiguration;
    use crate::model::{Crs, District, Layer, Route, ScoredDistrict, Stop, TransitMode};
    use geo::{line_string, polygon, MultiLineString, MultiPolygon};

    #[test]
    fn test_write_geographic_collections() {
        let center = project_lat_lon(34.178293, 131.474129, Crs::Wgs84).expect("should project");
        let (cx, cy) = (center.x(), center.y());
        let square = polygon![
            (x: cx - 100.0, y: cy - 100.0),
            (x: cx + 100.0, y: cy - 100.0),
            (x: cx + 100.0, y: cy + 100.0),
            (x: cx - 100.0, y: cy + 100.0),
        ];
        let districts = Layer::new(
            Crs::METRIC,
            vec![ScoredDistrict {
                district: District::new("中心部", MultiPolygon::new(vec![square]), "中心部"),
                stop_name: String::from("山口駅"),
                stop_mode: TransitMode::Train,
                distance: 80.0,
                frequency: 36.0,
                score: 7.5,
            }],
        );
        let stops = Layer::new(
            Crs::METRIC,
            vec![Stop::new("山口駅", center, TransitMode::Train, "山口線", Some(36.0))],
        );
        let routes = Layer::new(
            Crs::METRIC,
            vec![Route {
                mode: TransitMode::Train,
                geometry: MultiLineString::new(vec![line_string![
                    (x: cx - 50.0, y: cy),
                    (x: cx + 50.0, y: cy),
                ]]),
            }],
        );

        let dir = std::env::temp_dir().join("transit_access_test_geojson");
        let written =
            write_geojson(&dir, &districts, &stops, &routes, Crs::Wgs84).expect("should write");
        assert_eq!(written.len(), 3);

        let text = std::fs::read_to_string(dir.join(DISTRICTS_FILENAME)).expect("should read");
        let collection: geojson::FeatureCollection = text.parse::<geojson::GeoJson>()
            .expect("valid geojson")
            .try_into()
            .expect("feature collection");
        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(
            feature.property("stop_name").and_then(|v| v.as_str()),
            Some("山口駅")
        );
        assert_eq!(
            feature.property("stop_mode").and_then(|v| v.as_str()),
            Some("train")
        );
        let geom: geo::Geometry<f64> = feature
            .geometry
            .clone()
            .expect("has geometry")
            .try_into()
            .expect("converts");
        let rect = geo::BoundingRect::bounding_rect(&geom).expect("non-empty");
        assert!(rect.min().x > 131.0 && rect.max().x < 132.0);
        assert!(rect.min().y > 34.0 && rect.max().y < 34.5);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_write_from_metric_source_configuration() {
        let conf: AccessConfiguration =
            toml::from_str(r#"source_crs = "EPSG:3098""#).expect("should decode");
        let station = project_lat_lon(34.178293, 131.474129, Crs::Wgs84).expect("should project");
        let stops = Layer::new(
            Crs::METRIC,
            vec![Stop::new("山口駅", station, TransitMode::Train, "山口線", Some(36.0))],
        );
        let districts: Layer<ScoredDistrict> = Layer::new(Crs::METRIC, vec![]);
        let routes: Layer<Route> = Layer::new(Crs::METRIC, vec![]);

        let dir = std::env::temp_dir().join("transit_access_test_geojson_metric_source");
        write_geojson(&dir, &districts, &stops, &routes, conf.output_crs())
            .expect("metric sources still write geographic output");

        let text = std::fs::read_to_string(dir.join(STOPS_FILENAME)).expect("should read");
        let collection: geojson::FeatureCollection = text
            .parse::<geojson::GeoJson>()
            .expect("valid geojson")
            .try_into()
            .expect("feature collection");
        let geom: geo::Geometry<f64> = collection.features[0]
            .geometry
            .clone()
            .expect("has geometry")
            .try_into()
            .expect("converts");
        match geom {
            geo::Geometry::Point(p) => {
                assert!((p.x() - 131.474129).abs() < 1e-4, "{p:?}");
                assert!((p.y() - 34.178293).abs() < 1e-4, "{p:?}");
            }
            other => panic!("expected a point, found {other:?}"),
        }
        let _ = std::fs::remove_dir_all(dir);
    }
}
