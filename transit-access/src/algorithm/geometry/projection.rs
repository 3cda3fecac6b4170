use crate::model::{AccessError, Crs, Layer, Projector, Reproject};
use geo::{point, Point};

/// reprojects a layer into the metric reference system used for every
/// distance, buffer and area computation. layers already in [`Crs::METRIC`]
/// are returned unchanged.
pub fn to_projected<T: Reproject + Clone>(layer: &Layer<T>) -> Result<Layer<T>, AccessError> {
    let result = layer.reprojected(Crs::METRIC)?;
    log::debug!(
        "projected {} rows from {} to {}",
        result.len(),
        layer.crs,
        Crs::METRIC
    );
    Ok(result)
}

/// reprojects a layer into a geographic (longitude/latitude) reference system.
pub fn to_geographic<T: Reproject + Clone>(
    layer: &Layer<T>,
    target: Crs,
) -> Result<Layer<T>, AccessError> {
    if !target.is_geographic() {
        return Err(AccessError::InvalidParameter(format!(
            "{target} is not a geographic reference system"
        )));
    }
    layer.reprojected(target)
}

/// projects a latitude/longitude pair given in `crs` into [`Crs::METRIC`].
pub fn project_lat_lon(latitude: f64, longitude: f64, crs: Crs) -> Result<Point<f64>, AccessError> {
    if !crs.is_geographic() {
        return Err(AccessError::InvalidParameter(format!(
            "latitude/longitude queries require a geographic reference system, found {crs}"
        )));
    }
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AccessError::GeometryError(format!(
            "({latitude}, {longitude}) is not a valid latitude/longitude"
        )));
    }
    let projector = Projector::new(crs, Crs::METRIC)?;
    projector.apply(&point! { x: longitude, y: latitude })
}

#[cfg(test)]
mod test {
    use super::{project_lat_lon, to_geographic, to_projected};
    use crate::model::{Crs, Layer, Stop, TransitMode};
    use geo::point;

    #[test]
    fn test_projected_layer_is_identity() {
        let stop = Stop::new("a", point! { x: 10.0, y: 20.0 }, TransitMode::Bus, "", None);
        let layer = Layer::new(Crs::METRIC, vec![stop]);
        let result = to_projected(&layer).expect("should project");
        assert_eq!(result, layer);
    }

    #[test]
    fn test_geographic_layer_is_projected() {
        let stop = Stop::new(
            "yamaguchi",
            point! { x: 131.474129, y: 34.178293 },
            TransitMode::Bus,
            "",
            Some(12.0),
        );
        let layer = Layer::new(Crs::Jgd2011, vec![stop]);
        let result = to_projected(&layer).expect("should project");
        assert_eq!(result.crs, Crs::METRIC);
        assert!(result.rows[0].point.x() > 500_000.0);
        assert_eq!(result.rows[0].frequency, Some(12.0));

        let back = to_geographic(&result, Crs::Jgd2011).expect("should project");
        assert!((back.rows[0].point.x() - 131.474129).abs() < 1e-6);
    }

    #[test]
    fn test_to_geographic_rejects_metric_target() {
        let layer: Layer<Stop> = Layer::new(Crs::METRIC, vec![]);
        assert!(to_geographic(&layer, Crs::METRIC).is_err());
    }

    #[test]
    fn test_project_lat_lon_rejects_out_of_range() {
        assert!(project_lat_lon(134.0, 34.0, Crs::Wgs84).is_err());
        assert!(project_lat_lon(34.0, 131.0, Crs::METRIC).is_err());
    }
}
