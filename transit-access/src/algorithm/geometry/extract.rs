use crate::model::AccessError;
use geo::{Centroid, Point};

/// centroid of a polygonal geometry.
pub fn centroid<G>(geometry: &G) -> Result<Point<f64>, AccessError>
where
    G: Centroid<Output = Option<Point<f64>>>,
{
    let c = geometry.centroid().ok_or_else(|| {
        AccessError::GeometryError(String::from("cannot compute centroid of empty geometry"))
    })?;
    point_coords(&c)?;
    Ok(c)
}

/// the (x, y) pair of a point, failing on NaN or infinite coordinates.
pub fn point_coords(point: &Point<f64>) -> Result<(f64, f64), AccessError> {
    let (x, y) = point.x_y();
    if x.is_finite() && y.is_finite() {
        Ok((x, y))
    } else {
        Err(AccessError::GeometryError(format!(
            "point has non-finite coordinates ({x}, {y})"
        )))
    }
}
