use crate::model::AccessError;
use geo::{BooleanOps, Coord, Geometry, LineString, MultiLineString, MultiPolygon, Point, Polygon};
use std::f64::consts::PI;

/// number of vertices used to approximate a disk when none is configured.
pub const DEFAULT_DISK_SEGMENTS: usize = 64;

/// expands a geometry by `radius_m` meters (Minkowski sum with a disk).
/// the geometry must already be in a metric reference system.
pub fn buffer(geometry: &Geometry<f64>, radius_m: f64) -> Result<MultiPolygon<f64>, AccessError> {
    let segments = DEFAULT_DISK_SEGMENTS;
    match geometry {
        Geometry::Point(p) => Ok(MultiPolygon::new(vec![buffer_point(p, radius_m, segments)?])),
        Geometry::LineString(l) => buffer_line_string(l, radius_m, segments),
        Geometry::MultiLineString(ml) => buffer_multi_line_string(ml, radius_m, segments),
        Geometry::Polygon(p) => buffer_multi_polygon(&MultiPolygon::new(vec![p.clone()]), radius_m),
        Geometry::MultiPolygon(mp) => buffer_multi_polygon(mp, radius_m),
        _ => Err(AccessError::GeometryError(String::from(
            "buffer supports POINT, LINESTRING, MULTILINESTRING, POLYGON and MULTIPOLYGON",
        ))),
    }
}

/// a regular polygon with `segments` vertices inscribed in the disk of
/// radius `radius_m` around `point`.
pub fn buffer_point(
    point: &Point<f64>,
    radius_m: f64,
    segments: usize,
) -> Result<Polygon<f64>, AccessError> {
    validate_radius(radius_m)?;
    if segments < 3 {
        return Err(AccessError::InvalidParameter(format!(
            "disk approximation needs at least 3 segments, found {segments}"
        )));
    }
    let (cx, cy) = super::point_coords(point)?;
    let ring = (0..segments)
        .map(|i| {
            let theta = 2.0 * PI * (i as f64) / (segments as f64);
            Coord {
                x: cx + radius_m * theta.cos(),
                y: cy + radius_m * theta.sin(),
            }
        })
        .collect::<Vec<_>>();
    Ok(Polygon::new(LineString::new(ring), vec![]))
}

/// union of the disks around each vertex and the rectangles swept along
/// each segment of the line.
pub fn buffer_line_string(
    line: &LineString<f64>,
    radius_m: f64,
    segments: usize,
) -> Result<MultiPolygon<f64>, AccessError> {
    validate_radius(radius_m)?;
    if line.0.is_empty() {
        return Err(AccessError::GeometryError(String::from(
            "cannot buffer empty LINESTRING",
        )));
    }
    let mut pieces: Vec<Polygon<f64>> = vec![];
    for coord in line.coords() {
        pieces.push(buffer_point(&Point(*coord), radius_m, segments)?);
    }
    for segment in line.lines() {
        let dx = segment.end.x - segment.start.x;
        let dy = segment.end.y - segment.start.y;
        let length = dx.hypot(dy);
        if length == 0.0 {
            continue;
        }
        let nx = -dy / length * radius_m;
        let ny = dx / length * radius_m;
        let rect = LineString::from(vec![
            (segment.start.x + nx, segment.start.y + ny),
            (segment.end.x + nx, segment.end.y + ny),
            (segment.end.x - nx, segment.end.y - ny),
            (segment.start.x - nx, segment.start.y - ny),
        ]);
        pieces.push(Polygon::new(rect, vec![]));
    }
    Ok(union_all(pieces.into_iter().map(|p| MultiPolygon::new(vec![p]))))
}

pub fn buffer_multi_line_string(
    lines: &MultiLineString<f64>,
    radius_m: f64,
    segments: usize,
) -> Result<MultiPolygon<f64>, AccessError> {
    if lines.0.is_empty() {
        return Err(AccessError::GeometryError(String::from(
            "cannot buffer empty MULTILINESTRING",
        )));
    }
    let buffered = lines
        .iter()
        .map(|l| buffer_line_string(l, radius_m, segments))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(union_all(buffered.into_iter()))
}

/// offsets the boundary of a polygonal geometry outward by `radius_m`, with
/// rounded joins at convex corners.
pub fn buffer_multi_polygon(
    polygons: &MultiPolygon<f64>,
    radius_m: f64,
) -> Result<MultiPolygon<f64>, AccessError> {
    validate_radius(radius_m)?;
    if polygons.0.is_empty() {
        return Err(AccessError::GeometryError(String::from(
            "cannot buffer empty MULTIPOLYGON",
        )));
    }
    if radius_m == 0.0 {
        return Ok(polygons.clone());
    }
    Ok(geo_buffer::buffer_multi_polygon_rounded(polygons, radius_m))
}

/// union of a set of polygonal geometries, then buffered by `radius_m`. used
/// to build a containment region with slack for features near its boundary.
pub fn union_and_buffer<'a, I>(polygons: I, radius_m: f64) -> Result<MultiPolygon<f64>, AccessError>
where
    I: IntoIterator<Item = &'a MultiPolygon<f64>>,
{
    let collected = polygons.into_iter().cloned().collect::<Vec<_>>();
    if collected.iter().all(|mp| mp.0.is_empty()) {
        return Err(AccessError::GeometryError(String::from(
            "cannot build a region from an empty set of polygons",
        )));
    }
    let unioned = union_all(collected.into_iter());
    buffer_multi_polygon(&unioned, radius_m)
}

fn union_all<I>(polygons: I) -> MultiPolygon<f64>
where
    I: Iterator<Item = MultiPolygon<f64>>,
{
    polygons.fold(MultiPolygon::new(vec![]), |acc, next| {
        if acc.0.is_empty() {
            next
        } else {
            acc.union(&next)
        }
    })
}

fn validate_radius(radius_m: f64) -> Result<(), AccessError> {
    if radius_m.is_finite() && radius_m >= 0.0 {
        Ok(())
    } else {
        Err(AccessError::InvalidParameter(format!(
            "buffer radius must be a finite non-negative number of meters, found {radius_m}"
        )))
    }
}
