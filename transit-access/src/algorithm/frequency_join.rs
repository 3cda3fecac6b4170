use crate::{
    algorithm::geometry,
    config::FrequencyJoinConfiguration,
    model::{AccessError, Layer, Route, RouteSegment, Stop},
};
use geo::{BoundingRect, Distance, Euclidean, Rect};
use kdam::tqdm;
use rstar::{
    primitives::{GeomWithData, Rectangle},
    RTree, AABB,
};

type RouteEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// stops with their derived frequency, the routes with their frequency
/// attribute dropped, and the names of stops no route passes near.
#[derive(Debug)]
pub struct FrequencyJoinResult {
    pub stops: Layer<Stop>,
    pub routes: Layer<Route>,
    pub unmatched: Vec<String>,
}

/// attaches a frequency to every stop from the routes that pass within
/// `buffer_m` of it. a stop's frequency is the maximum frequency among the
/// intersecting routes of its own mode, or None if there are none.
///
/// both layers are projected to the metric reference system first, and the
/// result is returned in that system.
pub fn join_frequencies(
    stops: &Layer<Stop>,
    segments: &Layer<RouteSegment>,
    config: &FrequencyJoinConfiguration,
) -> Result<FrequencyJoinResult, AccessError> {
    config.validate()?;
    let stops = geometry::to_projected(stops)?;
    let segments = geometry::to_projected(segments)?;

    let envelopes = segments
        .iter()
        .enumerate()
        .filter_map(|(idx, segment)| match segment.geometry.bounding_rect() {
            Some(rect) => Some(GeomWithData::new(rectangle(&rect), idx)),
            None => {
                log::warn!("route segment {idx} has empty geometry and is ignored");
                None
            }
        })
        .collect::<Vec<_>>();
    let rtree: RTree<RouteEnvelope> = RTree::bulk_load(envelopes);

    let iter = tqdm!(stops.iter(), total = stops.len(), desc = "frequency join");
    let mut joined = Vec::with_capacity(stops.len());
    let mut unmatched = vec![];
    for stop in iter {
        // a route meets the capture disk when its distance to the stop is within the radius
        let (x, y) = geometry::point_coords(&stop.point)?;
        let r = config.buffer_m;
        let query = AABB::from_corners([x - r, y - r], [x + r, y + r]);
        let frequency = rtree
            .locate_in_envelope_intersecting(&query)
            .map(|candidate| &segments.rows[candidate.data])
            .filter(|segment| {
                segment.mode == stop.mode
                    && Euclidean.distance(&segment.geometry, &stop.point) <= r
            })
            .filter_map(|segment| segment.frequency)
            .fold(None, |acc: Option<f64>, f| match acc {
                Some(best) if best >= f => Some(best),
                _ => Some(f),
            });
        if frequency.is_none() {
            log::warn!(
                "{} stop '{}' has no route within {}m",
                stop.mode,
                stop.name,
                config.buffer_m
            );
            unmatched.push(stop.name.clone());
        }
        joined.push(stop.with_frequency(frequency));
    }
    eprintln!();
    log::info!(
        "joined frequencies for {} stops, {} without an intersecting route",
        joined.len(),
        unmatched.len()
    );

    let routes = segments.rows.into_iter().map(Route::from).collect();
    Ok(FrequencyJoinResult {
        stops: Layer::new(stops.crs, joined),
        routes: Layer::new(segments.crs, routes),
        unmatched,
    })
}

fn rectangle(rect: &Rect<f64>) -> Rectangle<[f64; 2]> {
    Rectangle::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

#[cfg(test)]
mod test {
    use super::join_frequencies;
    use crate::config::FrequencyJoinConfiguration;
    use crate::model::{Crs, Layer, RouteSegment, Stop, TransitMode};
    use geo::{line_string, point, MultiLineString};

    fn segment(mode: TransitMode, y: f64, frequency: Option<f64>) -> RouteSegment {
        RouteSegment {
            mode,
            geometry: MultiLineString::new(vec![line_string![
                (x: -500.0, y: y),
                (x: 500.0, y: y),
            ]]),
            frequency,
        }
    }

    fn bus_stop(name: &str, x: f64, y: f64) -> Stop {
        Stop::new(name, point! { x: x, y: y }, TransitMode::Bus, "g", None)
    }

    #[test]
    fn test_max_of_intersecting_routes() {
        let stops = Layer::new(Crs::METRIC, vec![bus_stop("a", 0.0, 0.0)]);
        let segments = Layer::new(
            Crs::METRIC,
            vec![
                segment(TransitMode::Bus, 5.0, Some(12.0)),
                segment(TransitMode::Bus, -3.0, Some(40.0)),
                segment(TransitMode::Bus, 50.0, Some(99.0)),
            ],
        );
        let result = join_frequencies(&stops, &segments, &FrequencyJoinConfiguration::default())
            .expect("join should succeed");
        assert_eq!(result.stops.rows[0].frequency, Some(40.0));
        assert!(result.unmatched.is_empty());
        assert_eq!(result.routes.len(), 3);
    }

    #[test]
    fn test_no_route_yields_missing_frequency() {
        let stops = Layer::new(
            Crs::METRIC,
            vec![bus_stop("near", 0.0, 0.0), bus_stop("far", 0.0, 300.0)],
        );
        let segments = Layer::new(Crs::METRIC, vec![segment(TransitMode::Bus, 2.0, Some(8.0))]);
        let result = join_frequencies(&stops, &segments, &FrequencyJoinConfiguration::default())
            .expect("join should succeed");
        assert_eq!(result.stops.rows[0].frequency, Some(8.0));
        assert_eq!(result.stops.rows[1].frequency, None);
        assert_eq!(result.unmatched, vec![String::from("far")]);
    }

    #[test]
    fn test_other_mode_routes_ignored() {
        let stops = Layer::new(Crs::METRIC, vec![bus_stop("a", 0.0, 0.0)]);
        let segments = Layer::new(
            Crs::METRIC,
            vec![segment(TransitMode::Train, 0.0, Some(60.0))],
        );
        let result = join_frequencies(&stops, &segments, &FrequencyJoinConfiguration::default())
            .expect("join should succeed");
        assert_eq!(result.stops.rows[0].frequency, None);
    }

    #[test]
    fn test_empty_route_table() {
        let stops = Layer::new(Crs::METRIC, vec![bus_stop("a", 0.0, 0.0)]);
        let segments: Layer<RouteSegment> = Layer::new(Crs::METRIC, vec![]);
        let result = join_frequencies(&stops, &segments, &FrequencyJoinConfiguration::default())
            .expect("join should succeed");
        assert_eq!(result.stops.rows[0].frequency, None);
    }

    #[test]
    fn test_route_at_buffer_radius_matches() {
        let stops = Layer::new(Crs::METRIC, vec![bus_stop("edge", 0.0, 0.0)]);
        let segments = Layer::new(
            Crs::METRIC,
            vec![
                segment(TransitMode::Bus, 9.995, Some(30.0)),
                segment(TransitMode::Bus, -10.0, Some(20.0)),
                segment(TransitMode::Bus, 10.01, Some(90.0)),
            ],
        );
        let result = join_frequencies(&stops, &segments, &FrequencyJoinConfiguration::default())
            .expect("join should succeed");
        assert_eq!(result.stops.rows[0].frequency, Some(30.0));
    }
}
