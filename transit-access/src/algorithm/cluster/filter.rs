use crate::{
    algorithm::geometry,
    model::{AccessError, Crs, District, Layer, Reproject, Route, Stop},
};
use geo::Contains;
use std::collections::{BTreeSet, HashSet};

/// the three tables narrowed to a set of clusters.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterSelection<D> {
    pub districts: Layer<D>,
    pub stops: Layer<Stop>,
    pub routes: Layer<Route>,
}

/// every distinct cluster label in a district table, sorted.
pub fn cluster_labels<D: AsRef<District>>(districts: &Layer<D>) -> BTreeSet<String> {
    districts
        .iter()
        .map(|d| d.as_ref().cluster.clone())
        .collect()
}

/// narrows districts, stops and routes to the given cluster labels.
///
/// districts are kept when their label is in `labels`. stops and routes are
/// kept when their geometry lies within the union of the kept districts
/// buffered by `region_buffer_m`, so features just outside a district boundary
/// survive. when `labels` covers every district the tables are returned
/// unchanged. all tables are returned in the metric reference system.
pub fn filter_by_clusters<D>(
    districts: &Layer<D>,
    stops: &Layer<Stop>,
    routes: &Layer<Route>,
    labels: &HashSet<String>,
    region_buffer_m: f64,
) -> Result<ClusterSelection<D>, AccessError>
where
    D: AsRef<District> + Reproject + Clone,
{
    let districts = geometry::to_projected(districts)?;
    let stops = geometry::to_projected(stops)?;
    let routes = geometry::to_projected(routes)?;

    let kept = districts
        .iter()
        .filter(|d| labels.contains(&d.as_ref().cluster))
        .cloned()
        .collect::<Vec<_>>();

    if kept.len() == districts.len() {
        log::info!("cluster filter keeps every district, tables unchanged");
        return Ok(ClusterSelection {
            districts,
            stops,
            routes,
        });
    }
    if kept.is_empty() {
        log::warn!("no district belongs to clusters {labels:?}");
        return Ok(ClusterSelection {
            districts: Layer::new(Crs::METRIC, vec![]),
            stops: Layer::new(Crs::METRIC, vec![]),
            routes: Layer::new(Crs::METRIC, vec![]),
        });
    }

    let region = geometry::union_and_buffer(
        kept.iter().map(|d| &d.as_ref().geometry),
        region_buffer_m,
    )?;
    let kept_stops = stops
        .rows
        .into_iter()
        .filter(|s| region.contains(&s.point))
        .collect::<Vec<_>>();
    let kept_routes = routes
        .rows
        .into_iter()
        .filter(|r| region.contains(&r.geometry))
        .collect::<Vec<_>>();
    log::info!(
        "cluster filter kept {} districts, {} stops, {} routes",
        kept.len(),
        kept_stops.len(),
        kept_routes.len()
    );
    Ok(ClusterSelection {
        districts: Layer::new(Crs::METRIC, kept),
        stops: Layer::new(Crs::METRIC, kept_stops),
        routes: Layer::new(Crs::METRIC, kept_routes),
    })
}
