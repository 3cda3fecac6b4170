use crate::{
    algorithm::{
        geometry,
        scoring::{composite_score, score_func},
    },
    config::ScoringParameters,
    model::{AccessError, Crs, District, Layer, ScoredDistrict, Stop},
};
use rayon::prelude::*;
use rstar::{primitives::GeomWithData, RTree};

type StopLocation = GeomWithData<[f64; 2], usize>;

/// one of the k nearest stops of a district along with its composite score.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// row index into the stop layer
    pub index: usize,
    pub distance: f64,
    pub frequency: f64,
    pub score: f64,
}

/// composite score of a stop with the given frequency at the given distance.
/// degenerate inputs are raised to the configured floors before the
/// log-based normalization.
pub fn score_candidate(
    frequency: f64,
    distance: f64,
    params: &ScoringParameters,
) -> Result<f64, AccessError> {
    let (f_min, f_max) = params.frequency_range;
    let (d_min, d_max) = params.distance_range;
    let score_h = score_func(frequency.max(params.frequency_floor), f_min, f_max, params.alpha)?;
    let score_d = 1.0 - score_func(distance.max(params.distance_floor), d_min, d_max, params.alpha)?;
    Ok(composite_score(score_h, score_d, params.score_max))
}

/// the candidate with the greatest score. candidates are expected in
/// nearest-first order; among equal scores the earliest one wins.
pub fn select_best(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.iter().fold(None, |best: Option<&Candidate>, c| match best {
        Some(b) if c.score > b.score => Some(c),
        Some(b) => Some(b),
        None => Some(c),
    })
}

/// assigns to every district the best scoring stop among its
/// `params.neighbors` geometrically nearest stops, measured from the district
/// centroid in the metric reference system. the output has one row per input
/// district, in input order.
///
/// # Errors
///
/// * [`AccessError::EmptyStopSet`] if there are no stops at all
/// * [`AccessError::MissingFrequency`] if a candidate stop has no frequency
/// * [`AccessError::GeometryError`] for districts without a centroid
pub fn score_districts(
    districts: &Layer<District>,
    stops: &Layer<Stop>,
    params: &ScoringParameters,
    parallelize: bool,
) -> Result<Layer<ScoredDistrict>, AccessError> {
    params.validate()?;
    let districts = geometry::to_projected(districts)?;
    let stops = geometry::to_projected(stops)?;
    if stops.is_empty() {
        return Err(AccessError::EmptyStopSet);
    }

    let locations = stops
        .iter()
        .enumerate()
        .map(|(idx, stop)| {
            let (x, y) = geometry::point_coords(&stop.point)?;
            Ok(GeomWithData::new([x, y], idx))
        })
        .collect::<Result<Vec<StopLocation>, AccessError>>()?;
    let rtree = RTree::bulk_load(locations);
    log::info!(
        "scoring {} districts against {} stops with k={}",
        districts.len(),
        stops.len(),
        params.neighbors
    );

    let score_one = |district: &District| score_district(district, &rtree, &stops, params);
    let rows = if parallelize {
        districts
            .rows
            .par_iter()
            .map(score_one)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        districts
            .rows
            .iter()
            .map(score_one)
            .collect::<Result<Vec<_>, _>>()?
    };
    Ok(Layer::new(districts.crs, rows))
}

/// scores the k nearest candidates of a single district. the centroid and
/// the stop layer must be in the metric reference system.
pub fn nearest_candidates(
    centroid: [f64; 2],
    rtree: &RTree<StopLocation>,
    stops: &Layer<Stop>,
    params: &ScoringParameters,
) -> Result<Vec<Candidate>, AccessError> {
    stops.require_crs(Crs::METRIC)?;
    rtree
        .nearest_neighbor_iter_with_distance_2(&centroid)
        .take(params.neighbors)
        .map(|(location, distance_2)| {
            let index = location.data;
            let stop = &stops.rows[index];
            let frequency = stop.frequency.ok_or_else(|| AccessError::MissingFrequency {
                stop: stop.name.clone(),
                mode: stop.mode,
            })?;
            let distance = distance_2.sqrt();
            let score = score_candidate(frequency, distance, params)?;
            Ok(Candidate {
                index,
                distance,
                frequency,
                score,
            })
        })
        .collect()
}

fn score_district(
    district: &District,
    rtree: &RTree<StopLocation>,
    stops: &Layer<Stop>,
    params: &ScoringParameters,
) -> Result<ScoredDistrict, AccessError> {
    let centroid = district.centroid().map_err(|e| {
        AccessError::GeometryError(format!("district '{}': {e}", district.name))
    })?;
    let (x, y) = geometry::point_coords(&centroid)?;
    let candidates = nearest_candidates([x, y], rtree, stops, params)?;
    let best = select_best(&candidates).ok_or(AccessError::EmptyStopSet)?;
    let stop = &stops.rows[best.index];
    log::debug!(
        "district '{}' assigned {} stop '{}' at {:.1}m with score {:.3}",
        district.name,
        stop.mode,
        stop.name,
        best.distance,
        best.score
    );
    Ok(ScoredDistrict {
        district: district.clone(),
        stop_name: stop.name.clone(),
        stop_mode: stop.mode,
        distance: best.distance,
        frequency: best.frequency,
        score: best.score,
    })
}
