use super::frequency_join::FrequencyJoinResult;
use crate::{
    algorithm::geometry,
    config::MissingFrequencyPolicy,
    model::{AccessError, Crs, Layer, Route, RouteSegment, Stop, TransitMode},
};

/// the stops and routes of one transit mode, ready to be merged.
#[derive(Clone, Debug)]
pub struct ModeTables {
    pub stops: Layer<Stop>,
    pub routes: Layer<Route>,
}

/// all stops and routes across modes in the metric reference system.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitDataset {
    pub stops: Layer<Stop>,
    pub routes: Layer<Route>,
}

impl From<FrequencyJoinResult> for ModeTables {
    fn from(value: FrequencyJoinResult) -> Self {
        ModeTables {
            stops: value.stops,
            routes: value.routes,
        }
    }
}

/// builds train tables by copying the per-station frequency attribute
/// directly; no spatial join is performed.
pub fn train_tables(
    stations: &Layer<Stop>,
    lines: &Layer<RouteSegment>,
) -> Result<ModeTables, AccessError> {
    let stops = geometry::to_projected(stations)?;
    let routes = geometry::to_projected(lines)?;
    if let Some(stop) = stops.iter().find(|s| s.mode != TransitMode::Train) {
        return Err(AccessError::InvalidParameter(format!(
            "station '{}' has mode {}, expected train",
            stop.name, stop.mode
        )));
    }
    Ok(ModeTables {
        stops,
        routes: Layer::new(routes.crs, routes.rows.into_iter().map(Route::from).collect()),
    })
}

/// merges per-mode tables into one dataset, in the order given. stops
/// without a frequency are handled according to `policy`.
pub fn assemble(
    tables: Vec<ModeTables>,
    policy: MissingFrequencyPolicy,
) -> Result<TransitDataset, AccessError> {
    let mut stops = vec![];
    let mut routes = vec![];
    for table in tables.into_iter() {
        let table_stops = geometry::to_projected(&table.stops)?;
        let table_routes = geometry::to_projected(&table.routes)?;
        for stop in table_stops.rows.into_iter() {
            match (stop.frequency, policy) {
                (Some(f), _) if !(f >= 0.0 && f.is_finite()) => {
                    return Err(AccessError::InvalidParameter(format!(
                        "{} stop '{}' has invalid frequency {f}",
                        stop.mode, stop.name
                    )));
                }
                (Some(_), _) => stops.push(stop),
                (None, MissingFrequencyPolicy::Fail) => {
                    return Err(AccessError::MissingFrequency {
                        stop: stop.name,
                        mode: stop.mode,
                    });
                }
                (None, MissingFrequencyPolicy::Exclude) => {
                    log::warn!(
                        "excluding {} stop '{}' which has no frequency",
                        stop.mode,
                        stop.name
                    );
                }
            }
        }
        routes.extend(table_routes.rows);
    }
    log::info!(
        "assembled dataset with {} stops and {} routes",
        stops.len(),
        routes.len()
    );
    Ok(TransitDataset {
        stops: Layer::new(Crs::METRIC, stops),
        routes: Layer::new(Crs::METRIC, routes),
    })
}
