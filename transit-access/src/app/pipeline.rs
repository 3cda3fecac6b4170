use crate::{
    algorithm::{
        assemble,
        cluster::{self, filter_by_clusters},
        join_frequencies, score_districts, train_tables, ModeTables,
    },
    config::AccessConfiguration,
    model::{
        AccessCliError, AccessError, District, Layer, Route, RouteSegment, ScoredDistrict, Stop,
        TransitMode,
    },
};
use super::source::DatasetSources;
use std::collections::HashSet;

/// the source tables of a scoring run, each in its own reference system.
#[derive(Clone, Debug)]
pub struct PipelineInputs {
    pub bus_stops: Layer<Stop>,
    pub bus_routes: Layer<RouteSegment>,
    pub train_stations: Option<Layer<Stop>>,
    pub train_lines: Option<Layer<RouteSegment>>,
    pub districts: Layer<District>,
}

/// scored districts with the stops and routes they were scored against, in
/// the metric reference system.
#[derive(Clone, Debug)]
pub struct AccessResult {
    pub districts: Layer<ScoredDistrict>,
    pub stops: Layer<Stop>,
    pub routes: Layer<Route>,
    /// bus stops that no route passed near during the frequency join
    pub unmatched_stops: Vec<String>,
}

impl PipelineInputs {
    /// reads every configured source, tagging each table with `conf.source_crs`.
    pub fn load(
        sources: &DatasetSources,
        conf: &AccessConfiguration,
    ) -> Result<PipelineInputs, AccessCliError> {
        let crs = conf.source_crs;
        let train_stations = sources
            .train_stations
            .as_ref()
            .map(|s| s.read(TransitMode::Train, crs))
            .transpose()?;
        let train_lines = sources
            .train_lines
            .as_ref()
            .map(|s| s.read(TransitMode::Train, crs))
            .transpose()?;
        Ok(PipelineInputs {
            bus_stops: sources.bus_stops.read(TransitMode::Bus, crs)?,
            bus_routes: sources.bus_routes.read(TransitMode::Bus, crs)?,
            train_stations,
            train_lines,
            districts: sources.districts.read(crs, &conf.cluster.default_label)?,
        })
    }
}

/// runs the full scoring flow: bus frequency join, train tables, dataset
/// assembly, cluster classification, nearest-stop scoring and, when
/// `clusters` is given, narrowing the output to those cluster labels.
pub fn run_pipeline(
    inputs: &PipelineInputs,
    conf: &AccessConfiguration,
    clusters: Option<&HashSet<String>>,
) -> Result<AccessResult, AccessError> {
    conf.validate()?;

    log::info!("(((1))) joining bus route frequencies onto stops");
    let bus = join_frequencies(&inputs.bus_stops, &inputs.bus_routes, &conf.frequency_join)?;
    if !bus.unmatched.is_empty() {
        log::warn!(
            "{} of {} bus stops have no route within {}m",
            bus.unmatched.len(),
            bus.stops.len(),
            conf.frequency_join.buffer_m
        );
    }
    let unmatched_stops = bus.unmatched.clone();
    let mut tables: Vec<ModeTables> = vec![bus.into()];

    log::info!("(((2))) assembling transit dataset");
    match (&inputs.train_stations, &inputs.train_lines) {
        (Some(stations), Some(lines)) => tables.push(train_tables(stations, lines)?),
        (Some(stations), None) => {
            let lines = Layer::new(stations.crs, vec![]);
            tables.push(train_tables(stations, &lines)?)
        }
        (None, Some(_)) => {
            log::warn!("train lines given without train stations, ignoring train lines");
        }
        (None, None) => log::info!("no train tables configured"),
    }
    let dataset = assemble(tables, conf.missing_frequency)?;

    log::info!("(((3))) classifying districts into clusters");
    let districts = cluster::classify(&inputs.districts, &conf.cluster);

    log::info!("(((4))) scoring districts");
    let scored = score_districts(&districts, &dataset.stops, &conf.scoring, conf.parallelize)?;

    let (districts, stops, routes) = match clusters {
        Some(labels) => {
            log::info!("(((5))) filtering to clusters {labels:?}");
            let selection = filter_by_clusters(
                &scored,
                &dataset.stops,
                &dataset.routes,
                labels,
                conf.cluster.region_buffer_m,
            )?;
            (selection.districts, selection.stops, selection.routes)
        }
        None => (scored, dataset.stops, dataset.routes),
    };
    Ok(AccessResult {
        districts,
        stops,
        routes,
        unmatched_stops,
    })
}

#[cfg(test)]
mod test {
    use super::{run_pipeline, PipelineInputs};
    use crate::algorithm::cluster::ClusterRule;
    use crate::config::{AccessConfiguration, MissingFrequencyPolicy};
    use crate::model::{AccessError, Crs, District, Layer, RouteSegment, Stop, TransitMode};
    use geo::{line_string, point, polygon, MultiLineString, MultiPolygon};
    use std::collections::HashSet;

    /// two districts at x in [0, 1000] and [3000, 4000]. a bus line runs
    /// along y=500 through the west district, a train station sits in the
    /// east district.
    fn inputs() -> PipelineInputs {
        let square = |x0: f64| {
            MultiPolygon::new(vec![polygon![
                (x: x0, y: 0.0),
                (x: x0 + 1000.0, y: 0.0),
                (x: x0 + 1000.0, y: 1000.0),
                (x: x0, y: 1000.0),
            ]])
        };
        let bus_stop = |name: &str, x: f64, y: f64| {
            Stop::new(name, point! { x: x, y: y }, TransitMode::Bus, "", None)
        };
        PipelineInputs {
            bus_stops: Layer::new(
                Crs::METRIC,
                vec![bus_stop("西一丁目", 500.0, 505.0), bus_stop("orphan", 2000.0, 2000.0)],
            ),
            bus_routes: Layer::new(
                Crs::METRIC,
                vec![RouteSegment {
                    mode: TransitMode::Bus,
                    geometry: MultiLineString::new(vec![line_string![
                        (x: 0.0, y: 500.0),
                        (x: 1000.0, y: 500.0),
                    ]]),
                    frequency: Some(40.0),
                }],
            ),
            train_stations: Some(Layer::new(
                Crs::METRIC,
                vec![Stop::new(
                    "東駅",
                    point! { x: 3500.0, y: 500.0 },
                    TransitMode::Train,
                    "山口線",
                    Some(20.0),
                )],
            )),
            train_lines: None,
            districts: Layer::new(
                Crs::METRIC,
                vec![
                    District::new("西町1丁目", square(0.0), "other"),
                    District::new("東町1丁目", square(3000.0), "other"),
                ],
            ),
        }
    }

    fn conf() -> AccessConfiguration {
        let mut conf = AccessConfiguration {
            missing_frequency: MissingFrequencyPolicy::Exclude,
            parallelize: false,
            ..Default::default()
        };
        conf.scoring.neighbors = 2;
        conf.cluster.rules = vec![
            ClusterRule::new("西町", "west"),
            ClusterRule::new("東町", "east"),
        ];
        conf
    }

    #[test]
    fn test_pipeline_assigns_nearest_good_stop() {
        let result = run_pipeline(&inputs(), &conf(), None).expect("should run");
        assert_eq!(result.unmatched_stops, vec![String::from("orphan")]);
        assert_eq!(result.stops.len(), 2);
        let assigned = result
            .districts
            .iter()
            .map(|d| (d.district.cluster.as_str(), d.stop_name.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(assigned, vec![("west", "西一丁目"), ("east", "東駅")]);
        for d in result.districts.iter() {
            assert!(d.score >= 0.0 && d.score <= 10.0);
        }
    }

    #[test]
    fn test_pipeline_cluster_filter() {
        let labels = HashSet::from([String::from("east")]);
        let result = run_pipeline(&inputs(), &conf(), Some(&labels)).expect("should run");
        assert_eq!(result.districts.len(), 1);
        assert_eq!(result.districts.rows[0].stop_name, "東駅");
        let stops = result.stops.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
        assert_eq!(stops, vec!["東駅"]);
        assert!(result.routes.is_empty());
    }

    #[test]
    fn test_pipeline_fails_on_unmatched_stop_by_default() {
        let conf = AccessConfiguration {
            missing_frequency: MissingFrequencyPolicy::Fail,
            ..conf()
        };
        let result = run_pipeline(&inputs(), &conf, None);
        assert!(matches!(result, Err(AccessError::MissingFrequency { .. })));
    }
}
