use clap::{Parser, Subcommand};
use itertools::Itertools;
use std::{collections::HashSet, path::Path};
use transit_access::{
    algorithm::{cluster, DistrictLookup},
    app::{run_pipeline, write_geojson, AccessResult, PipelineInputs},
    config::AccessConfiguration,
    model::AccessCliError,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct AccessAppArguments {
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    /// score every district and write districts, stops and routes as GeoJSON
    Score {
        #[arg(long, help = "path to file with transit-access run parameters and sources")]
        configuration_file: String,
        #[arg(long, help = "output path for GeoJSON files")]
        output_directory: String,
        #[arg(long, help = "comma-separated cluster labels to keep in the output")]
        clusters: Option<String>,
    },
    /// report the stop assigned to the district containing a coordinate
    Lookup {
        #[arg(long, help = "path to file with transit-access run parameters and sources")]
        configuration_file: String,
        #[arg(long, help = "latitude in the configured output reference system")]
        lat: f64,
        #[arg(long, help = "longitude in the configured output reference system")]
        lon: f64,
    },
    /// list the cluster labels assigned to the configured districts
    Clusters {
        #[arg(long, help = "path to file with transit-access run parameters and sources")]
        configuration_file: String,
    },
}

pub fn run(app: &App) -> Result<(), AccessCliError> {
    env_logger::init();
    let start_time = chrono::Local::now();
    log::info!("transit-access started at {}", start_time.to_rfc3339());
    match app {
        App::Score {
            configuration_file,
            output_directory,
            clusters,
        } => {
            let (conf, inputs) = read_inputs(configuration_file)?;
            let labels = clusters.as_ref().map(|s| parse_labels(s));
            let result = run_pipeline(&inputs, &conf, labels.as_ref())?;
            let written = write_geojson(
                Path::new(output_directory),
                &result.districts,
                &result.stops,
                &result.routes,
                conf.output_crs(),
            )?;
            log::info!(
                "wrote {}",
                written.iter().map(|p| p.to_string_lossy()).join(", ")
            );
        }
        App::Lookup {
            configuration_file,
            lat,
            lon,
        } => {
            let (conf, inputs) = read_inputs(configuration_file)?;
            let AccessResult { districts, .. } = run_pipeline(&inputs, &conf, None)?;
            let lookup = DistrictLookup::new(&districts, conf.output_crs())?;
            match lookup.stop_name_at(*lat, *lon)? {
                Some(stop_name) => println!("{stop_name}"),
                None => eprintln!("no district contains ({lat}, {lon})"),
            }
        }
        App::Clusters { configuration_file } => {
            let (conf, inputs) = read_inputs(configuration_file)?;
            let districts = cluster::classify(&inputs.districts, &conf.cluster);
            for label in cluster::cluster_labels(&districts) {
                println!("{label}");
            }
        }
    }
    let duration = chrono::Local::now() - start_time;
    log::info!("finished in {} seconds", duration.num_milliseconds() as f64 / 1000.0);
    eprintln!("finished.");
    Ok(())
}

fn read_inputs(
    configuration_file: &String,
) -> Result<(AccessConfiguration, PipelineInputs), AccessCliError> {
    log::info!("reading transit-access configuration from {configuration_file}");
    let conf = AccessConfiguration::try_from(configuration_file)?;
    let sources = conf.sources.as_ref().ok_or_else(|| {
        AccessCliError::ConfigurationError(format!(
            "{configuration_file} has no [sources] section"
        ))
    })?;
    let inputs = PipelineInputs::load(sources, &conf)?;
    Ok((conf, inputs))
}

fn parse_labels(clusters: &str) -> HashSet<String> {
    clusters
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn main() {
    let args = AccessAppArguments::parse();
    if let Err(e) = run(&args.app) {
        log::error!("transit-access failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
