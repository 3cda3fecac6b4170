use super::{
    ClusterConfiguration, FrequencyJoinConfiguration, MissingFrequencyPolicy, ScoringParameters,
};
use crate::{
    app::source::DatasetSources,
    model::{AccessCliError, AccessError, Crs},
};
use serde::{Deserialize, Serialize};

/// defines behaviors for an accessibility scoring run
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct AccessConfiguration {
    pub scoring: ScoringParameters,
    pub frequency_join: FrequencyJoinConfiguration,
    pub cluster: ClusterConfiguration,
    /// reference system of the source geodata
    pub source_crs: Crs,
    /// geographic reference system of GeoJSON output and of lookup queries.
    /// see [`AccessConfiguration::output_crs`] for the default.
    pub output_crs: Option<Crs>,
    pub missing_frequency: MissingFrequencyPolicy,
    pub parallelize: bool,
    pub sources: Option<DatasetSources>,
}

impl Default for AccessConfiguration {
    fn default() -> Self {
        Self {
            scoring: Default::default(),
            frequency_join: Default::default(),
            cluster: Default::default(),
            source_crs: Crs::Wgs84,
            output_crs: None,
            missing_frequency: Default::default(),
            parallelize: true,
            sources: None,
        }
    }
}

impl AccessConfiguration {
    /// the configured output system, else the source system when it is
    /// geographic, else JGD2000 (the datum of the metric projection).
    pub fn output_crs(&self) -> Crs {
        match self.output_crs {
            Some(crs) => crs,
            None if self.source_crs.is_geographic() => self.source_crs,
            None => Crs::Jgd2000,
        }
    }

    pub fn validate(&self) -> Result<(), AccessError> {
        if let Some(crs) = self.output_crs {
            if !crs.is_geographic() {
                return Err(AccessError::InvalidParameter(format!(
                    "output_crs must be a geographic reference system, found {crs}"
                )));
            }
        }
        self.scoring.validate()?;
        self.frequency_join.validate()?;
        self.cluster.validate()?;
        Ok(())
    }
}

impl TryFrom<&String> for AccessConfiguration {
    type Error = AccessCliError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let conf: AccessConfiguration = if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                AccessCliError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                AccessCliError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                AccessCliError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                AccessCliError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else {
            return Err(AccessCliError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )));
        };
        conf.validate()
            .map_err(|e| AccessCliError::ConfigurationError(format!("{f}: {e}")))?;
        Ok(conf)
    }
}
