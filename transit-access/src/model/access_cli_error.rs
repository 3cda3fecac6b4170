use super::AccessError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessCliError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("failure reading geodata source: {0}")]
    SourceError(String),
    #[error("failure computing accessibility: {source}")]
    AccessError {
        #[from]
        source: AccessError,
    },
    #[error("failure reading or writing file: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
    #[error("failure encoding JSON: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
}
