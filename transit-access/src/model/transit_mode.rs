use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// the kind of service a stop or route belongs to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransitMode {
    Bus,
    Train,
}

impl Display for TransitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitMode::Bus => write!(f, "bus"),
            TransitMode::Train => write!(f, "train"),
        }
    }
}

impl FromStr for TransitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bus" => Ok(TransitMode::Bus),
            "train" | "rail" => Ok(TransitMode::Train),
            other => Err(format!("unknown transit mode '{other}', expected 'bus' or 'train'")),
        }
    }
}
