use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which end of a trip the point of interest sits on.
#[derive(Deserialize, Debug, Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Trips whose destination is the POI, grouped by origin.
    Inbound,
    /// Trips whose origin is the POI, grouped by destination.
    Outbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => write!(f, "inbound"),
            Direction::Outbound => write!(f, "outbound"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbound" => Ok(Direction::Inbound),
            "outbound" => Ok(Direction::Outbound),
            _ => Err(format!("unknown trip direction {}", s)),
        }
    }
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Inbound, Direction::Outbound];

    /// Label of the counterpart zone in reports.
    pub fn counterpart(&self) -> &'static str {
        match self {
            Direction::Inbound => "origin",
            Direction::Outbound => "destination",
        }
    }
}
