use std::fmt::{Display, Formatter};

use typed_builder::TypedBuilder;

use crate::direction::Direction;
use crate::hour::HourBin;
use crate::zone::ZoneId;

/// A validated survey row: an expanded count of trips between two zones in one hour bucket.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct TripRecord {
    #[builder(default, setter(into))]
    pub from_name: String,
    pub from_tract: ZoneId,
    #[builder(default, setter(into))]
    pub to_name: String,
    pub to_tract: ZoneId,
    #[builder(setter(into))]
    pub mode: String,
    #[builder(default, setter(into))]
    pub frequency: String,
    #[builder(default, setter(into))]
    pub purpose: String,
    pub hour: HourBin,
    pub count: f64,
    /// Inter-city trip: the counterpart lies outside the metropolitan area.
    #[builder(default)]
    pub inter_city: bool,
}

impl Display for TripRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}, mode: {}, hour: {}, count: {}",
            self.from_tract, self.to_tract, self.mode, self.hour, self.count
        )
    }
}

impl TripRecord {
    /// The zone on the POI end of the trip.
    pub fn poi_tract(&self, direction: Direction) -> &ZoneId {
        match direction {
            Direction::Inbound => &self.to_tract,
            Direction::Outbound => &self.from_tract,
        }
    }

    /// The zone on the other end of the trip.
    pub fn counterpart_tract(&self, direction: Direction) -> &ZoneId {
        match direction {
            Direction::Inbound => &self.from_tract,
            Direction::Outbound => &self.to_tract,
        }
    }

    pub fn poi_name(&self, direction: Direction) -> &str {
        match direction {
            Direction::Inbound => &self.to_name,
            Direction::Outbound => &self.from_name,
        }
    }
}
