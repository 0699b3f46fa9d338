use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};

use mobisurv_core::poi::PoiNameTable;
use mobisurv_core::similarity::best_match;
use mobisurv_core::trip::TripRecord;
use mobisurv_core::zone::ZoneId;
use mobisurv_input::zones::ZoneTable;

pub const DEFAULT_CITY_CUTOFF: f64 = 80.0;
const UNKNOWN_PLACE: &str = "unknown";

/// How a place name was tied to a city zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CityMatch {
    Exact,
    Fuzzy(f64),
}

/// Place names from the survey mapped onto city zones.
#[derive(Debug, Clone, Default)]
pub struct CityMapping {
    pub resolved: IndexMap<String, (ZoneId, CityMatch)>,
    pub unmatched: Vec<String>,
}

impl CityMapping {
    pub fn get(&self, place_name: &str) -> Option<&ZoneId> {
        self.resolved.get(place_name.trim()).map(|(zone, _)| zone)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

/// Place names attached to endpoints whose tract could not be resolved, in first-seen order.
pub fn unresolved_names(trips: &[TripRecord]) -> IndexSet<String> {
    let mut names = IndexSet::new();
    for trip in trips {
        if trip.from_tract.is_unresolved() {
            names.insert(trip.from_name.trim().to_string());
        }
        if trip.to_tract.is_unresolved() {
            names.insert(trip.to_name.trim().to_string());
        }
    }
    names
}

/// Maps every usable place name onto a city, first by exact upper-case match and then by
/// fuzzy score against the city names of the zone table.
pub fn build_city_mapping<'a, I>(
    place_names: I,
    zones: &ZoneTable,
    poi_names: &PoiNameTable,
    cutoff: f64,
) -> CityMapping
where
    I: IntoIterator<Item = &'a str>,
{
    let cities = zones.city_names();
    let mut mapping = CityMapping::default();
    for place_name in place_names {
        let place_name = place_name.trim();
        if place_name.is_empty()
            || place_name.eq_ignore_ascii_case(UNKNOWN_PLACE)
            || poi_names.is_known(place_name)
            || mapping.resolved.contains_key(place_name)
        {
            continue;
        }

        let upper = place_name.to_uppercase();
        if let Some((_, zone)) = cities.iter().find(|(city, _)| *city == upper) {
            mapping
                .resolved
                .insert(place_name.to_string(), (zone.clone(), CityMatch::Exact));
            continue;
        }

        let candidates = cities.iter().map(|(city, _)| city.as_str());
        match best_match(&upper, candidates, cutoff) {
            Some((city, score)) => {
                let zone = cities
                    .iter()
                    .find(|(name, _)| name == city)
                    .map(|(_, zone)| zone.clone())
                    .unwrap_or_default();
                debug!("Matched {} to {} with score {:.1}", place_name, city, score);
                mapping
                    .resolved
                    .insert(place_name.to_string(), (zone, CityMatch::Fuzzy(score)));
            }
            None => {
                warn!("No city found for place name {}", place_name);
                mapping.unmatched.push(place_name.to_string());
            }
        }
    }
    info!(
        "Mapped {} place names to cities, {} left unmatched",
        mapping.len(),
        mapping.unmatched.len()
    );
    mapping
}

/// Fills unresolved tracts from the place names. Returns how many endpoints changed.
pub fn resolve_trips(trips: &mut [TripRecord], mapping: &CityMapping) -> usize {
    let mut resolved = 0;
    for trip in trips.iter_mut() {
        if trip.from_tract.is_unresolved() {
            if let Some(zone) = mapping.get(&trip.from_name) {
                trip.from_tract = zone.clone();
                resolved += 1;
            }
        }
        if trip.to_tract.is_unresolved() {
            if let Some(zone) = mapping.get(&trip.to_name) {
                trip.to_tract = zone.clone();
                resolved += 1;
            }
        }
    }
    info!("Resolved {} trip endpoints from place names", resolved);
    resolved
}
