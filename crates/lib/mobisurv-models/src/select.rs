use hashbrown::HashMap;

use mobisurv_core::direction::Direction;
use mobisurv_core::poi::PoiNameTable;
use mobisurv_core::trip::TripRecord;
use mobisurv_core::zone::ZoneId;

/// Rows whose POI end lies in the given tract.
pub fn trips_at_tract<'a>(
    trips: &'a [TripRecord],
    tract: &ZoneId,
    direction: Direction,
) -> Vec<&'a TripRecord> {
    trips
        .iter()
        .filter(|trip| trip.poi_tract(direction) == tract)
        .collect()
}

/// Canonical POI names of every distinct place label in the survey. Most labels are cities,
/// so labels without an alias map to `None` without a warning.
#[derive(Debug, Clone, Default)]
pub struct PoiNameIndex {
    canonical: HashMap<String, Option<String>>,
}

impl PoiNameIndex {
    pub fn build(trips: &[TripRecord], names: &PoiNameTable) -> Self {
        let mut canonical: HashMap<String, Option<String>> = HashMap::new();
        for trip in trips {
            for label in [trip.from_name.as_str(), trip.to_name.as_str()] {
                if !canonical.contains_key(label) {
                    canonical.insert(
                        label.to_string(),
                        names.canonical_of(label).map(str::to_string),
                    );
                }
            }
        }
        Self { canonical }
    }

    pub fn canonical_of(&self, label: &str) -> Option<&str> {
        self.canonical.get(label).and_then(|name| name.as_deref())
    }

    /// Rows whose POI end is labelled with any name standardizing to `poi_name`.
    pub fn trips_named<'a>(
        &self,
        trips: &'a [TripRecord],
        poi_name: &str,
        direction: Direction,
    ) -> Vec<&'a TripRecord> {
        trips
            .iter()
            .filter(|trip| self.canonical_of(trip.poi_name(direction)) == Some(poi_name))
            .collect()
    }
}

pub fn total_count(trips: &[&TripRecord]) -> f64 {
    trips.iter().map(|trip| trip.count).sum()
}

/// `part / whole * 100`, zero for an empty whole.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
