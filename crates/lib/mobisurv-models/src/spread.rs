use hashbrown::HashMap;
use itertools::Itertools;

use mobisurv_core::hour::HourBin;
use mobisurv_core::modes::ModeGroups;
use mobisurv_core::trip::TripRecord;

use crate::select::percentage;

#[derive(Debug, Clone, PartialEq)]
pub struct ModeSpreadRow {
    pub hour: HourBin,
    pub mode: String,
    pub count: f64,
    /// All trips in the same hour.
    pub total_trips: f64,
    pub percentage: f64,
}

/// Share of each mode group within every hour, ordered by hour and then mode. Labels
/// outside the configured groups are kept as they are.
pub fn mode_spread(trips: &[&TripRecord], mode_groups: &ModeGroups) -> Vec<ModeSpreadRow> {
    let mut counts: HashMap<(HourBin, String), f64> = HashMap::new();
    let mut hour_totals: HashMap<HourBin, f64> = HashMap::new();
    for trip in trips {
        let mode = mode_groups.merge_label(&trip.mode);
        *counts.entry((trip.hour, mode)).or_insert(0.0) += trip.count;
        *hour_totals.entry(trip.hour).or_insert(0.0) += trip.count;
    }

    counts
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .map(|((hour, mode), count)| {
            let total_trips = hour_totals.get(&hour).copied().unwrap_or_default();
            ModeSpreadRow {
                hour,
                mode,
                count,
                total_trips,
                percentage: percentage(count, total_trips),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(mode: &str, hour: u32, count: f64) -> TripRecord {
        TripRecord::builder()
            .from_tract("90000011".parse().unwrap())
            .to_tract("1".parse().unwrap())
            .mode(mode)
            .hour(HourBin::try_from(hour).unwrap())
            .count(count)
            .build()
    }

    #[test]
    fn test_spread_merges_mode_groups() {
        let trips = vec![
            trip("walk", 8, 1.0),
            trip("ped", 8, 1.0),
            trip("car", 8, 2.0),
            trip("scooter", 7, 5.0),
        ];
        let refs: Vec<&TripRecord> = trips.iter().collect();
        let rows = mode_spread(&refs, &ModeGroups::default());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].hour.as_usize(), 7);
        assert_eq!(rows[0].mode, "scooter");
        assert_eq!(rows[0].percentage, 100.0);
        assert_eq!(rows[1].mode, "car");
        assert_eq!(rows[1].total_trips, 4.0);
        assert_eq!(rows[1].percentage, 50.0);
        assert_eq!(rows[2].mode, "pedestrian");
        assert_eq!(rows[2].count, 2.0);
    }
}
