use indexmap::IndexMap;
use log::{error, info, warn};
use serde::Deserialize;
use typed_builder::TypedBuilder;

use mobisurv_core::direction::Direction;
use mobisurv_core::hour::HOURS_PER_DAY;
use mobisurv_core::modes::ModeGroups;
use mobisurv_core::trip::TripRecord;

use crate::select::total_count;

pub const ALL_MODES: &str = "all";

pub type HourlyShares = [f64; HOURS_PER_DAY];

fn default_midnight_warn() -> f64 {
    0.05
}

fn default_midnight_reject() -> f64 {
    0.20
}

#[derive(Deserialize, Debug, Clone, PartialEq, TypedBuilder)]
pub struct TemporalSettings {
    /// Share of trips at hour 0 above which a distribution is suspicious.
    #[serde(default = "default_midnight_warn")]
    #[builder(default = default_midnight_warn())]
    pub midnight_warn: f64,
    /// Share of trips at hour 0 above which a distribution is discarded.
    #[serde(default = "default_midnight_reject")]
    #[builder(default = default_midnight_reject())]
    pub midnight_reject: f64,
    #[serde(default)]
    #[builder(default)]
    pub skip_pois: Vec<String>,
}

impl Default for TemporalSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TemporalSettings {
    pub fn skips(&self, poi_name: &str) -> bool {
        self.skip_pois.iter().any(|skip| skip == poi_name)
    }
}

/// Hourly distribution of the trips of one POI in one direction, overall and per mode group.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalDistribution {
    pub poi_name: String,
    pub direction: Direction,
    pub midnight_share: f64,
    /// `all` first, then one entry per mode group in configuration order.
    pub distributions: IndexMap<String, HourlyShares>,
}

impl TemporalDistribution {
    pub fn all(&self) -> HourlyShares {
        self.distributions
            .get(ALL_MODES)
            .copied()
            .unwrap_or([0.0; HOURS_PER_DAY])
    }
}

pub fn hourly_counts<'a, I>(trips: I) -> HourlyShares
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    let mut counts = [0.0; HOURS_PER_DAY];
    for trip in trips {
        counts[trip.hour.as_usize()] += trip.count;
    }
    counts
}

/// Scales the counts to sum to one. An empty profile stays all zeros.
pub fn normalize(counts: HourlyShares) -> HourlyShares {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return [0.0; HOURS_PER_DAY];
    }
    counts.map(|count| count / total)
}

/// Builds the distributions of the selected rows, or `None` when there are no trips or too
/// many of them fall in the midnight bucket.
pub fn temporal_distribution(
    poi_name: &str,
    direction: Direction,
    trips: &[&TripRecord],
    mode_groups: &ModeGroups,
    settings: &TemporalSettings,
) -> Option<TemporalDistribution> {
    let total = total_count(trips);
    if trips.is_empty() || total <= 0.0 {
        info!("No {} trips to distribute for {}", direction, poi_name);
        return None;
    }

    let counts = hourly_counts(trips.iter().copied());
    let midnight_share = counts[0] / total;
    if midnight_share > settings.midnight_reject {
        error!(
            "{} {}: {:.1}% of trips at midnight, discarding its distribution",
            poi_name,
            direction,
            midnight_share * 100.0
        );
        return None;
    }
    if midnight_share > settings.midnight_warn {
        warn!(
            "{} {}: {:.1}% of trips at midnight",
            poi_name,
            direction,
            midnight_share * 100.0
        );
    }

    let mut distributions = IndexMap::new();
    distributions.insert(ALL_MODES.to_string(), normalize(counts));
    for group in mode_groups.names() {
        let group_counts = hourly_counts(
            trips
                .iter()
                .copied()
                .filter(|trip| mode_groups.contains(group, &trip.mode)),
        );
        distributions.insert(group.to_string(), normalize(group_counts));
    }

    Some(TemporalDistribution {
        poi_name: poi_name.to_string(),
        direction,
        midnight_share,
        distributions,
    })
}

/// Mean overall distribution of the inbound results that pass the midnight check.
pub fn city_average(
    results: &[TemporalDistribution],
    settings: &TemporalSettings,
) -> Option<HourlyShares> {
    let valid: Vec<HourlyShares> = results
        .iter()
        .filter(|result| result.direction == Direction::Inbound)
        .filter(|result| result.midnight_share <= settings.midnight_warn)
        .map(TemporalDistribution::all)
        .collect();
    if valid.is_empty() {
        warn!("No inbound distributions left for the city average");
        return None;
    }

    let mut average = [0.0; HOURS_PER_DAY];
    for shares in valid.iter() {
        for (hour, share) in shares.iter().enumerate() {
            average[hour] += share / valid.len() as f64;
        }
    }

    let total: f64 = average.iter().sum();
    if !(0.99..=1.01).contains(&total) {
        error!("City average distribution sums to {:.4}", total);
    }
    if average[0] > settings.midnight_warn {
        warn!("City average has {:.1}% of trips at midnight", average[0] * 100.0);
    }
    info!("City average built from {} POIs", valid.len());
    Some(average)
}

#[cfg(test)]
mod tests {
    use mobisurv_core::hour::HourBin;

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
    fn test_distribution_per_mode_group() {
        let trips = vec![trip("car", 8, 1.0), trip("bus", 8, 1.0), trip("train", 9, 2.0)];
        let refs: Vec<&TripRecord> = trips.iter().collect();
        let result = temporal_distribution(
            "Ben-Gurion-University",
            Direction::Inbound,
            &refs,
            &ModeGroups::default(),
            &TemporalSettings::default(),
        )
        .unwrap();
        let keys: Vec<&str> = result.distributions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["all", "car", "pedestrian", "public_transit", "bike"]);
        assert_eq!(result.all()[8], 0.5);
        assert_eq!(result.all()[9], 0.5);
        assert_eq!(result.distributions["car"][8], 1.0);
        assert_eq!(result.distributions["public_transit"][9], 2.0 / 3.0);
        assert!(result.distributions["bike"].iter().all(|share| *share == 0.0));
    }

    #[test]
    fn test_midnight_heavy_distribution_is_rejected() {
        let trips = vec![trip("car", 0, 3.0), trip("car", 8, 7.0)];
        let refs: Vec<&TripRecord> = trips.iter().collect();
        let settings = TemporalSettings::default();
        let groups = ModeGroups::default();
        let result = temporal_distribution("X", Direction::Inbound, &refs, &groups, &settings);
        assert!(result.is_none());

        let trips = vec![trip("car", 0, 1.0), trip("car", 8, 9.0)];
        let refs: Vec<&TripRecord> = trips.iter().collect();
        let result = temporal_distribution("X", Direction::Inbound, &refs, &groups, &settings);
        assert_eq!(result.unwrap().midnight_share, 0.1);
    }

    #[test]
    fn test_city_average_uses_clean_inbound_results() {
        let make = |direction, midnight_share, hour: usize| {
            let mut all = [0.0; HOURS_PER_DAY];
            all[hour] = 1.0;
            let mut distributions = IndexMap::new();
            distributions.insert(ALL_MODES.to_string(), all);
            TemporalDistribution {
                poi_name: "X".to_string(),
                direction,
                midnight_share,
                distributions,
            }
        };
        let results = vec![
            make(Direction::Inbound, 0.0, 8),
            make(Direction::Inbound, 0.0, 10),
            make(Direction::Inbound, 0.1, 12),
            make(Direction::Outbound, 0.0, 17),
        ];
        let average = city_average(&results, &TemporalSettings::default()).unwrap();
        assert_eq!(average[8], 0.5);
        assert_eq!(average[10], 0.5);
        assert_eq!(average[12], 0.0);
        assert_eq!(average[17], 0.0);
        assert!(city_average(&results[3..], &TemporalSettings::default()).is_none());
    }
}
