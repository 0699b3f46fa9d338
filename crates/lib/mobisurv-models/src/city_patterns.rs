use hashbrown::HashMap;
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, info, warn};
use serde::Deserialize;
use typed_builder::TypedBuilder;

use mobisurv_core::poi::file_stem;
use mobisurv_input::zones::ZoneTable;

use crate::select::percentage;
use crate::summary::{Category, PoiSummary, ShareColumn};

/// POIs of the Beer Sheva innovation district.
pub const DEFAULT_FOCUS_POIS: [&str; 3] = [
    "Ben-Gurion-University",
    "Soroka-Medical-Center",
    "Gav-Yam-High-Tech-Park",
];

fn default_focus_pois() -> Vec<String> {
    DEFAULT_FOCUS_POIS.iter().map(|poi| poi.to_string()).collect()
}

fn default_top_cities() -> usize {
    15
}

#[derive(Deserialize, Debug, Clone, PartialEq, TypedBuilder)]
pub struct CityPatternSettings {
    /// POIs whose combined trips are reported for every city.
    #[serde(default = "default_focus_pois")]
    #[builder(default = default_focus_pois())]
    pub focus_pois: Vec<String>,
    /// Cities kept after sorting by trips, zero keeps all.
    #[serde(default = "default_top_cities")]
    #[builder(default = default_top_cities())]
    pub top_cities: usize,
}

impl Default for CityPatternSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Trips of one city to and from every POI.
#[derive(Debug, Clone, PartialEq)]
pub struct CityPattern {
    pub city: String,
    pub total_trips: f64,
    /// Aligned with `CityPatterns::pois`.
    pub poi_trips: Vec<f64>,
    /// Trip-weighted mode percentages, aligned with `CityPatterns::modes`.
    pub mode_shares: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityPatterns {
    pub pois: Vec<String>,
    pub focus_pois: Vec<String>,
    pub modes: Vec<String>,
    /// Sorted by total trips, busiest city first.
    pub cities: Vec<CityPattern>,
}

impl CityPatterns {
    pub fn city(&self, name: &str) -> Option<&CityPattern> {
        self.cities
            .iter()
            .find(|pattern| pattern.city.eq_ignore_ascii_case(name.trim()))
    }

    pub fn trips_of(&self, pattern: &CityPattern, poi_name: &str) -> f64 {
        self.pois
            .iter()
            .position(|poi| poi == poi_name)
            .and_then(|idx| pattern.poi_trips.get(idx).copied())
            .unwrap_or(0.0)
    }

    pub fn focus_trips(&self, pattern: &CityPattern) -> f64 {
        self.focus_pois
            .iter()
            .map(|poi| self.trips_of(pattern, poi))
            .sum()
    }

    /// Fraction of the city's trips that involve a focus POI.
    pub fn focus_share(&self, pattern: &CityPattern) -> f64 {
        fraction(self.focus_trips(pattern), pattern.total_trips)
    }

    /// Numeric columns written after `city`.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec![
            "total_trips".to_string(),
            "focus_trips".to_string(),
            "focus_share".to_string(),
        ];
        names.extend(
            self.focus_pois
                .iter()
                .map(|poi| format!("{}_trips", file_stem(poi))),
        );
        names.extend(
            self.pois
                .iter()
                .map(|poi| format!("share_{}", file_stem(poi))),
        );
        names.extend(self.modes.iter().map(|mode| format!("mode_{}", mode)));
        names
    }

    /// Values of one city aligned with `column_names`.
    pub fn values(&self, pattern: &CityPattern) -> Vec<f64> {
        let mut values = vec![
            pattern.total_trips,
            self.focus_trips(pattern),
            self.focus_share(pattern),
        ];
        values.extend(
            self.focus_pois
                .iter()
                .map(|poi| self.trips_of(pattern, poi)),
        );
        values.extend(
            pattern
                .poi_trips
                .iter()
                .map(|trips| fraction(*trips, pattern.total_trips)),
        );
        values.extend(pattern.mode_shares.iter().copied());
        values
    }
}

fn fraction(part: f64, whole: f64) -> f64 {
    percentage(part, whole) / 100.0
}

fn mode_of(column: &ShareColumn) -> Option<&str> {
    match column {
        ShareColumn::Category(Category::Mode, value) => Some(value.as_str()),
        _ => None,
    }
}

/// Joins the tract rows of every POI summary to the city names of the zone table and sums
/// them per city. Rows whose tract has no named zone, such as the pooled outside row, are
/// left out.
pub fn city_patterns(
    summaries: &[PoiSummary],
    zones: &ZoneTable,
    settings: &CityPatternSettings,
) -> CityPatterns {
    let city_of: HashMap<&str, &str> = zones
        .zones
        .iter()
        .filter(|zone| !zone.name.trim().is_empty())
        .map(|zone| (zone.id.as_str(), zone.name.trim()))
        .collect();
    let pois: Vec<String> = summaries
        .iter()
        .map(|summary| summary.poi_name.clone())
        .unique()
        .collect();
    let modes: Vec<String> = summaries
        .iter()
        .flat_map(|summary| summary.columns.iter().filter_map(mode_of))
        .unique()
        .sorted()
        .map(str::to_string)
        .collect();
    for poi in settings.focus_pois.iter() {
        if !pois.contains(poi) {
            warn!("No summaries for focus POI {}", poi);
        }
    }

    let mut by_city: IndexMap<&str, CityPattern> = IndexMap::new();
    let mut unnamed_rows = 0;
    for summary in summaries {
        let Some(poi_idx) = pois.iter().position(|poi| *poi == summary.poi_name) else {
            continue;
        };
        let mode_columns: Vec<(usize, usize)> = summary
            .columns
            .iter()
            .enumerate()
            .filter_map(|(column_idx, column)| {
                let mode = mode_of(column)?;
                let mode_idx = modes.iter().position(|m| m == mode)?;
                Some((column_idx, mode_idx))
            })
            .collect();

        for row in summary.rows.iter() {
            let Some(city) = city_of.get(row.tract.as_str()).copied() else {
                unnamed_rows += 1;
                continue;
            };
            let pattern = by_city.entry(city).or_insert_with(|| CityPattern {
                city: city.to_string(),
                total_trips: 0.0,
                poi_trips: vec![0.0; pois.len()],
                mode_shares: vec![0.0; modes.len()],
            });
            pattern.total_trips += row.total_trips;
            pattern.poi_trips[poi_idx] += row.total_trips;
            for (column_idx, mode_idx) in mode_columns.iter() {
                if let Some(share) = row.shares.get(*column_idx) {
                    pattern.mode_shares[*mode_idx] += share * row.total_trips;
                }
            }
        }
    }
    debug!("{} summary rows have no city name", unnamed_rows);

    let mut cities: Vec<CityPattern> = by_city
        .into_values()
        .map(|mut pattern| {
            let total_trips = pattern.total_trips;
            for share in pattern.mode_shares.iter_mut() {
                *share = fraction(*share, total_trips);
            }
            pattern
        })
        .collect();
    cities.sort_by(|a, b| {
        b.total_trips
            .total_cmp(&a.total_trips)
            .then_with(|| a.city.cmp(&b.city))
    });
    info!(
        "Aggregated {} POI summaries over {} cities",
        summaries.len(),
        cities.len()
    );
    if settings.top_cities > 0 {
        cities.truncate(settings.top_cities);
    }

    CityPatterns {
        pois,
        focus_pois: settings.focus_pois.clone(),
        modes,
        cities,
    }
}

#[cfg(test)]
mod tests {
    use mobisurv_core::direction::Direction;
    use mobisurv_core::zone::ZoneId;
    use mobisurv_input::zones::ZoneRecord;

    use crate::summary::SummaryRow;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn zones() -> ZoneTable {
        let zone = |id: &str, name: &str| {
            ZoneRecord::builder()
                .id(id.parse::<ZoneId>().unwrap())
                .name(name)
                .build()
        };
        ZoneTable {
            zones: vec![
                zone("90000011", "Beer Sheva"),
                zone("90000012", "Beer Sheva"),
                zone("31000001", "Ofakim"),
                zone("62000015", ""),
            ],
        }
    }

    fn mode(value: &str) -> ShareColumn {
        ShareColumn::Category(Category::Mode, value.to_string())
    }

    fn row(tract: &str, total_trips: f64, shares: Vec<f64>) -> SummaryRow {
        SummaryRow {
            tract: tract.to_string(),
            total_trips,
            shares,
        }
    }

    fn summaries() -> Vec<PoiSummary> {
        vec![
            PoiSummary {
                poi_name: "Ben-Gurion-University".to_string(),
                direction: Direction::Inbound,
                columns: vec![mode("bus"), mode("car")],
                rows: vec![
                    row("90000011", 40.0, vec![75.0, 25.0]),
                    row("90000012", 20.0, vec![0.0, 100.0]),
                    row("31000001", 10.0, vec![100.0, 0.0]),
                    row("62000015", 7.0, vec![100.0, 0.0]),
                    row("0", 40.0, vec![100.0, 0.0]),
                ],
            },
            PoiSummary {
                poi_name: "HaNegev-Mall".to_string(),
                direction: Direction::Outbound,
                columns: vec![mode("walk")],
                rows: vec![row("90000011", 40.0, vec![100.0])],
            },
        ]
    }

    #[test]
    fn test_trips_are_summed_per_city() {
        let patterns = city_patterns(&summaries(), &zones(), &CityPatternSettings::default());
        assert_eq!(patterns.pois, vec!["Ben-Gurion-University", "HaNegev-Mall"]);
        assert_eq!(patterns.modes, vec!["bus", "car", "walk"]);
        let cities: Vec<&str> = patterns.cities.iter().map(|c| c.city.as_str()).collect();
        assert_eq!(cities, vec!["Beer Sheva", "Ofakim"]);

        let beer_sheva = patterns.city("beer sheva").unwrap();
        assert!(close(beer_sheva.total_trips, 100.0));
        assert!(close(patterns.trips_of(beer_sheva, "Ben-Gurion-University"), 60.0));
        assert!(close(patterns.focus_trips(beer_sheva), 60.0));
        assert!(close(patterns.focus_share(beer_sheva), 0.6));
        assert!(close(beer_sheva.mode_shares[0], 30.0));
        assert!(close(beer_sheva.mode_shares[1], 30.0));
        assert!(close(beer_sheva.mode_shares[2], 40.0));

        let ofakim = patterns.city("Ofakim").unwrap();
        assert!(close(patterns.focus_share(ofakim), 1.0));
        assert!(close(ofakim.mode_shares[0], 100.0));
    }

    #[test]
    fn test_values_follow_column_names() {
        let patterns = city_patterns(&summaries(), &zones(), &CityPatternSettings::default());
        let names = patterns.column_names();
        assert_eq!(
            names,
            vec![
                "total_trips",
                "focus_trips",
                "focus_share",
                "Ben_Gurion_University_trips",
                "Soroka_Medical_Center_trips",
                "Gav_Yam_High_Tech_Park_trips",
                "share_Ben_Gurion_University",
                "share_HaNegev_Mall",
                "mode_bus",
                "mode_car",
                "mode_walk",
            ]
        );
        let values = patterns.values(&patterns.cities[0]);
        assert_eq!(values.len(), names.len());
        assert!(close(values[4], 0.0));
        assert!(close(values[6], 0.6));
        assert!(close(values[7], 0.4));
    }

    #[test]
    fn test_top_cities_and_custom_focus() {
        let settings = CityPatternSettings::builder()
            .focus_pois(vec!["HaNegev-Mall".to_string()])
            .top_cities(1)
            .build();
        let patterns = city_patterns(&summaries(), &zones(), &settings);
        assert_eq!(patterns.cities.len(), 1);
        let beer_sheva = &patterns.cities[0];
        assert!(close(patterns.focus_share(beer_sheva), 0.4));
    }

    #[test]
    fn test_no_summaries() {
        let patterns = city_patterns(&[], &zones(), &CityPatternSettings::default());
        assert!(patterns.cities.is_empty());
        assert!(patterns.modes.is_empty());
    }
}
