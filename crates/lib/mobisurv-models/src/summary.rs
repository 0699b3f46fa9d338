use hashbrown::HashSet;
use itertools::Itertools;
use log::{debug, warn};
use typed_builder::TypedBuilder;

use mobisurv_core::direction::Direction;
use mobisurv_core::hour::HourBin;
use mobisurv_core::modes::normalize_mode;
use mobisurv_core::trip::TripRecord;
use mobisurv_input::pois::PoiRecord;

use crate::select::{percentage, total_count, trips_at_tract};

/// Tract label of the pooled row of trips coming from or going outside the metro area.
pub const OUTSIDE_TRACT: &str = "0";
const MODE_SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Frequency,
    Mode,
    Purpose,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Frequency, Category::Mode, Category::Purpose];

    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Frequency => "frequency",
            Category::Mode => "mode",
            Category::Purpose => "purpose",
        }
    }

    fn label(&self, trip: &TripRecord) -> String {
        match self {
            Category::Frequency => trip.frequency.trim().to_string(),
            Category::Mode => normalize_mode(&trip.mode),
            Category::Purpose => trip.purpose.trim().to_string(),
        }
    }
}

/// One summary column after `tract` and `total_trips`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareColumn {
    Category(Category, String),
    Arrival(HourBin),
}

impl ShareColumn {
    pub fn name(&self) -> String {
        match self {
            ShareColumn::Category(category, value) => format!("{}_{}", category.prefix(), value),
            ShareColumn::Arrival(hour) => format!("arrival_{}", hour),
        }
    }

    pub fn is_mode(&self) -> bool {
        matches!(self, ShareColumn::Category(Category::Mode, _))
    }

    fn share_of(&self, trips: &[&TripRecord], total: f64) -> f64 {
        let matching: f64 = match self {
            ShareColumn::Category(category, value) => trips
                .iter()
                .filter(|trip| category.label(trip) == *value)
                .map(|trip| trip.count)
                .sum(),
            ShareColumn::Arrival(hour) => trips
                .iter()
                .filter(|trip| trip.hour == *hour)
                .map(|trip| trip.count)
                .sum(),
        };
        percentage(matching, total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub tract: String,
    pub total_trips: f64,
    /// Percentages aligned with the summary's share columns.
    pub shares: Vec<f64>,
}

/// Per-tract breakdown of the trips of one POI in one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiSummary {
    pub poi_name: String,
    pub direction: Direction,
    pub columns: Vec<ShareColumn>,
    pub rows: Vec<SummaryRow>,
}

impl PoiSummary {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(ShareColumn::name).collect()
    }

    pub fn share(&self, row: &SummaryRow, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c.name() == column)
            .and_then(|idx| row.shares.get(idx).copied())
    }

    pub fn mode_sum(&self, row: &SummaryRow) -> f64 {
        self.columns
            .iter()
            .zip(row.shares.iter())
            .filter(|(column, _)| column.is_mode())
            .map(|(_, share)| share)
            .sum()
    }

    /// Tracts whose mode percentages do not add up to 100.
    pub fn check_mode_sums(&self) -> Vec<&str> {
        let mut failing = Vec::new();
        for row in self.rows.iter() {
            let mode_sum = self.mode_sum(row);
            if (mode_sum - 100.0).abs() > MODE_SUM_TOLERANCE {
                warn!(
                    "{} {}: mode percentages of tract {} sum to {:.2}",
                    self.poi_name, self.direction, row.tract, mode_sum
                );
                failing.push(row.tract.as_str());
            }
        }
        failing
    }
}

#[derive(Debug, Clone, Default, PartialEq, TypedBuilder)]
pub struct TripsInfo {
    pub total_trips: f64,
    pub metro_trips: f64,
    pub outside_trips: f64,
    pub num_trip_types: usize,
    pub num_unique_origins: usize,
}

/// Builds the tract summary and the trip totals of a POI, or `None` when no row has the POI
/// at the requested end.
pub fn summarize_poi(
    poi: &PoiRecord,
    direction: Direction,
    trips: &[TripRecord],
) -> Option<(PoiSummary, TripsInfo)> {
    let selected = trips_at_tract(trips, &poi.id, direction);
    if selected.is_empty() {
        debug!("No {} trips found for {} ({})", direction, poi.name, poi.id);
        return None;
    }

    let (outside, metro): (Vec<&TripRecord>, Vec<&TripRecord>) =
        selected.iter().copied().partition(|trip| trip.inter_city);
    let columns = share_columns(&selected);

    let mut rows: Vec<SummaryRow> = metro
        .iter()
        .copied()
        .into_group_map_by(|trip| trip.counterpart_tract(direction).to_string())
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .map(|(tract, group)| summary_row(tract, &group, &columns))
        .collect();

    let outside_total = total_count(&outside);
    if outside_total > 0.0 {
        rows.push(summary_row(OUTSIDE_TRACT.to_string(), &outside, &columns));
    }

    let origins: HashSet<&str> = selected
        .iter()
        .map(|trip| trip.counterpart_tract(direction).as_str())
        .collect();
    let info = TripsInfo::builder()
        .total_trips(total_count(&selected))
        .metro_trips(total_count(&metro))
        .outside_trips(outside_total)
        .num_trip_types(selected.len())
        .num_unique_origins(origins.len())
        .build();

    let summary = PoiSummary {
        poi_name: poi.name.clone(),
        direction,
        columns,
        rows,
    };
    summary.check_mode_sums();
    Some((summary, info))
}

fn share_columns(trips: &[&TripRecord]) -> Vec<ShareColumn> {
    let mut columns: Vec<ShareColumn> = Vec::new();
    for category in Category::ALL {
        let values = trips
            .iter()
            .map(|trip| category.label(trip))
            .filter(|label| !label.is_empty())
            .unique()
            .sorted();
        columns.extend(values.map(|value| ShareColumn::Category(category, value)));
    }
    columns.extend(HourBin::all().map(ShareColumn::Arrival));
    columns
}

fn summary_row(tract: String, trips: &[&TripRecord], columns: &[ShareColumn]) -> SummaryRow {
    let total_trips = total_count(trips);
    let shares = columns
        .iter()
        .map(|column| column.share_of(trips, total_trips))
        .collect();
    SummaryRow {
        tract,
        total_trips,
        shares,
    }
}
