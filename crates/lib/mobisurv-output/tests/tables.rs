use std::fs::File;

use mobisurv_core::direction::Direction;
use mobisurv_core::modes::ModeGroups;
use mobisurv_core::poi::PoiNameTable;
use mobisurv_core::zone::analyze_zone_ids;
use mobisurv_input::pois::read_pois;
use mobisurv_models::city_patterns::{city_patterns, CityPatternSettings};
use mobisurv_models::select::trips_at_tract;
use mobisurv_models::spread::mode_spread;
use mobisurv_models::summary::summarize_poi;
use mobisurv_models::temporal::{temporal_distribution, TemporalSettings};
use mobisurv_output::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use mobisurv_output::result::{OutputFormat, OutputSettings, OutputType, ResultWriter};
use mobisurv_output::tables::city_patterns::CityPatternsWriter;
use mobisurv_output::tables::spread::ModeSpreadWriter;
use mobisurv_output::tables::summary::SummaryWriter;
use mobisurv_output::tables::temporal::TemporalWriter;
use mobisurv_output::tables::trips::TripsWriter;
use mobisurv_output::tables::trips_info::TripsInfoWriter;
use mobisurv_output::tables::validation::ValidationWriter;
use mobisurv_output::tables::zones::ZonesWriter;
use mobisurv_testutils::scratch::scratch_dir;
use mobisurv_testutils::survey::{named_trip, sample_trips};
use mobisurv_testutils::zones::{sample_pois, sample_zone_table};

fn read_csv(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|record| record.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn settings(name: &str, format: OutputFormat) -> OutputSettings {
    OutputSettings {
        output_path: scratch_dir(name),
        format,
        outputs: vec![OutputType::Summary],
    }
}

#[test]
fn test_summary_and_info_as_csv() {
    let files = settings("tables-csv", OutputFormat::Csv)
        .prepare(std::path::Path::new("."))
        .unwrap();
    let trips = sample_trips();
    let poi = &sample_pois()[0];
    let (summary, info) = summarize_poi(poi, Direction::Inbound, &trips).unwrap();

    let summary_file = files.summary(&poi.name, Direction::Inbound);
    let mut writer = SummaryWriter::new(&summary_file, &summary).unwrap();
    writer.add_data(&summary);
    writer.write_to_file().unwrap();
    writer.close_file().unwrap();

    let (headers, rows) = read_csv(&summary_file);
    assert_eq!(headers[0], "tract");
    assert_eq!(headers[1], "total_trips");
    assert_eq!(headers.last().unwrap(), "arrival_23:00");
    assert_eq!(headers.len(), 2 + summary.columns.len());
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2][0], "0");

    let info_file = files.trips_info(&poi.name, Direction::Inbound);
    let mut writer = TripsInfoWriter::new(&info_file).unwrap();
    writer.add_data(&info);
    writer.write_to_file().unwrap();
    writer.close_file().unwrap();
    let (headers, rows) = read_csv(&info_file);
    assert_eq!(headers[4], "num_unique_origins");
    assert_eq!(rows[0][4], "3");
}

#[test]
fn test_temporal_and_spread_as_parquet() {
    let files = settings("tables-parquet", OutputFormat::Parquet)
        .prepare(std::path::Path::new("."))
        .unwrap();
    let trips = sample_trips();
    let poi = &sample_pois()[0];
    let selected = trips_at_tract(&trips, &poi.id, Direction::Inbound);
    let groups = ModeGroups::default();

    let result = temporal_distribution(
        &poi.name,
        Direction::Inbound,
        &selected,
        &groups,
        &TemporalSettings::default(),
    )
    .unwrap();
    let temporal_file = files.temporal(&poi.name, Direction::Inbound);
    let mut writer = TemporalWriter::for_distribution(&temporal_file, &result).unwrap();
    writer.write_to_file().unwrap();
    writer.close_file().unwrap();

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&temporal_file).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(|batch| batch.unwrap()).collect();
    assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 24);
    let schema = batches[0].schema();
    assert_eq!(schema.field(1).name(), "all_dist");
    assert_eq!(schema.field(2).name(), "car_dist");

    let spread_file = files.mode_spread(&poi.name, Direction::Inbound);
    let mut writer = ModeSpreadWriter::new(&spread_file).unwrap();
    writer.add_data(&mode_spread(&selected, &groups));
    writer.write_to_file().unwrap();
    writer.close_file().unwrap();
    assert!(spread_file.exists());
}

#[test]
fn test_zone_tables_as_csv() {
    let files = settings("tables-zones", OutputFormat::Csv)
        .prepare(std::path::Path::new("."))
        .unwrap();
    let zones = sample_zone_table();
    let mut writer = ZonesWriter::new(&files.zones()).unwrap();
    writer.add_data(&zones);
    writer.write_to_file().unwrap();
    writer.close_file().unwrap();
    let (_, rows) = read_csv(&files.zones());
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[3], vec!["C0009000", "city", "Beer Sheva"]);

    let trips = sample_trips();
    let mut writer = TripsWriter::new(&files.trips()).unwrap();
    writer.add_data(&trips);
    writer.write_to_file().unwrap();
    writer.close_file().unwrap();
    let (headers, rows) = read_csv(&files.trips());
    assert_eq!(headers[5], "Frequency");
    assert_eq!(rows[0][7], "08:00:00");
    assert_eq!(rows.len(), trips.len());

    let census = analyze_zone_ids([
        trips.iter().map(|t| t.from_tract.as_str()).collect::<Vec<_>>(),
        trips.iter().map(|t| t.to_tract.as_str()).collect::<Vec<_>>(),
    ]);
    let mut writer = ValidationWriter::new(&files.validation()).unwrap();
    writer.add_data(&census);
    writer.write_to_file().unwrap();
    writer.close_file().unwrap();
    let (_, rows) = read_csv(&files.validation());
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[4][0], "total");
}

#[test]
fn test_city_patterns_as_csv() {
    let files = settings("tables-cities", OutputFormat::Csv)
        .prepare(std::path::Path::new("."))
        .unwrap();
    let trips = sample_trips();
    let pois = sample_pois();
    let mut summaries = Vec::new();
    for poi in pois.iter() {
        for direction in Direction::ALL {
            if let Some((summary, _)) = summarize_poi(poi, direction, &trips) {
                summaries.push(summary);
            }
        }
    }
    let patterns = city_patterns(
        &summaries,
        &sample_zone_table(),
        &CityPatternSettings::default(),
    );

    let mut writer = CityPatternsWriter::new(&files.city_patterns(), &patterns).unwrap();
    writer.add_data(&patterns);
    writer.write_to_file().unwrap();
    writer.close_file().unwrap();

    let (headers, rows) = read_csv(&files.city_patterns());
    assert_eq!(headers[0], "city");
    assert_eq!(headers[3], "focus_share");
    assert_eq!(headers.last().unwrap(), "mode_walk");
    assert_eq!(headers.len(), 1 + patterns.column_names().len());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "Beer Sheva");
    assert_eq!(rows[0][1].parse::<f64>().unwrap(), 85.0);
    assert_eq!(rows[0][3].parse::<f64>().unwrap(), 1.0);
}

#[test]
fn test_poi_name_with_path_separator() {
    let files = settings("tables-slash", OutputFormat::Csv)
        .prepare(std::path::Path::new("."))
        .unwrap();
    let (pois, _) = read_pois("ID,name\n5,Mall/Center\n".as_bytes(), &PoiNameTable::default())
        .unwrap();
    let trips = vec![named_trip(
        ("Beer Sheva", "90000011"),
        ("Mall/Center", "5"),
        "car",
        12,
        3.0,
        false,
    )];
    let (_, info) = summarize_poi(&pois[0], Direction::Inbound, &trips).unwrap();

    let info_file = files.trips_info(&pois[0].name, Direction::Inbound);
    assert_eq!(info_file.parent(), Some(files.output_dir.as_path()));
    let mut writer = TripsInfoWriter::new(&info_file).unwrap();
    writer.add_data(&info);
    writer.write_to_file().unwrap();
    writer.close_file().unwrap();
    let (_, rows) = read_csv(&info_file);
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = scratch_dir("tables-extension");
    assert!(ZonesWriter::new(&dir.join("zones.xlsx")).is_err());
}
