use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use csv::{ByteRecord, ReaderBuilder, StringRecord};
use log::debug;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use mobisurv_core::hour::parse_time_bin;
use mobisurv_core::modes::normalize_mode;
use mobisurv_core::trip::TripRecord;
use mobisurv_core::zone::standardize_zone_id;

use crate::columns::{require_columns, TRIP_REQUIRED};
use crate::report::{IngestReport, RowError};

/// One row of the survey export exactly as written. Every field stays text until it is
/// validated so that a single bad cell drops only its own row.
#[derive(Deserialize, Debug, Default)]
struct RawTrip {
    #[serde(default)]
    from_name: String,
    #[serde(default)]
    from_tract: String,
    #[serde(default)]
    to_name: String,
    #[serde(default)]
    to_tract: String,
    #[serde(default)]
    mode: String,
    #[serde(rename = "Frequency", alias = "frequency", default)]
    frequency: String,
    #[serde(default)]
    purpose: String,
    #[serde(default)]
    time_bin: String,
    #[serde(default)]
    count: String,
    #[serde(rename = "IC", alias = "ic", default)]
    inter_city: String,
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct TripReader {
    file_path: PathBuf,
}

impl TripReader {
    pub fn read(&self) -> Result<(Vec<TripRecord>, IngestReport), Box<dyn Error>> {
        debug!("Reading trips from {}", self.file_path.display());
        let trip_file = File::open(&self.file_path)?;
        read_trips(trip_file)
    }
}

/// Reads and validates every survey row. Invalid rows are logged and skipped; only I/O
/// failures and a broken header abort the read.
pub fn read_trips<R: Read>(reader: R) -> Result<(Vec<TripRecord>, IngestReport), Box<dyn Error>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    require_columns(&headers, &TRIP_REQUIRED)?;

    let mut report = IngestReport::new("trips");
    let mut trips = Vec::new();
    for (idx, record) in csv_reader.byte_records().enumerate() {
        let record = record?;
        let line = record_line(&record, idx);
        match decode_record(record).and_then(|record| parse_trip(&record, &headers)) {
            Ok(trip) => {
                report.keep();
                trips.push(trip);
            }
            Err(e) => report.drop_row(line, e),
        }
    }
    Ok((trips, report))
}

pub(crate) fn record_line(record: &ByteRecord, idx: usize) -> usize {
    match record.position() {
        Some(position) => position.line() as usize,
        None => idx + 2,
    }
}

/// Rows are read as bytes so that one badly encoded place name drops only its own row.
pub(crate) fn decode_record(record: ByteRecord) -> Result<StringRecord, RowError> {
    StringRecord::from_byte_record(record).map_err(|e| RowError::Malformed(e.to_string()))
}

fn parse_trip(record: &StringRecord, headers: &StringRecord) -> Result<TripRecord, RowError> {
    let raw: RawTrip = record
        .deserialize(Some(headers))
        .map_err(|e| RowError::Malformed(e.to_string()))?;

    let count = parse_count(&raw.count)?;
    let from_tract = standardize_zone_id(&raw.from_tract)?;
    let to_tract = standardize_zone_id(&raw.to_tract)?;
    let hour = parse_time_bin(&raw.time_bin)?;
    let inter_city = parse_flag(&raw.inter_city)?;

    Ok(TripRecord::builder()
        .from_name(raw.from_name.trim())
        .from_tract(from_tract)
        .to_name(raw.to_name.trim())
        .to_tract(to_tract)
        .mode(normalize_mode(&raw.mode))
        .frequency(raw.frequency.trim())
        .purpose(raw.purpose.trim())
        .hour(hour)
        .count(count)
        .inter_city(inter_city)
        .build())
}

fn parse_count(raw: &str) -> Result<f64, RowError> {
    match raw.trim().parse::<f64>() {
        Ok(count) if count.is_finite() && count >= 0.0 => Ok(count),
        _ => Err(RowError::BadCount(raw.to_string())),
    }
}

/// Reads the inter-city flag. Blank cells mean the trip stays inside the metro area.
pub fn parse_flag(raw: &str) -> Result<bool, RowError> {
    let value = raw.trim().to_lowercase();
    match value.as_str() {
        "" | "false" | "no" | "f" => Ok(false),
        "true" | "yes" | "t" => Ok(true),
        _ => match value.parse::<f64>() {
            Ok(number) => Ok(number != 0.0),
            Err(_) => Err(RowError::BadFlag(raw.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "from_name,from_tract,to_name,to_tract,mode,Frequency,purpose,time_bin,count,IC\n";

    #[test]
    fn test_valid_rows_are_standardized() {
        let data = format!(
            "{}Ofakim,C31,BGU,2,Bus ,daily,work,08:00:00,12.5,True\n\
             ,62000015.0,Soroka Hospital,03,car,weekly,health,0.75,3,0\n",
            HEADER
        );
        let (trips, report) = read_trips(data.as_bytes()).unwrap();
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_kept, 2);
        assert_eq!(trips[0].from_tract.as_str(), "C0000031");
        assert_eq!(trips[0].to_tract.as_str(), "00000002");
        assert_eq!(trips[0].mode, "bus");
        assert!(trips[0].inter_city);
        assert_eq!(trips[0].hour.as_usize(), 8);
        assert_eq!(trips[1].from_tract.as_str(), "62000015");
        assert_eq!(trips[1].to_tract.as_str(), "00000003");
        assert_eq!(trips[1].hour.as_usize(), 18);
        assert!(!trips[1].inter_city);
    }

    #[test]
    fn test_invalid_rows_are_dropped() {
        let data = format!(
            "{}A,1,B,2,car,daily,work,08:00:00,-1,False\n\
             A,123456789,B,2,car,daily,work,08:00:00,1,False\n\
             A,1,B,2,car,daily,work,noon,1,False\n\
             A,1,B,2,car,daily,work,08:00:00,1,maybe\n\
             A,1,B,2,car,daily,work,08:00:00,4,\n",
            HEADER
        );
        let (trips, report) = read_trips(data.as_bytes()).unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(report.rows_dropped(), 4);
        let reasons = report.drop_reasons();
        assert_eq!(reasons.get("bad_count"), Some(&1));
        assert_eq!(reasons.get("bad_zone"), Some(&1));
        assert_eq!(reasons.get("bad_time"), Some(&1));
        assert_eq!(reasons.get("bad_flag"), Some(&1));
        assert_eq!(report.dropped[0].0, 2);
    }

    #[test]
    fn test_badly_encoded_row_is_dropped() {
        let mut data = HEADER.as_bytes().to_vec();
        data.extend_from_slice(b"Ofakim,C31,BGU,2,bus,daily,work,08:00:00,2,0\n");
        data.extend_from_slice(b"Be\xffer,C9000,BGU,2,car,daily,work,09:00:00,3,0\n");
        data.extend_from_slice(b"Ofakim,C31,BGU,2,walk,daily,work,10:00:00,1,0\n");
        let (trips, report) = read_trips(data.as_slice()).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[1].mode, "walk");
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_dropped(), 1);
        assert_eq!(report.drop_reasons().get("malformed"), Some(&1));
        assert_eq!(report.dropped[0].0, 3);
    }

    #[test]
    fn test_missing_optional_columns() {
        let data = "from_tract,to_tract,mode,time_bin,count\nC5,00000001,walk,07:30,2\n";
        let (trips, _) = read_trips(data.as_bytes()).unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].frequency, "");
        assert!(!trips[0].inter_city);
    }

    #[test]
    fn test_flags() {
        assert_eq!(parse_flag("TRUE"), Ok(true));
        assert_eq!(parse_flag("1.0"), Ok(true));
        assert_eq!(parse_flag("0"), Ok(false));
        assert_eq!(parse_flag(""), Ok(false));
        assert!(parse_flag("sometimes").is_err());
    }
}
