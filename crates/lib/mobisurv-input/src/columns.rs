use std::error::Error;

use csv::StringRecord;

pub const FROM_NAME: &str = "from_name";
pub const FROM_TRACT: &str = "from_tract";
pub const TO_NAME: &str = "to_name";
pub const TO_TRACT: &str = "to_tract";
pub const MODE: &str = "mode";
pub const FREQUENCY: &str = "Frequency";
pub const PURPOSE: &str = "purpose";
pub const TIME_BIN: &str = "time_bin";
pub const COUNT: &str = "count";
pub const INTER_CITY: &str = "IC";

pub const STAT_ZONE: &str = "YISHUV_STAT11";
pub const SETTLEMENT_CODE: &str = "SEMEL_YISHUV";
pub const SETTLEMENT_NAME: &str = "SHEM_YISHUV_ENGLISH";

pub const POI_TRACT: &str = "tract";
pub const POI_ID: &str = "ID";
pub const POI_NAME: &str = "name";

pub const TRIP_REQUIRED: [&str; 5] = [FROM_TRACT, TO_TRACT, MODE, TIME_BIN, COUNT];
pub const ZONE_REQUIRED: [&str; 1] = [STAT_ZONE];

/// Fails when any of the columns is absent from the header.
pub fn require_columns(headers: &StringRecord, required: &[&str]) -> Result<(), Box<dyn Error>> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(format!("missing required columns: {}", missing.join(", ")).into())
}

/// Fails unless at least one of the columns is present.
pub fn require_any(headers: &StringRecord, candidates: &[&str]) -> Result<(), Box<dyn Error>> {
    if candidates
        .iter()
        .any(|column| headers.iter().any(|header| header == *column))
    {
        return Ok(());
    }
    Err(format!("expected one of the columns: {}", candidates.join(", ")).into())
}
