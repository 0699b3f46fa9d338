use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use csv::ReaderBuilder;
use hashbrown::HashSet;
use log::{debug, info};
use serde::Deserialize;
use typed_builder::TypedBuilder;

use mobisurv_core::zone::{standardize_zone_id, ZoneId, ZoneKind};

use crate::columns::{require_columns, ZONE_REQUIRED};
use crate::report::{IngestReport, RowError};
use crate::trips::{decode_record, record_line};

#[derive(Deserialize, Debug, Default)]
struct RawZone {
    #[serde(rename = "YISHUV_STAT11")]
    zone_id: String,
    #[serde(rename = "SEMEL_YISHUV", default)]
    settlement_code: String,
    #[serde(rename = "SHEM_YISHUV_ENGLISH", default)]
    settlement_name: String,
}

#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct ZoneRecord {
    pub id: ZoneId,
    #[builder(default, setter(into))]
    pub name: String,
    #[builder(default)]
    pub settlement: Option<u32>,
}

/// Statistical areas followed by the city zones derived from their settlements.
#[derive(Clone, Debug, Default)]
pub struct ZoneTable {
    pub zones: Vec<ZoneRecord>,
}

impl ZoneTable {
    /// Builds the combined table and adds one city zone per settlement code, named after the
    /// first statistical area seen in it.
    pub fn from_statistical(statistical: Vec<ZoneRecord>) -> Self {
        let mut cities: Vec<ZoneRecord> = Vec::new();
        let mut seen: HashSet<u32> = HashSet::new();
        for zone in statistical.iter() {
            if let Some(code) = zone.settlement {
                if !seen.insert(code) {
                    continue;
                }
                cities.push(
                    ZoneRecord::builder()
                        .id(ZoneId::city(code))
                        .name(zone.name.clone())
                        .settlement(Some(code))
                        .build(),
                );
            }
        }
        info!(
            "Zone table has {} statistical areas and {} cities",
            statistical.len(),
            cities.len()
        );
        let mut zones = statistical;
        zones.extend(cities);
        Self { zones }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn cities(&self) -> impl Iterator<Item = &ZoneRecord> {
        self.zones
            .iter()
            .filter(|zone| zone.id.kind() == ZoneKind::City)
    }

    /// Upper-cased city names with their zones, for matching free-text place names.
    pub fn city_names(&self) -> Vec<(String, ZoneId)> {
        self.cities()
            .filter(|zone| !zone.name.trim().is_empty())
            .map(|zone| (zone.name.trim().to_uppercase(), zone.id.clone()))
            .collect()
    }

    pub fn name_of(&self, zone_id: &ZoneId) -> Option<&str> {
        self.zones
            .iter()
            .find(|zone| &zone.id == zone_id)
            .map(|zone| zone.name.as_str())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|zone| zone.id.as_str())
    }
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct ZoneReader {
    file_path: PathBuf,
}

impl ZoneReader {
    pub fn read(&self) -> Result<(ZoneTable, IngestReport), Box<dyn Error>> {
        debug!("Reading zones from {}", self.file_path.display());
        let zone_file = File::open(&self.file_path)?;
        read_zones(zone_file)
    }
}

pub fn read_zones<R: Read>(reader: R) -> Result<(ZoneTable, IngestReport), Box<dyn Error>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    require_columns(&headers, &ZONE_REQUIRED)?;

    let mut report = IngestReport::new("zones");
    let mut statistical = Vec::new();
    for (idx, record) in csv_reader.byte_records().enumerate() {
        let record = record?;
        let line = record_line(&record, idx);
        let parsed = decode_record(record)
            .and_then(|record| {
                record
                    .deserialize::<RawZone>(Some(&headers))
                    .map_err(|e| RowError::Malformed(e.to_string()))
            })
            .and_then(parse_zone);
        match parsed {
            Ok(zone) => {
                report.keep();
                statistical.push(zone);
            }
            Err(e) => report.drop_row(line, e),
        }
    }
    Ok((ZoneTable::from_statistical(statistical), report))
}

fn parse_zone(raw: RawZone) -> Result<ZoneRecord, RowError> {
    let id = standardize_zone_id(&raw.zone_id)?;
    let settlement = parse_settlement(&raw.settlement_code)?;
    Ok(ZoneRecord::builder()
        .id(id)
        .name(raw.settlement_name.trim())
        .settlement(settlement)
        .build())
}

fn parse_settlement(raw: &str) -> Result<Option<u32>, RowError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(code) if code.is_finite() && code >= 0.0 && code <= u32::MAX as f64 => {
            Ok(Some(code.trunc() as u32))
        }
        _ => Err(RowError::Malformed(format!("settlement code {}", raw))),
    }
}
