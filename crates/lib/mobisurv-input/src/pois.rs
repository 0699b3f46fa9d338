use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use csv::ReaderBuilder;
use hashbrown::HashSet;
use log::{debug, warn};
use serde::Deserialize;
use typed_builder::TypedBuilder;

use mobisurv_core::poi::PoiNameTable;
use mobisurv_core::zone::{standardize_zone_id, ZoneId};

use crate::columns::{require_any, require_columns, POI_ID, POI_NAME, POI_TRACT};
use crate::report::{IngestReport, RowError};
use crate::trips::{decode_record, record_line};

#[derive(Deserialize, Debug, Default)]
struct RawPoi {
    #[serde(alias = "ID", default)]
    tract: String,
    #[serde(default)]
    name: String,
}

/// A point of interest with its canonical name and the zone that represents it.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct PoiRecord {
    pub id: ZoneId,
    #[builder(setter(into))]
    pub name: String,
    #[builder(default, setter(into))]
    pub raw_name: String,
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct PoiReader {
    file_path: PathBuf,
    names: PoiNameTable,
}

impl PoiReader {
    pub fn read(&self) -> Result<(Vec<PoiRecord>, IngestReport), Box<dyn Error>> {
        debug!("Reading POIs from {}", self.file_path.display());
        let poi_file = File::open(&self.file_path)?;
        read_pois(poi_file, &self.names)
    }
}

pub fn read_pois<R: Read>(
    reader: R,
    names: &PoiNameTable,
) -> Result<(Vec<PoiRecord>, IngestReport), Box<dyn Error>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    require_columns(&headers, &[POI_NAME])?;
    require_any(&headers, &[POI_TRACT, POI_ID])?;

    let mut report = IngestReport::new("pois");
    let mut pois: Vec<PoiRecord> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (idx, record) in csv_reader.byte_records().enumerate() {
        let record = record?;
        let line = record_line(&record, idx);
        let parsed = decode_record(record)
            .and_then(|record| {
                record
                    .deserialize::<RawPoi>(Some(&headers))
                    .map_err(|e| RowError::Malformed(e.to_string()))
            })
            .and_then(|raw| parse_poi(raw, names));
        match parsed {
            Ok(poi) => {
                report.keep();
                if !seen.insert(poi.name.clone()) {
                    warn!("POI {} listed more than once, keeping the first", poi.name);
                    continue;
                }
                pois.push(poi);
            }
            Err(e) => report.drop_row(line, e),
        }
    }
    Ok((pois, report))
}

fn parse_poi(raw: RawPoi, names: &PoiNameTable) -> Result<PoiRecord, RowError> {
    let name = names.standardize(&raw.name).ok_or(RowError::MissingName)?;
    let id = standardize_zone_id(&raw.tract)?;
    Ok(PoiRecord::builder()
        .id(id)
        .name(name)
        .raw_name(raw.name.trim())
        .build())
}
