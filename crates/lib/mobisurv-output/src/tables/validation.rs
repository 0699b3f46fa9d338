use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};

use mobisurv_core::zone::{ZoneCensus, ZoneKind};

use crate::result::ResultWriter;
use crate::writer::DataOutput;

/// Zone census as one row per kind plus a total. The `unknown` row lists the offending ids.
#[derive(Debug)]
pub struct ValidationWriter {
    category: Vec<String>,
    count: Vec<u64>,
    zone_ids: Vec<String>,
    to_output: DataOutput,
}

impl ValidationWriter {
    pub fn new(output_file: &Path) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            to_output: DataOutput::new(output_file, validation_schema())?,
            category: Vec::new(),
            count: Vec::new(),
            zone_ids: Vec::new(),
        })
    }

    pub fn add_data(&mut self, census: &ZoneCensus) {
        let rows = [
            (ZoneKind::City.to_string(), census.city, String::new()),
            (ZoneKind::Statistical.to_string(), census.statistical, String::new()),
            (ZoneKind::Poi.to_string(), census.poi, String::new()),
            (ZoneKind::Unknown.to_string(), census.unknown, census.invalid.join(";")),
            ("total".to_string(), census.total(), String::new()),
        ];
        for (category, count, zone_ids) in rows {
            self.category.push(category);
            self.count.push(count as u64);
            self.zone_ids.push(zone_ids);
        }
    }
}

fn validation_schema() -> Schema {
    let category = Field::new("category", DataType::Utf8, false);
    let count = Field::new("count", DataType::UInt64, false);
    let zone_ids = Field::new("zone_ids", DataType::Utf8, false);
    Schema::new(vec![category, count, zone_ids])
}

impl ResultWriter for ValidationWriter {
    fn schema(&self) -> Schema {
        validation_schema()
    }

    fn write_to_file(&mut self) -> Result<(), Box<dyn Error>> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(std::mem::take(&mut self.category))),
            Arc::new(UInt64Array::from(std::mem::take(&mut self.count))),
            Arc::new(StringArray::from(std::mem::take(&mut self.zone_ids))),
        ];
        let record_batch = RecordBatch::try_new(Arc::new(self.schema()), columns)?;
        self.to_output.write(&record_batch)
    }

    fn close_file(self) -> Result<(), Box<dyn Error>> {
        self.to_output.close()
    }
}
