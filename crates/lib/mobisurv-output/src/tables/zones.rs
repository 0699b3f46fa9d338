use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};

use mobisurv_input::zones::ZoneTable;

use crate::result::ResultWriter;
use crate::writer::DataOutput;

#[derive(Debug)]
pub struct ZonesWriter {
    id: Vec<String>,
    kind: Vec<String>,
    name: Vec<String>,
    to_output: DataOutput,
}

impl ZonesWriter {
    pub fn new(output_file: &Path) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            to_output: DataOutput::new(output_file, zones_schema())?,
            id: Vec::new(),
            kind: Vec::new(),
            name: Vec::new(),
        })
    }

    pub fn add_data(&mut self, zones: &ZoneTable) {
        for zone in zones.zones.iter() {
            self.id.push(zone.id.to_string());
            self.kind.push(zone.id.kind().to_string());
            self.name.push(zone.name.clone());
        }
    }
}

fn zones_schema() -> Schema {
    let id = Field::new("id", DataType::Utf8, false);
    let kind = Field::new("kind", DataType::Utf8, false);
    let name = Field::new("name", DataType::Utf8, false);
    Schema::new(vec![id, kind, name])
}

impl ResultWriter for ZonesWriter {
    fn schema(&self) -> Schema {
        zones_schema()
    }

    fn write_to_file(&mut self) -> Result<(), Box<dyn Error>> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(std::mem::take(&mut self.id))),
            Arc::new(StringArray::from(std::mem::take(&mut self.kind))),
            Arc::new(StringArray::from(std::mem::take(&mut self.name))),
        ];
        let record_batch = RecordBatch::try_new(Arc::new(self.schema()), columns)?;
        self.to_output.write(&record_batch)
    }

    fn close_file(self) -> Result<(), Box<dyn Error>> {
        self.to_output.close()
    }
}
