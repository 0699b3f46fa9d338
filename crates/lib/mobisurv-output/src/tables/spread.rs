use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};

use mobisurv_models::spread::ModeSpreadRow;

use crate::result::ResultWriter;
use crate::writer::DataOutput;

#[derive(Debug)]
pub struct ModeSpreadWriter {
    hour: Vec<u32>,
    mode: Vec<String>,
    count: Vec<f64>,
    total_trips: Vec<f64>,
    percentage: Vec<f64>,
    to_output: DataOutput,
}

impl ModeSpreadWriter {
    pub fn new(output_file: &Path) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            to_output: DataOutput::new(output_file, mode_spread_schema())?,
            hour: Vec::new(),
            mode: Vec::new(),
            count: Vec::new(),
            total_trips: Vec::new(),
            percentage: Vec::new(),
        })
    }

    pub fn add_data(&mut self, rows: &[ModeSpreadRow]) {
        for row in rows {
            self.hour.push(row.hour.as_u32());
            self.mode.push(row.mode.clone());
            self.count.push(row.count);
            self.total_trips.push(row.total_trips);
            self.percentage.push(row.percentage);
        }
    }
}

fn mode_spread_schema() -> Schema {
    let hour = Field::new("hour", DataType::UInt32, false);
    let mode = Field::new("mode", DataType::Utf8, false);
    let count = Field::new("count", DataType::Float64, false);
    let total_trips = Field::new("total_trips", DataType::Float64, false);
    let percentage = Field::new("percentage", DataType::Float64, false);
    Schema::new(vec![hour, mode, count, total_trips, percentage])
}

impl ResultWriter for ModeSpreadWriter {
    fn schema(&self) -> Schema {
        mode_spread_schema()
    }

    fn write_to_file(&mut self) -> Result<(), Box<dyn Error>> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(UInt32Array::from(std::mem::take(&mut self.hour))),
            Arc::new(StringArray::from(std::mem::take(&mut self.mode))),
            Arc::new(Float64Array::from(std::mem::take(&mut self.count))),
            Arc::new(Float64Array::from(std::mem::take(&mut self.total_trips))),
            Arc::new(Float64Array::from(std::mem::take(&mut self.percentage))),
        ];
        let record_batch = RecordBatch::try_new(Arc::new(self.schema()), columns)?;
        self.to_output.write(&record_batch)
    }

    fn close_file(self) -> Result<(), Box<dyn Error>> {
        self.to_output.close()
    }
}
