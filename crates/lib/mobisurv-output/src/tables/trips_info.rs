use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};

use mobisurv_models::summary::TripsInfo;

use crate::result::ResultWriter;
use crate::writer::DataOutput;

#[derive(Debug)]
pub struct TripsInfoWriter {
    total_trips: Vec<f64>,
    metro_trips: Vec<f64>,
    outside_trips: Vec<f64>,
    num_trip_types: Vec<u64>,
    num_unique_origins: Vec<u64>,
    to_output: DataOutput,
}

impl TripsInfoWriter {
    pub fn new(output_file: &Path) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            to_output: DataOutput::new(output_file, trips_info_schema())?,
            total_trips: Vec::new(),
            metro_trips: Vec::new(),
            outside_trips: Vec::new(),
            num_trip_types: Vec::new(),
            num_unique_origins: Vec::new(),
        })
    }

    pub fn add_data(&mut self, info: &TripsInfo) {
        self.total_trips.push(info.total_trips);
        self.metro_trips.push(info.metro_trips);
        self.outside_trips.push(info.outside_trips);
        self.num_trip_types.push(info.num_trip_types as u64);
        self.num_unique_origins.push(info.num_unique_origins as u64);
    }
}

fn trips_info_schema() -> Schema {
    let total_trips = Field::new("total_trips", DataType::Float64, false);
    let metro_trips = Field::new("metro_trips", DataType::Float64, false);
    let outside_trips = Field::new("outside_trips", DataType::Float64, false);
    let num_trip_types = Field::new("num_trip_types", DataType::UInt64, false);
    let num_unique_origins = Field::new("num_unique_origins", DataType::UInt64, false);
    Schema::new(vec![
        total_trips,
        metro_trips,
        outside_trips,
        num_trip_types,
        num_unique_origins,
    ])
}

impl ResultWriter for TripsInfoWriter {
    fn schema(&self) -> Schema {
        trips_info_schema()
    }

    fn write_to_file(&mut self) -> Result<(), Box<dyn Error>> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Float64Array::from(std::mem::take(&mut self.total_trips))),
            Arc::new(Float64Array::from(std::mem::take(&mut self.metro_trips))),
            Arc::new(Float64Array::from(std::mem::take(&mut self.outside_trips))),
            Arc::new(UInt64Array::from(std::mem::take(&mut self.num_trip_types))),
            Arc::new(UInt64Array::from(std::mem::take(&mut self.num_unique_origins))),
        ];
        let record_batch = RecordBatch::try_new(Arc::new(self.schema()), columns)?;
        self.to_output.write(&record_batch)
    }

    fn close_file(self) -> Result<(), Box<dyn Error>> {
        self.to_output.close()
    }
}
