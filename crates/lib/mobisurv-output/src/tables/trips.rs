use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};

use mobisurv_core::trip::TripRecord;
use mobisurv_input::columns::{
    COUNT, FREQUENCY, FROM_NAME, FROM_TRACT, INTER_CITY, MODE, PURPOSE, TIME_BIN, TO_NAME, TO_TRACT,
};

use crate::result::ResultWriter;
use crate::writer::DataOutput;

/// The validated survey with standardized tracts, in the input column layout.
#[derive(Debug, Default)]
struct TripColumns {
    from_name: Vec<String>,
    from_tract: Vec<String>,
    to_name: Vec<String>,
    to_tract: Vec<String>,
    mode: Vec<String>,
    frequency: Vec<String>,
    purpose: Vec<String>,
    time_bin: Vec<String>,
    count: Vec<f64>,
    inter_city: Vec<bool>,
}

#[derive(Debug)]
pub struct TripsWriter {
    columns: TripColumns,
    to_output: DataOutput,
}

impl TripsWriter {
    pub fn new(output_file: &Path) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            to_output: DataOutput::new(output_file, trips_schema())?,
            columns: TripColumns::default(),
        })
    }

    pub fn add_data(&mut self, trips: &[TripRecord]) {
        let columns = &mut self.columns;
        for trip in trips {
            columns.from_name.push(trip.from_name.clone());
            columns.from_tract.push(trip.from_tract.to_string());
            columns.to_name.push(trip.to_name.clone());
            columns.to_tract.push(trip.to_tract.to_string());
            columns.mode.push(trip.mode.clone());
            columns.frequency.push(trip.frequency.clone());
            columns.purpose.push(trip.purpose.clone());
            columns.time_bin.push(format!("{}:00", trip.hour));
            columns.count.push(trip.count);
            columns.inter_city.push(trip.inter_city);
        }
    }
}

fn trips_schema() -> Schema {
    let text = |name: &str| Field::new(name, DataType::Utf8, false);
    Schema::new(vec![
        text(FROM_NAME),
        text(FROM_TRACT),
        text(TO_NAME),
        text(TO_TRACT),
        text(MODE),
        text(FREQUENCY),
        text(PURPOSE),
        text(TIME_BIN),
        Field::new(COUNT, DataType::Float64, false),
        Field::new(INTER_CITY, DataType::Boolean, false),
    ])
}

impl ResultWriter for TripsWriter {
    fn schema(&self) -> Schema {
        trips_schema()
    }

    fn write_to_file(&mut self) -> Result<(), Box<dyn Error>> {
        let taken = std::mem::take(&mut self.columns);
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(taken.from_name)),
            Arc::new(StringArray::from(taken.from_tract)),
            Arc::new(StringArray::from(taken.to_name)),
            Arc::new(StringArray::from(taken.to_tract)),
            Arc::new(StringArray::from(taken.mode)),
            Arc::new(StringArray::from(taken.frequency)),
            Arc::new(StringArray::from(taken.purpose)),
            Arc::new(StringArray::from(taken.time_bin)),
            Arc::new(Float64Array::from(taken.count)),
            Arc::new(BooleanArray::from(taken.inter_city)),
        ];
        let record_batch = RecordBatch::try_new(Arc::new(self.schema()), columns)?;
        self.to_output.write(&record_batch)
    }

    fn close_file(self) -> Result<(), Box<dyn Error>> {
        self.to_output.close()
    }
}
