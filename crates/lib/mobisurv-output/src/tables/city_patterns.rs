use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};

use mobisurv_models::city_patterns::CityPatterns;

use crate::result::ResultWriter;
use crate::writer::DataOutput;

/// One row per city. POI share and mode columns depend on the summaries of the run.
#[derive(Debug)]
pub struct CityPatternsWriter {
    column_names: Vec<String>,
    city: Vec<String>,
    values: Vec<Vec<f64>>,
    to_output: DataOutput,
}

impl CityPatternsWriter {
    pub fn new(output_file: &Path, patterns: &CityPatterns) -> Result<Self, Box<dyn Error>> {
        let column_names = patterns.column_names();
        let schema = city_patterns_schema(&column_names);
        Ok(Self {
            to_output: DataOutput::new(output_file, schema)?,
            values: vec![Vec::new(); column_names.len()],
            column_names,
            city: Vec::new(),
        })
    }

    pub fn add_data(&mut self, patterns: &CityPatterns) {
        for pattern in patterns.cities.iter() {
            self.city.push(pattern.city.clone());
            for (column, value) in self.values.iter_mut().zip(patterns.values(pattern)) {
                column.push(value);
            }
        }
    }
}

fn city_patterns_schema(column_names: &[String]) -> Schema {
    let mut fields = vec![Field::new("city", DataType::Utf8, false)];
    fields.extend(
        column_names
            .iter()
            .map(|name| Field::new(name, DataType::Float64, false)),
    );
    Schema::new(fields)
}

impl ResultWriter for CityPatternsWriter {
    fn schema(&self) -> Schema {
        city_patterns_schema(&self.column_names)
    }

    fn write_to_file(&mut self) -> Result<(), Box<dyn Error>> {
        let mut columns: Vec<ArrayRef> =
            vec![Arc::new(StringArray::from(std::mem::take(&mut self.city)))];
        for value in self.values.iter_mut() {
            columns.push(Arc::new(Float64Array::from(std::mem::take(value))));
        }
        let record_batch = RecordBatch::try_new(Arc::new(self.schema()), columns)?;
        self.to_output.write(&record_batch)
    }

    fn close_file(self) -> Result<(), Box<dyn Error>> {
        self.to_output.close()
    }
}
