use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};

use mobisurv_models::summary::PoiSummary;

use crate::result::ResultWriter;
use crate::writer::DataOutput;

/// Per-tract summary of one POI. Columns follow the summary, so every POI gets its own
/// schema.
#[derive(Debug)]
pub struct SummaryWriter {
    column_names: Vec<String>,
    tract: Vec<String>,
    total_trips: Vec<f64>,
    shares: Vec<Vec<f64>>,
    to_output: DataOutput,
}

impl SummaryWriter {
    pub fn new(output_file: &Path, summary: &PoiSummary) -> Result<Self, Box<dyn Error>> {
        let column_names = summary.column_names();
        let schema = summary_schema(&column_names);
        Ok(Self {
            to_output: DataOutput::new(output_file, schema)?,
            shares: vec![Vec::new(); column_names.len()],
            column_names,
            tract: Vec::new(),
            total_trips: Vec::new(),
        })
    }

    pub fn add_data(&mut self, summary: &PoiSummary) {
        for row in summary.rows.iter() {
            self.tract.push(row.tract.clone());
            self.total_trips.push(row.total_trips);
            for (column, share) in self.shares.iter_mut().zip(row.shares.iter()) {
                column.push(*share);
            }
        }
    }
}

fn summary_schema(column_names: &[String]) -> Schema {
    let mut fields = vec![
        Field::new("tract", DataType::Utf8, false),
        Field::new("total_trips", DataType::Float64, false),
    ];
    fields.extend(
        column_names
            .iter()
            .map(|name| Field::new(name, DataType::Float64, false)),
    );
    Schema::new(fields)
}

impl ResultWriter for SummaryWriter {
    fn schema(&self) -> Schema {
        summary_schema(&self.column_names)
    }

    fn write_to_file(&mut self) -> Result<(), Box<dyn Error>> {
        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(std::mem::take(&mut self.tract))),
            Arc::new(Float64Array::from(std::mem::take(&mut self.total_trips))),
        ];
        for share in self.shares.iter_mut() {
            columns.push(Arc::new(Float64Array::from(std::mem::take(share))));
        }
        let record_batch = RecordBatch::try_new(Arc::new(self.schema()), columns)?;
        self.to_output.write(&record_batch)
    }

    fn close_file(self) -> Result<(), Box<dyn Error>> {
        self.to_output.close()
    }
}
