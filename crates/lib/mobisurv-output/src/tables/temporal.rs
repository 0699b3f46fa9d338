use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};

use mobisurv_core::hour::HOURS_PER_DAY;
use mobisurv_models::temporal::{HourlyShares, TemporalDistribution, ALL_MODES};

use crate::result::ResultWriter;
use crate::writer::DataOutput;

/// Hourly distributions, one `<mode>_dist` column per mode group.
#[derive(Debug)]
pub struct TemporalWriter {
    mode_names: Vec<String>,
    hour: Vec<u32>,
    dists: Vec<Vec<f64>>,
    to_output: DataOutput,
}

impl TemporalWriter {
    pub fn new(output_file: &Path, mode_names: Vec<String>) -> Result<Self, Box<dyn Error>> {
        let schema = temporal_schema(&mode_names);
        Ok(Self {
            to_output: DataOutput::new(output_file, schema)?,
            dists: vec![Vec::new(); mode_names.len()],
            mode_names,
            hour: Vec::new(),
        })
    }

    pub fn for_distribution(
        output_file: &Path,
        result: &TemporalDistribution,
    ) -> Result<Self, Box<dyn Error>> {
        let mode_names = result.distributions.keys().cloned().collect();
        let mut writer = Self::new(output_file, mode_names)?;
        writer.add_data(result.distributions.values());
        Ok(writer)
    }

    pub fn for_city_average(
        output_file: &Path,
        average: &HourlyShares,
    ) -> Result<Self, Box<dyn Error>> {
        let mut writer = Self::new(output_file, vec![ALL_MODES.to_string()])?;
        writer.add_data([average]);
        Ok(writer)
    }

    /// Appends one row per hour. Distributions come in the same order as the mode names.
    pub fn add_data<'a, I>(&mut self, distributions: I)
    where
        I: IntoIterator<Item = &'a HourlyShares>,
    {
        self.hour.extend(0..HOURS_PER_DAY as u32);
        for (column, shares) in self.dists.iter_mut().zip(distributions) {
            column.extend_from_slice(shares);
        }
    }
}

fn temporal_schema(mode_names: &[String]) -> Schema {
    let mut fields = vec![Field::new("hour", DataType::UInt32, false)];
    fields.extend(
        mode_names
            .iter()
            .map(|mode| Field::new(format!("{}_dist", mode), DataType::Float64, false)),
    );
    Schema::new(fields)
}

impl ResultWriter for TemporalWriter {
    fn schema(&self) -> Schema {
        temporal_schema(&self.mode_names)
    }

    fn write_to_file(&mut self) -> Result<(), Box<dyn Error>> {
        let mut columns: Vec<ArrayRef> =
            vec![Arc::new(UInt32Array::from(std::mem::take(&mut self.hour)))];
        for dist in self.dists.iter_mut() {
            columns.push(Arc::new(Float64Array::from(std::mem::take(dist))));
        }
        let record_batch = RecordBatch::try_new(Arc::new(self.schema()), columns)?;
        self.to_output.write(&record_batch)
    }

    fn close_file(self) -> Result<(), Box<dyn Error>> {
        self.to_output.close()
    }
}
