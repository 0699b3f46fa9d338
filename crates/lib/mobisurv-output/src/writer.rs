use std::error::Error;
use std::fs::File;
use std::path::Path;

use arrow::csv::Writer;
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchWriter};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

/// Table sink chosen from the file extension.
#[derive(Debug)]
pub enum DataOutput {
    Parquet(WriterParquet),
    Csv(WriterCsv),
}

impl DataOutput {
    pub fn new(file_name: &Path, schema: Schema) -> Result<Self, Box<dyn Error>> {
        if file_name.exists() {
            std::fs::remove_file(file_name)?;
        }
        match file_name.extension().and_then(|ext| ext.to_str()) {
            Some("parquet") => Ok(DataOutput::Parquet(WriterParquet::new(file_name, schema)?)),
            Some("csv") => Ok(DataOutput::Csv(WriterCsv::new(file_name)?)),
            _ => Err(format!("Invalid file extension: {}", file_name.display()).into()),
        }
    }

    pub fn write(&mut self, record_batch: &RecordBatch) -> Result<(), Box<dyn Error>> {
        match self {
            DataOutput::Parquet(to_output) => to_output.writer.write(record_batch)?,
            DataOutput::Csv(to_output) => to_output.writer.write(record_batch)?,
        }
        Ok(())
    }

    pub fn close(self) -> Result<(), Box<dyn Error>> {
        match self {
            DataOutput::Parquet(to_output) => to_output.close(),
            DataOutput::Csv(to_output) => to_output.close(),
        }
    }
}

#[derive(Debug)]
pub struct WriterParquet {
    pub writer: ArrowWriter<File>,
}

impl WriterParquet {
    fn new(file_name: &Path, schema: Schema) -> Result<Self, Box<dyn Error>> {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let output_file = File::create(file_name)?;
        let writer = ArrowWriter::try_new(output_file, SchemaRef::from(schema), Some(props))?;
        Ok(Self { writer })
    }

    pub fn close(self) -> Result<(), Box<dyn Error>> {
        self.writer.close()?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct WriterCsv {
    pub writer: Writer<File>,
}

impl WriterCsv {
    fn new(file_name: &Path) -> Result<Self, Box<dyn Error>> {
        let writer = Writer::new(File::create(file_name)?);
        Ok(Self { writer })
    }

    pub fn close(self) -> Result<(), Box<dyn Error>> {
        self.writer.close()?;
        Ok(())
    }
}
