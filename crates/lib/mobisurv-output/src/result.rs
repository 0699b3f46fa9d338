use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use arrow::datatypes::Schema;
use log::debug;
use serde::Deserialize;

use mobisurv_core::direction::Direction;
use mobisurv_core::poi::file_stem;

#[derive(Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputType {
    Summary,
    TripsInfo,
    Temporal,
    CityAverage,
    CityPatterns,
    ModeSpread,
    Zones,
    Trips,
    Validation,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Parquet => write!(f, "parquet"),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct OutputSettings {
    pub output_path: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
    pub outputs: Vec<OutputType>,
}

impl OutputSettings {
    pub fn wants(&self, output_type: OutputType) -> bool {
        self.outputs.contains(&output_type)
    }

    /// Creates the output directory, resolving a relative path against `base_path`.
    pub fn prepare(&self, base_path: &Path) -> Result<OutputFiles, Box<dyn Error>> {
        let output_dir = base_path.join(&self.output_path);
        if !output_dir.exists() {
            debug!("Creating output directory {}", output_dir.display());
            fs::create_dir_all(&output_dir)?;
        }
        Ok(OutputFiles {
            output_dir,
            format: self.format,
        })
    }
}

/// Names of every file written for a run.
#[derive(Debug, Clone)]
pub struct OutputFiles {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
}

impl OutputFiles {
    fn file(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", name, self.format))
    }

    pub fn summary(&self, poi_name: &str, direction: Direction) -> PathBuf {
        self.file(&format!("{}_{}_trips", file_stem(poi_name), direction))
    }

    pub fn trips_info(&self, poi_name: &str, direction: Direction) -> PathBuf {
        self.file(&format!("{}_{}_trips_info", file_stem(poi_name), direction))
    }

    pub fn temporal(&self, poi_name: &str, direction: Direction) -> PathBuf {
        let stem = file_stem(poi_name).to_lowercase();
        self.file(&format!("{}_{}_temporal", stem, direction))
    }

    pub fn city_average(&self) -> PathBuf {
        self.file("city_average_temporal")
    }

    pub fn city_patterns(&self) -> PathBuf {
        self.file("city_patterns")
    }

    pub fn mode_spread(&self, poi_name: &str, direction: Direction) -> PathBuf {
        self.file(&format!("{}_{}_mode_spread", file_stem(poi_name), direction))
    }

    pub fn zones(&self) -> PathBuf {
        self.file("zones")
    }

    pub fn trips(&self) -> PathBuf {
        self.file("trips_standardized")
    }

    pub fn validation(&self) -> PathBuf {
        self.file("zone_validation")
    }
}

/// A table collected in memory and written out as one record batch.
pub trait ResultWriter {
    fn schema(&self) -> Schema;
    fn write_to_file(&mut self) -> Result<(), Box<dyn Error>>;
    fn close_file(self) -> Result<(), Box<dyn Error>>;
}
