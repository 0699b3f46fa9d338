use std::error::Error;
use std::fmt;
use std::fmt::Display;

use hashbrown::HashMap;
use log::{info, warn};

use mobisurv_core::hour::TimeBinError;
use mobisurv_core::zone::ZoneIdError;

/// Why a single input row was dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum RowError {
    Malformed(String),
    BadCount(String),
    BadFlag(String),
    MissingName,
    Zone(ZoneIdError),
    Time(TimeBinError),
}

impl RowError {
    /// Short key used to group drop reasons in the summary.
    pub fn reason(&self) -> &'static str {
        match self {
            RowError::Malformed(_) => "malformed",
            RowError::BadCount(_) => "bad_count",
            RowError::BadFlag(_) => "bad_flag",
            RowError::MissingName => "missing_name",
            RowError::Zone(_) => "bad_zone",
            RowError::Time(_) => "bad_time",
        }
    }
}

impl Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::Malformed(e) => write!(f, "malformed row: {}", e),
            RowError::BadCount(raw) => write!(f, "invalid trip count {:?}", raw),
            RowError::BadFlag(raw) => write!(f, "invalid boolean flag {:?}", raw),
            RowError::MissingName => write!(f, "missing name"),
            RowError::Zone(e) => write!(f, "{}", e),
            RowError::Time(e) => write!(f, "{}", e),
        }
    }
}

impl Error for RowError {}

impl From<ZoneIdError> for RowError {
    fn from(e: ZoneIdError) -> Self {
        RowError::Zone(e)
    }
}

impl From<TimeBinError> for RowError {
    fn from(e: TimeBinError) -> Self {
        RowError::Time(e)
    }
}

/// Book-keeping of one input file: how many rows were read and which ones were dropped.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub source: String,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped: Vec<(usize, RowError)>,
}

impl IngestReport {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn keep(&mut self) {
        self.rows_read += 1;
        self.rows_kept += 1;
    }

    pub(crate) fn drop_row(&mut self, line: usize, error: RowError) {
        warn!("Dropping {} row {}: {}", self.source, line, error);
        self.rows_read += 1;
        self.dropped.push((line, error));
    }

    pub fn rows_dropped(&self) -> usize {
        self.dropped.len()
    }

    pub fn drop_reasons(&self) -> HashMap<&'static str, usize> {
        let mut reasons = HashMap::new();
        for (_, error) in &self.dropped {
            *reasons.entry(error.reason()).or_insert(0) += 1;
        }
        reasons
    }

    pub fn log_summary(&self) {
        info!(
            "Read {} {} rows, kept {}, dropped {}",
            self.rows_read,
            self.source,
            self.rows_kept,
            self.rows_dropped()
        );
        for (reason, count) in self.drop_reasons() {
            info!("  {}: {}", reason, count);
        }
    }
}
