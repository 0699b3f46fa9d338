use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

pub const HOURS_PER_DAY: usize = 24;

/// One-hour bucket of the survey day, `0..=23`. Only built through `parse_time_bin` and
/// `TryFrom<u32>`, both of which check the range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourBin(u8);

impl Display for HourBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl TryFrom<u32> for HourBin {
    type Error = TimeBinError;

    fn try_from(hour: u32) -> Result<Self, Self::Error> {
        if hour as usize >= HOURS_PER_DAY {
            return Err(TimeBinError::OutOfRange(hour.to_string()));
        }
        Ok(Self(hour as u8))
    }
}

impl FromStr for HourBin {
    type Err = TimeBinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time_bin(s)
    }
}

impl HourBin {
    pub fn all() -> impl Iterator<Item = HourBin> {
        (0..HOURS_PER_DAY as u8).map(HourBin)
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    pub fn as_u32(&self) -> u32 {
        self.0 as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeBinError {
    Unparseable(String),
    OutOfRange(String),
}

impl Display for TimeBinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBinError::Unparseable(raw) => write!(f, "cannot read time bin {:?}", raw),
            TimeBinError::OutOfRange(raw) => write!(f, "time bin {:?} is outside the day", raw),
        }
    }
}

impl Error for TimeBinError {}

/// Reads a survey time bin. Exports carry either clock times (`08:00:00`, `08:00`) or the
/// spreadsheet representation as a fraction of a day (`0.333`).
pub fn parse_time_bin(raw: &str) -> Result<HourBin, TimeBinError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(TimeBinError::Unparseable(raw.to_string()));
    }

    for format in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(value, format) {
            return HourBin::try_from(time.hour());
        }
    }

    let fraction = value
        .parse::<f64>()
        .map_err(|_| TimeBinError::Unparseable(raw.to_string()))?;
    if !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
        return Err(TimeBinError::OutOfRange(raw.to_string()));
    }
    let hours = fraction * HOURS_PER_DAY as f64;
    HourBin::try_from(hours.floor() as u32)
}
