use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display};
use std::str::FromStr;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

pub const CITY_PREFIX: char = 'C';
pub const CITY_DIGITS: usize = 7;
pub const STAT_DIGITS: usize = 8;
pub const POI_PREFIX: &str = "000000";
pub const UNRESOLVED_ZONE: &str = "00000000";

/// The scheme a zone identifier belongs to.
///
/// Survey rows reference three kinds of zones: whole cities (`C#######`), census statistical
/// areas (`########`) and the survey's own points of interest (`000000##`). Anything that
/// fits none of these patterns is reported as unknown.
#[derive(
    Deserialize, Serialize, Debug, Hash, Copy, Default, Clone, PartialEq, Eq, PartialOrd, Ord,
)]
pub enum ZoneKind {
    City,
    Statistical,
    Poi,
    #[default]
    Unknown,
}

impl Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneKind::City => write!(f, "city"),
            ZoneKind::Statistical => write!(f, "statistical"),
            ZoneKind::Poi => write!(f, "poi"),
            ZoneKind::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for ZoneKind {
    type Err = ZoneIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "city" => Ok(ZoneKind::City),
            "statistical" => Ok(ZoneKind::Statistical),
            "poi" => Ok(ZoneKind::Poi),
            "unknown" => Ok(ZoneKind::Unknown),
            _ => Err(ZoneIdError::UnknownScheme(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneIdError {
    TooManyCityDigits(String),
    TooManyDigits(String),
    UnknownScheme(String),
}

impl Display for ZoneIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneIdError::TooManyCityDigits(raw) => {
                write!(f, "city zone id {} has more than {} digits", raw, CITY_DIGITS)
            }
            ZoneIdError::TooManyDigits(raw) => {
                write!(f, "zone id {} has more than {} digits", raw, STAT_DIGITS)
            }
            ZoneIdError::UnknownScheme(scheme) => write!(f, "unknown zone scheme {}", scheme),
        }
    }
}

impl Error for ZoneIdError {}

/// A zone identifier in canonical form. Only [`standardize_zone_id`] and [`ZoneId::city`]
/// construct one, so the inner string is always one of the canonical shapes.
#[derive(Deserialize, Serialize, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ZoneId(String);

impl Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified())
    }
}

impl FromStr for ZoneId {
    type Err = ZoneIdError;

    /// Accepts both the bare form and the `kind:id` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((scheme, raw)) => {
                scheme.parse::<ZoneKind>()?;
                standardize_zone_id(raw)
            }
            None => standardize_zone_id(s),
        }
    }
}

impl TryFrom<String> for ZoneId {
    type Error = ZoneIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ZoneId> for String {
    fn from(value: ZoneId) -> Self {
        value.0
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::unresolved()
    }
}

impl ZoneId {
    /// Builds the city zone for a numeric settlement code.
    pub fn city(code: u32) -> Self {
        Self(format!("{}{:0width$}", CITY_PREFIX, code, width = CITY_DIGITS))
    }

    pub fn unresolved() -> Self {
        Self(UNRESOLVED_ZONE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> ZoneKind {
        zone_kind(&self.0)
    }

    /// True for the all-zero placeholder carried by rows without a tract.
    pub fn is_unresolved(&self) -> bool {
        self.0 == UNRESOLVED_ZONE
    }

    pub fn qualified(&self) -> String {
        format!("{}:{}", self.kind(), self.0)
    }
}

/// Normalizes a raw zone identifier from any of the survey files.
///
/// Identifiers arrive as integers, floats (`12345678.0`, `1.2345678e7`), strings with stray
/// punctuation or lower-case city prefixes. Missing values map to the unresolved zone.
pub fn standardize_zone_id(raw: &str) -> Result<ZoneId, ZoneIdError> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return Ok(ZoneId::unresolved());
    }

    let expanded = expand_exponent(trimmed);
    let zone_str = expanded
        .split('.')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    let digits: String = zone_str.chars().filter(|c| c.is_ascii_digit()).collect();

    if zone_str.to_uppercase().starts_with(CITY_PREFIX) {
        if digits.len() > CITY_DIGITS {
            return Err(ZoneIdError::TooManyCityDigits(raw.to_string()));
        }
        return Ok(ZoneId(format!(
            "{}{:0>width$}",
            CITY_PREFIX,
            digits,
            width = CITY_DIGITS
        )));
    }

    if digits.len() <= 2 && zone_str.starts_with('0') {
        return Ok(ZoneId(format!("{}{:0>2}", POI_PREFIX, digits)));
    }

    if digits.len() <= STAT_DIGITS {
        return Ok(ZoneId(format!("{:0>width$}", digits, width = STAT_DIGITS)));
    }

    Err(ZoneIdError::TooManyDigits(raw.to_string()))
}

fn is_missing(value: &str) -> bool {
    value.is_empty()
        || matches!(value.to_lowercase().as_str(), "nan" | "none" | "null" | "na")
}

fn expand_exponent(value: &str) -> String {
    if !value.contains(['e', 'E']) {
        return value.to_string();
    }
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() && number >= 0.0 => {
            format!("{}", number.trunc() as u64)
        }
        _ => value.to_string(),
    }
}

/// Classifies an identifier without normalizing it first.
pub fn zone_kind(zone_id: &str) -> ZoneKind {
    if zone_id.starts_with(CITY_PREFIX) {
        ZoneKind::City
    } else if is_poi_pattern(zone_id) {
        ZoneKind::Poi
    } else if zone_id.len() == STAT_DIGITS && all_digits(zone_id) {
        ZoneKind::Statistical
    } else {
        ZoneKind::Unknown
    }
}

/// Checks an identifier against the canonical patterns.
pub fn is_valid_zone_id(zone_id: &str) -> bool {
    let zone_str = zone_id.trim();
    if zone_str.is_empty() {
        return false;
    }
    if let Some(rest) = zone_str.strip_prefix(CITY_PREFIX) {
        return rest.len() == CITY_DIGITS && all_digits(rest);
    }
    zone_str.len() == STAT_DIGITS && all_digits(zone_str)
}

fn is_poi_pattern(zone_id: &str) -> bool {
    match zone_id.strip_prefix(POI_PREFIX) {
        Some(rest) => rest.len() == 2 && all_digits(rest),
        None => false,
    }
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Distribution of zone kinds over a set of identifier columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneCensus {
    pub city: usize,
    pub statistical: usize,
    pub poi: usize,
    pub unknown: usize,
    pub invalid: Vec<String>,
}

impl ZoneCensus {
    pub fn total(&self) -> usize {
        self.city + self.statistical + self.poi + self.unknown
    }

    fn record(&mut self, zone_id: &str) {
        match zone_kind(zone_id) {
            ZoneKind::City => self.city += 1,
            ZoneKind::Statistical => self.statistical += 1,
            ZoneKind::Poi => self.poi += 1,
            ZoneKind::Unknown => {
                self.unknown += 1;
                self.invalid.push(zone_id.to_string());
            }
        }
    }
}

/// Counts the unique identifiers of every column by kind. Columns are counted
/// independently, so an identifier present in two columns is counted twice.
pub fn analyze_zone_ids<'a, C, I>(columns: C) -> ZoneCensus
where
    C: IntoIterator<Item = I>,
    I: IntoIterator<Item = &'a str>,
{
    let mut census = ZoneCensus::default();
    for column in columns {
        let mut seen: HashSet<&str> = HashSet::new();
        for zone_id in column {
            if seen.insert(zone_id) {
                census.record(zone_id);
            }
        }
    }
    census
}

#[cfg(test)]
mod tests {
    use super::*;

    fn std_id(raw: &str) -> String {
        standardize_zone_id(raw).unwrap().to_string()
    }

    #[test]
    fn test_city_ids_are_padded() {
        assert_eq!(std_id("C1234"), "C0001234");
        assert_eq!(std_id("c0001234"), "C0001234");
        assert_eq!(std_id("C9000.0"), "C0009000");
        assert_eq!(ZoneId::city(9000).as_str(), "C0009000");
    }

    #[test]
    fn test_city_with_too_many_digits() {
        assert!(matches!(
            standardize_zone_id("C123456789"),
            Err(ZoneIdError::TooManyCityDigits(_))
        ));
    }

    #[test]
    fn test_poi_ids() {
        assert_eq!(std_id("05"), "00000005");
        assert_eq!(std_id("0"), "00000000");
        assert_eq!(std_id("012"), "00000012");
        assert_eq!(zone_kind("00000012"), ZoneKind::Poi);
    }

    #[test]
    fn test_statistical_ids() {
        assert_eq!(std_id("62000015"), "62000015");
        assert_eq!(std_id("62000015.0"), "62000015");
        assert_eq!(std_id("1.2345678e7"), "12345678");
        assert_eq!(std_id("9000011"), "09000011");
        assert_eq!(zone_kind("62000015"), ZoneKind::Statistical);
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(std_id(""), UNRESOLVED_ZONE);
        assert_eq!(std_id("nan"), UNRESOLVED_ZONE);
        assert_eq!(std_id("  NaN "), UNRESOLVED_ZONE);
        assert!(standardize_zone_id("None").unwrap().is_unresolved());
        assert!(standardize_zone_id("NULL").unwrap().is_unresolved());
        assert!(standardize_zone_id("NA").unwrap().is_unresolved());
    }

    #[test]
    fn test_too_long() {
        assert!(matches!(
            standardize_zone_id("123456789"),
            Err(ZoneIdError::TooManyDigits(_))
        ));
    }

    #[test]
    fn test_validity() {
        assert!(is_valid_zone_id("C0001234"));
        assert!(!is_valid_zone_id("C123"));
        assert!(is_valid_zone_id("00000003"));
        assert!(is_valid_zone_id("62000015"));
        assert!(!is_valid_zone_id("6200001"));
        assert!(!is_valid_zone_id(""));
        assert!(!is_valid_zone_id("abcdefgh"));
    }

    #[test]
    fn test_city_prefix_wins_over_validity() {
        assert_eq!(zone_kind("C12"), ZoneKind::City);
        assert_eq!(zone_kind("1234"), ZoneKind::Unknown);
    }

    #[test]
    fn test_qualified_round_trip() {
        let zone = ZoneId::city(70);
        assert_eq!(zone.qualified(), "city:C0000070");
        let parsed: ZoneId = "city:C0000070".parse().unwrap();
        assert_eq!(parsed, zone);
        let poi: ZoneId = "poi:3".parse().unwrap();
        assert_eq!(poi.qualified(), "poi:00000003");
        assert!("district:1".parse::<ZoneId>().is_err());
    }

    #[test]
    fn test_census_counts_unique_per_column() {
        let from = vec!["C0001234", "C0001234", "62000015", "00000003"];
        let to = vec!["C0001234", "bad"];
        let census = analyze_zone_ids(vec![from, to]);
        assert_eq!(census.city, 2);
        assert_eq!(census.statistical, 1);
        assert_eq!(census.poi, 1);
        assert_eq!(census.unknown, 1);
        assert_eq!(census.invalid, vec!["bad".to_string()]);
        assert_eq!(census.total(), 5);
    }
}
