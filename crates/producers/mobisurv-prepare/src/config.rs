use std::error::Error;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use mobisurv_core::direction::Direction;
use mobisurv_core::modes::ModeGroups;
use mobisurv_models::cities::DEFAULT_CITY_CUTOFF;
use mobisurv_models::city_patterns::CityPatternSettings;
use mobisurv_models::temporal::TemporalSettings;
use mobisurv_output::logger::LogSettings;
use mobisurv_output::result::OutputSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct InputSettings {
    pub trips_file: PathBuf,
    pub pois_file: PathBuf,
    /// Without a zone table, unresolved places stay unresolved.
    pub zones_file: Option<PathBuf>,
}

fn all_directions() -> Vec<Direction> {
    Direction::ALL.to_vec()
}

fn default_city_cutoff() -> f64 {
    DEFAULT_CITY_CUTOFF
}

#[derive(Deserialize, Debug, Clone)]
pub struct PipelineSettings {
    #[serde(default = "all_directions")]
    pub directions: Vec<Direction>,
    #[serde(default = "default_city_cutoff")]
    pub city_cutoff: f64,
    #[serde(flatten)]
    pub temporal: TemporalSettings,
    #[serde(flatten)]
    pub city_patterns: CityPatternSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            directions: all_directions(),
            city_cutoff: default_city_cutoff(),
            temporal: TemporalSettings::default(),
            city_patterns: CityPatternSettings::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub log_settings: LogSettings,
    pub input_settings: InputSettings,
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub pipeline_settings: PipelineSettings,
    #[serde(default)]
    pub mode_groups: ModeGroups,
    #[serde(default)]
    pub poi_aliases: IndexMap<String, String>,
}

pub struct ConfigReader {
    file_path: PathBuf,
}

impl ConfigReader {
    pub fn new(file_path: &Path) -> Self {
        Self {
            file_path: file_path.to_path_buf(),
        }
    }

    pub fn parse(&self) -> Result<Config, Box<dyn Error>> {
        let parsing_result = std::fs::read_to_string(&self.file_path)?;
        let config: Config = toml::from_str(&parsing_result)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use mobisurv_output::result::{OutputFormat, OutputType};

    use super::*;

    const MINIMAL: &str = r#"
        [log_settings]
        log_path = "output"
        log_level = "info"
        log_file_name = "prepare.log"
        log_overwrite = true

        [input_settings]
        trips_file = "data/trips.csv"
        pois_file = "data/pois.csv"

        [output_settings]
        output_path = "output"
        outputs = ["Summary", "Temporal"]
    "#;

    #[test]
    fn test_defaults_apply_to_minimal_config() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert!(config.input_settings.zones_file.is_none());
        assert_eq!(config.output_settings.format, OutputFormat::Csv);
        assert!(config.output_settings.wants(OutputType::Temporal));
        let pipeline = &config.pipeline_settings;
        assert_eq!(pipeline.directions, Direction::ALL.to_vec());
        assert_eq!(pipeline.city_cutoff, 80.0);
        assert_eq!(pipeline.temporal.midnight_warn, 0.05);
        assert_eq!(pipeline.city_patterns, CityPatternSettings::default());
        assert_eq!(config.mode_groups, ModeGroups::default());
        assert!(config.poi_aliases.is_empty());
    }

    #[test]
    fn test_full_config() {
        let extra = r#"
        [pipeline_settings]
        directions = ["inbound"]
        city_cutoff = 90.0
        midnight_reject = 0.3
        skip_pois = ["BIG"]
        focus_pois = ["Ben-Gurion-University", "Soroka-Medical-Center"]
        top_cities = 0

        [mode_groups]
        car = ["Car", "taxi"]
        bike = ["bike"]

        [poi_aliases]
        "Uni" = "Ben-Gurion-University"
        "#;
        let config: Config = toml::from_str(&format!("{}{}", MINIMAL, extra)).unwrap();
        let pipeline = &config.pipeline_settings;
        assert_eq!(pipeline.directions, vec![Direction::Inbound]);
        assert_eq!(pipeline.city_cutoff, 90.0);
        assert_eq!(pipeline.temporal.midnight_reject, 0.3);
        assert_eq!(pipeline.temporal.midnight_warn, 0.05);
        assert!(pipeline.temporal.skips("BIG"));
        assert_eq!(pipeline.city_patterns.focus_pois.len(), 2);
        assert_eq!(pipeline.city_patterns.top_cities, 0);
        assert_eq!(config.mode_groups.group_of("TAXI"), Some("car"));
        assert_eq!(config.mode_groups.names().collect::<Vec<_>>(), vec!["car", "bike"]);
        assert_eq!(config.poi_aliases["Uni"], "Ben-Gurion-University");
    }
}
