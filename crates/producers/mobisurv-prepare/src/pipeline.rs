use std::error::Error;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use mobisurv_core::direction::Direction;
use mobisurv_core::poi::PoiNameTable;
use mobisurv_core::trip::TripRecord;
use mobisurv_core::zone::analyze_zone_ids;
use mobisurv_input::pois::{PoiReader, PoiRecord};
use mobisurv_input::trips::TripReader;
use mobisurv_input::zones::{ZoneReader, ZoneTable};
use mobisurv_models::cities::{build_city_mapping, resolve_trips, unresolved_names};
use mobisurv_models::city_patterns::city_patterns;
use mobisurv_models::select::{trips_at_tract, PoiNameIndex};
use mobisurv_models::spread::mode_spread;
use mobisurv_models::summary::{summarize_poi, PoiSummary};
use mobisurv_models::temporal::{city_average, temporal_distribution, TemporalDistribution};
use mobisurv_output::logger::initiate_logger;
use mobisurv_output::result::{OutputFiles, OutputType, ResultWriter};
use mobisurv_output::tables::city_patterns::CityPatternsWriter;
use mobisurv_output::tables::spread::ModeSpreadWriter;
use mobisurv_output::tables::summary::SummaryWriter;
use mobisurv_output::tables::temporal::TemporalWriter;
use mobisurv_output::tables::trips::TripsWriter;
use mobisurv_output::tables::trips_info::TripsInfoWriter;
use mobisurv_output::tables::validation::ValidationWriter;
use mobisurv_output::tables::zones::ZonesWriter;

use crate::config::Config;

/// What a run produced, for the closing log lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RunStats {
    pub(crate) trips: usize,
    pub(crate) resolved_endpoints: usize,
    pub(crate) summaries: usize,
    pub(crate) distributions: usize,
    pub(crate) cities: usize,
    pub(crate) files: usize,
}

pub(crate) struct SurveyPipeline {
    config: Config,
    base_path: PathBuf,
    names: PoiNameTable,
    trips: Vec<TripRecord>,
    zones: ZoneTable,
    pois: Vec<PoiRecord>,
    stats: RunStats,
}

impl SurveyPipeline {
    /// Relative paths in the configuration are taken from the directory of `config_path`.
    pub(crate) fn new(config: Config, config_path: &Path) -> Self {
        let base_path = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let names = PoiNameTable::with_aliases(&config.poi_aliases);
        Self {
            config,
            base_path,
            names,
            trips: Vec::new(),
            zones: ZoneTable::default(),
            pois: Vec::new(),
            stats: RunStats::default(),
        }
    }

    pub(crate) fn initialize(&mut self) -> Result<(), Box<dyn Error>> {
        initiate_logger(&self.base_path, &self.config.log_settings)?;
        self.load()
    }

    /// Reads every input and fills in unresolved tracts from place names.
    pub(crate) fn load(&mut self) -> Result<(), Box<dyn Error>> {
        let input = &self.config.input_settings;

        let (trips, trip_report) = TripReader::builder()
            .file_path(self.base_path.join(&input.trips_file))
            .build()
            .read()?;
        trip_report.log_summary();
        self.trips = trips;

        let (pois, poi_report) = PoiReader::builder()
            .file_path(self.base_path.join(&input.pois_file))
            .names(self.names.clone())
            .build()
            .read()?;
        poi_report.log_summary();
        self.pois = pois;

        if let Some(zones_file) = &input.zones_file {
            let (zones, zone_report) = ZoneReader::builder()
                .file_path(self.base_path.join(zones_file))
                .build()
                .read()?;
            zone_report.log_summary();
            self.zones = zones;
            self.resolve_cities();
        } else {
            warn!("No zone table configured, unresolved places stay unresolved");
        }
        self.stats.trips = self.trips.len();
        Ok(())
    }

    fn resolve_cities(&mut self) {
        let place_names = unresolved_names(&self.trips);
        let mapping = build_city_mapping(
            place_names.iter().map(String::as_str),
            &self.zones,
            &self.names,
            self.config.pipeline_settings.city_cutoff,
        );
        self.stats.resolved_endpoints = resolve_trips(&mut self.trips, &mapping);
    }

    pub(crate) fn run(&mut self) -> Result<(), Box<dyn Error>> {
        let files = self.config.output_settings.prepare(&self.base_path)?;
        info!("Writing outputs to {}", files.output_dir.display());
        self.write_inputs(&files)?;
        self.write_poi_tables(&files)?;
        self.write_temporal(&files)?;
        Ok(())
    }

    fn wants(&self, output_type: OutputType) -> bool {
        self.config.output_settings.wants(output_type)
    }

    fn finish<W: ResultWriter>(&mut self, mut writer: W) -> Result<(), Box<dyn Error>> {
        writer.write_to_file()?;
        writer.close_file()?;
        self.stats.files += 1;
        Ok(())
    }

    fn write_inputs(&mut self, files: &OutputFiles) -> Result<(), Box<dyn Error>> {
        if self.wants(OutputType::Validation) {
            let census = analyze_zone_ids([
                self.trips.iter().map(|trip| trip.from_tract.as_str()).collect::<Vec<_>>(),
                self.trips.iter().map(|trip| trip.to_tract.as_str()).collect::<Vec<_>>(),
            ]);
            info!(
                "Zone census: {} city, {} statistical, {} poi, {} unknown",
                census.city, census.statistical, census.poi, census.unknown
            );
            let mut writer = ValidationWriter::new(&files.validation())?;
            writer.add_data(&census);
            self.finish(writer)?;
        }
        if self.wants(OutputType::Zones) && !self.zones.is_empty() {
            let mut writer = ZonesWriter::new(&files.zones())?;
            writer.add_data(&self.zones);
            self.finish(writer)?;
        }
        if self.wants(OutputType::Trips) {
            let mut writer = TripsWriter::new(&files.trips())?;
            writer.add_data(&self.trips);
            self.finish(writer)?;
        }
        Ok(())
    }

    fn write_poi_tables(&mut self, files: &OutputFiles) -> Result<(), Box<dyn Error>> {
        let directions = self.config.pipeline_settings.directions.clone();
        let mut summaries = Vec::new();
        for poi in self.pois.clone() {
            for direction in directions.iter().copied() {
                if let Some(summary) = self.write_poi(files, &poi, direction)? {
                    summaries.push(summary);
                }
            }
        }
        if self.wants(OutputType::CityPatterns) {
            self.write_city_patterns(files, &summaries)?;
        }
        Ok(())
    }

    fn write_poi(
        &mut self,
        files: &OutputFiles,
        poi: &PoiRecord,
        direction: Direction,
    ) -> Result<Option<PoiSummary>, Box<dyn Error>> {
        let (summary, info) = match summarize_poi(poi, direction, &self.trips) {
            Some(result) => result,
            None => {
                info!("No {} trips for {}, skipping", direction, poi.name);
                return Ok(None);
            }
        };
        self.stats.summaries += 1;
        debug!(
            "{} {}: {} trips over {} {} tracts",
            poi.name,
            direction,
            info.total_trips,
            info.num_unique_origins,
            direction.counterpart()
        );

        if self.wants(OutputType::Summary) {
            let mut writer = SummaryWriter::new(&files.summary(&poi.name, direction), &summary)?;
            writer.add_data(&summary);
            self.finish(writer)?;
        }
        if self.wants(OutputType::TripsInfo) {
            let mut writer = TripsInfoWriter::new(&files.trips_info(&poi.name, direction))?;
            writer.add_data(&info);
            self.finish(writer)?;
        }
        if self.wants(OutputType::ModeSpread) {
            let selected = trips_at_tract(&self.trips, &poi.id, direction);
            let rows = mode_spread(&selected, &self.config.mode_groups);
            let mut writer = ModeSpreadWriter::new(&files.mode_spread(&poi.name, direction))?;
            writer.add_data(&rows);
            self.finish(writer)?;
        }
        Ok(Some(summary))
    }

    fn write_city_patterns(
        &mut self,
        files: &OutputFiles,
        summaries: &[PoiSummary],
    ) -> Result<(), Box<dyn Error>> {
        if self.zones.is_empty() {
            warn!("City patterns need the zone table, skipping");
            return Ok(());
        }
        let settings = &self.config.pipeline_settings.city_patterns;
        let unknown = self
            .names
            .invalid_names(settings.focus_pois.iter().map(String::as_str));
        if !unknown.is_empty() {
            warn!("{} focus POIs have no alias entry", unknown.len());
        }
        let patterns = city_patterns(summaries, &self.zones, settings);
        self.stats.cities = patterns.cities.len();
        let mut writer = CityPatternsWriter::new(&files.city_patterns(), &patterns)?;
        writer.add_data(&patterns);
        self.finish(writer)
    }

    fn write_temporal(&mut self, files: &OutputFiles) -> Result<(), Box<dyn Error>> {
        let results = self.temporal_results();
        self.stats.distributions = results.len();
        if self.wants(OutputType::Temporal) {
            for result in results.iter() {
                let output_file = files.temporal(&result.poi_name, result.direction);
                let writer = TemporalWriter::for_distribution(&output_file, result)?;
                self.finish(writer)?;
            }
        }
        if self.wants(OutputType::CityAverage) {
            let settings = &self.config.pipeline_settings.temporal;
            if let Some(average) = city_average(&results, settings) {
                let writer = TemporalWriter::for_city_average(&files.city_average(), &average)?;
                self.finish(writer)?;
            }
        }
        Ok(())
    }

    fn temporal_results(&self) -> Vec<TemporalDistribution> {
        let settings = &self.config.pipeline_settings.temporal;
        let index = PoiNameIndex::build(&self.trips, &self.names);
        let mut results = Vec::new();
        for poi_name in self.names.canonical_names() {
            if settings.skips(poi_name) {
                info!("Skipping temporal distribution of {}", poi_name);
                continue;
            }
            for direction in self.config.pipeline_settings.directions.iter().copied() {
                let selected = index.trips_named(&self.trips, poi_name, direction);
                if let Some(result) = temporal_distribution(
                    poi_name,
                    direction,
                    &selected,
                    &self.config.mode_groups,
                    settings,
                ) {
                    results.push(result);
                }
            }
        }
        results
    }

    pub(crate) fn complete(self) -> RunStats {
        info!(
            "Processed {} trips, resolved {} endpoints",
            self.stats.trips, self.stats.resolved_endpoints
        );
        info!(
            "Built {} summaries, {} temporal distributions and {} city patterns, wrote {} files",
            self.stats.summaries, self.stats.distributions, self.stats.cities, self.stats.files
        );
        self.stats
    }
}
