use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use crate::config::{Config, ConfigReader};
use crate::pipeline::SurveyPipeline;

mod config;
mod pipeline;

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
struct CliArgs {
    #[arg(short = 'c', long, value_name = "Survey Configuration File")]
    config: String,
}

fn main() -> ExitCode {
    let config_file: String = CliArgs::parse().config;
    let start = std::time::Instant::now();
    let file_path = PathBuf::from(config_file);
    match prepare(file_path) {
        Ok(_) => {
            let elapsed = start.elapsed();
            info!("Survey preparation finished in {} ms.", elapsed.as_millis());
            println!("Survey preparation finished in {} ms.", elapsed.as_millis());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Survey preparation failed: {}", e);
            eprintln!("Survey preparation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn prepare(file_path: PathBuf) -> Result<(), Box<dyn Error>> {
    let config: Config = ConfigReader::new(&file_path).parse()?;
    let mut pipeline = SurveyPipeline::new(config, &file_path);
    pipeline.initialize()?;
    pipeline.run()?;
    pipeline.complete();
    Ok(())
}
