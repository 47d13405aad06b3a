use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings {
    /// JSON document holding the encounter collection.
    pub input: PathBuf,
    /// CSV file the flattened rows are written to.
    pub output: PathBuf,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("input", "samples.json")?
            .set_default("output", "samples.csv")?
            .add_source(File::with_name("config/encounter-exporter").required(false))
            .add_source(Environment::with_prefix("ENCOUNTER_EXPORTER"))
            .build()?
            .try_deserialize()
    }
}
