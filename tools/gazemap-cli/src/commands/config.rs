//! Show or initialize the configuration file.

use gazemap_common::config::{config_file_path, AppConfig};
use gazemap_common::error::GazemapError;

pub fn run(config: &AppConfig, init: bool) -> anyhow::Result<()> {
    let path = config_file_path();

    if init {
        config.save().map_err(|e| {
            GazemapError::config(format!("cannot write {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "Wrote configuration");
    }

    println!("Config file: {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
