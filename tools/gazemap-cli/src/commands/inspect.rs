//! Print the analysis of a sample CSV without rendering.

use std::path::PathBuf;

use gazemap_common::config::AppConfig;
use gazemap_common::error::GazemapError;
use gazemap_processing_core::encoding::MarkerScale;
use gazemap_processing_core::{ClusterConfig, FixationClusterer, Normalizer, SessionAnalysis};
use gazemap_session_model::sample::load_samples;

pub fn run(
    config: &AppConfig,
    csv: PathBuf,
    distance_threshold: Option<f64>,
) -> anyhow::Result<()> {
    let distance_threshold = distance_threshold.unwrap_or(config.render.distance_threshold);
    if !distance_threshold.is_finite() || distance_threshold < 0.0 {
        return Err(GazemapError::validation(format!(
            "Distance threshold must be a non-negative number, got {distance_threshold}"
        ))
        .into());
    }

    let samples = Normalizer::normalize_all(&load_samples(&csv)?);
    let clusterer = FixationClusterer::new(ClusterConfig { distance_threshold });
    let summary = SessionAnalysis::run(&samples, &clusterer).summary(&MarkerScale::default());

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
