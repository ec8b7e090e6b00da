//! Delete expired artifacts.

use std::path::PathBuf;
use std::time::Duration;

use gazemap_common::config::AppConfig;
use gazemap_render_engine::ArtifactStore;

pub fn run(config: &AppConfig, out: Option<PathBuf>, max_age_secs: Option<u64>) -> anyhow::Result<()> {
    let store = ArtifactStore::open(out.unwrap_or_else(|| config.artifacts_dir.clone()))?;
    let max_age = Duration::from_secs(max_age_secs.unwrap_or(config.render.retention_secs));

    let report = store.sweep_expired(max_age)?;
    println!(
        "Removed {} of {} file(s) in {}",
        report.removed.len(),
        report.scanned,
        store.dir().display()
    );
    for path in &report.removed {
        println!("  - {}", path.display());
    }
    Ok(())
}
