//! Render a sample CSV into artifacts.

use std::path::PathBuf;
use std::time::Duration;

use gazemap_common::config::AppConfig;
use gazemap_render_engine::{ArtifactStore, RenderPipeline, RenderRequest};
use gazemap_session_model::session::SessionSpec;

use super::results::print_manifest;

pub struct RenderArgs {
    pub csv: PathBuf,
    pub background: Option<PathBuf>,
    pub sessions: Vec<SessionSpec>,
    pub distance_threshold: Option<f64>,
    pub out: Option<PathBuf>,
    pub retention_secs: Option<u64>,
}

pub fn run(config: &AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    let mut request = RenderRequest::new(args.csv)
        .with_sessions(args.sessions)
        .with_distance_threshold(
            args.distance_threshold
                .unwrap_or(config.render.distance_threshold),
        );
    if let Some(background) = args.background {
        request = request.with_background(background);
    }

    let out = args.out.unwrap_or_else(|| config.artifacts_dir.clone());
    let retention = Duration::from_secs(args.retention_secs.unwrap_or(config.render.retention_secs));

    let pipeline = RenderPipeline::new(ArtifactStore::open(out)?, retention);
    let manifest = pipeline.process(&request)?;

    println!("Rendered into {}", pipeline.store().dir().display());
    print_manifest(&manifest);
    Ok(())
}
