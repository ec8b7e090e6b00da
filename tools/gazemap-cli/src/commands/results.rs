//! Show the latest result manifest.

use std::path::PathBuf;

use gazemap_common::config::AppConfig;
use gazemap_session_model::manifest::ResultManifest;

pub fn run(config: &AppConfig, out: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = out.unwrap_or_else(|| config.artifacts_dir.clone());
    let manifest = ResultManifest::load_or_default(&dir);
    print_manifest(&manifest);
    Ok(())
}

pub fn print_manifest(manifest: &ResultManifest) {
    match manifest {
        ResultManifest::Single {
            fixation_map,
            pupil_heatmap,
        } => {
            println!("Fixation map:  {}", fixation_map.display());
            println!("Pupil heatmap: {}", pupil_heatmap.display());
        }
        ResultManifest::Multi { sessions } => {
            for session in sessions {
                println!(
                    "Session {} ({}%, {} samples)",
                    session.id, session.percentage, session.sample_count
                );
                println!("  Fixation map:  {}", session.fixation_map_path.display());
                println!("  Pupil heatmap: {}", session.pupil_heatmap_path.display());
            }
        }
    }

    let missing = manifest
        .artifact_paths()
        .into_iter()
        .filter(|p| !p.exists())
        .count();
    if missing > 0 {
        println!("\n{missing} artifact(s) no longer on disk.");
    }
}
