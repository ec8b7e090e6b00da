//! Result manifest: the record of which artifacts the latest request produced.
//!
//! The manifest lives next to the artifacts as `latest_results.json`. A
//! missing or unreadable manifest is not an error for readers; they get the
//! default result set instead.

use std::path::{Path, PathBuf};

use gazemap_common::error::GazemapResult;
use serde::{Deserialize, Serialize};

/// File name of the manifest inside the artifact directory.
pub const MANIFEST_FILE_NAME: &str = "latest_results.json";

/// Artifacts produced by the most recent render request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultManifest {
    /// The whole recording rendered as one implicit session.
    Single {
        fixation_map: PathBuf,
        pupil_heatmap: PathBuf,
    },

    /// One entry per requested sub-session, in request order.
    Multi { sessions: Vec<SessionResult> },
}

/// Artifacts for one sub-session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    /// 1-based session number.
    pub id: usize,
    pub percentage: u32,
    /// Rows of the recording that fell into this session.
    pub sample_count: usize,
    pub fixation_map_path: PathBuf,
    pub pupil_heatmap_path: PathBuf,
}

impl ResultManifest {
    /// Result set reported when no manifest has been written yet.
    pub fn default_for(dir: &Path) -> Self {
        Self::Single {
            fixation_map: dir.join("fixation_map.png"),
            pupil_heatmap: dir.join("pupil_size_heatmap.png"),
        }
    }

    /// Path of the manifest file inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE_NAME)
    }

    /// Load the manifest from `dir`.
    pub fn load(dir: &Path) -> GazemapResult<Self> {
        let content = std::fs::read_to_string(Self::path_in(dir))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load the manifest from `dir`, falling back to [`Self::default_for`].
    pub fn load_or_default(dir: &Path) -> Self {
        match Self::load(dir) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "No usable result manifest");
                Self::default_for(dir)
            }
        }
    }

    /// Write the manifest into `dir`, replacing any previous one.
    pub fn save(&self, dir: &Path) -> GazemapResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = Self::path_in(dir);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Every artifact path the manifest references, in display order.
    pub fn artifact_paths(&self) -> Vec<&Path> {
        match self {
            Self::Single {
                fixation_map,
                pupil_heatmap,
            } => vec![fixation_map.as_path(), pupil_heatmap.as_path()],
            Self::Multi { sessions } => sessions
                .iter()
                .flat_map(|s| [s.fixation_map_path.as_path(), s.pupil_heatmap_path.as_path()])
                .collect(),
        }
    }
}
