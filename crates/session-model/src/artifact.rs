//! Rendered artifact descriptors.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which visualization an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    FixationMap,
    PupilHeatmap,
}

impl ArtifactKind {
    /// Suffix appended to the unique file stem.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::FixationMap => "fixation_map",
            Self::PupilHeatmap => "pupil_size_heatmap",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FixationMap => "fixation_map",
            Self::PupilHeatmap => "pupil_heatmap",
        }
    }
}

/// A rendered image owned by the artifact store until it expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Location of the image file.
    pub path: PathBuf,

    /// Kind tag.
    pub kind: ArtifactKind,

    /// When the artifact was written.
    pub created_at: DateTime<Utc>,
}
