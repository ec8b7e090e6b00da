//! Artifact storage.
//!
//! Rendered images are written under unique `{uuid}_{suffix}.png` names so
//! concurrent requests never collide. Old files are expired by modification
//! time.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::Utc;
use gazemap_common::error::{GazemapError, GazemapResult};
use gazemap_session_model::artifact::{Artifact, ArtifactKind};
use gazemap_session_model::manifest::ResultManifest;
use image::{ImageFormat, RgbaImage};
use uuid::Uuid;

/// Outcome of one expiry pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Regular files looked at.
    pub scanned: usize,
    /// Files deleted, in directory order.
    pub removed: Vec<PathBuf>,
}

/// Directory holding rendered artifacts and the result manifest.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open (and create if needed) the artifact directory.
    pub fn open(dir: impl Into<PathBuf>) -> GazemapResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            GazemapError::artifact(format!("cannot create {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fresh, unused path for an artifact of `kind`.
    pub fn allocate_path(&self, kind: ArtifactKind) -> PathBuf {
        self.dir
            .join(format!("{}_{}.png", Uuid::new_v4(), kind.file_suffix()))
    }

    /// Encode `image` as PNG under a new unique name.
    pub fn write(&self, kind: ArtifactKind, image: &RgbaImage) -> GazemapResult<Artifact> {
        let path = self.allocate_path(kind);
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| GazemapError::artifact(format!("cannot write {}: {e}", path.display())))?;

        tracing::debug!(kind = kind.as_str(), path = %path.display(), "Wrote artifact");

        Ok(Artifact {
            path,
            kind,
            created_at: Utc::now(),
        })
    }

    /// Replace the result manifest.
    pub fn save_manifest(&self, manifest: &ResultManifest) -> GazemapResult<PathBuf> {
        manifest.save(&self.dir)
    }

    /// Latest result manifest, or the default result set.
    pub fn load_manifest(&self) -> ResultManifest {
        ResultManifest::load_or_default(&self.dir)
    }

    /// Delete regular files last modified more than `max_age` ago.
    ///
    /// Subdirectories are left alone. Files that vanish while the sweep runs
    /// are skipped.
    pub fn sweep_expired(&self, max_age: Duration) -> GazemapResult<SweepReport> {
        let now = SystemTime::now();
        let mut report = SweepReport::default();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "File vanished during sweep");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }
            report.scanned += 1;

            let age = now
                .duration_since(metadata.modified()?)
                .unwrap_or_default();
            if age <= max_age {
                continue;
            }

            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), age_secs = age.as_secs(), "Expired artifact");
                    report.removed.push(path);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "File vanished during sweep");
                }
                Err(e) => return Err(e.into()),
            }
        }

        if !report.removed.is_empty() {
            tracing::info!(
                removed = report.removed.len(),
                scanned = report.scanned,
                dir = %self.dir.display(),
                "Swept expired artifacts"
            );
        }
        Ok(report)
    }
}
