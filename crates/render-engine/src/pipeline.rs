//! Render requests: validation, per-session processing and result
//! persistence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gazemap_common::config::DEFAULT_DISTANCE_THRESHOLD;
use gazemap_common::error::{GazemapError, GazemapResult};
use gazemap_processing_core::analysis::SessionAnalysis;
use gazemap_processing_core::cluster::{ClusterConfig, FixationClusterer};
use gazemap_processing_core::encoding::MarkerScale;
use gazemap_processing_core::normalizer::Normalizer;
use gazemap_processing_core::split::{split_by_percentages, validate_percentages};
use gazemap_session_model::artifact::{Artifact, ArtifactKind};
use gazemap_session_model::manifest::{ResultManifest, SessionResult};
use gazemap_session_model::sample::{load_samples, DerivedSample};
use gazemap_session_model::session::SessionSpec;

use crate::fixation_map::render_fixation_map;
use crate::pupil_heatmap::render_pupil_heatmap;
use crate::store::ArtifactStore;

/// Background image extensions accepted by [`RenderRequest::validate`].
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// One recording to render, optionally split into sub-sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Sample CSV.
    pub csv: PathBuf,

    /// Background for every session that does not bring its own.
    pub background: Option<PathBuf>,

    /// Sub-sessions in recording order. Empty renders the whole recording
    /// as one session.
    pub sessions: Vec<SessionSpec>,

    /// Clustering link distance in canvas units.
    pub distance_threshold: f64,
}

impl RenderRequest {
    pub fn new(csv: impl Into<PathBuf>) -> Self {
        Self {
            csv: csv.into(),
            background: None,
            sessions: Vec::new(),
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
        }
    }

    pub fn with_background(mut self, background: impl Into<PathBuf>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn with_sessions(mut self, sessions: Vec<SessionSpec>) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_distance_threshold(mut self, distance_threshold: f64) -> Self {
        self.distance_threshold = distance_threshold;
        self
    }

    /// Reject anything unusable before processing starts.
    pub fn validate(&self) -> GazemapResult<()> {
        if !has_extension(&self.csv, &["csv"]) {
            return Err(GazemapError::validation(format!(
                "Please upload a CSV file, got {}",
                self.csv.display()
            )));
        }

        let metadata = std::fs::metadata(&self.csv).map_err(|_| GazemapError::FileNotFound {
            path: self.csv.clone(),
        })?;
        if !metadata.is_file() {
            return Err(GazemapError::validation(format!(
                "{} is not a file",
                self.csv.display()
            )));
        }
        if metadata.len() == 0 {
            return Err(GazemapError::validation("The CSV file is empty"));
        }

        if let Some(background) = &self.background {
            check_image_extension(background)?;
        }
        for spec in &self.sessions {
            if let Some(background) = &spec.background {
                check_image_extension(background)?;
            }
        }

        if !self.sessions.is_empty() {
            validate_percentages(&self.percentages())?;
        }

        if !self.distance_threshold.is_finite() || self.distance_threshold < 0.0 {
            return Err(GazemapError::validation(format!(
                "Distance threshold must be a non-negative number, got {}",
                self.distance_threshold
            )));
        }

        Ok(())
    }

    fn percentages(&self) -> Vec<u32> {
        self.sessions.iter().map(|s| s.percentage).collect()
    }
}

/// Both artifacts rendered for one session.
#[derive(Debug, Clone)]
struct RenderedSession {
    fixation_map: Artifact,
    pupil_heatmap: Artifact,
}

/// Turns render requests into artifacts and a result manifest.
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    store: ArtifactStore,
    retention: Duration,
    scale: MarkerScale,
}

impl RenderPipeline {
    /// `retention` is the age past which artifacts are swept after each
    /// successful request.
    pub fn new(store: ArtifactStore, retention: Duration) -> Self {
        Self {
            store,
            retention,
            scale: MarkerScale::default(),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Validate, render every session, persist the manifest, then sweep
    /// expired artifacts.
    pub fn process(&self, request: &RenderRequest) -> GazemapResult<ResultManifest> {
        request.validate()?;

        let raw = load_samples(&request.csv)?;
        let samples = Normalizer::normalize_all(&raw);
        let clusterer = FixationClusterer::new(ClusterConfig {
            distance_threshold: request.distance_threshold,
        });

        tracing::info!(
            csv = %request.csv.display(),
            samples = samples.len(),
            sessions = request.sessions.len().max(1),
            distance_threshold = request.distance_threshold,
            "Processing render request"
        );

        let manifest = if request.sessions.is_empty() {
            let rendered =
                self.render_session(1, &samples, &clusterer, request.background.as_deref())?;
            ResultManifest::Single {
                fixation_map: rendered.fixation_map.path,
                pupil_heatmap: rendered.pupil_heatmap.path,
            }
        } else {
            let segments = split_by_percentages(&samples, &request.percentages());
            if segments.len() != request.sessions.len() {
                return Err(GazemapError::processing(format!(
                    "split produced {} segments for {} sessions",
                    segments.len(),
                    request.sessions.len()
                )));
            }

            let mut sessions = Vec::with_capacity(segments.len());
            for (index, (spec, segment)) in request.sessions.iter().zip(segments).enumerate() {
                let id = index + 1;
                let background = spec
                    .background
                    .as_deref()
                    .or(request.background.as_deref());
                let rendered = self.render_session(id, segment, &clusterer, background)?;
                sessions.push(SessionResult {
                    id,
                    percentage: spec.percentage,
                    sample_count: segment.len(),
                    fixation_map_path: rendered.fixation_map.path,
                    pupil_heatmap_path: rendered.pupil_heatmap.path,
                });
            }
            ResultManifest::Multi { sessions }
        };

        let manifest_path = self.store.save_manifest(&manifest)?;
        tracing::info!(manifest = %manifest_path.display(), "Saved result manifest");

        if let Err(e) = self.store.sweep_expired(self.retention) {
            tracing::warn!(error = %e, "Artifact sweep failed");
        }

        Ok(manifest)
    }

    fn render_session(
        &self,
        id: usize,
        samples: &[DerivedSample],
        clusterer: &FixationClusterer,
        background: Option<&Path>,
    ) -> GazemapResult<RenderedSession> {
        let analysis = SessionAnalysis::run(samples, clusterer);

        let fixation_map = self.store.write(
            ArtifactKind::FixationMap,
            &render_fixation_map(&analysis.clusters, &self.scale, background),
        )?;
        let pupil_heatmap = self.store.write(
            ArtifactKind::PupilHeatmap,
            &render_pupil_heatmap(&analysis.pupil, background),
        )?;

        tracing::info!(
            session = id,
            samples = analysis.sample_count,
            fixations = analysis.fixations.len(),
            clusters = analysis.clusters.len(),
            "Rendered session"
        );

        Ok(RenderedSession {
            fixation_map,
            pupil_heatmap,
        })
    }
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| ext.eq_ignore_ascii_case(a)))
}

fn check_image_extension(path: &Path) -> GazemapResult<()> {
    if has_extension(path, &ALLOWED_IMAGE_EXTENSIONS) {
        Ok(())
    } else {
        Err(GazemapError::validation(format!(
            "Background image must be one of {}, got {}",
            ALLOWED_IMAGE_EXTENSIONS.join(", "),
            path.display()
        )))
    }
}
