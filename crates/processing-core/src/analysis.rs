//! Per-session analysis: everything the two renderers need for one segment.

use gazemap_session_model::sample::DerivedSample;
use serde::Serialize;

use crate::cluster::{scan_path, Cluster, FixationClusterer, ScanSegment};
use crate::encoding::MarkerScale;
use crate::normalizer::fixations;
use crate::pupil::PupilField;

/// Clusters, scan path and pupil field for one session segment.
#[derive(Debug, Clone)]
pub struct SessionAnalysis {
    /// Rows in the segment, fixation or not.
    pub sample_count: usize,
    /// The fixation subset, in recorded order.
    pub fixations: Vec<DerivedSample>,
    pub clusters: Vec<Cluster>,
    pub scan_path: Vec<ScanSegment>,
    pub pupil: PupilField,
}

/// Compact, serializable view of an analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub sample_count: usize,
    pub fixation_count: usize,
    pub cluster_count: usize,
    pub scan_path_segments: usize,
    pub pupil_min: Option<f64>,
    pub pupil_max: Option<f64>,
    pub clusters: Vec<ClusterSummary>,
}

/// A cluster with its rendered marker area.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    #[serde(flatten)]
    pub cluster: Cluster,
    pub marker_size: f64,
}

impl SessionAnalysis {
    /// Analyze one segment of normalized samples.
    pub fn run(samples: &[DerivedSample], clusterer: &FixationClusterer) -> Self {
        let fixations = fixations(samples);
        let clusters = clusterer.cluster(&fixations);
        let scan_path = scan_path(&clusters);
        let pupil = PupilField::from_fixations(&fixations);

        tracing::debug!(
            samples = samples.len(),
            fixations = fixations.len(),
            clusters = clusters.len(),
            "Analyzed session segment"
        );

        Self {
            sample_count: samples.len(),
            fixations,
            clusters,
            scan_path,
            pupil,
        }
    }

    pub fn summary(&self, scale: &MarkerScale) -> AnalysisSummary {
        let dwell: Vec<usize> = self.clusters.iter().map(|c| c.dwell_count).collect();
        let sizes = scale.sizes(&dwell);
        AnalysisSummary {
            sample_count: self.sample_count,
            fixation_count: self.fixations.len(),
            cluster_count: self.clusters.len(),
            scan_path_segments: self.scan_path.len(),
            pupil_min: self.pupil.range.map(|r| r.min),
            pupil_max: self.pupil.range.map(|r| r.max),
            clusters: self
                .clusters
                .iter()
                .cloned()
                .zip(sizes)
                .map(|(cluster, marker_size)| ClusterSummary {
                    cluster,
                    marker_size,
                })
                .collect(),
        }
    }
}
