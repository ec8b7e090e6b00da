//! Gazemap Processing Core
//!
//! Turns raw gaze samples into the quantities the renderers draw:
//! - **Normalization:** Coerce raw CSV cells and rotate into canvas space
//! - **Splitting:** Partition a recording into percentage-weighted sessions
//! - **Clustering:** Merge nearby fixations into discrete looks (single-link)
//! - **Encoding:** Dwell-to-marker-size, sequence position, pupil range
//!
//! Pure computation: no I/O and no drawing.
//! All inputs are data; all outputs are data.

pub mod analysis;
pub mod cluster;
pub mod encoding;
pub mod normalizer;
pub mod pupil;
pub mod split;

pub use analysis::SessionAnalysis;
pub use cluster::{Cluster, ClusterConfig, FixationClusterer};
pub use normalizer::Normalizer;
