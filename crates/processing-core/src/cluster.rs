//! Fixation clustering: merging nearby fixations into discrete "looks".
//!
//! # Algorithm
//!
//! Single-link agglomeration with a distance cutoff, which is exactly what a
//! density clusterer produces with a minimum cluster size of one: every point
//! belongs to some cluster and nothing is discarded as noise.
//!
//! 1. **Bucket** points into a uniform grid whose cell edge is at least the
//!    threshold, so any linked pair sits in the same or an adjacent cell.
//! 2. **Link** every candidate pair within the threshold (`<=`) using
//!    union-find; transitivity gives the closure for free.
//! 3. **Emit** one [`Cluster`] per component, ordered by the component's
//!    first-appearing member. Spatial order is irrelevant; this is the
//!    order the scan path is drawn in.

use std::collections::HashMap;

use gazemap_common::config::DEFAULT_DISTANCE_THRESHOLD;
use gazemap_session_model::sample::DerivedSample;
use serde::{Deserialize, Serialize};

/// Configuration for the fixation clusterer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterConfig {
    /// Maximum canvas-space distance at which two fixations are linked.
    /// Negative or NaN values behave as `0.0`.
    pub distance_threshold: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
        }
    }
}

/// One discrete look: a connected group of fixation samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Position among clusters in order of first appearance.
    pub sequence_index: usize,
    /// Mean canvas `x` of the members.
    pub centroid_x: f64,
    /// Mean canvas `y` of the members.
    pub centroid_y: f64,
    /// Number of samples merged into this cluster.
    pub dwell_count: usize,
    /// Index (within the clustered input) of the first member.
    pub first_sample: usize,
}

impl Cluster {
    pub fn centroid(&self) -> (f64, f64) {
        (self.centroid_x, self.centroid_y)
    }
}

/// A straight scan-path segment between consecutive clusters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanSegment {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Scan path through `clusters` in emission order. Fewer than two clusters
/// yield no segments.
pub fn scan_path(clusters: &[Cluster]) -> Vec<ScanSegment> {
    clusters
        .windows(2)
        .map(|pair| ScanSegment {
            from: pair[0].centroid(),
            to: pair[1].centroid(),
        })
        .collect()
}

/// The fixation clusterer.
pub struct FixationClusterer {
    config: ClusterConfig,
}

impl FixationClusterer {
    /// Create a new clusterer with the given configuration.
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Create a clusterer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ClusterConfig::default())
    }

    /// Effective threshold after clamping.
    pub fn threshold(&self) -> f64 {
        let t = self.config.distance_threshold;
        if t.is_nan() {
            0.0
        } else {
            t.max(0.0)
        }
    }

    /// Cluster fixation samples. Callers pass the fixation subset; the
    /// `fixation` flag itself is not re-checked.
    pub fn cluster(&self, fixations: &[DerivedSample]) -> Vec<Cluster> {
        let points: Vec<(f64, f64)> = fixations.iter().map(DerivedSample::position).collect();
        self.cluster_points(&points)
    }

    /// Cluster raw canvas points.
    pub fn cluster_points(&self, points: &[(f64, f64)]) -> Vec<Cluster> {
        if points.is_empty() {
            return Vec::new();
        }

        let threshold = self.threshold();
        let mut dsu = Dsu::new(points.len());
        link_within_threshold(points, threshold, &mut dsu);

        // Walk points in input order so clusters come out by first member.
        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut sums: Vec<(f64, f64, usize, usize)> = Vec::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            let root = dsu.find(i);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                sums.push((0.0, 0.0, 0, i));
                sums.len() - 1
            });
            let entry = &mut sums[slot];
            entry.0 += x;
            entry.1 += y;
            entry.2 += 1;
        }

        let clusters: Vec<Cluster> = sums
            .into_iter()
            .enumerate()
            .map(|(sequence_index, (sx, sy, count, first_sample))| Cluster {
                sequence_index,
                centroid_x: sx / count as f64,
                centroid_y: sy / count as f64,
                dwell_count: count,
                first_sample,
            })
            .collect();

        tracing::debug!(
            points = points.len(),
            clusters = clusters.len(),
            threshold,
            "Clustered fixations"
        );
        clusters
    }
}

/// Union every pair of points within `threshold`, using a grid to limit
/// candidates to neighbouring cells.
fn link_within_threshold(points: &[(f64, f64)], threshold: f64, dsu: &mut Dsu) {
    let cell_size = threshold.max(1.0);
    let threshold_sq = threshold * threshold;
    let cell_of = |(x, y): (f64, f64)| -> (i64, i64) {
        ((x / cell_size).floor() as i64, (y / cell_size).floor() as i64)
    };

    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, &p) in points.iter().enumerate() {
        grid.entry(cell_of(p)).or_default().push(i);
    }

    for (i, &(x, y)) in points.iter().enumerate() {
        let (cx, cy) = cell_of((x, y));
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                let key = (cx.saturating_add(dx), cy.saturating_add(dy));
                let Some(members) = grid.get(&key) else {
                    continue;
                };
                for &j in members {
                    if j <= i {
                        continue;
                    }
                    let (ox, oy) = points[j];
                    let d2 = (x - ox).powi(2) + (y - oy).powi(2);
                    if d2 <= threshold_sq {
                        dsu.union(i, j);
                    }
                }
            }
        }
    }
}

/// Disjoint-set forest with path compression and union by size.
#[derive(Debug, Clone)]
struct Dsu {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl Dsu {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while root != self.parent[root] {
            root = self.parent[root];
        }
        while x != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) -> bool {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }
}
