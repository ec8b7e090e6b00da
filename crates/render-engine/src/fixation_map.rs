//! Fixation-cluster map.
//!
//! Scan-path lines join consecutive clusters; each cluster is a circle whose
//! area encodes dwell count (log scale) and whose colour encodes its position
//! in the viewing sequence.

use std::path::Path;

use gazemap_processing_core::cluster::{scan_path, Cluster};
use gazemap_processing_core::encoding::{
    area_to_radius_px, sequence_fraction, MarkerScale, PX_PER_POINT,
};
use gazemap_session_model::frame::CanvasFrame;
use image::{Rgba, RgbaImage};

use crate::canvas::{Disc, Legend, RenderContext, Stroke};
use crate::colormap::{alpha_byte, Colormap};

pub const SCAN_PATH_ALPHA: f64 = 0.5;

/// Scan-path width in points.
pub const SCAN_PATH_WIDTH: f64 = 1.5;

pub const MARKER_ALPHA: f64 = 0.6;

/// Marker outline width in pixels.
pub const MARKER_EDGE_WIDTH: f64 = 1.0;

const LEGEND_TITLE: [&str; 2] = ["Fixation", "Sequence"];

/// Render clusters in emission order over an optional background.
///
/// An empty cluster list yields the "no data" placeholder without a legend.
pub fn render_fixation_map(
    clusters: &[Cluster],
    scale: &MarkerScale,
    background: Option<&Path>,
) -> RgbaImage {
    let mut ctx = RenderContext::new(background);

    if clusters.is_empty() {
        tracing::info!("No fixation clusters, rendering placeholder");
        ctx.draw_no_data();
        return ctx.finish();
    }

    let off_canvas = clusters
        .iter()
        .filter(|c| !CanvasFrame::contains(c.centroid_x, c.centroid_y))
        .count();
    if off_canvas > 0 {
        tracing::debug!(off_canvas, "Some cluster centroids fall outside the canvas");
    }

    let path_stroke = Stroke {
        color: Rgba([0, 0, 255, alpha_byte(SCAN_PATH_ALPHA)]),
        width: SCAN_PATH_WIDTH * PX_PER_POINT,
    };
    for segment in scan_path(clusters) {
        ctx.stroke_segment(segment.from, segment.to, path_stroke);
    }

    let dwell: Vec<usize> = clusters.iter().map(|c| c.dwell_count).collect();
    let edge = Stroke {
        color: Rgba([255, 255, 255, alpha_byte(MARKER_ALPHA)]),
        width: MARKER_EDGE_WIDTH,
    };
    for (cluster, size) in clusters.iter().zip(scale.sizes(&dwell)) {
        let t = sequence_fraction(cluster.sequence_index, clusters.len());
        ctx.fill_disc(&Disc {
            center: cluster.centroid(),
            radius: area_to_radius_px(size),
            fill: Some(Colormap::Viridis.rgba(t, MARKER_ALPHA)),
            edge: Some(edge),
        });
    }

    ctx.draw_colorbar(&Legend {
        colormap: Colormap::Viridis,
        title: &LEGEND_TITLE,
        min: 0.0,
        max: (clusters.len() - 1) as f64,
    });
    ctx.finish()
}
