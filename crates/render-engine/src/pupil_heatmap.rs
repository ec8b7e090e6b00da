//! Pupil-dilation heatmap: one unclustered point per fixation sample,
//! coloured by average pupil size across the session's own range.

use std::path::Path;

use gazemap_processing_core::encoding::{area_to_radius_px, PUPIL_MARKER_SIZE};
use gazemap_processing_core::pupil::PupilField;
use image::{Rgba, RgbaImage};

use crate::canvas::{Disc, Legend, RenderContext, Stroke};
use crate::colormap::{alpha_byte, Colormap};

pub const POINT_ALPHA: f64 = 0.7;

/// Point outline width in pixels.
pub const POINT_EDGE_WIDTH: f64 = 0.5;

const LEGEND_TITLE: [&str; 2] = ["Average", "Pupil Size"];

/// Render the pupil field over an optional background.
pub fn render_pupil_heatmap(field: &PupilField, background: Option<&Path>) -> RgbaImage {
    let mut ctx = RenderContext::new(background);

    let range = match field.range {
        Some(range) if !field.is_empty() => range,
        _ => {
            tracing::info!("No fixation samples, rendering placeholder pupil heatmap");
            ctx.draw_no_data();
            return ctx.finish();
        }
    };

    let radius = area_to_radius_px(PUPIL_MARKER_SIZE);
    let edge = Stroke {
        color: Rgba([255, 255, 255, alpha_byte(POINT_ALPHA)]),
        width: POINT_EDGE_WIDTH,
    };

    for point in &field.points {
        let t = range.normalize(point.avg_pupil_size);
        ctx.fill_disc(&Disc {
            center: (point.x, point.y),
            radius,
            fill: Some(Colormap::YlOrRd.rgba(t, POINT_ALPHA)),
            edge: Some(edge),
        });
    }

    ctx.draw_colorbar(&Legend {
        colormap: Colormap::YlOrRd,
        title: &LEGEND_TITLE,
        min: range.min,
        max: range.max,
    });
    ctx.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{OUTPUT_WIDTH, WHITE};
    use gazemap_session_model::frame::CANVAS_WIDTH;
    use gazemap_processing_core::pupil::{PupilPoint, PupilRange};

    fn field(points: &[(f64, f64, f64)]) -> PupilField {
        let points: Vec<PupilPoint> = points
            .iter()
            .map(|&(x, y, avg_pupil_size)| PupilPoint { x, y, avg_pupil_size })
            .collect();
        let min = points.iter().map(|p| p.avg_pupil_size).fold(f64::INFINITY, f64::min);
        let max = points.iter().map(|p| p.avg_pupil_size).fold(f64::NEG_INFINITY, f64::max);
        PupilField {
            points,
            range: Some(PupilRange { min, max }),
        }
    }

    #[test]
    fn test_empty_field_renders_placeholder() {
        let empty = PupilField {
            points: Vec::new(),
            range: None,
        };
        let image = render_pupil_heatmap(&empty, None);
        assert_eq!(image.dimensions(), (2040, 1080));
        assert_ne!(*image.get_pixel(960, 540), WHITE);
        assert_eq!(*image.get_pixel(1980, 540), WHITE);
    }

    #[test]
    fn test_larger_pupils_are_redder() {
        let image = render_pupil_heatmap(
            &field(&[(200.0, 200.0, 2.0), (1600.0, 200.0, 6.0)]),
            None,
        );
        let small = image.get_pixel(200, 880);
        let large = image.get_pixel(1600, 880);
        // YlOrRd: pale yellow at the low end, dark red at the high end.
        assert!(small[1] > large[1], "{small:?} vs {large:?}");
        assert!(small[2] > large[2], "{small:?} vs {large:?}");
    }

    #[test]
    fn test_flat_range_uses_mid_colour() {
        let image = render_pupil_heatmap(
            &field(&[(500.0, 500.0, 3.0), (900.0, 500.0, 3.0)]),
            None,
        );
        assert_eq!(image.get_pixel(500, 580), image.get_pixel(900, 580));
        assert_ne!(*image.get_pixel(500, 580), WHITE);
    }

    #[test]
    fn test_legend_is_titled_and_valued() {
        let image = render_pupil_heatmap(
            &field(&[(200.0, 200.0, 2.5), (1600.0, 200.0, 4.75)]),
            None,
        );
        let ink = |ys: std::ops::Range<u32>, xs: std::ops::Range<u32>| {
            ys.into_iter()
                .any(|y| xs.clone().any(|x| image.get_pixel(x, y)[0] < 64))
        };
        // Title above the bar, min and max next to the end ticks.
        assert!(ink(170..205, CANVAS_WIDTH..OUTPUT_WIDTH));
        assert!(ink(210..222, 1985..OUTPUT_WIDTH));
        assert!(ink(857..869, 1985..OUTPUT_WIDTH));
    }

    #[test]
    fn test_point_radius_is_fixed() {
        let image = render_pupil_heatmap(&field(&[(1000.0, 500.0, 4.0)]), None);
        // Area 150 pt² is a radius of roughly 9.6 px.
        assert_ne!(*image.get_pixel(1000 + 8, 580), WHITE);
        assert_eq!(*image.get_pixel(1000 + 12, 580), WHITE);
    }
}
