//! Per-render drawing surface.
//!
//! A [`RenderContext`] owns one RGBA buffer laid out as the 1920×1080 data
//! canvas followed by a white legend gutter on the right. Drawing calls take
//! canvas coordinates (y grows upward) and clip to the data area.
//!
//! Canvas coordinates are continuous: pixel column `c` spans `[c, c + 1)` in
//! x and pixel row `r` spans canvas y `(1079 - r, 1080 - r]`. A pixel is
//! covered when its centre is. The canvas edges `x = 0`, `x = 1920`, `y = 0`
//! and `y = 1080` all fall on the outer boundary of the pixel grid, so a
//! marker on any edge is cut in half the same way.

use std::path::Path;

use gazemap_common::error::{GazemapError, GazemapResult};
use gazemap_session_model::frame::{CANVAS_HEIGHT, CANVAS_WIDTH};
use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::colormap::Colormap;
use crate::text::{draw_text, format_value, text_width, GLYPH_HEIGHT};

/// Width of the legend gutter to the right of the canvas.
pub const LEGEND_GUTTER: u32 = 120;

/// Width of every rendered image.
pub const OUTPUT_WIDTH: u32 = CANVAS_WIDTH + LEGEND_GUTTER;

/// Height of every rendered image.
pub const OUTPUT_HEIGHT: u32 = CANVAS_HEIGHT;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const PLACEHOLDER_GREY: Rgba<u8> = Rgba([160, 160, 160, 255]);

const BAR_OFFSET: i32 = 30;
const BAR_WIDTH: u32 = 24;
const BAR_HEIGHT: u32 = CANVAS_HEIGHT * 3 / 5;
const BAR_TOP: i32 = (CANVAS_HEIGHT / 5) as i32;
const BAR_TICKS: u32 = 5;
const TICK_LENGTH: f32 = 6.0;

const LABEL_SCALE: u32 = 2;
const LABEL_GAP: i32 = 4;
const TITLE_LINE_SPACING: i32 = 4;
const TITLE_MARGIN: i32 = 12;

const PLACEHOLDER_RADIUS: f64 = 90.0;
const PLACEHOLDER_STROKE: f64 = 14.0;

/// Outline or line style in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba<u8>,
    pub width: f64,
}

/// A circle in canvas coordinates with optional fill and outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub center: (f64, f64),
    /// Radius in pixels, measured to the middle of the outline.
    pub radius: f64,
    pub fill: Option<Rgba<u8>>,
    pub edge: Option<Stroke>,
}

/// What the colour bar shows: a colormap, a title stacked above the bar
/// one line per entry, and the data values at the bottom and top ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Legend<'a> {
    pub colormap: Colormap,
    pub title: &'a [&'a str],
    pub min: f64,
    pub max: f64,
}

/// Drawing state for exactly one rendered image.
pub struct RenderContext {
    image: RgbaImage,
}

impl RenderContext {
    /// Start a white image, compositing `background` beneath everything if
    /// it can be read. A background that fails to load is logged and
    /// skipped.
    pub fn new(background: Option<&Path>) -> Self {
        let mut image = RgbaImage::from_pixel(OUTPUT_WIDTH, OUTPUT_HEIGHT, WHITE);

        if let Some(path) = background {
            match load_background(path) {
                Ok(bg) => imageops::overlay(&mut image, &bg, 0, 0),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Background image unusable, rendering on white"
                ),
            }
        }

        Self { image }
    }

    /// Map canvas coordinates to continuous pixel coordinates. The result
    /// is a position on the pixel grid, not a row index: `y = 0` is the
    /// bottom edge of row 1079 and `y = 1080` the top edge of row 0.
    pub fn to_pixel(x: f64, y: f64) -> (f64, f64) {
        (x, CANVAS_HEIGHT as f64 - y)
    }

    /// Draw a circle. Fill and outline are each blended once per pixel.
    pub fn fill_disc(&mut self, disc: &Disc) {
        let (cx, cy) = Self::to_pixel(disc.center.0, disc.center.1);
        let half_edge = disc.edge.map_or(0.0, |s| s.width / 2.0);
        let outer = disc.radius.max(0.0) + half_edge;
        let inner = (disc.radius - half_edge).max(0.0);

        let Some((x0, x1, y0, y1)) = clip_box(cx - outer, cx + outer, cy - outer, cy + outer) else {
            return;
        };

        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > outer {
                    continue;
                }
                let color = match (disc.edge, disc.fill) {
                    (Some(edge), _) if dist > inner => Some(edge.color),
                    (_, fill) => fill,
                };
                if let Some(color) = color {
                    self.blend(px, py, color);
                }
            }
        }
    }

    /// Draw a straight line between two canvas points.
    pub fn stroke_segment(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke) {
        let a = Self::to_pixel(from.0, from.1);
        let b = Self::to_pixel(to.0, to.1);
        let half = stroke.width.max(0.0) / 2.0;

        let Some((x0, x1, y0, y1)) = clip_box(
            a.0.min(b.0) - half,
            a.0.max(b.0) + half,
            a.1.min(b.1) - half,
            a.1.max(b.1) + half,
        ) else {
            return;
        };

        for py in y0..=y1 {
            for px in x0..=x1 {
                let p = (px as f64 + 0.5, py as f64 + 0.5);
                if distance_to_segment(p, a, b) <= half {
                    self.blend(px, py, stroke.color);
                }
            }
        }
    }

    /// Vertical colour bar in the legend gutter, high values at the top,
    /// with the title above it and a value next to every tick.
    pub fn draw_colorbar(&mut self, legend: &Legend) {
        let left = CANVAS_WIDTH as i32 + BAR_OFFSET;

        for row in 0..BAR_HEIGHT {
            let t = 1.0 - row as f64 / (BAR_HEIGHT - 1) as f64;
            let [r, g, b] = legend.colormap.rgb(t);
            draw_filled_rect_mut(
                &mut self.image,
                Rect::at(left, BAR_TOP + row as i32).of_size(BAR_WIDTH, 1),
                Rgba([r, g, b, 255]),
            );
        }

        draw_hollow_rect_mut(
            &mut self.image,
            Rect::at(left - 1, BAR_TOP - 1).of_size(BAR_WIDTH + 2, BAR_HEIGHT + 2),
            BLACK,
        );

        let tick_x = (left + BAR_WIDTH as i32 + 1) as f32;
        let label_x = tick_x as i32 + TICK_LENGTH as i32 + LABEL_GAP;
        let glyph_height = (GLYPH_HEIGHT * LABEL_SCALE) as i32;
        for i in 0..BAR_TICKS {
            let fraction = i as f64 / (BAR_TICKS - 1) as f64;
            let y = BAR_TOP as f32 + (BAR_HEIGHT - 1) as f32 * fraction as f32;
            draw_line_segment_mut(&mut self.image, (tick_x, y), (tick_x + TICK_LENGTH, y), BLACK);

            let value = legend.max - (legend.max - legend.min) * fraction;
            draw_text(
                &mut self.image,
                label_x,
                y.round() as i32 - glyph_height / 2,
                &format_value(value),
                LABEL_SCALE,
                BLACK,
            );
        }

        let line_height = glyph_height + TITLE_LINE_SPACING;
        let title_top = BAR_TOP - TITLE_MARGIN - line_height * legend.title.len() as i32;
        for (index, line) in legend.title.iter().enumerate() {
            let width = text_width(line, LABEL_SCALE);
            let x = CANVAS_WIDTH as i32 + (LEGEND_GUTTER.saturating_sub(width) / 2) as i32;
            draw_text(
                &mut self.image,
                x,
                title_top + index as i32 * line_height,
                line,
                LABEL_SCALE,
                BLACK,
            );
        }
    }

    /// Grey ⊘ at the centre of the canvas, used when there is nothing to plot.
    pub fn draw_no_data(&mut self) {
        let center = (CANVAS_WIDTH as f64 / 2.0, CANVAS_HEIGHT as f64 / 2.0);
        let stroke = Stroke {
            color: PLACEHOLDER_GREY,
            width: PLACEHOLDER_STROKE,
        };

        self.fill_disc(&Disc {
            center,
            radius: PLACEHOLDER_RADIUS,
            fill: None,
            edge: Some(stroke),
        });

        let reach = PLACEHOLDER_RADIUS * std::f64::consts::FRAC_1_SQRT_2;
        self.stroke_segment(
            (center.0 - reach, center.1 - reach),
            (center.0 + reach, center.1 + reach),
            stroke,
        );
    }

    /// Hand over the finished image.
    pub fn finish(self) -> RgbaImage {
        self.image
    }

    fn blend(&mut self, px: u32, py: u32, color: Rgba<u8>) {
        self.image.get_pixel_mut(px, py).blend(&color);
    }
}

fn load_background(path: &Path) -> GazemapResult<RgbaImage> {
    let decoded = image::open(path).map_err(|e| {
        GazemapError::render(format!("cannot read background {}: {e}", path.display()))
    })?;
    Ok(decoded
        .resize_exact(CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Lanczos3)
        .to_rgba8())
}

/// Pixel bounds of a box clipped to the data canvas, or `None` if the box
/// misses it entirely.
fn clip_box(left: f64, right: f64, top: f64, bottom: f64) -> Option<(u32, u32, u32, u32)> {
    if ![left, right, top, bottom].iter().all(|v| v.is_finite()) {
        return None;
    }
    let max_x = (CANVAS_WIDTH - 1) as f64;
    let max_y = (CANVAS_HEIGHT - 1) as f64;
    if right < 0.0 || bottom < 0.0 || left > max_x + 1.0 || top > max_y + 1.0 {
        return None;
    }
    let x0 = left.floor().clamp(0.0, max_x) as u32;
    let x1 = right.ceil().clamp(0.0, max_x) as u32;
    let y0 = top.floor().clamp(0.0, max_y) as u32;
    let y1 = bottom.ceil().clamp(0.0, max_y) as u32;
    Some((x0, x1, y0, y1))
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f64::EPSILON {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (qx, qy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - qx).powi(2) + (p.1 - qy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Rgba<u8> {
        Rgba([255, 0, 0, 255])
    }

    #[test]
    fn test_output_dimensions_include_gutter() {
        let image = RenderContext::new(None).finish();
        assert_eq!(image.dimensions(), (2040, 1080));
        assert!(image.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_y_axis_grows_upward() {
        assert_eq!(RenderContext::to_pixel(10.0, 0.0), (10.0, 1080.0));
        assert_eq!(RenderContext::to_pixel(10.0, 1080.0), (10.0, 0.0));
    }

    fn red_in_row(image: &RgbaImage, y: u32) -> Vec<u32> {
        (0..CANVAS_WIDTH).filter(|&x| *image.get_pixel(x, y) == red()).collect()
    }

    fn red_in_column(image: &RgbaImage, x: u32) -> Vec<u32> {
        (0..CANVAS_HEIGHT).filter(|&y| *image.get_pixel(x, y) == red()).collect()
    }

    #[test]
    fn test_opposite_edges_clip_alike() {
        let mut ctx = RenderContext::new(None);
        for center in [(100.0, 0.0), (100.0, 1080.0), (0.0, 540.0), (1920.0, 540.0)] {
            ctx.fill_disc(&Disc {
                center,
                radius: 3.0,
                fill: Some(red()),
                edge: None,
            });
        }
        let image = ctx.finish();

        assert_eq!(red_in_column(&image, 100), vec![0, 1, 2, 1077, 1078, 1079]);
        assert_eq!(red_in_row(&image, 540), vec![0, 1, 2, 1917, 1918, 1919]);
    }

    #[test]
    fn test_disc_lands_at_flipped_row() {
        let mut ctx = RenderContext::new(None);
        ctx.fill_disc(&Disc {
            center: (100.0, 1000.0),
            radius: 5.0,
            fill: Some(red()),
            edge: None,
        });
        let image = ctx.finish();
        assert_eq!(*image.get_pixel(100, 80), red());
        assert_eq!(*image.get_pixel(100, 1000), WHITE);
    }

    #[test]
    fn test_disc_edge_and_fill() {
        let mut ctx = RenderContext::new(None);
        ctx.fill_disc(&Disc {
            center: (500.5, 500.5),
            radius: 10.0,
            fill: Some(red()),
            edge: Some(Stroke {
                color: BLACK,
                width: 2.0,
            }),
        });
        let image = ctx.finish();
        // Pixel (500, 579) holds the centre.
        assert_eq!(*image.get_pixel(500, 579), red());
        assert_eq!(*image.get_pixel(510, 579), BLACK);
        assert_eq!(*image.get_pixel(513, 579), WHITE);
    }

    #[test]
    fn test_translucent_fill_blends_once() {
        let mut ctx = RenderContext::new(None);
        ctx.fill_disc(&Disc {
            center: (300.0, 300.0),
            radius: 20.0,
            fill: Some(Rgba([0, 0, 0, 128])),
            edge: None,
        });
        let image = ctx.finish();
        let first = *image.get_pixel(300, 780);
        // Every interior pixel gets the same blended value.
        for dx in -10..10i32 {
            assert_eq!(*image.get_pixel((300 + dx) as u32, 780), first);
        }
        assert!(first[0] > 100 && first[0] < 150);
    }

    #[test]
    fn test_drawing_is_clipped_to_canvas() {
        let mut ctx = RenderContext::new(None);
        ctx.fill_disc(&Disc {
            center: (1915.0, 540.0),
            radius: 40.0,
            fill: Some(red()),
            edge: None,
        });
        ctx.fill_disc(&Disc {
            center: (-5000.0, 99999.0),
            radius: 40.0,
            fill: Some(red()),
            edge: None,
        });
        ctx.fill_disc(&Disc {
            center: (f64::NAN, 10.0),
            radius: 40.0,
            fill: Some(red()),
            edge: None,
        });
        let image = ctx.finish();
        assert_eq!(*image.get_pixel(1919, 540), red());
        assert_eq!(*image.get_pixel(1920, 540), WHITE);
        assert_eq!(*image.get_pixel(1940, 540), WHITE);
    }

    #[test]
    fn test_segment_covers_path() {
        let mut ctx = RenderContext::new(None);
        ctx.stroke_segment(
            (100.0, 100.0),
            (300.0, 100.0),
            Stroke {
                color: red(),
                width: 3.0,
            },
        );
        let image = ctx.finish();
        assert_eq!(*image.get_pixel(200, 980), red());
        assert_eq!(*image.get_pixel(200, 975), WHITE);
        assert_eq!(*image.get_pixel(320, 980), WHITE);
    }

    const PUPIL_LEGEND: Legend<'static> = Legend {
        colormap: Colormap::YlOrRd,
        title: &["Average", "Pupil Size"],
        min: 2.0,
        max: 6.0,
    };

    fn has_ink(image: &RgbaImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> bool {
        ys.clone()
            .any(|y| xs.clone().any(|x| *image.get_pixel(x, y) == BLACK))
    }

    fn legend_image(legend: &Legend) -> RgbaImage {
        let mut ctx = RenderContext::new(None);
        ctx.draw_colorbar(legend);
        ctx.finish()
    }

    #[test]
    fn test_colorbar_draws_in_gutter() {
        let image = legend_image(&Legend {
            colormap: Colormap::Viridis,
            title: &["Fixation", "Sequence"],
            min: 0.0,
            max: 4.0,
        });

        let x = CANVAS_WIDTH + BAR_OFFSET as u32 + BAR_WIDTH / 2;
        let top = image.get_pixel(x, BAR_TOP as u32);
        let bottom = image.get_pixel(x, BAR_TOP as u32 + BAR_HEIGHT - 1);
        let [tr, tg, tb] = Colormap::Viridis.rgb(1.0);
        let [br, bg, bb] = Colormap::Viridis.rgb(0.0);
        assert_eq!(*top, Rgba([tr, tg, tb, 255]));
        assert_eq!(*bottom, Rgba([br, bg, bb, 255]));

        for y in 0..CANVAS_HEIGHT {
            for x in 0..CANVAS_WIDTH {
                assert_eq!(*image.get_pixel(x, y), WHITE);
            }
        }
    }

    #[test]
    fn test_colorbar_is_labelled() {
        let image = legend_image(&PUPIL_LEGEND);
        let bar_top = BAR_TOP as u32;
        let bar_bottom = bar_top + BAR_HEIGHT;

        // Title sits above the bar.
        assert!(has_ink(&image, CANVAS_WIDTH..OUTPUT_WIDTH, 150..bar_top - 2));
        // Values sit right of the ticks at both ends.
        let labels = CANVAS_WIDTH + BAR_OFFSET as u32 + BAR_WIDTH + 8..OUTPUT_WIDTH;
        assert!(has_ink(&image, labels.clone(), bar_top - 6..bar_top + 6));
        assert!(has_ink(&image, labels.clone(), bar_bottom - 6..bar_bottom + 6));
        // Nothing between the ticks' labels at the middle of a gap.
        let gap = bar_top + BAR_HEIGHT / 8;
        assert!(!has_ink(&image, labels, gap - 2..gap + 2));
    }

    #[test]
    fn test_colorbar_labels_follow_range() {
        let narrow = legend_image(&PUPIL_LEGEND);
        let wide = legend_image(&Legend {
            max: 9.0,
            ..PUPIL_LEGEND
        });
        let bar_top = BAR_TOP as u32;
        let differs = |ys: std::ops::Range<u32>| {
            ys.into_iter().any(|y| {
                (CANVAS_WIDTH..OUTPUT_WIDTH).any(|x| narrow.get_pixel(x, y) != wide.get_pixel(x, y))
            })
        };
        // Top value changes, bottom value (min) does not.
        assert!(differs(bar_top - 6..bar_top + 6));
        assert!(!differs(bar_top + BAR_HEIGHT - 6..bar_top + BAR_HEIGHT + 6));
    }

    #[test]
    fn test_no_data_glyph() {
        let mut ctx = RenderContext::new(None);
        ctx.draw_no_data();
        let image = ctx.finish();
        // Ring at the top, slash through the middle, empty between.
        assert_eq!(*image.get_pixel(960, 540 - 90), PLACEHOLDER_GREY);
        assert_eq!(*image.get_pixel(960, 540), PLACEHOLDER_GREY);
        assert_eq!(*image.get_pixel(1000, 580), WHITE);
        assert!((CANVAS_WIDTH..OUTPUT_WIDTH).all(|x| *image.get_pixel(x, 540) == WHITE));
    }

    #[test]
    fn test_missing_background_falls_back_to_white() {
        let dir = tempfile::tempdir().unwrap();
        let image = RenderContext::new(Some(&dir.path().join("absent.png"))).finish();
        assert_eq!(*image.get_pixel(5, 5), WHITE);
    }

    #[test]
    fn test_background_is_stretched_over_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        RgbaImage::from_pixel(4, 2, Rgba([0, 128, 0, 255]))
            .save(&path)
            .unwrap();

        let image = RenderContext::new(Some(&path)).finish();
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 128, 0, 255]));
        assert_eq!(*image.get_pixel(1919, 1079), Rgba([0, 128, 0, 255]));
        assert_eq!(*image.get_pixel(1930, 10), WHITE);
    }

    #[test]
    fn test_distance_to_segment() {
        assert_eq!(distance_to_segment((5.0, 3.0), (0.0, 0.0), (10.0, 0.0)), 3.0);
        assert_eq!(distance_to_segment((13.0, 4.0), (0.0, 0.0), (10.0, 0.0)), 5.0);
        assert_eq!(distance_to_segment((3.0, 4.0), (0.0, 0.0), (0.0, 0.0)), 5.0);
    }
}
