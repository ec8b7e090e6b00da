//! Canvas frame constants and the recorder-to-canvas transform.
//!
//! The tracker reports gaze in a portrait recorder frame. Every rendering
//! targets a fixed landscape canvas, so samples are rotated 90° clockwise:
//! the recorder's `y` becomes canvas `x`, and the recorder's `x` is
//! flipped against [`FRAME_HEIGHT`] to become canvas `y`.

/// Canvas width in canvas units (one unit renders as one pixel).
pub const CANVAS_WIDTH: u32 = 1920;

/// Canvas height in canvas units.
pub const CANVAS_HEIGHT: u32 = 1080;

/// Height of the recorder frame used when flipping `avg_x` into canvas `y`.
pub const FRAME_HEIGHT: f64 = 1080.0;

/// The fixed canvas frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasFrame;

impl CanvasFrame {
    /// Map recorder coordinates into canvas space.
    pub fn rotate(avg_x: f64, avg_y: f64) -> (f64, f64) {
        (avg_y, FRAME_HEIGHT - avg_x)
    }

    /// Canvas extent as floating point `(width, height)`.
    pub fn extent() -> (f64, f64) {
        (CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64)
    }

    /// Whether a canvas point falls inside the visible extent.
    pub fn contains(x: f64, y: f64) -> bool {
        let (w, h) = Self::extent();
        (0.0..=w).contains(&x) && (0.0..=h).contains(&y)
    }
}
