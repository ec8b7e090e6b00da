//! Continuous color scales.
//!
//! Each scale is a list of evenly spaced sRGB stops, linearly interpolated.

use image::Rgba;

const VIRIDIS: [[u8; 3]; 9] = [
    [0x44, 0x01, 0x54],
    [0x47, 0x2d, 0x7b],
    [0x3b, 0x52, 0x8b],
    [0x2c, 0x72, 0x8e],
    [0x21, 0x91, 0x8c],
    [0x28, 0xae, 0x80],
    [0x5e, 0xc9, 0x62],
    [0xad, 0xdc, 0x30],
    [0xfd, 0xe7, 0x25],
];

const YL_OR_RD: [[u8; 3]; 9] = [
    [0xff, 0xff, 0xcc],
    [0xff, 0xed, 0xa0],
    [0xfe, 0xd9, 0x76],
    [0xfe, 0xb2, 0x4c],
    [0xfd, 0x8d, 0x3c],
    [0xfc, 0x4e, 0x2a],
    [0xe3, 0x1a, 0x1c],
    [0xbd, 0x00, 0x26],
    [0x80, 0x00, 0x26],
];

/// Available color scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Perceptually uniform purple-to-yellow; used for fixation sequence.
    Viridis,
    /// Yellow-orange-red; used for pupil dilation.
    YlOrRd,
}

impl Colormap {
    fn stops(self) -> &'static [[u8; 3]] {
        match self {
            Self::Viridis => &VIRIDIS,
            Self::YlOrRd => &YL_OR_RD,
        }
    }

    /// Opaque color at position `t` in `[0, 1]` (clamped; NaN maps to 0).
    pub fn rgb(self, t: f64) -> [u8; 3] {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (stops.len() - 1) as f64;
        let lo = (scaled.floor() as usize).min(stops.len() - 1);
        let hi = (lo + 1).min(stops.len() - 1);
        let frac = scaled - lo as f64;

        let mut out = [0u8; 3];
        for (channel, value) in out.iter_mut().enumerate() {
            let a = stops[lo][channel] as f64;
            let b = stops[hi][channel] as f64;
            *value = (a + (b - a) * frac).round() as u8;
        }
        out
    }

    /// Color at `t` with the given opacity in `[0, 1]`.
    pub fn rgba(self, t: f64, alpha: f64) -> Rgba<u8> {
        let [r, g, b] = self.rgb(t);
        Rgba([r, g, b, alpha_byte(alpha)])
    }
}

/// Convert an opacity in `[0, 1]` into an alpha channel value.
pub fn alpha_byte(alpha: f64) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}
