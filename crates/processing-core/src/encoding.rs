//! Visual encodings shared by the renderers.
//!
//! Marker sizes are expressed as areas in point² (the unit plotting tools
//! use for scatter markers); [`area_to_radius_px`] converts them for a
//! canvas drawn at 100 pixels per inch.

/// Smallest fixation marker area.
pub const MIN_MARKER_SIZE: f64 = 100.0;

/// Largest fixation marker area.
pub const MAX_MARKER_SIZE: f64 = 2000.0;

/// Fixed marker area for pupil heatmap points.
pub const PUPIL_MARKER_SIZE: f64 = 150.0;

/// Canvas pixels per typographic point (100 dpi / 72 pt per inch).
pub const PX_PER_POINT: f64 = 100.0 / 72.0;

/// Logarithmic dwell-count to marker-area scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerScale {
    pub min_size: f64,
    pub max_size: f64,
}

impl Default for MarkerScale {
    fn default() -> Self {
        Self {
            min_size: MIN_MARKER_SIZE,
            max_size: MAX_MARKER_SIZE,
        }
    }
}

impl MarkerScale {
    /// Size used when every dwell count is identical.
    pub fn mid_size(&self) -> f64 {
        (self.min_size + self.max_size) / 2.0
    }

    /// Area for `dwell` given the observed dwell range.
    ///
    /// `size = min + (ln(1+d) - ln(1+lo)) / (ln(1+hi) - ln(1+lo)) * (max - min)`;
    /// a zero-width range maps everything to [`Self::mid_size`].
    pub fn size_for(&self, dwell: usize, lo: usize, hi: usize) -> f64 {
        let span = (hi as f64).ln_1p() - (lo as f64).ln_1p();
        if span <= 0.0 {
            return self.mid_size();
        }
        let t = ((dwell as f64).ln_1p() - (lo as f64).ln_1p()) / span;
        self.min_size + t.clamp(0.0, 1.0) * (self.max_size - self.min_size)
    }

    /// Areas for a list of dwell counts, scaled against their own range.
    pub fn sizes(&self, dwell_counts: &[usize]) -> Vec<f64> {
        let (Some(&lo), Some(&hi)) = (dwell_counts.iter().min(), dwell_counts.iter().max()) else {
            return Vec::new();
        };
        dwell_counts
            .iter()
            .map(|&d| self.size_for(d, lo, hi))
            .collect()
    }
}

/// Convert a marker area (point²) into a circle radius in canvas pixels.
pub fn area_to_radius_px(area: f64) -> f64 {
    (area.max(0.0) / std::f64::consts::PI).sqrt() * PX_PER_POINT
}

/// Position of the `index`-th of `count` items on a `[0, 1]` color scale.
pub fn sequence_fraction(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    (index as f64 / (count - 1) as f64).clamp(0.0, 1.0)
}
