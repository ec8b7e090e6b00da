//! Sample normalization.
//!
//! Converts raw CSV cells into canonical values and derives canvas-space
//! fields. Malformed data is never an error here:
//! - Unparsable, missing or non-finite numbers become `0.0`
//! - The fixation flag accepts the assorted encodings trackers emit
//!   (`TRUE`, `True`, `1`, `yes`, ...)

use gazemap_session_model::frame::CanvasFrame;
use gazemap_session_model::sample::{DerivedSample, RawSample, Sample};

/// Normalizer for converting raw rows into derived samples.
pub struct Normalizer;

impl Normalizer {
    /// Coerce every field of a raw row into canonical form.
    pub fn normalize(raw: &RawSample) -> Sample {
        Sample {
            timestamp: raw.timestamp.clone().unwrap_or_default(),
            time: parse_number(raw.time.as_deref()),
            fixation: parse_flag(raw.fixation.as_deref()),
            avg_x: parse_number(raw.avg_x.as_deref()),
            avg_y: parse_number(raw.avg_y.as_deref()),
            left_psize: parse_number(raw.left_psize.as_deref()),
            right_psize: parse_number(raw.right_psize.as_deref()),
        }
    }

    /// Compute canvas position and averaged pupil size.
    ///
    /// Deriving from `derived.sample` again yields an identical value.
    pub fn derive(sample: Sample) -> DerivedSample {
        let (rotated_x, rotated_y) = CanvasFrame::rotate(sample.avg_x, sample.avg_y);
        let avg_pupil_size = (sample.left_psize + sample.right_psize) / 2.0;
        DerivedSample {
            sample,
            rotated_x,
            rotated_y,
            avg_pupil_size,
        }
    }

    /// Normalize and derive a whole recording, preserving row order.
    pub fn normalize_all(raws: &[RawSample]) -> Vec<DerivedSample> {
        raws.iter()
            .map(|raw| Self::derive(Self::normalize(raw)))
            .collect()
    }
}

/// The fixation-flagged subset of `samples`, in recorded order.
pub fn fixations(samples: &[DerivedSample]) -> Vec<DerivedSample> {
    samples
        .iter()
        .filter(|s| s.is_fixation())
        .cloned()
        .collect()
}

/// Parse a numeric cell, treating anything unusable as zero signal.
pub fn parse_number(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse a fixation cell.
///
/// Empty or missing cells and the usual false spellings are `false`;
/// numbers are truthy when non-zero; any other text is truthy.
///
/// A blank cell reads as "not a fixation" on purpose. Treating it as a
/// missing float (NaN, which is truthy) would let an export with dropped
/// flags turn every unlabelled frame into a fixation.
pub fn parse_flag(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };
    let lowered = value.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "true" | "t" | "yes" | "y" => true,
        "" | "false" | "f" | "no" | "n" | "nan" | "none" | "null" => false,
        other => match other.parse::<f64>() {
            Ok(number) => number != 0.0 && !number.is_nan(),
            Err(_) => true,
        },
    }
}
