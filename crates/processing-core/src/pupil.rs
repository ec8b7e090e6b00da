//! Pupil dilation field for heatmap rendering.

use gazemap_session_model::sample::DerivedSample;

/// Observed pupil-size range of one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PupilRange {
    pub min: f64,
    pub max: f64,
}

impl PupilRange {
    /// Map a pupil size into `[0, 1]` across this range.
    /// A zero-width range maps everything to `0.5`.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// A single heatmap point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PupilPoint {
    pub x: f64,
    pub y: f64,
    pub avg_pupil_size: f64,
}

/// Every fixation as its own point, plus the session's pupil range.
#[derive(Debug, Clone, PartialEq)]
pub struct PupilField {
    pub points: Vec<PupilPoint>,
    /// `None` when there are no points.
    pub range: Option<PupilRange>,
}

impl PupilField {
    /// Build the field from fixation samples. No clustering is applied.
    pub fn from_fixations(fixations: &[DerivedSample]) -> Self {
        let points: Vec<PupilPoint> = fixations
            .iter()
            .map(|s| PupilPoint {
                x: s.rotated_x,
                y: s.rotated_y,
                avg_pupil_size: s.avg_pupil_size,
            })
            .collect();

        let range = points.iter().map(|p| p.avg_pupil_size).fold(None, |acc, v| {
            Some(match acc {
                None => PupilRange { min: v, max: v },
                Some(PupilRange { min, max }) => PupilRange {
                    min: min.min(v),
                    max: max.max(v),
                },
            })
        });

        Self { points, range }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Normalized color position for a point, or `None` for an empty field.
    pub fn intensity(&self, point: &PupilPoint) -> Option<f64> {
        self.range.map(|r| r.normalize(point.avg_pupil_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::Normalizer;
    use gazemap_session_model::sample::Sample;

    fn fixation(x: f64, y: f64, left: f64, right: f64) -> DerivedSample {
        Normalizer::derive(Sample {
            timestamp: String::new(),
            time: 0.0,
            fixation: true,
            avg_x: x,
            avg_y: y,
            left_psize: left,
            right_psize: right,
        })
    }

    #[test]
    fn test_range_uses_session_extremes() {
        let field = PupilField::from_fixations(&[
            fixation(0.0, 0.0, 2.0, 4.0),
            fixation(10.0, 10.0, 6.0, 6.0),
            fixation(20.0, 20.0, 4.0, 4.0),
        ]);
        assert_eq!(field.range, Some(PupilRange { min: 3.0, max: 6.0 }));
        assert_eq!(field.intensity(&field.points[0]), Some(0.0));
        assert_eq!(field.intensity(&field.points[1]), Some(1.0));
        assert!((field.intensity(&field.points[2]).unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_points_are_in_canvas_space() {
        let field = PupilField::from_fixations(&[fixation(100.0, 200.0, 1.0, 1.0)]);
        assert_eq!((field.points[0].x, field.points[0].y), (200.0, 980.0));
    }

    #[test]
    fn test_empty_field_has_no_range() {
        let field = PupilField::from_fixations(&[]);
        assert!(field.is_empty());
        assert_eq!(field.range, None);
    }

    #[test]
    fn test_flat_range_maps_to_mid() {
        let field = PupilField::from_fixations(&vec![fixation(0.0, 0.0, 3.0, 3.0); 4]);
        assert!(field.points.iter().all(|p| field.intensity(p) == Some(0.5)));
    }
}
