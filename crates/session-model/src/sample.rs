//! Gaze sample types and CSV ingest.
//!
//! A recording arrives as CSV with one row per tracker frame. Rows are read
//! as [`RawSample`] (every field optional text) so that malformed cells never
//! abort ingest; the processing core turns them into [`Sample`] and
//! [`DerivedSample`].

use std::io::Read;
use std::path::Path;

use gazemap_common::error::{GazemapError, GazemapResult};
use serde::{Deserialize, Serialize};

/// Columns every recording CSV must carry. Additional columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "timestamp",
    "time",
    "fixation",
    "avg_x",
    "avg_y",
    "left_psize",
    "right_psize",
];

/// One CSV row exactly as recorded. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub fixation: Option<String>,
    #[serde(default)]
    pub avg_x: Option<String>,
    #[serde(default)]
    pub avg_y: Option<String>,
    #[serde(default)]
    pub left_psize: Option<String>,
    #[serde(default)]
    pub right_psize: Option<String>,
}

/// A sample with every field in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Wall-clock timestamp as recorded.
    pub timestamp: String,

    /// Session-relative time. Only ever counted, never interpreted.
    pub time: f64,

    /// Whether the tracker flagged this frame as a fixation.
    pub fixation: bool,

    /// Raw gaze coordinates in recorder space.
    pub avg_x: f64,
    pub avg_y: f64,

    /// Pupil diameters.
    pub left_psize: f64,
    pub right_psize: f64,
}

/// A sample plus its canvas-space position and averaged pupil size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSample {
    #[serde(flatten)]
    pub sample: Sample,

    /// Canvas `x` (the recorder's `avg_y`).
    pub rotated_x: f64,

    /// Canvas `y` (`FRAME_HEIGHT - avg_x`).
    pub rotated_y: f64,

    /// Mean of left and right pupil diameters.
    pub avg_pupil_size: f64,
}

impl DerivedSample {
    /// Canvas-space position.
    pub fn position(&self) -> (f64, f64) {
        (self.rotated_x, self.rotated_y)
    }

    pub fn is_fixation(&self) -> bool {
        self.sample.fixation
    }
}

/// Read raw samples from CSV content.
///
/// Fails only when the header lacks one of [`REQUIRED_COLUMNS`] or the CSV
/// itself is structurally broken. Cell contents are never validated here;
/// bytes that are not UTF-8 are replaced with U+FFFD so a stray Latin-1
/// cell degrades to an unparseable value instead of failing the file.
pub fn read_samples<R: Read>(reader: R) -> GazemapResult<Vec<RawSample>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv::StringRecord::from_byte_record_lossy(csv_reader.byte_headers()?.clone());
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(GazemapError::validation(format!(
            "CSV is missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut samples = Vec::new();
    for record in csv_reader.byte_records() {
        let record = csv::StringRecord::from_byte_record_lossy(record?);
        let sample: RawSample = record.deserialize(Some(&headers))?;
        samples.push(sample);
    }

    tracing::debug!(rows = samples.len(), "Read raw samples");
    Ok(samples)
}

/// Read raw samples from a CSV file on disk.
pub fn load_samples(path: &Path) -> GazemapResult<Vec<RawSample>> {
    if !path.exists() {
        return Err(GazemapError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path)?;
    read_samples(std::io::BufReader::new(file))
}
