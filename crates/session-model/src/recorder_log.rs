//! Conversion of raw tracker logs into the recording CSV schema.
//!
//! The tracker emits newline-delimited JSON. Each line is either a heartbeat
//! or a frame event of the shape:
//!
//! ```json
//! {"category":"tracker","values":{"frame":{
//!     "timestamp":"...","time":123,"fix":true,
//!     "avg":{"x":0,"y":0},
//!     "lefteye":{"avg":{..},"pcenter":{..},"psize":0},
//!     "righteye":{"avg":{..},"pcenter":{..},"psize":0}}}}
//! ```
//!
//! Frames become CSV rows with the full 15-column layout below. Missing
//! fields become empty cells, which ingest later coerces to zero.

use std::io::{BufRead, Write};
use std::path::Path;

use gazemap_common::error::{GazemapError, GazemapResult};
use serde::Serialize;
use serde_json::Value;

/// Column order of converted recordings.
pub const CSV_COLUMNS: [&str; 15] = [
    "timestamp",
    "time",
    "fixation",
    "avg_x",
    "avg_y",
    "left_avg_x",
    "left_avg_y",
    "left_pcenter_x",
    "left_pcenter_y",
    "left_psize",
    "right_avg_x",
    "right_avg_y",
    "right_pcenter_x",
    "right_pcenter_y",
    "right_psize",
];

/// One converted frame. Field order matches [`CSV_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecorderRow {
    pub timestamp: String,
    pub time: String,
    pub fixation: String,
    pub avg_x: String,
    pub avg_y: String,
    pub left_avg_x: String,
    pub left_avg_y: String,
    pub left_pcenter_x: String,
    pub left_pcenter_y: String,
    pub left_psize: String,
    pub right_avg_x: String,
    pub right_avg_y: String,
    pub right_pcenter_x: String,
    pub right_pcenter_y: String,
    pub right_psize: String,
}

/// Classification of a single log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderLine {
    Frame(Box<RecorderRow>),
    Heartbeat,
    Blank,
}

/// Counters reported after a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConvertReport {
    pub rows_written: usize,
    pub heartbeats_skipped: usize,
    pub invalid_lines: usize,
}

/// Parse one log line.
///
/// Lines that are not JSON objects are reported as errors so the caller can
/// decide whether to skip them.
pub fn parse_line(line: &str) -> Result<RecorderLine, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(RecorderLine::Blank);
    }

    let data: Value = serde_json::from_str(trimmed)?;
    if !data.is_object() {
        return Err(<serde_json::Error as serde::de::Error>::custom(
            "log line is not a JSON object",
        ));
    }
    if data.get("category").and_then(Value::as_str) == Some("heartbeat") {
        return Ok(RecorderLine::Heartbeat);
    }

    let frame = data.pointer("/values/frame").unwrap_or(&Value::Null);
    let field = |path: &str| cell(frame.pointer(path));

    Ok(RecorderLine::Frame(Box::new(RecorderRow {
        timestamp: field("/timestamp"),
        time: field("/time"),
        fixation: field("/fix"),
        avg_x: field("/avg/x"),
        avg_y: field("/avg/y"),
        left_avg_x: field("/lefteye/avg/x"),
        left_avg_y: field("/lefteye/avg/y"),
        left_pcenter_x: field("/lefteye/pcenter/x"),
        left_pcenter_y: field("/lefteye/pcenter/y"),
        left_psize: field("/lefteye/psize"),
        right_avg_x: field("/righteye/avg/x"),
        right_avg_y: field("/righteye/avg/y"),
        right_pcenter_x: field("/righteye/pcenter/x"),
        right_pcenter_y: field("/righteye/pcenter/y"),
        right_psize: field("/righteye/psize"),
    })))
}

/// Convert an NDJSON log into CSV, writing a header first.
pub fn convert<R: BufRead, W: Write>(reader: R, writer: W) -> GazemapResult<ConvertReport> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(CSV_COLUMNS)?;

    let mut report = ConvertReport::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Ok(RecorderLine::Frame(row)) => {
                csv_writer.serialize(&*row)?;
                report.rows_written += 1;
            }
            Ok(RecorderLine::Heartbeat) => report.heartbeats_skipped += 1,
            Ok(RecorderLine::Blank) => {}
            Err(e) => {
                tracing::warn!(
                    line = index + 1,
                    error = %e,
                    "Skipping invalid JSON line: {}",
                    line.trim()
                );
                report.invalid_lines += 1;
            }
        }
    }

    csv_writer.flush()?;
    Ok(report)
}

/// Convert the log at `input` into a CSV file at `output` (created or truncated).
pub fn convert_file(input: &Path, output: &Path) -> GazemapResult<ConvertReport> {
    if !input.exists() {
        return Err(GazemapError::FileNotFound {
            path: input.to_path_buf(),
        });
    }
    let reader = std::io::BufReader::new(std::fs::File::open(input)?);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = std::io::BufWriter::new(std::fs::File::create(output)?);
    let report = convert(reader, writer)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        rows = report.rows_written,
        heartbeats = report.heartbeats_skipped,
        invalid = report.invalid_lines,
        "Converted recorder log"
    );
    Ok(report)
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = r#"{"category":"tracker","values":{"frame":{"timestamp":"2024-05-01 10:00:00.000","time":1714557600000,"fix":true,"avg":{"x":512.5,"y":300},"lefteye":{"avg":{"x":510,"y":298},"pcenter":{"x":0.4,"y":0.5},"psize":21.5},"righteye":{"avg":{"x":515,"y":302},"pcenter":{"x":0.6,"y":0.5},"psize":22.5}}}}"#;

    #[test]
    fn test_parse_frame_line() {
        let RecorderLine::Frame(row) = parse_line(FRAME).unwrap() else {
            panic!("expected frame");
        };
        assert_eq!(row.timestamp, "2024-05-01 10:00:00.000");
        assert_eq!(row.fixation, "true");
        assert_eq!(row.avg_x, "512.5");
        assert_eq!(row.avg_y, "300");
        assert_eq!(row.left_pcenter_x, "0.4");
        assert_eq!(row.right_psize, "22.5");
    }

    #[test]
    fn test_parse_heartbeat_and_blank() {
        assert_eq!(
            parse_line(r#"{"category":"heartbeat","values":{}}"#).unwrap(),
            RecorderLine::Heartbeat
        );
        assert_eq!(parse_line("   ").unwrap(), RecorderLine::Blank);
    }

    #[test]
    fn test_parse_missing_fields_become_empty() {
        let RecorderLine::Frame(row) =
            parse_line(r#"{"category":"tracker","values":{"frame":{"fix":false}}}"#).unwrap()
        else {
            panic!("expected frame");
        };
        assert_eq!(row.fixation, "false");
        assert_eq!(row.avg_x, "");
        assert_eq!(row.left_psize, "");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(parse_line("{not json").is_err());
        assert!(parse_line("42").is_err());
    }

    #[test]
    fn test_convert_counts_and_header() {
        let log = format!(
            "{FRAME}\n{{\"category\":\"heartbeat\"}}\n{{broken\n\n{FRAME}\n"
        );
        let mut out = Vec::new();
        let report = convert(log.as_bytes(), &mut out).unwrap();

        assert_eq!(
            report,
            ConvertReport {
                rows_written: 2,
                heartbeats_skipped: 1,
                invalid_lines: 1,
            }
        );

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), CSV_COLUMNS.join(","));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_converted_csv_is_readable_as_samples() {
        let mut out = Vec::new();
        convert(format!("{FRAME}\n").as_bytes(), &mut out).unwrap();

        let samples = crate::sample::read_samples(out.as_slice()).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].fixation.as_deref(), Some("true"));
        assert_eq!(samples[0].left_psize.as_deref(), Some("21.5"));
    }
}
