//! Convert a recorder event log into the sample CSV layout.

use std::path::PathBuf;

use gazemap_session_model::recorder_log::convert_file;

pub fn run(input: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| input.with_extension("csv"));
    if output == input {
        anyhow::bail!("Refusing to overwrite the input log {}", input.display());
    }

    let report = convert_file(&input, &output)?;

    println!("Wrote {} ({} rows)", output.display(), report.rows_written);
    if report.heartbeats_skipped > 0 {
        println!("  Skipped {} heartbeat event(s)", report.heartbeats_skipped);
    }
    if report.invalid_lines > 0 {
        println!("  Skipped {} invalid line(s)", report.invalid_lines);
    }
    Ok(())
}
