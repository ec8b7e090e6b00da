//! Gazemap CLI: render eye-tracking sessions into fixation maps and pupil
//! heatmaps.
//!
//! Usage:
//!   gazemap render <CSV> [OPTIONS]   Render one recording, optionally split
//!   gazemap results                  Show the latest result manifest
//!   gazemap inspect <CSV>            Print the analysis as JSON
//!   gazemap convert <LOG>            Convert a recorder event log to CSV
//!   gazemap sweep                    Delete expired artifacts
//!   gazemap config                   Show or initialize the config file
//!
//! Exit status is 2 when the input was rejected and 1 for any other failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gazemap_common::config::AppConfig;
use gazemap_common::error::GazemapError;
use gazemap_session_model::session::SessionSpec;

mod commands;

#[derive(Parser)]
#[command(
    name = "gazemap",
    about = "Fixation cluster maps and pupil heatmaps from eye-tracking data",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a sample CSV into a fixation map and a pupil heatmap
    Render {
        /// Sample CSV file
        csv: PathBuf,

        /// Background image (jpg, jpeg or png) for every session
        #[arg(short, long)]
        background: Option<PathBuf>,

        /// Sub-session as PCT or PCT:IMAGE; repeat to split the recording
        #[arg(short, long = "session", value_name = "PCT[:IMAGE]")]
        sessions: Vec<SessionSpec>,

        /// Clustering distance threshold in canvas units
        #[arg(long)]
        distance_threshold: Option<f64>,

        /// Artifact directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Delete artifacts older than this many seconds after rendering
        #[arg(long)]
        retention_secs: Option<u64>,
    },

    /// Show the artifacts produced by the latest render
    Results {
        /// Artifact directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Analyze a sample CSV and print the clusters as JSON
    Inspect {
        /// Sample CSV file
        csv: PathBuf,

        /// Clustering distance threshold in canvas units
        #[arg(long)]
        distance_threshold: Option<f64>,
    },

    /// Convert a newline-delimited JSON recorder log into a sample CSV
    Convert {
        /// Recorder event log
        input: PathBuf,

        /// Output CSV (defaults to the input path with a .csv extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete expired artifacts
    Sweep {
        /// Artifact directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Maximum artifact age in seconds
        #[arg(long)]
        max_age_secs: Option<u64>,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    gazemap_common::logging::init_logging(&logging);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_status(&e))
        }
    }
}

fn run(command: Commands, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Render {
            csv,
            background,
            sessions,
            distance_threshold,
            out,
            retention_secs,
        } => commands::render::run(
            config,
            commands::render::RenderArgs {
                csv,
                background,
                sessions,
                distance_threshold,
                out,
                retention_secs,
            },
        ),
        Commands::Results { out } => commands::results::run(config, out),
        Commands::Inspect {
            csv,
            distance_threshold,
        } => commands::inspect::run(config, csv, distance_threshold),
        Commands::Convert { input, output } => commands::convert::run(input, output),
        Commands::Sweep { out, max_age_secs } => commands::sweep::run(config, out, max_age_secs),
        Commands::Config { init } => commands::config::run(config, init),
    }
}

/// 2 for rejected input, 1 for everything else.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<GazemapError>() {
        Some(e) if e.is_client_error() => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_parses_repeated_sessions() {
        let cli = Cli::parse_from([
            "gazemap",
            "render",
            "data.csv",
            "--session",
            "40:intro.png",
            "-s",
            "60",
            "--distance-threshold",
            "30",
        ]);
        let Commands::Render {
            sessions,
            distance_threshold,
            ..
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(
            sessions,
            vec![SessionSpec::new(40).with_background("intro.png"), SessionSpec::new(60)]
        );
        assert_eq!(distance_threshold, Some(30.0));
    }

    #[test]
    fn test_bad_session_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["gazemap", "render", "a.csv", "--session", "half"]).is_err());
    }

    #[test]
    fn test_exit_status_classes() {
        let client = anyhow::Error::from(GazemapError::validation("bad"));
        assert_eq!(exit_status(&client), 2);

        let wrapped = anyhow::Error::from(GazemapError::FileNotFound {
            path: PathBuf::from("x.csv"),
        })
        .context("render failed");
        assert_eq!(exit_status(&wrapped), 2);

        let server = anyhow::Error::from(GazemapError::artifact("disk full"));
        assert_eq!(exit_status(&server), 1);
        assert_eq!(exit_status(&anyhow::anyhow!("boom")), 1);
    }
}
