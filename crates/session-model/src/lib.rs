//! Gazemap Session Model
//!
//! Defines the core data contracts for eye-tracking sessions:
//! - **Samples:** Raw CSV rows and their canonical numeric form
//! - **Frame:** The fixed canvas all renderings target, and the
//!   recorder-to-canvas transform
//! - **Sessions:** Percentage-weighted sub-sessions of one recording
//! - **Artifacts:** Rendered images and the result manifest that lists them
//! - **Recorder log:** Conversion of raw NDJSON tracker logs into the CSV schema
//!
//! Canvas coordinates span `(0, 0)`–`(1920, 1080)` with `y` growing upward.

pub mod artifact;
pub mod frame;
pub mod manifest;
pub mod recorder_log;
pub mod sample;
pub mod session;

pub use artifact::*;
pub use frame::*;
pub use manifest::*;
pub use sample::*;
pub use session::*;
