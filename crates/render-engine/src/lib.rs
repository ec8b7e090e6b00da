//! Gazemap Render Engine
//!
//! Turns analyzed sessions into images and keeps track of them.
//!
//! # Pipeline Architecture
//!
//! ```text
//! samples.csv ── validate ── normalize ── split ──┐
//!                                                  │  per session
//!                        ┌─────────────────────────┤
//!                        ▼                         ▼
//!                  cluster + scan path       pupil field
//!                        │                         │
//! background.png ──► RenderContext ◄───────────────┘
//!                        │
//!                        ▼
//!                 ArtifactStore (PNG) ── latest_results.json ── sweep
//! ```

pub mod canvas;
pub mod colormap;
pub mod fixation_map;
pub mod pipeline;
pub mod pupil_heatmap;
pub mod store;
pub mod text;

pub use pipeline::{RenderPipeline, RenderRequest};
pub use store::{ArtifactStore, SweepReport};
