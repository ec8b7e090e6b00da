//! Percentage-weighted sub-sessions of a single recording.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Caller request for one sub-session: a share of the recording and an
/// optional background image to render it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSpec {
    /// Share of the recording, in whole percent.
    pub percentage: u32,

    /// Background image for this session only.
    #[serde(default)]
    pub background: Option<PathBuf>,
}

impl SessionSpec {
    pub fn new(percentage: u32) -> Self {
        Self {
            percentage,
            background: None,
        }
    }

    pub fn with_background(mut self, background: impl Into<PathBuf>) -> Self {
        self.background = Some(background.into());
        self
    }
}

/// Parses `PCT` or `PCT:IMAGE`, e.g. `40` or `40:slides/intro.png`.
impl FromStr for SessionSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pct, image) = match s.split_once(':') {
            Some((pct, image)) => (pct, Some(image)),
            None => (s, None),
        };

        let percentage = pct
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid session percentage '{pct}'"))?;

        let background = match image.map(str::trim) {
            Some("") | None => None,
            Some(path) => Some(PathBuf::from(path)),
        };

        Ok(Self {
            percentage,
            background,
        })
    }
}
