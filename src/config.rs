//! Tunables for the cleaning pipeline.
//!
//! Everything the filter, the aggregator and the down-sampler need is carried
//! in one [`CleaningConfig`] value that is passed in explicitly, so two tracks
//! can be processed with different tolerances side by side.

use crate::error::PosterError;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

/// Speed cap in m/s (36 km/h).
pub const MAX_SPEED_M_S: f64 = 10.0;
/// Smallest time step in seconds; also the stand-in when a timestamp is missing.
pub const MIN_DT_S: f64 = 1.0;
/// Upper bound on points handed to the renderer.
pub const MAX_PTS_DISPLAY: usize = 2000;

/// Which point a candidate is measured against in the speed filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonBasis {
    /// The candidate's immediate predecessor in the raw track, accepted or not.
    /// Reproduces legacy poster output.
    RawPredecessor,
    /// The most recently accepted point, so every consecutive pair of the
    /// cleaned track is within the speed cap.
    #[default]
    LastAccepted,
}

/// How fractional ascent/descent totals become whole meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationRounding {
    #[default]
    Truncate,
    Round,
}

impl ElevationRounding {
    pub fn apply(self, meters: f64) -> u32 {
        match self {
            ElevationRounding::Truncate => meters.trunc() as u32,
            ElevationRounding::Round => meters.round() as u32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub max_speed_m_s: f64,
    pub min_dt_s: f64,
    pub max_display_points: usize,
    pub comparison_basis: ComparisonBasis,
    pub elevation_rounding: ElevationRounding,
    /// Split the track where consecutive timestamps are further apart than
    /// this many seconds and clean the pieces in parallel.
    pub gap_split_s: Option<f64>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            max_speed_m_s: MAX_SPEED_M_S,
            min_dt_s: MIN_DT_S,
            max_display_points: MAX_PTS_DISPLAY,
            comparison_basis: ComparisonBasis::default(),
            elevation_rounding: ElevationRounding::default(),
            gap_split_s: None,
        }
    }
}

impl CleaningConfig {
    pub fn from_json_path(path: &Path) -> Result<Self, PosterError> {
        let reader = BufReader::new(File::open(path)?);
        let config: CleaningConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PosterError> {
        if !(self.max_speed_m_s.is_finite() && self.max_speed_m_s > 0.0) {
            return Err(PosterError::Config(format!(
                "max_speed_m_s must be a positive number, got {}",
                self.max_speed_m_s
            )));
        }
        if !(self.min_dt_s.is_finite() && self.min_dt_s > 0.0) {
            return Err(PosterError::Config(format!(
                "min_dt_s must be a positive number, got {}",
                self.min_dt_s
            )));
        }
        if self.max_display_points == 0 {
            return Err(PosterError::Config(
                "max_display_points must be at least 1".to_string(),
            ));
        }
        if let Some(gap) = self.gap_split_s {
            if !(gap.is_finite() && gap > 0.0) {
                return Err(PosterError::Config(format!(
                    "gap_split_s must be a positive number, got {gap}"
                )));
            }
        }
        Ok(())
    }
}
