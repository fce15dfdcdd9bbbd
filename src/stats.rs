//! Poster statistics: distance, elevation profile and pace.
//!
//! A field that cannot be derived is reported as absent or as a typed
//! degraded value. Nothing in here fails the pipeline.

use serde::Serialize;
use std::fmt;

use crate::config::{CleaningConfig, ElevationRounding};
use crate::error::DurationError;
use crate::track::{CleanedTrack, TrackPoint};

/// What the renderer prints when pace is unavailable.
pub const PACE_PLACEHOLDER: &str = "00:00";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElevationSummary {
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub total_ascent_m: u32,
    pub total_descent_m: u32,
}

/// Sums positive and negative steps over the points that carry an
/// elevation, skipping those that don't. `None` if no point has one.
pub fn elevation_summary(points: &[TrackPoint], rounding: ElevationRounding) -> Option<ElevationSummary> {
    let elevations: Vec<f64> = points.iter().filter_map(|p| p.elevation).collect();
    if elevations.is_empty() {
        return None;
    }

    let (gain, loss) = gain_loss(&elevations);

    Some(ElevationSummary {
        min_elevation: elevations.iter().fold(f64::INFINITY, |a, &b| a.min(b)),
        max_elevation: elevations.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
        total_ascent_m: rounding.apply(gain),
        total_descent_m: rounding.apply(loss),
    })
}

fn gain_loss(elevs: &[f64]) -> (f64, f64) {
    let mut gain = 0.0;
    let mut loss = 0.0;
    for w in elevs.windows(2) {
        let delta = w[1] - w[0];
        if delta > 0.0 {
            gain += delta;
        } else {
            loss += -delta;
        }
    }
    (gain, loss)
}

/// Parses `HH:MM:SS` into seconds. No field is range checked, so `01:75:00`
/// is 8100s; only a total that does not fit in a `u64` is refused.
pub fn parse_duration(text: &str) -> Result<u64, DurationError> {
    let fields: Vec<&str> = text.trim().split(':').collect();
    if fields.len() != 3 {
        return Err(DurationError::FieldCount(fields.len()));
    }

    let mut values = [0u64; 3];
    for (value, field) in values.iter_mut().zip(&fields) {
        *value = field
            .trim()
            .parse::<u64>()
            .map_err(|_| DurationError::NotInteger(field.to_string()))?;
    }
    let [h, m, s] = values;

    h.checked_mul(3600)
        .zip(m.checked_mul(60))
        .and_then(|(h_s, m_s)| h_s.checked_add(m_s))
        .and_then(|hm_s| hm_s.checked_add(s))
        .ok_or_else(|| DurationError::Overflow(text.trim().to_string()))
}

/// Minutes and seconds per kilometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pace {
    pub minutes: u64,
    pub seconds: u64,
}

impl Pace {
    /// Floors both the minutes and the remaining seconds.
    pub fn from_seconds_per_km(seconds_per_km: f64) -> Self {
        Self {
            minutes: (seconds_per_km / 60.0).floor() as u64,
            seconds: (seconds_per_km % 60.0).floor() as u64,
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceDegradation {
    NoDuration,
    ZeroDistance,
    ZeroDuration,
    MalformedDuration(String),
}

/// Either a computed pace or the reason there isn't one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceOutcome {
    Computed(Pace),
    Degraded(PaceDegradation),
}

impl PaceOutcome {
    pub fn pace(&self) -> Option<Pace> {
        match self {
            PaceOutcome::Computed(pace) => Some(*pace),
            PaceOutcome::Degraded(_) => None,
        }
    }

    /// `MM:SS`, or [`PACE_PLACEHOLDER`] when degraded.
    pub fn display(&self) -> String {
        match self {
            PaceOutcome::Computed(pace) => pace.to_string(),
            PaceOutcome::Degraded(_) => PACE_PLACEHOLDER.to_string(),
        }
    }
}

pub fn pace(duration: Option<&str>, distance_km: f64) -> PaceOutcome {
    let Some(text) = duration else {
        return PaceOutcome::Degraded(PaceDegradation::NoDuration);
    };
    let total_seconds = match parse_duration(text) {
        Ok(s) => s,
        Err(e) => return PaceOutcome::Degraded(PaceDegradation::MalformedDuration(e.to_string())),
    };
    // the input form defaults to 00:00:00
    if total_seconds == 0 {
        return PaceOutcome::Degraded(PaceDegradation::ZeroDuration);
    }
    if !(distance_km > 0.0) {
        return PaceOutcome::Degraded(PaceDegradation::ZeroDistance);
    }

    PaceOutcome::Computed(Pace::from_seconds_per_km(total_seconds as f64 / distance_km))
}

/// km/h rounded to one decimal; `None` for a zero duration.
pub fn average_speed_kmh(total_seconds: u64, distance_km: f64) -> Option<f64> {
    if total_seconds == 0 {
        return None;
    }
    let hours = total_seconds as f64 / 3600.0;
    Some((distance_km / hours * 10.0).round() / 10.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointCounts {
    pub raw: usize,
    pub cleaned: usize,
    pub rejected: usize,
    pub display: usize,
}

/// Everything the layout prints. Built once per cleaned track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackStatistics {
    pub total_distance_km: f64,
    pub elevation: Option<ElevationSummary>,
    pub duration_s: Option<u64>,
    pub pace: PaceOutcome,
    pub average_speed_kmh: Option<f64>,
    pub point_counts: PointCounts,
}

impl TrackStatistics {
    pub fn compute(
        cleaned: &CleanedTrack,
        raw_len: usize,
        display_len: usize,
        duration: Option<&str>,
        config: &CleaningConfig,
    ) -> Self {
        let total_distance_km = cleaned.distance_km();
        let duration_s = duration.and_then(|d| parse_duration(d).ok());

        Self {
            total_distance_km,
            elevation: elevation_summary(&cleaned.points, config.elevation_rounding),
            duration_s,
            pace: pace(duration, total_distance_km),
            average_speed_kmh: duration_s.and_then(|s| average_speed_kmh(s, total_distance_km)),
            point_counts: PointCounts {
                raw: raw_len,
                cleaned: cleaned.len(),
                rejected: cleaned.rejected,
                display: display_len,
            },
        }
    }

    pub fn has_elevation(&self) -> bool {
        self.elevation.is_some()
    }

    pub fn min_elevation(&self) -> Option<f64> {
        self.elevation.map(|e| e.min_elevation)
    }

    pub fn max_elevation(&self) -> Option<f64> {
        self.elevation.map(|e| e.max_elevation)
    }

    pub fn total_ascent_m(&self) -> Option<u32> {
        self.elevation.map(|e| e.total_ascent_m)
    }

    pub fn total_descent_m(&self) -> Option<u32> {
        self.elevation.map(|e| e.total_descent_m)
    }

    /// `MM:SS` pace, absent unless it was actually computed.
    pub fn average_pace_min_per_km(&self) -> Option<String> {
        self.pace.pace().map(|p| p.to_string())
    }
}
