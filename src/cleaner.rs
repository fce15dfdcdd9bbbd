//! Speed-plausibility filter.
//!
//! GPS receivers that lose their fix tend to report a point far away from
//! the previous one with little or no time in between. Any step implying a
//! speed above the configured cap is dropped. The first raw point is always
//! kept as the anchor, even if it is itself a stray fix.

use log::{debug, warn};
use rayon::prelude::*;

use crate::config::{CleaningConfig, ComparisonBasis};
use crate::error::PosterError;
use crate::geodesic::haversine_m;
use crate::track::{CleanedTrack, TrackPoint};

/// Fewest raw points a track may have.
pub const MIN_RAW_POINTS: usize = 2;

/// Seconds from `a` to `b`, or `fallback` if either timestamp is missing.
fn elapsed_s(a: &TrackPoint, b: &TrackPoint, fallback: f64) -> f64 {
    match (a.timestamp, b.timestamp) {
        (Some(t1), Some(t2)) => (t2 - t1).num_milliseconds() as f64 / 1000.0,
        _ => fallback,
    }
}

/// Returns the step length in meters if `to` is a plausible successor of `from`.
fn plausible_step(from: &TrackPoint, to: &TrackPoint, config: &CleaningConfig) -> Option<f64> {
    let dt = elapsed_s(from, to, config.min_dt_s);
    let dist = haversine_m(from.point(), to.point());

    if dt >= config.min_dt_s && dist / dt <= config.max_speed_m_s {
        Some(dist)
    } else {
        None
    }
}

/// Runs the filter over `raw` as one uninterrupted scan.
pub fn clean_track(raw: &[TrackPoint], config: &CleaningConfig) -> Result<CleanedTrack, PosterError> {
    if raw.len() < MIN_RAW_POINTS {
        return Err(PosterError::InsufficientData {
            found: raw.len(),
            required: MIN_RAW_POINTS,
        });
    }

    let cleaned = match config.gap_split_s {
        Some(gap_s) => clean_partitioned(raw, gap_s, config),
        None => scan(raw, config),
    };

    debug!(
        "cleaned track: {} of {} points kept, {:.1}m",
        cleaned.len(),
        raw.len(),
        cleaned.distance_m
    );
    if cleaned.is_degenerate() {
        warn!(
            "all {} points after the first were rejected by the speed filter",
            raw.len() - 1
        );
    }

    Ok(cleaned)
}

/// Sequential filter. `raw` must be non-empty.
fn scan(raw: &[TrackPoint], config: &CleaningConfig) -> CleanedTrack {
    let mut points = Vec::with_capacity(raw.len());
    points.push(raw[0].clone());
    let mut distance_m = 0.0;
    let mut reference = 0;

    for i in 1..raw.len() {
        let candidate = &raw[i];

        if config.comparison_basis == ComparisonBasis::RawPredecessor {
            reference = i - 1;
        }

        if let Some(dist) = plausible_step(&raw[reference], candidate, config) {
            points.push(candidate.clone());
            distance_m += dist;
            reference = i;
        }
    }

    let rejected = raw.len() - points.len();
    CleanedTrack {
        points,
        distance_m,
        rejected,
    }
}

/// Splits `raw` wherever two consecutive timestamps are more than `gap_s`
/// seconds apart. Points without a timestamp never start a new chunk.
pub fn split_on_time_gaps(raw: &[TrackPoint], gap_s: f64) -> Vec<&[TrackPoint]> {
    let mut chunks = Vec::new();
    let mut start = 0;

    for i in 1..raw.len() {
        if let (Some(t1), Some(t2)) = (raw[i - 1].timestamp, raw[i].timestamp) {
            let dt = (t2 - t1).num_milliseconds() as f64 / 1000.0;
            if dt > gap_s {
                chunks.push(&raw[start..i]);
                start = i;
            }
        }
    }
    if start < raw.len() {
        chunks.push(&raw[start..]);
    }

    chunks
}

/// Cleans each time-gap chunk independently and concatenates the results in
/// order. Every chunk keeps its own first point; distance across a gap is not
/// counted.
fn clean_partitioned(raw: &[TrackPoint], gap_s: f64, config: &CleaningConfig) -> CleanedTrack {
    let chunks = split_on_time_gaps(raw, gap_s);
    debug!("split track into {} chunk(s) on gaps over {gap_s}s", chunks.len());

    let pieces: Vec<CleanedTrack> = chunks.par_iter().map(|chunk| scan(chunk, config)).collect();

    pieces.into_iter().fold(
        CleanedTrack {
            points: Vec::with_capacity(raw.len()),
            distance_m: 0.0,
            rejected: 0,
        },
        |mut acc, piece| {
            acc.points.extend(piece.points);
            acc.distance_m += piece.distance_m;
            acc.rejected += piece.rejected;
            acc
        },
    )
}
