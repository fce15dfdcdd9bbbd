use log::{debug, warn};
use serde::Serialize;
use std::path::Path;

use crate::cleaner::clean_track;
use crate::config::CleaningConfig;
use crate::downsample::display_track;
use crate::error::PosterError;
use crate::gpx_reader::read_raw_track_from_path;
use crate::stats::{PaceOutcome, TrackStatistics};
use crate::track::{CleanedTrack, DisplayTrack, TrackPoint};

/// What the layout and renderer receive for one poster.
#[derive(Debug, Clone, Serialize)]
pub struct PosterData {
    #[serde(skip)]
    pub cleaned: CleanedTrack,
    pub display: DisplayTrack,
    pub stats: TrackStatistics,
}

/// clean → aggregate → down-sample. Fails only when the geometry is
/// unusable; a bad duration degrades the pace field instead.
pub fn prepare(
    raw: &[TrackPoint],
    duration: Option<&str>,
    config: &CleaningConfig,
) -> Result<PosterData, PosterError> {
    config.validate()?;

    let cleaned = clean_track(raw, config)?;
    let display = display_track(&cleaned, config.max_display_points);
    let stats = TrackStatistics::compute(&cleaned, raw.len(), display.len(), duration, config);

    if let PaceOutcome::Degraded(reason) = &stats.pace {
        if duration.is_some() {
            warn!("pace unavailable: {reason:?}");
        }
    }
    debug!(
        "{:.2}km, {} display points, elevation {}",
        stats.total_distance_km,
        display.len(),
        if stats.has_elevation() { "present" } else { "absent" }
    );

    Ok(PosterData {
        cleaned,
        display,
        stats,
    })
}

pub fn prepare_from_path(
    path: &Path,
    duration: Option<&str>,
    config: &CleaningConfig,
) -> Result<PosterData, PosterError> {
    let raw = read_raw_track_from_path(path)?;
    prepare(&raw, duration, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComparisonBasis;
    use chrono::{Duration, TimeZone, Utc};

    fn straight_run(n: usize) -> Vec<TrackPoint> {
        let t0 = Utc.with_ymd_and_hms(2024, 4, 21, 9, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                TrackPoint::new(16.0, 48.0 + i as f64 * 0.00003)
                    .with_elevation(150.0 + (i % 10) as f64)
                    .with_timestamp(t0 + Duration::seconds(i as i64))
            })
            .collect()
    }

    #[test]
    fn test_insufficient_data_aborts() {
        let raw = straight_run(1);
        assert!(matches!(
            prepare(&raw, None, &CleaningConfig::default()),
            Err(PosterError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_invalid_config_aborts() {
        let config = CleaningConfig {
            max_display_points: 0,
            ..CleaningConfig::default()
        };
        assert!(matches!(
            prepare(&straight_run(10), None, &config),
            Err(PosterError::Config(_))
        ));
    }

    #[test]
    fn test_display_does_not_change_stats() {
        let raw = straight_run(5000);
        let full = prepare(&raw, Some("00:30:00"), &CleaningConfig::default()).unwrap();
        let small = prepare(
            &raw,
            Some("00:30:00"),
            &CleaningConfig {
                max_display_points: 100,
                ..CleaningConfig::default()
            },
        )
        .unwrap();

        assert_eq!(full.cleaned.len(), 5000);
        assert!(full.display.len() <= 2001);
        assert!(small.display.len() <= 101);
        assert_eq!(full.stats.total_distance_km, small.stats.total_distance_km);
        assert_eq!(full.stats.elevation, small.stats.elevation);
        assert_eq!(full.stats.pace, small.stats.pace);
        assert_eq!(small.stats.point_counts.display, small.display.len());
    }

    #[test]
    fn test_bad_duration_does_not_abort() {
        let data = prepare(&straight_run(20), Some("bad"), &CleaningConfig::default()).unwrap();
        assert_eq!(data.stats.pace.display(), "00:00");
        assert_eq!(data.stats.duration_s, None);
        assert_eq!(data.stats.average_speed_kmh, None);
    }

    #[test]
    fn test_basis_choice_is_respected() {
        let config = CleaningConfig {
            comparison_basis: ComparisonBasis::RawPredecessor,
            ..CleaningConfig::default()
        };
        let data = prepare(&straight_run(50), None, &config).unwrap();
        assert_eq!(data.cleaned.rejected, 0);
        assert_eq!(data.display.first(), Some(data.cleaned.points[0].coord()));
    }
}
