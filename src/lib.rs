//! Turns a recorded GPS track into the data a route poster needs: a cleaned
//! polyline, a bounded set of display coordinates, and distance, elevation
//! and pace figures.
//!
//! ```no_run
//! use gpx_poster::{prepare_from_path, CleaningConfig};
//! use std::path::Path;
//!
//! let data = prepare_from_path(Path::new("run.gpx"), Some("01:45:00"), &CleaningConfig::default())?;
//! println!("{:.2} km at {}/km", data.stats.total_distance_km, data.stats.pace.display());
//! # Ok::<(), gpx_poster::PosterError>(())
//! ```

pub mod cleaner;
pub mod config;
pub mod downsample;
pub mod error;
pub mod geodesic;
pub mod gpx_reader;
pub mod pipeline;
pub mod race;
pub mod stats;
pub mod track;

pub use cleaner::clean_track;
pub use config::{CleaningConfig, ComparisonBasis, ElevationRounding};
pub use downsample::{display_track, downsample};
pub use error::{DurationError, PosterError};
pub use geodesic::haversine_m;
pub use gpx_reader::{read_raw_track, read_raw_track_from_path};
pub use pipeline::{prepare, prepare_from_path, PosterData};
pub use race::RaceDistance;
pub use stats::{PaceOutcome, TrackStatistics};
pub use track::{CleanedTrack, DisplayTrack, RawTrack, TrackPoint};
