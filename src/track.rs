use chrono::{DateTime, Utc};
use csv::Writer;
use geo::{point, Coord, Point};
use serde::Serialize;
use std::io::Write;

use crate::error::PosterError;

/// A single GPS sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPoint {
    pub longitude: f64,
    pub latitude: f64,
    /// Meters; `None` if the device did not record it.
    pub elevation: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl TrackPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            elevation: None,
            timestamp: None,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn point(&self) -> Point<f64> {
        point!(x: self.longitude, y: self.latitude)
    }

    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

/// Points in the order the device recorded them. Duplicates are allowed.
pub type RawTrack = Vec<TrackPoint>;

/// Ordered subsequence of a raw track that passed the speed filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedTrack {
    pub points: Vec<TrackPoint>,
    /// Sum of the distances of every accepted step, in meters.
    pub distance_m: f64,
    pub rejected: usize,
}

impl CleanedTrack {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Only the anchor survived filtering.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() <= 1
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    pub fn coords(&self) -> Vec<Coord<f64>> {
        self.points.iter().map(TrackPoint::coord).collect()
    }
}

/// Coordinates only, bounded in length, for drawing the route line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayTrack(pub Vec<Coord<f64>>);

impl DisplayTrack {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Coord<f64>> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<Coord<f64>> {
        self.0.last().copied()
    }

    /// Writes `lon,lat` rows with a header line.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<(), PosterError> {
        let mut wtr = Writer::from_writer(out);
        wtr.write_record(["lon", "lat"])?;
        for c in &self.0 {
            wtr.write_record([c.x.to_string(), c.y.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_point() {
        let p = TrackPoint::new(16.37, 48.21).with_elevation(171.0);
        assert_eq!(p.point().x(), 16.37);
        assert_eq!(p.point().y(), 48.21);
        assert_eq!(p.elevation, Some(171.0));
        assert!(p.timestamp.is_none());
    }

    #[test]
    fn test_display_csv() {
        let display = DisplayTrack(vec![Coord { x: 1.5, y: 2.0 }, Coord { x: -3.0, y: 4.25 }]);
        let mut buf = Vec::new();
        display.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "lon,lat\n1.5,2\n-3,4.25\n");
    }

    #[test]
    fn test_degenerate_track() {
        let track = CleanedTrack {
            points: vec![TrackPoint::new(0.0, 0.0)],
            distance_m: 0.0,
            rejected: 3,
        };
        assert!(track.is_degenerate());
        assert_eq!(track.distance_km(), 0.0);
    }
}
