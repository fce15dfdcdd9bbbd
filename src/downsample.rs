use geo::Coord;

use crate::track::{CleanedTrack, DisplayTrack};

/// Keeps every `n`th coordinate, starting with the first, where
/// `n = len / max_points + 1`. Inputs at or under `max_points` pass through.
pub fn downsample(coords: &[Coord<f64>], max_points: usize) -> Vec<Coord<f64>> {
    if max_points == 0 || coords.len() <= max_points {
        return coords.to_vec();
    }

    let step = coords.len() / max_points + 1;
    coords.iter().step_by(step).copied().collect()
}

/// Rendering-only view of a cleaned track.
pub fn display_track(cleaned: &CleanedTrack, max_points: usize) -> DisplayTrack {
    DisplayTrack(downsample(&cleaned.coords(), max_points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Coord<f64>> {
        (0..n)
            .map(|i| Coord {
                x: i as f64 * 1e-5,
                y: 48.0,
            })
            .collect()
    }

    #[test]
    fn test_short_track_unchanged() {
        let coords = line(2000);
        assert_eq!(downsample(&coords, 2000), coords);
        assert_eq!(downsample(&coords[..3], 2000), coords[..3].to_vec());
    }

    #[test]
    fn test_stride() {
        let coords = line(2001);
        let out = downsample(&coords, 2000);
        // step of 2 keeps indices 0, 2, ..., 2000
        assert_eq!(out.len(), 1001);
        assert_eq!(out[0], coords[0]);
        assert_eq!(out[1], coords[2]);
        assert_eq!(*out.last().unwrap(), coords[2000]);
    }

    #[test]
    fn test_bound_holds_for_many_sizes() {
        for n in [2001, 3999, 4000, 4001, 10_000, 123_457] {
            let out = downsample(&line(n), 2000);
            assert!(out.len() <= 2001, "{n} points gave {}", out.len());
            assert!(!out.is_empty());
        }
    }
}
