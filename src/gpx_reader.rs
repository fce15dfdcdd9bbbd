//! GPX input.
//!
//! Flattens every track and segment of a GPX document into one raw track.
//! Files that fail strict parsing get a second chance after a few repairs
//! that never touch coordinate, elevation or time values.

use chrono::{DateTime, Utc};
use gpx::{read, Gpx, Time};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use crate::error::PosterError;
use crate::track::{RawTrack, TrackPoint};

pub fn read_raw_track_from_path(path: &Path) -> Result<RawTrack, PosterError> {
    debug!("reading {}", path.display());
    let file = File::open(path)?;
    read_raw_track(BufReader::new(file))
}

pub fn read_raw_track<R: Read>(mut reader: R) -> Result<RawTrack, PosterError> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content)?;

    let gpx = parse_tolerantly(&content)?;
    let raw = extract_track_points(&gpx);
    if raw.is_empty() {
        return Err(PosterError::NoTrack);
    }

    debug!(
        "extracted {} track points ({} with elevation, {} with time)",
        raw.len(),
        raw.iter().filter(|p| p.elevation.is_some()).count(),
        raw.iter().filter(|p| p.timestamp.is_some()).count()
    );
    Ok(raw)
}

fn parse_tolerantly(content: &[u8]) -> Result<Gpx, PosterError> {
    let strict_err = match read(Cursor::new(content)) {
        Ok(gpx) => return Ok(gpx),
        Err(e) => e,
    };
    warn!("strict GPX parsing failed ({strict_err}), retrying with repairs");

    let repaired = apply_minimal_safe_repairs(&String::from_utf8_lossy(content));
    read(Cursor::new(repaired.as_bytes())).map_err(|repair_err| {
        debug!("repaired document still failed: {repair_err}");
        PosterError::Gpx(strict_err)
    })
}

fn apply_minimal_safe_repairs(content: &str) -> String {
    let mut repaired = remove_invalid_xml_chars(content.trim_start_matches('\u{feff}'));

    if !repaired.trim_start().starts_with("<?xml") {
        repaired = format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{repaired}");
    }

    close_unclosed_tags(&repaired)
}

fn close_unclosed_tags(content: &str) -> String {
    let mut repaired = content.trim().to_string();

    if repaired.ends_with("</gpx>") || !repaired.contains("<gpx") {
        return repaired;
    }

    // a truncated file may stop in the middle of a point
    if repaired.matches("<trkpt").count() > repaired.matches("</trkpt>").count() {
        if let Some(last_open) = repaired.rfind("<trkpt") {
            repaired.truncate(last_open);
        }
    }

    let open_trkseg = repaired.matches("<trkseg>").count();
    let close_trkseg = repaired.matches("</trkseg>").count();
    let open_trk = repaired.matches("<trk>").count();
    let close_trk = repaired.matches("</trk>").count();

    for _ in close_trkseg..open_trkseg {
        repaired.push_str("\n</trkseg>");
    }
    for _ in close_trk..open_trk {
        repaired.push_str("\n</trk>");
    }
    repaired.push_str("\n</gpx>");

    repaired
}

fn remove_invalid_xml_chars(content: &str) -> String {
    content
        .chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || ('\u{20}'..='\u{d7ff}').contains(&c)
                || ('\u{e000}'..='\u{fffd}').contains(&c)
                || c >= '\u{10000}'
        })
        .collect()
}

fn extract_track_points(gpx: &Gpx) -> RawTrack {
    let mut raw = Vec::new();

    for track in &gpx.tracks {
        for segment in &track.segments {
            for point in &segment.points {
                raw.push(TrackPoint {
                    longitude: point.point().x(),
                    latitude: point.point().y(),
                    elevation: point.elevation,
                    timestamp: point.time.as_ref().and_then(to_utc),
                });
            }
        }
    }

    raw
}

fn to_utc(time: &Time) -> Option<DateTime<Utc>> {
    let formatted = time.format().ok()?;
    formatted.parse::<DateTime<Utc>>().ok()
}
