use approx::assert_relative_eq;
use gpx_poster::{
    haversine_m, prepare, read_raw_track, CleaningConfig, ComparisonBasis, PosterError, TrackPoint,
};

fn gpx_doc(points: &[(f64, f64, Option<f64>, Option<&str>)]) -> String {
    let mut body = String::new();
    for (lon, lat, ele, time) in points {
        body.push_str(&format!("<trkpt lat=\"{lat}\" lon=\"{lon}\">"));
        if let Some(ele) = ele {
            body.push_str(&format!("<ele>{ele}</ele>"));
        }
        if let Some(time) = time {
            body.push_str(&format!("<time>{time}</time>"));
        }
        body.push_str("</trkpt>\n");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
<trk><name>Test</name><trkseg>
{body}</trkseg></trk>
</gpx>"#
    )
}

#[test]
fn teleport_is_removed_from_route_and_distance() {
    let doc = gpx_doc(&[
        (0.0, 0.0, Some(100.0), Some("2024-04-21T09:00:00Z")),
        (0.0, 0.0001, Some(101.0), Some("2024-04-21T09:00:02Z")),
        (0.0, 5.0, Some(900.0), Some("2024-04-21T09:00:03Z")),
        (0.0, 0.0002, Some(100.5), Some("2024-04-21T09:00:04Z")),
    ]);
    let raw = read_raw_track(doc.as_bytes()).unwrap();
    let data = prepare(&raw, Some("00:00:04"), &CleaningConfig::default()).unwrap();

    assert_eq!(data.cleaned.points, vec![raw[0].clone(), raw[1].clone(), raw[3].clone()]);
    let expected_m = haversine_m(raw[0].point(), raw[1].point()) + haversine_m(raw[1].point(), raw[3].point());
    assert_relative_eq!(data.stats.total_distance_km, expected_m / 1000.0);

    // the 900m spike never reaches the elevation totals
    let elevation = data.stats.elevation.unwrap();
    assert_eq!(elevation.max_elevation, 101.0);
    assert_eq!(elevation.total_ascent_m, 1);
    assert_eq!(elevation.total_descent_m, 0);
}

#[test]
fn first_point_is_always_kept() {
    let doc = gpx_doc(&[
        (10.0, 10.0, None, Some("2024-04-21T09:00:00Z")),
        (0.0, 0.0, None, Some("2024-04-21T09:00:01Z")),
        (0.0, 0.00001, None, Some("2024-04-21T09:00:02Z")),
    ]);
    let raw = read_raw_track(doc.as_bytes()).unwrap();
    let data = prepare(&raw, Some("00:10:00"), &CleaningConfig::default()).unwrap();

    assert_eq!(data.cleaned.points[0], raw[0]);
    assert!(data.cleaned.is_degenerate());
    assert_eq!(data.stats.total_distance_km, 0.0);
    assert_eq!(data.stats.pace.display(), "00:00");
    assert!(!data.stats.has_elevation());
    assert_eq!(data.display.len(), 1);
}

#[test]
fn single_point_file_is_rejected() {
    let doc = gpx_doc(&[(16.37, 48.21, Some(170.0), None)]);
    let raw = read_raw_track(doc.as_bytes()).unwrap();
    assert!(matches!(
        prepare(&raw, None, &CleaningConfig::default()),
        Err(PosterError::InsufficientData { found: 1, .. })
    ));
}

#[test]
fn untimed_track_without_elevation() {
    // ~3.3m apart, judged against the 1s stand-in step
    let points: Vec<(f64, f64, Option<f64>, Option<&str>)> =
        (0..30).map(|i| (16.0, 48.0 + i as f64 * 0.00003, None, None)).collect();
    let raw = read_raw_track(gpx_doc(&points).as_bytes()).unwrap();
    let data = prepare(&raw, None, &CleaningConfig::default()).unwrap();

    assert_eq!(data.cleaned.len(), 30);
    assert!(data.stats.elevation.is_none());
    assert_eq!(data.stats.total_ascent_m(), None);
    assert!(data.stats.total_distance_km > 0.09 && data.stats.total_distance_km < 0.1);
}

#[test]
fn long_track_is_downsampled_for_display_only() {
    let raw: Vec<TrackPoint> = (0..4500)
        .map(|i| TrackPoint::new(16.0 + i as f64 * 0.00002, 48.0))
        .collect();
    let config = CleaningConfig {
        comparison_basis: ComparisonBasis::RawPredecessor,
        ..CleaningConfig::default()
    };
    let data = prepare(&raw, Some("00:05:00"), &config).unwrap();

    assert_eq!(data.cleaned.len(), 4500);
    // 4500 / 2000 + 1 = 3
    assert_eq!(data.display.len(), 1500);
    assert_eq!(data.display.first(), Some(raw[0].coord()));
    assert!(data.display.len() <= config.max_display_points + 1);
    assert_eq!(data.stats.point_counts.cleaned, 4500);
}

#[test]
fn payload_serializes_for_renderer() {
    let raw = vec![
        TrackPoint::new(16.0, 48.0).with_elevation(150.0),
        TrackPoint::new(16.0, 48.00003).with_elevation(151.0),
    ];
    let data = prepare(&raw, Some("bad"), &CleaningConfig::default()).unwrap();
    let json = serde_json::to_value(&data).unwrap();

    assert_eq!(json["display"].as_array().unwrap().len(), 2);
    assert_eq!(json["stats"]["elevation"]["total_ascent_m"], 1);
    assert!(json["stats"]["pace"]["degraded"].is_object());
    assert!(json.get("cleaned").is_none());
}
