use phonefix_types::geo::{LatLon, TerritoryIndex};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const SZEGED: LatLon = LatLon {
    lat: 46.25,
    lon: 20.15,
};

pub const BERLIN: LatLon = LatLon {
    lat: 52.5,
    lon: 13.4,
};

struct Area {
    code: &'static str,
    lat: (f64, f64),
    lon: (f64, f64),
}

// `EU` is listed first and covers both countries.
const AREAS: &[Area] = &[
    Area {
        code: "EU",
        lat: (34.0, 71.0),
        lon: (-25.0, 45.0),
    },
    Area {
        code: "DE-BY",
        lat: (47.3, 50.6),
        lon: (8.9, 13.9),
    },
    Area {
        code: "DE",
        lat: (47.3, 55.1),
        lon: (5.9, 15.0),
    },
    Area {
        code: "HU",
        lat: (45.7, 48.6),
        lon: (16.1, 22.9),
    },
];

/// Bounding-box territories. Counts `contains` calls so tests can observe caching.
#[derive(Debug, Default)]
pub struct FixtureTerritories {
    lookups: AtomicUsize,
}

impl FixtureTerritories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl TerritoryIndex for FixtureTerritories {
    fn known_codes(&self) -> Vec<String> {
        AREAS.iter().map(|a| a.code.to_string()).collect()
    }

    fn contains(&self, code: &str, at: LatLon) -> bool {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        AREAS.iter().any(|a| {
            a.code == code
                && (a.lat.0..=a.lat.1).contains(&at.lat)
                && (a.lon.0..=a.lon.1).contains(&at.lon)
        })
    }
}
