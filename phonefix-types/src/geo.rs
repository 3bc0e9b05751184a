//! Territory contracts supplied by the host.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Raw territory data: which ISO 3166 codes exist and whether a point lies in one.
pub trait TerritoryIndex: Send + Sync {
    /// Known ISO 3166 codes. May include subdivision codes such as `DE-BY`.
    fn known_codes(&self) -> Vec<String>;

    fn contains(&self, code: &str, at: LatLon) -> bool;
}

/// Resolves a point to an ISO 3166-1 alpha-2 code.
pub trait RegionLookup: Send + Sync {
    /// Alpha-2 code of the territory containing `at`, or an empty string.
    fn region_for(&self, at: LatLon) -> String;

    /// Drops any cached state. Safe to call at any time.
    fn clear(&self);
}
