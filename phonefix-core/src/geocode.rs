//! Point-to-region resolution with a small cache of recent hits.

use parking_lot::Mutex;
use phonefix_types::geo::{LatLon, RegionLookup, TerritoryIndex};
use tracing::trace;

/// Pseudo-territory spanning many countries; never a phone region.
const EU: &str = "EU";

/// Resolves points to alpha-2 codes, testing recently matched codes first.
///
/// Neighbouring features usually share a region, so most lookups hit the cache
/// with a single `contains` call.
pub struct CachedRegionLookup<T: TerritoryIndex> {
    index: T,
    alpha2: Vec<String>,
    nearby: Mutex<Vec<String>>,
}

impl<T: TerritoryIndex> CachedRegionLookup<T> {
    pub fn new(index: T) -> Self {
        let mut alpha2: Vec<String> = Vec::new();
        for code in index.known_codes() {
            if code == EU {
                continue;
            }
            let Some(short) = code.get(..2) else {
                continue;
            };
            if !alpha2.iter().any(|c| c == short) {
                alpha2.push(short.to_string());
            }
        }
        Self {
            index,
            alpha2,
            nearby: Mutex::new(Vec::new()),
        }
    }

    pub fn index(&self) -> &T {
        &self.index
    }
}

impl<T: TerritoryIndex> RegionLookup for CachedRegionLookup<T> {
    fn region_for(&self, at: LatLon) -> String {
        // Never hold the lock across index calls.
        let cached = self.nearby.lock().clone();
        if let Some(hit) = cached.iter().find(|c| self.index.contains(c, at)) {
            trace!(region = %hit, "region cache hit");
            return hit.clone();
        }

        let hit = self
            .alpha2
            .iter()
            .filter(|c| !cached.contains(*c))
            .find(|c| self.index.contains(c, at));

        match hit {
            Some(code) => {
                let mut nearby = self.nearby.lock();
                if !nearby.contains(code) {
                    nearby.push(code.clone());
                }
                code.clone()
            }
            None => String::new(),
        }
    }

    fn clear(&self) {
        self.nearby.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonefix_testkit::{BERLIN, FixtureTerritories, SZEGED};

    #[test]
    fn resolves_and_caches() {
        let lookup = CachedRegionLookup::new(FixtureTerritories::new());

        assert_eq!(lookup.region_for(SZEGED), "HU");
        assert_eq!(lookup.index().lookups(), 2);

        assert_eq!(lookup.region_for(SZEGED), "HU");
        assert_eq!(lookup.index().lookups(), 3);
    }

    #[test]
    fn subdivision_codes_collapse_to_country() {
        let lookup = CachedRegionLookup::new(FixtureTerritories::new());
        assert_eq!(lookup.region_for(BERLIN), "DE");
        assert_eq!(lookup.region_for(LatLon::new(48.1, 11.6)), "DE");
    }

    #[test]
    fn cache_does_not_change_results() {
        let lookup = CachedRegionLookup::new(FixtureTerritories::new());
        assert_eq!(lookup.region_for(SZEGED), "HU");
        assert_eq!(lookup.region_for(BERLIN), "DE");
        assert_eq!(lookup.region_for(SZEGED), "HU");
        lookup.clear();
        assert_eq!(lookup.region_for(BERLIN), "DE");
    }

    #[test]
    fn eu_only_point_has_no_region() {
        let lookup = CachedRegionLookup::new(FixtureTerritories::new());
        // Inside the EU box, outside every country box.
        assert_eq!(lookup.region_for(LatLon::new(40.4, -3.7)), "");
        assert_eq!(lookup.region_for(LatLon::new(0.0, 0.0)), "");
    }

    #[test]
    fn clear_forces_full_scan() {
        let lookup = CachedRegionLookup::new(FixtureTerritories::new());
        lookup.region_for(SZEGED);
        lookup.clear();
        let before = lookup.index().lookups();
        lookup.region_for(SZEGED);
        assert_eq!(lookup.index().lookups() - before, 2);
    }
}
