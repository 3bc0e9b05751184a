//! Test doubles for the capabilities phonefix consumes.
//!
//! [`FixtureParser`] knows just enough Hungarian and German numbering to drive
//! every branch of the classifier. [`FixtureTerritories`] answers point-in-territory
//! queries from bounding boxes.

mod parser;
mod territories;

pub use parser::FixtureParser;
pub use territories::{BERLIN, FixtureTerritories, SZEGED};

use phonefix_types::tags::{Feature, TagMap};

/// Builds a feature from literal tag pairs, in order.
pub fn feature(id: &str, region: &str, tags: &[(&str, &str)]) -> Feature {
    Feature::new(id, TagMap::from_pairs(tags.iter().copied())).with_region(region)
}
