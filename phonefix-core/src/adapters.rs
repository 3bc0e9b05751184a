//! Default port implementations.

use crate::load::{LoadedFeatureFile, load_feature_files};
use crate::ports::{ChangeSink, FeatureSource};
use anyhow::Context;
use camino::Utf8PathBuf;
use parking_lot::Mutex;
use phonefix_types::tags::{Feature, TagChange};

/// Loads `*.json` feature arrays from a directory.
#[derive(Debug, Clone)]
pub struct JsonFeatureSource {
    pub dir: Utf8PathBuf,
}

impl JsonFeatureSource {
    pub fn new(dir: Utf8PathBuf) -> Self {
        Self { dir }
    }
}

impl FeatureSource for JsonFeatureSource {
    fn load_features(&self) -> anyhow::Result<Vec<LoadedFeatureFile>> {
        load_feature_files(&self.dir).with_context(|| format!("load features from {}", self.dir))
    }
}

/// In-memory feature source for embedding and testing.
///
/// Presents all features as one successfully loaded file.
#[derive(Debug, Clone)]
pub struct InMemoryFeatureSource {
    features: Vec<Feature>,
}

impl InMemoryFeatureSource {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

impl FeatureSource for InMemoryFeatureSource {
    fn load_features(&self) -> anyhow::Result<Vec<LoadedFeatureFile>> {
        Ok(vec![LoadedFeatureFile {
            path: Utf8PathBuf::from("<memory>"),
            features: Ok(self.features.clone()),
        }])
    }
}

/// Collects every change it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingChangeSink {
    changes: Mutex<Vec<TagChange>>,
}

impl RecordingChangeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> Vec<TagChange> {
        self.changes.lock().clone()
    }
}

impl ChangeSink for RecordingChangeSink {
    fn replace_tags(&self, change: &TagChange) -> anyhow::Result<()> {
        self.changes.lock().push(change.clone());
        Ok(())
    }
}
