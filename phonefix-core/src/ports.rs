//! Port traits abstracting all I/O away from the pipeline.

use crate::load::LoadedFeatureFile;
use phonefix_types::tags::TagChange;

/// Source of features to check.
pub trait FeatureSource {
    fn load_features(&self) -> anyhow::Result<Vec<LoadedFeatureFile>>;
}

/// Receives tag replacements. The host applies them as one undoable command each.
pub trait ChangeSink {
    fn replace_tags(&self, change: &TagChange) -> anyhow::Result<()>;
}
