//! Tolerant loading of feature files from a directory.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use phonefix_types::tags::Feature;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LoadedFeatureFile {
    pub path: Utf8PathBuf,
    pub features: Result<Vec<Feature>, FeatureLoadError>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeatureLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },
}

/// Reads every `*.json` file directly under `dir` as an array of features.
///
/// A file that cannot be read or parsed is returned with its error instead of
/// failing the whole load.
pub fn load_feature_files(dir: &Utf8Path) -> anyhow::Result<Vec<LoadedFeatureFile>> {
    let pattern = dir.join("*.json");
    let pattern_str = pattern.as_str();

    debug!(pattern = %pattern_str, "scanning for feature files");

    let mut out = Vec::new();
    for entry in glob(pattern_str).context("glob *.json")? {
        let path = entry
            .map_err(|e| anyhow::anyhow!("glob error: {e}"))?
            .to_string_lossy()
            .to_string();
        let path = Utf8PathBuf::from(path);

        let features = match fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str::<Vec<Feature>>(&s).map_err(|e| FeatureLoadError::Json {
                message: e.to_string(),
            }),
            Err(e) => Err(FeatureLoadError::Io {
                message: e.to_string(),
            }),
        };

        out.push(LoadedFeatureFile { path, features });
    }

    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, root)
    }

    #[test]
    fn loads_sorted_and_tolerates_bad_files() {
        let (_temp, root) = temp_root();
        std::fs::write(
            root.join("b.json"),
            r#"[{"id":"n2","tags":{"phone":"+36 1 234 5678"},"region":"HU"}]"#,
        )
        .unwrap();
        std::fs::write(root.join("a.json"), "{ not json").unwrap();
        std::fs::write(root.join("notes.txt"), "ignored").unwrap();

        let loaded = load_feature_files(&root).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded[0].path.as_str().ends_with("a.json"));
        assert!(matches!(
            loaded[0].features,
            Err(FeatureLoadError::Json { .. })
        ));

        let features = loaded[1].features.as_ref().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id, "n2");
        assert_eq!(features[0].tags.get("phone"), Some("+36 1 234 5678"));
    }

    #[test]
    fn empty_dir_yields_nothing() {
        let (_temp, root) = temp_root();
        assert!(load_feature_files(&root).unwrap().is_empty());
    }
}
