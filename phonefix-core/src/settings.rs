//! Host-agnostic settings for the check and fix pipelines.

/// Settings shared by every pipeline entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSettings {
    /// Prefer the `contact:` scheme for every feature.
    pub force_contact_scheme: bool,

    /// Mark separator and aggregate issues as fixable without review.
    pub autofix: bool,

    /// Region used when a feature has neither a region nor a resolvable center.
    pub default_region: Option<String>,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            force_contact_scheme: true,
            autofix: false,
            default_region: None,
        }
    }
}

/// Explicit values that win over file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub force_contact_scheme: Option<bool>,
    pub autofix: Option<bool>,
    pub default_region: Option<String>,
}

impl CheckSettings {
    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(force) = overrides.force_contact_scheme {
            self.force_contact_scheme = force;
        }
        if let Some(autofix) = overrides.autofix {
            self.autofix = autofix;
        }
        if overrides.default_region.is_some() {
            self.default_region = overrides.default_region;
        }
        self
    }
}
