//! Batch check, fix and scheme-switch pipelines.
//!
//! These entry points are I/O-agnostic: features arrive through a
//! [`FeatureSource`] and tag replacements leave through a [`ChangeSink`].

use crate::load::LoadedFeatureFile;
use crate::ports::{ChangeSink, FeatureSource};
use crate::settings::CheckSettings;
use anyhow::Context;
use chrono::Utc;
use phonefix_domain::{PhoneTags, issues, switch_to_contact_scheme};
use phonefix_types::geo::RegionLookup;
use phonefix_types::number::NumberParser;
use phonefix_types::report::{
    FeatureReport, InputFailure, PhonefixReport, ReportCounts, ReportRunInfo, ReportStatus,
    ReportToolInfo, ReportVerdict, SkippedFeature,
};
use phonefix_types::tags::{Feature, TagChange};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Error type for pipeline results.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Outcome of `run_check`.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub report: PhonefixReport,

    /// Non-empty changes for every feature that offers a fix, in input order.
    pub changes: Vec<TagChange>,
}

/// Outcome of `run_scheme_switch`.
#[derive(Debug, Clone)]
pub struct SchemeSwitchOutcome {
    /// Number of changes handed to the sink.
    pub applied: usize,

    /// Input files that could not be read or parsed, and were not migrated.
    pub inputs_failed: Vec<InputFailure>,
}

/// Outcome of `run_fix`.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub report: PhonefixReport,

    /// Number of changes handed to the sink.
    pub applied: usize,
}

enum FeatureResult {
    Checked {
        report: Option<FeatureReport>,
        change: Option<TagChange>,
    },
    Skipped(SkippedFeature),
}

/// Region a feature is checked against: its own, else the territory under its
/// center, else the configured default. Empty when none is known.
pub fn resolve_region(
    feature: &Feature,
    settings: &CheckSettings,
    regions: &dyn RegionLookup,
) -> String {
    if !feature.region.is_empty() {
        return feature.region.clone();
    }
    if let Some(center) = feature.center {
        let region = regions.region_for(center);
        if !region.is_empty() {
            return region;
        }
    }
    settings.default_region.clone().unwrap_or_default()
}

fn check_feature(
    feature: &Feature,
    settings: &CheckSettings,
    parser: &dyn NumberParser,
    regions: &dyn RegionLookup,
) -> FeatureResult {
    let mut prepared = feature.clone();
    prepared.region = resolve_region(feature, settings, regions);
    prepared.contact_scheme |= settings.force_contact_scheme;

    let tags = match PhoneTags::analyze(&prepared, parser) {
        Ok(tags) => tags,
        Err(err) => {
            warn!(feature = %feature.id, error = %err, "skipping feature");
            return FeatureResult::Skipped(SkippedFeature {
                feature_id: feature.id.clone(),
                reason: err.to_string(),
            });
        }
    };

    let found = issues(&tags, settings.autofix);
    // A feature whose numbers were all rejected is never emptied.
    let change = tags
        .offers_fix()
        .then(|| tags.tag_change(&feature.tags))
        .filter(|c| !c.is_empty());

    debug!(
        feature = %feature.id,
        region = %prepared.region,
        issues = found.len(),
        fix = change.is_some(),
        "checked feature"
    );

    let report = (!found.is_empty() || change.is_some()).then(|| FeatureReport {
        feature_id: feature.id.clone(),
        region: prepared.region.clone(),
        issues: found,
        diagnostics: tags.diagnostics().clone(),
        proposed_changes: change.as_ref().map(|c| c.changes.clone()).unwrap_or_default(),
    });

    FeatureResult::Checked { report, change }
}

/// Check features that are already in memory.
///
/// Features are analysed in parallel; reports and changes keep input order.
pub fn check_features(
    settings: &CheckSettings,
    features: &[Feature],
    parser: &dyn NumberParser,
    regions: &dyn RegionLookup,
) -> CheckOutcome {
    check(settings, features, Vec::new(), parser, regions)
}

fn check(
    settings: &CheckSettings,
    features: &[Feature],
    inputs_failed: Vec<InputFailure>,
    parser: &dyn NumberParser,
    regions: &dyn RegionLookup,
) -> CheckOutcome {
    let started = Utc::now();

    let results: Vec<FeatureResult> = features
        .par_iter()
        .map(|f| check_feature(f, settings, parser, regions))
        .collect();

    let mut reports = Vec::new();
    let mut skipped = Vec::new();
    let mut changes = Vec::new();
    for result in results {
        match result {
            FeatureResult::Checked { report, change } => {
                reports.extend(report);
                changes.extend(change);
            }
            FeatureResult::Skipped(s) => skipped.push(s),
        }
    }

    let checked = features.len() - skipped.len();
    let verdict = verdict(&reports, &skipped, &inputs_failed, checked);
    let ended = Utc::now();

    info!(
        features = features.len(),
        checked,
        skipped = skipped.len(),
        fixes = changes.len(),
        status = ?verdict.status,
        "check finished"
    );

    let report = PhonefixReport {
        schema: phonefix_types::schema::PHONEFIX_REPORT_V1.to_string(),
        tool: ReportToolInfo {
            name: "phonefix".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        run: ReportRunInfo {
            started_at: started.to_rfc3339(),
            ended_at: Some(ended.to_rfc3339()),
            duration_ms: Some((ended - started).num_milliseconds().max(0) as u64),
        },
        verdict,
        features: reports,
        skipped,
        inputs_failed,
    };

    CheckOutcome { report, changes }
}

fn verdict(
    reports: &[FeatureReport],
    skipped: &[SkippedFeature],
    inputs_failed: &[InputFailure],
    checked: usize,
) -> ReportVerdict {
    let mut counts = ReportCounts::default();
    for issue in reports.iter().flat_map(|r| &r.issues) {
        counts.record(issue.severity);
    }

    let mut reasons = Vec::new();
    if !inputs_failed.is_empty() {
        reasons.push("partial_inputs".to_string());
    }
    if !skipped.is_empty() {
        reasons.push("skipped_features".to_string());
    }

    let status = if counts.error > 0 {
        ReportStatus::Fail
    } else if counts.warn > 0 || !reasons.is_empty() {
        ReportStatus::Warn
    } else if checked == 0 {
        reasons.push("no_features".to_string());
        ReportStatus::Skip
    } else {
        ReportStatus::Pass
    };

    ReportVerdict {
        status,
        counts,
        reasons,
    }
}

/// Splits loaded files into features and per-file failures.
fn partition_inputs(files: Vec<LoadedFeatureFile>) -> (Vec<Feature>, Vec<InputFailure>) {
    let mut features = Vec::new();
    let mut failures = Vec::new();
    for file in files {
        match file.features {
            Ok(mut loaded) => features.append(&mut loaded),
            Err(err) => {
                warn!(path = %file.path, error = %err, "feature file failed to load");
                failures.push(InputFailure {
                    path: file.path.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
    (features, failures)
}

/// Run the check pipeline over every feature the source yields.
///
/// Files that fail to load are reported under `inputs_failed` and mark the
/// verdict with `partial_inputs`; they never abort the run.
pub fn run_check(
    settings: &CheckSettings,
    source: &dyn FeatureSource,
    parser: &dyn NumberParser,
    regions: &dyn RegionLookup,
) -> Result<CheckOutcome, ToolError> {
    let files = source.load_features().context("load features")?;
    let (features, inputs_failed) = partition_inputs(files);
    Ok(check(settings, &features, inputs_failed, parser, regions))
}

/// Check, then hand every offered fix to `sink`, one change per feature.
pub fn run_fix(
    settings: &CheckSettings,
    source: &dyn FeatureSource,
    parser: &dyn NumberParser,
    regions: &dyn RegionLookup,
    sink: &dyn ChangeSink,
) -> Result<FixOutcome, ToolError> {
    let CheckOutcome { report, changes } = run_check(settings, source, parser, regions)?;

    for change in &changes {
        sink.replace_tags(change)
            .with_context(|| format!("replace tags of {}", change.feature_id))?;
    }

    info!(applied = changes.len(), "fixes handed to sink");
    Ok(FixOutcome {
        report,
        applied: changes.len(),
    })
}

/// Move unprefixed contact keys of every feature to the `contact:` scheme.
pub fn run_scheme_switch(
    source: &dyn FeatureSource,
    sink: &dyn ChangeSink,
) -> Result<SchemeSwitchOutcome, ToolError> {
    let files = source.load_features().context("load features")?;
    let (features, inputs_failed) = partition_inputs(files);

    let mut applied = 0;
    for feature in &features {
        let target = switch_to_contact_scheme(&feature.tags);
        let change = TagChange::between(feature.id.clone(), &feature.tags, &target);
        if change.is_empty() {
            continue;
        }
        sink.replace_tags(&change)
            .with_context(|| format!("replace tags of {}", feature.id))?;
        applied += 1;
    }

    info!(
        applied,
        inputs_failed = inputs_failed.len(),
        "contact scheme switch finished"
    );
    Ok(SchemeSwitchOutcome {
        applied,
        inputs_failed,
    })
}
