use camino::Utf8PathBuf;
use phonefix_core::adapters::{InMemoryFeatureSource, JsonFeatureSource, RecordingChangeSink};
use phonefix_core::config::{CONFIG_FILE_NAME, load_or_default};
use phonefix_core::geocode::CachedRegionLookup;
use phonefix_core::pipeline::{check_features, run_check, run_fix, run_scheme_switch};
use phonefix_core::settings::{CheckSettings, SettingsOverrides};
use phonefix_testkit::{BERLIN, FixtureParser, FixtureTerritories, SZEGED, feature};
use phonefix_types::issue::IssueCode;
use phonefix_types::report::ReportStatus;
use phonefix_types::tags::{Feature, Tag};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn temp_root() -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    (temp, root)
}

fn lookup() -> CachedRegionLookup<FixtureTerritories> {
    CachedRegionLookup::new(FixtureTerritories::new())
}

fn write_features(root: &Utf8PathBuf, name: &str, features: &[Feature]) {
    let json = serde_json::to_string_pretty(features).unwrap();
    std::fs::write(root.join(name), json).unwrap();
}

#[test]
fn config_drives_settings_end_to_end() {
    let (_temp, root) = temp_root();
    std::fs::write(
        root.join(CONFIG_FILE_NAME),
        "[scheme]\nforce_contact = false\n\n[region]\ndefault = \"HU\"\n",
    )
    .unwrap();
    write_features(
        &root,
        "shops.json",
        &[feature("n1", "", &[("phone", "06 62 800 800")])],
    );

    let settings = load_or_default(&root).unwrap().into_settings();
    assert_eq!(settings.default_region.as_deref(), Some("HU"));

    let outcome = run_check(
        &settings,
        &JsonFeatureSource::new(root.clone()),
        &FixtureParser::new(),
        &lookup(),
    )
    .unwrap();

    let fr = &outcome.report.features[0];
    assert_eq!(fr.region, "HU");
    assert_eq!(fr.issues[0].message, "not in E.123 format");
    assert_eq!(
        outcome.changes[0].changes,
        vec![Tag::new("phone", "+36 62 800 800")]
    );
}

#[test]
fn region_comes_from_center() {
    let features = vec![
        feature("n1", "", &[("contact:phone", "+36 62 800 800")]).with_center(SZEGED),
        feature("n2", "", &[("contact:phone", "+36 62 800 800")]).with_center(BERLIN),
    ];
    let outcome = check_features(
        &CheckSettings::default(),
        &features,
        &FixtureParser::new(),
        &lookup(),
    );

    // Only the Berlin feature has a foreign number.
    assert_eq!(outcome.report.features.len(), 1);
    let fr = &outcome.report.features[0];
    assert_eq!(fr.feature_id, "n2");
    assert_eq!(fr.region, "DE");
    assert_eq!(fr.issues[0].code, IssueCode::WrongRegion);
    assert_eq!(outcome.report.verdict.status, ReportStatus::Warn);
}

#[test]
fn fixed_features_check_clean() {
    let mut features = vec![
        feature("n1", "HU", &[("phone", "+3662800800, +36 20 920 9000")]),
        feature("n2", "HU", &[("phone", "+36 1 234 5678;+36 1 234 5678"), ("fax", "+36 62 800 800")]),
        feature("n3", "DE", &[("mobile", "+49 151 23456789"), ("phone_2", "+49 30 1234567")]),
    ];
    let parser = FixtureParser::new();
    let regions = lookup();
    let settings = CheckSettings::default();

    let sink = RecordingChangeSink::new();
    let outcome = run_fix(
        &settings,
        &InMemoryFeatureSource::new(features.clone()),
        &parser,
        &regions,
        &sink,
    )
    .unwrap();
    assert_eq!(outcome.applied, 3);

    for change in sink.changes() {
        let f = features
            .iter_mut()
            .find(|f| f.id == change.feature_id)
            .unwrap();
        f.tags.apply(&change);
    }

    let recheck = check_features(&settings, &features, &parser, &regions);
    assert_eq!(recheck.report.verdict.status, ReportStatus::Pass);
    assert!(recheck.changes.is_empty());
}

#[test]
fn rejected_only_feature_is_reported_but_not_emptied() {
    let features = vec![feature("n1", "HU", &[("phone", "+36 90 317 282")])];
    let outcome = check_features(
        &CheckSettings::default(),
        &features,
        &FixtureParser::new(),
        &lookup(),
    );

    let fr = &outcome.report.features[0];
    let codes: Vec<_> = fr.issues.iter().map(|i| i.code).collect();
    assert_eq!(codes, vec![IssueCode::PremiumRate, IssueCode::Fixable]);
    assert!(fr.proposed_changes.is_empty());
    assert!(outcome.changes.is_empty());
}

#[test]
fn autofix_override_marks_fixable_issues() {
    let settings = CheckSettings::default().with_overrides(SettingsOverrides {
        autofix: Some(true),
        ..Default::default()
    });
    let features = vec![feature("n1", "HU", &[("phone", "+36 62 800 800,+36 1 234 5678")])];
    let outcome = check_features(&settings, &features, &FixtureParser::new(), &lookup());

    let fr = &outcome.report.features[0];
    let fixable: Vec<_> = fr
        .issues
        .iter()
        .filter(|i| i.fixable)
        .map(|i| i.code)
        .collect();
    assert_eq!(fixable, vec![IssueCode::BadSeparator, IssueCode::Fixable]);
}

#[test]
fn report_serializes_without_empty_sections() {
    let outcome = check_features(
        &CheckSettings::default(),
        &[feature("n1", "HU", &[("contact:phone", "+36 62 800 800")])],
        &FixtureParser::new(),
        &lookup(),
    );
    let json = serde_json::to_value(&outcome.report).unwrap();

    assert_eq!(json["verdict"]["status"], "pass");
    assert!(json.get("skipped").is_none());
    assert!(json.get("inputs_failed").is_none());
    assert_eq!(json["features"], serde_json::json!([]));
}

#[test]
fn scheme_switch_over_directory() {
    let (_temp, root) = temp_root();
    write_features(
        &root,
        "a.json",
        &[feature(
            "n1",
            "HU",
            &[("website", "https://example.hu"), ("phone", "+36 62 800 800")],
        )],
    );
    std::fs::write(root.join("b.json"), "[").unwrap();

    let sink = RecordingChangeSink::new();
    let outcome = run_scheme_switch(&JsonFeatureSource::new(root), &sink).unwrap();
    assert_eq!(outcome.applied, 1);
    assert_eq!(outcome.inputs_failed.len(), 1);
    assert!(outcome.inputs_failed[0].path.ends_with("b.json"));

    let change = &sink.changes()[0];
    assert_eq!(
        change.changes,
        vec![
            Tag::new("phone", ""),
            Tag::new("contact:phone", "+36 62 800 800"),
            Tag::new("website", ""),
            Tag::new("contact:website", "https://example.hu"),
        ]
    );
}
