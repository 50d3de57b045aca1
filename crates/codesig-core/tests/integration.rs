use std::path::Path;

use chrono::{TimeZone, Utc};
use codesig_core::platform::bundle::keys;
use codesig_core::platform::recorded::{RecordedArtifact, RecordedObject, RecordedPlatform};
use codesig_core::platform::{Diagnostic, OsStatus, PropertyBundle, ValidityFailure, Value};
use codesig_core::{
    InspectConfig, Info, Report, SignatureError, Status, UNREADABLE_AUTHORITY, inspect_with,
};
use serde_json::json;

const APP: &str = "/Applications/Example.app";
const DESIGNATED: &str = r#"identifier "com.example.app" and anchor apple generic and certificate leaf[subject.OU] = "ABCDE12345""#;

fn certificate(title: &str) -> PropertyBundle<RecordedObject> {
    PropertyBundle::new().with(keys::PROPERTY_TITLE, title)
}

/// Signing information of a Developer ID signed, sandboxed app.
fn developer_id_bundle() -> PropertyBundle<RecordedObject> {
    let entitlements = PropertyBundle::<RecordedObject>::new()
        .with("com.apple.security.app-sandbox", true)
        .with("com.apple.security.network.client", true)
        .with("com.apple.developer.team-identifier", "ABCDE12345");

    let chain = vec![
        certificate("Developer ID Application: Example Corp (ABCDE12345)"),
        certificate("Developer ID Certification Authority"),
        certificate("Apple Root CA"),
    ];

    PropertyBundle::new()
        .with(keys::IDENTIFIER, "com.example.app")
        .with(keys::FORMAT, "app bundle with Mach-O universal (x86_64 arm64)")
        .with(
            keys::SIGNING_TIME,
            Utc.with_ymd_and_hms(2024, 5, 17, 8, 0, 0).unwrap(),
        )
        .with(keys::ENTITLEMENTS, entitlements)
        .with(keys::TRUST, Value::Object(RecordedObject::Trust(Some(chain))))
        .with(
            keys::DESIGNATED_REQUIREMENT,
            Value::Object(RecordedObject::Requirement(Ok(DESIGNATED.to_string()))),
        )
        .with(
            keys::REQUIREMENTS,
            format!("library => anchor apple\ndesignated => {DESIGNATED}\n"),
        )
}

fn inspect(platform: &RecordedPlatform, path: &str) -> Result<Report, SignatureError> {
    inspect_with(platform, Path::new(path), &InspectConfig::default())
}

#[test]
fn developer_id_app_is_valid_with_full_info() -> anyhow::Result<()> {
    let platform =
        RecordedPlatform::new().with_artifact(APP, RecordedArtifact::signed(developer_id_bundle()));

    let report = inspect(&platform, APP)?;
    let info = report.info();

    assert!(report.is_valid());
    assert_eq!(info.identifier.as_deref(), Some("com.example.app"));
    assert_eq!(info.designated_requirement.as_deref(), Some(DESIGNATED));
    assert_eq!(
        info.additional_requirements.as_deref(),
        Some("library => anchor apple\n")
    );
    assert_eq!(
        info.signing_date,
        Some(Utc.with_ymd_and_hms(2024, 5, 17, 8, 0, 0).unwrap())
    );
    assert!(info.is_sandboxed());
    assert_eq!(
        info.entitlements["com.apple.developer.team-identifier"],
        json!("ABCDE12345")
    );
    Ok(())
}

#[test]
fn authorities_are_non_empty_and_stable_across_calls() -> anyhow::Result<()> {
    let platform =
        RecordedPlatform::new().with_artifact(APP, RecordedArtifact::signed(developer_id_bundle()));

    let first = inspect(&platform, APP)?;
    let second = inspect(&platform, APP)?;

    let names: Vec<&str> = first
        .info()
        .authorities
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Developer ID Application: Example Corp (ABCDE12345)",
            "Developer ID Certification Authority",
            "Apple Root CA",
        ]
    );
    assert_eq!(first.info().authorities, second.info().authorities);
    Ok(())
}

#[test]
fn unsigned_artifact_reports_not_signed() -> anyhow::Result<()> {
    let platform =
        RecordedPlatform::new().with_artifact("/usr/local/bin/tool", RecordedArtifact::unsigned());

    let report = inspect(&platform, "/usr/local/bin/tool")?;

    assert_eq!(report.status(), &Status::NotSigned);
    assert!(!report.is_signed());
    assert_eq!(report.info(), &Info::default());
    Ok(())
}

#[test]
fn unsigned_artifact_keeps_partial_metadata() -> anyhow::Result<()> {
    let partial = PropertyBundle::new()
        .with(keys::IDENTIFIER, "tool-55554944")
        .with(keys::FORMAT, "Mach-O thin (arm64)");
    let artifact = RecordedArtifact::signed(partial)
        .failing_validity(ValidityFailure::new(OsStatus::CS_UNSIGNED));
    let platform = RecordedPlatform::new().with_artifact("/tmp/tool", artifact);

    let report = inspect(&platform, "/tmp/tool")?;

    assert_eq!(report.status(), &Status::NotSigned);
    assert_eq!(report.info().format.as_deref(), Some("Mach-O thin (arm64)"));
    assert!(report.info().authorities.is_empty());
    Ok(())
}

#[test]
fn nonexistent_path_is_an_error_not_a_report() {
    let platform = RecordedPlatform::new();

    let err = inspect(&platform, "/no/such/app").unwrap_err();

    match err {
        SignatureError::PlatformStatus { code, path, .. } => {
            assert_eq!(code, OsStatus::CS_STATIC_CODE_NOT_FOUND);
            assert_eq!(path, Path::new("/no/such/app"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn information_failure_overrides_classifier_verdict() -> anyhow::Result<()> {
    let artifact = RecordedArtifact::signed(developer_id_bundle())
        .failing_information(OsStatus::CS_BAD_OBJECT_FORMAT);
    let platform = RecordedPlatform::new().with_artifact(APP, artifact);

    let report = inspect(&platform, APP)?;

    assert_eq!(
        report.status(),
        &Status::Invalid(SignatureError::platform(OsStatus::CS_BAD_OBJECT_FORMAT, APP))
    );
    assert_eq!(report.info(), &Info::default());
    Ok(())
}

#[test]
fn information_failure_overrides_not_signed() -> anyhow::Result<()> {
    let artifact = RecordedArtifact::unsigned().untyped_information();
    let platform = RecordedPlatform::new().with_artifact(APP, artifact);

    let report = inspect(&platform, APP)?;

    assert_eq!(
        report.status(),
        &Status::Invalid(SignatureError::unreadable(APP))
    );
    Ok(())
}

#[test]
fn tampered_bundle_is_invalid_but_keeps_info() -> anyhow::Result<()> {
    let diagnostic = Diagnostic {
        domain: "NSOSStatusErrorDomain".into(),
        code: -67054,
        description: "a sealed resource is missing or invalid".into(),
    };
    let artifact = RecordedArtifact::signed(developer_id_bundle()).failing_validity(
        ValidityFailure::new(OsStatus::CS_BAD_RESOURCE).with_diagnostic(diagnostic.clone()),
    );
    let platform = RecordedPlatform::new().with_artifact(APP, artifact);

    let report = inspect(&platform, APP)?;

    let err = report.status().error().expect("invalid status");
    assert_eq!(err.code(), Some(OsStatus::CS_BAD_RESOURCE));
    assert_eq!(err.diagnostic(), Some(&diagnostic));
    assert_eq!(report.info().identifier.as_deref(), Some("com.example.app"));
    Ok(())
}

#[test]
fn malformed_chain_entries_get_fallback_names() -> anyhow::Result<()> {
    let chain = vec![
        certificate("Developer ID Application: Example Corp (ABCDE12345)"),
        PropertyBundle::new().with(keys::PROPERTY_WARNING, "untrusted"),
    ];
    let bundle =
        PropertyBundle::new().with(keys::TRUST, Value::Object(RecordedObject::Trust(Some(chain))));
    let platform = RecordedPlatform::new().with_artifact(APP, RecordedArtifact::signed(bundle));

    let report = inspect(&platform, APP)?;
    let authorities = &report.info().authorities;

    assert_eq!(authorities.len(), 2);
    assert_eq!(authorities[1].name, UNREADABLE_AUTHORITY);
    assert_eq!(authorities[1].error.as_deref(), Some(UNREADABLE_AUTHORITY));
    assert_eq!(authorities[1].warning.as_deref(), Some("untrusted"));
    assert!(authorities.iter().all(|a| !a.name.is_empty()));
    Ok(())
}

#[test]
fn unrenderable_designated_requirement_uses_platform_message() -> anyhow::Result<()> {
    let bundle = PropertyBundle::new()
        .with(
            keys::DESIGNATED_REQUIREMENT,
            Value::Object(RecordedObject::Requirement(Err(OsStatus::CS_REQ_INVALID))),
        )
        .with(keys::REQUIREMENTS, "designated => anchor apple\n");
    let platform = RecordedPlatform::new()
        .with_artifact(APP, RecordedArtifact::signed(bundle))
        .with_message(OsStatus::CS_REQ_INVALID, "invalid or corrupted code requirement(s)");

    let report = inspect(&platform, APP)?;

    assert!(report.is_valid());
    assert_eq!(
        report.info().designated_requirement.as_deref(),
        Some("invalid or corrupted code requirement(s)")
    );
    assert_eq!(
        report.info().additional_requirements.as_deref(),
        Some(" anchor apple\n")
    );
    Ok(())
}

#[test]
fn report_serializes_as_json() -> anyhow::Result<()> {
    let platform =
        RecordedPlatform::new().with_artifact(APP, RecordedArtifact::signed(developer_id_bundle()));

    let report = inspect(&platform, APP)?;
    let value = serde_json::to_value(&report)?;

    assert_eq!(value["status"], json!({"state": "valid"}));
    assert_eq!(value["info"]["identifier"], "com.example.app");
    assert_eq!(value["info"]["signing_date"], "2024-05-17T08:00:00Z");
    assert_eq!(
        value["info"]["entitlements"]["com.apple.security.app-sandbox"],
        json!(true)
    );
    Ok(())
}

#[test]
fn report_splits_into_status_and_info() -> anyhow::Result<()> {
    let platform =
        RecordedPlatform::new().with_artifact(APP, RecordedArtifact::signed(developer_id_bundle()));

    let (status, info) = inspect(&platform, APP)?.into_parts();

    assert_eq!(status, Status::Valid);
    assert_eq!(info.authorities.len(), 3);
    Ok(())
}
