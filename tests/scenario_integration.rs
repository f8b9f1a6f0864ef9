// SPDX-License-Identifier: MPL-2.0
use iced_toasts::config::{self, Config, DiagnosticsConfig, NotificationsConfig};
use iced_toasts::diagnostics::BufferCapacity;
use iced_toasts::scenario::{Replay, Scenario};
use tempfile::tempdir;

const SCENARIO: &str = r#"
[[step]]
at_ms = 0
action = "add"
message = "Exported"

[[step]]
at_ms = 0
action = "add"
message = "Disk almost full"
severity = "warning"
duration_ms = 0

[[step]]
at_ms = 500
action = "pause"
message = "Disk almost full"
severity = "warning"

[[step]]
at_ms = 1500
action = "dismiss"
message = "Disk almost full"
severity = "warning"
"#;

#[test]
fn configured_default_duration_applies_to_scenario() {
    let dir = tempdir().expect("failed to create temp dir");
    let config = Config {
        notifications: NotificationsConfig {
            default_duration_ms: Some(1000),
            tick_interval_ms: None,
        },
        diagnostics: DiagnosticsConfig::default(),
    };
    config::save_with_override(&config, Some(dir.path().to_path_buf()))
        .expect("failed to save config");
    let scenario_path = dir.path().join("timeline.toml");
    std::fs::write(&scenario_path, SCENARIO).expect("failed to write scenario");

    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert!(warning.is_none());

    let scenario = Scenario::load(&scenario_path).expect("scenario should load");
    let mut replay = Replay::new(loaded.notifications.display_duration());
    let frames = replay.run(&scenario);

    assert!(frames[2].toasts[1].state.is_paused());

    // "Exported" expired at 1000 and left at 1300
    assert_eq!(frames[3].toasts.len(), 1);
    assert_eq!(frames[3].toasts[0].message, "Disk almost full");
    assert!(frames[3].toasts[0].state.is_exiting());

    assert_eq!(replay.settle(), 1800);
    assert!(replay.store().is_empty());
}

#[test]
fn replay_feeds_diagnostics_report() {
    let scenario = Scenario::parse(SCENARIO).expect("valid scenario");
    let mut replay = Replay::default();
    replay.enable_diagnostics(BufferCapacity::default());

    replay.run(&scenario);
    replay.settle();

    let collector = replay.diagnostics().expect("diagnostics enabled");
    let report = collector.build_report();
    assert_eq!(report.summary.created, 2);
    assert_eq!(report.summary.warnings, 1);
    assert_eq!(report.summary.paused, 1);
    assert_eq!(report.summary.dismissed, 1);
    assert_eq!(report.summary.expired, 1);
    assert_eq!(report.summary.removed, 2);
    assert_eq!(report.metadata.collection_duration_ms, 3300);

    let json = collector.export_json().expect("export should succeed");
    assert!(json.contains("\"reason\": \"dismissed\""));
}

#[test]
fn busy_timeline_keeps_every_diagnostic_event() {
    let mut toml = String::new();
    for index in 0..150 {
        toml.push_str(&format!(
            "[[step]]\nat_ms = 0\naction = \"add\"\nmessage = \"Upload {}\"\n\n",
            index
        ));
    }
    let scenario = Scenario::parse(&toml).expect("valid scenario");
    let mut replay = Replay::default();
    replay.enable_diagnostics(BufferCapacity::default());

    replay.run(&scenario);
    assert_eq!(replay.settle(), 3300);

    let collector = replay.diagnostics().expect("diagnostics enabled");
    let report = collector.build_report();
    assert_eq!(report.summary.created, 150);
    assert_eq!(report.summary.expired, 150);
    assert_eq!(report.summary.removed, 150);
    assert_eq!(report.metadata.event_count, 450);
    assert_eq!(report.metadata.dropped_count, 0);
}
