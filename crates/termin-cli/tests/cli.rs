use assert_cmd::Command;
use predicates::prelude::*;

const ANCHOR: &str = "2025-11-28T10:00:00+01:00";

fn termin() -> Command {
    Command::cargo_bin("termin").unwrap()
}

#[test]
fn parse_emits_utc_window() {
    let output = termin()
        .args(["--anchor", ANCHOR, "parse", "morgen 18:00", "--duration-hours", "2"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["start"], "2025-11-29T17:00:00Z");
    assert_eq!(json["end"], "2025-11-29T19:00:00Z");
}

#[test]
fn parse_whole_day_widens_to_civil_day() {
    let output = termin()
        .args(["--anchor", ANCHOR, "parse", "übermorgen", "--whole-day"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    // 2025-11-30 runs 23:00Z (prev day) to 23:00Z under CET.
    assert_eq!(json["start"], "2025-11-29T23:00:00Z");
    assert_eq!(json["end"], "2025-11-30T23:00:00Z");
}

#[test]
fn parse_failure_reports_the_expression() {
    termin()
        .args(["--anchor", ANCHOR, "parse", "irgendwann vielleicht"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("irgendwann vielleicht"));
}

#[test]
fn preprocess_rewrites_german_range() {
    let output = termin()
        .args([
            "--anchor",
            ANCHOR,
            "preprocess",
            "Zeige Events vom 1. Dezember bis zum 29. Dezember",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["output"], "Zeige Events von 2025-12-01 bis 2025-12-29");
    assert_eq!(json["changed"], true);
}

#[test]
fn preprocess_passes_plain_text_through() {
    let output = termin()
        .args(["--anchor", ANCHOR, "preprocess", "Was steht diese Woche an?"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["changed"], false);
}

#[test]
fn window_filters_events_from_stdin() {
    let events = serde_json::json!([
        {
            "id": "soon",
            "name": "Soon",
            "scheduled_start_time": "2025-11-30T18:00:00Z",
            "entity_type": 3
        },
        {
            "id": "far",
            "name": "Far",
            "scheduled_start_time": "2026-02-01T18:00:00Z",
            "entity_type": 3
        }
    ]);
    let output = termin()
        .args(["--anchor", ANCHOR, "window", "--events", "-", "--days-ahead", "7"])
        .write_stdin(events.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["count"], 1);
    assert_eq!(json["events"][0]["id"], "soon");
}

#[test]
fn window_group_emits_day_buckets() {
    let events = serde_json::json!([
        {
            "id": "e1",
            "name": "Erstes",
            "scheduled_start_time": "2025-11-29T17:00:00Z",
            "entity_type": 3
        }
    ]);
    let output = termin()
        .args(["--anchor", ANCHOR, "window", "--events", "-", "--timeframe", "week", "--group"])
        .write_stdin(events.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["days_with_events"], 1);
    assert_eq!(json["days"][0]["weekday"], "Samstag");
}

#[test]
fn rejects_unknown_timezone() {
    termin()
        .args(["--timezone", "Mars/Olympus", "preprocess", "heute"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mars/Olympus"));
}
