use std::fs;

use ucl_draw::report::{self, COEFFICIENT_FILE, MATCHES_FILE, RATING_FILE, RunSummary};
use ucl_draw::runner::{DrawRecord, DrawTable, TeamSchedule};
use ucl_draw::teams::TeamId;

/// A two-team record; only the row layout matters here.
fn record() -> DrawRecord {
    DrawRecord {
        rating_sums: vec![1500.5, 1620.0],
        coefficient_sums: vec![10.0, 12.25],
        schedule: vec![
            TeamSchedule {
                home: [TeamId(1), TeamId(9), TeamId(18), TeamId(27)],
                away: [TeamId(2), TeamId(10), TeamId(19), TeamId(28)],
            },
            TeamSchedule {
                home: [TeamId(0), TeamId(11), TeamId(20), TeamId(29)],
                away: [TeamId(3), TeamId(12), TeamId(21), TeamId(30)],
            },
        ],
    }
}

fn table() -> DrawTable {
    DrawTable {
        rows: vec![Some(record()), None],
    }
}

#[test]
fn rows_follow_draw_order() {
    let artifacts = report::render(&table(), 2);

    assert_eq!(artifacts.ratings, "1500.5 1620\n0 0\n");
    assert_eq!(artifacts.coefficients, "10 12.25\n0 0\n");

    let lines: Vec<&str> = artifacts.matches.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("(1, 2) (1, 10) (1, 19) (1, 28) (3, 1) (11, 1) (20, 1) (29, 1) (2, 1)"));
    assert!(lines[0].ends_with("(31, 2)"));
    assert_eq!(
        lines[1],
        "(1, 0) (1, 0) (1, 0) (1, 0) (0, 1) (0, 1) (0, 1) (0, 1) \
         (2, 0) (2, 0) (2, 0) (2, 0) (0, 2) (0, 2) (0, 2) (0, 2)"
    );
}

#[test]
fn artifacts_truncate_or_append() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("draws");
    let artifacts = report::render(&table(), 2);

    let paths = report::write_artifacts(&out, &artifacts, false).unwrap();
    assert_eq!(paths.ratings, out.join(RATING_FILE));
    assert_eq!(fs::read_to_string(&paths.ratings).unwrap(), artifacts.ratings);

    report::write_artifacts(&out, &artifacts, true).unwrap();
    assert_eq!(
        fs::read_to_string(out.join(COEFFICIENT_FILE)).unwrap().lines().count(),
        4
    );

    report::write_artifacts(&out, &artifacts, false).unwrap();
    assert_eq!(
        fs::read_to_string(out.join(MATCHES_FILE)).unwrap(),
        artifacts.matches
    );
}

#[test]
fn summary_is_written_as_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let summary = RunSummary {
        generated_at: "2026-01-01T00:00:00+00:00".to_string(),
        requested: 2,
        completed: 1,
        failed: 1,
        elapsed_secs: 0.5,
        oracle_budget_ms: 10_000,
        workers: 2,
        seed: Some(42),
        clubs: vec!["Real".to_string(), "Man City".to_string()],
    };

    let path = report::write_summary(dir.path(), &summary).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["completed"], 1);
    assert_eq!(value["failed"], 1);
    assert_eq!(value["seed"], 42);
    assert_eq!(value["clubs"][1], "Man City");
    assert!(!path.with_extension("json.tmp").exists());
}
