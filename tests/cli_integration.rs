//! Integration tests for the `pb` CLI.
//!
//! Each test writes a board into a temp directory, runs `pb` as a
//! subprocess there, and checks stdout and/or the saved board file.

use std::fs;
use std::path::Path;
use std::process::Command;

use pretty_assertions::assert_eq;
use serde_json::Value;

const BOARD: &str = r#"{
  "notes": [
    {"id": 1, "x": 40, "y": 40, "title": "Throw bowls", "icon": "🏺", "member": "m",
     "start": "2026-01-10", "end": "2026-01-12"},
    {"id": "2", "x": 300, "y": 40, "title": "Craft fair", "member": "p",
     "category": "workshop", "complete": true, "start": "2026-01-17"},
    {"id": "3", "x": 0, "y": 0, "title": "Sell 500 mugs", "isGoal": true,
     "timeframe": "year", "start": "2026-01-01"}
  ],
  "links": [{"from": "1", "to": "2"}],
  "mapPos": {"x": 0, "y": 0, "s": 1},
  "visPos": {"x": 0, "y": 0, "s": 1}
}"#;

fn write_board(dir: &Path) {
    fs::write(dir.join("planboard.json"), BOARD).unwrap();
}

fn read_board(dir: &Path) -> Value {
    let text = fs::read_to_string(dir.join("planboard.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn note_titles(board: &Value) -> Vec<String> {
    board["notes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap().to_string())
        .collect()
}

/// Run `pb` in `dir`. Returns (stdout, stderr, success).
fn run_pb(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_pb"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run pb");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `pb` expecting success, return stdout.
fn run_pb_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_pb(dir, args);
    if !success {
        panic!("pb {:?} failed:\nstdout: {}\nstderr: {}", args, stdout, stderr);
    }
    stdout
}

/// Run `pb` expecting failure, return stderr.
fn run_pb_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_pb(dir, args);
    if success {
        panic!("pb {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_board_and_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_pb_ok(tmp.path(), &["init"]);
    assert!(out.contains("created planboard.json"));

    let board = read_board(tmp.path());
    assert_eq!(board["notes"], serde_json::json!([]));
    assert!(tmp.path().join("planboard.toml").exists());
}

#[test]
fn test_init_refuses_to_overwrite() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let err = run_pb_err(tmp.path(), &["init"]);
    assert!(err.contains("board already exists"));
    assert_eq!(note_titles(&read_board(tmp.path())).len(), 3);

    run_pb_ok(tmp.path(), &["init", "--force"]);
    assert!(note_titles(&read_board(tmp.path())).is_empty());
}

#[test]
fn test_board_flag_points_elsewhere() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("family")).unwrap();
    run_pb_ok(tmp.path(), &["-f", "family/plan.json", "init"]);
    run_pb_ok(tmp.path(), &["-f", "family/plan.json", "add", "Stock shelves"]);

    assert!(tmp.path().join("family/planboard.toml").exists());
    let out = run_pb_ok(tmp.path(), &["--board", "family/plan.json", "list"]);
    assert!(out.contains("Stock shelves"));
    assert!(!tmp.path().join("planboard.json").exists());
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_list_all() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let out = run_pb_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("[ ] 1 "));
    assert!(lines[0].contains("Throw bowls (Mama) 2026-01-10..2026-01-12"));
    assert!(lines[1].starts_with("[x] 2 "));
    assert!(lines[1].ends_with("@workshop"));
    assert!(lines[2].contains("goal:year"));
}

#[test]
fn test_list_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let out = run_pb_ok(tmp.path(), &["list", "--on", "2026-01-11"]);
    assert!(out.contains("Throw bowls"));
    assert!(!out.contains("Craft fair"));

    let out = run_pb_ok(tmp.path(), &["list", "--open"]);
    assert!(!out.contains("Craft fair"));

    let out = run_pb_ok(tmp.path(), &["list", "--goals"]);
    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("Sell 500 mugs"));

    let out = run_pb_ok(tmp.path(), &["list", "--member", "p"]);
    assert!(out.contains("Craft fair"));
    assert!(!out.contains("Throw bowls"));
}

#[test]
fn test_list_rejects_bad_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let err = run_pb_err(tmp.path(), &["list", "--member", "z"]);
    assert!(err.contains("unknown member: z"));
    let err = run_pb_err(tmp.path(), &["list", "--on", "2026-02-30"]);
    assert!(err.contains("invalid date: 2026-02-30"));
}

#[test]
fn test_list_json_keeps_links_between_shown_notes() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let out = run_pb_ok(tmp.path(), &["list", "--json"]);
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["notes"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["notes"][0]["id"], "1");
    assert_eq!(parsed["notes"][2]["kind"], "goal");
    assert_eq!(parsed["links"][0]["from"], "1");

    let out = run_pb_ok(tmp.path(), &["list", "--open", "--json"]);
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert!(parsed["links"].as_array().unwrap().is_empty());
}

#[test]
fn test_list_empty_board() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_pb_ok(tmp.path(), &["list"]);
    assert_eq!(out.trim(), "no notes");
}

#[test]
fn test_corrupt_board_is_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("planboard.json"), "{ not json").unwrap();
    let err = run_pb_err(tmp.path(), &["list"]);
    assert!(err.contains("error: not valid JSON"));

    fs::write(tmp.path().join("planboard.json"), r#"{"links": []}"#).unwrap();
    let err = run_pb_err(tmp.path(), &["list"]);
    assert!(err.contains("missing notes array"));
}

#[test]
fn test_timeline_orders_booth_before_workshop() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let out = run_pb_ok(tmp.path(), &["timeline", "--date", "2026-01-10"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "timeline around 2026-01-10");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2026-01-10 2026-01-12"));
    assert!(lines[1].ends_with("Throw bowls"));
    assert!(lines[2].contains(" W "));
    assert!(lines[2].ends_with("Craft fair"));
}

#[test]
fn test_timeline_goals_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let out = run_pb_ok(tmp.path(), &["timeline", "--date", "2026-01-10", "--goals", "--json"]);
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["reference"], "2026-01-10");
    let titles: Vec<&str> = parsed["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Sell 500 mugs", "Throw bowls", "Craft fair"]);
    assert_eq!(parsed["rows"][2]["complete"], true);
}

#[test]
fn test_cal_with_event_feed() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());
    fs::write(
        tmp.path().join("feed.json"),
        r#"[{"title":"Glaze firing","start":"2026-01-13",
             "extendedProps":{"confidence":"high","details":"kiln 2"}}]"#,
    )
    .unwrap();

    let out = run_pb_ok(tmp.path(), &["cal", "--date", "2026-01-10", "--events", "feed.json"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "2026/1");
    assert_eq!(lines[1], "year goal:  Sell 500 mugs");
    assert_eq!(lines[2], "month goal: -");
    assert!(out.contains("week of 1/4: -"));
    assert!(out.contains("Glaze firing"));
    assert_eq!(out.lines().filter(|l| l.contains("Throw bowls")).count(), 3);

    let out = run_pb_ok(
        tmp.path(),
        &["cal", "--date", "2026-01-10", "--events", "feed.json", "--json"],
    );
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["weeks"].as_array().unwrap().len(), 5);
    assert_eq!(parsed["weeks"][0]["start"], "2026-01-04");
    let tuesday = &parsed["weeks"][1]["days"][2];
    assert_eq!(tuesday["date"], "2026-01-13");
    assert_eq!(tuesday["events"][0]["title"], "Glaze firing");
    assert_eq!(tuesday["events"][0]["high_confidence"], true);
}

#[test]
fn test_cal_events_from_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());
    fs::write(tmp.path().join("planboard.toml"), "[events]\nfile = \"feed.json\"\n").unwrap();
    fs::write(
        tmp.path().join("feed.json"),
        r#"[{"title":"Market?","start":"2026-01-15","extendedProps":{"confidence":"low"}}]"#,
    )
    .unwrap();

    let out = run_pb_ok(tmp.path(), &["cal", "--date", "2026-01-10"]);
    assert!(out.contains("Market?"));
}

#[test]
fn test_cal_missing_feed_is_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());
    let err = run_pb_err(tmp.path(), &["cal", "--events", "nope.json"]);
    assert!(err.contains("nope.json"));
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_add_plain_note() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let out = run_pb_ok(
        tmp.path(),
        &[
            "add", "Buy clay", "--start", "2026-01-20", "--member", "a", "--x", "-80", "--y", "120",
        ],
    );
    assert!(out.starts_with("added "));

    let board = read_board(tmp.path());
    let note = &board["notes"][3];
    assert_eq!(note["title"], "Buy clay");
    assert_eq!(note["start"], "2026-01-20");
    assert_eq!(note["end"], "2026-01-20");
    assert_eq!(note["member"], "a");
    assert_eq!(note["x"], -80.0);
    assert_eq!(note["isGoal"], false);
}

#[test]
fn test_add_goal_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let out = run_pb_ok(
        tmp.path(),
        &["add", "Open online shop", "--goal", "month", "--bottleneck", "--json"],
    );
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["kind"], "bottleneck");
    assert_eq!(parsed["timeframe"], "month");

    let board = read_board(tmp.path());
    assert_eq!(board["notes"][3]["type"], "bottleneck");
    assert_eq!(board["notes"][3]["isGoal"], true);
}

#[test]
fn test_add_workshop_memo_icon() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    run_pb_ok(
        tmp.path(),
        &["add", "Fix wheel", "--workshop", "--memo", "belt is slipping", "--icon", "🔧"],
    );
    let note = &read_board(tmp.path())["notes"][3];
    assert_eq!(note["category"], "workshop");
    assert_eq!(note["memo"], "belt is slipping");
    assert_eq!(note["icon"], "🔧");
}

#[test]
fn test_add_rejects_bad_input() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let err = run_pb_err(tmp.path(), &["add", "   "]);
    assert!(err.contains("title must not be empty"));
    let err = run_pb_err(tmp.path(), &["add", "X", "--start", "soon"]);
    assert!(err.contains("invalid date: soon"));
    let err = run_pb_err(tmp.path(), &["add", "X", "--goal", "decade"]);
    assert!(err.contains("unknown timeframe"));
    let err = run_pb_err(tmp.path(), &["add", "X", "--start", "2026-01-10", "--end", "2026-01-09"]);
    assert!(err.contains("before start"));

    assert_eq!(note_titles(&read_board(tmp.path())).len(), 3);
}

#[test]
fn test_link() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let out = run_pb_ok(tmp.path(), &["link", "3", "1"]);
    assert_eq!(out.trim(), "linked 3 -> 1");
    assert_eq!(read_board(tmp.path())["links"].as_array().unwrap().len(), 2);

    let out = run_pb_ok(tmp.path(), &["link", "1", "2"]);
    assert!(out.contains("already linked"));
    assert_eq!(read_board(tmp.path())["links"].as_array().unwrap().len(), 2);

    let err = run_pb_err(tmp.path(), &["link", "1", "99"]);
    assert!(err.contains("note not found: 99"));
    let err = run_pb_err(tmp.path(), &["link", "1", "1"]);
    assert!(err.contains("cannot link to itself"));
}

#[test]
fn test_rm_requires_yes() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let err = run_pb_err(tmp.path(), &["rm", "1"]);
    assert!(err.contains("refusing to delete 1 without --yes"));
    assert_eq!(note_titles(&read_board(tmp.path())).len(), 3);

    let out = run_pb_ok(tmp.path(), &["rm", "1", "--yes"]);
    assert_eq!(out.trim(), "deleted 1 (1 links removed)");
    let board = read_board(tmp.path());
    assert_eq!(note_titles(&board), vec!["Craft fair", "Sell 500 mugs"]);
    assert!(board["links"].as_array().unwrap().is_empty());

    let err = run_pb_err(tmp.path(), &["rm", "1", "--yes"]);
    assert!(err.contains("note not found: 1"));
}

#[test]
fn test_done_toggles() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    assert_eq!(run_pb_ok(tmp.path(), &["done", "1"]).trim(), "1 complete");
    assert_eq!(read_board(tmp.path())["notes"][0]["complete"], true);
    assert_eq!(run_pb_ok(tmp.path(), &["done", "1"]).trim(), "1 reopened");
    assert_eq!(read_board(tmp.path())["notes"][0]["complete"], false);

    let out = run_pb_ok(tmp.path(), &["done", "2", "--json"]);
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["complete"], false);
}

#[test]
fn test_layout_moves_notes_and_keeps_viewports() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());

    let out = run_pb_ok(tmp.path(), &["layout", "--date", "2026-01-10"]);
    assert_eq!(out.trim(), "arranged 3 notes");

    let board = read_board(tmp.path());
    let position = |i: usize| (board["notes"][i]["x"].as_f64(), board["notes"][i]["y"].as_f64());
    // Goal row on top, then the workshop and booth grids side by side
    assert_eq!(position(2), (Some(100.0), Some(50.0)));
    assert_eq!(position(1), (Some(50.0), Some(340.0)));
    assert_eq!(position(0), (Some(600.0), Some(340.0)));
    assert_eq!(board["mapPos"]["s"], 1.0);
    assert_eq!(note_titles(&board).len(), 3);
}

#[test]
fn test_merge_adds_only_new_notes() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());
    fs::write(
        tmp.path().join("other.json"),
        r#"{"notes": [
              {"id": "1", "title": "Someone else's bowls"},
              {"id": "9", "title": "Photograph glazes"}
            ],
            "links": [{"from": "1", "to": "2"}, {"from": "9", "to": "1"}]}"#,
    )
    .unwrap();

    let out = run_pb_ok(tmp.path(), &["merge", "other.json"]);
    assert_eq!(out.trim(), "merged 1 new notes");

    let board = read_board(tmp.path());
    let titles = note_titles(&board);
    assert_eq!(titles[0], "Throw bowls");
    assert_eq!(titles.last().unwrap(), "Photograph glazes");
    assert_eq!(board["links"].as_array().unwrap().len(), 2);
}

#[test]
fn test_merge_invalid_file_leaves_board_alone() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_board(tmp.path());
    let before = fs::read_to_string(tmp.path().join("planboard.json")).unwrap();
    fs::write(tmp.path().join("bad.json"), r#"{"notes": "nope"}"#).unwrap();

    let err = run_pb_err(tmp.path(), &["merge", "bad.json"]);
    assert!(err.contains("missing notes array"));
    let after = fs::read_to_string(tmp.path().join("planboard.json")).unwrap();
    assert_eq!(before, after);
}
