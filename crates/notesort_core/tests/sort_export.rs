use notesort_core::store::frontmatter::read_field;
use notesort_core::{
    NoteOutcome, Quadrant, ServiceError, SortMode, SortService, SorterConfig, StoreError, Vault,
};
use serde_json::json;
use std::fs;
use std::path::Path;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write fixture file");
}

fn board() -> serde_json::Value {
    json!({
        "nodes": [
            {"id": "c", "type": "file", "file": "assets/ns-center.svg", "x": -50, "y": -50, "width": 100, "height": 100},
            {"id": "near", "type": "file", "file": "notes/near.md", "x": 50, "y": -150, "width": 100, "height": 100},
            {"id": "far", "type": "file", "file": "notes/far.md", "x": -450, "y": 250, "width": 100, "height": 100},
            {"id": "ghost", "type": "file", "file": "notes/ghost.md", "x": 0, "y": 0, "width": 0, "height": 0},
            {"id": "img", "type": "file", "file": "assets/pic.png", "x": 900, "y": 900, "width": 10, "height": 10},
            {"id": "txt", "type": "text", "text": "hi", "x": 0, "y": 0, "width": 10, "height": 10}
        ],
        "edges": []
    })
}

fn setup() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    write(root, "notes/near.md", "---\ntitle: Near\n---\nClose to the center.\n");
    write(root, "notes/far.md", "Far away, no front matter.\n");
    write(root, "assets/ns-center.svg", "<svg/>");
    let canvas = root.join("board.canvas");
    fs::write(&canvas, board().to_string()).expect("write canvas");
    (dir, canvas)
}

#[test]
fn export_writes_distance_and_priority_front_matter() {
    let (dir, canvas) = setup();
    let vault = Vault::open(dir.path()).expect("open vault");

    let report = SortService::new(SorterConfig::default())
        .export_sort_data(&canvas, &vault, SortMode::Apply)
        .expect("export should succeed");

    assert_eq!(report.center.as_deref(), Some("c"));
    let ids: Vec<&str> = report.entries.iter().map(|e| e.node_id.as_str()).collect();
    assert_eq!(ids, vec!["near", "far", "ghost"]);

    let near = fs::read_to_string(dir.path().join("notes/near.md")).expect("read near");
    assert_eq!(read_field(&near, "title").as_deref(), Some("Near"));
    assert_eq!(read_field(&near, "ns-distance").as_deref(), Some("0.283"));
    assert_eq!(read_field(&near, "ns-priority").as_deref(), Some("2"));
    assert!(near.ends_with("---\nClose to the center.\n"));

    let far = fs::read_to_string(dir.path().join("notes/far.md")).expect("read far");
    assert_eq!(
        far,
        "---\nns-distance: 1\nns-priority: 3\n---\nFar away, no front matter.\n"
    );
    assert_eq!(report.entries[1].quadrant, Quadrant::BottomLeft);
    assert_eq!(report.written_count(), 2);
}

#[test]
fn missing_note_is_reported_and_others_still_written() {
    let (dir, canvas) = setup();
    let vault = Vault::open(dir.path()).expect("open vault");

    let report = SortService::new(SorterConfig::default())
        .export_sort_data(&canvas, &vault, SortMode::Apply)
        .expect("export should succeed");

    let missing: Vec<&str> = report.missing().map(|e| e.path.as_str()).collect();
    assert_eq!(missing, vec!["notes/ghost.md"]);
    assert!(!dir.path().join("notes/ghost.md").exists());
    assert_eq!(report.failed().count(), 0);
}

#[test]
fn dry_run_leaves_notes_untouched() {
    let (dir, canvas) = setup();
    let vault = Vault::open(dir.path()).expect("open vault");
    let before = fs::read_to_string(dir.path().join("notes/far.md")).expect("read far");

    let report = SortService::new(SorterConfig::default())
        .export_sort_data(&canvas, &vault, SortMode::DryRun)
        .expect("dry run should succeed");

    assert_eq!(report.entries[0].outcome, NoteOutcome::Skipped);
    assert_eq!(report.entries[2].outcome, NoteOutcome::Missing);
    assert_eq!(
        fs::read_to_string(dir.path().join("notes/far.md")).expect("read far"),
        before
    );
}

#[test]
fn rerun_overwrites_previous_values() {
    let (dir, canvas) = setup();
    let vault = Vault::open(dir.path()).expect("open vault");
    let service = SortService::new(SorterConfig::default());
    service
        .export_sort_data(&canvas, &vault, SortMode::Apply)
        .expect("first export");

    let mut moved = board();
    moved["nodes"][1]["x"] = json!(-1450);
    fs::write(&canvas, moved.to_string()).expect("rewrite canvas");
    service
        .export_sort_data(&canvas, &vault, SortMode::Apply)
        .expect("second export");

    let near = fs::read_to_string(dir.path().join("notes/near.md")).expect("read near");
    assert_eq!(read_field(&near, "ns-distance").as_deref(), Some("1"));
    assert_eq!(read_field(&near, "ns-priority").as_deref(), Some("1"));
    assert_eq!(near.matches("ns-distance").count(), 1);
}

#[test]
fn custom_field_names_and_sentinel_come_from_config() {
    let (dir, canvas) = setup();
    let vault = Vault::open(dir.path()).expect("open vault");
    let config = SorterConfig::from_toml(
        r#"
[canvas]
sentinel_suffix = "pic.png"

[metadata]
distance_field = "dist"
priority_field = "prio"
"#,
    )
    .expect("config should parse");

    let report = SortService::new(config)
        .export_sort_data(&canvas, &vault, SortMode::Apply)
        .expect("export should succeed");
    assert_eq!(report.center.as_deref(), Some("img"));

    let far = fs::read_to_string(dir.path().join("notes/far.md")).expect("read far");
    assert!(read_field(&far, "dist").is_some());
    assert_eq!(read_field(&far, "prio").as_deref(), Some("1"));
    assert!(read_field(&far, "ns-distance").is_none());
}

#[test]
fn missing_canvas_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let vault = Vault::open(dir.path()).expect("open vault");

    let err = SortService::new(SorterConfig::default())
        .export_sort_data(dir.path().join("nope.canvas"), &vault, SortMode::Apply)
        .expect_err("missing canvas must fail");
    assert!(matches!(err, ServiceError::Store(StoreError::NotFound(_))));
}
