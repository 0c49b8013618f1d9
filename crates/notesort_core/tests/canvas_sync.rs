use notesort_core::store::vault::parse_target_list;
use notesort_core::{
    load_canvas, read_target_list, CanvasDocument, FileRecord, NodeIdGenerator, SorterConfig,
    SyncService, Vault, VaultQuery,
};
use serde_json::json;
use std::fs;
use std::path::Path;

struct CountingIds(usize);

impl NodeIdGenerator for CountingIds {
    fn next_id(&mut self, record: &FileRecord) -> String {
        self.0 += 1;
        format!("{}#{}", record.name(), self.0)
    }
}

fn service() -> SyncService {
    SyncService::with_id_generator(SorterConfig::default(), Box::new(CountingIds(0)))
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write fixture file");
}

fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path).expect("read canvas");
    serde_json::from_str(&content).expect("canvas should be valid JSON")
}

#[test]
fn sync_creates_missing_canvas_from_records() {
    let dir = tempfile::tempdir().expect("temp dir");
    let canvas = dir.path().join("board.canvas");

    let report = service()
        .sync_canvas(
            &canvas,
            &[FileRecord::new("a.md"), FileRecord::new("inbox/b.md")],
        )
        .expect("sync should succeed");

    assert_eq!(report.added, vec!["a.md#1", "b.md#2"]);
    assert!(report.removed.is_empty());
    assert_eq!(report.total_nodes, 2);

    let saved = read_json(&canvas);
    assert_eq!(
        saved["nodes"][1],
        json!({"id": "b.md#2", "type": "file", "file": "inbox/b.md",
               "x": 100, "y": 100, "width": 400, "height": 400})
    );
    let raw = fs::read_to_string(&canvas).expect("read canvas");
    assert!(raw.starts_with("{\n  \"nodes\": [\n    {"));
}

#[test]
fn unparseable_canvas_is_rebuilt_from_scratch() {
    let dir = tempfile::tempdir().expect("temp dir");
    let canvas = dir.path().join("broken.canvas");
    fs::write(&canvas, "{ this is not json").expect("write broken canvas");

    assert_eq!(
        load_canvas(&canvas).expect("lenient load"),
        CanvasDocument::empty()
    );

    let report = service()
        .sync_canvas(&canvas, &[FileRecord::new("a.md")])
        .expect("sync should recover");
    assert_eq!(report.total_nodes, 1);
    assert_eq!(read_json(&canvas)["nodes"][0]["file"], "a.md");
}

#[test]
fn sync_keeps_positions_and_passthrough_data() {
    let dir = tempfile::tempdir().expect("temp dir");
    let canvas = dir.path().join("board.canvas");
    let original = json!({
        "nodes": [
            {"id": "k", "type": "file", "file": "keep.md", "x": 640, "y": -80, "width": 300, "height": 200},
            {"id": "d", "type": "file", "file": "drop.md", "x": 0, "y": 0, "width": 400, "height": 400},
            {"id": "t", "type": "text", "text": "label", "x": 5, "y": 5, "width": 50, "height": 20}
        ],
        "edges": [{"id": "e1", "fromNode": "k", "fromSide": "right", "toNode": "t", "toSide": "left"}]
    });
    fs::write(&canvas, original.to_string()).expect("write canvas");

    let report = service()
        .sync_canvas(&canvas, &[FileRecord::new("keep.md"), FileRecord::new("new.md")])
        .expect("sync should succeed");

    assert_eq!(report.removed, vec!["d"]);
    assert_eq!(report.added, vec!["new.md#1"]);

    let saved = read_json(&canvas);
    assert_eq!(saved["nodes"][0], original["nodes"][0]);
    assert_eq!(saved["nodes"][1], original["nodes"][2]);
    assert_eq!(saved["nodes"][2]["x"], 0);
    assert_eq!(saved["edges"], original["edges"]);
    assert!(!dir.path().join("board.canvas.tmp").exists());
}

#[test]
fn vault_query_selects_sorted_notes_by_folder_and_content() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    write(root, "projects/zeta.md", "status: #active");
    write(root, "projects/alpha.md", "status: #active");
    write(root, "projects/deep/beta.md", "#active");
    write(root, "projects/idle.md", "status: #paused");
    write(root, "projects/diagram.svg", "<svg/>");
    write(root, "projects/.hidden/secret.md", "#active");
    write(root, "elsewhere.md", "#active");

    let vault = Vault::open(root).expect("open vault");
    let query = VaultQuery::default()
        .in_folder("projects")
        .matching("#active")
        .expect("valid pattern");
    let records = vault.query(&query).expect("query should succeed");

    let paths: Vec<&str> = records.iter().map(|record| record.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["projects/alpha.md", "projects/deep/beta.md", "projects/zeta.md"]
    );

    let excluded = vault
        .query(&query.clone().excluding("projects/zeta.md"))
        .expect("query should succeed");
    assert_eq!(excluded.len(), 2);

    let none = vault
        .query(&VaultQuery::default().in_folder("missing"))
        .expect("missing folder is an empty result");
    assert!(none.is_empty());
}

#[test]
fn query_then_sync_mirrors_vault_folder() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    write(root, "inbox/one.md", "1");
    write(root, "inbox/two.md", "2");
    let canvas = root.join("inbox.canvas");

    let vault = Vault::open(root).expect("open vault");
    let query = VaultQuery::default().in_folder("inbox");
    let mut sync = service();
    sync.sync_canvas(&canvas, &vault.query(&query).expect("query"))
        .expect("first sync");

    fs::remove_file(root.join("inbox/one.md")).expect("remove note");
    let report = sync
        .sync_canvas(&canvas, &vault.query(&query).expect("query"))
        .expect("second sync");

    assert_eq!(report.removed, vec!["one.md#1"]);
    assert!(report.added.is_empty());
    assert_eq!(report.total_nodes, 1);
}

#[test]
fn target_list_file_preserves_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let list = dir.path().join("targets.txt");
    fs::write(&list, "# picked\nz.md\r\na\\b.md\n\n").expect("write list");

    let records = read_target_list(&list).expect("read list");
    assert_eq!(records, parse_target_list("z.md\na/b.md"));
    assert!(read_target_list(dir.path().join("absent.txt")).is_err());
}

#[test]
fn odd_nodes_survive_sync_with_their_edges() {
    let dir = tempfile::tempdir().expect("temp dir");
    let canvas = dir.path().join("board.canvas");
    let original = json!({
        "nodes": [
            {"id": "t", "type": "text", "text": "keep me", "x": 0, "y": 0, "width": 100, "height": 50},
            {"id": 7, "type": "text", "text": "numeric id", "x": 10, "y": 10, "width": 100, "height": 50},
            {"id": "n", "type": "text", "text": "null y", "x": 20, "y": null, "width": 100, "height": 50},
            {"type": "group", "label": "bare"}
        ],
        "edges": [{"id": "e1", "fromNode": "t", "toNode": 7}]
    });
    fs::write(&canvas, original.to_string()).expect("write canvas");

    let report = service()
        .sync_canvas(&canvas, &[FileRecord::new("a.md")])
        .expect("sync should succeed");
    assert!(report.removed.is_empty());
    assert_eq!(report.total_nodes, 5);

    let saved = read_json(&canvas);
    for index in 0..4 {
        assert_eq!(saved["nodes"][index], original["nodes"][index]);
    }
    assert_eq!(saved["nodes"][4]["file"], "a.md");
    assert_eq!(saved["edges"], original["edges"]);

    service()
        .sync_canvas(&canvas, &[])
        .expect("second sync should succeed");
    let saved = read_json(&canvas);
    assert_eq!(saved["nodes"], original["nodes"]);
    assert!(fs::read_to_string(&canvas).expect("read canvas").contains("keep me"));
}

#[test]
fn rebuilt_canvas_uses_editor_default_shape() {
    let dir = tempfile::tempdir().expect("temp dir");
    let canvas = dir.path().join("fresh.canvas");

    service().sync_canvas(&canvas, &[]).expect("sync should succeed");

    assert_eq!(
        read_json(&canvas),
        json!({"nodes": [], "edges": [], "connections": []})
    );
}
