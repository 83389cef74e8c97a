use jne_core::{
    DocumentStore, EditState, Error, FileDocumentStore, MemoryDocumentStore, StoreOptions,
    Workbench,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn parse(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

#[test]
fn object_node_edit_round_trip() {
    let doc = MemoryDocumentStore::new(r#"{"a":1,"b":2,"c":[1,2]}"#);
    let mut wb = Workbench::open(doc).expect("open");
    wb.select("").expect("root node");
    assert_eq!(wb.session().draft(), "{\n  \"a\": 1,\n  \"b\": 2\n}");

    assert!(wb.session_mut().start_editing());
    wb.session_mut().set_draft(r#"{"a":9}"#);
    wb.save().expect("save");

    let expected = json!({"a": 9, "b": 2, "c": [1, 2]});
    assert_eq!(parse(&wb.document().current_text().unwrap()), expected);
    assert_eq!(parse(wb.parsed_text()), expected);
    assert_eq!(wb.document().writes(), 1);
    // session shows the refreshed node
    assert_eq!(wb.session().state(), EditState::Viewing);
    assert_eq!(wb.session().draft(), "{\n  \"a\": 9,\n  \"b\": 2\n}");
    assert_eq!(wb.graph().selected().map(|n| n.id.as_str()), Some(""));
}

#[test]
fn bare_array_element_edit() {
    let doc = MemoryDocumentStore::new(r#"{"items":["old",2]}"#);
    let mut wb = Workbench::open(doc).unwrap();
    wb.select("/items/0").expect("element node");
    assert_eq!(wb.session().normalized(), "\"old\"");
    wb.session_mut().start_editing();
    wb.session_mut().set_draft("\"new\"");
    wb.save().unwrap();
    assert_eq!(
        parse(&wb.document().current_text().unwrap()),
        json!({"items": ["new", 2]})
    );
    assert_eq!(wb.session().normalized(), "\"new\"");
}

#[test]
fn bare_value_replaced_by_array_leaves_no_stale_node() {
    let mut wb = Workbench::open(MemoryDocumentStore::new(r#"{"items":["old",2]}"#)).unwrap();
    wb.select("/items/0").unwrap();
    wb.session_mut().start_editing();
    wb.session_mut().set_draft("[1,2]");
    wb.save().unwrap();
    assert_eq!(
        parse(&wb.document().current_text().unwrap()),
        json!({"items": [[1, 2], 2]})
    );
    assert_ne!(wb.session().normalized(), "\"old\"");
    assert_eq!(wb.session().normalized(), "{}");
    assert_eq!(wb.session().state(), EditState::Viewing);
    assert!(!wb.session().can_edit());
    assert!(wb.graph().selected().is_none());
}

#[test]
fn select_unknown_node_fails() {
    let mut wb = Workbench::open(MemoryDocumentStore::new(r#"{"a":1}"#)).unwrap();
    assert!(matches!(wb.select("/nope"), Err(Error::NodeNotFound(_))));
    assert!(wb.session().node().is_none());
}

#[test]
fn malformed_snippet_writes_nothing() {
    let original = r#"{"a":1}"#;
    let mut wb = Workbench::open(MemoryDocumentStore::new(original)).unwrap();
    wb.select("").unwrap();
    wb.session_mut().start_editing();
    wb.session_mut().set_draft("{\"a\": ");
    let err = wb.save().unwrap_err();
    assert!(matches!(err, Error::InvalidSnippet(_)));
    assert_eq!(wb.document().current_text().unwrap(), original);
    assert_eq!(wb.document().writes(), 0);
    assert_eq!(wb.session().state(), EditState::Editing);
    assert_eq!(wb.session().draft(), "{\"a\": ");
    assert!(wb.session().error().unwrap().starts_with("Invalid JSON"));

    // retry after fixing the draft
    wb.session_mut().set_draft("{\"a\": 2}");
    wb.save().unwrap();
    assert_eq!(parse(&wb.document().current_text().unwrap()), json!({"a": 2}));
}

#[test]
fn save_reads_document_fresh() {
    let mut wb = Workbench::open(MemoryDocumentStore::new(r#"{"items":["x"]}"#)).unwrap();
    wb.select("/items/0").unwrap();
    wb.session_mut().start_editing();
    wb.session_mut().set_draft("\"y\"");
    // something else rewrote the document since the node was loaded
    wb.document_mut().set_text(r#"{"items":null}"#).unwrap();
    let err = wb.save().unwrap_err();
    assert!(matches!(err, Error::PathResolution));
    assert_eq!(wb.document().current_text().unwrap(), r#"{"items":null}"#);
    assert_eq!(wb.document().writes(), 1);
    assert_eq!(
        wb.session().error(),
        Some("Unable to resolve JSON path for the selected node")
    );
}

#[test]
fn unknown_keys_are_not_injected() {
    let mut wb = Workbench::open(MemoryDocumentStore::new(r#"{"u":{"n":"a","m":{}}}"#)).unwrap();
    wb.select("/u").unwrap();
    wb.session_mut().start_editing();
    wb.session_mut().set_draft(r#"{"n":"b","m":1,"new":true}"#);
    wb.save().unwrap();
    assert_eq!(
        parse(wb.parsed_text()),
        json!({"u": {"n": "b", "m": {}}})
    );
}

#[test]
fn file_store_reformats_and_backs_up() {
    use tempfile::tempdir;
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.json");
    std::fs::write(&path, r#"{"name":"a","list":[1]}"#).unwrap();

    let store = FileDocumentStore::new(&path, StoreOptions { backup_on_save: true });
    let mut wb = Workbench::open(store).unwrap();
    wb.select("").unwrap();
    wb.session_mut().start_editing();
    wb.session_mut().set_draft(r#"{"name":"b"}"#);
    wb.save().unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "{\n  \"name\": \"b\",\n  \"list\": [\n    1\n  ]\n}");
    let backup = wb.document().last_backup().expect("backup path");
    assert!(backup.exists());
    assert_eq!(backup.extension().and_then(|s| s.to_str()), Some("zip"));
}

#[test]
fn file_store_rejects_invalid_text() {
    use tempfile::tempdir;
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");
    std::fs::write(&path, "[]").unwrap();
    let mut store = FileDocumentStore::new(&path, StoreOptions::default());
    assert!(matches!(store.set_text("nope"), Err(Error::InvalidDocument(_))));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    assert!(store.last_backup().is_none());
}

#[test]
fn invalid_document_fails_open() {
    let err = Workbench::open(MemoryDocumentStore::new("{")).unwrap_err();
    assert!(matches!(err, Error::InvalidDocument(_)));
}

#[test]
fn zip_backup_only_takes_files() {
    use std::fs;
    use tempfile::tempdir;
    let d = tempdir().unwrap();
    let doc = d.path().join("doc.json");
    fs::write(&doc, "{}").unwrap();
    let zip = jne_core::backup::zip_backup(&doc).unwrap();
    assert!(zip.exists());
    assert!(zip.starts_with(d.path()));
    assert!(zip.file_name().unwrap().to_string_lossy().starts_with("doc_"));

    let folder = d.path().join("docs");
    fs::create_dir_all(&folder).unwrap();
    assert!(jne_core::backup::zip_backup(&folder).is_err());
    assert!(jne_core::backup::zip_backup(&d.path().join("missing.json")).is_err());
}

#[test]
fn list_json_documents() {
    use std::fs;
    use tempfile::tempdir;
    let d = tempdir().unwrap();
    fs::create_dir_all(d.path().join("nested")).unwrap();
    fs::write(d.path().join("b.json"), "{}").unwrap();
    fs::write(d.path().join("nested/a.JSON"), "[]").unwrap();
    fs::write(d.path().join("notes.txt"), "x").unwrap();
    let docs = jne_core::documents::list_documents(d.path());
    let names: Vec<String> = docs
        .iter()
        .map(|p| p.strip_prefix(d.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, ["b.json", "nested/a.JSON"]);
}
