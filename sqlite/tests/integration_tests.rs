//! Integration tests for the tabula-sqlite crate.

use rusqlite::Connection;
use tabula_core::{ColumnSpec, DeclaredType, RowRecord, TableSchema, Value};
use tabula_sqlite::{
    BuildError, ExecOutcome, ExportFormat, QueryExecutor, SchemaIntrospector, StoreError,
    TableEditor, Transfer, TruncateOutcome, UpdateOutcome, open_store, store_path,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn create_people(conn: &Connection) -> TableSchema {
    TableEditor::new(conn)
        .create_table(
            "people",
            &[
                ColumnSpec::new("id", DeclaredType::Integer).primary(),
                ColumnSpec::new("name", DeclaredType::Text).not_null(),
                ColumnSpec::new("score", DeclaredType::Real),
                ColumnSpec::new("visits", DeclaredType::Integer)
                    .not_null()
                    .with_default("0"),
            ],
        )
        .unwrap();
    SchemaIntrospector::new(conn).describe_table("people").unwrap()
}

fn seed(conn: &Connection, schema: &TableSchema) {
    let editor = TableEditor::new(conn);
    for (name, score, visits) in [("ann", "1.5", "3"), ("bob", "2.0", "0"), ("cy", "-4.25", "12")] {
        editor
            .insert(
                schema,
                &RowRecord::new()
                    .with("name", name)
                    .with("score", score)
                    .with("visits", visits),
            )
            .unwrap();
    }
}

fn all_rows(conn: &Connection, table: &str) -> Vec<Vec<Value>> {
    match QueryExecutor::new(conn)
        .execute(&format!("SELECT * FROM {table} ORDER BY 1"), None)
        .unwrap()
    {
        ExecOutcome::Rows(result) => result.rows,
        other => panic!("expected rows, got {other:?}"),
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    SchemaIntrospector::new(conn).count_rows(table).unwrap()
}

// ---------------------------------------------------------------------------
// Store lifecycle
// ---------------------------------------------------------------------------

#[test]
fn opening_a_missing_store_creates_an_empty_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(dir.path(), "inventory", "db");

    let conn = open_store(&path).unwrap();
    assert!(path.exists());
    assert!(SchemaIntrospector::new(&conn).list_tables().unwrap().is_empty());
    drop(conn);

    // Reopening sees what the first session wrote.
    let conn = open_store(&path).unwrap();
    create_people(&conn);
    drop(conn);
    let conn = open_store(&path).unwrap();
    assert_eq!(
        SchemaIntrospector::new(&conn).list_tables().unwrap(),
        vec!["people"]
    );
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[test]
fn insert_without_required_value_is_rejected_before_execution() {
    let conn = Connection::open_in_memory().unwrap();
    let schema = create_people(&conn);
    let err = TableEditor::new(&conn)
        .insert(&schema, &RowRecord::new().with("score", "1"))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::BuildError(BuildError::MissingRequired(ref column)) if column == "name"
    ));
    assert_eq!(count(&conn, "people"), 0);
}

#[test]
fn insert_uses_declared_default() {
    let conn = Connection::open_in_memory().unwrap();
    let schema = create_people(&conn);
    let editor = TableEditor::new(&conn);
    let id = editor
        .insert(&schema, &RowRecord::new().with("name", "dee"))
        .unwrap();
    let row = editor.fetch(&schema, &Value::Integer(id)).unwrap().unwrap();
    assert_eq!(row.get("visits"), Some(&Value::Integer(0)));
    assert_eq!(row.get("score"), Some(&Value::Null));
}

#[test]
fn blank_edit_leaves_row_identical() {
    let conn = Connection::open_in_memory().unwrap();
    let schema = create_people(&conn);
    seed(&conn, &schema);
    let before = all_rows(&conn, "people");

    let blanks: RowRecord = schema
        .columns
        .iter()
        .filter(|c| !c.primary_key)
        .map(|c| (c.name.clone(), ""))
        .collect();
    let outcome = TableEditor::new(&conn)
        .update(&schema, &Value::Integer(2), &blanks)
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::NoChanges);
    assert_eq!(all_rows(&conn, "people"), before);
}

#[test]
fn partial_edit_keeps_untouched_fields() {
    let conn = Connection::open_in_memory().unwrap();
    let schema = create_people(&conn);
    seed(&conn, &schema);
    let editor = TableEditor::new(&conn);

    let changes = RowRecord::new()
        .with("name", "")
        .with("score", "")
        .with("visits", "99");
    assert_eq!(
        editor.update(&schema, &Value::Integer(1), &changes).unwrap(),
        UpdateOutcome::Updated(1)
    );
    let row = editor.fetch(&schema, &Value::Integer(1)).unwrap().unwrap();
    assert_eq!(row.get("name"), Some(&Value::text("ann")));
    assert_eq!(row.get("score"), Some(&Value::Real(1.5)));
    assert_eq!(row.get("visits"), Some(&Value::Integer(99)));
}

#[test]
fn truncate_needs_exact_phrase() {
    let conn = Connection::open_in_memory().unwrap();
    let schema = create_people(&conn);
    seed(&conn, &schema);
    let editor = TableEditor::new(&conn);

    for wrong in ["", "delete all", "DELETE  ALL", "yes"] {
        assert_eq!(
            editor.truncate(&schema, wrong, "DELETE ALL").unwrap(),
            TruncateOutcome::NotConfirmed
        );
        assert_eq!(count(&conn, "people"), 3);
    }
    assert_eq!(
        editor.truncate(&schema, "DELETE ALL", "DELETE ALL").unwrap(),
        TruncateOutcome::Truncated(3)
    );
    assert_eq!(count(&conn, "people"), 0);
}

#[test]
fn tables_without_primary_key_cannot_be_edited_or_deleted() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE events (at TEXT, kind TEXT); INSERT INTO events VALUES ('t1', 'a');")
        .unwrap();
    let schema = SchemaIntrospector::new(&conn).describe_table("events").unwrap();
    assert!(schema.primary_key().is_none());

    let editor = TableEditor::new(&conn);
    let before = all_rows(&conn, "events");
    assert!(matches!(
        editor.update(&schema, &Value::text("t1"), &RowRecord::new().with("kind", "b")),
        Err(StoreError::BuildError(BuildError::NoPrimaryKey(_)))
    ));
    assert!(matches!(
        editor.delete(&schema, &Value::text("t1")),
        Err(StoreError::BuildError(BuildError::NoPrimaryKey(_)))
    ));
    assert_eq!(all_rows(&conn, "events"), before);
}

#[test]
fn stale_schema_is_reported_after_drop() {
    let conn = Connection::open_in_memory().unwrap();
    let schema = create_people(&conn);
    TableEditor::new(&conn).drop_table(&schema, "people").unwrap();
    assert!(matches!(
        SchemaIntrospector::new(&conn).describe_table("people"),
        Err(StoreError::TableNotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// Import / export
// ---------------------------------------------------------------------------

#[test]
fn csv_export_then_import_round_trips_text() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_store(store_path(dir.path(), "roundtrip", "db")).unwrap();
    let schema = create_people(&conn);
    seed(&conn, &schema);

    let file = dir.path().join("people.csv");
    let transfer = Transfer::new(&conn);
    assert_eq!(
        transfer
            .export_to_path(&schema, ExportFormat::Csv, &file)
            .unwrap(),
        3
    );
    let exported = std::fs::read_to_string(&file).unwrap();
    assert_eq!(
        exported,
        "id,name,score,visits\n1,ann,1.5,3\n2,bob,2.0,0\n3,cy,-4.25,12\n"
    );

    TableEditor::new(&conn)
        .create_table(
            "copy",
            &[
                ColumnSpec::new("id", DeclaredType::Integer).primary(),
                ColumnSpec::new("name", DeclaredType::Text).not_null(),
                ColumnSpec::new("score", DeclaredType::Real),
                ColumnSpec::new("visits", DeclaredType::Integer)
                    .not_null()
                    .with_default("0"),
            ],
        )
        .unwrap();
    let copy = SchemaIntrospector::new(&conn).describe_table("copy").unwrap();
    let report = transfer.import_csv_path(&copy, &file).unwrap();
    assert_eq!(report.rows, 3);

    let reexport = dir.path().join("copy.csv");
    transfer
        .export_to_path(&copy, ExportFormat::Csv, &reexport)
        .unwrap();
    let lines: Vec<String> = std::fs::read_to_string(&reexport)
        .unwrap()
        .lines()
        .skip(1)
        .map(String::from)
        .collect();
    let original: Vec<String> = exported.lines().skip(1).map(String::from).collect();
    assert_eq!(lines, original);
}

#[test]
fn csv_round_trip_keeps_empty_strings() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_store(store_path(dir.path(), "empty", "db")).unwrap();
    let editor = TableEditor::new(&conn);
    let columns = [
        ColumnSpec::new("id", DeclaredType::Integer).primary(),
        ColumnSpec::new("note", DeclaredType::Text).not_null(),
        ColumnSpec::new("memo", DeclaredType::Text),
    ];
    editor.create_table("a", &columns).unwrap();
    editor.create_table("b", &columns).unwrap();
    conn.execute_batch("INSERT INTO a (note, memo) VALUES ('x', 'kept'), ('', '');")
        .unwrap();
    let introspector = SchemaIntrospector::new(&conn);
    let a = introspector.describe_table("a").unwrap();
    let b = introspector.describe_table("b").unwrap();

    let file = dir.path().join("a.csv");
    let transfer = Transfer::new(&conn);
    transfer.export_to_path(&a, ExportFormat::Csv, &file).unwrap();
    assert_eq!(
        std::fs::read_to_string(&file).unwrap(),
        "id,note,memo\n1,x,kept\n2,,\n"
    );
    assert_eq!(transfer.import_csv_path(&b, &file).unwrap().rows, 2);
    assert_eq!(all_rows(&conn, "b"), all_rows(&conn, "a"));
    assert_eq!(
        all_rows(&conn, "b")[1],
        vec![Value::Integer(2), Value::text(""), Value::text("")]
    );
}

#[test]
fn failed_import_commits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let conn = Connection::open_in_memory().unwrap();
    let schema = create_people(&conn);
    seed(&conn, &schema);

    let file = dir.path().join("bad.csv");
    std::fs::write(
        &file,
        "id,name,score,visits\n10,eve,1,1\n11,fay,2,2\n2,dup,3,3\n12,gus,4,4\n",
    )
    .unwrap();
    let err = Transfer::new(&conn)
        .import_csv_path(&schema, &file)
        .unwrap_err();
    assert!(matches!(err, StoreError::ImportRow { line: 4, .. }), "{err}");
    assert_eq!(count(&conn, "people"), 3);
}

#[test]
fn import_of_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let conn = Connection::open_in_memory().unwrap();
    let schema = create_people(&conn);
    let err = Transfer::new(&conn)
        .import_csv_path(&schema, dir.path().join("absent.csv"))
        .unwrap_err();
    assert!(matches!(err, StoreError::IoError(_)));
}

#[test]
fn exports_have_no_row_limit() {
    let conn = Connection::open_in_memory().unwrap();
    let schema = create_people(&conn);
    let editor = TableEditor::new(&conn);
    for i in 0..1500 {
        editor
            .insert(&schema, &RowRecord::new().with("name", format!("n{i}")))
            .unwrap();
    }
    let mut out = Vec::new();
    let rows = Transfer::new(&conn)
        .export(&schema, ExportFormat::Json, &mut out)
        .unwrap();
    assert_eq!(rows, 1500);
    let parsed: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
    assert_eq!(parsed.len(), 1500);
}
