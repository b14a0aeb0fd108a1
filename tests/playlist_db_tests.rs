//! Playlist database over a small on-disk catalog.

use std::sync::Arc;

use concierge::integrations::{query_playlist_db_tool, PlaylistDb};
use concierge::tools::{ToolArguments, ToolExecutionContext};
use pretty_assertions::assert_eq;
use rusqlite::Connection;
use serde_json::json;
use tempfile::TempDir;

fn catalog() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("music.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE Genre (GenreId INTEGER PRIMARY KEY, Name TEXT);
         CREATE TABLE Track (TrackId INTEGER PRIMARY KEY, Name TEXT, GenreId INTEGER, Composer TEXT);
         INSERT INTO Genre VALUES (1, 'Jazz'), (2, 'Rock');
         INSERT INTO Track VALUES
            (1, 'So What', 1, 'Miles Davis'),
            (2, 'Take Five', 1, NULL),
            (3, 'Back in Black', 2, 'AC/DC');",
    )
    .unwrap();
    (dir, path)
}

#[tokio::test]
async fn select_renders_rows_as_tuples() {
    let (_dir, path) = catalog();
    let db = PlaylistDb::open(&path).unwrap();

    let rows = db
        .run(
            "SELECT t.Name, t.Composer FROM Track t JOIN Genre g ON g.GenreId = t.GenreId \
             WHERE g.Name = 'Jazz' ORDER BY t.TrackId",
        )
        .await
        .unwrap();

    assert_eq!(rows, "[('So What', 'Miles Davis'), ('Take Five', None)]");
}

#[tokio::test]
async fn fenced_sql_is_accepted() {
    let (_dir, path) = catalog();
    let db = PlaylistDb::open(&path).unwrap();

    let rows = db
        .run("```sql\nSELECT Name FROM Genre ORDER BY GenreId;\n```")
        .await
        .unwrap();

    assert_eq!(rows, "[('Jazz',), ('Rock',)]");
}

#[tokio::test]
async fn apostrophes_switch_to_double_quotes() {
    let (_dir, path) = catalog();
    let db = PlaylistDb::open(&path).unwrap();

    let rows = db.run("SELECT 'It''s Alright', 'Jazz'").await.unwrap();

    assert_eq!(rows, r#"[("It's Alright", 'Jazz')]"#);
}

#[tokio::test]
async fn table_names_lists_catalog_tables() {
    let (_dir, path) = catalog();
    let db = PlaylistDb::open(&path).unwrap();

    assert_eq!(db.table_names().await.unwrap(), vec!["Genre", "Track"]);
}

#[tokio::test]
async fn writes_are_refused_as_failure_text() {
    let (_dir, path) = catalog();
    let db = Arc::new(PlaylistDb::open(&path).unwrap());
    let tool = query_playlist_db_tool(db.clone());

    let value = tool
        .execute(
            &ToolArguments::new(json!({"query": "INSERT INTO Genre VALUES (3, 'Pop')"})),
            &ToolExecutionContext::default(),
        )
        .await
        .unwrap();

    let text = value.as_str().unwrap();
    assert!(text.starts_with("Error querying database: "), "got: {text}");
    assert_eq!(db.run("SELECT COUNT(*) FROM Genre").await.unwrap(), "[(2,)]");
}

#[tokio::test]
async fn invalid_sql_is_failure_text() {
    let (_dir, path) = catalog();
    let tool = query_playlist_db_tool(Arc::new(PlaylistDb::open(&path).unwrap()));

    let value = tool
        .execute(
            &ToolArguments::new(json!({"query": "SELEC Name FROM Genre"})),
            &ToolExecutionContext::default(),
        )
        .await
        .unwrap();

    assert!(value.as_str().unwrap().starts_with("Error querying database: "));
}

#[tokio::test]
async fn tool_returns_rows_as_plain_text() {
    let (_dir, path) = catalog();
    let tool = query_playlist_db_tool(Arc::new(PlaylistDb::open(&path).unwrap()));

    let value = tool
        .execute(
            &ToolArguments::new(json!({"query": "SELECT Name FROM Track WHERE GenreId = 2"})),
            &ToolExecutionContext::default(),
        )
        .await
        .unwrap();

    assert_eq!(value, json!("[('Back in Black',)]"));
}
