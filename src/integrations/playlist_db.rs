//! Read-only SQLite music catalog and the `query_playlist_db` tool.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use regex::Regex;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use crate::error::ConciergeError;
use crate::tools::{AgentTool, AgentToolParameters, GuardedTool, Tool};

pub const QUERY_PLAYLIST_DB_TOOL: &str = "query_playlist_db";
pub const QUERY_PLAYLIST_DB_FAILURE: &str = "Error querying database";

/// Rows rendered per query before truncation.
pub const MAX_ROWS: usize = 200;

/// Music database opened read-only.
pub struct PlaylistDb {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl PlaylistDb {
    /// Open an existing database file read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConciergeError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConciergeError::Configuration(format!(
                "playlist database not found at {}",
                path.display()
            )));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::debug!(path = %path.display(), "opened playlist database");
        Ok(Self {
            path: path.to_path_buf(),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one read-only statement and render the rows as text.
    pub async fn run(&self, sql: &str) -> Result<String, ConciergeError> {
        let sql = strip_sql_fences(sql);
        if sql.is_empty() {
            return Err(ConciergeError::InvalidArgument("empty SQL query".into()));
        }
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| ConciergeError::InvalidState("database lock poisoned".into()))?;
            run_query(&conn, &sql)
        })
        .await
        .map_err(|e| ConciergeError::InvalidState(format!("database worker failed: {e}")))?
    }

    /// Table names, for prompts and diagnostics.
    pub async fn table_names(&self) -> Result<Vec<String>, ConciergeError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| ConciergeError::InvalidState("database lock poisoned".into()))?;
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master WHERE type = 'table' \
                 AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(names)
        })
        .await
        .map_err(|e| ConciergeError::InvalidState(format!("database worker failed: {e}")))?
    }
}

impl std::fmt::Debug for PlaylistDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistDb").field("path", &self.path).finish()
    }
}

fn run_query(conn: &Connection, sql: &str) -> Result<String, ConciergeError> {
    let mut stmt = conn.prepare(sql)?;
    if !stmt.readonly() {
        return Err(ConciergeError::InvalidArgument(
            "only read-only queries are allowed".into(),
        ));
    }
    let columns = stmt.column_count();
    let mut rows = stmt.query([])?;
    let mut rendered = Vec::new();
    let mut truncated = false;
    while let Some(row) = rows.next()? {
        if rendered.len() == MAX_ROWS {
            truncated = true;
            break;
        }
        let mut values = Vec::with_capacity(columns);
        for idx in 0..columns {
            values.push(render_value(row.get_ref(idx)?));
        }
        rendered.push(render_tuple(&values));
    }

    let mut out = format!("[{}]", rendered.join(", "));
    if truncated {
        out.push_str(&format!(" (truncated to {MAX_ROWS} rows)"));
    }
    Ok(out)
}

fn render_tuple(values: &[String]) -> String {
    match values {
        [single] => format!("({single},)"),
        _ => format!("({})", values.join(", ")),
    }
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "None".to_string(),
        ValueRef::Integer(n) => n.to_string(),
        ValueRef::Real(x) => x.to_string(),
        ValueRef::Text(bytes) => quote_text(&String::from_utf8_lossy(bytes)),
        ValueRef::Blob(bytes) => format!("<blob {} bytes>", bytes.len()),
    }
}

// Python-style quoting: double quotes only when the text has a single quote
// and no double quote.
fn quote_text(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$")
            .expect("sql fence regex must compile")
    })
}

/// Models often wrap SQL in markdown fences; keep only the statement.
pub fn strip_sql_fences(sql: &str) -> String {
    let inner = match fence_pattern().captures(sql) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => sql,
    };
    inner.trim().trim_end_matches(';').trim().to_string()
}

/// `query_playlist_db(query)`: read-only SQL, rows as text, or
/// `"Error querying database: …"` on failure.
pub fn query_playlist_db_tool(db: Arc<PlaylistDb>) -> Arc<dyn Tool> {
    let params = AgentToolParameters::object()
        .string("query", "A read-only SQL query against the music database", true)
        .build();
    let inner = AgentTool::text(
        QUERY_PLAYLIST_DB_TOOL,
        "Query the music database (tracks, artists, albums, genres) with SQL",
        params,
        move |args, _ctx| {
            let db = db.clone();
            async move { db.run(args.get_str("query")?).await }
        },
    );
    Arc::new(GuardedTool::new(Arc::new(inner), QUERY_PLAYLIST_DB_FAILURE))
}
