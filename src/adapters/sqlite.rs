use crate::core::aggregate;
use crate::domain::model::{ScorerRecord, StoredScorer};
use crate::domain::ports::ScorerStore;
use crate::utils::error::{Result, ScorerError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS top_scorers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    second_name TEXT NOT NULL,
    score INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_top_scorers_score ON top_scorers(score);
"#;

const SELECT_COLUMNS: &str = "SELECT id, first_name, second_name, score, created_at FROM top_scorers";

/// SQLite-backed store. rusqlite is blocking, so every call runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!("Opening scorer database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| ScorerError::store("sqlite connection lock poisoned"))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| ScorerError::store(format!("sqlite task failed: {}", e)))?
    }
}

fn stored_from_row(row: &Row<'_>) -> rusqlite::Result<StoredScorer> {
    Ok(StoredScorer {
        id: row.get(0)?,
        record: ScorerRecord {
            first_name: row.get(1)?,
            second_name: row.get(2)?,
            score: row.get(3)?,
        },
        created_at: row.get::<_, DateTime<Utc>>(4)?,
    })
}

#[async_trait]
impl ScorerStore for SqliteStore {
    async fn append_batch(&self, records: Vec<ScorerRecord>) -> Result<Vec<StoredScorer>> {
        self.with_connection(move |conn| {
            let tx = conn.transaction()?;
            let created_at = Utc::now();
            let mut appended = Vec::with_capacity(records.len());
            {
                let mut insert = tx.prepare(
                    "INSERT INTO top_scorers (first_name, second_name, score, created_at) VALUES (?1, ?2, ?3, ?4)",
                )?;
                for record in records {
                    insert.execute(params![
                        record.first_name,
                        record.second_name,
                        record.score,
                        created_at,
                    ])?;
                    appended.push(StoredScorer {
                        id: tx.last_insert_rowid(),
                        record,
                        created_at,
                    });
                }
            }
            tx.commit()?;
            Ok(appended)
        })
        .await
    }

    async fn get_all(&self) -> Result<Vec<StoredScorer>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
            let rows = stmt
                .query_map([], stored_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<StoredScorer>> {
        // NOCASE only folds ASCII; other names go through the snapshot scan.
        if !name.is_ascii() {
            let snapshot = self.get_all().await?;
            return Ok(aggregate::find_by_name(&snapshot, name).cloned());
        }

        let needle = name.trim().to_string();
        self.with_connection(move |conn| {
            let found = conn
                .query_row(
                    &format!(
                        "{} WHERE first_name = ?1 COLLATE NOCASE OR second_name = ?1 COLLATE NOCASE ORDER BY id LIMIT 1",
                        SELECT_COLUMNS
                    ),
                    params![needle],
                    stored_from_row,
                )
                .optional()?;
            Ok(found)
        })
        .await
    }
}
