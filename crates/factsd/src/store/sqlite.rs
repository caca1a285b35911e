//! SQLite-backed document store.
//!
//! One table keyed by fact id, holding the serialized record as a JSON
//! document column. Replacement is whole-record: stage handlers always
//! write a complete, self-consistent fact or nothing.

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use facts_common::{Fact, StoreError};

use super::DocumentStore;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS facts (
    fact_id TEXT PRIMARY KEY,
    doc TEXT NOT NULL
);
"#;

pub struct SqliteDocStore {
    conn: Connection,
}

impl SqliteDocStore {
    /// Open (or create) the database at `path` and apply the schema.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .await
            .map_err(StoreError::backend)?;
        conn.call(|conn| {
            conn.execute_batch(SCHEMA_SQL)?;
            Ok(())
        })
        .await
        .map_err(StoreError::backend)?;
        Ok(Self { conn })
    }

    /// In-memory database, used by tests and one-off tooling.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(StoreError::backend)?;
        conn.call(|conn| {
            conn.execute_batch(SCHEMA_SQL)?;
            Ok(())
        })
        .await
        .map_err(StoreError::backend)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl DocumentStore for SqliteDocStore {
    async fn get(&self, fact_id: &str) -> Result<Option<Fact>, StoreError> {
        let fact_id = fact_id.to_string();
        let doc: Option<String> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT doc FROM facts WHERE fact_id = ?1")?;
                let mut rows = stmt.query([fact_id])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, String>(0)?)),
                    None => Ok(None),
                }
            })
            .await
            .map_err(StoreError::backend)?;

        match doc {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, fact: &Fact) -> Result<(), StoreError> {
        let fact_id = fact.fact_id.clone();
        let doc = serde_json::to_string(fact)?;
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO facts (fact_id, doc) VALUES (?1, ?2)
                     ON CONFLICT(fact_id) DO UPDATE SET doc = excluded.doc",
                    rusqlite::params![fact_id, doc],
                )?;
                Ok(())
            })
            .await
            .map_err(StoreError::backend)
    }

    async fn delete(&self, fact_id: &str) -> Result<(), StoreError> {
        let fact_id = fact_id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM facts WHERE fact_id = ?1", [fact_id])?;
                Ok(())
            })
            .await
            .map_err(StoreError::backend)
    }

    async fn scan_all(&self) -> Result<Vec<Fact>, StoreError> {
        let docs: Vec<String> = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT doc FROM facts")?;
                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
                let mut docs = Vec::new();
                for row in rows {
                    docs.push(row?);
                }
                Ok(docs)
            })
            .await
            .map_err(StoreError::backend)?;

        docs.iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }
}
