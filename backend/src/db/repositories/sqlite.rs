//! SQLite meta store.
//!
//! Persists the snapshot in a `metas` table holding at most one row. Every
//! insert runs in a transaction that clears the table before writing, so a
//! reader never sees more than one snapshot or a half-written one. A fresh
//! table is seeded with the cold-start row, so reads never hit `NotFound`
//! unless the row is removed behind the store's back.

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::{Path, PathBuf};

use crate::db::models::{columns, StoredHttpHeader, StoredMeta};
use crate::db::repository::{ErrorContext, MetaStore, RepositoryError, RepositoryResult};
use crate::models::RowId;

/// SQLite-backed meta store.
///
/// The connection is guarded by a mutex; all calls are expected to run on the
/// database execution context, which serializes them anyway.
pub struct SqliteMetaStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqliteMetaStore {
    /// Open (or create) the database file at `path` and initialize the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RepositoryError::configuration(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(&db_path)?;
        log::info!("SQLite meta store opened at {}", db_path.display());

        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create a store backed by a private in-memory database.
    pub fn open_in_memory() -> RepositoryResult<Self> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            db_path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Path of the database file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Number of rows in the `metas` table. Never more than one.
    pub fn row_count(&self) -> RepositoryResult<i64> {
        let conn = self.conn.lock();
        let sql = format!("SELECT COUNT(*) FROM {}", columns::TABLE);
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Create the `metas` table and seed it with [`StoredMeta::seed`] when it
    /// holds no row, in one transaction. An existing snapshot is left alone.
    fn init_schema(&self) -> RepositoryResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::from(e).with_operation("init_schema"))?;

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                _id         INTEGER PRIMARY KEY AUTOINCREMENT,
                {num_days}  INTEGER NOT NULL,
                {version}   TEXT NOT NULL,
                {title}     TEXT NOT NULL,
                {subtitle}  TEXT NOT NULL,
                {tz}        TEXT,
                {etag}      TEXT NOT NULL,
                {modified}  TEXT NOT NULL
            )",
            table = columns::TABLE,
            num_days = columns::NUM_DAYS,
            version = columns::VERSION,
            title = columns::TITLE,
            subtitle = columns::SUBTITLE,
            tz = columns::TIME_ZONE_NAME,
            etag = columns::ETAG,
            modified = columns::SCHEDULE_LAST_MODIFIED,
        );
        tx.execute(&sql, [])
            .map_err(|e| RepositoryError::from(e).with_operation("init_schema"))?;

        let count: i64 = tx
            .query_row(&format!("SELECT COUNT(*) FROM {}", columns::TABLE), [], |row| {
                row.get(0)
            })
            .map_err(|e| RepositoryError::from(e).with_operation("init_schema"))?;
        if count == 0 {
            insert_row(&tx, &StoredMeta::seed())
                .map_err(|e| RepositoryError::from(e).with_operation("init_schema"))?;
            log::debug!("Seeded empty {} table", columns::TABLE);
        }

        tx.commit()
            .map_err(|e| RepositoryError::from(e).with_operation("init_schema"))?;
        Ok(())
    }
}

fn insert_row(tx: &Transaction<'_>, meta: &StoredMeta) -> rusqlite::Result<i64> {
    let sql = format!(
        "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        columns::TABLE,
        columns::NUM_DAYS,
        columns::VERSION,
        columns::TITLE,
        columns::SUBTITLE,
        columns::TIME_ZONE_NAME,
        columns::ETAG,
        columns::SCHEDULE_LAST_MODIFIED,
    );
    tx.execute(
        &sql,
        params![
            meta.num_days,
            meta.version,
            meta.title,
            meta.subtitle,
            meta.time_zone_name,
            meta.http_header.e_tag,
            meta.http_header.last_modified,
        ],
    )?;
    Ok(tx.last_insert_rowid())
}

#[async_trait]
impl MetaStore for SqliteMetaStore {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let conn = self.conn.lock();
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(one == 1)
    }

    async fn insert(&self, meta: &StoredMeta) -> RepositoryResult<RowId> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::from(e).with_operation("insert_meta"))?;

        tx.execute(&format!("DELETE FROM {}", columns::TABLE), [])
            .map_err(|e| RepositoryError::from(e).with_operation("insert_meta"))?;

        let row_id = insert_row(&tx, meta)
            .map_err(|e| RepositoryError::from(e).with_operation("insert_meta"))?;
        tx.commit()
            .map_err(|e| RepositoryError::from(e).with_operation("insert_meta"))?;

        log::debug!("Stored meta row {} (version={:?})", row_id, meta.version);
        Ok(RowId::new(row_id))
    }

    async fn query(&self) -> RepositoryResult<StoredMeta> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {}, {}, {}, {}, {}, {}, {} FROM {} LIMIT 1",
            columns::NUM_DAYS,
            columns::VERSION,
            columns::TITLE,
            columns::SUBTITLE,
            columns::TIME_ZONE_NAME,
            columns::ETAG,
            columns::SCHEDULE_LAST_MODIFIED,
            columns::TABLE,
        );

        let meta = conn
            .query_row(&sql, [], |row| {
                Ok(StoredMeta {
                    num_days: row.get(0)?,
                    version: row.get(1)?,
                    title: row.get(2)?,
                    subtitle: row.get(3)?,
                    time_zone_name: row.get(4)?,
                    http_header: StoredHttpHeader {
                        e_tag: row.get(5)?,
                        last_modified: row.get(6)?,
                    },
                })
            })
            .optional()
            .map_err(|e| RepositoryError::from(e).with_operation("query_meta"))?;

        meta.ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "No meta row stored",
                ErrorContext::new("query_meta").with_entity(columns::TABLE),
            )
        })
    }
}
