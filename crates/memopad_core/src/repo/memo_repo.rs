//! Memo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide committed-row CRUD over the `memos` table.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - `fetch_all` returns rows ordered by `date DESC, uuid ASC`.
//! - Construction fails on connections without the expected schema.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::memo::{Memo, MemoId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MEMO_SELECT_SQL: &str = "SELECT uuid, title, content, date FROM memos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for memo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(MemoId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "memo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{column}` on table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for committed memo rows.
pub trait MemoRepository {
    /// Returns all committed memos, newest save first.
    fn fetch_all(&self) -> RepoResult<Vec<Memo>>;
    /// Gets one memo by stable id.
    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>>;
    /// Inserts one memo row and returns its stable id.
    fn insert_memo(&self, memo: &Memo) -> RepoResult<MemoId>;
    /// Replaces title, content and date of an existing row.
    fn update_memo(&self, memo: &Memo) -> RepoResult<()>;
    /// Removes one memo row.
    fn delete_memo(&self, id: MemoId) -> RepoResult<()>;
}

/// SQLite-backed memo repository.
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MemoRepository for SqliteMemoRepository<'_> {
    fn fetch_all(&self) -> RepoResult<Vec<Memo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMO_SELECT_SQL} ORDER BY date DESC, uuid ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(parse_memo_row(row)?);
        }

        Ok(memos)
    }

    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMO_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memo_row(row)?));
        }

        Ok(None)
    }

    fn insert_memo(&self, memo: &Memo) -> RepoResult<MemoId> {
        self.conn.execute(
            "INSERT INTO memos (uuid, title, content, date)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                memo.id.to_string(),
                memo.title.as_deref(),
                memo.content.as_str(),
                memo.date,
            ],
        )?;

        Ok(memo.id)
    }

    fn update_memo(&self, memo: &Memo) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE memos
             SET title = ?1, content = ?2, date = ?3
             WHERE uuid = ?4;",
            params![
                memo.title.as_deref(),
                memo.content.as_str(),
                memo.date,
                memo.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(memo.id));
        }

        Ok(())
    }

    fn delete_memo(&self, id: MemoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM memos WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in memos.uuid"))
    })?;

    Ok(Memo {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        date: row.get("date")?,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "memos")? {
        return Err(RepoError::MissingRequiredTable("memos"));
    }

    for column in ["uuid", "title", "content", "date"] {
        if !table_has_column(conn, "memos", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "memos",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
