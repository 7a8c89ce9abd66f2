pub mod models;


use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, Row};

use crate::error::SearchError;
use crate::query::escape_fts;

pub use models::*;

type Result<T> = std::result::Result<T, SearchError>;

/// Name of the FTS5 virtual table holding the transcript fragments.
const INDEX_NAME: &str = "fragments";

/// Result cap when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 100;

/// Shared handle to the fragment index.
///
/// Opened once at process start and reused for the process lifetime. All
/// request-time operations are read-only; the only writer is the offline
/// ingestion path, which runs before the index is ever queried.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        // WAL so concurrent readers never block each other
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA cache_size=10000;
            PRAGMA temp_store=MEMORY;
        ",
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.init_schema()?;

        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        // The numeric columns are UNINDEXED: only the text participates in
        // the full-text index, the rest are stored for filtering and
        // ordering. The porter tokenizer stands in for the snowball
        // extension the original corpus was stemmed with; swapping it
        // means re-ingesting, not changing code.
        conn.execute_batch(
            "
            CREATE VIRTUAL TABLE IF NOT EXISTS fragments USING fts5(
                text,
                episode_number UNINDEXED,
                start_time UNINDEXED,
                end_time UNINDEXED,
                tokenize = 'porter unicode61'
            );
        ",
        )?;
        Ok(())
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Full-text search over the fragment index.
    ///
    /// The raw user query is escaped unconditionally before execution, so
    /// this entry point cannot be used to inject FTS5 operators. Results
    /// come back presentation-ready, capped at `limit`.
    pub fn search(
        &self,
        q: &str,
        episode_number: Option<u32>,
        order_by: OrderBy,
        limit: u32,
    ) -> Result<Vec<SearchResult>> {
        self.query_fragments(&escape_fts(q), episode_number, order_by, limit)
    }

    /// Execute an already-translated FTS5 MATCH expression.
    ///
    /// Callers that pre-escape (or deliberately use FTS5 syntax) come in
    /// here; a malformed expression surfaces as
    /// [`SearchError::QuerySyntax`] rather than a generic storage error.
    pub fn query_fragments(
        &self,
        match_expr: &str,
        episode_number: Option<u32>,
        order_by: OrderBy,
        limit: u32,
    ) -> Result<Vec<SearchResult>> {
        let conn = self.conn.lock().unwrap();

        // Tie-break on start_time keeps result order reproducible when
        // ranks or episode numbers collide.
        let sql = if episode_number.is_some() {
            format!(
                "SELECT text, episode_number, start_time, end_time
                 FROM {INDEX_NAME}
                 WHERE text MATCH ?1 AND episode_number = ?2
                 ORDER BY {}, start_time
                 LIMIT ?3",
                order_by.to_sql()
            )
        } else {
            format!(
                "SELECT text, episode_number, start_time, end_time
                 FROM {INDEX_NAME}
                 WHERE text MATCH ?1
                 ORDER BY {}, start_time
                 LIMIT ?2",
                order_by.to_sql()
            )
        };

        let mut stmt = conn.prepare(&sql).map_err(SearchError::from_sqlite)?;
        let rows = if let Some(episode) = episode_number {
            stmt.query_map(params![match_expr, episode, limit], map_fragment_row)
        } else {
            stmt.query_map(params![match_expr, limit], map_fragment_row)
        };

        // The MATCH expression is a bound parameter, so FTS5 parses it on
        // the first step, not at prepare time.
        rows.and_then(|mapped| mapped.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(SearchError::from_sqlite)
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Highest episode number in the index, `None` when it is empty.
    pub fn last_episode(&self) -> Result<Option<u32>> {
        let conn = self.conn.lock().unwrap();
        let last = conn.query_row(
            &format!("SELECT MAX(episode_number) FROM {INDEX_NAME}"),
            [],
            |row| row.get(0),
        )?;
        Ok(last)
    }

    pub fn stats(&self) -> Result<Stats> {
        Ok(Stats {
            last_episode: self.last_episode()?,
        })
    }

    /// Number of indexed fragments.
    pub fn fragment_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM {INDEX_NAME}"), [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Bulk-load fragments inside a single transaction. This is the offline
    /// ingestion path; nothing at request time writes to the index.
    pub fn insert_fragments(&self, fragments: &[Fragment]) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {INDEX_NAME} (text, episode_number, start_time, end_time)
                 VALUES (?1, ?2, ?3, ?4)"
            ))?;
            for fragment in fragments {
                stmt.execute(params![
                    fragment.text,
                    fragment.episode_number,
                    fragment.start_time,
                    fragment.end_time
                ])?;
            }
        }
        tx.commit()?;
        log::info!("indexed {} fragments", fragments.len());
        Ok(fragments.len())
    }
}

fn map_fragment_row(row: &Row) -> rusqlite::Result<SearchResult> {
    Ok(SearchResult::from_row(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
    ))
}
