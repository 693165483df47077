//! SqliteStore: durable backend (via rusqlite)
//!
//! Records are persisted in a single `component` table through
//! parameterized statements. Content columns are nullable TEXT: empty
//! strings are stored as NULL and normalized back to empty on read, so
//! "field absent" and "field empty" stay distinguishable at the storage
//! layer.
//!
//! Conflict detection approximates the in-memory backend's guarantee with
//! versioned statements: the row version read at snapshot time must still
//! match at commit time (`UPDATE ... WHERE id = ? AND version = ?`), and
//! inserts of a row that appeared in the meantime are caught by the
//! affected-row count. The connection mutex is never held while a caller's
//! edit closure runs.

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use partstore_core::{
    Component, ComponentId, ComponentStore, EditDecision, EditOutcome, Error, Result,
};
use partstore_search::{rank, FieldWeightScorer, Scorer};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS component (
    id            INTEGER PRIMARY KEY,
    equiv_set     INTEGER NOT NULL,
    version       INTEGER NOT NULL,
    created       TEXT NOT NULL,
    updated       TEXT NOT NULL,
    category      TEXT,
    value         TEXT,
    description   TEXT,
    quantity      TEXT,
    notes         TEXT,
    datasheet_url TEXT,
    footprint     TEXT,
    drawersize    INTEGER
);
CREATE INDEX IF NOT EXISTS idx_component_equiv_set ON component(equiv_set);";

const SELECT_FIELDS: &str = "SELECT id, equiv_set, category, value, description, quantity, \
     notes, datasheet_url, footprint, drawersize FROM component";

fn db_err(e: rusqlite::Error) -> Error {
    Error::storage(e.to_string())
}

fn null_if_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn component_from_row(row: &Row<'_>) -> rusqlite::Result<Component> {
    Ok(Component {
        id: row.get("id")?,
        equiv_set: row.get("equiv_set")?,
        category: row.get::<_, Option<String>>("category")?.unwrap_or_default(),
        value: row.get::<_, Option<String>>("value")?.unwrap_or_default(),
        description: row
            .get::<_, Option<String>>("description")?
            .unwrap_or_default(),
        quantity: row.get::<_, Option<String>>("quantity")?.unwrap_or_default(),
        notes: row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
        datasheet_url: row
            .get::<_, Option<String>>("datasheet_url")?
            .unwrap_or_default(),
        footprint: row
            .get::<_, Option<String>>("footprint")?
            .unwrap_or_default(),
        drawersize: row.get("drawersize")?,
    })
}

/// Durable backend on an embedded SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    scorer: Box<dyn Scorer>,
}

impl SqliteStore {
    /// Open (or create) a catalog database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path).map_err(db_err)?)
    }

    /// Open a fresh, private in-memory database. Useful for tests and
    /// throwaway catalogs; contents are lost when the store is dropped.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory().map_err(db_err)?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(db_err)?;
        conn.execute_batch(SCHEMA).map_err(db_err)?;
        debug!("component table ready");
        Ok(SqliteStore {
            conn: Mutex::new(conn),
            scorer: Box::new(FieldWeightScorer::default()),
        })
    }

    /// Builder: replace the ranking policy used by `search`.
    pub fn with_scorer(mut self, scorer: Box<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// When the record was first inserted, if it exists.
    pub fn created_at(&self, id: ComponentId) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT created FROM component WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(db_err)
    }

    /// When the record content last changed, if it exists.
    ///
    /// No-op edits do not move this timestamp.
    pub fn modified_at(&self, id: ComponentId) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT updated FROM component WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(db_err)
    }
}

impl ComponentStore for SqliteStore {
    fn find_by_id(&self, id: ComponentId) -> Result<Option<Component>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, equiv_set, category, value, description, quantity, \
             notes, datasheet_url, footprint, drawersize \
             FROM component WHERE id = ?1",
            params![id],
            component_from_row,
        )
        .optional()
        .map_err(db_err)
    }

    fn edit_record(
        &self,
        id: ComponentId,
        update: &mut dyn FnMut(&mut Component) -> EditDecision,
    ) -> Result<EditOutcome> {
        let snapshot = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT id, equiv_set, category, value, description, quantity, \
                 notes, datasheet_url, footprint, drawersize, version \
                 FROM component WHERE id = ?1",
                params![id],
                |row| Ok((component_from_row(row)?, row.get::<_, i64>("version")?)),
            )
            .optional()
            .map_err(db_err)?
        };
        let (mut draft, read_version) = match snapshot {
            Some((comp, version)) => (comp, Some(version)),
            None => (Component::new(id), None),
        };
        let before = draft.clone();

        // No lock held from here until commit.
        if update(&mut draft) == EditDecision::Discard {
            return Ok(EditOutcome::Discarded);
        }
        if draft.id != id {
            return Err(Error::IdChanged {
                expected: id,
                actual: draft.id,
            });
        }
        // Grouping is owned by join_set/leave_set; whatever the closure did
        // to equiv_set is dropped before the content comparison.
        draft.equiv_set = before.equiv_set;
        if draft == before {
            debug!(id, "no need to store: no change");
            return Ok(EditOutcome::Unchanged);
        }

        let now = Utc::now();
        let conn = self.conn.lock();
        let changed = match read_version {
            None => conn
                .execute(
                    "INSERT OR IGNORE INTO component \
                     (id, equiv_set, version, created, updated, category, value, \
                      description, quantity, notes, datasheet_url, footprint, drawersize) \
                     VALUES (?1, ?2, 1, ?3, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    params![
                        id,
                        draft.equiv_set,
                        now,
                        null_if_empty(&draft.category),
                        null_if_empty(&draft.value),
                        null_if_empty(&draft.description),
                        null_if_empty(&draft.quantity),
                        null_if_empty(&draft.notes),
                        null_if_empty(&draft.datasheet_url),
                        null_if_empty(&draft.footprint),
                        draft.drawersize,
                    ],
                )
                .map_err(db_err)?,
            // The update deliberately leaves equiv_set alone: a join/leave
            // that landed since the read must survive this commit.
            Some(version) => conn
                .execute(
                    "UPDATE component SET version = version + 1, updated = ?3, \
                     category = ?4, value = ?5, description = ?6, quantity = ?7, \
                     notes = ?8, datasheet_url = ?9, footprint = ?10, drawersize = ?11 \
                     WHERE id = ?1 AND version = ?2",
                    params![
                        id,
                        version,
                        now,
                        null_if_empty(&draft.category),
                        null_if_empty(&draft.value),
                        null_if_empty(&draft.description),
                        null_if_empty(&draft.quantity),
                        null_if_empty(&draft.notes),
                        null_if_empty(&draft.datasheet_url),
                        null_if_empty(&draft.footprint),
                        draft.drawersize,
                    ],
                )
                .map_err(db_err)?,
        };
        if changed == 0 {
            debug!(id, "discarding edit: concurrent modification");
            return Err(Error::EditConflict(id));
        }
        Ok(EditOutcome::Committed)
    }

    fn join_set(&self, id: ComponentId, equiv_set: ComponentId) -> Result<()> {
        let conn = self.conn.lock();
        // Grouping is not a content edit: the row version stays put, so
        // in-flight edit_record commits are not aborted by this.
        conn.execute(
            "UPDATE component SET equiv_set = ?2 WHERE id = ?1",
            params![id, equiv_set],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn leave_set(&self, id: ComponentId) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE component SET equiv_set = id WHERE id = ?1",
            params![id],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn matching_equiv_set(&self, id: ComponentId) -> Result<Vec<Component>> {
        let conn = self.conn.lock();
        let set: Option<ComponentId> = conn
            .query_row(
                "SELECT equiv_set FROM component WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        let Some(set) = set else {
            return Ok(vec![]);
        };
        let mut stmt = conn
            .prepare_cached(&format!(
                "{SELECT_FIELDS} WHERE equiv_set = ?1 ORDER BY equiv_set, id"
            ))
            .map_err(db_err)?;
        let members = stmt
            .query_map(params![set], component_from_row)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(members)
    }

    fn search(&self, term: &str) -> Result<Vec<Component>> {
        let candidates = {
            let conn = self.conn.lock();
            let mut stmt = conn.prepare_cached(SELECT_FIELDS).map_err(db_err)?;
            let rows = stmt
                .query_map([], component_from_row)
                .map_err(db_err)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(db_err)?;
            rows
        };
        Ok(rank(candidates, term, self.scorer.as_ref()))
    }
}
