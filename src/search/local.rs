use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Row};
use tracing::{debug, info};

use crate::reference::Reference;
use crate::search::SearchSource;
use crate::search::error::SearchError;
use crate::search::query::{CaseMatch, SearchPattern};

/// References available in the local package cache
///
/// Absent user, channel and revision are stored as empty strings so the
/// UNIQUE constraint also covers references without them.
pub struct LocalCache {
    conn: Mutex<Connection>,
}

impl LocalCache {
    pub fn open(db_path: &Path) -> Result<Self, SearchError> {
        info!("Opening local cache at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.create_schema()?;

        Ok(cache)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, SearchError> {
        self.conn.lock().map_err(|_| SearchError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), SearchError> {
        debug!("Creating local cache schema");

        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS refs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                version TEXT NOT NULL,
                user TEXT NOT NULL DEFAULT '',
                channel TEXT NOT NULL DEFAULT '',
                revision TEXT NOT NULL DEFAULT '',
                UNIQUE(name, version, user, channel, revision)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_refs_name ON refs(name COLLATE NOCASE)",
            [],
        )?;

        Ok(())
    }

    /// Record a reference as present in the cache
    ///
    /// Returns false when the exact reference (revision included) was already known.
    pub fn add(&self, reference: &Reference) -> Result<bool, SearchError> {
        let conn = self.lock_conn()?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO refs (name, version, user, channel, revision)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            (
                &reference.name,
                &reference.version,
                reference.user.as_deref().unwrap_or(""),
                reference.channel.as_deref().unwrap_or(""),
                reference.revision.as_deref().unwrap_or(""),
            ),
        )?;

        debug!("Added {} to local cache (new: {})", reference, inserted > 0);
        Ok(inserted > 0)
    }

    /// Remove a reference; without a revision every revision of it is removed
    pub fn remove(&self, reference: &Reference) -> Result<usize, SearchError> {
        let conn = self.lock_conn()?;
        let user = reference.user.as_deref().unwrap_or("");
        let channel = reference.channel.as_deref().unwrap_or("");

        let removed = match &reference.revision {
            Some(revision) => conn.execute(
                r#"
                DELETE FROM refs
                WHERE name = ?1 AND version = ?2 AND user = ?3 AND channel = ?4 AND revision = ?5
                "#,
                (&reference.name, &reference.version, user, channel, revision),
            )?,
            None => conn.execute(
                "DELETE FROM refs WHERE name = ?1 AND version = ?2 AND user = ?3 AND channel = ?4",
                (&reference.name, &reference.version, user, channel),
            )?,
        };

        debug!("Removed {} entries for {}", removed, reference);
        Ok(removed)
    }

    /// All cached references, ordered by name, version, user, channel and revision
    pub fn list(&self) -> Result<Vec<Reference>, SearchError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT name, version, user, channel, revision FROM refs
            ORDER BY name, version, user, channel, revision
            "#,
        )?;

        let references = stmt
            .query_map([], Self::reference_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(references)
    }

    /// References whose name equals `name` ignoring case
    fn by_name(&self, name: &str) -> Result<Vec<Reference>, SearchError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT name, version, user, channel, revision FROM refs
            WHERE name = ?1 COLLATE NOCASE
            ORDER BY name, version, user, channel, revision
            "#,
        )?;

        let references = stmt
            .query_map([name], Self::reference_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(references)
    }

    fn reference_from_row(row: &Row<'_>) -> rusqlite::Result<Reference> {
        let user: String = row.get(2)?;
        let channel: String = row.get(3)?;
        let revision: String = row.get(4)?;

        // user and channel are only meaningful together
        let (user, channel) = if user.is_empty() || channel.is_empty() {
            (None, None)
        } else {
            (Some(user), Some(channel))
        };

        Ok(Reference {
            name: row.get(0)?,
            version: row.get(1)?,
            user,
            channel,
            revision: (!revision.is_empty()).then_some(revision),
        })
    }
}

impl SearchSource for LocalCache {
    fn search(
        &self,
        pattern: &SearchPattern,
        case: CaseMatch,
    ) -> Result<Vec<Reference>, SearchError> {
        let candidates = match pattern.literal_name() {
            Some(name) => self.by_name(name)?,
            None => self.list()?,
        };

        let found: Vec<Reference> = candidates
            .into_iter()
            .filter(|reference| pattern.matches(reference, case))
            .collect();

        debug!(
            "Local cache search '{}' found {} references",
            pattern,
            found.len()
        );
        Ok(found)
    }
}
