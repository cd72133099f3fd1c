use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rusqlite::{Connection, params};

use crate::error::{NavError, Result};
use crate::position::GeoPosition;
use crate::waypoint::{MAX_NAME_LEN, Waypoint};

/// Columns the sim's `custom_data` table must carry. The schema is owned by
/// the simulator; this tool only verifies it matches before touching it.
const REQUIRED_COLUMNS: [&str; 5] = ["name", "entry_pos", "lat", "lon", "alt"];

/// Well-known location of the C-130J user database.
pub fn default_database_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join("Saved Games")
            .join("DCS.C130J")
            .join("user_data.db")
    })
}

/// Handle on an open waypoint database.
///
/// Owns the connection for its whole lifetime; mutating calls take
/// `&mut self`, so no two mutations on one handle can overlap. Every
/// mutation runs in its own transaction (it either commits fully or
/// leaves the file byte-identical), and the first one is preceded by a
/// file backup.
#[derive(Debug)]
pub struct WaypointRepository {
    conn: Connection,
    path: PathBuf,
    backed_up: bool,
}

impl WaypointRepository {
    /// Open an existing database and verify it has the expected schema.
    ///
    /// Never mutates the file. Fails with `DatabaseNotFound` if the path
    /// does not exist and `Schema` if the file is not a database with a
    /// matching `custom_data` table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(NavError::DatabaseNotFound(path));
        }
        let conn = Connection::open(&path)?;
        Self::check_schema(&conn)?;
        debug!("opened waypoint database at {}", path.display());
        Ok(Self {
            conn,
            path,
            backed_up: false,
        })
    }

    fn check_schema(conn: &Connection) -> Result<()> {
        let mut stmt = conn
            .prepare("PRAGMA table_info(custom_data)")
            .map_err(|e| NavError::Schema(e.to_string()))?;
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(1))
            .and_then(|rows| rows.collect())
            .map_err(|e| NavError::Schema(e.to_string()))?;

        if columns.is_empty() {
            return Err(NavError::Schema(String::from(
                "no custom_data table in database",
            )));
        }
        for required in REQUIRED_COLUMNS {
            if !columns.iter().any(|c| c == required) {
                return Err(NavError::Schema(format!(
                    "custom_data is missing column {required}"
                )));
            }
        }
        Ok(())
    }

    /// Copy the database file aside before the first mutation.
    ///
    /// Runs at most once per handle; returns the backup path when a copy
    /// was made. An existing backup is never overwritten; a numbered
    /// variant is chosen instead. A copy failure aborts the pending
    /// mutation.
    pub fn backup_if_needed(&mut self) -> Result<Option<PathBuf>> {
        if self.backed_up {
            return Ok(None);
        }
        let backup = next_backup_path(&self.path);
        fs::copy(&self.path, &backup)?;
        info!(
            "backed up {} to {}",
            self.path.display(),
            backup.display()
        );
        self.backed_up = true;
        Ok(Some(backup))
    }

    /// All custom waypoints in stored (insertion) order.
    pub fn list(&self) -> Result<Vec<Waypoint>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, entry_pos, lat, lon, alt FROM custom_data ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, Option<f64>>(4)?,
            ))
        })?;

        let mut waypoints = Vec::new();
        for row in rows {
            let (name, entry, lat, lon, alt) = row?;
            let position = GeoPosition::new(lat, lon)?;
            waypoints.push(Waypoint::from_row(
                name,
                entry.unwrap_or_default(),
                position,
                alt,
            ));
        }
        Ok(waypoints)
    }

    /// Insert a waypoint.
    ///
    /// The altitude column is always written NULL, whatever elevation the
    /// waypoint carries: the sim misreads stored altitudes (values come
    /// back as a fixed bogus elevation in the CNI-MU), so the one safe
    /// value is none at all. This override is not optional.
    pub fn insert(&mut self, waypoint: &Waypoint) -> Result<()> {
        let name = waypoint.name();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(NavError::Validation(format!(
                "identifier must be 1–{MAX_NAME_LEN} characters, got {name:?}"
            )));
        }
        if let Some(meters) = waypoint.elevation_m() {
            warn!("dropping elevation {meters} m for {name}: altitude is always stored NULL");
        }

        self.backup_if_needed()?;
        let tx = self.conn.transaction()?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM custom_data WHERE name = ?1 COLLATE NOCASE)",
            params![name],
            |row| row.get(0),
        )?;
        if exists {
            return Err(NavError::DuplicateIdentifier(name.to_string()));
        }
        tx.execute(
            "INSERT INTO custom_data (name, entry_pos, lat, lon, alt) VALUES (?1, ?2, ?3, ?4, NULL)",
            params![
                name,
                waypoint.entry_string(),
                waypoint.position().lat(),
                waypoint.position().lon()
            ],
        )?;
        tx.commit()?;
        info!("inserted waypoint {name}");
        Ok(())
    }

    /// Delete a waypoint by identifier.
    ///
    /// Deleting an identifier that is not present is always reported as
    /// `WaypointNotFound`, never silently ignored.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let name = name.trim().to_uppercase();

        self.backup_if_needed()?;
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM custom_data WHERE name = ?1 COLLATE NOCASE",
            params![name],
        )?;
        if removed == 0 {
            return Err(NavError::WaypointNotFound(name));
        }
        tx.commit()?;
        info!("deleted waypoint {name}");
        Ok(())
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the connection. No further operations are possible.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_conn, e)| NavError::Sqlite(e))
    }
}

/// `user_data.db` → `user_data.db.bak`, or `.bak.N` when that is taken.
fn next_backup_path(path: &Path) -> PathBuf {
    let first = append_suffix(path, "bak");
    if !first.exists() {
        return first;
    }
    let mut n = 1u32;
    loop {
        let candidate = append_suffix(path, &format!("bak.{n}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{suffix}"));
    PathBuf::from(name)
}
