use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NavError>;

#[derive(Debug, Error)]
pub enum NavError {
    /// Input text matched none of the known coordinate grammars.
    #[error("unrecognized coordinate format: {0:?}")]
    Syntax(String),

    /// A grammar matched but a numeric value is outside geodetic/grid bounds.
    #[error("value out of range: {0}")]
    Range(String),

    /// A record-level constraint was violated (e.g. identifier length).
    #[error("invalid waypoint: {0}")]
    Validation(String),

    /// A waypoint with this identifier already exists.
    #[error("waypoint {0:?} already exists")]
    DuplicateIdentifier(String),

    /// No waypoint with this identifier exists.
    #[error("waypoint {0:?} not found")]
    WaypointNotFound(String),

    /// The database file does not exist.
    #[error("database not found: {0}")]
    DatabaseNotFound(PathBuf),

    /// The file exists but is not a database with the expected schema.
    #[error("unexpected database schema: {0}")]
    Schema(String),

    /// Backup or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
