use crate::error::Result;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// Open (or create) a catalog database file and make sure the schema exists.
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    setup_database(&conn)?;
    debug!(path = %path.display(), "catalog database opened");
    Ok(conn)
}

/// In-memory catalog database with the schema applied.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    setup_database(&conn)?;
    Ok(conn)
}

/// SQL function lowercasing text with full Unicode case folding
/// (SQLite's built-in `lower()` only folds ASCII).
pub const FOLD_CASE: &str = "fold_case";

/// Register the catalog's scalar functions on a connection.
pub fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        FOLD_CASE,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;

    Ok(())
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    register_functions(conn)?;

    // Enable WAL mode for crash recovery (in-memory databases keep "memory")
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    // ==========================================================================
    // Lookup tables (referenced, never mutated by entity CRUD)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            country TEXT NOT NULL DEFAULT ''
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS vendors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Entity tables
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS archaeological_sites (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            area_size REAL NOT NULL,
            rating REAL NOT NULL,
            period TEXT NOT NULL,
            location_id INTEGER NOT NULL REFERENCES locations(id),
            closed INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS national_parks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            area_size REAL NOT NULL,
            rating REAL NOT NULL,
            park_type TEXT NOT NULL,
            location_id INTEGER NOT NULL REFERENCES locations(id),
            closed INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            date_created TEXT NOT NULL,
            amount REAL NOT NULL,
            days_to_expire INTEGER NOT NULL,
            category TEXT NOT NULL,
            vendor_id INTEGER NOT NULL REFERENCES vendors(id)
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sites_location ON archaeological_sites(location_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_parks_location ON national_parks(location_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_vendor ON expenses(vendor_id)",
        [],
    )?;

    Ok(())
}

pub fn table_count(conn: &Connection, table: &str) -> Result<i64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;

    Ok(count)
}
