/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::Connection;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
pub const CURRENT_VERSION: i32 = 2;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version > CURRENT_VERSION {
        return Err(StorageError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current_version, CURRENT_VERSION
        )));
    }

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version (0 for a fresh database)
pub fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version: Option<i32> = conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version.unwrap_or(0))
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }
    if from_version < 2 {
        migration_v2(conn)?;
    }

    Ok(())
}

/// Migration to version 1: habits and their completion dates
///
/// Streak values are stored on the habit row. Completions live in their
/// own table so they can be queried by date.
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "BEGIN;
        CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            category TEXT NOT NULL,
            frequency TEXT NOT NULL,
            reminder_time TEXT,
            created_at TEXT NOT NULL,
            current_streak INTEGER NOT NULL DEFAULT 0,
            longest_streak INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS habit_completions (
            habit_id TEXT NOT NULL,
            completed_on TEXT NOT NULL,
            PRIMARY KEY (habit_id, completed_on),
            FOREIGN KEY (habit_id) REFERENCES habits (id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_habit_completions_completed_on
            ON habit_completions (completed_on);
        CREATE INDEX IF NOT EXISTS idx_habits_category
            ON habits (category);
        COMMIT;",
    )?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Migration to version 2: the calendar day a habit starts counting from
///
/// Existing rows take the date part of their UTC creation timestamp.
fn migration_v2(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "BEGIN;
        ALTER TABLE habits ADD COLUMN created_on TEXT;
        UPDATE habits SET created_on = substr(created_at, 1, 10) WHERE created_on IS NULL;
        COMMIT;",
    )?;

    tracing::info!("Applied migration v2: Added habits.created_on");
    Ok(())
}
