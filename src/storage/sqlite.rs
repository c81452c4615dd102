/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habits. It handles all SQL queries and data conversion.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row, Transaction};

use crate::domain::{Category, Frequency, Habit, HabitId};
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str =
    "id, name, description, category, frequency, reminder_time, created_at, created_on, current_streak, longest_streak";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database (used by tests and dry runs)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        // Completions are removed together with their habit
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Map a `habits` row to a Habit with an empty completion set
    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        let id_str: String = row.get(0)?;
        let id = HabitId::from_string(&id_str).map_err(|e| conversion_error(0, e))?;

        let category_str: String = row.get(3)?;
        let category: Category = category_str.parse().map_err(|e| conversion_error(3, e))?;

        let frequency_json: String = row.get(4)?;
        let frequency: Frequency =
            serde_json::from_str(&frequency_json).map_err(|e| conversion_error(4, e))?;

        Ok(Habit::from_existing(
            id,
            row.get(1)?, // name
            row.get(2)?, // description
            category,
            frequency,
            row.get(5)?, // reminder_time
            row.get(6)?, // created_at
            row.get(7)?, // created_on
            BTreeSet::new(),
            row.get(8)?, // current_streak
            row.get(9)?, // longest_streak
        ))
    }

    fn load_completions(&self, habit_id: &HabitId) -> Result<BTreeSet<NaiveDate>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT completed_on FROM habit_completions WHERE habit_id = ?1 ORDER BY completed_on"
        )?;

        let dates = stmt
            .query_map(params![habit_id.to_string()], |row| row.get::<_, NaiveDate>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(dates)
    }

    /// Replace the stored completion set of a habit with the in-memory one
    fn replace_completions(tx: &Transaction<'_>, habit: &Habit) -> Result<(), StorageError> {
        let habit_id = habit.id.to_string();
        tx.execute(
            "DELETE FROM habit_completions WHERE habit_id = ?1",
            params![habit_id],
        )?;

        let mut insert = tx.prepare(
            "INSERT INTO habit_completions (habit_id, completed_on) VALUES (?1, ?2)"
        )?;
        for date in &habit.completion_dates {
            insert.execute(params![habit_id, date])?;
        }

        Ok(())
    }
}

fn conversion_error<E>(column: usize, error: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(error))
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let frequency_json = serde_json::to_string(&habit.frequency)?;

        let tx = self.conn.unchecked_transaction()?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO habits (
                id, name, description, category, frequency, reminder_time,
                created_at, created_on, current_streak, longest_streak
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.category.key(),
                frequency_json,
                habit.reminder_time,
                habit.created_at,
                habit.created_on,
                habit.current_streak,
                habit.longest_streak,
            ],
        )?;

        if inserted == 0 {
            return Err(StorageError::DuplicateHabit {
                habit_id: habit.id.to_string(),
            });
        }

        Self::replace_completions(&tx, habit)?;
        tx.commit()?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS);
        let result = self
            .conn
            .query_row(&sql, params![habit_id.to_string()], Self::habit_from_row);

        let mut habit = match result {
            Ok(habit) => habit,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(StorageError::HabitNotFound {
                    habit_id: habit_id.to_string(),
                });
            }
            Err(e) => return Err(StorageError::Query(e)),
        };

        habit.completion_dates = self.load_completions(habit_id)?;
        Ok(habit)
    }

    fn save_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let frequency_json = serde_json::to_string(&habit.frequency)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO habits (
                id, name, description, category, frequency, reminder_time,
                created_at, created_on, current_streak, longest_streak
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                category = excluded.category,
                frequency = excluded.frequency,
                reminder_time = excluded.reminder_time,
                current_streak = excluded.current_streak,
                longest_streak = excluded.longest_streak",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.category.key(),
                frequency_json,
                habit.reminder_time,
                habit.created_at,
                habit.created_on,
                habit.current_streak,
                habit.longest_streak,
            ],
        )?;

        Self::replace_completions(&tx, habit)?;
        tx.commit()?;

        tracing::debug!(
            "Saved habit: {} ({}) with {} completions, streak {}/{}",
            habit.name,
            habit.id,
            habit.completion_dates.len(),
            habit.current_streak,
            habit.longest_streak
        );
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM habit_completions WHERE habit_id = ?1",
            params![habit_id.to_string()],
        )?;
        let rows_affected = tx.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tx.commit()?;
        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    fn list_habits(&self, category: Option<&Category>) -> Result<Vec<Habit>, StorageError> {
        let category_key = category.map(Category::key);

        let sql = format!(
            "SELECT {} FROM habits WHERE (?1 IS NULL OR category = ?1)
             ORDER BY name COLLATE NOCASE, created_at",
            HABIT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut habits = stmt
            .query_map(params![category_key], Self::habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut completions: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
        let mut stmt = self.conn.prepare(
            "SELECT c.habit_id, c.completed_on
             FROM habit_completions c JOIN habits h ON h.id = c.habit_id
             WHERE (?1 IS NULL OR h.category = ?1)",
        )?;
        let rows = stmt.query_map(params![category_key], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, NaiveDate>(1)?))
        })?;
        for row in rows {
            let (habit_id, date) = row?;
            completions.entry(habit_id).or_default().insert(date);
        }

        for habit in &mut habits {
            if let Some(dates) = completions.remove(&habit.id.to_string()) {
                habit.completion_dates = dates;
            }
        }

        Ok(habits)
    }

    fn habits_completed_on(&self, date: NaiveDate) -> Result<Vec<HabitId>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id FROM habit_completions WHERE completed_on = ?1 ORDER BY habit_id"
        )?;

        let ids = stmt
            .query_map(params![date], |row| {
                let id_str: String = row.get(0)?;
                HabitId::from_string(&id_str).map_err(|e| conversion_error(0, e))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }
}
