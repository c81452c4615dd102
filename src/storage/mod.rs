/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. The engine in
/// `domain` never calls into it; the tools load a habit, derive new values,
/// and save the result back through this interface.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Category, Habit, HabitId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Habit already exists: {habit_id}")]
    DuplicateHabit { habit_id: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// A habit is stored together with its completion dates and its last
/// derived streak values; loading returns the full snapshot.
pub trait HabitStorage {
    /// Insert a new habit; fails if the id is already taken
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Insert or replace a habit, including its completion dates
    ///
    /// Saving the same habit twice leaves the store unchanged.
    fn save_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit and its completion history
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List habits ordered by name, optionally filtered by category
    fn list_habits(&self, category: Option<&Category>) -> Result<Vec<Habit>, StorageError>;

    /// Ids of the habits marked done on a given date
    ///
    /// A query on the completion date index for storage collaborators
    /// (reporting and maintenance code working against the database). The
    /// MCP tools load whole habits instead and do not call it.
    fn habits_completed_on(&self, date: NaiveDate) -> Result<Vec<HabitId>, StorageError>;
}
