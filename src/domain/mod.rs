/// Domain module containing the habit progress engine and its data types
///
/// This module defines the Habit entity, the weekly schedule it recurs on,
/// and the pure functions that derive streaks and calendar states from a
/// habit's completion history. Nothing in here touches storage or the clock:
/// every derivation takes the reference date ("today") from the caller.

pub mod habit;
pub mod streak;
pub mod calendar;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use streak::*;
pub use calendar::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
