/// MCP tools for habit management
///
/// Each tool loads what it needs from storage, runs the domain derivations
/// against an explicit reference date, and saves derived values back. The
/// MCP server only parses arguments and formats results around them.

pub mod create;
pub mod update;
pub mod toggle;
pub mod delete;
pub mod list;
pub mod status;
pub mod calendar;

pub use create::*;
pub use update::*;
pub use toggle::*;
pub use delete::*;
pub use list::*;
pub use status::*;
pub use calendar::*;

use chrono::{NaiveDate, NaiveTime};
use schemars::JsonSchema;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{parse_calendar_date, DomainError, Frequency, Habit, HabitId, Streak};
use crate::storage::{HabitStorage, StorageError};

/// Errors returned by tool calls
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

/// A schedule given either as a preset/comma list or as a list of tokens
///
/// Accepts `"daily"`, `"weekdays"`, `"weekends"`, `"mon,wed,fri"` or
/// `["mon", "wed", "fri"]`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FrequencyInput {
    Preset(String),
    Days(Vec<String>),
}

impl FrequencyInput {
    pub fn parse(&self) -> Result<Frequency, DomainError> {
        match self {
            FrequencyInput::Preset(text) => text.parse(),
            FrequencyInput::Days(tokens) => Frequency::from_tokens(tokens),
        }
    }
}

/// Parse a habit id argument
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, ToolError> {
    if raw.trim().is_empty() {
        return Err(ToolError::InvalidParams("Habit ID cannot be empty".to_string()));
    }
    HabitId::from_string(raw)
        .map_err(|_| ToolError::InvalidParams(format!("Invalid habit ID format: '{}'", raw)))
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to the reference date
pub(crate) fn parse_date_or(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ToolError> {
    match raw {
        Some(text) => Ok(parse_calendar_date(text)?),
        None => Ok(today),
    }
}

/// Parse an `HH:MM` reminder time; an empty string clears it
pub(crate) fn parse_reminder_time(raw: &str) -> Result<Option<NaiveTime>, ToolError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map(Some)
        .map_err(|_| {
            ToolError::Domain(DomainError::InvalidValue {
                message: format!("Reminder time '{}' must be HH:MM", raw),
            })
        })
}

/// Recompute a habit's streaks as of `today` and persist them if they changed
///
/// Stored streaks go stale when days pass without a toggle, so every tool
/// that reports streaks goes through here first.
pub(crate) fn refresh_streaks<S: HabitStorage>(
    storage: &S,
    habit: Habit,
    today: NaiveDate,
) -> Result<Habit, ToolError> {
    let fresh = Streak::for_habit(&habit, today);
    if fresh.current_streak == habit.current_streak && fresh.longest_streak == habit.longest_streak {
        return Ok(habit);
    }

    tracing::debug!(
        "Refreshing streaks for '{}': {}/{} -> {}/{}",
        habit.name,
        habit.current_streak,
        habit.longest_streak,
        fresh.current_streak,
        fresh.longest_streak
    );
    let refreshed = habit.with_recomputed_streaks(today);
    storage.save_habit(&refreshed)?;
    Ok(refreshed)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_input_forms() {
        let preset: FrequencyInput = serde_json::from_str(r#""weekdays""#).unwrap();
        assert_eq!(preset.parse().unwrap(), Frequency::weekdays());

        let list: FrequencyInput = serde_json::from_str(r#"["sat", "sun"]"#).unwrap();
        assert_eq!(list.parse().unwrap(), Frequency::weekends());

        let bad: FrequencyInput = serde_json::from_str(r#"["someday"]"#).unwrap();
        assert!(bad.parse().is_err());
    }

    #[test]
    fn test_argument_parsers() {
        assert!(matches!(parse_habit_id(""), Err(ToolError::InvalidParams(_))));
        assert!(matches!(parse_habit_id("not-a-uuid"), Err(ToolError::InvalidParams(_))));

        let today = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        assert_eq!(parse_date_or(None, today).unwrap(), today);
        assert!(matches!(parse_date_or(Some("2024-3-1x"), today), Err(ToolError::Domain(_))));

        assert_eq!(parse_reminder_time("").unwrap(), None);
        assert_eq!(parse_reminder_time("07:45").unwrap(), NaiveTime::from_hms_opt(7, 45, 0));
        assert!(parse_reminder_time("7pm").is_err());
    }
}
