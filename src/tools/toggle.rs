/// Tool for marking a habit done or undone on a date
///
/// This module implements the habit_toggle MCP tool. Every toggle produces
/// an updated habit with recomputed streaks, which is saved back in one go.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Streak};
use crate::storage::HabitStorage;
use crate::tools::{parse_date_or, parse_habit_id, ToolError};

/// Parameters for toggling a habit completion
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleHabitParams {
    /// ID of the habit
    pub habit_id: String,
    /// Day to mark (YYYY-MM-DD, defaults to today)
    pub date: Option<String>,
    /// true marks the day done, false marks it undone (default: true)
    pub completed: Option<bool>,
}

/// Response from toggling a habit
#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    pub date: NaiveDate,
    pub completed: bool,
    pub scheduled: bool,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub message: String,
}

/// Mark a habit done or undone and persist the recomputed streaks
pub fn toggle_habit<S: HabitStorage>(
    storage: &S,
    params: ToggleHabitParams,
    today: NaiveDate,
) -> Result<ToggleHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = parse_date_or(params.date.as_deref(), today)?;
    let completed = params.completed.unwrap_or(true);

    if date > today {
        return Err(DomainError::InvalidDate(
            "Cannot mark habits for future dates".to_string()
        ).into());
    }

    let habit = storage.get_habit(&habit_id)?;
    let updated = habit.with_completion(date, completed, today);
    storage.save_habit(&updated)?;

    let scheduled = updated.is_scheduled_on(date);
    if !scheduled {
        tracing::debug!("Habit {} toggled on unscheduled day {}", updated.id, date);
    }
    tracing::info!(
        "Habit '{}' marked {} for {}: streak {} (best {})",
        updated.name,
        if completed { "done" } else { "undone" },
        date,
        updated.current_streak,
        updated.longest_streak
    );

    let streak = Streak {
        current_streak: updated.current_streak,
        longest_streak: updated.longest_streak,
    };
    let message = format!(
        "{} Habit '{}' marked as {} for {}{}. Current streak: {} day{}. {}",
        if completed { "🔥" } else { "↩️" },
        updated.name,
        if completed { "completed" } else { "incomplete" },
        date,
        if scheduled { "" } else { " (not a scheduled day)" },
        streak.current_streak,
        if streak.current_streak == 1 { "" } else { "s" },
        streak.motivational_message()
    );

    Ok(ToggleHabitResponse {
        date,
        completed,
        scheduled,
        current_streak: streak.current_streak,
        longest_streak: streak.longest_streak,
        message,
    })
}
