/// Tool for updating existing habits
///
/// This module implements the habit_update MCP tool to modify an existing
/// habit's name, description, category, schedule or reminder.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Category;
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, parse_reminder_time, FrequencyInput, ToolError};

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to update
    pub habit_id: String,
    pub name: Option<String>,
    /// New description; an empty string clears it
    pub description: Option<String>,
    pub category: Option<String>,
    pub frequency: Option<FrequencyInput>,
    /// New reminder time as HH:MM; an empty string clears it
    pub reminder_time: Option<String>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub message: String,
}

/// Update an existing habit using the provided storage
///
/// A schedule change recomputes the streaks as of `today`, since the days
/// that count toward them have changed.
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
    today: NaiveDate,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let mut habit = storage.get_habit(&habit_id)?;

    let category = params
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()?;
    let frequency = params.frequency.as_ref().map(FrequencyInput::parse).transpose()?;
    let reminder_time = params
        .reminder_time
        .as_deref()
        .map(parse_reminder_time)
        .transpose()?;
    let description = params
        .description
        .map(|d| Some(d.trim().to_string()).filter(|d| !d.is_empty()));

    let schedule_changed = frequency.is_some_and(|f| f != habit.frequency);

    habit.update(params.name, description, category, frequency, reminder_time)?;

    if schedule_changed {
        habit = habit.with_recomputed_streaks(today);
    }
    storage.save_habit(&habit)?;

    tracing::info!("Updated habit '{}' ({})", habit.name, habit.id);

    let mut message = format!("✏️ Updated habit '{}'", habit.name);
    if schedule_changed {
        message.push_str(&format!(
            ". New schedule: {}. Current streak: {} day{}",
            habit.frequency.display_name(),
            habit.current_streak,
            if habit.current_streak == 1 { "" } else { "s" }
        ));
    }

    Ok(UpdateHabitResponse {
        current_streak: habit.current_streak,
        longest_streak: habit.longest_streak,
        message,
    })
}
