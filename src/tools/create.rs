/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Category, Frequency, Habit};
use crate::storage::HabitStorage;
use crate::tools::{parse_reminder_time, FrequencyInput, ToolError};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// health, productivity, social, creative, mindfulness, financial,
    /// household, personal or custom:<name> (default: health)
    pub category: Option<String>,
    /// Scheduled weekdays (default: mon-fri)
    pub frequency: Option<FrequencyInput>,
    /// Reminder time as HH:MM
    pub reminder_time: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub habit_id: String,
    pub message: String,
}

/// Create a new habit using the provided storage
///
/// The habit's completion rate counts from `today`.
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
    today: NaiveDate,
) -> Result<CreateHabitResponse, ToolError> {
    let category = match params.category.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw.parse::<Category>()?,
        _ => Category::default(),
    };

    let frequency = match &params.frequency {
        Some(input) => input.parse()?,
        None => Frequency::weekdays(),
    };

    let reminder_time = match params.reminder_time.as_deref() {
        Some(raw) => parse_reminder_time(raw)?,
        None => None,
    };

    let description = params
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let habit = Habit::new(params.name, description, category, frequency, reminder_time)?
        .starting_on(today);
    storage.create_habit(&habit)?;

    tracing::info!("Created habit '{}' scheduled {}", habit.name, habit.frequency.display_name());

    Ok(CreateHabitResponse {
        habit_id: habit.id.to_string(),
        message: format!(
            "✅ Created habit '{}' ({})! Ready to start your streak!",
            habit.name,
            habit.frequency.display_name()
        ),
    })
}
