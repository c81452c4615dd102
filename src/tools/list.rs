/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{today_summary, Category, TodaySummary};
use crate::storage::HabitStorage;
use crate::tools::{refresh_streaks, ToolError};

/// Parameters for listing habits
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Filter by category key (health, productivity, custom:name, ...)
    pub category: Option<String>,
    /// "name" (default), "streak", "longest_streak" or "completion_rate"
    pub sort_by: Option<String>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub category: String,
    pub frequency: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completion_rate: f64,
    pub total_completions: u32,
    pub scheduled_today: bool,
    pub completed_today: bool,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub today: TodaySummary,
}

/// List habits using the provided storage
///
/// Streaks are recomputed as of `today`, and stale stored values are saved.
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    params: ListHabitsParams,
    today: NaiveDate,
) -> Result<ListHabitsResponse, ToolError> {
    let category_filter = params
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()?;

    let habits = storage
        .list_habits(category_filter.as_ref())?
        .into_iter()
        .map(|habit| refresh_streaks(storage, habit, today))
        .collect::<Result<Vec<_>, _>>()?;
    let today_stats = today_summary(&habits, today);

    let mut summaries: Vec<HabitSummary> = habits
        .iter()
        .map(|habit| HabitSummary {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            category: habit.category.display_name().to_string(),
            frequency: habit.frequency.display_name(),
            current_streak: habit.current_streak,
            longest_streak: habit.longest_streak,
            completion_rate: habit.completion_rate(today),
            total_completions: habit.completion_dates.len() as u32,
            scheduled_today: habit.is_scheduled_on(today),
            completed_today: habit.is_completed_on(today),
        })
        .collect();

    // Storage returns habits ordered by name already
    match params.sort_by.as_deref().map(str::trim).unwrap_or("name") {
        "name" | "" => {}
        "streak" | "current_streak" => {
            summaries.sort_by(|a, b| b.current_streak.cmp(&a.current_streak));
        }
        "longest_streak" => {
            summaries.sort_by(|a, b| b.longest_streak.cmp(&a.longest_streak));
        }
        "completion_rate" => {
            summaries.sort_by(|a, b| b.completion_rate.total_cmp(&a.completion_rate));
        }
        other => {
            return Err(ToolError::InvalidParams(format!(
                "Unknown sort_by '{}'. Valid options: name, streak, longest_streak, completion_rate",
                other
            )));
        }
    }

    Ok(ListHabitsResponse {
        habits: summaries,
        today: today_stats,
    })
}
