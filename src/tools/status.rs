/// Tool for checking habit status and streaks
///
/// This module implements the habit_status MCP tool. Streaks are derived
/// fresh from the completion history here, and any stored value that has
/// gone stale (for example after days passed without a toggle) is saved
/// back.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{today_summary, Habit, TodaySummary};
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, refresh_streaks, ToolError};

/// Parameters for checking habit status
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StatusParams {
    /// Habit to report on; all habits when omitted
    pub habit_id: Option<String>,
}

/// Where a habit stands on the reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Completed,
    Pending,
    NotScheduled,
}

/// Information about a single habit's status
#[derive(Debug, Serialize)]
pub struct HabitStatus {
    pub habit_id: String,
    pub name: String,
    pub frequency: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completion_rate: f64,
    pub last_completed: Option<NaiveDate>,
    pub status: DayStatus,
}

/// Response from checking habit status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub habits: Vec<HabitStatus>,
    pub today: TodaySummary,
    pub message: String,
}

/// Get status for habits using the provided storage
pub fn get_habit_status<S: HabitStorage>(
    storage: &S,
    params: StatusParams,
    today: NaiveDate,
) -> Result<StatusResponse, ToolError> {
    let habits = match params.habit_id.as_deref() {
        Some(raw) => vec![storage.get_habit(&parse_habit_id(raw)?)?],
        None => storage.list_habits(None)?,
    };

    let habits = habits
        .into_iter()
        .map(|habit| refresh_streaks(storage, habit, today))
        .collect::<Result<Vec<_>, _>>()?;

    let statuses: Vec<HabitStatus> = habits
        .iter()
        .map(|habit| HabitStatus {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            frequency: habit.frequency.display_name(),
            current_streak: habit.current_streak,
            longest_streak: habit.longest_streak,
            completion_rate: habit.completion_rate(today),
            last_completed: habit.last_completed(),
            status: day_status(habit, today),
        })
        .collect();

    let today_stats = today_summary(&habits, today);
    let message = format_message(&statuses, &today_stats);

    Ok(StatusResponse {
        habits: statuses,
        today: today_stats,
        message,
    })
}

fn day_status(habit: &Habit, today: NaiveDate) -> DayStatus {
    if habit.is_completed_on(today) {
        DayStatus::Completed
    } else if habit.is_scheduled_on(today) {
        DayStatus::Pending
    } else {
        DayStatus::NotScheduled
    }
}

fn format_message(statuses: &[HabitStatus], today: &TodaySummary) -> String {
    if statuses.is_empty() {
        return "No habits found. Create your first habit to get started!".to_string();
    }

    let header = format!(
        "📊 Today ({}): {} of {} scheduled habits done ({}%). Best current streak: {} days",
        today.date,
        today.completed_count,
        today.scheduled_count,
        today.progress_percent,
        today.highest_current_streak
    );

    let details = statuses
        .iter()
        .map(|h| {
            let icon = match h.status {
                DayStatus::Completed => "✅",
                DayStatus::Pending => "⏳",
                DayStatus::NotScheduled => "💤",
            };
            let last = h
                .last_completed
                .map(|d| format!("\n   Last completed: {}", d))
                .unwrap_or_default();
            format!(
                "{} {} ({})\n   Current streak: {} days | Best: {} days | Rate: {:.1}%{}",
                icon,
                h.name,
                h.frequency,
                h.current_streak,
                h.longest_streak,
                h.completion_rate * 100.0,
                last
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}\n\n{}", header, details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HabitId;
    use crate::tools::test_support::{create, date, storage};
    use crate::tools::{toggle_habit, ToggleHabitParams};

    #[test]
    fn test_stale_streak_is_refreshed_and_saved() {
        let storage = storage();
        let id = create(&storage, "Journal", "daily");
        for day in [11, 12, 13] {
            toggle_habit(
                &storage,
                ToggleHabitParams {
                    habit_id: id.clone(),
                    date: Some(date(2024, 3, day).to_string()),
                    completed: Some(true),
                },
                date(2024, 3, 13),
            )
            .unwrap();
        }

        // Two days later with no activity: yesterday was missed
        let response = get_habit_status(
            &storage,
            StatusParams { habit_id: Some(id.clone()) },
            date(2024, 3, 15),
        )
        .unwrap();

        let status = &response.habits[0];
        assert_eq!(status.current_streak, 0);
        assert_eq!(status.longest_streak, 3);
        assert_eq!(status.status, DayStatus::Pending);
        assert_eq!(status.last_completed, Some(date(2024, 3, 13)));

        let stored = storage.get_habit(&HabitId::from_string(&id).unwrap()).unwrap();
        assert_eq!(stored.current_streak, 0);
        assert_eq!(stored.longest_streak, 3);
    }

    #[test]
    fn test_status_for_all_habits() {
        let storage = storage();
        let today = date(2024, 3, 16); // Saturday
        create(&storage, "Code", "weekdays");
        let hike = create(&storage, "Hike", "weekends");
        toggle_habit(
            &storage,
            ToggleHabitParams { habit_id: hike, date: None, completed: None },
            today,
        )
        .unwrap();

        let response = get_habit_status(&storage, StatusParams { habit_id: None }, today).unwrap();
        assert_eq!(response.habits.len(), 2);
        assert_eq!(response.habits[0].status, DayStatus::NotScheduled);
        assert_eq!(response.habits[1].status, DayStatus::Completed);
        assert_eq!(response.today.progress_percent, 100);
        assert!(response.message.contains("1 of 1"));
    }

    #[test]
    fn test_status_with_no_habits() {
        let storage = storage();
        let response = get_habit_status(&storage, StatusParams { habit_id: None }, date(2024, 3, 13)).unwrap();
        assert!(response.habits.is_empty());
        assert!(response.message.contains("No habits found"));
    }
}
