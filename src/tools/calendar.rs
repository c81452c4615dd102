/// Tool for the monthly completion calendar
///
/// This module implements the habit_calendar MCP tool. It shows the
/// requested month and, by default, the month before it.

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{month_calendar, previous_month, MonthCalendar};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for the calendar view
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CalendarParams {
    /// Year to show (defaults to the current year)
    pub year: Option<i32>,
    /// Month to show, 1-12 (defaults to the current month)
    pub month: Option<u32>,
    /// Also show the preceding month (default: true)
    pub include_previous: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    /// Oldest month first
    pub months: Vec<MonthCalendar>,
    pub message: String,
}

pub fn habit_calendar<S: HabitStorage>(
    storage: &S,
    params: CalendarParams,
    today: NaiveDate,
) -> Result<CalendarResponse, ToolError> {
    let year = params.year.unwrap_or_else(|| today.year());
    let month = params.month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        return Err(ToolError::InvalidParams(format!("Month must be 1-12, got {}", month)));
    }

    let habits = storage.list_habits(None)?;

    // The requested month is validated before anything is derived from it
    let requested = month_calendar(&habits, year, month, today)?;
    let mut months = Vec::with_capacity(2);
    if params.include_previous.unwrap_or(true) {
        let (prev_year, prev_month) = previous_month(year, month)?;
        months.push(month_calendar(&habits, prev_year, prev_month, today)?);
    }
    months.push(requested);

    let grids = months
        .iter()
        .map(MonthCalendar::render_text)
        .collect::<Vec<_>>()
        .join("\n");
    let message = format!(
        "📅 Habit calendar\n\n{}\nLegend: ✓ all done  ~ partly done  · nothing done  * today",
        grids
    );

    Ok(CalendarResponse { months, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DayClassification, DomainError};
    use crate::tools::test_support::{create, date, storage};
    use crate::tools::{toggle_habit, ToggleHabitParams};

    #[test]
    fn test_calendar_defaults_to_current_and_previous_month() {
        let storage = storage();
        let today = date(2024, 3, 13);
        let read = create(&storage, "Read", "daily");
        create(&storage, "Run", "daily");
        toggle_habit(
            &storage,
            ToggleHabitParams { habit_id: read, date: Some("2024-03-12".to_string()), completed: None },
            today,
        )
        .unwrap();

        let response = habit_calendar(&storage, CalendarParams::default(), today).unwrap();
        assert_eq!(response.months.len(), 2);
        assert_eq!(response.months[0].label, "February 2024");
        assert_eq!(response.months[0].days.len(), 29);

        let march = &response.months[1];
        assert_eq!(march.leading_blanks, 4); // March 1st 2024 is a Friday
        assert_eq!(march.days[11].summary.classification, DayClassification::Partial);
        assert!(march.days[12].is_today);
        assert!(response.message.contains("March 2024"));
    }

    #[test]
    fn test_january_wraps_to_previous_december() {
        let storage = storage();
        let response = habit_calendar(
            &storage,
            CalendarParams { year: Some(2024), month: Some(1), include_previous: None },
            date(2024, 3, 13),
        )
        .unwrap();
        assert_eq!(response.months[0].label, "December 2023");

        let invalid = habit_calendar(
            &storage,
            CalendarParams { year: Some(2024), month: Some(13), include_previous: Some(false) },
            date(2024, 3, 13),
        );
        assert!(matches!(invalid, Err(ToolError::InvalidParams(_))));
    }

    #[test]
    fn test_unrepresentable_years_are_errors() {
        let storage = storage();
        for year in [i32::MIN, i32::MAX] {
            let result = habit_calendar(
                &storage,
                CalendarParams { year: Some(year), month: Some(1), include_previous: None },
                date(2024, 3, 13),
            );
            assert!(matches!(result, Err(ToolError::Domain(DomainError::InvalidDate(_)))));
        }
    }
}
